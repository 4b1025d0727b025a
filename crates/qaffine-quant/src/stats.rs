//! Quantization Error Statistics
//!
//! Measures how far a dequantized buffer drifted from the values it was
//! produced from.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use std::sync::Arc;

use qaffine_core::DType;
use qaffine_tensor::Tensor;

use crate::error::{QuantError, QuantResult};
use crate::quantizer::Quantizer;

/// Statistics about quantization error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantizationStats {
    /// Root mean square error.
    pub rmse: f32,
    /// Maximum absolute error.
    pub max_error: f32,
    /// Mean absolute error.
    pub mean_error: f32,
    /// Bytes per real element over bytes per code.
    pub compression_ratio: f32,
}

/// Computes the root mean square error between two buffers.
pub fn compute_quantization_error(original: &[f32], dequantized: &[f32]) -> QuantResult<f32> {
    Ok(compute_quantization_stats(original, dequantized)?.rmse)
}

/// Computes detailed quantization statistics.
///
/// # Returns
/// `ShapeMismatch` if the buffers differ in length, `InvalidArgument` if
/// they are empty.
pub fn compute_quantization_stats(
    original: &[f32],
    dequantized: &[f32],
) -> QuantResult<QuantizationStats> {
    if original.len() != dequantized.len() {
        return Err(QuantError::ShapeMismatch {
            expected: vec![original.len()],
            actual: vec![dequantized.len()],
        });
    }
    if original.is_empty() {
        return Err(QuantError::InvalidArgument(
            "cannot compute statistics of an empty buffer".to_string(),
        ));
    }

    let n = original.len() as f64;
    let (sum_sq, sum_abs, max_error) = original.iter().zip(dequantized).fold(
        (0.0f64, 0.0f64, 0.0f32),
        |(sq, abs, max), (&a, &b)| {
            let e = (a - b).abs();
            (sq + f64::from(e).powi(2), abs + f64::from(e), max.max(e))
        },
    );

    Ok(QuantizationStats {
        rmse: (sum_sq / n).sqrt() as f32,
        max_error,
        mean_error: (sum_abs / n) as f32,
        compression_ratio: DType::F32.size_of() as f32 / DType::QUInt8.size_of() as f32,
    })
}

/// Quantizes `tensor`, dequantizes it again and reports the drift.
pub fn evaluate_quantizer(
    quantizer: &Arc<Quantizer>,
    tensor: &Tensor<f32>,
) -> QuantResult<QuantizationStats> {
    let restored = quantizer.quantize(tensor)?.dequantize()?;
    compute_quantization_stats(&tensor.to_vec(), &restored.to_vec())
}

// =============================================================================
// Tests
// =============================================================================
