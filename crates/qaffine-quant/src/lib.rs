//! QAffine Quant - Per-Tensor Affine Quantization
//!
//! Maps real `f32` tensors to unsigned 8-bit codes with a single
//! `(scale, zero_point)` pair per tensor, and back again:
//!
//! - **Quantizer**: validated, shareable scheme instance (`Arc<Quantizer>`)
//! - **Codec**: the element-wise affine transform, parallel for large buffers
//! - **Factory**: allocation of zero-filled quantized tensors
//! - **Stats**: round-trip error measurement
//!
//! # Example
//! ```rust
//! use qaffine_quant::make_per_layer_affine_quantizer;
//! use qaffine_tensor::Tensor;
//!
//! let quantizer = make_per_layer_affine_quantizer(0.5, 128).unwrap();
//! let tensor = Tensor::from_vec(vec![1.0, 100.0], &[2]).unwrap();
//!
//! let quantized = quantizer.quantize(&tensor).unwrap();
//! assert_eq!(quantized.int_repr(), vec![130, 255]);
//!
//! let restored = quantizer.dequantize(&quantized).unwrap();
//! assert_eq!(restored.to_vec(), vec![1.0, 63.5]);
//! ```
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod codec;
pub mod error;
pub mod factory;
pub mod quantizer;
pub mod stats;
pub mod types;

pub use codec::{dequantize_value, quantize_value, PARALLEL_THRESHOLD, QMAX, QMIN};
pub use error::{QuantError, QuantResult};
pub use factory::new_quantized_tensor;
pub use quantizer::{
    make_per_layer_affine_quantizer, quantize_per_tensor, PerLayerAffineQuantizer, Quantizer,
};
pub use stats::{
    compute_quantization_error, compute_quantization_stats, evaluate_quantizer,
    QuantizationStats,
};
pub use types::{QScheme, QuantizedTensor};

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_range() {
        assert_eq!(QMIN, 0);
        assert_eq!(QMAX, 255);
        assert!(PARALLEL_THRESHOLD > 0);
    }
}
