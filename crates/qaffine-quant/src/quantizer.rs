//! Quantizer Policy
//!
//! A `Quantizer` is an immutable quantization scheme instance. It is always
//! handled through `Arc<Quantizer>`: every tensor it produces keeps a clone
//! of that `Arc`, so the parameters needed to interpret the codes outlive
//! the call that produced them.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use std::fmt;
use std::sync::Arc;

use qaffine_core::{DType, Device};
use qaffine_tensor::Tensor;

use crate::codec;
use crate::error::{QuantError, QuantResult};
use crate::factory::allocate_quantized;
use crate::types::{QScheme, QuantizedTensor};

// =============================================================================
// Per-Layer Affine Quantizer
// =============================================================================

/// One `(scale, zero_point)` pair applied to every element of a tensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerLayerAffineQuantizer {
    scale: f32,
    zero_point: u8,
}

impl PerLayerAffineQuantizer {
    /// Creates a quantizer after validating its parameters.
    ///
    /// `scale` is stored in single precision and must stay positive and
    /// finite after narrowing. `zero_point` must be a valid unsigned 8-bit
    /// code.
    pub fn new(scale: f64, zero_point: i64) -> QuantResult<Self> {
        if !(scale > 0.0 && scale.is_finite()) {
            return Err(QuantError::InvalidArgument(format!(
                "scale must be positive and finite, got {scale}"
            )));
        }

        let narrowed = scale as f32;
        if !(narrowed > 0.0 && narrowed.is_finite()) {
            return Err(QuantError::InvalidArgument(format!(
                "scale {scale} is not representable in single precision"
            )));
        }

        let zero_point = u8::try_from(zero_point).map_err(|_| {
            QuantError::InvalidArgument(format!(
                "zero_point must be in [{}, {}], got {zero_point}",
                codec::QMIN,
                codec::QMAX
            ))
        })?;

        Ok(Self {
            scale: narrowed,
            zero_point,
        })
    }

    /// Returns the step size between adjacent codes.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Returns the code that represents real zero.
    pub fn zero_point(&self) -> u8 {
        self.zero_point
    }
}

// =============================================================================
// Quantizer
// =============================================================================

/// Closed set of quantization schemes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Quantizer {
    /// Whole-tensor affine quantization to unsigned 8-bit codes.
    PerLayerAffine(PerLayerAffineQuantizer),
}

/// Creates a shared per-layer affine quantizer.
pub fn make_per_layer_affine_quantizer(scale: f64, zero_point: i64) -> QuantResult<Arc<Quantizer>> {
    let quantizer = PerLayerAffineQuantizer::new(scale, zero_point)?;
    Ok(Arc::new(Quantizer::PerLayerAffine(quantizer)))
}

impl Quantizer {
    /// Returns the scheme tag.
    pub fn qscheme(&self) -> QScheme {
        match self {
            Quantizer::PerLayerAffine(_) => QScheme::PerTensorAffine,
        }
    }

    /// Returns the scale of the scheme.
    pub fn scale(&self) -> f32 {
        match self {
            Quantizer::PerLayerAffine(q) => q.scale(),
        }
    }

    /// Returns the zero point of the scheme.
    pub fn zero_point(&self) -> u8 {
        match self {
            Quantizer::PerLayerAffine(q) => q.zero_point(),
        }
    }

    /// Quantizes a real tensor.
    ///
    /// The result has the same shape, dtype `QUInt8`, fresh storage and
    /// holds a clone of this `Arc`. The input is never modified.
    pub fn quantize(self: &Arc<Self>, tensor: &Tensor<f32>) -> QuantResult<QuantizedTensor> {
        ensure_cpu(tensor.device())?;

        let quantized = allocate_quantized(tensor.shape(), DType::QUInt8, Arc::clone(self))?;
        {
            let src = tensor.storage().as_slice();
            let mut dst = quantized.storage().as_slice_mut();
            match **self {
                Quantizer::PerLayerAffine(q) => {
                    codec::quantize_slice(&src, &mut dst, q.scale, q.zero_point)?;
                }
            }
        }
        Ok(quantized)
    }

    /// Dequantizes a tensor into freshly allocated real storage.
    ///
    /// The tensor's own quantizer tag is not consulted; the caller is
    /// responsible for pairing compatible quantizers and tensors.
    pub fn dequantize(&self, tensor: &QuantizedTensor) -> QuantResult<Tensor<f32>> {
        ensure_cpu(tensor.device())?;

        let real = Tensor::<f32>::try_zeros(tensor.shape())?;
        {
            let src = tensor.storage().as_slice();
            let mut dst = real.storage().as_slice_mut();
            match self {
                Quantizer::PerLayerAffine(q) => {
                    codec::dequantize_slice(&src, &mut dst, q.scale, q.zero_point)?;
                }
            }
        }
        Ok(real)
    }
}

impl fmt::Display for Quantizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}(scale={}, zero_point={})",
            self.qscheme(),
            self.scale(),
            self.zero_point()
        )
    }
}

/// Quantizes a tensor with a one-off per-layer affine quantizer.
pub fn quantize_per_tensor(
    tensor: &Tensor<f32>,
    scale: f64,
    zero_point: i64,
) -> QuantResult<QuantizedTensor> {
    make_per_layer_affine_quantizer(scale, zero_point)?.quantize(tensor)
}

fn ensure_cpu(device: Device) -> QuantResult<()> {
    if device.is_available() {
        Ok(())
    } else {
        Err(QuantError::UnsupportedDevice(device))
    }
}

// =============================================================================
// Tests
// =============================================================================
