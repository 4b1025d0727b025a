//! Quantization Types
//!
//! Defines the scheme tag and the quantized tensor.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use std::fmt;
use std::sync::Arc;

use qaffine_core::{DType, Device, QUInt8, Storage};
use qaffine_tensor::shape::{checked_numel, sizes_of};
use qaffine_tensor::{Shape, Tensor};

use crate::error::{QuantError, QuantResult};
use crate::quantizer::Quantizer;

// =============================================================================
// Quantization Scheme
// =============================================================================

/// Quantization scheme tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QScheme {
    /// One scale and zero point for the whole tensor.
    PerTensorAffine,
}

impl QScheme {
    /// Returns the canonical name of the scheme.
    pub fn name(&self) -> &'static str {
        match self {
            QScheme::PerTensorAffine => "per_tensor_affine",
        }
    }
}

impl fmt::Display for QScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Quantized Tensor
// =============================================================================

/// A tensor whose storage holds `QUInt8` codes.
///
/// The storage length always equals the product of the shape. The shape
/// `[0]` is the canonical empty placeholder: it has no elements and is kept
/// as `[0]` rather than being normalised to another empty shape.
#[derive(Clone)]
pub struct QuantizedTensor {
    storage: Storage<QUInt8>,
    shape: Shape,
    quantizer: Arc<Quantizer>,
}

impl QuantizedTensor {
    /// Wraps existing code storage.
    ///
    /// The storage may live on any device; operations that read it check
    /// the device themselves. A shape whose element count differs from the
    /// storage length, or overflows, is a `ShapeMismatch`.
    pub fn from_storage(
        storage: Storage<QUInt8>,
        shape: &[usize],
        quantizer: Arc<Quantizer>,
    ) -> QuantResult<Self> {
        if checked_numel(shape).ok() != Some(storage.len()) {
            return Err(QuantError::ShapeMismatch {
                expected: vec![storage.len()],
                actual: shape.to_vec(),
            });
        }

        Ok(Self {
            storage,
            shape: Shape::from_slice(shape),
            quantizer,
        })
    }

    /// Builds a CPU tensor from raw codes.
    pub fn from_codes(codes: &[u8], shape: &[usize], quantizer: Arc<Quantizer>) -> QuantResult<Self> {
        let codes: Vec<QUInt8> = codes.iter().copied().map(QUInt8).collect();
        Self::from_storage(Storage::from_vec(codes, Device::Cpu), shape, quantizer)
    }

    /// Returns the shape.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the shape as signed sizes.
    pub fn sizes(&self) -> Vec<i64> {
        sizes_of(&self.shape)
    }

    /// Returns the number of stored codes.
    pub fn numel(&self) -> usize {
        self.storage.len()
    }

    /// Returns true for the `[0]` placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.shape.as_slice() == [0]
    }

    /// Returns the element dtype, always `QUInt8`.
    pub fn dtype(&self) -> DType {
        self.storage.dtype()
    }

    /// Returns the device the codes live on.
    pub fn device(&self) -> Device {
        self.storage.device()
    }

    /// Returns the code storage.
    pub fn storage(&self) -> &Storage<QUInt8> {
        &self.storage
    }

    /// Returns the size in bytes of the code storage.
    pub fn size_bytes(&self) -> usize {
        self.storage.size_bytes()
    }

    /// Returns the quantizer that produced this tensor.
    pub fn quantizer(&self) -> &Arc<Quantizer> {
        &self.quantizer
    }

    /// Returns the scale of the bound quantizer.
    pub fn q_scale(&self) -> f32 {
        self.quantizer.scale()
    }

    /// Returns the zero point of the bound quantizer.
    pub fn q_zero_point(&self) -> u8 {
        self.quantizer.zero_point()
    }

    /// Returns the scheme of the bound quantizer.
    pub fn qscheme(&self) -> QScheme {
        self.quantizer.qscheme()
    }

    /// Returns a copy of the raw codes in linear order.
    pub fn int_repr(&self) -> Vec<u8> {
        self.storage.as_slice().iter().map(|q| q.val()).collect()
    }

    /// Dequantizes with the bound quantizer.
    pub fn dequantize(&self) -> QuantResult<Tensor<f32>> {
        self.quantizer.dequantize(self)
    }
}

impl fmt::Debug for QuantizedTensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuantizedTensor")
            .field("shape", &self.shape.as_slice())
            .field("dtype", &self.dtype())
            .field("device", &self.device())
            .field("quantizer", &self.quantizer)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantizer::make_per_layer_affine_quantizer;

    #[test]
    fn test_qscheme_name() {
        assert_eq!(QScheme::PerTensorAffine.to_string(), "per_tensor_affine");
    }

    #[test]
    fn test_from_codes() {
        let quantizer = make_per_layer_affine_quantizer(0.5, 128).unwrap();
        let q = QuantizedTensor::from_codes(&[128, 130, 0, 255, 1, 2], &[2, 3], quantizer).unwrap();

        assert_eq!(q.shape(), &[2, 3]);
        assert_eq!(q.sizes(), vec![2, 3]);
        assert_eq!(q.numel(), 6);
        assert_eq!(q.size_bytes(), 6);
        assert_eq!(q.dtype(), DType::QUInt8);
        assert_eq!(q.device(), Device::Cpu);
        assert_eq!(q.q_scale(), 0.5);
        assert_eq!(q.q_zero_point(), 128);
        assert_eq!(q.qscheme(), QScheme::PerTensorAffine);
        assert_eq!(q.int_repr(), vec![128, 130, 0, 255, 1, 2]);
        assert!(!q.is_placeholder());
    }

    #[test]
    fn test_from_codes_shape_mismatch() {
        let quantizer = make_per_layer_affine_quantizer(1.0, 0).unwrap();
        let err = QuantizedTensor::from_codes(&[1, 2, 3], &[2, 2], quantizer).unwrap_err();
        assert!(matches!(err, QuantError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_from_codes_overflowing_shape() {
        let quantizer = make_per_layer_affine_quantizer(1.0, 0).unwrap();
        let err = QuantizedTensor::from_codes(&[], &[usize::MAX, 2], quantizer).unwrap_err();
        assert_eq!(
            err,
            QuantError::ShapeMismatch {
                expected: vec![0],
                actual: vec![usize::MAX, 2]
            }
        );
    }

    #[test]
    fn test_zero_sized_shapes_dequantize() {
        let quantizer = make_per_layer_affine_quantizer(0.5, 128).unwrap();
        for shape in [vec![3, 0], vec![0, 1 << 20, 1 << 20, 1 << 30]] {
            let q = QuantizedTensor::from_codes(&[], &shape, Arc::clone(&quantizer)).unwrap();
            let real = q.dequantize().unwrap();
            assert_eq!(real.shape(), shape.as_slice());
            assert!(real.to_vec().is_empty());
        }
    }

    #[test]
    fn test_dequantize_with_bound_quantizer() {
        let quantizer = make_per_layer_affine_quantizer(0.5, 128).unwrap();
        let q = QuantizedTensor::from_codes(&[126, 128, 130], &[3], quantizer).unwrap();
        assert_eq!(q.dequantize().unwrap().to_vec(), vec![-1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_clones_share_storage_and_quantizer() {
        let quantizer = make_per_layer_affine_quantizer(1.0, 0).unwrap();
        let a = QuantizedTensor::from_codes(&[1, 2], &[2], Arc::clone(&quantizer)).unwrap();
        let b = a.clone();

        assert!(!a.storage().is_unique());
        assert!(Arc::ptr_eq(a.quantizer(), b.quantizer()));
        assert_eq!(Arc::strong_count(&quantizer), 3);
    }
}
