//! Quantized Tensor Factory
//!
//! Validates a requested shape, sizes the buffer from the dtype, allocates
//! it once and binds the quantizer, all before the tensor is handed out.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use std::sync::Arc;

use qaffine_core::{DType, Device, QUInt8, Scalar, Storage};
use qaffine_tensor::shape::{checked_numel, shape_from_sizes};
use tracing::debug;

use crate::error::{QuantError, QuantResult};
use crate::quantizer::{make_per_layer_affine_quantizer, Quantizer};
use crate::types::QuantizedTensor;

/// Creates a zero-filled quantized tensor with a new per-layer affine quantizer.
///
/// # Arguments
/// * `sizes` - Requested dimensions; `[0]` yields the empty placeholder
/// * `dtype` - Quantized element type (`DType::QUInt8`)
/// * `scale` - Quantizer scale, must be positive
/// * `zero_point` - Quantizer zero point, must be in `[0, 255]`
///
/// # Returns
/// `InvalidArgument` for bad parameters or a negative dimension,
/// `DTypeMismatch` for a non-quantized dtype, `OutOfMemory` if the buffer
/// cannot be allocated. Parameters are checked before anything is allocated.
pub fn new_quantized_tensor(
    sizes: &[i64],
    dtype: DType,
    scale: f64,
    zero_point: i64,
) -> QuantResult<QuantizedTensor> {
    let quantizer = make_per_layer_affine_quantizer(scale, zero_point)?;
    let shape = shape_from_sizes(sizes)?;
    allocate_quantized(&shape, dtype, quantizer)
}

/// Allocates code storage for `shape` and binds `quantizer` to it.
pub(crate) fn allocate_quantized(
    shape: &[usize],
    dtype: DType,
    quantizer: Arc<Quantizer>,
) -> QuantResult<QuantizedTensor> {
    if !dtype.is_quantized() {
        return Err(QuantError::DTypeMismatch {
            expected: QUInt8::DTYPE,
            actual: dtype,
        });
    }

    let numel = checked_numel(shape)?;
    let bytes = numel.checked_mul(dtype.size_of()).ok_or(QuantError::OutOfMemory {
        size: usize::MAX,
        device: Device::Cpu,
    })?;

    let storage = Storage::<QUInt8>::try_zeros(numel, Device::Cpu)?;
    debug!(
        shape = ?shape,
        bytes,
        scale = quantizer.scale(),
        zero_point = quantizer.zero_point(),
        "allocated quantized tensor"
    );

    QuantizedTensor::from_storage(storage, shape, quantizer)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::QScheme;

    #[test]
    fn test_new_quantized_tensor() {
        let q = new_quantized_tensor(&[2, 3], DType::QUInt8, 0.5, 128).unwrap();
        assert_eq!(q.shape(), &[2, 3]);
        assert_eq!(q.numel(), 6);
        assert_eq!(q.size_bytes(), 6);
        assert_eq!(q.dtype(), DType::QUInt8);
        assert_eq!(q.qscheme(), QScheme::PerTensorAffine);
        assert_eq!(q.q_scale(), 0.5);
        assert_eq!(q.q_zero_point(), 128);
        assert!(q.storage().is_resizable());
        assert_eq!(q.int_repr(), vec![0; 6]);
    }

    #[test]
    fn test_empty_placeholder() {
        let q = new_quantized_tensor(&[0], DType::QUInt8, 1.0, 0).unwrap();
        assert!(q.is_placeholder());
        assert_eq!(q.shape(), &[0]);
        assert_eq!(q.numel(), 0);
    }

    #[test]
    fn test_other_zero_sized_shapes_are_not_placeholders() {
        let q = new_quantized_tensor(&[3, 0], DType::QUInt8, 1.0, 0).unwrap();
        assert!(!q.is_placeholder());
        assert_eq!(q.shape(), &[3, 0]);
        assert_eq!(q.numel(), 0);
    }

    #[test]
    fn test_scalar_shape() {
        let q = new_quantized_tensor(&[], DType::QUInt8, 1.0, 0).unwrap();
        assert!(q.shape().is_empty());
        assert_eq!(q.numel(), 1);
    }

    #[test]
    fn test_rejects_negative_dimension() {
        let err = new_quantized_tensor(&[2, -3], DType::QUInt8, 1.0, 0).unwrap_err();
        assert!(matches!(err, QuantError::InvalidArgument(_)));
    }

    #[test]
    fn test_rejects_non_quantized_dtype() {
        let err = new_quantized_tensor(&[2], DType::U8, 1.0, 0).unwrap_err();
        assert_eq!(
            err,
            QuantError::DTypeMismatch {
                expected: DType::QUInt8,
                actual: DType::U8
            }
        );
    }

    #[test]
    fn test_bad_scale_is_reported_before_allocation() {
        // A size that could never be allocated; the scale error must win.
        let err = new_quantized_tensor(&[i64::MAX, i64::MAX], DType::QUInt8, 0.0, 0).unwrap_err();
        assert!(matches!(err, QuantError::InvalidArgument(_)));
    }

    #[test]
    fn test_overflowing_size_is_out_of_memory() {
        let err = new_quantized_tensor(&[i64::MAX, i64::MAX], DType::QUInt8, 1.0, 0).unwrap_err();
        assert!(matches!(err, QuantError::OutOfMemory { .. }));
    }

    #[test]
    fn test_unsatisfiable_size_is_out_of_memory() {
        let err = new_quantized_tensor(&[i64::MAX / 2], DType::QUInt8, 1.0, 0).unwrap_err();
        assert!(matches!(err, QuantError::OutOfMemory { .. }));
    }
}
