//! Tensor - Contiguous N-Dimensional Array
//!
//! `Tensor<T>` pairs reference-counted storage with a shape. It is always
//! row-major and contiguous; quantization only ever needs linear storage
//! order, so no view or broadcasting machinery is carried here.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use core::fmt;

use qaffine_core::dtype::{DType, Scalar};
use qaffine_core::error::{Error, Result};
use qaffine_core::storage::Storage;
use qaffine_core::Device;

use crate::shape::{checked_numel, contiguous_strides, linear_index, sizes_of, Shape, Strides};

// =============================================================================
// Tensor Struct
// =============================================================================

/// A contiguous N-dimensional array of scalar values.
#[derive(Clone)]
pub struct Tensor<T: Scalar> {
    /// Underlying data storage (reference-counted).
    pub(crate) storage: Storage<T>,
    /// Shape of the tensor (dimensions).
    pub(crate) shape: Shape,
    /// Row-major strides for each dimension.
    pub(crate) strides: Strides,
}

impl<T: Scalar> Tensor<T> {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Creates a tensor over existing storage with the given shape.
    ///
    /// # Returns
    /// New tensor, or `ShapeMismatch` if the shape doesn't describe exactly
    /// the storage's elements, including shapes whose element count
    /// overflows.
    pub fn from_storage(storage: Storage<T>, shape: &[usize]) -> Result<Self> {
        if checked_numel(shape).ok() != Some(storage.len()) {
            return Err(Error::shape_mismatch(&[storage.len()], shape));
        }

        let shape = Shape::from_slice(shape);
        let strides = contiguous_strides(&shape);

        Ok(Self {
            storage,
            shape,
            strides,
        })
    }

    /// Creates a new CPU tensor from a vector with the given shape.
    pub fn from_vec(data: Vec<T>, shape: &[usize]) -> Result<Self> {
        let storage = Storage::from_vec(data, Device::Cpu);
        Self::from_storage(storage, shape)
    }

    /// Creates a new CPU tensor from a slice with the given shape.
    pub fn from_slice(data: &[T], shape: &[usize]) -> Result<Self> {
        let storage = Storage::from_slice(data, Device::Cpu);
        Self::from_storage(storage, shape)
    }

    /// Allocates a zero-filled CPU tensor through the default allocator.
    pub fn try_zeros(shape: &[usize]) -> Result<Self> {
        let storage = Storage::try_zeros(checked_numel(shape)?, Device::Cpu)?;
        Self::from_storage(storage, shape)
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Returns the shape of the tensor.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the shape as signed sizes.
    #[must_use]
    pub fn sizes(&self) -> Vec<i64> {
        sizes_of(&self.shape)
    }

    /// Returns the strides of the tensor.
    #[must_use]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    /// Returns the number of dimensions.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Returns the total number of elements.
    #[must_use]
    pub fn numel(&self) -> usize {
        self.storage.len()
    }

    /// Returns true if the tensor has zero elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.numel() == 0
    }

    /// Returns the device this tensor is on.
    #[must_use]
    pub fn device(&self) -> Device {
        self.storage.device()
    }

    /// Returns the element dtype.
    #[must_use]
    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    /// Returns the underlying storage.
    #[must_use]
    pub fn storage(&self) -> &Storage<T> {
        &self.storage
    }

    // =========================================================================
    // Data Access
    // =========================================================================

    /// Returns the element at the given indices.
    pub fn get(&self, indices: &[usize]) -> Result<T> {
        if indices.len() != self.ndim() {
            return Err(Error::invalid_operation(format!(
                "Expected {} indices, got {}",
                self.ndim(),
                indices.len()
            )));
        }

        for (&idx, &dim) in indices.iter().zip(self.shape.iter()) {
            if idx >= dim {
                return Err(Error::IndexOutOfBounds {
                    index: idx,
                    size: dim,
                });
            }
        }

        let offset = linear_index(indices, &self.strides);
        Ok(self.storage.as_slice()[offset])
    }

    /// Returns the data as a vector in linear storage order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.storage.as_slice().to_vec()
    }
}

impl<T: Scalar> fmt::Debug for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape.as_slice())
            .field("dtype", &T::DTYPE)
            .field("device", &self.device())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec() {
        let t = Tensor::<f32>::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
        assert_eq!(t.shape(), &[2, 3]);
        assert_eq!(t.sizes(), vec![2, 3]);
        assert_eq!(t.strides(), &[3, 1]);
        assert_eq!(t.numel(), 6);
        assert_eq!(t.ndim(), 2);
        assert_eq!(t.dtype(), DType::F32);
        assert_eq!(t.device(), Device::Cpu);
    }

    #[test]
    fn test_from_vec_shape_mismatch() {
        let err = Tensor::<f32>::from_vec(vec![1.0, 2.0, 3.0], &[2, 2]).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_get() {
        let t = Tensor::<f32>::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
        assert_eq!(t.get(&[0, 0]).unwrap(), 1.0);
        assert_eq!(t.get(&[1, 2]).unwrap(), 6.0);
        assert!(t.get(&[2, 0]).is_err());
        assert!(t.get(&[0]).is_err());
    }

    #[test]
    fn test_try_zeros() {
        let z = Tensor::<f32>::try_zeros(&[3, 2]).unwrap();
        assert_eq!(z.to_vec(), vec![0.0; 6]);
        assert!(z.storage().is_resizable());
    }

    #[test]
    fn test_scalar_and_empty() {
        let s = Tensor::from_slice(&[3.0_f32], &[]).unwrap();
        assert_eq!(s.numel(), 1);
        assert!(s.shape().is_empty());
        assert_eq!(s.get(&[]).unwrap(), 3.0);

        let e = Tensor::<f32>::try_zeros(&[0]).unwrap();
        assert!(e.is_empty());
        assert_eq!(e.shape(), &[0]);
    }

    #[test]
    fn test_overflowing_shape_is_a_mismatch() {
        let err = Tensor::<f32>::from_vec(vec![], &[usize::MAX, 2]).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_huge_zero_sized_shape() {
        let shape = [0, 1 << 20, 1 << 20, 1 << 30];
        let t = Tensor::<f32>::from_vec(vec![], &shape).unwrap();
        assert_eq!(t.shape(), &shape);
        assert_eq!(t.numel(), 0);
        assert!(t.get(&[0, 0, 0, 0]).is_err());

        let z = Tensor::<f32>::try_zeros(&shape).unwrap();
        assert!(z.to_vec().is_empty());
    }

    #[test]
    fn test_from_storage_on_gpu_tag() {
        let storage = Storage::from_vec(vec![1.0_f32, 2.0], Device::Cuda(0));
        let t = Tensor::from_storage(storage, &[2]).unwrap();
        assert_eq!(t.device(), Device::Cuda(0));
    }
}
