//! Shape and Strides - Tensor Dimension Management
//!
//! Shapes define the dimensions of a tensor; strides define how to walk the
//! row-major storage underneath it. Requested sizes arrive as signed
//! integers and are validated here before any buffer is sized from them.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use smallvec::SmallVec;

use qaffine_core::error::{Error, Result};
use qaffine_core::Device;

// =============================================================================
// Type Aliases
// =============================================================================

/// Shape type - dimensions of a tensor.
/// Uses `SmallVec` for stack allocation of small shapes (up to 6 dimensions).
pub type Shape = SmallVec<[usize; 6]>;

/// Strides type - step sizes for each dimension.
pub type Strides = SmallVec<[isize; 6]>;

// =============================================================================
// Shape Utilities
// =============================================================================

/// Computes the total number of elements, failing on overflow.
///
/// The empty shape is a scalar and has one element. An element count that does not fit in `usize` can never be allocated, so
/// overflow is reported as `OutOfMemory`.
pub fn checked_numel(shape: &[usize]) -> Result<usize> {
    shape
        .iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
        .ok_or(Error::OutOfMemory {
            size: usize::MAX,
            device: Device::Cpu,
        })
}

/// Validates requested sizes and converts them to a shape.
///
/// # Returns
/// `InvalidArgument` naming the first negative dimension, `OutOfMemory` for a
/// dimension that does not fit in `usize`.
pub fn shape_from_sizes(sizes: &[i64]) -> Result<Shape> {
    sizes
        .iter()
        .enumerate()
        .map(|(dim, &size)| {
            if size < 0 {
                return Err(Error::invalid_argument(format!(
                    "negative dimension {size} at index {dim} in requested sizes {sizes:?}"
                )));
            }
            usize::try_from(size).map_err(|_| Error::OutOfMemory {
                size: usize::MAX,
                device: Device::Cpu,
            })
        })
        .collect()
}

/// Converts a shape back to signed sizes.
#[must_use]
pub fn sizes_of(shape: &[usize]) -> Vec<i64> {
    shape.iter().map(|&d| d as i64).collect()
}

/// Computes row-major (C-order) strides for a shape.
///
/// Strides saturate at `isize::MAX`. That can only happen for shapes with a
/// zero dimension, which hold no elements and are never indexed.
#[must_use]
pub fn contiguous_strides(shape: &[usize]) -> Strides {
    if shape.is_empty() {
        return Strides::new();
    }

    let mut strides = Strides::with_capacity(shape.len());
    let mut stride = 1isize;

    // Compute strides from right to left
    for &dim in shape.iter().rev() {
        strides.push(stride);
        stride = stride.saturating_mul(isize::try_from(dim).unwrap_or(isize::MAX));
    }

    strides.reverse();
    strides
}

/// Computes the linear index from multi-dimensional indices.
#[must_use]
pub fn linear_index(indices: &[usize], strides: &[isize]) -> usize {
    debug_assert_eq!(indices.len(), strides.len());

    let mut offset = 0isize;
    for (&idx, &stride) in indices.iter().zip(strides.iter()) {
        offset += idx as isize * stride;
    }
    offset as usize
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_numel() {
        assert_eq!(checked_numel(&[2, 3, 4]).unwrap(), 24);
        assert_eq!(checked_numel(&[]).unwrap(), 1);
        assert_eq!(checked_numel(&[0]).unwrap(), 0);
        assert_eq!(checked_numel(&[5, 0, 2]).unwrap(), 0);
        assert_eq!(checked_numel(&[0, usize::MAX, 2]).unwrap(), 0);
    }

    #[test]
    fn test_checked_numel_overflow() {
        let err = checked_numel(&[usize::MAX, 2]).unwrap_err();
        assert!(matches!(err, Error::OutOfMemory { .. }));
    }

    #[test]
    fn test_shape_from_sizes() {
        let shape = shape_from_sizes(&[2, 3]).unwrap();
        assert_eq!(shape.as_slice(), &[2, 3]);

        let empty = shape_from_sizes(&[0]).unwrap();
        assert_eq!(empty.as_slice(), &[0]);
    }

    #[test]
    fn test_shape_from_sizes_rejects_negative() {
        let err = shape_from_sizes(&[2, -1, 3]).unwrap_err();
        match err {
            Error::InvalidArgument { message } => assert!(message.contains("index 1")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_sizes_round_trip() {
        assert_eq!(sizes_of(&[4, 1, 7]), vec![4, 1, 7]);
    }

    #[test]
    fn test_contiguous_strides() {
        let shape = [2, 3, 4];
        let strides = contiguous_strides(&shape);
        assert_eq!(strides.as_slice(), &[12, 4, 1]);
        assert!(contiguous_strides(&[]).is_empty());
    }

    #[test]
    fn test_contiguous_strides_of_huge_zero_sized_shape() {
        let strides = contiguous_strides(&[0, 1 << 20, 1 << 20, 1 << 30]);
        assert_eq!(strides.len(), 4);
        assert_eq!(strides[3], 1);
        assert_eq!(strides[2], 1 << 30);
        assert_eq!(strides[0], isize::MAX);

        let strides = contiguous_strides(&[0, usize::MAX]);
        assert_eq!(strides.as_slice(), &[isize::MAX, 1]);
    }

    #[test]
    fn test_linear_index() {
        let strides = contiguous_strides(&[2, 3]);
        assert_eq!(linear_index(&[0, 0], &strides), 0);
        assert_eq!(linear_index(&[1, 2], &strides), 5);
    }
}
