//! Error Types - QAffine Core Error Handling
//!
//! Error kinds shared by the storage, tensor and quantization layers. Every
//! kind is detected before any output becomes observable, and none of them
//! is retried internally.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use thiserror::Error;

use crate::device::Device;
use crate::dtype::DType;

// =============================================================================
// Error Types
// =============================================================================

/// The main error type for QAffine core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// An argument was outside its documented domain.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the rejected argument.
        message: String,
    },

    /// The operation does not support tensors resident on this device.
    #[error("Unsupported device: {device} (only cpu is supported)")]
    UnsupportedDevice {
        /// The device the offending storage lives on.
        device: Device,
    },

    /// The allocator could not satisfy the request.
    #[error("Out of memory: requested {size} bytes on {device}")]
    OutOfMemory {
        /// The requested size in bytes (saturated on overflow).
        size: usize,
        /// The device on which allocation failed.
        device: Device,
    },

    /// Shape mismatch between a buffer and its descriptor.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// The expected shape.
        expected: Vec<usize>,
        /// The actual shape.
        actual: Vec<usize>,
    },

    /// Data type mismatch.
    #[error("DType mismatch: expected {expected}, got {actual}")]
    DTypeMismatch {
        /// The expected data type.
        expected: DType,
        /// The actual data type.
        actual: DType,
    },

    /// Index out of bounds.
    #[error("Index out of bounds: index {index} for dimension of size {size}")]
    IndexOutOfBounds {
        /// The invalid index.
        index: usize,
        /// The size of the dimension.
        size: usize,
    },

    /// Invalid operation for the current state of the value.
    #[error("Invalid operation: {message}")]
    InvalidOperation {
        /// Description of why the operation is invalid.
        message: String,
    },
}

// =============================================================================
// Result Type
// =============================================================================

/// A specialized Result type for QAffine core operations.
pub type Result<T> = core::result::Result<T, Error>;

// =============================================================================
// Helper Functions
// =============================================================================

impl Error {
    /// Creates a new invalid argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a new shape mismatch error.
    #[must_use]
    pub fn shape_mismatch(expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }

    /// Creates a new invalid operation error.
    #[must_use]
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::shape_mismatch(&[2, 3], &[2, 4]);
        assert!(err.to_string().contains("Shape mismatch"));

        let err = Error::OutOfMemory {
            size: 64,
            device: Device::Cpu,
        };
        assert_eq!(err.to_string(), "Out of memory: requested 64 bytes on cpu");
    }

    #[test]
    fn test_unsupported_device_display() {
        let err = Error::UnsupportedDevice {
            device: Device::Cuda(1),
        };
        assert!(err.to_string().contains("cuda:1"));
    }

    #[test]
    fn test_error_equality() {
        let err1 = Error::invalid_argument("scale must be positive");
        let err2 = Error::invalid_argument("scale must be positive");
        assert_eq!(err1, err2);
    }
}
