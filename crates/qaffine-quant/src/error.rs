//! Quantization Error Types
//!
//! Error types for quantization operations. Core errors convert into the
//! matching quantization error kind so callers can match on one enum.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use qaffine_core::{DType, Device, Error};
use thiserror::Error;

/// Result type for quantization operations.
pub type QuantResult<T> = Result<T, QuantError>;

/// Errors that can occur during quantization.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuantError {
    /// Quantizer parameter or requested size outside its domain.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Input storage does not reside in host memory.
    #[error("Unsupported device: {0} (only cpu is supported)")]
    UnsupportedDevice(Device),

    /// Backing storage could not be allocated.
    #[error("Out of memory: requested {size} bytes on {device}")]
    OutOfMemory {
        /// Requested size in bytes.
        size: usize,
        /// Device the allocation was requested on.
        device: Device,
    },

    /// A quantized dtype was required.
    #[error("DType mismatch: expected {expected}, got {actual}")]
    DTypeMismatch {
        /// Expected dtype.
        expected: DType,
        /// Actual dtype.
        actual: DType,
    },

    /// Shape mismatch between a buffer and its descriptor.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// Expected shape.
        expected: Vec<usize>,
        /// Actual shape.
        actual: Vec<usize>,
    },

    /// Any other core error.
    #[error(transparent)]
    Core(Error),
}

impl From<Error> for QuantError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidArgument { message } => Self::InvalidArgument(message),
            Error::UnsupportedDevice { device } => Self::UnsupportedDevice(device),
            Error::OutOfMemory { size, device } => Self::OutOfMemory { size, device },
            Error::DTypeMismatch { expected, actual } => Self::DTypeMismatch { expected, actual },
            Error::ShapeMismatch { expected, actual } => Self::ShapeMismatch { expected, actual },
            other => Self::Core(other),
        }
    }
}
