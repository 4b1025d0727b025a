//! QAffine Core - Foundation Layer for Affine Quantization
//!
//! This crate provides the low-level building blocks the rest of QAffine
//! is written against: device tags, the dtype system (including the
//! quantized `QUInt8` element type), fallible CPU allocation and
//! reference-counted storage.
//!
//! # Key Features
//! - Device tags with CPU as the only resident memory space
//! - Type-safe data type system (f32, f64, integers, `QUInt8`)
//! - Fallible allocation that reports out-of-memory instead of aborting
//! - Reference-counted, optionally resizable storage
//!
//! # Example
//! ```rust
//! use qaffine_core::{Device, Storage};
//!
//! let storage = Storage::<f32>::try_zeros(1024, Device::Cpu).unwrap();
//! assert_eq!(storage.len(), 1024);
//! ```
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// ML/tensor-specific allowances
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::return_self_not_must_use)]

// =============================================================================
// Modules
// =============================================================================

pub mod allocator;
pub mod device;
pub mod dtype;
pub mod error;
pub mod storage;

// =============================================================================
// Re-exports
// =============================================================================

pub use allocator::DefaultAllocator;
pub use device::Device;
pub use dtype::{DType, QUInt8, Scalar};
pub use error::{Error, Result};
pub use storage::Storage;

// =============================================================================
// Prelude
// =============================================================================

/// Convenient imports for common usage.
pub mod prelude {
    pub use crate::device::Device;
    pub use crate::dtype::{DType, QUInt8, Scalar};
    pub use crate::error::{Error, Result};
    pub use crate::storage::Storage;
}
