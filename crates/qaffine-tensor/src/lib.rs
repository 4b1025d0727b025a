//! QAffine Tensor - Real-Valued Tensors
//!
//! Provides the contiguous, row-major `Tensor<T>` that quantization reads
//! from and dequantization writes to, together with the shape utilities used
//! to size buffers.
//!
//! # Example
//! ```rust
//! use qaffine_tensor::Tensor;
//!
//! let t = Tensor::<f32>::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
//! assert_eq!(t.shape(), &[2, 3]);
//! assert_eq!(t.numel(), 6);
//! assert_eq!(t.get(&[1, 0]).unwrap(), 4.0);
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
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

// =============================================================================
// Modules
// =============================================================================

pub mod shape;
pub mod tensor;

// =============================================================================
// Re-exports
// =============================================================================

pub use qaffine_core::{DType, Device, Error, Result};
pub use shape::{Shape, Strides};
pub use tensor::Tensor;

// =============================================================================
// Prelude
// =============================================================================

/// Convenient imports for common usage.
pub mod prelude {
    pub use crate::shape::{Shape, Strides};
    pub use crate::tensor::Tensor;
    pub use qaffine_core::{DType, Device, Error, Result};
}
