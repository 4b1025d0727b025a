//! Data Types - QAffine Type System
//!
//! Defines the element types a buffer can hold and the traits that tie
//! Rust types to their runtime tag. Alongside the ordinary float and
//! integer types there is one quantized type, `QUInt8`, which stores
//! unsigned 8-bit affine codes.
//!
//! # Key Features
//! - Runtime dtype information via `DType`
//! - Compile-time element types via `Scalar`
//! - Distinct quantized element type so codes are never mistaken for `u8` data
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use bytemuck::{Pod, Zeroable};

use core::fmt::Debug;

// =============================================================================
// DType Enum
// =============================================================================

/// Runtime representation of tensor data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DType {
    /// 32-bit floating point (single precision).
    #[default]
    F32,
    /// 64-bit floating point (double precision).
    F64,
    /// 8-bit signed integer.
    I8,
    /// 32-bit signed integer.
    I32,
    /// 64-bit signed integer.
    I64,
    /// 8-bit unsigned integer.
    U8,
    /// Quantized unsigned 8-bit affine code.
    QUInt8,
}

impl DType {
    /// Returns the size in bytes of one element of this data type.
    #[must_use]
    pub const fn size_of(self) -> usize {
        match self {
            Self::I8 | Self::U8 | Self::QUInt8 => 1,
            Self::F32 | Self::I32 => 4,
            Self::F64 | Self::I64 => 8,
        }
    }

    /// Returns true if this is a quantized integer type.
    #[must_use]
    pub const fn is_quantized(self) -> bool {
        matches!(self, Self::QUInt8)
    }

    /// Returns the name of this data type as a string.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::I8 => "i8",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::QUInt8 => "quint8",
        }
    }
}

impl core::fmt::Display for DType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =============================================================================
// Scalar Trait
// =============================================================================

/// Trait for all scalar types that can be stored in a buffer.
pub trait Scalar: Copy + Clone + Debug + Default + Send + Sync + Pod + Zeroable + 'static {
    /// The runtime dtype for this scalar type.
    const DTYPE: DType;

    /// Returns the dtype for this type.
    #[must_use]
    fn dtype() -> DType {
        Self::DTYPE
    }
}

// =============================================================================
// Scalar Implementations
// =============================================================================

macro_rules! impl_scalar {
    ($ty:ty, $dtype:expr) => {
        impl Scalar for $ty {
            const DTYPE: DType = $dtype;
        }
    };
}

impl_scalar!(f32, DType::F32);
impl_scalar!(f64, DType::F64);
impl_scalar!(i8, DType::I8);
impl_scalar!(i32, DType::I32);
impl_scalar!(i64, DType::I64);
impl_scalar!(u8, DType::U8);

/// Quantized unsigned 8-bit code.
///
/// Wraps the raw byte so a buffer of codes carries `DType::QUInt8` rather
/// than `DType::U8`. Every `u8` is a valid code, so the wrapper needs no
/// range checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct QUInt8(pub u8);

impl QUInt8 {
    /// Returns the raw code.
    #[must_use]
    pub const fn val(self) -> u8 {
        self.0
    }
}

impl Scalar for QUInt8 {
    const DTYPE: DType = DType::QUInt8;
}

impl From<u8> for QUInt8 {
    fn from(code: u8) -> Self {
        Self(code)
    }
}

impl From<QUInt8> for u8 {
    fn from(q: QUInt8) -> Self {
        q.0
    }
}

// =============================================================================
// Tests
// =============================================================================
