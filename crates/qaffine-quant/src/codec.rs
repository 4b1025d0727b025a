//! Affine Codec
//!
//! Scalar transforms between real values and unsigned 8-bit codes:
//!
//! ```text
//! code  = clamp(round(value / scale) + zero_point, QMIN, QMAX)
//! value = (code - zero_point) * scale
//! ```
//!
//! Rounding is half-to-even. Offsetting and clamping happen in `i32` before
//! the result is narrowed to a byte, so a large `value / scale` cannot wrap.
//!
//! Non-finite input is not validated. Float-to-int casts saturate, so
//! `+inf` becomes `QMAX`, `-inf` becomes `QMIN` and NaN casts to 0 and
//! therefore quantizes to `zero_point`.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use qaffine_core::QUInt8;
use tracing::trace;

use crate::error::{QuantError, QuantResult};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

// =============================================================================
// Constants
// =============================================================================

/// Smallest representable code.
pub const QMIN: i32 = u8::MIN as i32;

/// Largest representable code.
pub const QMAX: i32 = u8::MAX as i32;

/// Buffers with at least this many elements are processed in parallel.
pub const PARALLEL_THRESHOLD: usize = 4096;

// =============================================================================
// Scalar Transforms
// =============================================================================

/// Quantizes one value.
#[inline]
pub fn quantize_value(scale: f32, zero_point: u8, value: f32) -> QUInt8 {
    let rounded = (value / scale).round_ties_even() as i32;
    let code = rounded
        .saturating_add(i32::from(zero_point))
        .clamp(QMIN, QMAX);
    QUInt8(code as u8)
}

/// Dequantizes one code.
#[inline]
pub fn dequantize_value(scale: f32, zero_point: u8, code: QUInt8) -> f32 {
    (i32::from(code.val()) - i32::from(zero_point)) as f32 * scale
}

// =============================================================================
// Buffer Transforms
// =============================================================================

/// Quantizes `src` into `dst` element by element in linear order.
///
/// # Returns
/// `ShapeMismatch` without writing anything if the lengths differ.
pub fn quantize_slice(
    src: &[f32],
    dst: &mut [QUInt8],
    scale: f32,
    zero_point: u8,
) -> QuantResult<()> {
    check_lengths(src.len(), dst.len())?;
    let parallel = use_parallel(src.len());
    trace!(numel = src.len(), parallel, scale, zero_point, "quantize");

    #[cfg(feature = "parallel")]
    if parallel {
        dst.par_iter_mut()
            .zip(src.par_iter())
            .for_each(|(q, &v)| *q = quantize_value(scale, zero_point, v));
        return Ok(());
    }

    for (q, &v) in dst.iter_mut().zip(src) {
        *q = quantize_value(scale, zero_point, v);
    }
    Ok(())
}

/// Dequantizes `src` into `dst` element by element in linear order.
///
/// # Returns
/// `ShapeMismatch` without writing anything if the lengths differ.
pub fn dequantize_slice(
    src: &[QUInt8],
    dst: &mut [f32],
    scale: f32,
    zero_point: u8,
) -> QuantResult<()> {
    check_lengths(src.len(), dst.len())?;
    let parallel = use_parallel(src.len());
    trace!(numel = src.len(), parallel, scale, zero_point, "dequantize");

    #[cfg(feature = "parallel")]
    if parallel {
        dst.par_iter_mut()
            .zip(src.par_iter())
            .for_each(|(v, &q)| *v = dequantize_value(scale, zero_point, q));
        return Ok(());
    }

    for (v, &q) in dst.iter_mut().zip(src) {
        *v = dequantize_value(scale, zero_point, q);
    }
    Ok(())
}

fn check_lengths(src: usize, dst: usize) -> QuantResult<()> {
    if src == dst {
        Ok(())
    } else {
        Err(QuantError::ShapeMismatch {
            expected: vec![src],
            actual: vec![dst],
        })
    }
}

#[inline]
fn use_parallel(numel: usize) -> bool {
    cfg!(feature = "parallel") && numel >= PARALLEL_THRESHOLD
}

// =============================================================================
// Tests
// =============================================================================
