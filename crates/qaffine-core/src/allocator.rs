//! Allocator - Fallible Host Memory Allocation
//!
//! Provides the allocator every buffer in QAffine comes from. Allocation is
//! fallible: a request that overflows the address space or that the system
//! refuses surfaces as `Error::OutOfMemory` rather than aborting the process.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use tracing::warn;

use crate::device::Device;
use crate::dtype::Scalar;
use crate::error::{Error, Result};

// =============================================================================
// Default Allocator
// =============================================================================

/// Default CPU allocator using system memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAllocator;

impl DefaultAllocator {
    /// Creates a new default allocator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns the number of bytes needed for `count` elements of type T.
    ///
    /// # Returns
    /// `OutOfMemory` if the byte count does not fit in `usize`.
    pub fn byte_size<T: Scalar>(&self, count: usize) -> Result<usize> {
        count
            .checked_mul(core::mem::size_of::<T>())
            .ok_or(Error::OutOfMemory {
                size: usize::MAX,
                device: Device::Cpu,
            })
    }

    /// Allocates a zero-initialised buffer of `count` elements of type T.
    ///
    /// The buffer is reserved exactly once, up front. Nothing is retried.
    pub fn allocate_zeroed<T: Scalar>(&self, count: usize) -> Result<Vec<T>> {
        let size = self.byte_size::<T>(count)?;

        let mut buffer = Vec::new();
        if buffer.try_reserve_exact(count).is_err() {
            warn!(size, dtype = %T::DTYPE, "cpu allocator refused request");
            return Err(Error::OutOfMemory {
                size,
                device: Device::Cpu,
            });
        }
        buffer.resize(count, T::zeroed());
        Ok(buffer)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::QUInt8;

    #[test]
    fn test_allocate_zeroed() {
        let alloc = DefaultAllocator::new();

        let buffer = alloc.allocate_zeroed::<f32>(100).unwrap();
        assert_eq!(buffer.len(), 100);
        assert!(buffer.iter().all(|&x| x == 0.0));

        let codes = alloc.allocate_zeroed::<QUInt8>(6).unwrap();
        assert_eq!(codes, vec![QUInt8(0); 6]);
    }

    #[test]
    fn test_allocate_empty() {
        let alloc = DefaultAllocator::new();
        let buffer = alloc.allocate_zeroed::<QUInt8>(0).unwrap();
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_byte_size() {
        let alloc = DefaultAllocator::new();
        assert_eq!(alloc.byte_size::<f32>(6).unwrap(), 24);
        assert_eq!(alloc.byte_size::<QUInt8>(6).unwrap(), 6);
    }

    #[test]
    fn test_byte_size_overflow_is_out_of_memory() {
        let alloc = DefaultAllocator::new();
        let err = alloc.allocate_zeroed::<f32>(usize::MAX / 2).unwrap_err();
        assert!(matches!(err, Error::OutOfMemory { size: usize::MAX, .. }));
    }

    #[test]
    fn test_refused_request_is_out_of_memory() {
        let alloc = DefaultAllocator::new();
        let err = alloc.allocate_zeroed::<QUInt8>(usize::MAX / 2).unwrap_err();
        assert!(matches!(err, Error::OutOfMemory { device: Device::Cpu, .. }));
    }
}
