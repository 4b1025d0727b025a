//! Storage - Reference-Counted Buffers for Tensors
//!
//! Storage owns a contiguous buffer tagged with the device it lives on.
//! Clones share the buffer, so every tensor holding it keeps the memory
//! alive until the last owner drops.
//!
//! # Example
//! ```rust
//! use qaffine_core::{Device, Storage};
//!
//! let storage = Storage::<f32>::try_zeros(100, Device::Cpu).unwrap();
//! assert_eq!(storage.len(), 100);
//! assert!(storage.is_resizable());
//! ```
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use core::ops::{Deref, DerefMut};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::allocator::DefaultAllocator;
use crate::device::Device;
use crate::dtype::Scalar;
use crate::error::{Error, Result};

// =============================================================================
// Storage Struct
// =============================================================================

/// Raw memory storage for tensor data.
#[derive(Debug)]
pub struct Storage<T: Scalar> {
    /// The underlying data buffer.
    inner: Arc<RwLock<StorageInner<T>>>,
    /// Number of elements.
    len: usize,
}

/// Inner storage data shared between clones.
#[derive(Debug)]
struct StorageInner<T: Scalar> {
    /// Owned element buffer.
    data: Vec<T>,
    /// The device this storage resides on.
    device: Device,
    /// Whether the buffer may be grown or shrunk after creation.
    resizable: bool,
}

impl<T: Scalar> Storage<T> {
    /// Allocates zero-initialised, resizable storage through the default allocator.
    ///
    /// # Arguments
    /// * `len` - Number of elements to allocate
    /// * `device` - Device to allocate on
    ///
    /// # Returns
    /// `UnsupportedDevice` for anything but the CPU, `OutOfMemory` if the
    /// allocator refuses the request.
    pub fn try_zeros(len: usize, device: Device) -> Result<Self> {
        if !device.is_cpu() {
            return Err(Error::UnsupportedDevice { device });
        }

        let data = DefaultAllocator::new().allocate_zeroed::<T>(len)?;
        Ok(Self::with_inner(data, device, true))
    }

    /// Wraps an existing vector produced on `device`.
    ///
    /// The buffer is taken as-is and is not resizable.
    #[must_use]
    pub fn from_vec(data: Vec<T>, device: Device) -> Self {
        Self::with_inner(data, device, false)
    }

    /// Creates storage from a slice by copying the data.
    #[must_use]
    pub fn from_slice(data: &[T], device: Device) -> Self {
        Self::from_vec(data.to_vec(), device)
    }

    fn with_inner(data: Vec<T>, device: Device, resizable: bool) -> Self {
        let len = data.len();
        Self {
            inner: Arc::new(RwLock::new(StorageInner {
                data,
                device,
                resizable,
            })),
            len,
        }
    }

    /// Returns the number of elements.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the storage is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the device this storage is on.
    #[must_use]
    pub fn device(&self) -> Device {
        self.inner.read().device
    }

    /// Returns the dtype of the stored elements.
    #[must_use]
    pub fn dtype(&self) -> crate::dtype::DType {
        T::DTYPE
    }

    /// Returns the size in bytes of the buffer.
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.len * core::mem::size_of::<T>()
    }

    /// Returns true if the buffer was allocated as resizable.
    #[must_use]
    pub fn is_resizable(&self) -> bool {
        self.inner.read().resizable
    }

    /// Returns true if this storage is uniquely owned (not shared).
    #[must_use]
    pub fn is_unique(&self) -> bool {
        Arc::strong_count(&self.inner) == 1
    }

    /// Resizes the buffer to `new_len` elements, zero-filling any new tail.
    ///
    /// Only uniquely owned, resizable buffers can be resized.
    pub fn resize(&mut self, new_len: usize) -> Result<()> {
        if !self.is_unique() {
            return Err(Error::invalid_operation("cannot resize shared storage"));
        }

        let mut inner = self.inner.write();
        if !inner.resizable {
            return Err(Error::invalid_operation("storage is not resizable"));
        }
        if new_len > inner.data.len() {
            let additional = new_len - inner.data.len();
            if inner.data.try_reserve_exact(additional).is_err() {
                return Err(Error::OutOfMemory {
                    size: new_len.saturating_mul(core::mem::size_of::<T>()),
                    device: inner.device,
                });
            }
        }
        inner.data.resize(new_len, T::zeroed());
        drop(inner);

        self.len = new_len;
        Ok(())
    }

    /// Returns an immutable view of the data.
    #[must_use]
    pub fn as_slice(&self) -> StorageReadGuard<'_, T> {
        StorageReadGuard {
            guard: self.inner.read(),
        }
    }

    /// Returns a mutable view of the data.
    #[must_use]
    pub fn as_slice_mut(&self) -> StorageWriteGuard<'_, T> {
        StorageWriteGuard {
            guard: self.inner.write(),
        }
    }
}

impl<T: Scalar> Clone for Storage<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            len: self.len,
        }
    }
}

// =============================================================================
// Guard Types for Safe Access
// =============================================================================

/// Read guard for storage data.
pub struct StorageReadGuard<'a, T: Scalar> {
    guard: parking_lot::RwLockReadGuard<'a, StorageInner<T>>,
}

impl<T: Scalar> Deref for StorageReadGuard<'_, T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.guard.data
    }
}

/// Write guard for storage data.
pub struct StorageWriteGuard<'a, T: Scalar> {
    guard: parking_lot::RwLockWriteGuard<'a, StorageInner<T>>,
}

impl<T: Scalar> Deref for StorageWriteGuard<'_, T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.guard.data
    }
}

impl<T: Scalar> DerefMut for StorageWriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard.data
    }
}

// =============================================================================
// Tests
// =============================================================================
