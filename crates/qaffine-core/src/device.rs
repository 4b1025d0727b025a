//! Device Abstraction - Memory Space Tags
//!
//! Identifies the memory space a storage buffer lives in. QAffine only
//! computes on host memory; accelerator tags exist so that buffers produced
//! elsewhere can be recognised and rejected with a clear error instead of
//! being read as if they were host memory.
//!
//! # Example
//! ```rust
//! use qaffine_core::Device;
//!
//! let cpu = Device::Cpu;
//! assert!(cpu.is_available());
//! assert!(cpu.is_cpu());
//! assert_eq!(Device::default(), Device::Cpu);
//! ```
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use core::fmt;

// =============================================================================
// Device Enum
// =============================================================================

/// Represents the memory space where a buffer is allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Device {
    /// Host memory (always available).
    #[default]
    Cpu,

    /// NVIDIA CUDA GPU memory with device index.
    Cuda(usize),

    /// Apple Metal GPU memory with device index.
    Metal(usize),
}

impl Device {
    /// Returns true if QAffine can allocate and compute on this device.
    #[must_use]
    pub const fn is_available(self) -> bool {
        self.is_cpu()
    }

    /// Returns true if this is a CPU device.
    #[must_use]
    pub const fn is_cpu(self) -> bool {
        matches!(self, Self::Cpu)
    }

    /// Returns the device index for GPU devices, or 0 for CPU.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Cpu => 0,
            Self::Cuda(idx) | Self::Metal(idx) => idx,
        }
    }

    /// Returns the name of this device type.
    #[must_use]
    pub const fn device_type(self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Cuda(_) => "cuda",
            Self::Metal(_) => "metal",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_cpu() {
            f.write_str(self.device_type())
        } else {
            write!(f, "{}:{}", self.device_type(), self.index())
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
    fn test_cpu_device() {
        let device = Device::Cpu;
        assert!(device.is_cpu());
        assert!(device.is_available());
        assert_eq!(device.device_type(), "cpu");
        assert_eq!(device.index(), 0);
    }

    #[test]
    fn test_gpu_devices_are_not_available() {
        let cuda = Device::Cuda(2);
        assert!(!cuda.is_available());
        assert_eq!(cuda.index(), 2);
        assert_eq!(Device::Metal(0).device_type(), "metal");
    }

    #[test]
    fn test_device_display() {
        assert_eq!(format!("{}", Device::Cpu), "cpu");
        assert_eq!(format!("{}", Device::Cuda(0)), "cuda:0");
        assert_eq!(format!("{}", Device::Metal(3)), "metal:3");
    }
}
