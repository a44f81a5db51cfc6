//! Hardware backends of [`SecureHal`](crate::SecureHal), one per target architecture.
//!
//! Other targets, including the host, have no backend and use [`crate::sim`] instead.

#[cfg(target_arch = "aarch64")]
mod aarch64;
#[cfg(target_arch = "arm")]
mod armv7;

#[cfg(target_arch = "aarch64")]
pub use aarch64::El3Hal;
#[cfg(target_arch = "arm")]
pub use armv7::Cp15Hal;

/// Device registers must be mapped device/strongly-ordered, so plain volatile accesses
/// keep program order.
#[cfg(any(target_arch = "arm", target_arch = "aarch64"))]
#[inline(always)]
unsafe fn mmio_read32(addr: usize) -> u32 {
    core::ptr::read_volatile(addr as *const u32)
}

#[cfg(any(target_arch = "arm", target_arch = "aarch64"))]
#[inline(always)]
unsafe fn mmio_write32(addr: usize, val: u32) {
    core::ptr::write_volatile(addr as *mut u32, val)
}
