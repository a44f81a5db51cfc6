//! Secure-world PSCI `CPU_ON` for Allwinner A80 (sun9i) style two-cluster SoCs.
//!
//! The controller runs in the secure monitor before any OS exists. It brings a secondary
//! core online by walking the PRCM power clamp, power gating and reset lines plus the
//! CPUCFG debug/trace resets in hardware order, timing every step off the secure
//! physical timer.
//!
//! The individual power steps are only reachable through [`PsciController`], which holds
//! the cluster lock they rely on:
//!
//! ```compile_fail
//! use sunxi_psci::power::clamp_release;
//! ```

#![cfg_attr(not(test), no_std)]
#![allow(clippy::upper_case_acronyms)]

#[macro_use]
extern crate log;

pub mod arch;
pub mod config;
pub mod cpu;
mod hal;
mod power;
pub mod psci;
pub mod regs;
#[cfg(any(test, feature = "sim"))]
pub mod sim;
pub mod target_pc;
pub mod timer;

pub type PsciResult<T = ()> = Result<T, PsciError>;

pub use config::{CoreType, PlatformConfig, SUN9I_A80};
pub use cpu::CpuId;
pub use hal::{SecureHal, SysReg};
pub use power::{CLAMP_GATING_DELAY_US, CLAMP_RELEASE_STEPS, CLAMP_SET, CLAMP_STEP_DELAY_US};
pub use psci::{PsciController, PSCI_RET_INVALID_PARAMS, PSCI_RET_SUCCESS};
pub use target_pc::{StaticTargetPcTable, TargetPcTable};
pub use timer::SecureTimer;

/// PSCI failure codes.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PsciError {
    NotSupported = -1,
    InvalidParameters = -2,
    Denied = -3,
    AlreadyOn = -4,
    OnPending = -5,
    InternalFailure = -6,
    NotPresent = -7,
    Disabled = -8,
    InvalidAddress = -9,
}

impl PsciError {
    /// The value handed back to the caller in r0/x0.
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl From<PsciError> for i32 {
    fn from(err: PsciError) -> i32 {
        err.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_match_psci() {
        assert_eq!(PsciError::NotSupported.code(), -1);
        assert_eq!(PsciError::InvalidParameters.code(), PSCI_RET_INVALID_PARAMS);
        assert_eq!(i32::from(PsciError::InvalidAddress), -9);
    }
}
