//! Field layouts of the system and device registers the sequencer touches.

use tock_registers::fields::Field;
use tock_registers::{register_bitfields, RegisterLongName};

register_bitfields! [
    usize,
    /// Secure physical timer control (CNTP_CTL / CNTPS_CTL_EL1).
    pub CNTP_CTL [
        ENABLE OFFSET(0) NUMBITS(1) [],
        IMASK OFFSET(1) NUMBITS(1) [],
        ISTATUS OFFSET(2) NUMBITS(1) []
    ],
    /// Secure configuration register.
    pub SCR [
        // Lower exception levels default to the non-secure state.
        NS OFFSET(0) NUMBITS(1) []
    ]
];

register_bitfields! [
    u32,
    pub MPIDR [
        AFF0 OFFSET(0) NUMBITS(8) [],
        AFF1 OFFSET(8) NUMBITS(8) []
    ],
    /// CPUCFG `Cx_CTRL_REG0`.
    pub CX_CTRL0 [
        // Active low, one bit per core. Cortex-A7 only.
        L1_RST_DISABLE OFFSET(0) NUMBITS(4) []
    ],
    /// CPUCFG `Cx_RST_CTRL`. Every field is active low, one bit per core.
    pub CX_RST_CTRL [
        CORE_RST OFFSET(0) NUMBITS(4) [],
        DBG_RST OFFSET(16) NUMBITS(4) [],
        ETM_RST OFFSET(20) NUMBITS(4) []
    ]
];

/// Mask selecting `core`'s bit inside a per-core field.
#[inline(always)]
pub fn core_bit<R: RegisterLongName>(field: Field<u32, R>, core: u32) -> u32 {
    debug_assert!(field.mask >> core != 0, "core {} outside of field", core);
    1 << (field.shift + core as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tock_registers::LocalRegisterCopy;

    #[test]
    fn per_core_bits() {
        assert_eq!(core_bit(CX_RST_CTRL::CORE_RST, 0), 1 << 0);
        assert_eq!(core_bit(CX_RST_CTRL::DBG_RST, 2), 1 << 18);
        assert_eq!(core_bit(CX_RST_CTRL::ETM_RST, 3), 1 << 23);
        assert_eq!(core_bit(CX_CTRL0::L1_RST_DISABLE, 1), 1 << 1);
    }

    #[test]
    fn timer_status_decode() {
        let ctl = LocalRegisterCopy::<usize, CNTP_CTL::Register>::new(0b111);
        assert!(ctl.is_set(CNTP_CTL::ENABLE));
        assert!(ctl.is_set(CNTP_CTL::ISTATUS));
        assert_eq!((CNTP_CTL::ENABLE::SET + CNTP_CTL::IMASK::SET).value, 0b011);
    }
}
