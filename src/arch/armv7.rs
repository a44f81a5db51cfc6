// Copyright (c) 2023 Beihang University, Huawei Technologies Co.,Ltd. All rights reserved.
// Rust-Shyper is licensed under Mulan PSL v2.
// You can use this software according to the terms and conditions of the Mulan PSL v2.
// You may obtain a copy of Mulan PSL v2 at:
//          http://license.coscl.org.cn/MulanPSL2
// THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY KIND,
// EITHER EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO NON-INFRINGEMENT,
// MERCHANTABILITY OR FIT FOR A PARTICULAR PURPOSE.
// See the Mulan PSL v2 for more details.

use super::{mmio_read32, mmio_write32};
use crate::hal::{SecureHal, SysReg};

// Move to ARM register from CP15.
// MRC p15, opc1, Rt, CRn, CRm, opc2 "Rt = cp15"
macro_rules! mrc {
    ($val: expr, $opc1: literal, $crn: ident, $crm: ident, $opc2: literal) => {
        unsafe {
            core::arch::asm!(
                concat!("mrc p15, ", stringify!($opc1), ", {0}, ", stringify!($crn), ", ",
                    stringify!($crm), ", ", stringify!($opc2)),
                out(reg) $val, options(nomem, nostack));
        }
    };
}

// Move to CP15 from ARM register.
// MCR p15, opc1, Rt, CRn, CRm, opc2 "cp15 = Rt"
macro_rules! mcr {
    ($val: expr, $opc1: literal, $crn: ident, $crm: ident, $opc2: literal) => {
        unsafe {
            core::arch::asm!(
                concat!("mcr p15, ", stringify!($opc1), ", {0}, ", stringify!($crn), ", ",
                    stringify!($crm), ", ", stringify!($opc2)),
                in(reg) $val, options(nomem, nostack));
        }
    };
}

/// ARMv7 monitor-mode backend: CP15 accessors and the secure physical timer.
pub struct Cp15Hal {
    _private: (),
}

impl Cp15Hal {
    /// # Safety
    ///
    /// Must run in secure monitor mode, and every address later handed to `read32` or
    /// `write32` must be a mapped device register.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl SecureHal for Cp15Hal {
    fn read_sysreg(&self, reg: SysReg) -> usize {
        let val: usize;
        match reg {
            SysReg::Mpidr => mrc!(val, 0, c0, c0, 5),
            SysReg::CntpTval => mrc!(val, 0, c14, c2, 0),
            SysReg::CntpCtl => mrc!(val, 0, c14, c2, 1),
            SysReg::Scr => mrc!(val, 0, c1, c1, 0),
        }
        val
    }

    fn write_sysreg(&self, reg: SysReg, val: usize) {
        match reg {
            // read-only
            SysReg::Mpidr => {}
            SysReg::CntpTval => mcr!(val, 0, c14, c2, 0),
            SysReg::CntpCtl => mcr!(val, 0, c14, c2, 1),
            SysReg::Scr => mcr!(val, 0, c1, c1, 0),
        }
    }

    #[inline(always)]
    fn isb(&self) {
        unsafe { core::arch::asm!("isb", options(nostack)) }
    }

    fn read32(&self, addr: usize) -> u32 {
        unsafe { mmio_read32(addr) }
    }

    fn write32(&self, addr: usize, val: u32) {
        unsafe { mmio_write32(addr, val) }
    }
}
