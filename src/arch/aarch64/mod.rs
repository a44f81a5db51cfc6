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

// Move to ARM register from system coprocessor register.
// MRS Xd, sysreg "Xd = sysreg"
macro_rules! mrs {
    ($val: expr, $reg: expr) => {
        unsafe {
            core::arch::asm!(
                concat!("mrs {0}, ", stringify!($reg)),
                out(reg) $val,
                options(nomem, nostack)
            );
        }
    };
}

// Move to system coprocessor register from ARM register.
// MSR sysreg, Xn "sysreg = Xn"
macro_rules! msr {
    ($reg: expr, $val: expr) => {
        unsafe {
            core::arch::asm!(
                concat!("msr ", stringify!($reg), ", {0}"),
                in(reg) $val,
                options(nomem, nostack)
            );
        }
    };
}

/// EL3 backend. The secure physical timer is CNTPS_*_EL1 here.
pub struct El3Hal {
    _private: (),
}

impl El3Hal {
    /// # Safety
    ///
    /// Must run at EL3, and every address later handed to `read32` or `write32` must be a
    /// mapped device register.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl SecureHal for El3Hal {
    fn read_sysreg(&self, reg: SysReg) -> usize {
        let val: usize;
        match reg {
            SysReg::Mpidr => mrs!(val, MPIDR_EL1),
            SysReg::CntpTval => mrs!(val, CNTPS_TVAL_EL1),
            SysReg::CntpCtl => mrs!(val, CNTPS_CTL_EL1),
            SysReg::Scr => mrs!(val, SCR_EL3),
        }
        val
    }

    fn write_sysreg(&self, reg: SysReg, val: usize) {
        match reg {
            // read-only
            SysReg::Mpidr => {}
            SysReg::CntpTval => msr!(CNTPS_TVAL_EL1, val),
            SysReg::CntpCtl => msr!(CNTPS_CTL_EL1, val),
            SysReg::Scr => msr!(SCR_EL3, val),
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
