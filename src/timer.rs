// Copyright (c) 2023 Beihang University, Huawei Technologies Co.,Ltd. All rights reserved.
// Rust-Shyper is licensed under Mulan PSL v2.
// You can use this software according to the terms and conditions of the Mulan PSL v2.
// You may obtain a copy of Mulan PSL v2 at:
//          http://license.coscl.org.cn/MulanPSL2
// THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY KIND,
// EITHER EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO NON-INFRINGEMENT,
// MERCHANTABILITY OR FIT FOR A PARTICULAR PURPOSE.
// See the Mulan PSL v2 for more details.

use tock_registers::LocalRegisterCopy;

use crate::hal::{SecureHal, SysReg};
use crate::regs::CNTP_CTL;

/// Busy-wait delays on the core-local secure physical timer.
///
/// Only usable where nothing else owns that timer: every wait reprograms it and leaves it
/// disabled.
pub struct SecureTimer<'a, H: SecureHal> {
    hal: &'a H,
    ticks_per_us: u32,
}

impl<'a, H: SecureHal> SecureTimer<'a, H> {
    pub const fn new(hal: &'a H, ticks_per_us: u32) -> Self {
        Self { hal, ticks_per_us }
    }

    /// Spins for about `us` microseconds.
    ///
    /// The expiry is observed by polling ISTATUS with the interrupt masked. There is no
    /// timeout: a timer that never fires hangs the caller here.
    pub fn udelay(&self, us: u32) {
        let ticks = self.ticks_per_us.saturating_mul(us);
        let ctl = CNTP_CTL::ENABLE::SET + CNTP_CTL::IMASK::SET;

        self.hal.write_sysreg(SysReg::CntpTval, ticks as usize);
        self.hal.isb();
        self.hal.write_sysreg(SysReg::CntpCtl, ctl.value);

        loop {
            self.hal.isb();
            let status = LocalRegisterCopy::<usize, CNTP_CTL::Register>::new(
                self.hal.read_sysreg(SysReg::CntpCtl),
            );
            if status.is_set(CNTP_CTL::ISTATUS) {
                break;
            }
            core::hint::spin_loop();
        }

        self.hal.write_sysreg(SysReg::CntpCtl, 0);
        self.hal.isb();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Access, SimHal};

    #[test]
    fn programs_ticks_and_waits_for_status() {
        let hal = SimHal::new();
        hal.set_timer_expiry(Some(3));
        SecureTimer::new(&hal, 1).udelay(10);

        assert_eq!(hal.sysreg(SysReg::CntpTval), 10);
        assert_eq!(hal.trace().as_slice(), &[Access::Delay { ticks: 10 }]);
        assert_eq!(hal.total_polls(), 3);
        // Left disabled for the next user.
        assert_eq!(hal.sysreg(SysReg::CntpCtl), 0);
    }

    #[test]
    fn scales_by_timer_frequency() {
        let hal = SimHal::new();
        SecureTimer::new(&hal, 24).udelay(20);
        assert_eq!(hal.trace().as_slice(), &[Access::Delay { ticks: 480 }]);
    }

    #[test]
    fn zero_delay_still_waits_for_expiry() {
        let hal = SimHal::new();
        SecureTimer::new(&hal, 24).udelay(0);
        assert_eq!(hal.trace().as_slice(), &[Access::Delay { ticks: 0 }]);
        assert_eq!(hal.total_polls(), 1);
    }

    #[test]
    #[should_panic(expected = "never expired")]
    fn hangs_when_timer_never_fires() {
        let hal = SimHal::new();
        hal.set_timer_expiry(None);
        hal.set_poll_limit(1000);
        SecureTimer::new(&hal, 1).udelay(10);
    }
}
