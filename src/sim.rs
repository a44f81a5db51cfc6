//! Simulated register file for running the sequencer off-target.
//!
//! Every device write and every timer arm lands in an ordered trace, so a test can check
//! the exact order of a bring-up as well as the delay between two steps.

use core::cell::{Cell, RefCell};

use arrayvec::ArrayVec;
use tock_registers::LocalRegisterCopy;

use crate::hal::{SecureHal, SysReg};
use crate::regs::CNTP_CTL;

pub const SIM_MMIO_REGS_MAX: usize = 64;
pub const SIM_TRACE_MAX: usize = 256;

const SYSREG_NUM: usize = 4;
const DEFAULT_POLL_LIMIT: u32 = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// A 32-bit device register write.
    Write { addr: usize, val: u32 },
    /// The secure timer was armed for `ticks`.
    Delay { ticks: u32 },
}

pub type Trace = ArrayVec<Access, SIM_TRACE_MAX>;

pub struct SimHal {
    mmio: RefCell<ArrayVec<(usize, u32), SIM_MMIO_REGS_MAX>>,
    sysregs: RefCell<[usize; SYSREG_NUM]>,
    trace: RefCell<Trace>,
    /// Polls of an armed timer before ISTATUS shows up, `None` never expires.
    expire_after: Cell<Option<u32>>,
    poll_limit: Cell<u32>,
    polls_since_arm: Cell<u32>,
    total_polls: Cell<u32>,
    isb_count: Cell<u32>,
}

fn slot(reg: SysReg) -> usize {
    match reg {
        SysReg::Mpidr => 0,
        SysReg::CntpTval => 1,
        SysReg::CntpCtl => 2,
        SysReg::Scr => 3,
    }
}

impl SimHal {
    pub fn new() -> Self {
        Self {
            mmio: RefCell::new(ArrayVec::new()),
            sysregs: RefCell::new([0; SYSREG_NUM]),
            trace: RefCell::new(ArrayVec::new()),
            expire_after: Cell::new(Some(1)),
            poll_limit: Cell::new(DEFAULT_POLL_LIMIT),
            polls_since_arm: Cell::new(0),
            total_polls: Cell::new(0),
            isb_count: Cell::new(0),
        }
    }

    /// Makes an armed timer report expiry on poll number `polls`, or never.
    pub fn set_timer_expiry(&self, polls: Option<u32>) {
        self.expire_after.set(polls);
    }

    /// Panics once a single wait polls the timer more than `limit` times.
    pub fn set_poll_limit(&self, limit: u32) {
        self.poll_limit.set(limit);
    }

    pub fn total_polls(&self) -> u32 {
        self.total_polls.get()
    }

    pub fn isb_count(&self) -> u32 {
        self.isb_count.get()
    }

    pub fn sysreg(&self, reg: SysReg) -> usize {
        self.sysregs.borrow()[slot(reg)]
    }

    pub fn set_sysreg(&self, reg: SysReg, val: usize) {
        self.sysregs.borrow_mut()[slot(reg)] = val;
    }

    /// Current value of a device register, zero if never written.
    pub fn peek(&self, addr: usize) -> u32 {
        self.mmio
            .borrow()
            .iter()
            .find(|(a, _)| *a == addr)
            .map(|(_, v)| *v)
            .unwrap_or(0)
    }

    /// Presets a device register without tracing it.
    pub fn poke(&self, addr: usize, val: u32) {
        let mut mmio = self.mmio.borrow_mut();
        match mmio.iter_mut().find(|(a, _)| *a == addr) {
            Some(entry) => entry.1 = val,
            None => mmio.push((addr, val)),
        }
    }

    pub fn trace(&self) -> Trace {
        self.trace.borrow().clone()
    }

    /// Values written to `addr`, oldest first.
    pub fn writes_to(&self, addr: usize) -> ArrayVec<u32, SIM_TRACE_MAX> {
        self.trace
            .borrow()
            .iter()
            .filter_map(|access| match *access {
                Access::Write { addr: a, val } if a == addr => Some(val),
                _ => None,
            })
            .collect()
    }

    pub fn clear_trace(&self) {
        self.trace.borrow_mut().clear();
    }

    fn record(&self, access: Access) {
        self.trace.borrow_mut().push(access);
    }

    fn poll_timer(&self) -> usize {
        let mut ctl =
            LocalRegisterCopy::<usize, CNTP_CTL::Register>::new(self.sysreg(SysReg::CntpCtl));
        if !ctl.is_set(CNTP_CTL::ENABLE) {
            return ctl.get();
        }
        let polls = self.polls_since_arm.get() + 1;
        self.polls_since_arm.set(polls);
        self.total_polls.set(self.total_polls.get() + 1);
        if polls > self.poll_limit.get() {
            panic!("secure timer never expired after {} polls", polls - 1);
        }
        if matches!(self.expire_after.get(), Some(n) if polls >= n) {
            ctl.modify(CNTP_CTL::ISTATUS::SET);
        }
        ctl.get()
    }
}

impl Default for SimHal {
    fn default() -> Self {
        Self::new()
    }
}

impl SecureHal for SimHal {
    fn read_sysreg(&self, reg: SysReg) -> usize {
        match reg {
            SysReg::CntpCtl => self.poll_timer(),
            _ => self.sysreg(reg),
        }
    }

    fn write_sysreg(&self, reg: SysReg, val: usize) {
        if reg == SysReg::CntpCtl {
            let mut ctl = LocalRegisterCopy::<usize, CNTP_CTL::Register>::new(val);
            // ISTATUS is read-only
            ctl.modify(CNTP_CTL::ISTATUS::CLEAR);
            if ctl.is_set(CNTP_CTL::ENABLE) {
                self.polls_since_arm.set(0);
                self.record(Access::Delay {
                    ticks: self.sysreg(SysReg::CntpTval) as u32,
                });
            }
            self.set_sysreg(reg, ctl.get());
        } else {
            self.set_sysreg(reg, val);
        }
    }

    fn isb(&self) {
        self.isb_count.set(self.isb_count.get() + 1);
    }

    fn read32(&self, addr: usize) -> u32 {
        self.peek(addr)
    }

    fn write32(&self, addr: usize, val: u32) {
        self.poke(addr, val);
        self.record(Access::Write { addr, val });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mmio_writes_are_traced_pokes_are_not() {
        let hal = SimHal::new();
        hal.poke(0x100, 0xf0);
        hal.clrbits32(0x100, 0x10);
        hal.setbits32(0x104, 0x1);
        assert_eq!(hal.peek(0x100), 0xe0);
        assert_eq!(hal.peek(0x104), 0x1);
        assert_eq!(
            hal.trace().as_slice(),
            &[
                Access::Write { addr: 0x100, val: 0xe0 },
                Access::Write { addr: 0x104, val: 0x1 },
            ]
        );
    }

    #[test]
    fn disabled_timer_is_not_counted() {
        let hal = SimHal::new();
        assert_eq!(hal.read_sysreg(SysReg::CntpCtl), 0);
        assert_eq!(hal.total_polls(), 0);
    }
}
