/// Privileged system registers touched by the power sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SysReg {
    /// Multiprocessor affinity register.
    Mpidr,
    /// Secure physical timer countdown value.
    CntpTval,
    /// Secure physical timer control/status.
    CntpCtl,
    /// Secure configuration register.
    Scr,
}

/// The interfaces which the underlying platform (a real core or a simulator) must implement.
pub trait SecureHal {
    /// Reads a privileged system register.
    fn read_sysreg(&self, reg: SysReg) -> usize;
    /// Writes a privileged system register.
    fn write_sysreg(&self, reg: SysReg, val: usize);
    /// Instruction synchronization barrier.
    fn isb(&self);
    /// Reads a 32-bit device register.
    fn read32(&self, addr: usize) -> u32;
    /// Writes a 32-bit device register.
    fn write32(&self, addr: usize, val: u32);

    /// Read-modify-write that sets `mask` in the register at `addr`.
    fn setbits32(&self, addr: usize, mask: u32) {
        let val = self.read32(addr);
        self.write32(addr, val | mask);
    }

    /// Read-modify-write that clears `mask` in the register at `addr`.
    fn clrbits32(&self, addr: usize, mask: u32) {
        let val = self.read32(addr);
        self.write32(addr, val & !mask);
    }
}
