use core::sync::atomic::{AtomicU32, Ordering};

use crate::config::CPU_NUM_MAX;
use crate::cpu::CpuId;

/// Where released secondary cores go.
///
/// All secondaries start at one shared entry routine, which looks up its own resume
/// address by dense id.
pub trait TargetPcTable {
    /// Records the address `cpu` should resume at.
    fn save_target_pc(&self, cpu: CpuId, pc: u32);
    /// Physical address of the shared secondary entry routine.
    fn entry_point(&self) -> u32;
}

/// Fixed-size table usable from a `static`.
pub struct StaticTargetPcTable {
    entry: u32,
    pcs: [AtomicU32; CPU_NUM_MAX],
}

impl StaticTargetPcTable {
    pub const fn new(entry: u32) -> Self {
        Self {
            entry,
            pcs: [const { AtomicU32::new(0) }; CPU_NUM_MAX],
        }
    }

    pub fn target_pc(&self, cpu: CpuId) -> u32 {
        self.pcs[cpu.raw() as usize].load(Ordering::Acquire)
    }
}

impl TargetPcTable for StaticTargetPcTable {
    fn save_target_pc(&self, cpu: CpuId, pc: u32) {
        self.pcs[cpu.raw() as usize].store(pc, Ordering::Release);
    }

    fn entry_point(&self) -> u32 {
        self.entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static TABLE: StaticTargetPcTable = StaticTargetPcTable::new(0x4000_0000);

    #[test]
    fn pcs_are_kept_per_core() {
        TABLE.save_target_pc(CpuId::new(0, 1), 0x4800_0000);
        TABLE.save_target_pc(CpuId::new(1, 1), 0x4900_0000);
        assert_eq!(TABLE.target_pc(CpuId::new(0, 1)), 0x4800_0000);
        assert_eq!(TABLE.target_pc(CpuId::new(1, 1)), 0x4900_0000);
        assert_eq!(TABLE.target_pc(CpuId::new(0, 2)), 0);
        assert_eq!(TABLE.entry_point(), 0x4000_0000);
    }
}
