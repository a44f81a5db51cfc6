//! Dense CPU ids.
//!
//! Cores 0~3 live in the first cluster and 4~7 in the second. All power code works on
//! these ids, so MPIDR style values must be converted first.

use core::fmt;

use crate::hal::{SecureHal, SysReg};

const CLUSTER_SHIFT: u32 = 2;
const CORE_MASK: u32 = 0x3;

/// Dense id of an MPIDR value: cluster bit 8 moves to bit 2, core stays in bits 1:0.
///
/// Kept branch-free and to two temporaries so it can be lowered into the stackless
/// monitor entry.
#[inline(always)]
pub const fn dense_id_from_mpidr(mpidr: u32) -> u32 {
    ((mpidr >> 6) & 4) | (mpidr & CORE_MASK)
}

/// Dense id of the calling core.
#[inline(always)]
pub fn current_dense_id<H: SecureHal>(hal: &H) -> u32 {
    dense_id_from_mpidr(hal.read_sysreg(SysReg::Mpidr) as u32)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CpuId(u32);

impl CpuId {
    pub const fn new(cluster: u32, core: u32) -> Self {
        Self((core & CORE_MASK) | ((cluster & 1) << CLUSTER_SHIFT))
    }

    pub const fn from_mpidr(mpidr: u32) -> Self {
        Self(dense_id_from_mpidr(mpidr))
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn cluster(self) -> u32 {
        (self.0 >> CLUSTER_SHIFT) & 1
    }

    #[inline]
    pub const fn core(self) -> u32 {
        self.0 & CORE_MASK
    }
}

impl fmt::Display for CpuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cpu{} (cluster {} core {})", self.0, self.cluster(), self.core())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimHal;

    #[test]
    fn dense_id_of_mpidr() {
        assert_eq!(dense_id_from_mpidr(0x100), 4);
        assert_eq!(dense_id_from_mpidr(0x002), 2);
        assert_eq!(dense_id_from_mpidr(0x103), 7);
        // Upper affinity and multithreading bits do not leak in.
        assert_eq!(dense_id_from_mpidr(0x8000_0001), 1);
    }

    #[test]
    fn dense_id_matches_decomposition() {
        for cluster in 0..2u32 {
            for core in 0..4u32 {
                let mpidr = (cluster << 8) | core;
                let id = CpuId::from_mpidr(mpidr);
                assert_eq!(id, CpuId::new(cluster, core));
                assert_eq!(id.raw(), core | (cluster << 2));
                assert_eq!((id.cluster(), id.core()), (cluster, core));
            }
        }
    }

    #[test]
    fn current_core() {
        let hal = SimHal::new();
        hal.set_sysreg(SysReg::Mpidr, 0x8000_0102);
        assert_eq!(current_dense_id(&hal), 6);
    }
}
