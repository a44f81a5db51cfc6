// Copyright (c) 2023 Beihang University, Huawei Technologies Co.,Ltd. All rights reserved.
// Rust-Shyper is licensed under Mulan PSL v2.
// You can use this software according to the terms and conditions of the Mulan PSL v2.
// You may obtain a copy of Mulan PSL v2 at:
//          http://license.coscl.org.cn/MulanPSL2
// THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY KIND,
// EITHER EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO NON-INFRINGEMENT,
// MERCHANTABILITY OR FIT FOR A PARTICULAR PURPOSE.
// See the Mulan PSL v2 for more details.

pub const CLUSTER_NUM_MAX: usize = 2;
pub const CORES_PER_CLUSTER: usize = 4;
pub const CPU_NUM_MAX: usize = CLUSTER_NUM_MAX * CORES_PER_CLUSTER;

const PRCM_CPU_RST: usize = 0x4;
const PRCM_CPU_PWROFF: usize = 0x100;
const PRCM_CPU_PWR_CLAMP: usize = 0x140;
const PRCM_CPU_SOFT_ENTRY: usize = 0x164;

const CPUCFG_CLUSTER_CTRL0: usize = 0x0;
const CPUCFG_CLUSTER_RESET: usize = 0x80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreType {
    CortexA7,
    CortexA15,
}

/// Addresses and rates of one SoC, handed to the controller at construction.
#[derive(Debug, Clone, Copy)]
pub struct PlatformConfig {
    /// Power/reset controller block.
    pub prcm_base: usize,
    /// Core configuration block.
    pub cpucfg_base: usize,
    pub timer_freq_hz: u32,
    pub cluster_cores: [CoreType; CLUSTER_NUM_MAX],
}

/// Allwinner A80: a Cortex-A7 cluster followed by a Cortex-A15 cluster.
pub const SUN9I_A80: PlatformConfig = PlatformConfig {
    prcm_base: 0x0800_1400,
    cpucfg_base: 0x0170_0000,
    timer_freq_hz: 24_000_000,
    cluster_cores: [CoreType::CortexA7, CoreType::CortexA15],
};

impl PlatformConfig {
    /// Secure timer ticks in one microsecond.
    pub const fn ticks_per_us(&self) -> u32 {
        self.timer_freq_hz / 1_000_000
    }

    pub fn core_type(&self, cluster: u32) -> CoreType {
        self.cluster_cores[cluster as usize]
    }

    /// Whether `cluster` needs the Cortex-A7 L1 and ETM reset handling.
    pub fn is_cortex_a7(&self, cluster: u32) -> bool {
        self.core_type(cluster) == CoreType::CortexA7
    }

    /// Per-cluster power-on reset, one active-low bit per core.
    pub const fn cpu_rst(&self, cluster: u32) -> usize {
        self.prcm_base + PRCM_CPU_RST + 4 * cluster as usize
    }

    /// Per-cluster power gating, one bit per core, set means gated off.
    pub const fn cpu_pwroff(&self, cluster: u32) -> usize {
        self.prcm_base + PRCM_CPU_PWROFF + 4 * cluster as usize
    }

    pub const fn cpu_pwr_clamp(&self, cluster: u32, core: u32) -> usize {
        self.prcm_base + PRCM_CPU_PWR_CLAMP + 0x10 * cluster as usize + 4 * core as usize
    }

    /// Where every secondary core starts executing once released.
    pub const fn cpu_soft_entry(&self) -> usize {
        self.prcm_base + PRCM_CPU_SOFT_ENTRY
    }

    pub const fn cluster_ctrl0(&self, cluster: u32) -> usize {
        self.cpucfg_base + CPUCFG_CLUSTER_CTRL0 + 0x10 * cluster as usize
    }

    pub const fn cluster_reset(&self, cluster: u32) -> usize {
        self.cpucfg_base + CPUCFG_CLUSTER_RESET + 4 * cluster as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sun9i_register_map() {
        let c = SUN9I_A80;
        assert_eq!(c.ticks_per_us(), 24);
        assert_eq!(c.cpu_rst(1), 0x0800_1408);
        assert_eq!(c.cpu_pwroff(0), 0x0800_1500);
        assert_eq!(c.cpu_pwr_clamp(0, 3), 0x0800_154c);
        assert_eq!(c.cpu_pwr_clamp(1, 0), 0x0800_1550);
        assert_eq!(c.cpu_soft_entry(), 0x0800_1564);
        assert_eq!(c.cluster_ctrl0(1), 0x0170_0010);
        assert_eq!(c.cluster_reset(0), 0x0170_0080);
        assert!(c.is_cortex_a7(0));
        assert!(!c.is_cortex_a7(1));
    }
}
