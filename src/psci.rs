use spin::Mutex;
use tock_registers::LocalRegisterCopy;

use crate::config::{PlatformConfig, CLUSTER_NUM_MAX};
use crate::cpu::{current_dense_id, CpuId};
use crate::hal::{SecureHal, SysReg};
use crate::power;
use crate::regs::{core_bit, CX_CTRL0, CX_RST_CTRL, MPIDR, SCR};
use crate::target_pc::TargetPcTable;
use crate::{PsciError, PsciResult};

pub const PSCI_RET_SUCCESS: i32 = 0;
pub const PSCI_RET_INVALID_PARAMS: i32 = PsciError::InvalidParameters.code();

/// Secure-side PSCI power controller for one SoC.
///
/// Methods take `&self` so a controller can sit in a `static` shared by every core. The
/// reset and gating registers are shared per cluster and updated with read-modify-write,
/// so each bring-up holds its cluster's lock from the first reset change to the last.
pub struct PsciController<H: SecureHal, T: TargetPcTable> {
    hal: H,
    config: PlatformConfig,
    targets: T,
    cluster_locks: [Mutex<()>; CLUSTER_NUM_MAX],
}

impl<H: SecureHal, T: TargetPcTable> PsciController<H, T> {
    pub const fn new(hal: H, config: PlatformConfig, targets: T) -> Self {
        Self {
            hal,
            config,
            targets,
            cluster_locks: [const { Mutex::new(()) }; CLUSTER_NUM_MAX],
        }
    }

    pub fn hal(&self) -> &H {
        &self.hal
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    pub fn targets(&self) -> &T {
        &self.targets
    }

    /// Dense id of the calling core.
    pub fn get_dense_core_id(&self) -> u32 {
        current_dense_id(&self.hal)
    }

    /// PSCI `CPU_ON`, returning the PSCI status code.
    pub fn cpu_on(&self, mpidr: u32, pc: u32) -> i32 {
        match self.try_cpu_on(mpidr, pc) {
            Ok(()) => PSCI_RET_SUCCESS,
            Err(err) => err.code(),
        }
    }

    /// Powers up the core addressed by `mpidr` and releases it towards `pc`.
    ///
    /// Only the first cluster is supported; anything else is refused before any register
    /// is touched.
    pub fn try_cpu_on(&self, mpidr: u32, pc: u32) -> PsciResult {
        let affinity = LocalRegisterCopy::<u32, MPIDR::Register>::new(mpidr);
        let cluster = affinity.read(MPIDR::AFF1);
        let core = affinity.read(MPIDR::AFF0) & 0x3;

        // TODO: bring up the Cortex-A15 cluster once its CCI port and NEON resets are handled.
        if cluster > 0 {
            warn!("psci_cpu_on: cluster {} not supported, mpidr {:#x}", cluster, mpidr);
            return Err(PsciError::InvalidParameters);
        }

        let cpu = CpuId::new(cluster, core);
        let hal = &self.hal;
        let cfg = &self.config;
        let cortex_a7 = cfg.is_cortex_a7(cluster);
        let cluster_reset = cfg.cluster_reset(cluster);

        let _guard = self.cluster_locks[cluster as usize].lock();
        debug!("psci_cpu_on: {} entry {:#x}", cpu, pc);

        self.targets.save_target_pc(cpu, pc);
        hal.write32(cfg.cpu_soft_entry(), self.targets.entry_point());

        // Assert power-on reset
        hal.clrbits32(cfg.cpu_rst(cluster), 1 << core);

        // Cortex-A7: hold the L1 cache reset disable signal low
        if cortex_a7 {
            hal.clrbits32(cfg.cluster_ctrl0(cluster), core_bit(CX_CTRL0::L1_RST_DISABLE, core));
        }

        // Lock out external debug
        hal.clrbits32(cluster_reset, core_bit(CX_RST_CTRL::DBG_RST, core));

        if cortex_a7 {
            hal.clrbits32(cluster_reset, core_bit(CX_RST_CTRL::ETM_RST, core));
        }

        // Power-on reset alone covers NEON on the A15, no separate reset needed.
        power::cpu_set_power(hal, cfg, cpu, true);

        hal.setbits32(cfg.cpu_rst(cluster), 1 << core);
        hal.setbits32(cluster_reset, core_bit(CX_RST_CTRL::CORE_RST, core));

        if cortex_a7 {
            hal.setbits32(cluster_reset, core_bit(CX_RST_CTRL::ETM_RST, core));
        }

        // Debug unlock comes last
        hal.setbits32(cluster_reset, core_bit(CX_RST_CTRL::DBG_RST, core));

        debug!("psci_cpu_on: {} released", cpu);
        Ok(())
    }

    /// Switches `cpu`'s power rail without touching its resets.
    pub fn cpu_set_power(&self, cpu: CpuId, on: bool) {
        let _guard = self.cluster_locks[cpu.cluster() as usize].lock();
        power::cpu_set_power(&self.hal, &self.config, cpu, on);
    }

    /// Clears SCR.NS so lower exception levels default to the secure state.
    ///
    /// Run once on the boot core; running it again changes nothing.
    pub fn arch_init(&self) {
        let mut scr =
            LocalRegisterCopy::<usize, SCR::Register>::new(self.hal.read_sysreg(SysReg::Scr));
        scr.modify(SCR::NS::CLEAR);
        self.hal.write_sysreg(SysReg::Scr, scr.get());
        self.hal.isb();
    }
}
