//! Core power clamp and power gating.

use crate::config::PlatformConfig;
use crate::cpu::CpuId;
use crate::hal::SecureHal;
use crate::timer::SecureTimer;

/// Clamp values walked on release. Fixed by the hardware; do not reorder or shorten.
pub const CLAMP_RELEASE_STEPS: [u32; 5] = [0xff, 0xfe, 0xf8, 0xf0, 0x00];
pub const CLAMP_SET: u32 = 0xff;

/// Settle time between two clamp steps.
pub const CLAMP_STEP_DELAY_US: u32 = 10;
/// Settle time between the clamp and the power gate, in either direction.
pub const CLAMP_GATING_DELAY_US: u32 = 20;

/// Ramps the clamp at `clamp` open.
pub(crate) fn clamp_release<H: SecureHal>(hal: &H, timer: &SecureTimer<'_, H>, clamp: usize) {
    for (step, val) in CLAMP_RELEASE_STEPS.iter().enumerate() {
        if step > 0 {
            timer.udelay(CLAMP_STEP_DELAY_US);
        }
        hal.write32(clamp, *val);
    }
}

pub(crate) fn clamp_set<H: SecureHal>(hal: &H, clamp: usize) {
    hal.write32(clamp, CLAMP_SET);
}

/// Switches one core's power rail.
///
/// On: release the clamp, then clear the core's gating bit in `pwroff`.
/// Off: set the gating bit, then engage the clamp.
pub(crate) fn core_power_switch<H: SecureHal>(
    hal: &H,
    timer: &SecureTimer<'_, H>,
    clamp: usize,
    pwroff: usize,
    on: bool,
    core: u32,
) {
    if on {
        clamp_release(hal, timer, clamp);
        timer.udelay(CLAMP_GATING_DELAY_US);
        hal.clrbits32(pwroff, 1 << core);
    } else {
        hal.setbits32(pwroff, 1 << core);
        timer.udelay(CLAMP_GATING_DELAY_US);
        clamp_set(hal, clamp);
    }
}

/// Looks up `cpu`'s clamp and gating registers and switches its power.
pub(crate) fn cpu_set_power<H: SecureHal>(
    hal: &H,
    config: &PlatformConfig,
    cpu: CpuId,
    on: bool,
) {
    let (cluster, core) = (cpu.cluster(), cpu.core());
    let timer = SecureTimer::new(hal, config.ticks_per_us());

    trace!("{} power {}", cpu, if on { "on" } else { "off" });
    core_power_switch(
        hal,
        &timer,
        config.cpu_pwr_clamp(cluster, core),
        config.cpu_pwroff(cluster),
        on,
        core,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SUN9I_A80;
    use crate::sim::{Access, SimHal};

    const CLAMP: usize = 0x1000;
    const PWROFF: usize = 0x2000;

    fn write(addr: usize, val: u32) -> Access {
        Access::Write { addr, val }
    }

    fn delay(ticks: u32) -> Access {
        Access::Delay { ticks }
    }

    #[test]
    fn release_ramps_with_delays() {
        let hal = SimHal::new();
        let timer = SecureTimer::new(&hal, 1);
        clamp_release(&hal, &timer, CLAMP);

        assert_eq!(
            hal.trace().as_slice(),
            &[
                write(CLAMP, 0xff),
                delay(10),
                write(CLAMP, 0xfe),
                delay(10),
                write(CLAMP, 0xf8),
                delay(10),
                write(CLAMP, 0xf0),
                delay(10),
                write(CLAMP, 0x00),
            ]
        );
    }

    #[test]
    fn power_on_clears_gating_after_ramp() {
        let hal = SimHal::new();
        hal.poke(PWROFF, 0xf);
        let timer = SecureTimer::new(&hal, 1);
        core_power_switch(&hal, &timer, CLAMP, PWROFF, true, 2);

        let trace = hal.trace();
        let n = trace.len();
        assert_eq!(&trace[n - 3..], &[write(CLAMP, 0x00), delay(20), write(PWROFF, 0xb)]);
        assert_eq!(hal.writes_to(CLAMP).as_slice(), &CLAMP_RELEASE_STEPS);
    }

    #[test]
    fn power_off_gates_then_clamps_once() {
        let hal = SimHal::new();
        let timer = SecureTimer::new(&hal, 1);
        core_power_switch(&hal, &timer, CLAMP, PWROFF, false, 1);

        assert_eq!(
            hal.trace().as_slice(),
            &[write(PWROFF, 0x2), delay(20), write(CLAMP, 0xff)]
        );
    }

    #[test]
    fn set_power_picks_cluster_registers() {
        let hal = SimHal::new();
        let cfg = SUN9I_A80;
        cpu_set_power(&hal, &cfg, CpuId::new(1, 2), false);

        assert_eq!(hal.peek(cfg.cpu_pwroff(1)), 1 << 2);
        assert_eq!(hal.writes_to(cfg.cpu_pwr_clamp(1, 2)).as_slice(), &[0xff]);
        assert_eq!(hal.trace()[1], Access::Delay { ticks: 20 * 24 });
    }
}
