use crate::bus::{port, Ports};
use crate::cpu::Interrupt;

/// DIV increments once per 64 machine cycles (16384 Hz).
const DIV_PERIOD: u32 = 64;

/// TIMA periods in machine cycles, indexed by TAC bits 0-1.
const TIMA_PERIODS: [u32; 4] = [256, 4, 16, 64];

/// Cycle accumulators for the divider and timer counter registers. The
/// register values themselves live in the I/O port page; this only tracks
/// sub-period progress between updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerState {
    div_ticks: u32,
    tima_ticks: u32,
    tima_period: u32,
}

impl TimerState {
    pub fn new() -> Self {
        Self {
            div_ticks: 0,
            tima_ticks: 0,
            tima_period: TIMA_PERIODS[0],
        }
    }

    /// A TAC write selects a new TIMA period and restarts the sub-counter.
    pub fn set_control(&mut self, value: u8) {
        self.tima_period = TIMA_PERIODS[usize::from(value & 3)];
        self.tima_ticks = 0;
    }

    /// A DIV write zeroes the divider; the sub-counter restarts with it.
    pub fn reset_divider(&mut self) {
        self.div_ticks = 0;
    }
}

/// Advance DIV and TIMA by the given number of machine cycles. TIMA overflow
/// reloads from TMA (plus the overflow excess) and raises the timer
/// interrupt.
pub fn update_timers(state: &mut TimerState, ports: &mut Ports, cycles: u32) {
    state.div_ticks += cycles;
    let div_increments = state.div_ticks / DIV_PERIOD;
    if div_increments > 0 {
        state.div_ticks -= div_increments * DIV_PERIOD;
        let div = ports.get(port::DIV);
        ports.set(port::DIV, div.wrapping_add(div_increments as u8));
    }

    if ports.get(port::TAC) & 0x04 == 0 {
        return;
    }

    state.tima_ticks += cycles;
    let tima_increments = state.tima_ticks / state.tima_period;
    if tima_increments > 0 {
        state.tima_ticks -= tima_increments * state.tima_period;
        let sum = u32::from(ports.get(port::TIMA)) + tima_increments;
        if sum > 0xFF {
            let tma = ports.get(port::TMA);
            ports.set(port::TIMA, tma.wrapping_add(sum as u8));
            ports.request_interrupt(Interrupt::Timer);
        } else {
            ports.set(port::TIMA, sum as u8);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divider_cadence() {
        let mut state = TimerState::new();
        let mut ports = Ports::new();

        update_timers(&mut state, &mut ports, 63);
        assert_eq!(0x00, ports.get(port::DIV));

        update_timers(&mut state, &mut ports, 1);
        assert_eq!(0x01, ports.get(port::DIV));

        // 8-bit wrap
        for _ in 0..255 {
            update_timers(&mut state, &mut ports, 64);
        }
        assert_eq!(0x00, ports.get(port::DIV));
    }

    #[test]
    fn divider_ignores_timer_enable() {
        let mut state = TimerState::new();
        let mut ports = Ports::new();

        ports.set(port::TAC, 0x00);
        update_timers(&mut state, &mut ports, 64);
        assert_eq!(0x01, ports.get(port::DIV));
    }

    #[test]
    fn tima_period_table() {
        for (bits, period) in [(0u8, 256u32), (1, 4), (2, 16), (3, 64)] {
            let mut state = TimerState::new();
            let mut ports = Ports::new();

            state.set_control(bits);
            ports.set(port::TAC, 0x04 | bits);

            update_timers(&mut state, &mut ports, period - 1);
            assert_eq!(0x00, ports.get(port::TIMA), "TAC={bits}");

            update_timers(&mut state, &mut ports, 1);
            assert_eq!(0x01, ports.get(port::TIMA), "TAC={bits}");
        }
    }

    #[test]
    fn tima_disabled() {
        let mut state = TimerState::new();
        let mut ports = Ports::new();

        state.set_control(0x01);
        ports.set(port::TAC, 0x01);

        update_timers(&mut state, &mut ports, 4096);
        assert_eq!(0x00, ports.get(port::TIMA));
    }

    #[test]
    fn tima_overflow_reloads_modulo_and_interrupts() {
        let mut state = TimerState::new();
        let mut ports = Ports::new();

        state.set_control(0x01);
        ports.set(port::TAC, 0x05);
        ports.set(port::TMA, 0x78);
        ports.set(port::TIMA, 0xFF);

        assert_eq!(0x00, ports.get(port::IF) & 0x04);

        update_timers(&mut state, &mut ports, 4);
        assert_eq!(0x78, ports.get(port::TIMA));
        assert_eq!(0x04, ports.get(port::IF) & 0x04);
    }

    #[test]
    fn tac_write_resets_subcounter() {
        let mut state = TimerState::new();
        let mut ports = Ports::new();

        state.set_control(0x01);
        ports.set(port::TAC, 0x05);

        update_timers(&mut state, &mut ports, 3);
        state.set_control(0x01);
        update_timers(&mut state, &mut ports, 3);
        assert_eq!(0x00, ports.get(port::TIMA));

        update_timers(&mut state, &mut ports, 1);
        assert_eq!(0x01, ports.get(port::TIMA));
    }
}
