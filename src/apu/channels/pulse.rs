//! Pulse wave channel implementation

use crate::apu::components::{Envelope, LengthCounter, Sweep, Timer};
use crate::apu::constants::DUTY_PATTERNS;

/// Pulse wave channel (used for both Pulse 1 and Pulse 2)
#[derive(Debug, Clone)]
pub struct PulseChannel {
    /// Enabled flag (from $4015)
    pub(crate) enabled: bool,
    /// Duty cycle (0-3)
    pub(crate) duty: u8,
    /// Sequencer phase (0-7), counts down
    phase: u8,
    /// Envelope generator
    pub(crate) envelope: Envelope,
    /// Sweep unit
    pub(crate) sweep: Sweep,
    /// Length counter
    pub(crate) length_counter: LengthCounter,
    /// Timer, clocked every second CPU cycle
    pub(crate) timer: Timer,
}

impl PulseChannel {
    /// Create a new pulse channel; pulse 1 uses one's-complement sweep negation
    pub fn new(ones_complement_sweep: bool) -> Self {
        Self {
            enabled: false,
            duty: 0,
            phase: 0,
            envelope: Envelope::new(),
            sweep: Sweep::new(ones_complement_sweep),
            length_counter: LengthCounter::new(),
            timer: Timer::new(),
        }
    }

    /// Write register 0 (`DDLC VVVV`): duty cycle and envelope control
    pub fn write_duty_volume(&mut self, data: u8) {
        self.duty = data >> 6;
        self.length_counter.set_halt((data & 0x20) != 0);
        self.envelope.write_control(data);
    }

    /// Write register 1 (`EPPP NSSS`): sweep control
    pub fn write_sweep(&mut self, data: u8) {
        self.sweep.write_control(data);
    }

    /// Write register 2 (`TTTT TTTT`): low 8 bits of the timer period
    pub fn write_timer_low(&mut self, data: u8) {
        self.timer.set_period_low(data);
        self.sweep.recompute_target(self.timer.period);
    }

    /// Write register 3 (`LLLL LTTT`): timer high bits and length load
    ///
    /// Loads the length counter only while the channel is enabled, restarts
    /// the envelope and resets the sequencer phase.
    pub fn write_timer_high(&mut self, data: u8) {
        self.timer.set_period_high(data);
        self.sweep.recompute_target(self.timer.period);
        if self.enabled {
            self.length_counter.load(data >> 3);
        }
        self.phase = 0;
        self.envelope.restart();
    }

    /// Set the enabled flag (from $4015); a disabled channel's length
    /// counter is forced to zero on the next half-frame clock
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Clock the timer and step the sequencer phase
    pub fn clock_timer(&mut self) {
        if self.timer.clock() {
            self.phase = if self.phase == 0 { 7 } else { self.phase - 1 };
        }
    }

    /// Clock the envelope (quarter-frame)
    pub fn clock_envelope(&mut self) {
        self.envelope.clock();
    }

    /// Clock the length counter (half-frame)
    pub fn clock_length_counter(&mut self) {
        if self.enabled {
            self.length_counter.clock();
        } else {
            self.length_counter.force_zero();
        }
    }

    /// Clock the sweep unit (half-frame)
    pub fn clock_sweep(&mut self) {
        if let Some(period) = self.sweep.clock() {
            self.timer.set_period_direct(period);
            self.sweep.recompute_target(period);
        }
    }

    /// Current output level (0-15)
    pub fn output(&self) -> u8 {
        if !self.length_counter.is_active() || self.sweep.silence {
            return 0;
        }
        DUTY_PATTERNS[self.duty as usize][self.phase as usize] * self.envelope.output()
    }
}
