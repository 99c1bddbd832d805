//! Triangle wave channel implementation

use crate::apu::components::{LengthCounter, LinearCounter, Timer};
use crate::apu::constants::TRIANGLE_SEQUENCE;

/// Triangle wave channel
///
/// Unlike the pulses, the timer runs at the full CPU rate and the sequencer
/// only advances while both the linear counter and the length counter are
/// non-zero.
#[derive(Debug, Clone)]
pub struct TriangleChannel {
    /// Enabled flag (from $4015)
    pub(crate) enabled: bool,
    /// Linear counter
    pub(crate) linear_counter: LinearCounter,
    /// Length counter
    pub(crate) length_counter: LengthCounter,
    /// Timer, clocked every CPU cycle
    pub(crate) timer: Timer,
    /// Sequencer phase (0-31), counts down
    phase: u8,
}

impl TriangleChannel {
    pub fn new() -> Self {
        Self {
            enabled: false,
            linear_counter: LinearCounter::new(),
            length_counter: LengthCounter::new(),
            timer: Timer::new(),
            phase: 0,
        }
    }

    /// Write register 0 ($4008, `CRRR RRRR`): control flag and linear reload value
    pub fn write_linear(&mut self, data: u8) {
        self.linear_counter.write_control(data);
    }

    /// Write register 2 ($400A): low 8 bits of the timer period
    pub fn write_timer_low(&mut self, data: u8) {
        self.timer.set_period_low(data);
    }

    /// Write register 3 ($400B, `LLLL LTTT`): timer high bits and length load
    ///
    /// Also sets the linear counter's halt flag; the channel cannot resume
    /// until the next quarter-frame reloads the linear counter.
    pub fn write_timer_high(&mut self, data: u8) {
        self.timer.set_period_high(data);
        if self.enabled {
            self.length_counter.load(data >> 3);
        }
        self.linear_counter.set_halt();
    }

    /// Set the enabled flag (from $4015)
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Clock the timer and step the sequencer phase
    pub fn clock_timer(&mut self) {
        if !self.linear_counter.is_active() || !self.length_counter.is_active() {
            return;
        }
        if self.timer.clock() {
            self.phase = if self.phase == 0 { 31 } else { self.phase - 1 };
        }
    }

    /// Clock the linear counter (quarter-frame)
    pub fn clock_linear_counter(&mut self) {
        self.linear_counter.clock();
    }

    /// Clock the length counter (half-frame), gated by the linear halt flag
    pub fn clock_length_counter(&mut self) {
        if self.enabled {
            self.length_counter.set_halt(self.linear_counter.halted());
            self.length_counter.clock();
        } else {
            self.length_counter.force_zero();
        }
    }

    /// Current output level (0-15)
    ///
    /// Timer periods below 2 produce ultrasonic frequencies; those collapse
    /// to a fixed mid-level value instead of aliasing.
    pub fn output(&self) -> u8 {
        if !self.linear_counter.is_active() || !self.length_counter.is_active() {
            return 0;
        }
        if self.timer.period < 2 {
            return 7;
        }
        TRIANGLE_SEQUENCE[self.phase as usize]
    }
}

impl Default for TriangleChannel {
    fn default() -> Self {
        Self::new()
    }
}
