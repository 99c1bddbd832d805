//! Frame sequencer for the APU
//!
//! The frame counter is a divider generating the low-frequency quarter-frame
//! and half-frame clocks that drive the envelope, sweep, length and linear
//! counter units. It advances once per two CPU cycles; the step thresholds
//! below are expressed in that half-rate tick.

use crate::apu::constants::{
    FRAME_STEP_END_4, FRAME_STEP_END_5, FRAME_STEP_HALF, FRAME_STEP_QUARTER_A,
    FRAME_STEP_QUARTER_B,
};

/// Clock pulse produced by a frame counter advance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameClock {
    /// Clock envelopes and the triangle linear counter
    Quarter,
    /// Quarter-frame units plus length counters and sweep units
    QuarterAndHalf,
}

/// Frame counter state
#[derive(Debug, Clone)]
pub struct FrameCounter {
    /// Sequencer mode (false = 4-step, true = 5-step)
    mode_five_step: bool,
    /// Frame interrupt flag, latched at the end of the 4-step sequence
    interrupt: bool,
    /// IRQ inhibit flag (bit 6 of $4017)
    int_inhibit: bool,
    /// A $4017 write schedules an immediate quarter+half clock
    pending_reset: bool,
    /// Tick counter within the current sequence
    count: u16,
}

impl FrameCounter {
    pub fn new() -> Self {
        Self {
            mode_five_step: false,
            interrupt: false,
            int_inhibit: false,
            pending_reset: false,
            count: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Write the frame counter control register ($4017)
    ///
    /// Bit 7 selects the 5-step sequence, bit 6 inhibits the IRQ latch.
    /// The tick counter restarts and a quarter+half clock fires on the
    /// next advance.
    pub fn write_control(&mut self, data: u8) {
        self.mode_five_step = (data & 0x80) != 0;
        self.int_inhibit = (data & 0x40) != 0;
        self.count = 0;
        self.pending_reset = true;
    }

    /// Whether the counter should advance this CPU cycle
    pub fn wants_advance(&self, odd_cycle: bool) -> bool {
        odd_cycle || self.pending_reset
    }

    /// Advance the sequencer by one tick
    pub fn advance(&mut self) -> Option<FrameClock> {
        let terminal = if self.mode_five_step {
            FRAME_STEP_END_5
        } else {
            FRAME_STEP_END_4
        };

        let clock = if self.pending_reset || self.count == FRAME_STEP_HALF || self.count == terminal
        {
            self.pending_reset = false;
            Some(FrameClock::QuarterAndHalf)
        } else if self.count == FRAME_STEP_QUARTER_A || self.count == FRAME_STEP_QUARTER_B {
            Some(FrameClock::Quarter)
        } else {
            None
        };

        if self.count == terminal {
            self.count = 0;
            if !self.mode_five_step && !self.int_inhibit {
                self.interrupt = true;
            }
        } else {
            self.count += 1;
        }

        clock
    }

    /// Frame interrupt flag (reported in bit 6 of the $4015 status read)
    pub fn interrupt(&self) -> bool {
        self.interrupt
    }

    pub fn count(&self) -> u16 {
        self.count
    }

    pub fn five_step(&self) -> bool {
        self.mode_five_step
    }
}

impl Default for FrameCounter {
    fn default() -> Self {
        Self::new()
    }
}
