//! Player module - the NSF playback driver
//!
//! The driver owns the bus (WRAM, SRAM, APU, cartridge) and an injected
//! 6502 core, and turns an [`Nsf`] into a stream of signed 16-bit samples:
//!
//! 1. Per song: clear WRAM, install the header's bank configuration, reset
//!    the APU, then call the NSF `init` routine with the song index in A and
//!    the region in X.
//! 2. Per play tick (`sample_rate / play_freq` output samples): call the
//!    `play` routine, which mutates APU registers through the bus.
//! 3. Per sample: pump the APU by the matching number of CPU cycles and take
//!    the mixed output's high 16 bits.
//!
//! `init` and `play` are entered with a fake return address of $0000 pushed
//! on the stack; the routine's final RTS lands the program counter below 3,
//! which the driver treats as the return sentinel.

mod config;

pub use config::{ConfigError, PlayerConfig};

#[cfg(feature = "audio")]
use std::sync::atomic::{AtomicBool, Ordering};
#[cfg(feature = "audio")]
use std::time::Duration;

#[cfg(feature = "audio")]
use crate::audio::AudioOutput;

use crate::apu::{Apu, Region};
use crate::bus::Bus;
use crate::cartridge::Cartridge;
use crate::cpu::Cpu;
use crate::nsf::Nsf;

/// Calls returning to an address below this have hit the driver's sentinel
const SENTINEL_LIMIT: u16 = 3;

/// Hard per-call cycle budget guarding against routines that never return
const CALL_CYCLE_BUDGET: u64 = 2_000_000;

/// NSF playback driver
///
/// Generic over the injected 6502 core; see [`Cpu`] for the contract.
///
/// ```no_run
/// use nsf_rs::cpu::Cpu;
/// use nsf_rs::nsf::Nsf;
/// use nsf_rs::player::Player;
///
/// // A real integration adapts a cycle-counted 6502 core to the Cpu trait.
/// struct My6502 { pc: u16, s: u8 }
/// impl Cpu for My6502 {
///     fn step(&mut self, _bus: &mut nsf_rs::bus::Bus) -> u32 { self.pc = 0; 2 }
///     fn pc(&self) -> u16 { self.pc }
///     fn set_pc(&mut self, pc: u16) { self.pc = pc; }
///     fn s(&self) -> u8 { self.s }
///     fn set_s(&mut self, s: u8) { self.s = s; }
///     fn set_a(&mut self, _: u8) {}
///     fn set_x(&mut self, _: u8) {}
///     fn set_y(&mut self, _: u8) {}
///     fn set_p(&mut self, _: u8) {}
/// }
///
/// let nsf = Nsf::load("tune.nsf").unwrap();
/// let mut player = Player::new(nsf, My6502 { pc: 0, s: 0xFF }, 48000);
/// player.start_song(1);
/// let mut buffer = vec![0i16; player.buffer_frames()];
/// player.fill(&mut buffer);
/// ```
pub struct Player<C: Cpu> {
    bus: Bus,
    cpu: C,
    nsf: Nsf,
    /// Output samples between two `play` calls
    samples_per_play: u32,
    /// Samples produced since the last `play` call
    play_counter: u32,
    /// Currently playing song, 1-based
    current_song: u8,
}

impl<C: Cpu> Player<C> {
    /// Create a player for a parsed NSF file
    pub fn new(nsf: Nsf, cpu: C, sample_rate: u32) -> Self {
        let apu = Apu::new(sample_rate, nsf.header.region());
        let cart = Cartridge::new(nsf.data.clone(), nsf.header.load);
        let samples_per_play = (f64::from(sample_rate) / nsf.header.play_freq_hz()) as u32;
        let current_song = nsf.header.start_song;

        Player {
            bus: Bus::new(apu, cart),
            cpu,
            nsf,
            samples_per_play: samples_per_play.max(1),
            play_counter: 0,
            current_song,
        }
    }

    /// Initialize a song (1-based, as in the header) and run its `init` routine
    pub fn start_song(&mut self, song: u8) {
        self.current_song = song;
        self.play_counter = 0;

        self.bus.clear_wram();

        if self.nsf.header.uses_bankswitching() {
            self.bus.cart.install_banks(self.nsf.header.bankswitch);
        } else {
            self.bus.cart.clear_banks();
        }

        self.bus.apu.reset();

        let region_flag = match self.nsf.header.region() {
            Region::Ntsc => 0,
            Region::Pal => 1,
        };
        let init = self.nsf.header.init;
        self.call_routine(init, song.wrapping_sub(1), region_flag);
    }

    /// Synchronously run a 6502 routine until its sentinel return
    ///
    /// Registers are staged the way the original player hardware contract
    /// expects: A and X carry the arguments, Y and P are cleared, and the
    /// stack holds a return address of $0000 so the final RTS lands below
    /// the sentinel limit. Returns the cycles consumed.
    fn call_routine(&mut self, entry: u16, a: u8, x: u8) -> u64 {
        self.cpu.set_a(a);
        self.cpu.set_x(x);
        self.cpu.set_y(0);
        self.cpu.set_p(0);
        self.cpu.set_s(0xFF);
        self.push(0x00);
        self.push(0x00);
        self.cpu.set_pc(entry);

        let mut cycles: u64 = 0;
        while self.cpu.pc() >= SENTINEL_LIMIT {
            cycles += u64::from(self.cpu.step(&mut self.bus));
            if cycles > CALL_CYCLE_BUDGET {
                break;
            }
        }
        cycles
    }

    fn push(&mut self, value: u8) {
        let s = self.cpu.s();
        self.bus.write(0x0100 | u16::from(s), value);
        self.cpu.set_s(s.wrapping_sub(1));
    }

    /// Produce the next output sample, invoking `play` on its cadence
    pub fn next_sample(&mut self) -> i16 {
        if self.play_counter == 0 {
            let play = self.nsf.header.play;
            self.call_routine(play, 0, 0);
        }
        self.play_counter += 1;
        if self.play_counter >= self.samples_per_play {
            self.play_counter = 0;
        }

        (self.bus.next_sample() >> 16) as i16
    }

    /// Fill a buffer with output samples
    pub fn fill(&mut self, out: &mut [i16]) {
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
    }

    /// Recommended playback buffer size: four play periods of samples
    pub fn buffer_frames(&self) -> usize {
        self.samples_per_play as usize * 4
    }

    /// Output samples between two `play` calls
    pub fn samples_per_play(&self) -> u32 {
        self.samples_per_play
    }

    /// Currently playing song, 1-based
    pub fn current_song(&self) -> u8 {
        self.current_song
    }

    /// The loaded NSF
    pub fn nsf(&self) -> &Nsf {
        &self.nsf
    }

    /// Live $4015 channel status
    pub fn channel_status(&mut self) -> u8 {
        self.bus.read(0x4015)
    }

    /// The bus, for integrations that need direct access
    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    /// Stream samples into an audio sink until `playing` goes false
    ///
    /// The sink's bounded buffer provides the backpressure that paces the
    /// loop; when it is full the player briefly sleeps and retries.
    #[cfg(feature = "audio")]
    pub fn run(&mut self, playing: &AtomicBool, output: &mut AudioOutput) {
        let mut buffer = vec![0i16; self.buffer_frames()];

        while playing.load(Ordering::Relaxed) {
            self.fill(&mut buffer);

            for &sample in buffer.iter() {
                while !output.push_sample(sample) {
                    if !playing.load(Ordering::Relaxed) {
                        return;
                    }
                    std::thread::sleep(Duration::from_millis(1));
                }
            }
        }
    }
}
