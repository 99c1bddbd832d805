// NSF playback engine library
//
// Cycle-accurate 2A03/2A07 APU emulation plus the memory bus, NSF loader
// and playback driver. The 6502 interpreter is injected through the
// `cpu::Cpu` trait; the audio sink lives behind the `audio` feature.

// Public modules
pub mod apu;
#[cfg(feature = "audio")]
pub mod audio;
pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod nsf;
pub mod player;

// Re-export main types for convenience
pub use apu::{Apu, Region};
#[cfg(feature = "audio")]
pub use audio::{AudioConfig, AudioError, AudioOutput};
pub use bus::Bus;
pub use cartridge::Cartridge;
pub use cpu::Cpu;
pub use nsf::{Nsf, NsfError, NsfHeader};
pub use player::{ConfigError, Player, PlayerConfig};
