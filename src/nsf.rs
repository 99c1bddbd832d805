//! NSF module - container parsing and metadata
//!
//! An NSF file is a 128-byte header followed by the 6502 program image.
//! The header carries the load/init/play addresses, song metadata, the play
//! period per region, the initial bankswitch configuration and an
//! expansion-chip bitfield.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::apu::Region;

/// Size of the NSF header in bytes
pub const HEADER_LEN: usize = 128;

const MAGIC: &[u8; 5] = b"NESM\x1A";

/// Names of the expansion chips flagged in the header bitfield
const EXPANSION_CHIPS: [&str; 6] = ["VRC6", "VRC7", "FDS", "MMC5", "Namco 163", "Sunsoft 5B"];

/// Errors raised while loading an NSF file
#[derive(Debug)]
pub enum NsfError {
    /// I/O error while reading the file
    Io(io::Error),

    /// File is shorter than the 128-byte header
    TooShort,

    /// File does not start with the `NESM\x1A` magic
    BadMagic,

    /// Unsupported header version (only version 1 is handled)
    UnsupportedVersion(u8),

    /// Header declares no songs or a zero starting song
    NoSongs,
}

impl fmt::Display for NsfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NsfError::Io(e) => write!(f, "I/O error: {}", e),
            NsfError::TooShort => write!(f, "file is shorter than the NSF header"),
            NsfError::BadMagic => write!(f, "not an NSF file"),
            NsfError::UnsupportedVersion(v) => write!(f, "unsupported NSF version {}", v),
            NsfError::NoSongs => write!(f, "NSF contains no songs"),
        }
    }
}

impl std::error::Error for NsfError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NsfError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for NsfError {
    fn from(e: io::Error) -> Self {
        NsfError::Io(e)
    }
}

/// Parsed NSF header
#[derive(Debug, Clone)]
pub struct NsfHeader {
    /// Header version (always 1)
    pub version: u8,
    /// Number of songs (1-based count)
    pub songs: u8,
    /// Starting song, 1-based
    pub start_song: u8,
    /// Load address of the program data
    pub load: u16,
    /// Init routine address
    pub init: u16,
    /// Play routine address
    pub play: u16,
    /// Song title
    pub title: String,
    /// Artist name
    pub artist: String,
    /// Copyright line
    pub copyright: String,
    /// NTSC play period in microseconds
    pub speed_ntsc: u16,
    /// Initial bankswitch configuration
    pub bankswitch: [u8; 8],
    /// PAL play period in microseconds
    pub speed_pal: u16,
    /// Region byte: bit 0 = PAL, bit 1 = dual
    pub palntsc: u8,
    /// Expansion-chip bitfield
    pub expansion: u8,
}

impl NsfHeader {
    /// True when any header bank register is non-zero
    pub fn uses_bankswitching(&self) -> bool {
        self.bankswitch.iter().any(|&b| b != 0)
    }

    /// Clock standard to emulate; dual-region tunes play as PAL
    pub fn region(&self) -> Region {
        if self.palntsc & 0x03 != 0 {
            Region::Pal
        } else {
            Region::Ntsc
        }
    }

    /// Play-routine call rate in Hz, derived from the region's period
    pub fn play_freq_hz(&self) -> f64 {
        let period_us = match self.region() {
            Region::Pal => self.speed_pal,
            Region::Ntsc => self.speed_ntsc,
        };
        1_000_000.0 / f64::from(period_us)
    }

    /// Names of the expansion chips the tune asks for (all unsupported)
    pub fn expansion_chips(&self) -> Vec<&'static str> {
        EXPANSION_CHIPS
            .iter()
            .enumerate()
            .filter(|(bit, _)| self.expansion & (1 << bit) != 0)
            .map(|(_, name)| *name)
            .collect()
    }
}

/// A loaded NSF file: parsed header plus the program image
#[derive(Debug, Clone)]
pub struct Nsf {
    pub header: NsfHeader,
    /// Program data following the header
    pub data: Vec<u8>,
}

impl Nsf {
    /// Load and parse an NSF file from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, NsfError> {
        let bytes = fs::read(path)?;
        Self::parse(&bytes)
    }

    /// Parse an NSF image from memory
    pub fn parse(bytes: &[u8]) -> Result<Self, NsfError> {
        if bytes.len() < HEADER_LEN {
            return Err(NsfError::TooShort);
        }
        if &bytes[0x00..0x05] != MAGIC {
            return Err(NsfError::BadMagic);
        }

        let version = bytes[0x05];
        if version != 1 {
            return Err(NsfError::UnsupportedVersion(version));
        }

        let songs = bytes[0x06];
        let start_song = bytes[0x07];
        if songs == 0 || start_song == 0 {
            return Err(NsfError::NoSongs);
        }

        let mut bankswitch = [0u8; 8];
        bankswitch.copy_from_slice(&bytes[0x70..0x78]);

        let header = NsfHeader {
            version,
            songs,
            start_song,
            load: read_u16(bytes, 0x08),
            init: read_u16(bytes, 0x0A),
            play: read_u16(bytes, 0x0C),
            title: read_string(&bytes[0x0E..0x2E]),
            artist: read_string(&bytes[0x2E..0x4E]),
            copyright: read_string(&bytes[0x4E..0x6E]),
            speed_ntsc: read_u16(bytes, 0x6E),
            bankswitch,
            speed_pal: read_u16(bytes, 0x78),
            palntsc: bytes[0x7A],
            expansion: bytes[0x7B],
        };

        Ok(Nsf {
            header,
            data: bytes[HEADER_LEN..].to_vec(),
        })
    }
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

/// Extract a null-padded fixed-width string field
fn read_string(field: &[u8]) -> String {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end]).into_owned()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a minimal valid header with the given patches applied
    pub(crate) fn build_nsf(patch: impl FnOnce(&mut Vec<u8>)) -> Vec<u8> {
        let mut bytes = vec![0u8; HEADER_LEN];
        bytes[0x00..0x05].copy_from_slice(MAGIC);
        bytes[0x05] = 1; // version
        bytes[0x06] = 3; // songs
        bytes[0x07] = 1; // starting song
        bytes[0x08..0x0A].copy_from_slice(&0x8000u16.to_le_bytes()); // load
        bytes[0x0A..0x0C].copy_from_slice(&0x8000u16.to_le_bytes()); // init
        bytes[0x0C..0x0E].copy_from_slice(&0x8003u16.to_le_bytes()); // play
        bytes[0x0E..0x13].copy_from_slice(b"Title");
        bytes[0x2E..0x34].copy_from_slice(b"Artist");
        bytes[0x4E..0x52].copy_from_slice(b"2026");
        bytes[0x6E..0x70].copy_from_slice(&16639u16.to_le_bytes()); // ~60.1 Hz
        bytes[0x78..0x7A].copy_from_slice(&19997u16.to_le_bytes()); // ~50 Hz
        patch(&mut bytes);
        bytes.extend(vec![0xEA; 0x100]); // program data
        bytes
    }

    #[test]
    fn test_parse_valid_file() {
        let nsf = Nsf::parse(&build_nsf(|_| {})).unwrap();

        assert_eq!(nsf.header.songs, 3);
        assert_eq!(nsf.header.start_song, 1);
        assert_eq!(nsf.header.load, 0x8000);
        assert_eq!(nsf.header.init, 0x8000);
        assert_eq!(nsf.header.play, 0x8003);
        assert_eq!(nsf.header.title, "Title");
        assert_eq!(nsf.header.artist, "Artist");
        assert_eq!(nsf.header.copyright, "2026");
        assert_eq!(nsf.data.len(), 0x100);
    }

    #[test]
    fn test_too_short() {
        assert!(matches!(
            Nsf::parse(&[0u8; 64]),
            Err(NsfError::TooShort)
        ));
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = build_nsf(|_| {});
        bytes[0] = b'X';
        assert!(matches!(Nsf::parse(&bytes), Err(NsfError::BadMagic)));
    }

    #[test]
    fn test_bad_version() {
        let bytes = build_nsf(|b| b[0x05] = 2);
        assert!(matches!(
            Nsf::parse(&bytes),
            Err(NsfError::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn test_no_songs() {
        let bytes = build_nsf(|b| b[0x06] = 0);
        assert!(matches!(Nsf::parse(&bytes), Err(NsfError::NoSongs)));

        let bytes = build_nsf(|b| b[0x07] = 0);
        assert!(matches!(Nsf::parse(&bytes), Err(NsfError::NoSongs)));
    }

    #[test]
    fn test_region_selection() {
        let ntsc = Nsf::parse(&build_nsf(|_| {})).unwrap();
        assert_eq!(ntsc.header.region(), Region::Ntsc);
        assert!((ntsc.header.play_freq_hz() - 60.1).abs() < 0.05);

        let pal = Nsf::parse(&build_nsf(|b| b[0x7A] = 0x01)).unwrap();
        assert_eq!(pal.header.region(), Region::Pal);
        assert!((pal.header.play_freq_hz() - 50.0).abs() < 0.05);

        // Dual-region tunes play as PAL
        let dual = Nsf::parse(&build_nsf(|b| b[0x7A] = 0x02)).unwrap();
        assert_eq!(dual.header.region(), Region::Pal);
    }

    #[test]
    fn test_bankswitch_detection() {
        let plain = Nsf::parse(&build_nsf(|_| {})).unwrap();
        assert!(!plain.header.uses_bankswitching());

        let banked = Nsf::parse(&build_nsf(|b| {
            b[0x70..0x78].copy_from_slice(&[0, 1, 2, 3, 4, 5, 6, 7]);
        }))
        .unwrap();
        assert!(banked.header.uses_bankswitching());
        assert_eq!(banked.header.bankswitch[7], 7);
    }

    #[test]
    fn test_expansion_chip_report() {
        let nsf = Nsf::parse(&build_nsf(|b| b[0x7B] = 0b0010_0101)).unwrap();
        assert_eq!(nsf.header.expansion_chips(), vec!["VRC6", "FDS", "Sunsoft 5B"]);

        let plain = Nsf::parse(&build_nsf(|_| {})).unwrap();
        assert!(plain.header.expansion_chips().is_empty());
    }
}
