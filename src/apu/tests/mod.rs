//! Cross-component APU tests

mod reset_tests;
mod scenario_tests;

use super::SampleSource;

/// Sample source backed by a repeating byte pattern, for DMC tests
pub(crate) struct PatternRom {
    pattern: Vec<u8>,
}

impl PatternRom {
    pub(crate) fn new(pattern: &[u8]) -> Self {
        Self {
            pattern: pattern.to_vec(),
        }
    }

    /// All reads return zero
    pub(crate) fn silent() -> Self {
        Self::new(&[0x00])
    }
}

impl SampleSource for PatternRom {
    fn read_sample(&mut self, addr: u16) -> u8 {
        self.pattern[(addr as usize - 0x8000) % self.pattern.len()]
    }
}
