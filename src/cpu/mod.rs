//! CPU module - the 6502 seam
//!
//! The engine does not ship a 6502 interpreter. NSF playback needs one, but
//! only through a narrow contract: execute one instruction against the
//! [`Bus`](crate::bus::Bus) and report how many cycles it took, plus enough
//! register access for the driver to stage `init`/`play` calls and detect
//! their sentinel return. Any cycle-counted 6502 core can be adapted to
//! this trait and injected into [`Player`](crate::player::Player).

use crate::bus::Bus;

/// One-instruction-at-a-time 6502 interface
///
/// Memory access flows through the bus handed to [`step`](Cpu::step); the
/// implementation must perform all of an instruction's reads and writes
/// through it, including stack traffic.
pub trait Cpu {
    /// Execute a single instruction, returning the cycles it consumed
    fn step(&mut self, bus: &mut Bus) -> u32;

    /// Current program counter
    fn pc(&self) -> u16;

    /// Jump to an address
    fn set_pc(&mut self, pc: u16);

    /// Current stack pointer
    fn s(&self) -> u8;

    /// Set the stack pointer
    fn set_s(&mut self, s: u8);

    /// Set the accumulator
    fn set_a(&mut self, a: u8);

    /// Set the X index register
    fn set_x(&mut self, x: u8);

    /// Set the Y index register
    fn set_y(&mut self, y: u8);

    /// Set the processor status flags
    fn set_p(&mut self, p: u8);
}
