use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT, FONT_ADDRESS, MEMORY_SIZE, PIXEL_OFF, PROGRAM_START,
    STACK_DEPTH,
};
use crate::error::Chip8Error;

/// The FrameBuffer is indexed as [y][x]; every pixel is either `PIXEL_ON` or `PIXEL_OFF`
pub type FrameBuffer = [[u32; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// A snapshot of the Chip8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry, borrow and collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Pointer
/// - (sp) an 8-bit stack pointer; the number of return addresses on the stack
///
/// Timers
/// - 2 8-bit timers (delay & sound), each decremented once per cycle while nonzero
///
/// ## Memory
/// - 16 entry stack of return addresses
/// - 4096 bytes of addressable memory
///     - 0x050..0x0A0 holds the font
///     - 0x200.. holds the loaded program
/// - 64x32 frame buffer
///
/// ## Input
/// - Emulation halts until a key is pressed while `register_needing_key` is Some
#[derive(Clone)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_DEPTH],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub register_needing_key: Option<u8>,
}

impl State {
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        let font_start = FONT_ADDRESS as usize;
        memory[font_start..font_start + FONT.len()].copy_from_slice(&FONT);

        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_DEPTH],
            memory,
            frame_buffer: [[PIXEL_OFF; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            draw_flag: false,
            register_needing_key: None,
        }
    }

    /// Reads a single byte of memory
    pub fn read(&self, address: usize) -> Result<u8, Chip8Error> {
        self.memory
            .get(address)
            .copied()
            .ok_or(Chip8Error::MemoryOutOfBounds { address })
    }

    /// Borrows `len` bytes of memory starting at `address`
    pub fn slice(&self, address: usize, len: usize) -> Result<&[u8], Chip8Error> {
        let end = checked_end(address, len)?;
        Ok(&self.memory[address..end])
    }

    /// Mutably borrows `len` bytes of memory starting at `address`
    pub fn slice_mut(&mut self, address: usize, len: usize) -> Result<&mut [u8], Chip8Error> {
        let end = checked_end(address, len)?;
        Ok(&mut self.memory[address..end])
    }

    /// Writes VF: 1 when `set`, otherwise 0
    pub fn set_flag(&mut self, set: bool) {
        self.v[0xF] = u8::from(set);
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

/// The exclusive end of a memory range, if the whole range is addressable
fn checked_end(address: usize, len: usize) -> Result<usize, Chip8Error> {
    match address.checked_add(len) {
        Some(end) if end <= MEMORY_SIZE => Ok(end),
        // Report the first address that falls outside of memory
        _ => Err(Chip8Error::MemoryOutOfBounds {
            address: address.max(MEMORY_SIZE),
        }),
    }
}
