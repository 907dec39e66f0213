use std::io::Read;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::constants::{MAX_ROM_SIZE, PROGRAM_START};
use crate::error::Chip8Error;
use crate::instruction::Instruction;
use crate::keypad::Keypad;
use crate::opcode::Opcode;
use crate::operations::execute;
use crate::state::{FrameBuffer, State};

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - `keypad` with public interfaces for manipulating it
///  - the random number generator behind RND
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - advancing the CPU and its timers one cycle at a time
/// - inspecting its frame buffer for rendering by some display
///
/// How often `step` is called is up to the caller; every call is one cycle.
pub struct Chip8 {
    state: State,
    keypad: Keypad,
    rng: StdRng,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_rng(StdRng::seed_from_u64(rand::random()))
    }

    /// A Chip-8 whose RND instruction produces a repeatable sequence
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Chip8 {
            state: State::new(),
            keypad: Keypad::new(),
            rng,
        }
    }

    /// Puts the machine back into its power-on state; any loaded ROM is discarded
    pub fn initialize(&mut self) {
        self.state = State::new();
    }

    /// Copy a rom into memory at 0x200
    ///
    /// # Arguments
    /// * `rom` the raw program; at most 3584 bytes
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), Chip8Error> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Chip8Error::RomTooLarge {
                size: rom.len(),
                max_size: MAX_ROM_SIZE,
            });
        }
        let start = PROGRAM_START as usize;
        self.state.memory[start..start + rom.len()].copy_from_slice(rom);
        log::debug!("loaded {} byte ROM at {:#05X}", rom.len(), start);
        Ok(())
    }

    /// Load a rom from a source file
    ///
    /// # Arguments
    /// * `reader` a file reader that contains a ROM
    pub fn load_rom_from(&mut self, reader: &mut dyn Read) -> Result<(), Chip8Error> {
        let mut rom = Vec::with_capacity(MAX_ROM_SIZE);
        reader.read_to_end(&mut rom)?;
        self.load_rom(&rom)
    }

    /// Returns the FrameBuffer if the display should be redrawn
    pub fn get_frame(&self) -> Option<&FrameBuffer> {
        if self.state.draw_flag {
            Some(&self.state.frame_buffer)
        } else {
            None
        }
    }

    /// Returns the FrameBuffer if the display should be redrawn and marks it as drawn
    pub fn take_frame(&mut self) -> Option<&FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(&self.state.frame_buffer)
        } else {
            None
        }
    }

    /// The frame buffer as it currently is, whether or not it changed
    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was pressed
    pub fn key_press(&mut self, key: u8) {
        self.keypad.press(key);
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was released
    pub fn key_release(&mut self, key: u8) {
        self.keypad.release(key);
    }

    /// Replace the pressed status of every key with a polled snapshot
    pub fn set_keys(&mut self, keys: [bool; 16]) {
        self.keypad.set_all(keys);
    }

    /// Whether the sound timer is running and a tone should be playing
    pub fn sound_active(&self) -> bool {
        self.state.sound_timer > 0
    }

    /// Whether the CPU is stalled on `LD Vx, K`
    pub fn awaiting_key(&self) -> bool {
        self.state.register_needing_key.is_some()
    }

    /// Read access to registers, memory and timers
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Advances the CPU by a single cycle
    /// - if awaiting a keypress, takes the lowest held key or does nothing
    /// - otherwise gets and executes the next opcode
    /// - decrements the timers
    pub fn step(&mut self) -> Result<(), Chip8Error> {
        match self.state.register_needing_key {
            Some(register) => self.poll_key(register),
            None => self.advance_cpu()?,
        }
        self.advance_timers();
        Ok(())
    }

    /// Calls `step` `cycles` times, stopping at the first error
    pub fn run_cycles(&mut self, cycles: usize) -> Result<(), Chip8Error> {
        for _ in 0..cycles {
            self.step()?;
        }
        Ok(())
    }

    fn poll_key(&mut self, register: u8) {
        if let Some(key) = self.keypad.first_pressed() {
            log::debug!("V{:X} received key {:X}", register, key);
            self.state.v[register as usize] = key;
            self.state.register_needing_key = None;
        }
    }

    /// Gets, decodes and executes the opcode at the pc
    fn advance_cpu(&mut self) -> Result<(), Chip8Error> {
        let op = self.get_op()?;
        let instruction: Instruction = op.into();
        log::trace!(
            "{:04X}: {} {} v{:02X?} i{:04X}",
            self.state.pc,
            op,
            instruction,
            self.state.v,
            self.state.i
        );
        let pc = self.state.pc;
        self.state.pc = pc.wrapping_add(0x2);
        execute(instruction, &mut self.state, &self.keypad, &mut self.rng).map_err(|e| {
            // A fault leaves the pc on the instruction that raised it
            self.state.pc = pc;
            e
        })
    }

    /// Decrements both timers if they're running
    fn advance_timers(&mut self) {
        self.state.delay_timer = self.state.delay_timer.saturating_sub(1);
        self.state.sound_timer = self.state.sound_timer.saturating_sub(1);
    }

    /// Gets the opcode currently pointed at by the pc.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    fn get_op(&self) -> Result<Opcode, Chip8Error> {
        let pc = self.state.pc as usize;
        Ok(Opcode::from_bytes(
            self.state.read(pc)?,
            self.state.read(pc + 1)?,
        ))
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}
