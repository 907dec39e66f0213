use thiserror::Error;

/// Everything that can go wrong while loading or running a program.
///
/// Unknown opcodes are deliberately absent: they execute as no-ops.
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("ROM is too large ({size} bytes), max size is {max_size} bytes")]
    RomTooLarge { size: usize, max_size: usize },

    #[error("unable to read ROM: {0}")]
    Io(#[from] std::io::Error),

    #[error("stack overflow: CALL at {pc:#06X} with every stack frame in use")]
    StackOverflow { pc: u16 },

    #[error("stack underflow: RET at {pc:#06X} with an empty call stack")]
    StackUnderflow { pc: u16 },

    #[error("memory access out of bounds at address {address:#06X}")]
    MemoryOutOfBounds { address: usize },
}
