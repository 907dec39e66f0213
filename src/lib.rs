pub use crate::chip8::Chip8;
pub use crate::error::Chip8Error;
pub use crate::instruction::Instruction;
pub use crate::keypad::Keypad;
pub use crate::opcode::Opcode;
pub use crate::state::{FrameBuffer, State};

mod chip8;
pub mod constants;
mod error;
mod instruction;
mod keypad;
mod opcode;
mod operations;
pub mod state;
