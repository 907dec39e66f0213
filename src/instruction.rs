use std::fmt;

use crate::opcode::Opcode;

/// A decoded Chip-8 instruction with its operands.
///
/// `x` and `y` are register indices, `kk` a byte literal, `addr` a 12-bit address and
/// `n` a sprite height.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    Cls,
    /// 00EE
    Ret,
    /// 1nnn
    Jump { addr: u16 },
    /// 2nnn
    Call { addr: u16 },
    /// 3xkk
    SkipEqByte { x: u8, kk: u8 },
    /// 4xkk
    SkipNeByte { x: u8, kk: u8 },
    /// 5xy0
    SkipEqReg { x: u8, y: u8 },
    /// 6xkk
    LoadByte { x: u8, kk: u8 },
    /// 7xkk
    AddByte { x: u8, kk: u8 },
    /// 8xy0
    LoadReg { x: u8, y: u8 },
    /// 8xy1
    Or { x: u8, y: u8 },
    /// 8xy2
    And { x: u8, y: u8 },
    /// 8xy3
    Xor { x: u8, y: u8 },
    /// 8xy4
    AddReg { x: u8, y: u8 },
    /// 8xy5
    Sub { x: u8, y: u8 },
    /// 8xy6
    Shr { x: u8 },
    /// 8xy7
    Subn { x: u8, y: u8 },
    /// 8xyE
    Shl { x: u8 },
    /// 9xy0
    SkipNeReg { x: u8, y: u8 },
    /// Annn
    LoadI { addr: u16 },
    /// Bnnn
    JumpV0 { addr: u16 },
    /// Cxkk
    Random { x: u8, kk: u8 },
    /// Dxyn
    Draw { x: u8, y: u8, n: u8 },
    /// Ex9E
    SkipPressed { x: u8 },
    /// ExA1
    SkipNotPressed { x: u8 },
    /// Fx07
    LoadDelay { x: u8 },
    /// Fx0A
    WaitKey { x: u8 },
    /// Fx15
    SetDelay { x: u8 },
    /// Fx18
    SetSound { x: u8 },
    /// Fx1E
    AddI { x: u8 },
    /// Fx29
    LoadFont { x: u8 },
    /// Fx33
    Bcd { x: u8 },
    /// Fx55
    StoreRegs { x: u8 },
    /// Fx65
    LoadRegs { x: u8 },
    /// Anything the tables don't map; executes as a no-op
    Unknown(Opcode),
}

impl Instruction {
    /// Selects the Instruction for an Opcode.
    ///
    /// The family nibble picks the instruction directly except for families `0`, `8` and `E`,
    /// which are further keyed on the last nibble, and family `F`, which is keyed on the last byte.
    /// Nibbles that aren't part of a key are ignored, so e.g. `5xy1` still decodes as `5xy0`.
    pub fn decode(op: Opcode) -> Self {
        use Instruction::*;

        let (x, y, n, kk, addr) = (op.x(), op.y(), op.n(), op.kk(), op.addr());
        match op.family() {
            0x0 => match n {
                0x0 => Cls,
                0xE => Ret,
                _ => Unknown(op),
            },
            0x1 => Jump { addr },
            0x2 => Call { addr },
            0x3 => SkipEqByte { x, kk },
            0x4 => SkipNeByte { x, kk },
            0x5 => SkipEqReg { x, y },
            0x6 => LoadByte { x, kk },
            0x7 => AddByte { x, kk },
            0x8 => match n {
                0x0 => LoadReg { x, y },
                0x1 => Or { x, y },
                0x2 => And { x, y },
                0x3 => Xor { x, y },
                0x4 => AddReg { x, y },
                0x5 => Sub { x, y },
                0x6 => Shr { x },
                0x7 => Subn { x, y },
                0xE => Shl { x },
                _ => Unknown(op),
            },
            0x9 => SkipNeReg { x, y },
            0xA => LoadI { addr },
            0xB => JumpV0 { addr },
            0xC => Random { x, kk },
            0xD => Draw { x, y, n },
            0xE => match n {
                0xE => SkipPressed { x },
                0x1 => SkipNotPressed { x },
                _ => Unknown(op),
            },
            0xF => match kk {
                0x07 => LoadDelay { x },
                0x0A => WaitKey { x },
                0x15 => SetDelay { x },
                0x18 => SetSound { x },
                0x1E => AddI { x },
                0x29 => LoadFont { x },
                0x33 => Bcd { x },
                0x55 => StoreRegs { x },
                0x65 => LoadRegs { x },
                _ => Unknown(op),
            },
            _ => Unknown(op),
        }
    }
}

impl From<Opcode> for Instruction {
    fn from(op: Opcode) -> Self {
        Instruction::decode(op)
    }
}

/// Conventional assembly mnemonics, used when tracing execution
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            Cls => write!(f, "CLS"),
            Ret => write!(f, "RET"),
            Jump { addr } => write!(f, "JP {:#05X}", addr),
            Call { addr } => write!(f, "CALL {:#05X}", addr),
            SkipEqByte { x, kk } => write!(f, "SE V{:X}, {:#04X}", x, kk),
            SkipNeByte { x, kk } => write!(f, "SNE V{:X}, {:#04X}", x, kk),
            SkipEqReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            LoadByte { x, kk } => write!(f, "LD V{:X}, {:#04X}", x, kk),
            AddByte { x, kk } => write!(f, "ADD V{:X}, {:#04X}", x, kk),
            LoadReg { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddReg { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            Shr { x } => write!(f, "SHR V{:X}", x),
            Subn { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Shl { x } => write!(f, "SHL V{:X}", x),
            SkipNeReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LoadI { addr } => write!(f, "LD I, {:#05X}", addr),
            JumpV0 { addr } => write!(f, "JP V0, {:#05X}", addr),
            Random { x, kk } => write!(f, "RND V{:X}, {:#04X}", x, kk),
            Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            SkipPressed { x } => write!(f, "SKP V{:X}", x),
            SkipNotPressed { x } => write!(f, "SKNP V{:X}", x),
            LoadDelay { x } => write!(f, "LD V{:X}, DT", x),
            WaitKey { x } => write!(f, "LD V{:X}, K", x),
            SetDelay { x } => write!(f, "LD DT, V{:X}", x),
            SetSound { x } => write!(f, "LD ST, V{:X}", x),
            AddI { x } => write!(f, "ADD I, V{:X}", x),
            LoadFont { x } => write!(f, "LD F, V{:X}", x),
            Bcd { x } => write!(f, "LD B, V{:X}", x),
            StoreRegs { x } => write!(f, "LD [I], V{:X}", x),
            LoadRegs { x } => write!(f, "LD V{:X}, [I]", x),
            Unknown(op) => write!(f, "DW {:#06X}", op.0),
        }
    }
}
