use rand::RngCore;

use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_ADDRESS, FONT_SPRITE_HEIGHT, PIXEL_OFF, PIXEL_ON,
    STACK_DEPTH,
};
use crate::error::Chip8Error;
use crate::instruction::Instruction;
use crate::keypad::Keypad;
use crate::state::State;

/// Executes a single decoded instruction against `state`.
///
/// The program counter has already been moved past the instruction, so jumps overwrite it and
/// skips move it forward by one more instruction.
pub fn execute<R: RngCore + ?Sized>(
    instruction: Instruction,
    state: &mut State,
    keypad: &Keypad,
    rng: &mut R,
) -> Result<(), Chip8Error> {
    use Instruction::*;

    match instruction {
        Cls => clr(state),
        Ret => rts(state)?,
        Jump { addr } => state.pc = addr,
        Call { addr } => call(state, addr)?,
        SkipEqByte { x, kk } => skip_if(&mut state.pc, state.v[x as usize] == kk),
        SkipNeByte { x, kk } => skip_if(&mut state.pc, state.v[x as usize] != kk),
        SkipEqReg { x, y } => skip_if(&mut state.pc, state.v[x as usize] == state.v[y as usize]),
        LoadByte { x, kk } => state.v[x as usize] = kk,
        AddByte { x, kk } => add(state, x, kk),
        LoadReg { x, y } => state.v[x as usize] = state.v[y as usize],
        Or { x, y } => state.v[x as usize] |= state.v[y as usize],
        And { x, y } => state.v[x as usize] &= state.v[y as usize],
        Xor { x, y } => state.v[x as usize] ^= state.v[y as usize],
        AddReg { x, y } => addr(state, x, y),
        Sub { x, y } => sub(state, x, y),
        Shr { x } => shr(state, x),
        Subn { x, y } => subn(state, x, y),
        Shl { x } => shl(state, x),
        SkipNeReg { x, y } => skip_if(&mut state.pc, state.v[x as usize] != state.v[y as usize]),
        LoadI { addr } => state.i = addr,
        JumpV0 { addr } => state.pc = addr + u16::from(state.v[0x0]),
        Random { x, kk } => rand(state, rng, x, kk),
        Draw { x, y, n } => draw(state, x, y, n)?,
        SkipPressed { x } => skip_if(&mut state.pc, keypad.is_pressed(state.v[x as usize])),
        SkipNotPressed { x } => skip_if(&mut state.pc, !keypad.is_pressed(state.v[x as usize])),
        LoadDelay { x } => state.v[x as usize] = state.delay_timer,
        WaitKey { x } => keyd(state, keypad, x),
        SetDelay { x } => state.delay_timer = state.v[x as usize],
        SetSound { x } => state.sound_timer = state.v[x as usize],
        AddI { x } => state.i = state.i.wrapping_add(u16::from(state.v[x as usize])),
        LoadFont { x } => ldspr(state, x),
        Bcd { x } => bcd(state, x)?,
        StoreRegs { x } => stor(state, x)?,
        LoadRegs { x } => read(state, x)?,
        Unknown(_) => {}
    }
    Ok(())
}

/// if condition then pc += 2
fn skip_if(pc: &mut u16, condition: bool) {
    if condition {
        *pc = pc.wrapping_add(0x2);
    }
}

/// clear
fn clr(state: &mut State) {
    for row in state.frame_buffer.iter_mut() {
        row.iter_mut().for_each(|pixel| *pixel = PIXEL_OFF);
    }
    state.draw_flag = true;
}

/// PC = STACK.pop()
fn rts(state: &mut State) -> Result<(), Chip8Error> {
    if state.sp == 0 {
        return Err(Chip8Error::StackUnderflow {
            pc: state.pc.wrapping_sub(0x2),
        });
    }
    state.sp -= 1;
    state.pc = state.stack[state.sp as usize];
    Ok(())
}

/// STACK.push(PC); PC = addr
fn call(state: &mut State, addr: u16) -> Result<(), Chip8Error> {
    if state.sp as usize >= STACK_DEPTH {
        return Err(Chip8Error::StackOverflow {
            pc: state.pc.wrapping_sub(0x2),
        });
    }
    state.stack[state.sp as usize] = state.pc;
    state.sp += 1;
    state.pc = addr;
    Ok(())
}

/// Vx += kk
/// Add kk to Vx; allow for overflow but implicitly drop it
fn add(state: &mut State, x: u8, kk: u8) {
    state.v[x as usize] = state.v[x as usize].wrapping_add(kk);
}

/// Vx += Vy; VF = overflow
fn addr(state: &mut State, x: u8, y: u8) {
    let (res, over) = state.v[x as usize].overflowing_add(state.v[y as usize]);
    state.v[x as usize] = res;
    state.set_flag(over);
}

/// Vx -= Vy; VF = !underflow
fn sub(state: &mut State, x: u8, y: u8) {
    let (res, under) = state.v[x as usize].overflowing_sub(state.v[y as usize]);
    state.v[x as usize] = res;
    state.set_flag(!under);
}

/// Vx = Vy - Vx; VF = !underflow
fn subn(state: &mut State, x: u8, y: u8) {
    let (res, under) = state.v[y as usize].overflowing_sub(state.v[x as usize]);
    state.v[x as usize] = res;
    state.set_flag(!under);
}

/// Vx >>= 1; VF = shifted out bit
fn shr(state: &mut State, x: u8) {
    let lsb = state.v[x as usize] & 0x1;
    state.v[x as usize] >>= 1;
    state.set_flag(lsb == 1);
}

/// Vx <<= 1; VF = shifted out bit
fn shl(state: &mut State, x: u8) {
    let msb = state.v[x as usize] >> 7;
    state.v[x as usize] <<= 1;
    state.set_flag(msb == 1);
}

/// Vx = rand_byte & kk
fn rand<R: RngCore + ?Sized>(state: &mut State, rng: &mut R, x: u8, kk: u8) {
    let rand_byte = (rng.next_u32() & 0xFF) as u8;
    state.v[x as usize] = rand_byte & kk;
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..i+n at position x, y on the FrameBuffer with wrapping.
/// Sets VF if any pixels were erased
fn draw(state: &mut State, x: u8, y: u8, n: u8) -> Result<(), Chip8Error> {
    let origin_x = state.v[x as usize] as usize % DISPLAY_WIDTH;
    let origin_y = state.v[y as usize] as usize % DISPLAY_HEIGHT;

    let mut sprite = [0u8; 0xF];
    let height = n as usize;
    sprite[..height].copy_from_slice(state.slice(state.i as usize, height)?);

    let mut collision = false;
    for (row, &byte) in sprite[..height].iter().enumerate() {
        let py = (origin_y + row) % DISPLAY_HEIGHT;
        for bit in 0..8 {
            if byte >> (7 - bit) & 0x1 == 0 {
                continue;
            }
            let px = (origin_x + bit) % DISPLAY_WIDTH;
            let pixel = &mut state.frame_buffer[py][px];
            collision |= *pixel == PIXEL_ON;
            *pixel ^= PIXEL_ON;
        }
    }

    state.set_flag(collision);
    state.draw_flag = true;
    Ok(())
}

/// await keypress for Vx
/// Takes the key straight away if one is already held, otherwise the CPU stops fetching until
/// one is pressed
fn keyd(state: &mut State, keypad: &Keypad, x: u8) {
    match keypad.first_pressed() {
        Some(key) => state.v[x as usize] = key,
        None => {
            log::debug!("V{:X} waiting for a key press", x);
            state.register_needing_key = Some(x);
        }
    }
}

/// I = FONT_ADDRESS + Vx * 5
/// Set I to the memory address of the font sprite for Vx
fn ldspr(state: &mut State, x: u8) {
    state.i = FONT_ADDRESS + u16::from(state.v[x as usize]) * FONT_SPRITE_HEIGHT;
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
fn bcd(state: &mut State, x: u8) -> Result<(), Chip8Error> {
    let value = state.v[x as usize];
    let digits = [value / 100, value / 10 % 10, value % 10];
    state.slice_mut(state.i as usize, 3)?.copy_from_slice(&digits);
    Ok(())
}

/// mem[I..=I+x] = V0..=Vx
fn stor(state: &mut State, x: u8) -> Result<(), Chip8Error> {
    let count = x as usize + 1;
    let registers = state.v;
    state
        .slice_mut(state.i as usize, count)?
        .copy_from_slice(&registers[..count]);
    Ok(())
}

/// V0..=Vx = mem[I..=I+x]
fn read(state: &mut State, x: u8) -> Result<(), Chip8Error> {
    let count = x as usize + 1;
    let mut registers = state.v;
    registers[..count].copy_from_slice(state.slice(state.i as usize, count)?);
    state.v = registers;
    Ok(())
}
