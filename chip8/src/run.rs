use std::fs::File;
use std::io::BufReader;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use chip8_vm::Chip8;
use display::Display;

use crate::keymap::keymap;
use crate::Args;

pub fn run(args: Args) -> anyhow::Result<()> {
    let mut chip8: Chip8 = Chip8::new();

    // Load ROM
    let file = File::open(&args.rom)
        .with_context(|| format!("unable to open ROM {}", args.rom.display()))?;
    let mut reader = BufReader::new(file);
    chip8
        .load_rom_from(&mut reader)
        .with_context(|| format!("unable to load ROM {}", args.rom.display()))?;
    log::info!("loaded {}", args.rom.display());

    // Get SDL2 context
    let sdl = sdl2::init().map_err(|e| anyhow!(e))?;
    let mut display = Display::new(&sdl, args.scale).map_err(|e| anyhow!(e))?;
    let mut events = sdl.event_pump().map_err(|e| anyhow!(e))?;

    // Set initial timing
    let cycle_time = Duration::from_millis(args.delay);
    let mut last_cycle = Instant::now();

    'event: loop {
        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. } => break 'event,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => chip8.key_press(kc),
                    (Keycode::ESCAPE, _) => break 'event,
                    _ => continue,
                },
                Event::KeyUp {
                    keycode: Some(key), ..
                } => {
                    if let Some(kc) = keymap(key) {
                        chip8.key_release(kc)
                    }
                }
                _ => continue,
            };
        }

        // Only cycle once the delay has passed; keep polling input in the meantime
        let current_time = Instant::now();
        if current_time - last_cycle < cycle_time {
            std::thread::sleep(Duration::from_millis(1).min(cycle_time));
            continue;
        }
        last_cycle = current_time;

        if let Err(e) = chip8.step() {
            let state = chip8.state();
            log::error!(
                "fault at {:04X}: v{:02X?} i{:04X} sp{}",
                state.pc,
                state.v,
                state.i,
                state.sp
            );
            return Err(e).context("the interpreter stopped");
        }

        // If the draw flag is set, unset it and render the current frame
        if let Some(frame) = chip8.take_frame() {
            display.render(frame).map_err(|e| anyhow!(e))?;
        }
    }

    log::info!("quitting");
    Ok(())
}
