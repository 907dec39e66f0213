use std::path::PathBuf;

use clap::Parser;

mod keymap;
mod run;

/// Runs a Chip-8 ROM in a window
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// How many window pixels wide and tall each Chip-8 pixel is
    #[arg(value_parser = clap::value_parser!(u32).range(1..=64))]
    pub scale: u32,

    /// Milliseconds between interpreter cycles
    pub delay: u64,

    /// Path to the ROM to run
    pub rom: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::debug!("{:?}", args);
    run::run(args)
}
