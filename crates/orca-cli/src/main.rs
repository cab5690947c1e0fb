//! Headless driver for [`orca_core`]: load a grid from a file, run it for a
//! fixed number of ticks, print the resulting grid, and optionally play the
//! notes it fired through the system audio device.

mod console_sink;
mod main_loop;
#[cfg(feature = "play")]
mod playback;
#[cfg(feature = "play")]
mod tone_sink;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

/// Run an Orca grid for a fixed number of ticks from the command line.
#[derive(Parser, Debug)]
#[command(name = "orca", about = "Run a glyph grid program and print its evolution")]
struct Args {
    /// Path to a grid file (rows of glyphs, one row per line).
    file: PathBuf,

    /// Number of ticks to run.
    #[arg(short, long, default_value_t = 16)]
    ticks: u32,

    /// Tempo in beats per minute; controls how many frames make up a tick
    /// when rendering audio.
    #[arg(long, default_value_t = 120)]
    bpm: u32,

    /// Seed for the operator RNG (`R`), for reproducible runs.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Print the grid after every tick instead of only the final state.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress note-on/note-off diagnostics on stderr.
    #[arg(short, long)]
    quiet: bool,

    /// Render and play the notes fired while running, instead of printing
    /// grid states. Requires the `play` feature.
    #[cfg(feature = "play")]
    #[arg(long)]
    play: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading grid file {}", args.file.display()))?;

    #[cfg(feature = "play")]
    if args.play {
        return main_loop::run_and_play(&text, args.ticks, args.bpm, args.seed);
    }

    main_loop::run_headless(&text, args.ticks, args.bpm, args.seed, args.verbose, args.quiet)
}
