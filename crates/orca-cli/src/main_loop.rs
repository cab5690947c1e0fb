//! The two run modes: print grid evolution to stdout, or render and play
//! the notes fired along the way.

use anyhow::Result;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use orca_core::Machine;

use crate::console_sink::ConsoleSink;

/// Tick `text` for `ticks` iterations, printing each grid state (if
/// `verbose`) or just the final one, with note diagnostics on stderr unless
/// `quiet`.
pub fn run_headless(text: &str, ticks: u32, bpm: u32, seed: u64, verbose: bool, quiet: bool) -> Result<()> {
    let sink = if quiet { ConsoleSink::quiet() } else { ConsoleSink::new() };
    let mut machine = Machine::load_from_text(text, sink)?;
    machine.set_bpm(bpm);
    let mut rng = SmallRng::seed_from_u64(seed);

    for tick in 1..=ticks {
        machine.tick(&mut rng);
        if verbose {
            println!("-- tick {tick} --");
            print!("{}", machine.to_text());
        }
    }

    if !verbose {
        print!("{}", machine.to_text());
    }
    Ok(())
}

/// Render `ticks` worth of frames through a [`crate::tone_sink::ToneSink`]
/// and play the result to the default audio device.
#[cfg(feature = "play")]
pub fn run_and_play(text: &str, ticks: u32, bpm: u32, seed: u64) -> Result<()> {
    use crate::tone_sink::ToneSink;

    let mut machine = Machine::load_from_text(text, ToneSink::new())?;
    machine.set_bpm(bpm);
    let mut rng = SmallRng::seed_from_u64(seed);

    let frames_per_tick = orca_core::Config::new(bpm).frames_per_tick();
    let total_frames = (ticks * frames_per_tick) as usize;
    let samples_per_frame = (orca_core::config::SAMPLE_RATE_HZ / orca_core::config::FRAMES_PER_SECOND) as usize;

    let mut samples = vec![0i16; total_frames * samples_per_frame * 2];
    for video_frame in samples.chunks_mut(samples_per_frame * 2) {
        machine.run_frame(&mut rng, video_frame);
    }

    crate::playback::play_blocking(samples, orca_core::config::SAMPLE_RATE_HZ)
}
