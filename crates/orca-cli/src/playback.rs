//! Real-time playback of a pre-rendered sample buffer, via the same
//! `rodio` output stream/sink pair a chip-emulator CLI would wire up for
//! its own audio device, minus the ring-buffer producer/consumer split: a
//! CLI run renders a bounded number of ticks up front, so there is no live
//! producer thread to stream from.

use anyhow::{Context, Result};
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, Sink};

/// Play `samples` (interleaved stereo i16) to the default output device and
/// block until playback finishes.
pub fn play_blocking(samples: Vec<i16>, sample_rate: u32) -> Result<()> {
    let (_stream, stream_handle) =
        OutputStream::try_default().context("no default audio output device")?;
    let sink = Sink::try_new(&stream_handle).context("failed to create audio sink")?;
    sink.append(SamplesBuffer::new(2, sample_rate, samples));
    sink.sleep_until_end();
    Ok(())
}
