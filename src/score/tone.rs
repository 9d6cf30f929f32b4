//! Single sounding notes.

use crate::error::{Error, Result};
use crate::score::pitch::Pitch;
use crate::score::{Tick, TIMBRE_MAX, TIMBRE_MIN};

/// A single sounding note: pitch, start tick, duration, volume, and the
/// instrument (timbre) it sounds on.
///
/// A tone occupies the half-open tick interval `[start, start + duration)`;
/// a zero-duration tone occupies no ticks. Tones are plain values with
/// structural equality, so two tones with identical fields are
/// interchangeable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tone {
    pitch: Pitch,
    start: Tick,
    duration: Tick,
    volume: u8,
    timbre: u8,
}

impl Tone {
    /// Builds a tone, validating the timbre against the MIDI instrument
    /// domain and rejecting a start/duration pair whose end tick would wrap.
    pub fn new(pitch: Pitch, start: Tick, duration: Tick, volume: u8, timbre: u8) -> Result<Tone> {
        if !(TIMBRE_MIN..=TIMBRE_MAX).contains(&timbre) {
            return Err(Error::Range {
                name: "timbre",
                value: timbre as i64,
            });
        }
        if start.checked_add(duration).is_none() {
            return Err(Error::Range {
                name: "tone end tick",
                value: start as i64 + duration as i64,
            });
        }
        Ok(Tone {
            pitch,
            start,
            duration,
            volume,
            timbre,
        })
    }

    pub fn pitch(&self) -> Pitch {
        self.pitch
    }

    pub fn start(&self) -> Tick {
        self.start
    }

    pub fn duration(&self) -> Tick {
        self.duration
    }

    /// First tick past the occupied interval.
    pub fn end(&self) -> Tick {
        self.start + self.duration
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn timbre(&self) -> u8 {
        self.timbre
    }

    /// The linear code of this tone's pitch.
    pub fn linear_pitch(&self) -> i32 {
        self.pitch.to_linear_code()
    }
}
