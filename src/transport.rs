//! Playback transport state.

use crate::score::{Tick, DEFAULT_TEMPO};

/// Where playback stands: tempo, current beat, and whether the transport is
/// running. Purely state; driving an audio backend from it is a consumer's
/// job.
#[derive(Clone, Copy, Debug)]
pub struct Transport {
    tempo: u32,
    beat: Tick,
    running: bool,
}

impl Transport {
    pub fn new() -> Transport {
        Transport {
            tempo: DEFAULT_TEMPO,
            beat: 0,
            running: false,
        }
    }

    pub fn play(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn beat(&self) -> Tick {
        self.beat
    }

    pub fn set_beat(&mut self, beat: Tick) {
        self.beat = beat;
    }

    /// The tempo in microseconds per beat.
    pub fn tempo(&self) -> u32 {
        self.tempo
    }

    pub fn set_tempo(&mut self, tempo: u32) {
        self.tempo = tempo;
    }
}

impl Default for Transport {
    fn default() -> Transport {
        Transport::new()
    }
}
