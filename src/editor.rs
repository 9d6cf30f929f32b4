//! The editing surface: a composition plus cursor and transport state.

use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::score::{Composition, Pitch, Tick, Tone, TIMBRE_MAX, TIMBRE_MIN};
use crate::sequencer::{self, Event};
use crate::transport::Transport;

/// A composition under edit. The editor tracks which timbre is selected and
/// where the transport stands, and resolves pitch-only operations against
/// that cursor the way a grid cursor would.
#[derive(Clone, Debug)]
pub struct Editor {
    composition: Composition,
    transport: Transport,
    timbre: u8,
}

impl Editor {
    pub fn new() -> Editor {
        Editor::with_composition(Composition::new())
    }

    pub fn with_composition(composition: Composition) -> Editor {
        Editor {
            composition,
            transport: Transport::new(),
            timbre: TIMBRE_MIN,
        }
    }

    /// Read-only view of the composition, for rendering.
    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    /// The selected timbre.
    pub fn timbre(&self) -> u8 {
        self.timbre
    }

    pub fn set_timbre(&mut self, timbre: u8) -> Result<()> {
        if !(TIMBRE_MIN..=TIMBRE_MAX).contains(&timbre) {
            return Err(Error::Range {
                name: "timbre",
                value: timbre as i64,
            });
        }
        self.timbre = timbre;
        Ok(())
    }

    pub fn add_tone(&mut self, tone: Tone) -> Result<()> {
        self.composition.add_tone(tone)
    }

    /// Removes the tone of the given pitch at the current timbre and beat.
    pub fn remove_tone(&mut self, pitch: Pitch) -> Option<Tone> {
        self.composition
            .remove_tone(self.timbre, pitch, self.transport.beat())
    }

    pub fn remove_exact(&mut self, tone: &Tone) -> bool {
        self.composition.remove_exact(tone)
    }

    /// The tone of the given pitch at the current timbre and beat.
    pub fn get_tone(&self, pitch: Pitch) -> Option<Tone> {
        self.composition
            .get_tone(self.timbre, pitch, self.transport.beat())
    }

    /// The chromatic span of the selected timbre's sheet.
    pub fn range(&self) -> BTreeSet<Pitch> {
        self.composition.range(self.timbre)
    }

    pub fn length(&self) -> Tick {
        self.composition.length()
    }

    pub fn is_empty(&self) -> bool {
        self.composition.is_empty()
    }

    /// Lowers the composition to its event stream.
    pub fn events(&self) -> Vec<Event> {
        sequencer::lower(&self.composition)
    }

    pub fn play(&mut self) {
        self.transport.play();
    }

    pub fn pause(&mut self) {
        self.transport.pause();
    }

    pub fn is_running(&self) -> bool {
        self.transport.is_running()
    }

    pub fn beat(&self) -> Tick {
        self.transport.beat()
    }

    pub fn set_beat(&mut self, beat: Tick) {
        self.transport.set_beat(beat);
    }

    pub fn tempo(&self) -> u32 {
        self.transport.tempo()
    }

    pub fn set_tempo(&mut self, tempo: u32) {
        self.transport.set_tempo(tempo);
    }
}

impl Default for Editor {
    fn default() -> Editor {
        Editor::new()
    }
}
