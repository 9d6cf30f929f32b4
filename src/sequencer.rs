//! Lowering a composition into a flat, time-ordered event stream.
//!
//! Each tone contributes one note-on at its start tick and one note-off at
//! its end tick. Events sharing a tick are ordered note-off first, then by
//! timbre and pitch, so a pitch retriggered back-to-back is released before
//! it is struck again. The stream is recomputed from the composition on
//! every call, never cached.

use serde::Serialize;

use crate::score::{Composition, Tick};

/// What happens to a note at an event's tick.
// Declaration order gives note-offs precedence at equal ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    NoteOff,
    NoteOn,
}

/// One step of the lowered stream: trigger `kind` for the note identified
/// by timbre and linear pitch, at `volume`, when the transport reaches
/// `tick`.
// Field order gives the derived ordering: tick, then kind, then identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Event {
    pub tick: Tick,
    pub kind: EventKind,
    pub timbre: u8,
    pub pitch: i32,
    pub volume: u8,
}

/// Flattens a composition into its time-ordered note-on/note-off sequence.
pub fn lower(composition: &Composition) -> Vec<Event> {
    let mut events = Vec::new();
    for sheet in composition.sheets() {
        for row in sheet.rows() {
            for tone in row.tones() {
                events.push(Event {
                    tick: tone.start(),
                    kind: EventKind::NoteOn,
                    timbre: tone.timbre(),
                    pitch: tone.linear_pitch(),
                    volume: tone.volume(),
                });
                events.push(Event {
                    tick: tone.end(),
                    kind: EventKind::NoteOff,
                    timbre: tone.timbre(),
                    pitch: tone.linear_pitch(),
                    volume: tone.volume(),
                });
            }
        }
    }
    events.sort_unstable();
    events
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let kind = match self.kind {
            EventKind::NoteOn => "on",
            EventKind::NoteOff => "off",
        };
        write!(
            f,
            "{:>8} {:<3} timbre={:<3} pitch={:<3} volume={}",
            self.tick, kind, self.timbre, self.pitch, self.volume
        )
    }
}
