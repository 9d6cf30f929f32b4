use std::io;

use crate::score::{Pitch, Tick};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{name} {value} is out of range")]
    Range { name: &'static str, value: i64 },

    #[error("tone timbre {found} does not match timbre {expected}")]
    TimbreMismatch { expected: u8, found: u8 },

    #[error("tone pitch {found} does not match row pitch {expected}")]
    PitchMismatch { expected: Pitch, found: Pitch },

    #[error("tick {0} is already occupied")]
    SlotOccupied(Tick),

    #[error("tone starting at tick {start} overlaps the tone starting at tick {other}")]
    Overlap { start: Tick, other: Tick },

    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
