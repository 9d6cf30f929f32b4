//! Non-tone timeline markers.

use crate::error::{Error, Result};
use crate::score::Tick;

/// A marker placed on the composition timeline at a single tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feature {
    Repeat(Repeat),
}

/// A repeat instruction: rewind the transport by `rewind` ticks, `loops`
/// times.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Repeat {
    rewind: Tick,
    loops: u32,
}

impl Repeat {
    pub fn new(rewind: Tick, loops: u32) -> Result<Repeat> {
        if loops < 1 {
            return Err(Error::Range {
                name: "loop count",
                value: loops as i64,
            });
        }
        Ok(Repeat { rewind, loops })
    }

    /// A repeat that plays its span one extra time.
    pub fn once(rewind: Tick) -> Repeat {
        Repeat { rewind, loops: 1 }
    }

    pub fn rewind(&self) -> Tick {
        self.rewind
    }

    pub fn loops(&self) -> u32 {
        self.loops
    }
}
