//! The hierarchical composition model.
//!
//! A [`Composition`] indexes [`Sheet`]s by timbre; a sheet indexes [`Row`]s
//! by pitch; a row indexes [`Tone`]s by start tick. Every container is
//! created lazily when its first child arrives and pruned when its last
//! child goes, so an empty composition holds nothing at all. The
//! composition is the sole entry point for tone mutation.

pub mod feature;
pub mod pitch;
pub mod row;
pub mod sheet;
pub mod tone;

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};

pub use feature::{Feature, Repeat};
pub use pitch::{NoteClass, Pitch};
pub use row::Row;
pub use sheet::Sheet;
pub use tone::Tone;

/// The discrete time unit for starts and durations.
pub type Tick = u32;

/// Lowest valid MIDI instrument code.
pub const TIMBRE_MIN: u8 = 1;
/// Highest valid MIDI instrument code.
pub const TIMBRE_MAX: u8 = 128;

/// Default tempo in microseconds per beat.
pub const DEFAULT_TEMPO: u32 = 200_000;

/// A full multi-timbre piece: sheets keyed by timbre plus timeline features
/// keyed by tick.
#[derive(Clone, Debug, Default)]
pub struct Composition {
    sheets: BTreeMap<u8, Sheet>,
    features: BTreeMap<Tick, Feature>,
}

impl Composition {
    pub fn new() -> Composition {
        Composition::default()
    }

    /// Adds a tone, creating the sheet for its timbre if absent. A fresh
    /// sheet is only linked in once the tone is in it, so a failed insert
    /// leaves no empty sheet behind.
    pub fn add_tone(&mut self, tone: Tone) -> Result<()> {
        match self.sheets.entry(tone.timbre()) {
            Entry::Occupied(mut entry) => entry.get_mut().add_tone(tone),
            Entry::Vacant(entry) => {
                let mut sheet = Sheet::new(tone.timbre())?;
                sheet.add_tone(tone)?;
                entry.insert(sheet);
                Ok(())
            }
        }
    }

    /// Removes the tone of the given timbre and pitch starting at `tick`,
    /// pruning the sheet if that empties it.
    pub fn remove_tone(&mut self, timbre: u8, pitch: Pitch, tick: Tick) -> Option<Tone> {
        let sheet = self.sheets.get_mut(&timbre)?;
        let removed = sheet.remove_tone(pitch, tick);
        if sheet.is_empty() {
            self.sheets.remove(&timbre);
        }
        removed
    }

    /// Removes the given tone if an identical one exists, pruning the sheet
    /// if that empties it.
    pub fn remove_exact(&mut self, tone: &Tone) -> bool {
        let Some(sheet) = self.sheets.get_mut(&tone.timbre()) else {
            return false;
        };
        let removed = sheet.remove_exact(tone);
        if sheet.is_empty() {
            self.sheets.remove(&tone.timbre());
        }
        removed
    }

    /// The tone of the given timbre and pitch starting at `tick`, if any.
    /// Returns a copy; the stored value cannot be reached from outside.
    pub fn get_tone(&self, timbre: u8, pitch: Pitch, tick: Tick) -> Option<Tone> {
        self.sheets.get(&timbre)?.get_tone(pitch, tick)
    }

    /// The chromatic span of the sheet with the given timbre, empty if no
    /// such sheet exists.
    pub fn range(&self, timbre: u8) -> BTreeSet<Pitch> {
        self.sheets
            .get(&timbre)
            .map(Sheet::range)
            .unwrap_or_default()
    }

    /// The number of ticks this composition spans: the greatest sheet
    /// length, or the last feature tick if that lies further out.
    pub fn length(&self) -> Tick {
        let sheets = self.sheets.values().map(Sheet::length).max().unwrap_or(0);
        let features = self.features.keys().next_back().copied().unwrap_or(0);
        sheets.max(features)
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Places a feature at `tick`. Features never overlap; only an
    /// exact-tick collision is rejected.
    pub fn add_feature(&mut self, feature: Feature, tick: Tick) -> Result<()> {
        match self.features.entry(tick) {
            Entry::Occupied(_) => Err(Error::SlotOccupied(tick)),
            Entry::Vacant(entry) => {
                entry.insert(feature);
                Ok(())
            }
        }
    }

    pub fn remove_feature(&mut self, tick: Tick) -> Option<Feature> {
        self.features.remove(&tick)
    }

    pub fn get_feature(&self, tick: Tick) -> Option<Feature> {
        self.features.get(&tick).copied()
    }

    /// All features in tick order.
    pub fn features(&self) -> impl Iterator<Item = (Tick, &Feature)> {
        self.features.iter().map(|(&tick, feature)| (tick, feature))
    }

    /// All sheets in ascending timbre order.
    pub fn sheets(&self) -> impl Iterator<Item = &Sheet> {
        self.sheets.values()
    }
}

/// Constructs a composition note by note, the contract the score reader
/// builds through.
#[derive(Clone, Debug)]
pub struct Builder {
    composition: Composition,
    tempo: u32,
}

impl Builder {
    pub fn new() -> Builder {
        Builder {
            composition: Composition::new(),
            tempo: DEFAULT_TEMPO,
        }
    }

    pub fn set_tempo(&mut self, tempo: u32) -> &mut Builder {
        self.tempo = tempo;
        self
    }

    /// Adds one tone spanning `[start, end)` on the given timbre.
    pub fn add_note(
        &mut self,
        start: Tick,
        end: Tick,
        timbre: u8,
        linear_pitch: i32,
        volume: u8,
    ) -> Result<&mut Builder> {
        let Some(duration) = end.checked_sub(start) else {
            return Err(Error::Range {
                name: "note end tick",
                value: end as i64,
            });
        };
        let pitch = Pitch::from_linear_code(linear_pitch)?;
        self.composition
            .add_tone(Tone::new(pitch, start, duration, volume, timbre)?)?;
        Ok(self)
    }

    /// Places a repeat feature at `tick`.
    pub fn add_repeat(&mut self, tick: Tick, rewind: Tick, loops: u32) -> Result<&mut Builder> {
        self.composition
            .add_feature(Feature::Repeat(Repeat::new(rewind, loops)?), tick)?;
        Ok(self)
    }

    /// The tempo in microseconds per beat.
    pub fn tempo(&self) -> u32 {
        self.tempo
    }

    pub fn build(self) -> Composition {
        self.composition
    }
}

impl Default for Builder {
    fn default() -> Builder {
        Builder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c4() -> Pitch {
        Pitch::new(NoteClass::C, 4).unwrap()
    }

    fn tone(timbre: u8, start: Tick, duration: Tick) -> Tone {
        Tone::new(c4(), start, duration, 80, timbre).unwrap()
    }

    #[test]
    fn test_sheets_created_lazily_and_pruned() {
        let mut comp = Composition::new();
        assert!(comp.is_empty());
        comp.add_tone(tone(1, 0, 4)).unwrap();
        comp.add_tone(tone(5, 0, 4)).unwrap();
        assert_eq!(comp.sheets().count(), 2);
        assert_eq!(comp.remove_tone(5, c4(), 0), Some(tone(5, 0, 4)));
        assert_eq!(comp.sheets().count(), 1);
        assert!(comp.range(5).is_empty());
    }

    #[test]
    fn test_remove_from_missing_sheet() {
        let mut comp = Composition::new();
        assert!(comp.remove_tone(3, c4(), 0).is_none());
        assert!(!comp.remove_exact(&tone(3, 0, 4)));
    }

    #[test]
    fn test_get_tone_returns_copy() {
        let mut comp = Composition::new();
        comp.add_tone(tone(1, 0, 4)).unwrap();
        assert_eq!(comp.get_tone(1, c4(), 0), Some(tone(1, 0, 4)));
        assert!(comp.get_tone(2, c4(), 0).is_none());
        assert!(comp.get_tone(1, c4(), 1).is_none());
    }

    #[test]
    fn test_length_includes_features() {
        let mut comp = Composition::new();
        comp.add_tone(tone(1, 0, 6)).unwrap();
        assert_eq!(comp.length(), 6);
        comp.add_feature(Feature::Repeat(Repeat::once(4)), 16).unwrap();
        assert_eq!(comp.length(), 16);
        comp.remove_feature(16).unwrap();
        assert_eq!(comp.length(), 6);
    }

    #[test]
    fn test_feature_slot_collision() {
        let mut comp = Composition::new();
        comp.add_feature(Feature::Repeat(Repeat::once(4)), 8).unwrap();
        assert!(matches!(
            comp.add_feature(Feature::Repeat(Repeat::once(2)), 8),
            Err(Error::SlotOccupied(8))
        ));
        assert_eq!(
            comp.get_feature(8),
            Some(Feature::Repeat(Repeat::once(4)))
        );
    }

    #[test]
    fn test_builder_spans() {
        let mut builder = Builder::new();
        builder.set_tempo(500_000);
        builder.add_note(0, 4, 1, 60, 80).unwrap();
        builder.add_note(4, 6, 1, 60, 80).unwrap();
        builder.add_note(6, 2, 1, 60, 80).unwrap_err(); // end before start
        builder.add_note(8, 10, 1, 200, 80).unwrap_err(); // bad pitch code
        assert_eq!(builder.tempo(), 500_000);
        let comp = builder.build();
        assert_eq!(comp.length(), 6);
    }
}
