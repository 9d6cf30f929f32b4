//! Per-pitch tone rows.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::score::pitch::Pitch;
use crate::score::tone::Tone;
use crate::score::{Tick, TIMBRE_MAX, TIMBRE_MIN};

/// All tones of one pitch within one timbre, keyed by start tick.
///
/// Invariant: the occupied intervals `[start, start + duration)` of any two
/// entries are disjoint. Zero-duration tones occupy no ticks and never
/// conflict, but at most one tone may start at any given tick.
#[derive(Clone, Debug)]
pub struct Row {
    pitch: Pitch,
    timbre: u8,
    tones: BTreeMap<Tick, Tone>,
}

impl Row {
    pub fn new(pitch: Pitch, timbre: u8) -> Result<Row> {
        if !(TIMBRE_MIN..=TIMBRE_MAX).contains(&timbre) {
            return Err(Error::Range {
                name: "timbre",
                value: timbre as i64,
            });
        }
        Ok(Row {
            pitch,
            timbre,
            tones: BTreeMap::new(),
        })
    }

    pub fn pitch(&self) -> Pitch {
        self.pitch
    }

    pub fn timbre(&self) -> u8 {
        self.timbre
    }

    /// Inserts a tone, rejecting it if it belongs to another row or if its
    /// occupied interval collides with an existing entry. Only the nearest
    /// interval-occupying entry on each side needs to be examined; entries
    /// beyond it cannot reach the insertion point without already having
    /// violated the invariant. On error the row is untouched.
    pub fn insert(&mut self, tone: Tone) -> Result<()> {
        if tone.timbre() != self.timbre {
            return Err(Error::TimbreMismatch {
                expected: self.timbre,
                found: tone.timbre(),
            });
        }
        if tone.pitch() != self.pitch {
            return Err(Error::PitchMismatch {
                expected: self.pitch,
                found: tone.pitch(),
            });
        }
        let start = tone.start();
        if self.tones.contains_key(&start) {
            return Err(Error::SlotOccupied(start));
        }
        if tone.duration() > 0 {
            // Zero-duration entries occupy no ticks; skip past them to the
            // nearest predecessor that can actually intersect.
            for (&prev_start, prev) in self.tones.range(..start).rev() {
                if prev.duration() == 0 {
                    continue;
                }
                if prev.end() > start {
                    return Err(Error::Overlap {
                        start,
                        other: prev_start,
                    });
                }
                break;
            }
            // The exact key is vacant, so this walks strict successors. Any
            // occupying entry starting inside [start, end) intersects.
            for (&next_start, next) in self.tones.range(start..) {
                if next_start >= tone.end() {
                    break;
                }
                if next.duration() > 0 {
                    return Err(Error::Overlap {
                        start,
                        other: next_start,
                    });
                }
            }
        }
        self.tones.insert(start, tone);
        Ok(())
    }

    /// Removes and returns the tone starting exactly at `tick`.
    pub fn remove_at(&mut self, tick: Tick) -> Option<Tone> {
        self.tones.remove(&tick)
    }

    /// Removes the given tone only if an entry with identical fields starts
    /// at its start tick.
    pub fn remove_exact(&mut self, tone: &Tone) -> bool {
        if self.tones.get(&tone.start()) == Some(tone) {
            self.tones.remove(&tone.start());
            true
        } else {
            false
        }
    }

    /// The tone starting exactly at `tick`, if any.
    pub fn get(&self, tick: Tick) -> Option<Tone> {
        self.tones.get(&tick).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.tones.is_empty()
    }

    /// One past the last occupied tick, or 0 for an empty row. Trailing
    /// zero-duration tones occupy nothing but still count as positions, so
    /// the scan continues past them to the last occupying tone.
    pub fn length(&self) -> Tick {
        let mut length = 0;
        for tone in self.tones.values().rev() {
            length = length.max(tone.end());
            if tone.duration() > 0 {
                break;
            }
        }
        length
    }

    /// All tones in start-tick order.
    pub fn tones(&self) -> impl Iterator<Item = &Tone> {
        self.tones.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::pitch::NoteClass;

    fn c4() -> Pitch {
        Pitch::new(NoteClass::C, 4).unwrap()
    }

    fn tone(start: Tick, duration: Tick) -> Tone {
        Tone::new(c4(), start, duration, 80, 1).unwrap()
    }

    #[test]
    fn test_rejects_wrong_timbre_and_pitch() {
        let mut row = Row::new(c4(), 1).unwrap();
        let wrong_timbre = Tone::new(c4(), 0, 1, 80, 2).unwrap();
        assert!(matches!(
            row.insert(wrong_timbre),
            Err(Error::TimbreMismatch { .. })
        ));
        let d4 = Pitch::new(NoteClass::D, 4).unwrap();
        let wrong_pitch = Tone::new(d4, 0, 1, 80, 1).unwrap();
        assert!(matches!(
            row.insert(wrong_pitch),
            Err(Error::PitchMismatch { .. })
        ));
        assert!(row.is_empty());
    }

    #[test]
    fn test_timbre_domain_checked_on_construction() {
        Row::new(c4(), 0).unwrap_err();
        Row::new(c4(), 129).unwrap_err();
        Row::new(c4(), 1).unwrap();
        Row::new(c4(), 128).unwrap();
    }

    #[test]
    fn test_exact_tick_collision() {
        let mut row = Row::new(c4(), 1).unwrap();
        row.insert(tone(4, 2)).unwrap();
        assert!(matches!(row.insert(tone(4, 1)), Err(Error::SlotOccupied(4))));
    }

    #[test]
    fn test_overlap_rejected_in_either_direction() {
        let mut row = Row::new(c4(), 1).unwrap();
        row.insert(tone(4, 4)).unwrap();
        // falls inside [4, 8)
        assert!(matches!(row.insert(tone(6, 1)), Err(Error::Overlap { .. })));
        // would cover the existing start
        assert!(matches!(row.insert(tone(2, 3)), Err(Error::Overlap { .. })));
        // adjacency on both sides is fine
        row.insert(tone(0, 4)).unwrap();
        row.insert(tone(8, 2)).unwrap();
        assert_eq!(row.length(), 10);
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let tones = [tone(0, 4), tone(4, 2), tone(8, 1), tone(10, 3)];
        let orders = [[0, 1, 2, 3], [3, 2, 1, 0], [2, 0, 3, 1], [1, 3, 0, 2]];
        for order in orders {
            let mut row = Row::new(c4(), 1).unwrap();
            for i in order {
                row.insert(tones[i]).unwrap();
            }
            let collected: Vec<Tone> = row.tones().copied().collect();
            assert_eq!(collected, tones.to_vec());
            assert_eq!(row.length(), 13);
        }
    }

    #[test]
    fn test_zero_duration_never_conflicts() {
        let mut row = Row::new(c4(), 1).unwrap();
        row.insert(tone(4, 4)).unwrap();
        // inside another tone's interval, but occupies nothing
        row.insert(tone(6, 0)).unwrap();
        // the start tick itself is still unique
        assert!(matches!(row.insert(tone(6, 2)), Err(Error::SlotOccupied(6))));
        // covering a zero-duration entry's tick is fine too
        let mut other = Row::new(c4(), 1).unwrap();
        other.insert(tone(6, 0)).unwrap();
        other.insert(tone(5, 3)).unwrap();
        assert_eq!(other.length(), 8);
    }

    #[test]
    fn test_overlap_detected_past_zero_duration_entries() {
        let mut row = Row::new(c4(), 1).unwrap();
        row.insert(tone(2, 6)).unwrap();
        row.insert(tone(6, 0)).unwrap();
        // overlaps [2, 8) even though the nearest predecessor is at 6
        assert!(matches!(
            row.insert(tone(7, 2)),
            Err(Error::Overlap { start: 7, other: 2 })
        ));
        // successor side: a zero-duration entry hides an occupying one
        let mut other = Row::new(c4(), 1).unwrap();
        other.insert(tone(6, 0)).unwrap();
        other.insert(tone(7, 2)).unwrap();
        assert!(matches!(
            other.insert(tone(5, 3)),
            Err(Error::Overlap { start: 5, other: 7 })
        ));
    }

    #[test]
    fn test_remove_and_reinsert_round_trip() {
        let mut row = Row::new(c4(), 1).unwrap();
        row.insert(tone(0, 4)).unwrap();
        row.insert(tone(4, 2)).unwrap();
        let before: Vec<Tone> = row.tones().copied().collect();
        let removed = row.remove_at(0).unwrap();
        assert_eq!(removed, tone(0, 4));
        row.insert(removed).unwrap();
        let after: Vec<Tone> = row.tones().copied().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_remove_exact_requires_identical_fields() {
        let mut row = Row::new(c4(), 1).unwrap();
        row.insert(tone(0, 4)).unwrap();
        let louder = Tone::new(c4(), 0, 4, 127, 1).unwrap();
        assert!(!row.remove_exact(&louder));
        assert!(row.remove_exact(&tone(0, 4)));
        assert!(row.is_empty());
    }

    #[test]
    fn test_get_and_length() {
        let mut row = Row::new(c4(), 1).unwrap();
        assert_eq!(row.length(), 0);
        assert_eq!(row.get(0), None);
        row.insert(tone(3, 5)).unwrap();
        assert_eq!(row.get(3), Some(tone(3, 5)));
        assert_eq!(row.get(4), None);
        assert_eq!(row.length(), 8);
    }
}
