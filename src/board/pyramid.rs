//! The card pyramid: per-age layout and covering graph
//!
//! Slots live in one contiguous vector; covering relationships are index
//! sets into that vector, wired once at age setup and never recomputed.
//! A slot is selectable iff it is not removed and nothing covers it, and
//! it turns face up at exactly the moment its last coverer is removed.

use crate::core::{CardId, EntityKey};
use crate::{DuelError, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One position in the pyramid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardSlot {
    pub card: CardId,
    pub row: u8,
    /// Index within the row, left to right
    pub index: u8,
    face_up: bool,
    removed: bool,
    /// Slot indices that must be removed before this one is selectable
    covered_by: SmallVec<[usize; 2]>,
}

impl CardSlot {
    pub fn is_face_up(&self) -> bool {
        self.face_up
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn covered_by(&self) -> &[usize] {
        &self.covered_by
    }

    pub fn is_selectable(&self) -> bool {
        !self.removed && self.covered_by.is_empty()
    }
}

/// Row shape of one age template
struct RowSpec {
    count: usize,
    face_up: bool,
}

const fn row(count: usize, face_up: bool) -> RowSpec {
    RowSpec { count, face_up }
}

/// Age 1: growing pyramid, bottom row free
const AGE_1_ROWS: [RowSpec; 5] = [
    row(2, true),
    row(3, false),
    row(4, true),
    row(5, false),
    row(6, true),
];

/// Age 2: inverted pyramid
const AGE_2_ROWS: [RowSpec; 5] = [
    row(6, true),
    row(5, false),
    row(4, true),
    row(3, false),
    row(2, true),
];

/// Age 3: two pyramids joined by a two-card waist
const AGE_3_ROWS: [RowSpec; 7] = [
    row(2, true),
    row(3, false),
    row(4, true),
    row(2, false),
    row(4, true),
    row(3, false),
    row(2, true),
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardPyramid {
    slots: Vec<CardSlot>,
}

impl CardPyramid {
    /// Lay out `deck` into the age template and wire the covering graph
    ///
    /// The deck must hold exactly as many cards as the template has slots.
    pub fn new(age: u8, deck: &[CardId]) -> Result<Self> {
        let rows: &[RowSpec] = match age {
            1 => &AGE_1_ROWS,
            2 => &AGE_2_ROWS,
            3 => &AGE_3_ROWS,
            _ => {
                return Err(DuelError::InvalidDefinition(format!(
                    "no pyramid template for age {age}"
                )))
            }
        };

        let slot_count: usize = rows.iter().map(|r| r.count).sum();
        if deck.len() != slot_count {
            return Err(DuelError::InvalidDefinition(format!(
                "age {age} pyramid needs {slot_count} cards, got {}",
                deck.len()
            )));
        }

        let mut slots = Vec::with_capacity(slot_count);
        let mut deck_iter = deck.iter();
        for (row_no, spec) in rows.iter().enumerate() {
            for col in 0..spec.count {
                slots.push(CardSlot {
                    card: *deck_iter.next().expect("deck length checked above"),
                    row: row_no as u8,
                    index: col as u8,
                    face_up: spec.face_up,
                    removed: false,
                    covered_by: SmallVec::new(),
                });
            }
        }

        let mut pyramid = CardPyramid { slots };
        match age {
            1 => pyramid.wire_growing(rows, 0),
            2 => pyramid.wire_shrinking(rows, 0),
            _ => pyramid.wire_age_3(rows),
        }
        Ok(pyramid)
    }

    /// Absolute slot index of (row, col) under the given template
    fn abs_index(rows: &[RowSpec], row: usize, col: usize) -> usize {
        rows[..row].iter().map(|r| r.count).sum::<usize>() + col
    }

    fn cover(&mut self, covered: usize, coverer: usize) {
        self.slots[covered].covered_by.push(coverer);
    }

    /// Rows grow downward: (r, i) is covered by (r+1, i) and (r+1, i+1)
    fn wire_growing(&mut self, rows: &[RowSpec], from_row: usize) {
        for r in from_row..rows.len() - 1 {
            for i in 0..rows[r].count {
                let covered = Self::abs_index(rows, r, i);
                self.cover(covered, Self::abs_index(rows, r + 1, i));
                self.cover(covered, Self::abs_index(rows, r + 1, i + 1));
            }
        }
    }

    /// Rows shrink downward: (r, i) is covered by (r+1, i-1) and (r+1, i)
    fn wire_shrinking(&mut self, rows: &[RowSpec], from_row: usize) {
        for r in from_row..rows.len() - 1 {
            for i in 0..rows[r].count {
                let covered = Self::abs_index(rows, r, i);
                if i > 0 {
                    self.cover(covered, Self::abs_index(rows, r + 1, i - 1));
                }
                if i < rows[r + 1].count {
                    self.cover(covered, Self::abs_index(rows, r + 1, i));
                }
            }
        }
    }

    /// Age 3 irregular wiring
    ///
    /// Rows 0-2 form a growing pyramid, rows 4-6 a shrinking one. The
    /// waist (row 3, two cards) partially overlaps both: each waist card
    /// covers two cards of row 2 and is covered by two cards of row 4.
    fn wire_age_3(&mut self, rows: &[RowSpec]) {
        // Upper pyramid: rows 0 and 1 covered by the row below
        for r in 0..2 {
            for i in 0..rows[r].count {
                let covered = Self::abs_index(rows, r, i);
                self.cover(covered, Self::abs_index(rows, r + 1, i));
                self.cover(covered, Self::abs_index(rows, r + 1, i + 1));
            }
        }
        // Waist over the upper pyramid's base
        for i in 0..rows[2].count {
            let covered = Self::abs_index(rows, 2, i);
            self.cover(covered, Self::abs_index(rows, 3, i / 2));
        }
        // Second four-row over the waist
        for i in 0..rows[3].count {
            let covered = Self::abs_index(rows, 3, i);
            self.cover(covered, Self::abs_index(rows, 4, 2 * i));
            self.cover(covered, Self::abs_index(rows, 4, 2 * i + 1));
        }
        // Lower inverted pyramid
        self.wire_shrinking(rows, 4);
    }

    pub fn slots(&self) -> &[CardSlot] {
        &self.slots
    }

    /// Slots a player may currently take, in layout order
    ///
    /// This is the authoritative "selectable" set for validators and
    /// automated agents.
    pub fn selectable(&self) -> impl Iterator<Item = &CardSlot> {
        self.slots.iter().filter(|slot| slot.is_selectable())
    }

    pub fn is_selectable(&self, card: CardId) -> bool {
        self.selectable().any(|slot| slot.card == card)
    }

    pub fn remaining_count(&self) -> usize {
        self.slots.iter().filter(|slot| !slot.removed).count()
    }

    pub fn is_exhausted(&self) -> bool {
        self.slots.iter().all(|slot| slot.removed)
    }

    /// Remove a card, unlinking it from every covering set
    ///
    /// Slots whose covering set becomes empty flip face up immediately.
    pub fn remove_card(&mut self, card: CardId) -> Result<()> {
        let pos = self
            .slots
            .iter()
            .position(|slot| slot.card == card && !slot.removed)
            .ok_or(DuelError::CardNotFound(card.as_u32()))?;

        self.slots[pos].removed = true;
        for slot in &mut self.slots {
            slot.covered_by.retain(|idx| *idx != pos);
            if !slot.removed && slot.covered_by.is_empty() {
                slot.face_up = true;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck(n: usize) -> Vec<CardId> {
        (0..n as u32).map(CardId::new).collect()
    }

    #[test]
    fn test_age_1_layout() {
        let pyramid = CardPyramid::new(1, &deck(20)).unwrap();
        assert_eq!(pyramid.slots().len(), 20);

        // Only the bottom row of six is selectable at setup
        let selectable: Vec<_> = pyramid.selectable().collect();
        assert_eq!(selectable.len(), 6);
        assert!(selectable.iter().all(|slot| slot.row == 4));
        assert!(selectable.iter().all(|slot| slot.is_face_up()));

        // Odd rows start face down, even rows face up
        for slot in pyramid.slots() {
            assert_eq!(slot.is_face_up(), slot.row % 2 == 0);
        }
    }

    #[test]
    fn test_age_2_layout() {
        let pyramid = CardPyramid::new(2, &deck(20)).unwrap();

        // Inverted pyramid: the bottom two-card row is free
        let selectable: Vec<_> = pyramid.selectable().collect();
        assert_eq!(selectable.len(), 2);
        assert!(selectable.iter().all(|slot| slot.row == 4));
    }

    #[test]
    fn test_age_3_layout() {
        let pyramid = CardPyramid::new(3, &deck(20)).unwrap();
        assert_eq!(pyramid.slots().len(), 20);

        let selectable: Vec<_> = pyramid.selectable().collect();
        assert_eq!(selectable.len(), 2);
        assert!(selectable.iter().all(|slot| slot.row == 6));

        // The waist is covered by exactly two cards of the row below it
        let waist: Vec<_> = pyramid.slots().iter().filter(|s| s.row == 3).collect();
        assert_eq!(waist.len(), 2);
        assert!(waist.iter().all(|slot| slot.covered_by().len() == 2));
    }

    #[test]
    fn test_wrong_deck_size_rejected() {
        assert!(CardPyramid::new(1, &deck(19)).is_err());
        assert!(CardPyramid::new(4, &deck(20)).is_err());
    }

    #[test]
    fn test_removal_uncovers_and_flips() {
        let mut pyramid = CardPyramid::new(1, &deck(20)).unwrap();

        // Row 3 slot 0 (absolute index 9) is covered by bottom slots 14, 15
        let covered_slot = &pyramid.slots()[9];
        assert_eq!(covered_slot.row, 3);
        assert!(!covered_slot.is_face_up());
        assert_eq!(covered_slot.covered_by(), &[14, 15][..]);

        let first = pyramid.slots()[14].card;
        pyramid.remove_card(first).unwrap();
        // One coverer gone: still covered, still face down
        assert_eq!(pyramid.slots()[9].covered_by(), &[15][..]);
        assert!(!pyramid.slots()[9].is_face_up());

        let second = pyramid.slots()[15].card;
        pyramid.remove_card(second).unwrap();
        // Last coverer gone: flips face up at that exact moment
        assert!(pyramid.slots()[9].covered_by().is_empty());
        assert!(pyramid.slots()[9].is_face_up());
        assert!(pyramid.is_selectable(pyramid.slots()[9].card));
    }

    #[test]
    fn test_remove_rejects_covered_duplicate_and_unknown() {
        let mut pyramid = CardPyramid::new(1, &deck(20)).unwrap();

        let bottom = pyramid.slots()[14].card;
        pyramid.remove_card(bottom).unwrap();
        assert!(pyramid.remove_card(bottom).is_err(), "already removed");
        assert!(pyramid.remove_card(CardId::new(999)).is_err());
    }

    #[test]
    fn test_full_drain_exhausts_pyramid() {
        for age in 1..=3u8 {
            let mut pyramid = CardPyramid::new(age, &deck(20)).unwrap();
            for _ in 0..20 {
                assert!(!pyramid.is_exhausted());
                let next = pyramid.selectable().next().expect("a slot must be free").card;
                pyramid.remove_card(next).unwrap();
            }
            assert!(pyramid.is_exhausted());
            assert_eq!(pyramid.remaining_count(), 0);
            assert_eq!(pyramid.selectable().count(), 0);
        }
    }

    #[test]
    fn test_face_up_iff_uncovered_after_every_removal() {
        // Property from the covering invariant: after any removal, a
        // non-removed slot is face up iff its covering set is empty, for
        // every slot that started face down.
        let mut pyramid = CardPyramid::new(3, &deck(20)).unwrap();
        let started_down: Vec<bool> = pyramid.slots().iter().map(|s| !s.is_face_up()).collect();

        for _ in 0..20 {
            let next = pyramid.selectable().next().unwrap().card;
            pyramid.remove_card(next).unwrap();
            for (i, slot) in pyramid.slots().iter().enumerate() {
                if slot.is_removed() || !started_down[i] {
                    continue;
                }
                assert_eq!(slot.is_face_up(), slot.covered_by().is_empty());
            }
        }
    }
}
