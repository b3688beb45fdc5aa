//! Sixteen-by-sixteen sub-tile bitsets.
//!
//! Row `y` of a mask is one `u16`; bit 15 (the most significant) is column 0,
//! the leftmost pixel of the tile.

use bitflags::bitflags;

use crate::config::MotionConfig;

const ROWS: usize = MotionConfig::TILE_SIZE as usize;

/// Fixed 16×16 bitset describing which pixels of a tile carry a property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubTileMask([u16; ROWS]);

impl SubTileMask {
    pub const EMPTY: Self = Self([0; ROWS]);
    pub const FULL: Self = Self([u16::MAX; ROWS]);

    pub const fn from_rows(rows: [u16; ROWS]) -> Self {
        Self(rows)
    }

    pub fn rows(&self) -> &[u16; ROWS] {
        &self.0
    }

    /// Mask covering the pixel columns `from..to` on every row.
    pub fn columns(from: u8, to: u8) -> Self {
        let mut row = 0u16;
        for x in from.min(16)..to.min(16) {
            row |= 0x8000 >> x;
        }
        Self([row; ROWS])
    }

    /// Mask covering the pixel rows `from..to` across the full width.
    pub fn rows_between(from: u8, to: u8) -> Self {
        let mut rows = [0u16; ROWS];
        for y in from.min(16)..to.min(16) {
            rows[y as usize] = u16::MAX;
        }
        Self(rows)
    }

    #[inline]
    pub fn contains(&self, x: u8, y: u8) -> bool {
        let (x, y) = (x as usize, y as usize);
        if x >= ROWS || y >= ROWS {
            return false;
        }
        self.0[y] & (0x8000 >> x) != 0
    }

    pub fn set(&mut self, x: u8, y: u8) {
        if (x as usize) < ROWS && (y as usize) < ROWS {
            self.0[y as usize] |= 0x8000 >> x;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|row| *row == 0)
    }

    pub fn is_full(&self) -> bool {
        self.0.iter().all(|row| *row == u16::MAX)
    }

    pub fn union(mut self, other: &Self) -> Self {
        for (row, add) in self.0.iter_mut().zip(other.0.iter()) {
            *row |= *add;
        }
        self
    }

    pub fn subtract(mut self, other: &Self) -> Self {
        for (row, cut) in self.0.iter_mut().zip(other.0.iter()) {
            *row &= !*cut;
        }
        self
    }
}

/// A bitmap-capable behavior field.
///
/// Exactly one state holds at a time: the property is absent everywhere,
/// present everywhere, or present on an explicit, partial set of pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BitmapField {
    #[default]
    Absent,
    All,
    Mask(SubTileMask),
}

impl BitmapField {
    /// Normalizes a mask into the canonical state: a full mask becomes `All`
    /// and an empty mask `Absent`.
    pub fn collapse(mask: SubTileMask) -> Self {
        if mask.is_full() {
            BitmapField::All
        } else if mask.is_empty() {
            BitmapField::Absent
        } else {
            BitmapField::Mask(mask)
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, BitmapField::Absent)
    }

    pub fn is_all(&self) -> bool {
        matches!(self, BitmapField::All)
    }

    /// Whether any pixel carries the property.
    pub fn is_set(&self) -> bool {
        !self.is_absent()
    }

    /// Bitset view of this field.
    pub fn to_mask(&self) -> SubTileMask {
        match self {
            BitmapField::Absent => SubTileMask::EMPTY,
            BitmapField::All => SubTileMask::FULL,
            BitmapField::Mask(mask) => *mask,
        }
    }

    /// The explicit partial map, if this field is one.
    pub fn map(&self) -> Option<&SubTileMask> {
        match self {
            BitmapField::Mask(mask) => Some(mask),
            _ => None,
        }
    }

    /// Whether the pixel at `(x, y)` inside the tile carries the property.
    pub fn at(&self, x: u8, y: u8) -> bool {
        match self {
            BitmapField::Absent => false,
            BitmapField::All => true,
            BitmapField::Mask(mask) => mask.contains(x, y),
        }
    }

    /// Resolves the field for a single pixel into `All` or `Absent`.
    pub fn resolve_pixel(&self, x: u8, y: u8) -> Self {
        if self.at(x, y) {
            BitmapField::All
        } else {
            BitmapField::Absent
        }
    }
}

bitflags! {
    /// Selects the bitmap-capable fields of a behavior record.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct BitmapKinds: u8 {
        const SOLID = 1 << 0;
        const LAVA  = 1 << 1;
        const PIT   = 1 << 2;
    }
}

/// Folds one layer's bitmap field onto the accumulated base.
///
/// * `new_flag == Some(true)` wins outright.
/// * `new_flag == Some(false)`, or a base that is absent, yields exactly `new_map`.
/// * Otherwise the base (zeroed when any of `overrides` is set) has every
///   `subtracted` mask removed and `new_map` unioned in.
///
/// The result is collapsed back to `All`, `Absent` or a partial `Mask`.
pub fn merge_bitmap(
    base: BitmapField,
    new_flag: Option<bool>,
    new_map: Option<&SubTileMask>,
    overrides: &[bool],
    subtracted: &[SubTileMask],
) -> BitmapField {
    if new_flag == Some(true) {
        return BitmapField::All;
    }
    if new_flag == Some(false) || base.is_absent() {
        return new_map.map_or(BitmapField::Absent, |map| BitmapField::collapse(*map));
    }

    let mut mask = if overrides.iter().any(|o| *o) {
        SubTileMask::EMPTY
    } else {
        base.to_mask()
    };
    for cut in subtracted {
        mask = mask.subtract(cut);
    }
    if let Some(map) = new_map {
        mask = mask.union(map);
    }
    BitmapField::collapse(mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn most_significant_bit_is_leftmost_column() {
        let mask = SubTileMask::columns(0, 1);
        assert_eq!(mask.rows()[0], 0x8000);
        assert!(mask.contains(0, 7));
        assert!(!mask.contains(1, 7));

        let right = SubTileMask::columns(12, 16);
        assert_eq!(right.rows()[3], 0x000F);
        assert!(right.contains(15, 3));
    }

    #[test]
    fn collapse_normalizes_extremes() {
        assert_eq!(BitmapField::collapse(SubTileMask::FULL), BitmapField::All);
        assert_eq!(BitmapField::collapse(SubTileMask::EMPTY), BitmapField::Absent);
        let half = SubTileMask::rows_between(0, 8);
        assert_eq!(BitmapField::collapse(half), BitmapField::Mask(half));
    }

    #[test]
    fn explicit_false_over_true_is_empty() {
        let merged = merge_bitmap(BitmapField::All, Some(false), None, &[], &[]);
        assert_eq!(merged, BitmapField::Absent);
    }

    #[test]
    fn true_wins_outright() {
        let base = BitmapField::Mask(SubTileMask::columns(0, 4));
        assert_eq!(merge_bitmap(base, Some(true), None, &[true], &[]), BitmapField::All);
    }

    #[test]
    fn absent_base_takes_new_map() {
        let map = SubTileMask::columns(4, 8);
        let merged = merge_bitmap(BitmapField::Absent, None, Some(&map), &[], &[]);
        assert_eq!(merged, BitmapField::Mask(map));
    }

    #[test]
    fn override_zeroes_base_before_union() {
        let base = BitmapField::Mask(SubTileMask::columns(0, 8));
        let map = SubTileMask::columns(12, 16);
        let merged = merge_bitmap(base, None, Some(&map), &[false, true], &[]);
        assert_eq!(merged, BitmapField::Mask(map));
    }

    #[test]
    fn subtract_then_union() {
        let base = BitmapField::All;
        let cut = SubTileMask::columns(0, 8);
        let add = SubTileMask::columns(0, 2);
        let merged = merge_bitmap(base, None, Some(&add), &[], &[cut]);
        assert_eq!(
            merged,
            BitmapField::Mask(SubTileMask::columns(0, 2).union(&SubTileMask::columns(8, 16)))
        );
    }

    #[test]
    fn subtracting_everything_collapses_to_absent() {
        let merged = merge_bitmap(BitmapField::All, None, None, &[], &[SubTileMask::FULL]);
        assert_eq!(merged, BitmapField::Absent);
    }

    #[test]
    fn reapplying_the_same_layer_is_idempotent() {
        let map = SubTileMask::rows_between(4, 12);
        let cut = SubTileMask::columns(0, 3);
        let cases = [
            (BitmapField::All, None),
            (BitmapField::Absent, Some(false)),
            (BitmapField::Mask(SubTileMask::columns(5, 9)), None),
            (BitmapField::Mask(SubTileMask::columns(5, 9)), Some(true)),
        ];
        for (base, flag) in cases {
            let once = merge_bitmap(base, flag, Some(&map), &[], &[cut]);
            let twice = merge_bitmap(once, flag, Some(&map), &[], &[cut]);
            assert_eq!(once, twice, "base {base:?} flag {flag:?}");
        }
    }
}
