use crate::behavior::bitmap::{BitmapField, BitmapKinds, SubTileMask};
use crate::state::{Direction, Directions};

/// Element carried by a damaging touch.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Element {
    Fire,
    Ice,
    Lightning,
}

/// Payload applied to anything that touches the tile or object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TouchHit {
    pub damage: u32,
    pub element: Option<Element>,
}

/// Directional ledge flags of a tile.
///
/// `edges` are positive flags: a fall exists crossing out of this tile in
/// that direction. `backfaces` record authoring-time `false` declarations
/// ("no ledge on my side, but the neighbor across this edge drops onto me");
/// they are turned into `edges` on the neighbor by the normalization pass and
/// remembered so those writes can be retracted when the tile is erased.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Ledges {
    pub edges: Directions,
    pub backfaces: Directions,
}

impl Ledges {
    pub fn edge(direction: Direction) -> Self {
        Self {
            edges: direction.flag(),
            backfaces: Directions::empty(),
        }
    }

    pub fn backface(direction: Direction) -> Self {
        Self {
            edges: Directions::empty(),
            backfaces: direction.flag(),
        }
    }

    pub fn has(&self, direction: Direction) -> bool {
        self.edges.has(direction)
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty() && self.backfaces.is_empty()
    }
}

/// Collision and hazard properties of a tile, sub-tile, or dynamic object.
///
/// The same record type describes an authored layer tile, the accumulated
/// grid cell, an object's contribution, and the pixel-resolved composite
/// returned to movement code. In the composite every [`BitmapField`] is
/// either `All` or `Absent`.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BehaviorRecord {
    pub solid: BitmapField,
    pub is_lava: BitmapField,
    pub pit: BitmapField,
    /// Bitmap fields this layer explicitly declares `false`.
    pub cleared: BitmapKinds,

    pub ground_height: i32,
    pub climbable: bool,
    pub ledges: Ledges,

    pub water: bool,
    pub shallow_water: bool,
    pub slippery: bool,
    pub cloud_ground: bool,
    pub is_brittle_ground: bool,
    pub is_frozen: bool,
    pub is_not_solid: bool,
    /// `Some(true)` covers whatever is below; `Some(false)` only decorates.
    pub is_ground: Option<bool>,
    pub touch_hit: Option<TouchHit>,
    /// Solid obstacles with a weight can be crushed by stronger actors.
    pub crush_weight: Option<u32>,

    pub light_radius: u16,
    pub brightness: f32,
}

impl BehaviorRecord {
    pub fn solid() -> Self {
        Self {
            solid: BitmapField::All,
            ..Self::default()
        }
    }

    pub fn solid_mask(mask: SubTileMask) -> Self {
        Self {
            solid: BitmapField::collapse(mask),
            ..Self::default()
        }
    }

    pub fn pit() -> Self {
        Self {
            pit: BitmapField::All,
            ..Self::default()
        }
    }

    pub fn lava() -> Self {
        Self {
            is_lava: BitmapField::All,
            ..Self::default()
        }
    }

    pub fn ground() -> Self {
        Self {
            is_ground: Some(true),
            ..Self::default()
        }
    }

    pub fn climbable() -> Self {
        Self {
            climbable: true,
            ..Self::default()
        }
    }

    pub fn water() -> Self {
        Self {
            water: true,
            ..Self::default()
        }
    }

    pub fn with_ledges(mut self, ledges: Ledges) -> Self {
        self.ledges = ledges;
        self
    }

    pub fn with_ground_height(mut self, ground_height: i32) -> Self {
        self.ground_height = ground_height;
        self
    }

    pub fn with_crush_weight(mut self, weight: u32) -> Self {
        self.crush_weight = Some(weight);
        self
    }

    /// Field accessor for the bitmap-capable kinds.
    pub fn bitmap(&self, kind: BitmapKinds) -> &BitmapField {
        if kind == BitmapKinds::SOLID {
            &self.solid
        } else if kind == BitmapKinds::LAVA {
            &self.is_lava
        } else {
            &self.pit
        }
    }

    /// The `(flag, map)` pair this record declares for a bitmap field.
    ///
    /// An explicit `false` in `cleared` takes precedence over any value.
    pub fn bitmap_input(&self, kind: BitmapKinds) -> (Option<bool>, Option<&SubTileMask>) {
        if self.cleared.contains(kind) {
            return (Some(false), None);
        }
        match self.bitmap(kind) {
            BitmapField::Absent => (None, None),
            BitmapField::All => (Some(true), None),
            BitmapField::Mask(mask) => (None, Some(mask)),
        }
    }

    pub fn is_solid(&self) -> bool {
        self.solid.is_set()
    }

    pub fn is_pit(&self) -> bool {
        self.pit.is_set()
    }

    pub fn is_lava(&self) -> bool {
        self.is_lava.is_set()
    }

    /// Whether this record would erase everything accumulated beneath it.
    pub fn clears_stack(&self) -> bool {
        self.is_lava.is_all() || self.cloud_ground || self.is_ground == Some(true)
    }

    /// A record that declares nothing at all.
    ///
    /// Decorative records never touch the behavior grid.
    pub fn is_decorative(&self) -> bool {
        *self == Self::default()
    }

    /// Collapses every bitmap field to the value at one pixel of the tile.
    pub fn at_pixel(&self, x: u8, y: u8) -> Self {
        Self {
            solid: self.solid.resolve_pixel(x, y),
            is_lava: self.is_lava.resolve_pixel(x, y),
            pit: self.pit.resolve_pixel(x, y),
            ..self.clone()
        }
    }

    /// Shallow merge used by the compositor: every field `other` sets
    /// replaces the corresponding field here.
    pub fn overlay(&mut self, other: &BehaviorRecord) {
        if other.solid.is_set() {
            self.solid = other.solid;
        }
        if other.is_lava.is_set() {
            self.is_lava = other.is_lava;
        }
        if other.pit.is_set() {
            self.pit = other.pit;
        }
        self.cleared |= other.cleared;
        if other.ground_height != 0 {
            self.ground_height = other.ground_height;
        }
        if other.climbable {
            self.climbable = true;
        }
        if !other.ledges.is_empty() {
            self.ledges = other.ledges;
        }
        self.water |= other.water;
        self.shallow_water |= other.shallow_water;
        self.slippery |= other.slippery;
        self.cloud_ground |= other.cloud_ground;
        self.is_brittle_ground |= other.is_brittle_ground;
        self.is_frozen |= other.is_frozen;
        self.is_not_solid |= other.is_not_solid;
        if other.is_ground.is_some() {
            self.is_ground = other.is_ground;
        }
        if other.touch_hit.is_some() {
            self.touch_hit = other.touch_hit;
        }
        if other.crush_weight.is_some() {
            self.crush_weight = other.crush_weight;
        }
        if other.light_radius != 0 {
            self.light_radius = other.light_radius;
        }
        if other.brightness != 0.0 {
            self.brightness = other.brightness;
        }
    }
}
