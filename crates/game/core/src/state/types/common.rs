use std::fmt;

use bitflags::bitflags;

use crate::config::MotionConfig;

/// Unique identifier for any object, effect or actor present in an area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectId(pub u32);

impl ObjectId {
    /// Reserved identifier for the controllable hero.
    pub const HERO: Self = Self(0);

    #[inline]
    pub const fn is_hero(self) -> bool {
        self.0 == Self::HERO.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Grid coordinate of a tile (one 16×16 pixel cell).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The tile across the edge in `direction`.
    pub fn neighbor(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Pixel of the tile's top-left corner.
    pub fn origin(self) -> PixelPoint {
        let size = MotionConfig::TILE_SIZE;
        PixelPoint::new(self.x * size, self.y * size)
    }
}

/// Integer pixel position in area-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Tile containing this pixel.
    pub fn tile(self) -> TileCoord {
        let size = MotionConfig::TILE_SIZE;
        TileCoord::new(self.x.div_euclid(size), self.y.div_euclid(size))
    }

    /// Offset of this pixel inside its tile, `0..16` on both axes.
    pub fn sub_tile(self) -> (u8, u8) {
        let size = MotionConfig::TILE_SIZE;
        (self.x.rem_euclid(size) as u8, self.y.rem_euclid(size) as u8)
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Axis-aligned rectangle. Used both for absolute hitboxes (area pixels) and
/// for hitboxes relative to an actor's position.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains_pixel(&self, point: PixelPoint) -> bool {
        let (px, py) = (point.x as f32, point.y as f32);
        px >= self.left() && px < self.right() && py >= self.top() && py < self.bottom()
    }

    /// Integer pixel span covered by this rectangle.
    pub fn pixel_bounds(&self) -> PixelBounds {
        let left = self.x.floor() as i32;
        let top = self.y.floor() as i32;
        PixelBounds {
            left,
            top,
            width: (self.w.round() as i32).max(1),
            height: (self.h.round() as i32).max(1),
        }
    }
}

/// Pixels covered by a hitbox: columns `left..left + width`, rows `top..top + height`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelBounds {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelBounds {
    pub fn right(&self) -> i32 {
        self.left + self.width - 1
    }

    pub fn bottom(&self) -> i32 {
        self.top + self.height - 1
    }

    /// The row or column of pixels at the side facing `direction`.
    pub fn edge(&self, direction: Direction) -> impl Iterator<Item = PixelPoint> + use<> {
        let (fixed, start, len, horizontal) = match direction {
            Direction::Up => (self.top, self.left, self.width, true),
            Direction::Down => (self.bottom(), self.left, self.width, true),
            Direction::Left => (self.left, self.top, self.height, false),
            Direction::Right => (self.right(), self.top, self.height, false),
        };
        (start..start + len).map(move |v| {
            if horizontal {
                PixelPoint::new(v, fixed)
            } else {
                PixelPoint::new(fixed, v)
            }
        })
    }

    /// Middle pixel of the edge facing `direction`.
    pub fn edge_midpoint(&self, direction: Direction) -> PixelPoint {
        let cx = self.left + self.width / 2;
        let cy = self.top + self.height / 2;
        match direction {
            Direction::Up => PixelPoint::new(cx, self.top),
            Direction::Down => PixelPoint::new(cx, self.bottom()),
            Direction::Left => PixelPoint::new(self.left, cy),
            Direction::Right => PixelPoint::new(self.right(), cy),
        }
    }
}

/// Cardinal movement direction in screen space (y grows downward).
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Direction of a single-axis step of the given sign.
    pub fn horizontal(amount: f32) -> Self {
        if amount < 0.0 { Direction::Left } else { Direction::Right }
    }

    pub fn vertical(amount: f32) -> Self {
        if amount < 0.0 { Direction::Up } else { Direction::Down }
    }

    /// Dominant direction of a displacement; ties go to the horizontal axis.
    pub fn dominant(dx: f32, dy: f32) -> Option<Self> {
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        if dx.abs() >= dy.abs() {
            Some(Self::horizontal(dx))
        } else {
            Some(Self::vertical(dy))
        }
    }

    pub fn flag(self) -> Directions {
        match self {
            Direction::Up => Directions::UP,
            Direction::Down => Directions::DOWN,
            Direction::Left => Directions::LEFT,
            Direction::Right => Directions::RIGHT,
        }
    }
}

bitflags! {
    /// Set of cardinal directions, used for ledge flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Directions: u8 {
        const UP    = 1 << 0;
        const DOWN  = 1 << 1;
        const LEFT  = 1 << 2;
        const RIGHT = 1 << 3;
    }
}

impl Directions {
    pub fn has(self, direction: Direction) -> bool {
        self.contains(direction.flag())
    }

    /// Iterates the contained directions in `Direction::ALL` order.
    pub fn directions(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |d| self.has(*d))
    }
}
