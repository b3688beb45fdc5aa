/// Motion constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MotionConfig {
    /// Horizontal/vertical speed (pixels per frame) of a fresh ledge-jump arc.
    pub ledge_jump_speed: f32,
    /// Initial upward speed of a fresh ledge-jump arc.
    pub ledge_jump_vz: f32,
    /// Downward acceleration applied to airborne actors each frame.
    pub gravity: f32,
    /// How many pixels at either end of a blocked edge still allow a wiggle
    /// around the corner.
    pub wiggle_tolerance: u8,
}

impl MotionConfig {
    // ===== compile-time constants =====
    /// Pixel size of one tile; sub-tile bitmaps are `TILE_SIZE` rows of `TILE_SIZE` bits.
    pub const TILE_SIZE: i32 = 16;
    /// Upper bound on resolver passes for a single `move_actor` call.
    pub const MAX_RESOLVE_ITERATIONS: u32 = 100;
    /// Minimum height an actor is lifted to when it starts falling off a ledge.
    pub const MIN_AIRBORNE_Z: f32 = 1.0;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_LEDGE_JUMP_SPEED: f32 = 1.0;
    pub const DEFAULT_LEDGE_JUMP_VZ: f32 = 2.0;
    pub const DEFAULT_GRAVITY: f32 = 0.5;
    pub const DEFAULT_WIGGLE_TOLERANCE: u8 = 6;

    pub fn new() -> Self {
        Self {
            ledge_jump_speed: Self::DEFAULT_LEDGE_JUMP_SPEED,
            ledge_jump_vz: Self::DEFAULT_LEDGE_JUMP_VZ,
            gravity: Self::DEFAULT_GRAVITY,
            wiggle_tolerance: Self::DEFAULT_WIGGLE_TOLERANCE,
        }
    }

    pub fn with_wiggle_tolerance(mut self, wiggle_tolerance: u8) -> Self {
        self.wiggle_tolerance = wiggle_tolerance;
        self
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self::new()
    }
}
