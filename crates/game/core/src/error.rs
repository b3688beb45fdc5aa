//! Common error infrastructure for area-core.
//!
//! Two families of failure exist and they are handled very differently:
//!
//! - **Authoring errors** ([`AreaError`]): a caller asked for something the area
//!   cannot represent (a tile outside the grid, a layer of the wrong size, an
//!   unknown tile id). These are returned as `Result` and propagated with `?`.
//! - **Invariant violations** ([`InvariantViolation`]): states a correct engine
//!   never reaches. They are never returned; [`report_invariant`] logs them
//!   loudly and trips a `debug_assert!`, and the caller continues with a
//!   clamped result so release builds degrade to a silent no-op.
//!
//! A blocked move is neither: refusing displacement is the ordinary outcome of
//! meeting an obstacle.

use crate::state::{ObjectId, TileCoord};

/// Severity level of an error, used for categorization and logging priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid input, should not retry without changes.
    Validation,

    /// Unexpected state inconsistency. Indicates a bug.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all area-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier for this error variant, for log filtering and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Errors raised by the layer-authoring and maintenance API.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AreaError {
    #[error("tile {tile:?} is outside the {width}x{height} grid")]
    TileOutOfBounds {
        tile: TileCoord,
        width: u32,
        height: u32,
    },

    #[error("layer {layer} is {actual:?}, expected {expected:?}")]
    LayerSizeMismatch {
        layer: String,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("layer index {0} does not exist")]
    UnknownLayer(usize),

    #[error("tile id {0} is not registered")]
    UnknownTile(u32),

    #[error("actor {0} is not in this area")]
    UnknownActor(ObjectId),
}

impl GameError for AreaError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            AreaError::TileOutOfBounds { .. } => "AREA_TILE_OUT_OF_BOUNDS",
            AreaError::LayerSizeMismatch { .. } => "AREA_LAYER_SIZE_MISMATCH",
            AreaError::UnknownLayer(_) => "AREA_UNKNOWN_LAYER",
            AreaError::UnknownTile(_) => "AREA_UNKNOWN_TILE",
            AreaError::UnknownActor(_) => "AREA_UNKNOWN_ACTOR",
        }
    }
}

/// States the engine must never reach.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("movement of {actor} did not settle after {iterations} iterations")]
    IterationCapExceeded { actor: ObjectId, iterations: u32 },

    #[error("object {object} has behaviors but no hitbox")]
    MissingHitbox { object: ObjectId },

    #[error("tile {tile:?} merged into an unrecognized state: {detail}")]
    UnrecognizedMergeState { tile: TileCoord, detail: &'static str },
}

impl GameError for InvariantViolation {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            InvariantViolation::IterationCapExceeded { .. } => "MOTION_ITERATION_CAP",
            InvariantViolation::MissingHitbox { .. } => "MOTION_MISSING_HITBOX",
            InvariantViolation::UnrecognizedMergeState { .. } => "MOTION_MERGE_STATE",
        }
    }
}

/// Surfaces an invariant violation as a developer diagnostic.
///
/// Panics in debug builds; logs and returns in release builds.
#[track_caller]
pub fn report_invariant(violation: InvariantViolation) {
    tracing::error!(
        code = violation.error_code(),
        severity = violation.severity().as_str(),
        "{violation}"
    );
    debug_assert!(false, "invariant violated: {violation}");
}
