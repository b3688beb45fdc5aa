use crate::behavior::{BitmapField, BehaviorRecord};

/// Folds the behaviors of everything covering one pixel into a single record.
///
/// The static tile record is the first contribution. Non-solid contributions
/// compete on `ground_height`: higher replaces, equal overlays, lower is
/// hidden. Solid contributions are tracked apart (last one wins) and applied
/// on top at the end, unless a later ground or not-solid contribution at the
/// winning height cleared them. Any climbable contribution beats solidity.
pub(crate) struct BehaviorStack {
    ground: BehaviorRecord,
    height: i32,
    solid: Option<BehaviorRecord>,
    climbable: bool,
}

impl BehaviorStack {
    pub(crate) fn new(base: BehaviorRecord) -> Self {
        Self {
            height: base.ground_height,
            ground: base,
            solid: None,
            climbable: false,
        }
    }

    pub(crate) fn push(&mut self, behaviors: &BehaviorRecord) {
        self.climbable |= behaviors.climbable;

        if behaviors.is_solid() {
            self.solid = Some(behaviors.clone());
            return;
        }

        if behaviors.ground_height > self.height {
            self.ground = behaviors.clone();
            self.height = behaviors.ground_height;
        } else if behaviors.ground_height == self.height {
            self.ground.overlay(behaviors);
        } else {
            return;
        }

        if behaviors.is_ground == Some(true) || behaviors.is_not_solid {
            self.ground.solid = BitmapField::Absent;
            self.solid = None;
        }
    }

    pub(crate) fn finish(self) -> BehaviorRecord {
        let mut result = self.ground;
        if let Some(solid) = &self.solid {
            result.overlay(solid);
        }
        if self.climbable {
            result.climbable = true;
            result.solid = BitmapField::Absent;
        }
        result
    }
}
