use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};

use crate::direction::Direction;

/// Position and orientation of the cube at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Pose {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }
}

/// The single in-flight tumble, if any.
///
/// Only one tumble may be active at a time; requests made while rolling
/// are dropped rather than queued.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RollState {
    Idle,
    Rolling(Roll),
}

/// An active tumble between two grid cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Roll {
    pub direction: Direction,
    pub start: Pose,
    pub target: Pose,
    pub progress: f32,
}

impl RollState {
    pub fn is_rolling(&self) -> bool {
        matches!(self, Self::Rolling(_))
    }

    /// Tries to start a tumble from the given pose.
    ///
    /// Returns false when a tumble is already in flight or the move would
    /// cross the floor boundary; the state is untouched in both cases.
    pub fn begin(&mut self, pose: Pose, direction: Direction, boundary: f32) -> bool {
        if self.is_rolling() || !within_boundary(pose.position, direction, boundary) {
            return false;
        }
        *self = Self::Rolling(Roll {
            direction,
            start: pose,
            target: roll_target(pose, direction),
            progress: 0.0,
        });
        true
    }

    /// Advances the active tumble and returns the interpolated pose.
    ///
    /// Progress is clamped to 1; on reaching it the returned pose is the
    /// exact precomputed target and the state goes back to idle, so no
    /// interpolation error survives a completed roll.
    pub fn advance(&mut self, amount: f32) -> Option<Pose> {
        let Self::Rolling(roll) = self else {
            return None;
        };
        roll.progress = (roll.progress + amount).min(1.0);
        if roll.progress >= 1.0 {
            let target = roll.target;
            *self = Self::Idle;
            Some(target)
        } else {
            Some(roll.pose_at(roll.progress))
        }
    }
}

impl Roll {
    fn pose_at(&self, t: f32) -> Pose {
        Pose {
            position: self.start.position.lerp(self.target.position, t),
            orientation: self.start.orientation.slerp(self.target.orientation, t),
        }
    }
}

/// Boundary check along the travel axis only. Moves are axis aligned, so
/// the perpendicular coordinate cannot drift and is not re-validated.
fn within_boundary(position: Vec3, direction: Direction, boundary: f32) -> bool {
    match direction {
        Direction::East => position.x < boundary,
        Direction::West => position.x > -boundary,
        Direction::North => position.z > -boundary,
        Direction::South => position.z < boundary,
    }
}

fn roll_target(start: Pose, direction: Direction) -> Pose {
    let axis = (start.orientation * direction.roll_axis()).normalize();
    let pivot = Quat::from_axis_angle(axis, FRAC_PI_2);
    Pose {
        position: start.position + direction.step(),
        orientation: (start.orientation * pivot).normalize(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start_pose() -> Pose {
        Pose::new(Vec3::new(0.0, 0.5, 0.0), Quat::IDENTITY)
    }

    #[test]
    fn each_direction_targets_the_next_cell() {
        for direction in Direction::ALL {
            let mut state = RollState::Idle;
            assert!(state.begin(start_pose(), direction, 4.0));
            let RollState::Rolling(roll) = state else {
                panic!("expected an active roll");
            };
            assert_eq!(roll.progress, 0.0);
            assert_eq!(
                roll.target.position,
                start_pose().position + direction.step()
            );
        }
    }

    #[test]
    fn first_east_roll_pivots_about_negative_z() {
        let mut state = RollState::Idle;
        assert!(state.begin(start_pose(), Direction::East, 4.0));
        let RollState::Rolling(roll) = state else {
            panic!("expected an active roll");
        };
        let expected = Quat::from_axis_angle(Vec3::new(0.0, 0.0, -1.0), FRAC_PI_2);
        assert!(roll.target.orientation.dot(expected).abs() > 1.0 - 1e-6);
    }

    #[test]
    fn boundary_rejects_the_move_and_keeps_state() {
        let mut state = RollState::Idle;
        let pose = Pose::new(Vec3::new(4.0, 0.5, 0.0), Quat::IDENTITY);
        assert!(!state.begin(pose, Direction::East, 4.0));
        assert_eq!(state, RollState::Idle);
        // The opposite direction is still open.
        assert!(state.begin(pose, Direction::West, 4.0));
    }

    #[test]
    fn begin_while_rolling_is_ignored() {
        let mut state = RollState::Idle;
        assert!(state.begin(start_pose(), Direction::East, 4.0));
        let before = state;
        assert!(!state.begin(start_pose(), Direction::North, 4.0));
        assert_eq!(state, before);
    }

    #[test]
    fn advance_reaches_the_target_exactly() {
        let mut state = RollState::Idle;
        assert!(state.begin(start_pose(), Direction::East, 4.0));
        let RollState::Rolling(roll) = state else {
            panic!("expected an active roll");
        };
        let target = roll.target;

        let mut last = None;
        for _ in 0..4 {
            last = state.advance(0.25);
        }
        assert_eq!(last, Some(target));
        assert_eq!(state, RollState::Idle);
        assert!(state.advance(0.25).is_none());
    }

    #[test]
    fn overshoot_clamps_to_the_target() {
        let mut state = RollState::Idle;
        assert!(state.begin(start_pose(), Direction::North, 4.0));
        let pose = state.advance(5.0).unwrap();
        assert_eq!(pose.position, Vec3::new(0.0, 0.5, -1.0));
        assert_eq!(state, RollState::Idle);
    }

    #[test]
    fn orientation_stays_unit_length_over_many_rolls() {
        let mut pose = start_pose();
        let sequence = [
            Direction::East,
            Direction::North,
            Direction::West,
            Direction::South,
        ];
        for direction in sequence.iter().cycle().take(40) {
            let mut state = RollState::Idle;
            assert!(state.begin(pose, *direction, 40.0));
            while let Some(next) = state.advance(0.3) {
                pose = next;
            }
        }
        assert!((pose.orientation.length() - 1.0).abs() < 1e-4);
        assert_eq!(pose.position.y, 0.5);
    }
}
