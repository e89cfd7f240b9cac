//! Core entity structs exchanged between the perception engine and its host.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::Stance;
use crate::ids::{PerceiverId, TargetId};
use crate::math::Vec3;

/// The pose of a perceiver: world position, facing, and eye offset.
///
/// The pose is owned exclusively by the perception activity. It is mutated
/// once per tick by the orientation controller, and by the hosting
/// composite activity when perception is combined with movement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerceiverPose {
    /// Feet position in world space.
    pub position: Vec3,
    /// Horizontal facing in degrees, normalized to `[0, 360)`.
    pub yaw: f64,
    /// Vertical facing in degrees; positive looks down, clamped to ±89.9.
    pub pitch: f64,
    /// Vertical offset from `position` to the eye.
    pub eye_height: f64,
}

impl PerceiverPose {
    /// The eye position used for all containment and occlusion tests.
    pub const fn eye(&self) -> Vec3 {
        Vec3::new(
            self.position.x,
            self.position.y + self.eye_height,
            self.position.z,
        )
    }

    /// This pose with a different facing.
    pub const fn with_rotation(self, yaw: f64, pitch: f64) -> Self {
        Self { yaw, pitch, ..self }
    }
}

/// An observable entity evaluated for visibility each tick.
///
/// Eligibility (alive, loaded, within render distance) is decided by the
/// host before the target reaches the engine: every `Target` handed to the
/// perception activity is eligible for this tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Stable identifier, unique per observable entity.
    pub id: TargetId,
    /// World-space eye position.
    pub eye: Vec3,
    /// Current movement stance, selecting the detection timing bounds.
    pub stance: Stance,
}

/// The one-shot notification raised when a perceiver's accrued confidence
/// in a target first reaches full commitment within a visibility episode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeenEvent {
    /// The perceiver that confirmed the detection.
    pub perceiver: PerceiverId,
    /// The target that was seen.
    pub target: TargetId,
    /// The tick on which confidence reached commitment.
    pub tick: u64,
    /// Wall-clock time the transition was raised.
    pub occurred_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn eye_applies_vertical_offset_only() {
        let pose = PerceiverPose {
            position: Vec3::new(1.0, 64.0, -3.0),
            yaw: 90.0,
            pitch: 0.0,
            eye_height: 1.62,
        };
        let eye = pose.eye();
        assert!((eye.x - 1.0).abs() < f64::EPSILON);
        assert!((eye.y - 65.62).abs() < 1e-12);
        assert!((eye.z - -3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn with_rotation_keeps_position() {
        let pose = PerceiverPose {
            position: Vec3::new(0.0, 0.0, 0.0),
            yaw: 10.0,
            pitch: 5.0,
            eye_height: 1.5,
        };
        let rotated = pose.with_rotation(200.0, -15.0);
        assert!((rotated.yaw - 200.0).abs() < f64::EPSILON);
        assert!((rotated.pitch - -15.0).abs() < f64::EPSILON);
        assert_eq!(rotated.position, pose.position);
    }
}
