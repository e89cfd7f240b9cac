//! Step-limited smoothing of the perceiver's facing toward a target.
//!
//! Rather than snapping to a target bearing, the controller moves yaw and
//! pitch by at most a fixed step per tick, taking the shortest angular
//! path for yaw (so 350° to 10° goes through 0°, not the long way around).
//! Below a small epsilon no step is taken, which keeps a settled facing
//! from jittering.

use vigil_types::{PerceiverPose, Vec3};

/// Pitch never reaches straight up/down; avoids gimbal extremes.
pub const PITCH_LIMIT_DEGREES: f64 = 89.9;

/// Default maximum yaw/pitch change per tick, in degrees.
pub const DEFAULT_MAX_STEP_DEGREES: f64 = 12.0;

/// Default dead zone below which no rotation step is applied.
pub const DEFAULT_EPSILON_DEGREES: f64 = 0.2;

/// Step-limited look-at smoothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationController {
    /// Maximum yaw change per tick, in degrees.
    pub max_yaw_step: f64,
    /// Maximum pitch change per tick, in degrees.
    pub max_pitch_step: f64,
    /// Angular dead zone below which no step is taken.
    pub epsilon: f64,
}

impl Default for OrientationController {
    fn default() -> Self {
        Self {
            max_yaw_step: DEFAULT_MAX_STEP_DEGREES,
            max_pitch_step: DEFAULT_MAX_STEP_DEGREES,
            epsilon: DEFAULT_EPSILON_DEGREES,
        }
    }
}

impl OrientationController {
    /// Move `pose`'s facing one step toward looking at `target_eye`.
    ///
    /// Returns the updated pose. A degenerate bearing (target at the eye,
    /// non-finite geometry) leaves the pose unchanged.
    pub fn step_toward(&self, pose: PerceiverPose, target_eye: Vec3) -> PerceiverPose {
        let Some((target_yaw, target_pitch)) = bearing_to(pose.eye(), target_eye) else {
            return pose;
        };

        let dy = shortest_delta(pose.yaw, target_yaw);
        let dp = target_pitch - pose.pitch;

        let step_yaw = limited_step(dy, self.max_yaw_step, self.epsilon);
        let step_pitch = limited_step(dp, self.max_pitch_step, self.epsilon);

        let yaw = normalize_yaw(pose.yaw + step_yaw);
        let pitch = (pose.pitch + step_pitch).clamp(-PITCH_LIMIT_DEGREES, PITCH_LIMIT_DEGREES);
        pose.with_rotation(yaw, pitch)
    }
}

/// The (yaw, pitch) bearing in degrees that looks from `from_eye` to
/// `target_eye`, or `None` when the direction is degenerate.
pub fn bearing_to(from_eye: Vec3, target_eye: Vec3) -> Option<(f64, f64)> {
    let dir = (target_eye - from_eye).normalized()?;
    let yaw = normalize_yaw((-dir.x).atan2(dir.z).to_degrees());
    let pitch = (-dir.y.clamp(-1.0, 1.0).asin()).to_degrees();
    Some((yaw, pitch))
}

/// Signed shortest angular path from `from` to `to`, in `(-180, 180]`.
pub fn shortest_delta(from: f64, to: f64) -> f64 {
    let mut d = (to - from) % 360.0;
    if d <= -180.0 {
        d += 360.0;
    }
    if d > 180.0 {
        d -= 360.0;
    }
    d
}

/// Normalize a yaw angle into `[0, 360)`.
pub fn normalize_yaw(yaw: f64) -> f64 {
    let wrapped = yaw % 360.0;
    if wrapped < 0.0 { wrapped + 360.0 } else { wrapped }
}

/// A delta capped to `max_step` in magnitude, zero inside the dead zone.
fn limited_step(delta: f64, max_step: f64, epsilon: f64) -> f64 {
    if delta.abs() <= epsilon {
        0.0
    } else {
        delta.clamp(-max_step, max_step)
    }
}
