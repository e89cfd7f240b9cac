//! Line-of-sight gating over an injected world raycast.
//!
//! The engine does not know world geometry. The host supplies a
//! [`RaycastQuery`] (typically backed by its static block/collision data),
//! and this module wraps it with the one rule the detection loop relies
//! on: a zero-length ray is never blocked, so a target standing exactly at
//! the perceiver's eye cannot be occluded by floating-point noise.

use vigil_types::Vec3;
use vigil_types::math::DIRECTION_EPSILON;

/// A world line-of-sight query between two points.
///
/// Implementations should return `true` when any opaque static obstruction
/// lies strictly between `origin` and `target`. The engine calls this at
/// most once per target per tick, after the (cheaper) containment test has
/// passed.
pub trait RaycastQuery {
    /// Whether sight from `origin` to `target` is blocked.
    fn blocked(&self, origin: Vec3, target: Vec3) -> bool;
}

/// A raycast stub that never blocks. Useful in tests and open-air worlds.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysClear;

impl RaycastQuery for AlwaysClear {
    fn blocked(&self, _origin: Vec3, _target: Vec3) -> bool {
        false
    }
}

/// A raycast stub that always blocks. Useful in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysBlocked;

impl RaycastQuery for AlwaysBlocked {
    fn blocked(&self, _origin: Vec3, _target: Vec3) -> bool {
        true
    }
}

/// Whether sight between two eye positions is blocked.
///
/// Short-circuits to "not blocked" for a degenerate zero-length ray, and
/// to "blocked" for non-finite endpoints (invalid geometry degrades to
/// not-visible rather than propagating NaN into the world query).
pub fn is_blocked(raycast: &dyn RaycastQuery, origin_eye: Vec3, target_eye: Vec3) -> bool {
    if !origin_eye.is_finite() || !target_eye.is_finite() {
        return true;
    }
    if origin_eye.distance_squared(target_eye) < DIRECTION_EPSILON * DIRECTION_EPSILON {
        return false;
    }
    raycast.blocked(origin_eye, target_eye)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn zero_length_ray_is_never_blocked() {
        let eye = Vec3::new(1.0, 2.0, 3.0);
        assert!(!is_blocked(&AlwaysBlocked, eye, eye));
    }

    #[test]
    fn delegates_to_the_world_query() {
        let a = Vec3::ZERO;
        let b = Vec3::new(0.0, 0.0, 5.0);
        assert!(is_blocked(&AlwaysBlocked, a, b));
        assert!(!is_blocked(&AlwaysClear, a, b));
    }

    #[test]
    fn non_finite_endpoints_block() {
        let a = Vec3::ZERO;
        let b = Vec3::new(f64::INFINITY, 0.0, 0.0);
        assert!(is_blocked(&AlwaysClear, a, b));
    }
}
