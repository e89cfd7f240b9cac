//! Pure containment tests for the three vision shapes.
//!
//! Everything here is a function of its arguments: no state, no queries.
//! The occlusion gate decides whether a contained target is actually
//! visible; this module only answers "is the point inside the volume".
//!
//! The facing convention matches the host world: yaw 0 looks toward +z,
//! yaw grows clockwise when viewed from above, positive pitch looks down.
//! The forward unit vector is
//! `(-sin(yaw)*cos(pitch), -sin(pitch), cos(yaw)*cos(pitch))`.
//!
//! Degenerate inputs never produce NaN. Non-finite positions or facings
//! evaluate to "not inside"; a target exactly at the perceiver's eye is
//! treated as dead-center inside (its direction is undefined but its
//! distance, zero, is unambiguous).

use vigil_types::math::DIRECTION_EPSILON;
use vigil_types::{Vec3, VisionShape};

/// Floor applied to half-widths before dividing by them, so a degenerate
/// width cannot produce an infinite centrality ratio.
const HALF_WIDTH_FLOOR: f64 = 1e-4;

/// The result of evaluating one target against one vision volume.
///
/// Computed once per target per tick and shared between the containment
/// decision and the detection ledger's dwell-time derivation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainmentSample {
    /// Whether the target's eye lies inside the vision volume.
    pub inside: bool,
    /// Eye-to-eye distance.
    pub distance: f64,
    /// Centrality in `[0, 1]`: 1 is dead-center of the volume, 0 is at its
    /// boundary. Always 1 for [`VisionShape::Sphere`].
    pub center_factor: f64,
}

impl ContainmentSample {
    /// A sample for a target that is not inside the volume.
    const fn outside(distance: f64) -> Self {
        Self {
            inside: false,
            distance,
            center_factor: 0.0,
        }
    }
}

/// The unit forward vector for a facing given in degrees.
pub fn forward_from_yaw_pitch(yaw_degrees: f64, pitch_degrees: f64) -> Vec3 {
    let yaw = yaw_degrees.to_radians();
    let pitch = pitch_degrees.to_radians();
    let xz = pitch.cos();
    Vec3::new(-yaw.sin() * xz, -pitch.sin(), yaw.cos() * xz)
}

/// Evaluate whether `target_eye` lies inside the vision volume anchored at
/// `perceiver_eye` with the given facing.
///
/// `width` is interpreted per shape: angular degrees for
/// [`VisionShape::Cone`], linear width for [`VisionShape::Line`], ignored
/// for [`VisionShape::Sphere`].
pub fn sample(
    shape: VisionShape,
    perceiver_eye: Vec3,
    yaw_degrees: f64,
    pitch_degrees: f64,
    target_eye: Vec3,
    radius: f64,
    width: f64,
) -> ContainmentSample {
    if !perceiver_eye.is_finite() || !target_eye.is_finite() {
        return ContainmentSample::outside(0.0);
    }
    if !yaw_degrees.is_finite() || !pitch_degrees.is_finite() {
        return ContainmentSample::outside(0.0);
    }

    let to_target = target_eye - perceiver_eye;
    let distance = to_target.length();

    // A target at the perceiver's own eye has no direction but is
    // unambiguously inside every shape, dead-center.
    if distance < DIRECTION_EPSILON {
        return ContainmentSample {
            inside: true,
            distance,
            center_factor: 1.0,
        };
    }

    match shape {
        VisionShape::Sphere => ContainmentSample {
            inside: distance <= radius,
            distance,
            center_factor: 1.0,
        },
        VisionShape::Cone => {
            if distance > radius {
                return ContainmentSample::outside(distance);
            }
            let forward = forward_from_yaw_pitch(yaw_degrees, pitch_degrees);
            let Some(dir) = to_target.normalized() else {
                return ContainmentSample::outside(distance);
            };
            // Floating error can push the dot product slightly outside
            // [-1, 1], which would make acos return NaN.
            let cos_angle = forward.dot(dir).clamp(-1.0, 1.0);
            let angle = cos_angle.acos().to_degrees();
            let half = (width / 2.0).max(HALF_WIDTH_FLOOR);
            ContainmentSample {
                inside: angle <= width / 2.0,
                distance,
                center_factor: (1.0 - angle / half).clamp(0.0, 1.0),
            }
        }
        VisionShape::Line => {
            let forward = forward_from_yaw_pitch(yaw_degrees, pitch_degrees);
            let along = forward.dot(to_target);
            if along < 0.0 || along > radius {
                return ContainmentSample::outside(distance);
            }
            let lateral = (to_target - forward.scaled(along)).length();
            let half = (width / 2.0).max(HALF_WIDTH_FLOOR);
            ContainmentSample {
                inside: lateral <= width / 2.0,
                distance,
                center_factor: (1.0 - lateral / half).clamp(0.0, 1.0),
            }
        }
    }
}

/// Whether `target_eye` lies inside the vision volume. Thin wrapper over
/// [`sample`] for callers that do not need distance or centrality.
pub fn is_inside(
    shape: VisionShape,
    perceiver_eye: Vec3,
    yaw_degrees: f64,
    pitch_degrees: f64,
    target_eye: Vec3,
    radius: f64,
    width: f64,
) -> bool {
    sample(
        shape,
        perceiver_eye,
        yaw_degrees,
        pitch_degrees,
        target_eye,
        radius,
        width,
    )
    .inside
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const EYE: Vec3 = Vec3::ZERO;

    #[test]
    fn forward_convention_matches_facing() {
        // Yaw 0, pitch 0 looks toward +z.
        let f = forward_from_yaw_pitch(0.0, 0.0);
        assert!(f.x.abs() < 1e-12);
        assert!(f.y.abs() < 1e-12);
        assert!((f.z - 1.0).abs() < 1e-12);

        // Yaw 90 looks toward -x.
        let f = forward_from_yaw_pitch(90.0, 0.0);
        assert!((f.x - -1.0).abs() < 1e-12);
        assert!(f.z.abs() < 1e-12);

        // Positive pitch looks down.
        let f = forward_from_yaw_pitch(0.0, 90.0);
        assert!((f.y - -1.0).abs() < 1e-12);
    }

    #[test]
    fn sphere_ignores_facing_and_width() {
        let target = Vec3::new(0.0, 3.0, -4.0);
        for yaw in [0.0, 90.0, 215.0] {
            assert!(is_inside(VisionShape::Sphere, EYE, yaw, 45.0, target, 5.0, 0.0));
        }
        assert!(!is_inside(
            VisionShape::Sphere,
            EYE,
            0.0,
            0.0,
            Vec3::new(0.0, 3.0, -4.1),
            5.0,
            0.0
        ));
    }

    #[test]
    fn cone_accepts_target_within_half_angle() {
        // radius 5, fov 90: at distance 3 and 30 degrees off-axis, inside.
        let angle = 30.0_f64.to_radians();
        let target = Vec3::new(-3.0 * angle.sin(), 0.0, 3.0 * angle.cos());
        assert!(is_inside(VisionShape::Cone, EYE, 0.0, 0.0, target, 5.0, 90.0));
    }

    #[test]
    fn cone_rejects_target_beyond_half_angle() {
        let angle = 50.0_f64.to_radians();
        let target = Vec3::new(-3.0 * angle.sin(), 0.0, 3.0 * angle.cos());
        assert!(!is_inside(VisionShape::Cone, EYE, 0.0, 0.0, target, 5.0, 90.0));
    }

    #[test]
    fn cone_rejects_target_beyond_radius() {
        let target = Vec3::new(0.0, 0.0, 6.0);
        assert!(!is_inside(VisionShape::Cone, EYE, 0.0, 0.0, target, 5.0, 90.0));
    }

    #[test]
    fn cone_center_factor_is_one_on_axis() {
        let s = sample(
            VisionShape::Cone,
            EYE,
            0.0,
            0.0,
            Vec3::new(0.0, 0.0, 4.0),
            5.0,
            90.0,
        );
        assert!(s.inside);
        assert!((s.center_factor - 1.0).abs() < 1e-9);
    }

    #[test]
    fn cone_center_factor_falls_toward_edge() {
        let angle = 40.0_f64.to_radians();
        let target = Vec3::new(-3.0 * angle.sin(), 0.0, 3.0 * angle.cos());
        let s = sample(VisionShape::Cone, EYE, 0.0, 0.0, target, 5.0, 90.0);
        assert!(s.inside);
        // 40 degrees off-axis with a 45-degree half angle: 1 - 40/45.
        assert!((s.center_factor - (1.0 - 40.0 / 45.0)).abs() < 1e-6);
    }

    #[test]
    fn line_is_a_beam_not_a_cone() {
        // Beam of length 10, half-width 1: lateral offset 0.9 is inside at
        // any depth, 1.1 is outside everywhere.
        let inside = Vec3::new(0.9, 0.0, 8.0);
        let outside = Vec3::new(1.1, 0.0, 2.0);
        assert!(is_inside(VisionShape::Line, EYE, 0.0, 0.0, inside, 10.0, 2.0));
        assert!(!is_inside(VisionShape::Line, EYE, 0.0, 0.0, outside, 10.0, 2.0));
    }

    #[test]
    fn line_rejects_behind_and_beyond() {
        assert!(!is_inside(
            VisionShape::Line,
            EYE,
            0.0,
            0.0,
            Vec3::new(0.0, 0.0, -1.0),
            10.0,
            2.0
        ));
        assert!(!is_inside(
            VisionShape::Line,
            EYE,
            0.0,
            0.0,
            Vec3::new(0.0, 0.0, 11.0),
            10.0,
            2.0
        ));
    }

    #[test]
    fn zero_distance_target_is_dead_center_inside() {
        let s = sample(VisionShape::Cone, EYE, 0.0, 0.0, EYE, 5.0, 90.0);
        assert!(s.inside);
        assert!((s.center_factor - 1.0).abs() < f64::EPSILON);
        assert!(s.distance < 1e-12);
    }

    #[test]
    fn non_finite_inputs_are_not_inside() {
        let nan_point = Vec3::new(f64::NAN, 0.0, 0.0);
        assert!(!is_inside(VisionShape::Sphere, EYE, 0.0, 0.0, nan_point, 5.0, 0.0));
        assert!(!is_inside(
            VisionShape::Cone,
            EYE,
            f64::NAN,
            0.0,
            Vec3::new(0.0, 0.0, 1.0),
            5.0,
            90.0
        ));
    }
}
