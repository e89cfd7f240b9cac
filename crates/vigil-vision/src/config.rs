//! Vision configuration with construction-time validation.
//!
//! The engine degrades safely rather than failing (out-of-range values are
//! clamped to the nearest valid value), with one exception: a radius that
//! is non-finite or not positive has no safe clamp and is rejected.
//!
//! Detection policy is an explicit required choice per stance. There is no
//! implicit default between immediate and progressive detection; callers
//! must name a [`StancePolicy`] for both stances when building the config.

use serde::{Deserialize, Serialize};
use vigil_types::{Stance, VisionShape};

/// Smallest accepted angular field of view, in degrees.
pub const MIN_FOV_DEGREES: f64 = 1.0;

/// Largest accepted angular field of view, in degrees.
pub const MAX_FOV_DEGREES: f64 = 170.0;

/// Floor applied to the minimum detection time of a progressive policy.
pub const MIN_DETECT_SECONDS: f64 = 0.05;

/// Default maximum view distance.
pub const DEFAULT_RADIUS: f64 = 5.0;

/// Default angular field of view in degrees.
pub const DEFAULT_FOV_DEGREES: f64 = 90.0;

/// Default progress decay per second while a target is not visible.
pub const DEFAULT_DECAY_PER_SECOND: f64 = 1.2;

/// Default progressive timing bounds for a standing (walking) target.
pub const DEFAULT_WALK_SECONDS: (f64, f64) = (0.3, 1.5);

/// Default progressive timing bounds for a crouched (sneaking) target.
pub const DEFAULT_CROUCH_SECONDS: (f64, f64) = (0.6, 2.5);

/// Errors that can occur when validating a vision configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The view radius is non-finite or not positive.
    #[error("vision radius must be finite and > 0, got {value}")]
    InvalidRadius {
        /// The rejected radius value.
        value: f64,
    },
}

/// The detection policy applied to targets in one stance.
///
/// `Immediate` is instant binary detection: the target is detected on the
/// first visible tick and forgotten on the first non-visible tick.
/// `Progressive` accrues confidence over time and decays it when sight is
/// lost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StancePolicy {
    /// Instant binary detection with no confidence accrual.
    Immediate,
    /// Confidence-based detection accrued over multiple ticks.
    Progressive {
        /// Seconds to detect a point-blank, dead-center target.
        min_seconds: f64,
        /// Seconds to detect a target at maximum radius.
        max_seconds: f64,
    },
}

impl StancePolicy {
    /// A progressive policy from raw timing bounds.
    pub const fn progressive(min_seconds: f64, max_seconds: f64) -> Self {
        Self::Progressive {
            min_seconds,
            max_seconds,
        }
    }

    /// Whether this policy is [`StancePolicy::Immediate`].
    pub const fn is_immediate(self) -> bool {
        matches!(self, Self::Immediate)
    }

    /// This policy with timing bounds floored into their valid ranges:
    /// `min_seconds` at least [`MIN_DETECT_SECONDS`], `max_seconds` at
    /// least `min_seconds`. Non-finite bounds fall back to the floors.
    fn clamped(self) -> Self {
        match self {
            Self::Immediate => Self::Immediate,
            Self::Progressive {
                min_seconds,
                max_seconds,
            } => {
                let min = if min_seconds.is_finite() {
                    min_seconds.max(MIN_DETECT_SECONDS)
                } else {
                    MIN_DETECT_SECONDS
                };
                let max = if max_seconds.is_finite() {
                    max_seconds.max(min)
                } else {
                    min
                };
                Self::Progressive {
                    min_seconds: min,
                    max_seconds: max,
                }
            }
        }
    }
}

/// Immutable vision parameters supplied at activity creation.
///
/// Construct through [`VisionConfig::new`], which clamps out-of-range
/// values into their valid ranges and rejects an unusable radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisionConfig {
    /// Maximum view distance (Cone and Sphere) or beam length (Line).
    pub radius: f64,
    /// Shape-dependent width: angular degrees for Cone (clamped to
    /// `[1, 170]`), linear width for Line, ignored for Sphere.
    pub width: f64,
    /// The geometric shape of the vision volume.
    pub shape: VisionShape,
    /// Detection policy for standing targets.
    pub standing: StancePolicy,
    /// Detection policy for crouched targets.
    pub crouched: StancePolicy,
    /// Confidence lost per second while a target is not visible (>= 0).
    pub decay_per_second: f64,
    /// Whether the perceiver turns to face a committed target.
    pub look_at_target: bool,
}

impl VisionConfig {
    /// Build a validated configuration.
    ///
    /// Clamping rules: the width is clamped to `[1, 170]` degrees for the
    /// Cone shape (Line widths are linear and only floored at 0); a
    /// negative or non-finite decay is clamped to 0; progressive timing
    /// bounds are floored per [`StancePolicy`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRadius`] when `radius` is non-finite
    /// or not positive -- there is no safe value to clamp it to.
    pub fn new(
        shape: VisionShape,
        radius: f64,
        width: f64,
        standing: StancePolicy,
        crouched: StancePolicy,
        decay_per_second: f64,
        look_at_target: bool,
    ) -> Result<Self, ConfigError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(ConfigError::InvalidRadius { value: radius });
        }

        let width = match shape {
            VisionShape::Cone => {
                if width.is_finite() {
                    width.clamp(MIN_FOV_DEGREES, MAX_FOV_DEGREES)
                } else {
                    DEFAULT_FOV_DEGREES
                }
            }
            VisionShape::Line => {
                if width.is_finite() {
                    width.max(0.0)
                } else {
                    0.0
                }
            }
            // Width is meaningless for a sphere; normalize it away.
            VisionShape::Sphere => 0.0,
        };

        let decay_per_second = if decay_per_second.is_finite() {
            decay_per_second.max(0.0)
        } else {
            0.0
        };

        Ok(Self {
            radius,
            width,
            shape,
            standing: standing.clamped(),
            crouched: crouched.clamped(),
            decay_per_second,
            look_at_target,
        })
    }

    /// A cone config with the stock tuning: radius 5, fov 90°, walk
    /// 0.3-1.5 s progressive, crouch 0.6-2.5 s progressive, decay 1.2/s,
    /// look-at enabled.
    pub fn standard_cone() -> Result<Self, ConfigError> {
        Self::new(
            VisionShape::Cone,
            DEFAULT_RADIUS,
            DEFAULT_FOV_DEGREES,
            StancePolicy::progressive(DEFAULT_WALK_SECONDS.0, DEFAULT_WALK_SECONDS.1),
            StancePolicy::progressive(DEFAULT_CROUCH_SECONDS.0, DEFAULT_CROUCH_SECONDS.1),
            DEFAULT_DECAY_PER_SECOND,
            true,
        )
    }

    /// The detection policy that applies to a target in `stance`.
    pub const fn policy(&self, stance: Stance) -> StancePolicy {
        match stance {
            Stance::Standing => self.standing,
            Stance::Crouched => self.crouched,
        }
    }
}
