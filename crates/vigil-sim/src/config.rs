//! Configuration loading and typed config structures for the demo world.
//!
//! The canonical configuration lives in `vigil-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads the file with defaults for
//! every missing key.

use std::path::Path;

use serde::Deserialize;
use vigil_types::{Stance, Vec3, VisionShape};
use vigil_vision::{ConfigError as VisionConfigError, StancePolicy, VisionConfig};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The vision section failed validation.
    #[error("invalid vision config: {source}")]
    Vision {
        /// The underlying validation error.
        #[from]
        source: VisionConfigError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level demo world configuration.
///
/// Mirrors the structure of `vigil-config.yaml`. All fields have defaults,
/// so an absent file runs the stock scenario.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimConfig {
    /// World-level settings (seed, timing, duration).
    #[serde(default)]
    pub world: WorldSimConfig,

    /// Vision parameters applied to every guard.
    #[serde(default)]
    pub vision: VisionSimConfig,

    /// The guards to spawn.
    #[serde(default = "default_guards")]
    pub guards: Vec<GuardConfig>,

    /// The wandering targets to spawn.
    #[serde(default = "default_targets")]
    pub targets: Vec<TargetConfig>,

    /// Opaque axis-aligned wall boxes blocking line of sight.
    #[serde(default = "default_walls")]
    pub walls: Vec<WallConfig>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world: WorldSimConfig::default(),
            vision: VisionSimConfig::default(),
            guards: default_guards(),
            targets: default_targets(),
            walls: default_walls(),
        }
    }
}

impl SimConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_yml::from_str(&contents)?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldSimConfig {
    /// Random seed for target wander jitter.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Ticks per second of the simulated scheduler.
    #[serde(default = "default_tick_rate")]
    pub tick_rate: u32,

    /// How many ticks to run before stopping.
    #[serde(default = "default_ticks")]
    pub ticks: u64,
}

impl Default for WorldSimConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            tick_rate: default_tick_rate(),
            ticks: default_ticks(),
        }
    }
}

/// Vision parameters shared by all guards.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VisionSimConfig {
    /// The geometric shape of the vision volume.
    #[serde(default)]
    pub shape: VisionShape,

    /// Maximum view distance (or beam length for the line shape).
    #[serde(default = "default_radius")]
    pub radius: f64,

    /// Angular field of view in degrees (linear width for the line shape).
    #[serde(default = "default_width")]
    pub width: f64,

    /// Seconds to detect a standing target, point-blank to max range.
    #[serde(default = "default_walk_seconds")]
    pub walk_seconds: (f64, f64),

    /// Seconds to detect a crouched target, point-blank to max range.
    #[serde(default = "default_crouch_seconds")]
    pub crouch_seconds: (f64, f64),

    /// Confidence lost per second while a target is out of sight.
    #[serde(default = "default_decay")]
    pub decay_per_second: f64,

    /// Whether guards turn to face a detected target.
    #[serde(default = "default_true")]
    pub look_at_target: bool,
}

impl Default for VisionSimConfig {
    fn default() -> Self {
        Self {
            shape: VisionShape::default(),
            radius: default_radius(),
            width: default_width(),
            walk_seconds: default_walk_seconds(),
            crouch_seconds: default_crouch_seconds(),
            decay_per_second: default_decay(),
            look_at_target: default_true(),
        }
    }
}

impl VisionSimConfig {
    /// Build the validated engine config this section describes.
    ///
    /// # Errors
    ///
    /// Returns [`VisionConfigError`] when the radius is unusable.
    pub fn to_vision_config(&self) -> Result<VisionConfig, VisionConfigError> {
        VisionConfig::new(
            self.shape,
            self.radius,
            self.width,
            StancePolicy::progressive(self.walk_seconds.0, self.walk_seconds.1),
            StancePolicy::progressive(self.crouch_seconds.0, self.crouch_seconds.1),
            self.decay_per_second,
            self.look_at_target,
        )
    }
}

/// One patrolling guard.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GuardConfig {
    /// Display name used in logs.
    pub name: String,

    /// Patrol waypoints, walked in a cycle.
    pub waypoints: Vec<Vec3>,

    /// Walking speed in units per tick.
    #[serde(default = "default_guard_speed")]
    pub speed: f64,

    /// Vertical eye offset from the feet position.
    #[serde(default = "default_eye_height")]
    pub eye_height: f64,

    /// Whether the guard stops walking while watching a detected target.
    #[serde(default = "default_true")]
    pub freeze_while_watching: bool,
}

/// One wandering target.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TargetConfig {
    /// Display name used in logs.
    pub name: String,

    /// Wander waypoints, walked in a cycle.
    pub waypoints: Vec<Vec3>,

    /// Walking speed in units per tick.
    #[serde(default = "default_target_speed")]
    pub speed: f64,

    /// Vertical eye offset from the feet position.
    #[serde(default = "default_eye_height")]
    pub eye_height: f64,

    /// Movement stance, selecting the detection timing bounds.
    #[serde(default)]
    pub stance: Stance,

    /// Per-tick positional jitter amplitude.
    #[serde(default)]
    pub jitter: f64,
}

/// An opaque axis-aligned box blocking line of sight.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct WallConfig {
    /// Minimum corner of the box.
    pub min: Vec3,
    /// Maximum corner of the box.
    pub max: Vec3,
}

const fn default_seed() -> u64 {
    42
}

const fn default_tick_rate() -> u32 {
    20
}

const fn default_ticks() -> u64 {
    1200
}

const fn default_radius() -> f64 {
    5.0
}

const fn default_width() -> f64 {
    90.0
}

const fn default_walk_seconds() -> (f64, f64) {
    (0.3, 1.5)
}

const fn default_crouch_seconds() -> (f64, f64) {
    (0.6, 2.5)
}

const fn default_decay() -> f64 {
    1.2
}

const fn default_true() -> bool {
    true
}

const fn default_guard_speed() -> f64 {
    0.1
}

const fn default_target_speed() -> f64 {
    0.12
}

const fn default_eye_height() -> f64 {
    1.62
}

/// The stock guard: a square patrol around the courtyard.
fn default_guards() -> Vec<GuardConfig> {
    vec![GuardConfig {
        name: "gate-guard".to_owned(),
        waypoints: vec![
            Vec3::new(-6.0, 0.0, -6.0),
            Vec3::new(6.0, 0.0, -6.0),
            Vec3::new(6.0, 0.0, 6.0),
            Vec3::new(-6.0, 0.0, 6.0),
        ],
        speed: default_guard_speed(),
        eye_height: default_eye_height(),
        freeze_while_watching: true,
    }]
}

/// The stock targets: one walker in the open, one sneaker hugging the wall.
fn default_targets() -> Vec<TargetConfig> {
    vec![
        TargetConfig {
            name: "walker".to_owned(),
            waypoints: vec![Vec3::new(0.0, 0.0, -4.0), Vec3::new(0.0, 0.0, 4.0)],
            speed: default_target_speed(),
            eye_height: default_eye_height(),
            stance: Stance::Standing,
            jitter: 0.02,
        },
        TargetConfig {
            name: "sneaker".to_owned(),
            waypoints: vec![Vec3::new(3.5, 0.0, -5.0), Vec3::new(3.5, 0.0, 5.0)],
            speed: 0.06,
            eye_height: 1.27,
            stance: Stance::Crouched,
            jitter: 0.0,
        },
    ]
}

/// The stock wall: a slab the sneaker can duck behind.
fn default_walls() -> Vec<WallConfig> {
    vec![WallConfig {
        min: Vec3::new(2.0, 0.0, -1.0),
        max: Vec3::new(2.5, 3.0, 1.0),
    }]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_yields_the_stock_scenario() {
        let config = SimConfig::parse("{}").unwrap();
        assert_eq!(config.world.tick_rate, 20);
        assert_eq!(config.guards.len(), 1);
        assert_eq!(config.targets.len(), 2);
        assert!(config.vision.look_at_target);
    }

    #[test]
    fn yaml_overrides_selected_fields() {
        let yaml = r"
world:
  tick_rate: 10
  ticks: 50
vision:
  radius: 8.0
  look_at_target: false
";
        let config = SimConfig::parse(yaml).unwrap();
        assert_eq!(config.world.tick_rate, 10);
        assert_eq!(config.world.ticks, 50);
        assert!((config.vision.radius - 8.0).abs() < f64::EPSILON);
        assert!(!config.vision.look_at_target);
        // Untouched sections keep their defaults.
        assert!((config.vision.decay_per_second - 1.2).abs() < f64::EPSILON);
    }

    #[test]
    fn vision_section_builds_a_validated_engine_config() {
        let config = SimConfig::default();
        let vision = config.vision.to_vision_config().unwrap();
        assert!((vision.radius - 5.0).abs() < f64::EPSILON);
        assert!(!vision.policy(Stance::Standing).is_immediate());
    }

    #[test]
    fn bad_radius_is_rejected_at_conversion() {
        let yaml = r"
vision:
  radius: -1.0
";
        let config = SimConfig::parse(yaml).unwrap();
        assert!(config.vision.to_vision_config().is_err());
    }
}
