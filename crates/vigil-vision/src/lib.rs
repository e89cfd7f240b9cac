//! Detection and geometry core for the Vigil perception engine.
//!
//! This crate holds the stateful and algorithmic heart of the engine: the
//! per-target detection state machine and the pure geometry it depends on.
//! Orchestration (the per-tick target loop and activity lifecycle) lives in
//! `vigil-core`; this crate knows nothing about scheduling or hosts.
//!
//! # Modules
//!
//! - [`config`] -- Validated [`VisionConfig`] with per-stance detection
//!   policies and clamping rules.
//! - [`geometry`] -- Pure containment tests for the three vision shapes.
//! - [`occlusion`] -- Line-of-sight gate over an injected [`RaycastQuery`].
//! - [`ledger`] -- Per-target confidence accrual, decay, and the one-shot
//!   seen-transition.
//! - [`orientation`] -- Step-limited smoothing of the perceiver's facing.
//!
//! [`VisionConfig`]: config::VisionConfig
//! [`RaycastQuery`]: occlusion::RaycastQuery

pub mod config;
pub mod geometry;
pub mod ledger;
pub mod occlusion;
pub mod orientation;

// Re-export primary types at crate root.
pub use config::{ConfigError, StancePolicy, VisionConfig};
pub use geometry::ContainmentSample;
pub use ledger::{DetectionEntry, DetectionLedger, ObservationResult};
pub use occlusion::RaycastQuery;
pub use orientation::OrientationController;
