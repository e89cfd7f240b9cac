//! Activity lifecycle and per-tick orchestration for the Vigil perception
//! engine.
//!
//! `vigil-vision` answers "is this target visible and how confident am I";
//! this crate drives it: the [`Activity`] lifecycle, the per-tick target
//! loop in [`PerceptionActivity`], the host-facing [`TargetProvider`] and
//! [`SeenSink`] seams, and composition with movement.
//!
//! # Modules
//!
//! - [`activity`] -- The [`Activity`] trait, tick context/report, and the
//!   core [`PerceptionActivity`].
//! - [`providers`] -- Collaborator traits and stubs for targets and
//!   seen-transitions.
//! - [`compose`] -- Movement plus perception for patrolling perceivers.

pub mod activity;
pub mod compose;
pub mod providers;

// Re-export primary types at crate root.
pub use activity::{Activity, ActivityPhase, PerceptionActivity, TickContext, TickReport};
pub use compose::{PatrolPerceptionActivity, ScriptedPathActivity};
pub use providers::{NullSink, RecordingSink, SeenSink, StaticTargetProvider, TargetProvider};
