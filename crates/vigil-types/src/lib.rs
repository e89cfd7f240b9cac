//! Shared type definitions for the Vigil perception engine.
//!
//! This crate is the single source of truth for the types used across the
//! Vigil workspace: identifiers, vector math, vision enums, and the core
//! entity structs exchanged between the perception engine and its host.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for perceiver and target identifiers
//! - [`math`] -- Minimal 3-D vector math used by the geometry evaluator
//! - [`enums`] -- Vision shape and movement stance enumerations
//! - [`structs`] -- Perceiver pose, observable target, and seen-event types

pub mod enums;
pub mod ids;
pub mod math;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Stance, VisionShape};
pub use ids::{PerceiverId, TargetId};
pub use math::Vec3;
pub use structs::{PerceiverPose, SeenEvent, Target};
