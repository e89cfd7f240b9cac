//! Enumeration types for the Vigil perception engine.

use serde::{Deserialize, Serialize};

/// The geometric shape of a perceiver's vision volume.
///
/// The `width` parameter of the vision configuration is interpreted
/// per-shape: an angular field of view for [`VisionShape::Cone`], a linear
/// beam width for [`VisionShape::Line`], and ignored entirely for
/// [`VisionShape::Sphere`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisionShape {
    /// An angular cone extending from the perceiver's eye along its facing.
    #[default]
    Cone,
    /// A rectangular beam of fixed width along the perceiver's facing.
    Line,
    /// A full sphere around the perceiver's eye; facing is irrelevant.
    Sphere,
}

/// A target's discrete movement stance.
///
/// The stance selects which detection policy and timing bounds apply to the
/// target: crouched targets are typically harder (slower) to detect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stance {
    /// Upright, walking or standing still.
    #[default]
    Standing,
    /// Crouched / sneaking.
    Crouched,
}
