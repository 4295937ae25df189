//! Parametric Part Construction Toolkit
//!
//! This crate provides:
//! - Transformation lineage tracking with scoped auto-undo
//! - Bounding-box utilities (centering, bisecting, hull unions)
//! - Hexagonal honeycomb patterning for sheets and cylindrical shells
//! - 2D profile generators (rounded n-gons, fillet wedges)
//! - Lapped cuts with locking lugs for splitting oversized prints

pub mod bounds;
pub mod honeycomb;
pub mod lap;
pub mod lineage;
pub mod profiles;

// Re-exports for convenience
pub use bounds::{
    bounding_box, bounding_box_mask, center, center_with_delta, donut_hole, hammer_hull_union,
    masked_map, translate_with_delta, z_above_ground, z_bisect, z_height,
};
pub use honeycomb::Honeycomb;
pub use lap::LappedCuts;
pub use lineage::{LineageError, LineageTracker, Outcome};
pub use profiles::{bezier_wedge, ngon};
