//! CSG Engine Boundary
//!
//! This crate provides:
//! - 4x4 affine transform algebra (compose, left-division, inversion)
//! - Opaque solid handles pairing engine-side identity with a reference frame
//! - The `CsgEngine` trait for primitives, booleans, extrusions, and meshing
//! - `NullEngine` (no backend) and `BoxEngine` (axis-aligned approximation)

pub mod engine;
pub mod solid;
pub mod transform;

// Re-exports for convenience
#[cfg(feature = "bbox")]
pub use engine::BoxEngine;
pub use engine::{BooleanType, CsgEngine, CsgError, CsgResult, NullEngine, default_engine};
pub use solid::{Aabb, Mesh, Solid};
pub use transform::Affine;
