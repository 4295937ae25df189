//! CSG engine trait definitions
//!
//! These traits define the boundary between the toolkit and whichever
//! geometry backend evaluates the actual solids.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::solid::{Mesh, Solid};

#[cfg(feature = "bbox")]
mod bbox;

#[cfg(feature = "bbox")]
pub use bbox::BoxEngine;

/// Error type for CSG engine operations
#[derive(Debug, Clone, Error)]
pub enum CsgError {
    #[error("engine not available: {0}")]
    EngineUnavailable(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("operation failed: {0}")]
    OperationFailed(String),

    #[error("solid has no mesh data")]
    EmptyMesh,

    #[error("unknown solid {0}")]
    UnknownSolid(Uuid),
}

/// Result type for CSG operations
pub type CsgResult<T> = Result<T, CsgError>;

/// Boolean operation type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BooleanType {
    /// Union (add)
    Union,
    /// Subtraction (cut)
    Subtract,
    /// Intersection (common)
    Intersect,
}

/// The main CSG engine trait
///
/// Implementations provide primitive construction, boolean evaluation, and
/// mesh introspection. Results are returned as opaque [`Solid`] handles; 2D
/// shapes use the same handle type as 3D ones.
///
/// Frame caveat: boolean, hull, projection, and rotate-extrude results come
/// back at the identity frame even when their inputs were moved. Callers
/// tracking transforms must not trust those reported frames.
pub trait CsgEngine: Send + Sync {
    /// Get the name of this engine
    fn name(&self) -> &str;

    /// Check if the engine is available
    fn is_available(&self) -> bool;

    // ========== Primitives ==========

    /// Axis-aligned cuboid. `center` puts the centroid at the origin,
    /// otherwise the box spans from the origin into the positive octant.
    fn cube(&self, size: DVec3, center: bool) -> CsgResult<Solid>;

    /// Z-aligned cylinder. `center` centers it on the XY plane.
    fn cylinder(&self, radius: f64, height: f64, center: bool) -> CsgResult<Solid>;

    /// Sphere at the origin.
    fn sphere(&self, radius: f64) -> CsgResult<Solid>;

    /// 2D rectangle on the XY plane.
    fn square(&self, size: DVec2, center: bool) -> CsgResult<Solid>;

    /// 2D circle approximated with `segments` sides.
    fn circle(&self, radius: f64, segments: u32) -> CsgResult<Solid>;

    /// 2D polygon from an ordered point list.
    fn polygon(&self, points: &[DVec2]) -> CsgResult<Solid>;

    // ========== Combinators ==========

    /// Perform a boolean operation on two solids.
    fn boolean(&self, a: &Solid, b: &Solid, op: BooleanType) -> CsgResult<Solid>;

    /// Union of a non-empty list of solids.
    fn union_all(&self, solids: &[Solid]) -> CsgResult<Solid> {
        let (first, rest) = solids
            .split_first()
            .ok_or_else(|| CsgError::InvalidArgument("union of zero solids".into()))?;
        let mut acc = *first;
        for s in rest {
            acc = self.boolean(&acc, s, BooleanType::Union)?;
        }
        Ok(acc)
    }

    /// Convex hull of a non-empty list of solids.
    fn hull(&self, solids: &[Solid]) -> CsgResult<Solid>;

    /// Grow (positive) or shrink (negative) a 2D shape.
    fn offset2d(&self, solid: &Solid, delta: f64) -> CsgResult<Solid>;

    // ========== 2D <-> 3D ==========

    /// Extrude a 2D profile upward by `height`.
    fn linear_extrude(&self, profile: &Solid, height: f64) -> CsgResult<Solid>;

    /// Revolve a 2D profile (x >= 0) around the Z axis by `angle` radians.
    fn rotate_extrude(&self, profile: &Solid, angle: f64) -> CsgResult<Solid>;

    /// Project a solid onto the XY plane, producing a 2D shape.
    fn projection(&self, solid: &Solid) -> CsgResult<Solid>;

    // ========== Introspection ==========

    /// Tessellate a solid, with vertices in world coordinates.
    fn mesh(&self, solid: &Solid) -> CsgResult<Mesh>;
}

/// An engine that always returns errors (used when no backend is available)
#[derive(Debug, Default)]
pub struct NullEngine;

impl NullEngine {
    fn unavailable<T>(&self) -> CsgResult<T> {
        Err(CsgError::EngineUnavailable("no CSG engine available".into()))
    }
}

impl CsgEngine for NullEngine {
    fn name(&self) -> &str {
        "null"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn cube(&self, _size: DVec3, _center: bool) -> CsgResult<Solid> {
        self.unavailable()
    }

    fn cylinder(&self, _radius: f64, _height: f64, _center: bool) -> CsgResult<Solid> {
        self.unavailable()
    }

    fn sphere(&self, _radius: f64) -> CsgResult<Solid> {
        self.unavailable()
    }

    fn square(&self, _size: DVec2, _center: bool) -> CsgResult<Solid> {
        self.unavailable()
    }

    fn circle(&self, _radius: f64, _segments: u32) -> CsgResult<Solid> {
        self.unavailable()
    }

    fn polygon(&self, _points: &[DVec2]) -> CsgResult<Solid> {
        self.unavailable()
    }

    fn boolean(&self, _a: &Solid, _b: &Solid, _op: BooleanType) -> CsgResult<Solid> {
        self.unavailable()
    }

    fn hull(&self, _solids: &[Solid]) -> CsgResult<Solid> {
        self.unavailable()
    }

    fn offset2d(&self, _solid: &Solid, _delta: f64) -> CsgResult<Solid> {
        self.unavailable()
    }

    fn linear_extrude(&self, _profile: &Solid, _height: f64) -> CsgResult<Solid> {
        self.unavailable()
    }

    fn rotate_extrude(&self, _profile: &Solid, _angle: f64) -> CsgResult<Solid> {
        self.unavailable()
    }

    fn projection(&self, _solid: &Solid) -> CsgResult<Solid> {
        self.unavailable()
    }

    fn mesh(&self, _solid: &Solid) -> CsgResult<Mesh> {
        self.unavailable()
    }
}

/// Get the default CSG engine based on available features
pub fn default_engine() -> Box<dyn CsgEngine> {
    #[cfg(feature = "bbox")]
    {
        tracing::debug!("using bbox approximation engine");
        Box::new(BoxEngine::new())
    }

    #[cfg(not(feature = "bbox"))]
    {
        Box::new(NullEngine)
    }
}
