//! Opaque solid handles and mesh introspection types

use glam::DVec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::transform::Affine;

/// Handle to a shape owned by a CSG engine.
///
/// The handle never carries geometry. It pairs the engine-side identity with
/// the solid's current reference frame; engines interpret the `(id, frame)`
/// pair lazily when they evaluate. Copying a handle shares the geometry.
///
/// Works for 2D and 3D shapes alike, since the frame is a 4x4 matrix either
/// way.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Solid {
    id: Uuid,
    frame: Affine,
}

impl Solid {
    /// Create a handle at the identity frame.
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            frame: Affine::IDENTITY,
        }
    }

    /// Create a handle with an explicit frame.
    pub fn with_frame(id: Uuid, frame: Affine) -> Self {
        Self { id, frame }
    }

    /// A fresh zero-volume reference object at the identity frame.
    ///
    /// Useful for building override deltas without touching an engine.
    pub fn reference() -> Self {
        Self::new(Uuid::new_v4())
    }

    /// Engine-side geometry identity.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current reference frame relative to the engine's world frame.
    pub fn frame(&self) -> &Affine {
        &self.frame
    }

    /// Compose `t` onto the frame: `t` is applied within the solid's current
    /// frame. This is the composition the lineage tracker undoes with.
    pub fn transformed(&self, t: &Affine) -> Solid {
        Solid {
            id: self.id,
            frame: self.frame.compose(t),
        }
    }

    /// Apply `t` to the solid in world coordinates.
    pub fn transformed_world(&self, t: &Affine) -> Solid {
        Solid {
            id: self.id,
            frame: t.compose(&self.frame),
        }
    }

    /// World translation by `v`.
    pub fn translated(&self, v: DVec3) -> Solid {
        self.transformed_world(&Affine::from_translation(v))
    }
}

/// Tessellated geometry reported by an engine's `mesh` query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mesh {
    /// Vertex positions in world coordinates.
    pub vertices: Vec<DVec3>,
    /// Faces as index lists into `vertices`, at least 3 indices per face.
    pub faces: Vec<Vec<u32>>,
}

impl Mesh {
    /// Check if the mesh has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of faces.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    /// Create from explicit corners.
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Smallest box enclosing `points`, or `None` if the iterator is empty.
    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut aabb = Aabb::new(first, first);
        for p in iter {
            aabb.min = aabb.min.min(p);
            aabb.max = aabb.max.max(p);
        }
        Some(aabb)
    }

    /// Edge lengths.
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Center point.
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Smallest box enclosing both.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Overlapping region, or `None` if disjoint.
    pub fn intersection(&self, other: &Aabb) -> Option<Aabb> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        if min.x <= max.x && min.y <= max.y && min.z <= max.z {
            Some(Aabb::new(min, max))
        } else {
            None
        }
    }

    /// The eight corner points.
    pub fn corners(&self) -> [DVec3; 8] {
        let (mn, mx) = (self.min, self.max);
        [
            DVec3::new(mn.x, mn.y, mn.z),
            DVec3::new(mx.x, mn.y, mn.z),
            DVec3::new(mx.x, mx.y, mn.z),
            DVec3::new(mn.x, mx.y, mn.z),
            DVec3::new(mn.x, mn.y, mx.z),
            DVec3::new(mx.x, mn.y, mx.z),
            DVec3::new(mx.x, mx.y, mx.z),
            DVec3::new(mn.x, mx.y, mx.z),
        ]
    }
}
