//! Axis-aligned box approximation backend
//!
//! Models every solid as an axis-aligned box and evaluates booleans, hulls,
//! and extrusions on bounds only. That is enough for frame bookkeeping,
//! bounds queries, and layout math; it deliberately cannot answer anything
//! about real surface geometry.
//!
//! Frame behavior mirrors production CSG engines: boolean, hull, projection,
//! and rotate-extrude results are rebased to the identity frame, which is
//! exactly the situation the lineage tracker's override mechanism exists for.

use glam::{DVec2, DVec3};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use super::{BooleanType, CsgEngine, CsgError, CsgResult};
use crate::solid::{Aabb, Mesh, Solid};

#[derive(Debug, Clone, Copy)]
struct BoxData {
    bounds: Aabb,
    two_d: bool,
}

/// Bounding-box approximation engine
pub struct BoxEngine {
    /// Storage for solid data (keyed by UUID)
    solids: Mutex<HashMap<Uuid, BoxData>>,
}

impl BoxEngine {
    /// Create a new box engine
    pub fn new() -> Self {
        Self {
            solids: Mutex::new(HashMap::new()),
        }
    }

    /// Store box data and return a handle at the identity frame.
    fn store(&self, bounds: Aabb, two_d: bool) -> Solid {
        let id = Uuid::new_v4();
        let mut solids = self.solids.lock().unwrap();
        solids.insert(id, BoxData { bounds, two_d });
        Solid::new(id)
    }

    /// Resolve a handle to world-space bounds, applying its frame.
    fn world_data(&self, solid: &Solid) -> CsgResult<BoxData> {
        let data = {
            let solids = self.solids.lock().unwrap();
            *solids
                .get(&solid.id())
                .ok_or(CsgError::UnknownSolid(solid.id()))?
        };
        let frame = solid.frame();
        let corners = data.bounds.corners();
        let bounds = Aabb::from_points(corners.iter().map(|p| frame.transform_point(*p)))
            .ok_or(CsgError::EmptyMesh)?;
        Ok(BoxData {
            bounds,
            two_d: data.two_d,
        })
    }

    fn require_2d(data: &BoxData, what: &str) -> CsgResult<()> {
        if data.two_d {
            Ok(())
        } else {
            Err(CsgError::InvalidArgument(format!(
                "{what} requires a 2D shape"
            )))
        }
    }

    fn positive(value: f64, what: &str) -> CsgResult<()> {
        if value > 0.0 {
            Ok(())
        } else {
            Err(CsgError::InvalidArgument(format!(
                "{what} must be positive, got {value}"
            )))
        }
    }
}

impl Default for BoxEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CsgEngine for BoxEngine {
    fn name(&self) -> &str {
        "bbox"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn cube(&self, size: DVec3, center: bool) -> CsgResult<Solid> {
        Self::positive(size.min_element(), "cube size")?;
        let bounds = if center {
            Aabb::new(-size * 0.5, size * 0.5)
        } else {
            Aabb::new(DVec3::ZERO, size)
        };
        Ok(self.store(bounds, false))
    }

    fn cylinder(&self, radius: f64, height: f64, center: bool) -> CsgResult<Solid> {
        Self::positive(radius, "cylinder radius")?;
        Self::positive(height, "cylinder height")?;
        let (z0, z1) = if center {
            (-height * 0.5, height * 0.5)
        } else {
            (0.0, height)
        };
        let bounds = Aabb::new(
            DVec3::new(-radius, -radius, z0),
            DVec3::new(radius, radius, z1),
        );
        Ok(self.store(bounds, false))
    }

    fn sphere(&self, radius: f64) -> CsgResult<Solid> {
        Self::positive(radius, "sphere radius")?;
        Ok(self.store(
            Aabb::new(DVec3::splat(-radius), DVec3::splat(radius)),
            false,
        ))
    }

    fn square(&self, size: DVec2, center: bool) -> CsgResult<Solid> {
        Self::positive(size.min_element(), "square size")?;
        let bounds = if center {
            Aabb::new(
                DVec3::new(-size.x * 0.5, -size.y * 0.5, 0.0),
                DVec3::new(size.x * 0.5, size.y * 0.5, 0.0),
            )
        } else {
            Aabb::new(DVec3::ZERO, DVec3::new(size.x, size.y, 0.0))
        };
        Ok(self.store(bounds, true))
    }

    fn circle(&self, radius: f64, _segments: u32) -> CsgResult<Solid> {
        Self::positive(radius, "circle radius")?;
        let bounds = Aabb::new(
            DVec3::new(-radius, -radius, 0.0),
            DVec3::new(radius, radius, 0.0),
        );
        Ok(self.store(bounds, true))
    }

    fn polygon(&self, points: &[DVec2]) -> CsgResult<Solid> {
        if points.len() < 3 {
            return Err(CsgError::InvalidArgument(format!(
                "polygon needs at least 3 points, got {}",
                points.len()
            )));
        }
        let bounds = Aabb::from_points(points.iter().map(|p| DVec3::new(p.x, p.y, 0.0)))
            .ok_or(CsgError::EmptyMesh)?;
        Ok(self.store(bounds, true))
    }

    fn boolean(&self, a: &Solid, b: &Solid, op: BooleanType) -> CsgResult<Solid> {
        let da = self.world_data(a)?;
        let db = self.world_data(b)?;
        if da.two_d != db.two_d {
            return Err(CsgError::InvalidArgument(
                "boolean between 2D and 3D shapes".into(),
            ));
        }
        let bounds = match op {
            BooleanType::Union => da.bounds.union(&db.bounds),
            // Conservative: removing volume cannot grow the bounds.
            BooleanType::Subtract => da.bounds,
            BooleanType::Intersect => da
                .bounds
                .intersection(&db.bounds)
                .ok_or_else(|| CsgError::OperationFailed("solids do not overlap".into()))?,
        };
        Ok(self.store(bounds, da.two_d))
    }

    fn hull(&self, solids: &[Solid]) -> CsgResult<Solid> {
        let (first, rest) = solids
            .split_first()
            .ok_or_else(|| CsgError::InvalidArgument("hull of zero solids".into()))?;
        let mut acc = self.world_data(first)?;
        for s in rest {
            let d = self.world_data(s)?;
            acc.bounds = acc.bounds.union(&d.bounds);
            acc.two_d = acc.two_d && d.two_d;
        }
        Ok(self.store(acc.bounds, acc.two_d))
    }

    fn offset2d(&self, solid: &Solid, delta: f64) -> CsgResult<Solid> {
        let data = self.world_data(solid)?;
        Self::require_2d(&data, "offset")?;
        let grow = DVec3::new(delta, delta, 0.0);
        let bounds = Aabb::new(data.bounds.min - grow, data.bounds.max + grow);
        if bounds.size().x < 0.0 || bounds.size().y < 0.0 {
            return Err(CsgError::OperationFailed(
                "offset collapses the profile".into(),
            ));
        }
        Ok(self.store(bounds, true))
    }

    fn linear_extrude(&self, profile: &Solid, height: f64) -> CsgResult<Solid> {
        Self::positive(height, "extrusion height")?;
        let data = self.world_data(profile)?;
        Self::require_2d(&data, "linear_extrude")?;
        let bounds = Aabb::new(
            DVec3::new(data.bounds.min.x, data.bounds.min.y, 0.0),
            DVec3::new(data.bounds.max.x, data.bounds.max.y, height),
        );
        Ok(self.store(bounds, false))
    }

    fn rotate_extrude(&self, profile: &Solid, _angle: f64) -> CsgResult<Solid> {
        let data = self.world_data(profile)?;
        Self::require_2d(&data, "rotate_extrude")?;
        let radius = data.bounds.max.x;
        if radius <= 0.0 {
            return Err(CsgError::InvalidArgument(
                "rotate_extrude profile must reach x > 0".into(),
            ));
        }
        // Conservative full-ring bounds regardless of the swept angle.
        let bounds = Aabb::new(
            DVec3::new(-radius, -radius, data.bounds.min.y),
            DVec3::new(radius, radius, data.bounds.max.y),
        );
        Ok(self.store(bounds, false))
    }

    fn projection(&self, solid: &Solid) -> CsgResult<Solid> {
        let data = self.world_data(solid)?;
        let bounds = Aabb::new(
            DVec3::new(data.bounds.min.x, data.bounds.min.y, 0.0),
            DVec3::new(data.bounds.max.x, data.bounds.max.y, 0.0),
        );
        Ok(self.store(bounds, true))
    }

    fn mesh(&self, solid: &Solid) -> CsgResult<Mesh> {
        let data = self.world_data(solid)?;
        let corners = data.bounds.corners();
        if data.two_d {
            // Bottom face only; z extents coincide.
            return Ok(Mesh {
                vertices: corners[..4].to_vec(),
                faces: vec![vec![0, 1, 2, 3]],
            });
        }
        Ok(Mesh {
            vertices: corners.to_vec(),
            faces: vec![
                vec![0, 3, 2, 1],
                vec![4, 5, 6, 7],
                vec![0, 1, 5, 4],
                vec![1, 2, 6, 5],
                vec![2, 3, 7, 6],
                vec![3, 0, 4, 7],
            ],
        })
    }
}
