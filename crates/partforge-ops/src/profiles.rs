//! 2D profile generators
//!
//! Small shape constructors: rounded n-gons and bezier-style fillet wedges.

use glam::{DVec2, DVec3};

use partforge_kernel::{Affine, CsgEngine, CsgError, CsgResult, Solid};

/// Default segment count for the corner circles of [`ngon`].
const CORNER_SEGMENTS: u32 = 64;

/// A regular n-gon with rounded corners: circles of `fillet_radius` placed
/// at each vertex, then hulled.
pub fn ngon(
    engine: &dyn CsgEngine,
    sides: u32,
    radius: f64,
    fillet_radius: f64,
) -> CsgResult<Solid> {
    if sides < 3 {
        return Err(CsgError::InvalidArgument(format!(
            "ngon needs at least 3 sides, got {sides}"
        )));
    }

    let mut vertices = Vec::with_capacity(sides as usize);
    for i in 1..=sides {
        let angle = f64::from(i) * std::f64::consts::TAU / f64::from(sides);
        let corner = engine
            .circle(fillet_radius, CORNER_SEGMENTS)?
            .translated(DVec3::new(radius, 0.0, 0.0))
            .transformed_world(&Affine::from_rotation_z(angle));
        vertices.push(corner);
    }
    engine.hull(&vertices)
}

/// A concave transition wedge between a base along +x and a leg rising at
/// `angle_deg` degrees, approximated as a union of thin triangles.
///
/// Used as a fillet profile: extrude it along an inside corner and union.
pub fn bezier_wedge(
    engine: &dyn CsgEngine,
    angle_deg: f64,
    height_length: f64,
    base_length: f64,
    steps: u32,
) -> CsgResult<Solid> {
    if steps == 0 {
        return Err(CsgError::InvalidArgument("bezier_wedge needs steps > 0".into()));
    }
    let angle = angle_deg.to_radians();
    let height_increment = height_length / f64::from(steps);
    let base_increment = base_length / f64::from(steps);

    // Points marching up the leg and back down the base.
    let leg: Vec<DVec2> = (1..=steps + 1)
        .map(|r| {
            let d = f64::from(r) * height_increment;
            DVec2::new(d * angle.cos(), d * angle.sin())
        })
        .collect();
    let base: Vec<DVec2> = (0..=steps)
        .rev()
        .map(|x| DVec2::new(f64::from(x) * base_increment, 0.0))
        .collect();

    let mut triangles = Vec::new();
    for (a, b) in leg.iter().zip(base.iter()) {
        triangles.push(engine.polygon(&[DVec2::ZERO, *a, *b])?);
    }
    engine.union_all(&triangles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use partforge_kernel::BoxEngine;
    use crate::bounds::bounding_box;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_ngon_spans_radius_plus_fillet() {
        let engine = BoxEngine::new();
        let hex = ngon(&engine, 6, 10.0, 1.0).unwrap();
        let b = bounding_box(&engine, &hex).unwrap();
        assert_abs_diff_eq!(b.max.x, 11.0, epsilon = 1e-6);
        assert_abs_diff_eq!(b.min.x, -11.0, epsilon = 1e-6);
    }

    #[test]
    fn test_ngon_rejects_degenerate_sides() {
        let engine = BoxEngine::new();
        assert!(matches!(
            ngon(&engine, 2, 10.0, 1.0),
            Err(CsgError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_bezier_wedge_covers_base_and_leg() {
        let engine = BoxEngine::new();
        let wedge = bezier_wedge(&engine, 90.0, 10.0, 10.0, 30).unwrap();
        let b = bounding_box(&engine, &wedge).unwrap();
        assert_abs_diff_eq!(b.max.x, 10.0, epsilon = EPS);
        // Leg overshoots by one increment, per the construction.
        assert!(b.max.y >= 10.0 - EPS);
        assert_abs_diff_eq!(b.min.y, 0.0, epsilon = EPS);
    }
}
