//! Bounding-box utilities
//!
//! Generalized operators built on an engine's mesh query: centering,
//! bisecting, hull-based unions, and masked mapping over a sub-volume.

use glam::{DVec2, DVec3};
use tracing::debug;

use partforge_kernel::{Aabb, Affine, BooleanType, CsgEngine, CsgError, CsgResult, Solid};

use crate::lineage::Outcome;

/// Bounding box of a solid, from its tessellated mesh.
pub fn bounding_box(engine: &dyn CsgEngine, solid: &Solid) -> CsgResult<Aabb> {
    let mesh = engine.mesh(solid)?;
    Aabb::from_points(mesh.vertices.iter().copied()).ok_or(CsgError::EmptyMesh)
}

/// The bounding box realized as a cube.
pub fn bounding_box_mask(engine: &dyn CsgEngine, solid: &Solid) -> CsgResult<Solid> {
    let b = bounding_box(engine, solid)?;
    Ok(engine.cube(b.size(), true)?.translated(b.center()))
}

/// Center the solid on the origin.
///
/// Returns the recentered solid and the move vector that was applied.
pub fn center(engine: &dyn CsgEngine, solid: &Solid) -> CsgResult<(Solid, DVec3)> {
    let b = bounding_box(engine, solid)?;
    let move_vector = -b.center();
    Ok((solid.translated(move_vector), move_vector))
}

/// Tracker-ready centering operation.
///
/// Supplies an explicit delta override, since centering is exactly the kind
/// of move whose effect a frame-resetting pipeline would otherwise lose. The
/// delta comes from the solid's own before/after frames, which stays exact
/// even when the combined-origin inference is broken; the move vector is
/// passed through as the aux value.
pub fn center_with_delta(engine: &dyn CsgEngine, solid: &Solid) -> CsgResult<Outcome<DVec3>> {
    let (moved, v) = center(engine, solid)?;
    let delta = Affine::decompose(moved.frame(), solid.frame());
    Ok(Outcome::tagged(moved, delta, vec![v]))
}

/// Tracker-ready world translation with an explicit delta override.
pub fn translate_with_delta(solid: &Solid, v: DVec3) -> Outcome<DVec3> {
    let moved = solid.translated(v);
    let delta = Affine::decompose(moved.frame(), solid.frame());
    Outcome::tagged(moved, delta, vec![v])
}

/// Raise the solid so its lowest vertex sits at z = 0. Solids already above
/// ground come back unchanged.
pub fn z_above_ground(engine: &dyn CsgEngine, solid: &Solid) -> CsgResult<Solid> {
    let b = bounding_box(engine, solid)?;
    if b.min.z < 0.0 {
        Ok(solid.translated(DVec3::new(0.0, 0.0, -b.min.z)))
    } else {
        Ok(*solid)
    }
}

/// Z extent of the bounding box. Zero or positive by definition.
pub fn z_height(engine: &dyn CsgEngine, solid: &Solid) -> CsgResult<f64> {
    Ok(bounding_box(engine, solid)?.size().z)
}

/// Horizontal chop, given an optional top mask.
///
/// Without a mask the XY plane is the cut line: the mask is the solid's XY
/// footprint extruded from z = 0 to the top of its bounds. Returns
/// `(top, bottom)`.
pub fn z_bisect(
    engine: &dyn CsgEngine,
    solid: &Solid,
    top_mask: Option<&Solid>,
) -> CsgResult<(Solid, Solid)> {
    let mask = match top_mask {
        Some(m) => *m,
        None => {
            let b = bounding_box(engine, solid)?;
            if b.max.z <= 0.0 {
                return Err(CsgError::InvalidArgument(
                    "solid has no volume above z = 0".into(),
                ));
            }
            let footprint = engine
                .square(DVec2::new(b.size().x, b.size().y), false)?
                .translated(DVec3::new(b.min.x, b.min.y, 0.0));
            engine.linear_extrude(&footprint, b.max.z)?
        }
    };

    let top = engine.boolean(solid, &mask, BooleanType::Intersect)?;
    let bottom = engine.boolean(solid, &top, BooleanType::Subtract)?;
    Ok((top, bottom))
}

/// You have a donut. You want the donut hole.
pub fn donut_hole(engine: &dyn CsgEngine, donut: &Solid) -> CsgResult<Solid> {
    let mask = bounding_box_mask(engine, donut)?;
    let outer = engine.hull(std::slice::from_ref(donut))?;
    let cut = engine.boolean(&mask, donut, BooleanType::Subtract)?;
    engine.boolean(&cut, &outer, BooleanType::Intersect)
}

/// Press `top` into `bottom` and union, preserving holes in `top`:
/// `top | (bottom - hull(top))`.
///
/// With `full_pierce`, the hole punched into `bottom` is the projection of
/// `hull(top)` extruded through the whole height of `bottom`.
pub fn hammer_hull_union(
    engine: &dyn CsgEngine,
    top: &Solid,
    bottom: &Solid,
    full_pierce: bool,
) -> CsgResult<Solid> {
    let top_hull = engine.hull(std::slice::from_ref(top))?;
    let mut bottom = *bottom;

    if full_pierce {
        let height = z_height(engine, &bottom)?;
        let b = bounding_box(engine, &bottom)?;
        debug!(height, "piercing bottom solid through its full height");

        let footprint = engine.projection(&top_hull)?;
        let mut punch = engine.linear_extrude(&footprint, height)?;
        if b.min.z < 0.0 {
            // Below-ground volume: drop the punch to cover it.
            punch = punch.translated(DVec3::new(0.0, 0.0, b.min.z));
        }
        bottom = engine.boolean(&bottom, &punch, BooleanType::Subtract)?;
    }

    let carved = engine.boolean(&bottom, &top_hull, BooleanType::Subtract)?;
    engine.boolean(top, &carved, BooleanType::Union)
}

/// Apply `f` only over the masked volume, leaving the rest alone.
///
/// Returns `(combined, mapped, untouched)`; the last two are kept for
/// debugging.
pub fn masked_map<F>(
    engine: &dyn CsgEngine,
    mask: &Solid,
    solid: &Solid,
    f: F,
) -> CsgResult<(Solid, Solid, Solid)>
where
    F: FnOnce(&Solid) -> CsgResult<Solid>,
{
    let operating = engine.boolean(solid, mask, BooleanType::Intersect)?;
    let untouched = engine.boolean(solid, &operating, BooleanType::Subtract)?;
    let mapped = f(&operating)?;
    let combined = engine.boolean(&mapped, &untouched, BooleanType::Union)?;
    Ok((combined, mapped, untouched))
}
