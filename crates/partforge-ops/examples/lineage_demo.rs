//! Demonstrates the lineage tracker's scoped auto-undo.
//!
//! A dumbbell is parked at an awkward spot by earlier operations; inside a
//! scope it is centered, rotated, and repositioned for an origin-centric
//! operation, and the scope exit moves it back exactly where it started.

use glam::DVec3;
use partforge_kernel::{Affine, BooleanType, CsgEngine, CsgError, CsgResult, default_engine};
use partforge_ops::{LineageTracker, bounding_box, center_with_delta, translate_with_delta};

fn main() -> CsgResult<()> {
    let engine = default_engine();
    let engine = engine.as_ref();

    // Vertical dumbbell: two wings on a shaft.
    let wing = engine.cylinder(5.0, 5.0, true)?;
    let shaft = engine.cylinder(1.0, 20.0, true)?;
    let top = wing.translated(DVec3::new(0.0, 0.0, 10.0));
    let bottom = wing.translated(DVec3::new(0.0, 0.0, -10.0));
    let dumbbell = engine.union_all(&[top, bottom, shaft])?;

    // Park it at a weird spot, the way real boolean pipelines do.
    let dumbbell = dumbbell
        .translated(DVec3::new(20.0, 20.0, 20.0))
        .transformed_world(&Affine::from_rotation_x(20f64.to_radians()));

    let mut tracker = LineageTracker::new(dumbbell);
    println!("before: {:?}", bounding_box(engine, tracker.solid())?.center());

    tracker.with_scope(|t| {
        // Center on the origin; the move vector comes back as aux.
        let moves = t.apply(|s| center_with_delta(engine, s))?;
        println!("centered by {:?}", moves[0]);

        // Reposition with an explicit override delta.
        t.apply(|s| {
            Ok::<_, CsgError>(translate_with_delta(s, DVec3::new(2.0, 0.0, 0.0)))
        })?;

        // Do the origin-centric work here, e.g. carve a keyway.
        let keyway = engine.cube(DVec3::new(1.0, 1.0, 30.0), true)?;
        let carved = engine.boolean(t.solid(), &keyway, BooleanType::Subtract)?;
        println!("carved bounds: {:?}", bounding_box(engine, &carved)?);

        Ok::<_, CsgError>(())
    })?;

    // The scope unwound both moves: the solid is back at its parked spot.
    println!("after:  {:?}", bounding_box(engine, tracker.solid())?.center());
    Ok(())
}
