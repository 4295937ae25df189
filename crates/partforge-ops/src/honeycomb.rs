//! Hexagonal honeycomb patterning
//!
//! Fills a 2D sheet, or a cylindrical shell, with hexagonal cells. The main
//! entry point is [`Honeycomb::fill_sheet`].

use glam::{DVec2, DVec3};
use std::f64::consts::{FRAC_PI_2, TAU};

use partforge_kernel::{Affine, BooleanType, CsgEngine, CsgResult, Solid};

/// Honeycomb cell parameters.
#[derive(Debug, Clone, Copy)]
pub struct Honeycomb {
    /// Hexagon outer radius.
    pub outer_radius: f64,
    /// Thickness of the hexagonal cell border.
    pub thickness: f64,
}

impl Default for Honeycomb {
    fn default() -> Self {
        Self {
            outer_radius: 6.0,
            thickness: 2.0,
        }
    }
}

impl Honeycomb {
    pub fn new(outer_radius: f64, thickness: f64) -> Self {
        Self {
            outer_radius,
            thickness,
        }
    }

    /// cos(30 deg), the flat-to-flat factor of a hexagon.
    fn perpendicular(&self) -> f64 {
        30f64.to_radians().cos()
    }

    /// A single cell shell, positioned into quadrant one. With `hole` the
    /// inner hexagon is returned instead of the border.
    pub fn single(&self, engine: &dyn CsgEngine, hole: bool) -> CsgResult<Solid> {
        let outer = engine.circle(self.outer_radius, 6)?;
        let inner = engine.offset2d(&outer, -self.thickness)?;
        let shell = if hole {
            inner
        } else {
            engine.boolean(&outer, &inner, BooleanType::Subtract)?
        };
        Ok(shell.translated(DVec3::new(
            self.outer_radius,
            self.outer_radius * self.perpendicular(),
            0.0,
        )))
    }

    /// Two cells stitched corner to corner. Not perfectly congruent but
    /// practically close enough. Also returns the x/y tiling offsets.
    pub fn pair(&self, engine: &dyn CsgEngine, hole: bool) -> CsgResult<(Solid, f64, f64)> {
        let a = self.single(engine, hole)?;

        // Corner-to-corner shift, reduced by the wing obtuse triangle
        // height: radius * cos(60).
        let wing = self.outer_radius * 60f64.to_radians().cos();
        let x_offset = self.outer_radius * 2.0 - wing;
        let y_offset = self.perpendicular() * self.outer_radius;

        let b = a.translated(DVec3::new(x_offset, y_offset, 0.0));
        let pair = engine.boolean(&a, &b, BooleanType::Union)?;
        Ok((pair, 2.0 * x_offset, 2.0 * y_offset))
    }

    /// Fill an `x` by `y` sheet with honeycombs.
    ///
    /// By default the result is trimmed to the bounding sheet; `only_raw`
    /// skips the trim.
    pub fn fill_sheet(
        &self,
        engine: &dyn CsgEngine,
        x: f64,
        y: f64,
        only_raw: bool,
    ) -> CsgResult<Solid> {
        let d = 2.0 * self.outer_radius;
        let x_bound = (x / d).ceil() as u32;
        let y_bound = (y / (self.perpendicular() * d)).ceil() as u32;

        let mut sheet = Vec::new();
        for xx in 0..x_bound {
            for yy in 0..y_bound {
                let (shell, x_off, y_off) = self.pair(engine, false)?;
                sheet.push(shell.translated(DVec3::new(
                    x_off * f64::from(xx),
                    y_off * f64::from(yy),
                    0.0,
                )));
            }
        }
        let raw = engine.union_all(&sheet)?;

        if only_raw {
            return Ok(raw);
        }
        let mask = engine.square(DVec2::new(x, y), false)?;
        engine.boolean(&mask, &raw, BooleanType::Intersect)
    }

    /// A cylindrical shell of hexes: rings of extruded hex holes, stacked.
    ///
    /// Intended as a difference tool against a cylinder wall of
    /// `shell_thickness`.
    pub fn fill_cylindrical_shell(
        &self,
        engine: &dyn CsgEngine,
        radius: f64,
        height: f64,
        shell_thickness: f64,
    ) -> CsgResult<Solid> {
        let (holes, x_offset, y_offset) = self.pair(engine, true)?;

        // Extrude through the wall, center on x, then stand the pair up and
        // push it out to the shell radius, pointing inward.
        let holes_3d = engine.linear_extrude(&holes, shell_thickness * 2.0)?;
        let centered = holes_3d.translated(DVec3::new(
            -(x_offset / 2.0 + self.thickness),
            0.0,
            0.0,
        ));
        let pre_ring = centered
            .transformed_world(&Affine::from_rotation_x(FRAC_PI_2))
            .transformed_world(&Affine::from_rotation_z(FRAC_PI_2))
            .translated(DVec3::new(radius - shell_thickness, 0.0, 0.0));

        // Chord angle between neighboring pairs around the ring.
        let step = x_offset.atan2(radius);
        let around = (TAU / step).floor() as u32;
        let ring: Vec<Solid> = (0..around)
            .map(|i| pre_ring.transformed_world(&Affine::from_rotation_z(f64::from(i) * step)))
            .collect();
        let ring = engine.union_all(&ring)?;

        let levels = (height / y_offset).ceil() as u32;
        let column: Vec<Solid> = (0..levels)
            .map(|j| ring.translated(DVec3::new(0.0, 0.0, f64::from(j) * y_offset)))
            .collect();
        engine.union_all(&column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use partforge_kernel::BoxEngine;
    use crate::bounds::bounding_box;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_single_sits_in_quadrant_one() {
        let engine = BoxEngine::new();
        let comb = Honeycomb::default();
        let cell = comb.single(&engine, false).unwrap();
        let b = bounding_box(&engine, &cell).unwrap();
        assert_abs_diff_eq!(b.min.x, 0.0, epsilon = EPS);
        assert!(b.center().y > 0.0);
    }

    #[test]
    fn test_pair_offsets() {
        let engine = BoxEngine::new();
        let comb = Honeycomb::new(6.0, 2.0);
        let (_, x_off, y_off) = comb.pair(&engine, false).unwrap();

        let wing = 6.0 * 60f64.to_radians().cos();
        assert_abs_diff_eq!(x_off, 2.0 * (12.0 - wing), epsilon = EPS);
        assert_abs_diff_eq!(y_off, 2.0 * 6.0 * 30f64.to_radians().cos(), epsilon = EPS);
    }

    #[test]
    fn test_fill_sheet_is_trimmed_to_mask() {
        let engine = BoxEngine::new();
        let comb = Honeycomb::default();

        let trimmed = comb.fill_sheet(&engine, 40.0, 30.0, false).unwrap();
        let b = bounding_box(&engine, &trimmed).unwrap();
        assert!(b.max.x <= 40.0 + EPS);
        assert!(b.max.y <= 30.0 + EPS);

        let raw = comb.fill_sheet(&engine, 40.0, 30.0, true).unwrap();
        let rb = bounding_box(&engine, &raw).unwrap();
        assert!(rb.max.x >= b.max.x - EPS);
    }

    #[test]
    fn test_cylindrical_shell_spans_requested_height() {
        let engine = BoxEngine::new();
        let comb = Honeycomb::default();
        let shell = comb
            .fill_cylindrical_shell(&engine, 30.0, 50.0, 3.0)
            .unwrap();
        let b = bounding_box(&engine, &shell).unwrap();
        assert!(b.size().z >= 50.0 - EPS);
        // Holes reach out to the shell radius.
        assert!(b.max.x >= 27.0 - EPS);
    }
}
