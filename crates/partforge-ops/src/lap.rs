//! Lapped cuts for splitting prints
//!
//! Splits a solid into two pieces along a stepped (half-lap) seam so the
//! halves register against each other, with optional locking lugs across the
//! joint. Useful when a part exceeds the build volume.

use glam::DVec3;
use tracing::warn;

use partforge_kernel::{BooleanType, CsgEngine, CsgResult, Solid};

use crate::bounds::bounding_box;

/// Lapped-cut parameters.
#[derive(Debug, Clone, Copy)]
pub struct LappedCuts {
    /// Width of the overlapping step, measured across the cut.
    pub lap_width: f64,
}

impl Default for LappedCuts {
    fn default() -> Self {
        Self { lap_width: 5.0 }
    }
}

impl LappedCuts {
    pub fn new(lap_width: f64) -> Self {
        Self { lap_width }
    }

    /// A vertical locking lug: a cylinder of `lug_radius` and height `h`,
    /// standing on the origin. Position it across the seam with `translated`
    /// before passing it to [`y_lapped_cut`](Self::y_lapped_cut).
    pub fn lug(&self, engine: &dyn CsgEngine, h: f64, lug_radius: f64) -> CsgResult<Solid> {
        engine.cylinder(lug_radius, h, false)
    }

    /// Split `solid` with a lapped cut whose seam runs along the y axis.
    ///
    /// The seam sits at the bounding-box center plus `base_offset` on x; the
    /// upper half of each piece steps across the seam by half the lap width.
    /// Every lock mask is carved out of the left piece and welded (clipped
    /// to the solid) onto the right piece, so the lugs interlock when the
    /// halves mate. Returns `(left, right)`.
    pub fn y_lapped_cut(
        &self,
        engine: &dyn CsgEngine,
        solid: &Solid,
        lock_masks: &[Solid],
        base_offset: f64,
    ) -> CsgResult<(Solid, Solid)> {
        let b = bounding_box(engine, solid)?;
        let seam_x = b.center().x + base_offset;
        let half_lap = self.lap_width * 0.5;
        let mid_z = b.center().z;

        // Right mask: full height beyond the seam, plus the upper step
        // reaching back across it.
        let size = b.size();
        let lower = engine
            .cube(
                DVec3::new(b.max.x - (seam_x + half_lap), size.y, size.z),
                false,
            )?
            .translated(DVec3::new(seam_x + half_lap, b.min.y, b.min.z));
        let upper = engine
            .cube(
                DVec3::new(b.max.x - (seam_x - half_lap), size.y, b.max.z - mid_z),
                false,
            )?
            .translated(DVec3::new(seam_x - half_lap, b.min.y, mid_z));
        let right_mask = engine.boolean(&lower, &upper, BooleanType::Union)?;

        let mut right = engine.boolean(solid, &right_mask, BooleanType::Intersect)?;
        let mut left = engine.boolean(solid, &right, BooleanType::Subtract)?;

        for mask in lock_masks {
            left = engine.boolean(&left, mask, BooleanType::Subtract)?;
            match engine.boolean(mask, solid, BooleanType::Intersect) {
                Ok(lug) => right = engine.boolean(&right, &lug, BooleanType::Union)?,
                // A lug placed entirely outside the solid locks nothing.
                Err(e) => warn!("lock mask does not reach the solid: {e}"),
            }
        }

        Ok((left, right))
    }
}
