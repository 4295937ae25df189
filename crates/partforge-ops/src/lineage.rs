//! Transformation lineage tracking
//!
//! A stateful wrapper that records the stack of affine deltas applied to a
//! solid, so a sequence of moves, rotations, and projections can be reverted
//! exactly.
//!
//! Many CSG operations are origin-centric (rotate-extrude most of all): the
//! usual pattern is to move a solid to the origin, operate, and move it back.
//! Wrapping that dance in [`LineageTracker::with_scope`] removes half the
//! noise, because every delta recorded inside the scope is unwound on exit.

use thiserror::Error;
use tracing::{debug, trace};

use partforge_kernel::{Affine, Solid};

/// Lineage-related errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LineageError {
    #[error("transformation stack is empty; nothing to undo")]
    EmptyLineage,
}

/// What an operation passed to [`LineageTracker::apply`] may return.
///
/// `A` is the type of pass-through values handed back to the caller of
/// `apply`; operations with nothing to pass through can use any type.
#[derive(Debug, Clone)]
pub enum Outcome<A> {
    /// A plain replacement solid. The delta is inferred from its frame.
    Bare(Solid),
    /// A replacement solid with an explicit delta override, used when the
    /// engine's reported frame cannot be trusted (projection,
    /// rotate-extrude, translation after a frame reset).
    Tagged {
        solid: Solid,
        delta: Affine,
        aux: Vec<A>,
    },
    /// A replacement solid plus pass-through values. The delta is inferred.
    Bundle { solid: Solid, aux: Vec<A> },
}

impl<A> Outcome<A> {
    /// Plain replacement, inferred delta.
    pub fn bare(solid: Solid) -> Self {
        Outcome::Bare(solid)
    }

    /// Replacement with an explicit delta override.
    pub fn tagged(solid: Solid, delta: Affine, aux: Vec<A>) -> Self {
        Outcome::Tagged { solid, delta, aux }
    }

    /// Replacement plus pass-through values, inferred delta.
    pub fn bundle(solid: Solid, aux: Vec<A>) -> Self {
        Outcome::Bundle { solid, aux }
    }
}

/// Tracks the lineage of transformations applied to one solid.
///
/// Owns the current [`Solid`], a stack of delta transforms (oldest first),
/// and a cached combined origin equal to the left-to-right product of the
/// stack. The cache exists because some engine operations reset a solid's
/// reported frame, making the frame itself unreliable as a history.
///
/// All mutation happens in place; a tracker accumulates history across
/// repeated [`apply`](Self::apply) calls on the same instance.
#[derive(Debug, Clone)]
pub struct LineageTracker {
    solid: Solid,
    combined_origin: Affine,
    stack: Vec<Affine>,
}

impl LineageTracker {
    /// Wrap a solid, seeding the stack with its current frame.
    pub fn new(solid: Solid) -> Self {
        let frame = *solid.frame();
        Self {
            solid,
            combined_origin: frame,
            stack: vec![frame],
        }
    }

    /// The current solid.
    pub fn solid(&self) -> &Solid {
        &self.solid
    }

    /// Product of every delta on the stack.
    pub fn combined_origin(&self) -> &Affine {
        &self.combined_origin
    }

    /// The recorded deltas, oldest first.
    pub fn deltas(&self) -> &[Affine] {
        &self.stack
    }

    /// Current stack depth.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Run `op` against the current solid and record its delta.
    ///
    /// The delta is taken verbatim from a [`Outcome::Tagged`] result and
    /// inferred by left division against the combined origin otherwise. On
    /// success the delta is pushed, the combined origin updated, and the
    /// current solid replaced; the operation's pass-through values are
    /// returned. If `op` fails, the tracker is left untouched and the error
    /// propagates unchanged.
    pub fn apply<A, E, F>(&mut self, op: F) -> Result<Vec<A>, E>
    where
        F: FnOnce(&Solid) -> Result<Outcome<A>, E>,
    {
        let (replacement, delta, aux) = match op(&self.solid)? {
            Outcome::Bare(solid) => {
                let delta = Affine::decompose(solid.frame(), &self.combined_origin);
                (solid, delta, Vec::new())
            }
            Outcome::Tagged { solid, delta, aux } => (solid, delta, aux),
            Outcome::Bundle { solid, aux } => {
                let delta = Affine::decompose(solid.frame(), &self.combined_origin);
                (solid, delta, aux)
            }
        };

        trace!(depth = self.stack.len(), "recording transform delta");
        self.stack.push(delta);
        self.combined_origin = self.combined_origin.compose(&delta);
        self.solid = replacement;
        Ok(aux)
    }

    /// Unwind the most recent delta, reverting both the bookkeeping and the
    /// solid itself.
    pub fn undo(&mut self) -> Result<(), LineageError> {
        if self.stack.is_empty() {
            return Err(LineageError::EmptyLineage);
        }
        self.revert_last();
        Ok(())
    }

    /// Run `f` within a checkpoint.
    ///
    /// On `Ok`, every delta recorded inside the scope is unwound, restoring
    /// the solid and combined origin to their pre-scope values. On `Err`, no
    /// unwind happens: the tracker stays exactly as it was at the point of
    /// failure, and the error propagates. Reverting the scope below its own
    /// checkpoint (by extra `undo` calls inside) leaves nothing to unwind.
    pub fn with_scope<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
    {
        let checkpoint = self.stack.len();
        let value = f(self)?;

        let count = self.stack.len().saturating_sub(checkpoint);
        debug!(count, checkpoint, "unwinding scoped transforms");
        for _ in 0..count {
            self.revert_last();
        }
        Ok(value)
    }

    fn revert_last(&mut self) {
        let Some(evict) = self.stack.pop() else {
            return;
        };
        let inverse = evict.inverse();
        self.combined_origin = self.combined_origin.compose(&inverse);
        self.solid = self.solid.transformed(&inverse);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use glam::DVec3;

    const EPS: f64 = 1e-9;

    fn identity_solid() -> Solid {
        Solid::reference()
    }

    /// World translation returning a bare outcome, so the delta is inferred.
    fn translate(v: DVec3) -> impl FnOnce(&Solid) -> Result<Outcome<()>, &'static str> {
        move |solid| Ok(Outcome::bare(solid.translated(v)))
    }

    fn rotate_z(angle: f64) -> impl FnOnce(&Solid) -> Result<Outcome<()>, &'static str> {
        move |solid| Ok(Outcome::bare(solid.transformed(&Affine::from_rotation_z(angle))))
    }

    /// Independent recomputation of the combined origin from the stack.
    fn origin_from_stack(tracker: &LineageTracker) -> Affine {
        tracker
            .deltas()
            .iter()
            .fold(Affine::IDENTITY, |acc, d| acc.compose(d))
    }

    #[test]
    fn test_new_seeds_stack_with_frame() {
        let solid = identity_solid().translated(DVec3::new(1.0, 2.0, 3.0));
        let tracker = LineageTracker::new(solid);
        assert_eq!(tracker.depth(), 1);
        assert!(tracker.combined_origin().abs_diff_eq(solid.frame(), EPS));
    }

    #[test]
    fn test_two_translations_then_undo() {
        let mut tracker = LineageTracker::new(identity_solid());

        tracker.apply(translate(DVec3::new(5.0, 0.0, 0.0))).unwrap();
        tracker.apply(translate(DVec3::new(0.0, 3.0, 0.0))).unwrap();

        let t = tracker.combined_origin().translation();
        assert_abs_diff_eq!(t.x, 5.0, epsilon = EPS);
        assert_abs_diff_eq!(t.y, 3.0, epsilon = EPS);
        assert_eq!(tracker.depth(), 3);

        tracker.undo().unwrap();
        let t = tracker.combined_origin().translation();
        assert_abs_diff_eq!(t.x, 5.0, epsilon = EPS);
        assert_abs_diff_eq!(t.y, 0.0, epsilon = EPS);
        assert_eq!(tracker.depth(), 2);
    }

    #[test]
    fn test_round_trip_restores_frame_and_origin() {
        let mut tracker = LineageTracker::new(identity_solid());
        let frame_before = *tracker.solid().frame();
        let origin_before = *tracker.combined_origin();

        tracker.apply(translate(DVec3::new(2.0, -1.0, 4.0))).unwrap();
        tracker.apply(rotate_z(0.8)).unwrap();
        tracker.apply(translate(DVec3::new(0.0, 7.0, 0.0))).unwrap();

        for _ in 0..3 {
            tracker.undo().unwrap();
        }

        assert!(tracker.solid().frame().abs_diff_eq(&frame_before, EPS));
        assert!(tracker.combined_origin().abs_diff_eq(&origin_before, EPS));
    }

    #[test]
    fn test_undo_on_empty_stack() {
        let mut tracker = LineageTracker::new(identity_solid());
        tracker.undo().unwrap();
        assert_eq!(tracker.undo(), Err(LineageError::EmptyLineage));
    }

    #[test]
    fn test_tagged_override_takes_precedence() {
        let mut tracker = LineageTracker::new(identity_solid());
        let delta = Affine::from_translation(DVec3::new(20.0, 20.0, 20.0));

        // Replacement deliberately reports a frame inconsistent with the
        // delta, the way a frame-resetting engine operation would.
        let replacement = Solid::reference();
        let aux = tracker
            .apply(|_| Ok::<_, &str>(Outcome::tagged(replacement, delta, vec![42])))
            .unwrap();

        assert_eq!(aux, vec![42]);
        assert!(tracker.deltas().last().unwrap().abs_diff_eq(&delta, EPS));
        assert!(tracker.combined_origin().abs_diff_eq(&delta, EPS));
    }

    #[test]
    fn test_bundle_passes_values_through() {
        let mut tracker = LineageTracker::new(identity_solid());
        let aux = tracker
            .apply(|solid| {
                let moved = solid.translated(DVec3::X);
                Ok::<_, &str>(Outcome::bundle(moved, vec!["lug-a", "lug-b"]))
            })
            .unwrap();
        assert_eq!(aux, vec!["lug-a", "lug-b"]);
        assert_eq!(tracker.depth(), 2);
    }

    #[test]
    fn test_scope_with_no_applies_is_a_noop() {
        let mut tracker = LineageTracker::new(identity_solid());
        let frame_before = *tracker.solid().frame();

        let value: Result<i32, LineageError> = tracker.with_scope(|_| Ok(17));
        assert_eq!(value.unwrap(), 17);
        assert_eq!(tracker.depth(), 1);
        assert!(tracker.solid().frame().abs_diff_eq(&frame_before, EPS));
    }

    #[test]
    fn test_scope_unwinds_on_normal_exit() {
        let mut tracker = LineageTracker::new(identity_solid());
        tracker.apply(translate(DVec3::new(1.0, 0.0, 0.0))).unwrap();
        let origin_before = *tracker.combined_origin();
        let frame_before = *tracker.solid().frame();
        let checkpoint = tracker.depth();

        tracker
            .with_scope(|t| {
                t.apply(translate(DVec3::new(0.0, 5.0, 0.0)))?;
                t.apply(rotate_z(1.1))?;
                t.apply(translate(DVec3::new(3.0, 0.0, 0.0)))?;
                assert_eq!(t.depth(), checkpoint + 3);
                Ok::<_, &str>(())
            })
            .unwrap();

        assert_eq!(tracker.depth(), checkpoint);
        assert!(tracker.combined_origin().abs_diff_eq(&origin_before, EPS));
        assert!(tracker.solid().frame().abs_diff_eq(&frame_before, EPS));
    }

    #[test]
    fn test_scope_does_not_unwind_on_error() {
        let mut tracker = LineageTracker::new(identity_solid());
        let checkpoint = tracker.depth();

        let result: Result<(), &str> = tracker.with_scope(|t| {
            t.apply(translate(DVec3::new(1.0, 0.0, 0.0)))?;
            t.apply(translate(DVec3::new(0.0, 1.0, 0.0)))?;
            t.apply(translate(DVec3::new(0.0, 0.0, 1.0)))?;
            t.apply(|_: &Solid| Err::<Outcome<()>, _>("engine exploded"))?;
            Ok(())
        });

        assert_eq!(result, Err("engine exploded"));
        // Interrupted state stays observable: three deltas, no rollback.
        assert_eq!(tracker.depth(), checkpoint + 3);
        let t = tracker.combined_origin().translation();
        assert_abs_diff_eq!(t.x, 1.0, epsilon = EPS);
        assert_abs_diff_eq!(t.y, 1.0, epsilon = EPS);
        assert_abs_diff_eq!(t.z, 1.0, epsilon = EPS);
    }

    #[test]
    fn test_failed_apply_leaves_tracker_untouched() {
        let mut tracker = LineageTracker::new(identity_solid());
        let origin_before = *tracker.combined_origin();

        let result = tracker.apply(|_: &Solid| Err::<Outcome<()>, _>("bad profile"));
        assert_eq!(result, Err("bad profile"));
        assert_eq!(tracker.depth(), 1);
        assert!(tracker.combined_origin().abs_diff_eq(&origin_before, EPS));
    }

    #[test]
    fn test_combined_origin_matches_stack_product() {
        let mut tracker = LineageTracker::new(identity_solid());
        tracker.apply(translate(DVec3::new(4.0, 0.0, 0.0))).unwrap();
        tracker.apply(rotate_z(0.6)).unwrap();
        tracker
            .apply(|_| {
                Ok::<_, &str>(Outcome::tagged(
                    Solid::reference(),
                    Affine::from_translation(DVec3::new(0.0, 0.0, 9.0)),
                    Vec::<()>::new(),
                ))
            })
            .unwrap();
        tracker.undo().unwrap();

        assert!(
            tracker
                .combined_origin()
                .abs_diff_eq(&origin_from_stack(&tracker), EPS)
        );
    }

    #[test]
    fn test_clone_is_independent_but_shares_geometry() {
        let mut tracker = LineageTracker::new(identity_solid());
        tracker.apply(translate(DVec3::X)).unwrap();

        let snapshot = tracker.clone();
        tracker.apply(translate(DVec3::Y)).unwrap();

        assert_eq!(snapshot.depth(), 2);
        assert_eq!(tracker.depth(), 3);
        assert_eq!(snapshot.solid().id(), tracker.solid().id());
    }

    #[test]
    fn test_inner_undo_below_checkpoint_is_tolerated() {
        let mut tracker = LineageTracker::new(identity_solid());
        tracker.apply(translate(DVec3::X)).unwrap();

        tracker
            .with_scope(|t| {
                // Undo past the checkpoint inside the scope; exit then has
                // nothing left to unwind.
                t.undo()?;
                t.undo()?;
                Ok::<_, LineageError>(())
            })
            .unwrap();
        assert_eq!(tracker.depth(), 0);
    }
}
