//! Affine transform algebra
//!
//! 4x4 homogeneous transforms with the composition and left-division
//! operations the lineage tracker is built on.

use glam::{DMat4, DVec3};
use serde::{Deserialize, Serialize};

/// A 4x4 homogeneous affine transform.
///
/// Immutable value type: every operation returns a new transform. The bottom
/// row is assumed to be `[0, 0, 0, 1]`; composition relies on it but does not
/// enforce it.
///
/// Convention: `compose(a, b)` is the matrix product `a * b`, which applies
/// `b` first and `a` second under the engine's column-vector convention.
/// Deltas therefore chain onto a frame from the right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Affine(DMat4);

impl Affine {
    /// The identity transform.
    pub const IDENTITY: Affine = Affine(DMat4::IDENTITY);

    /// Wrap a raw matrix.
    pub fn from_mat4(m: DMat4) -> Self {
        Affine(m)
    }

    /// Pure translation by `v`.
    pub fn from_translation(v: DVec3) -> Self {
        Affine(DMat4::from_translation(v))
    }

    /// Rotation of `angle` radians around the X axis.
    pub fn from_rotation_x(angle: f64) -> Self {
        Affine(DMat4::from_rotation_x(angle))
    }

    /// Rotation of `angle` radians around the Y axis.
    pub fn from_rotation_y(angle: f64) -> Self {
        Affine(DMat4::from_rotation_y(angle))
    }

    /// Rotation of `angle` radians around the Z axis.
    pub fn from_rotation_z(angle: f64) -> Self {
        Affine(DMat4::from_rotation_z(angle))
    }

    /// Non-uniform scale.
    pub fn from_scale(s: DVec3) -> Self {
        Affine(DMat4::from_scale(s))
    }

    /// The underlying matrix.
    pub fn matrix(&self) -> &DMat4 {
        &self.0
    }

    /// `self * other`: apply `other`, then `self`.
    pub fn compose(&self, other: &Affine) -> Affine {
        Affine(self.0 * other.0)
    }

    /// Left division: the delta `d` with `compose(before, d) == after`.
    ///
    /// This is the inferred delta the lineage tracker records when an
    /// operation does not supply an explicit one. For operations that reset
    /// or reinterpret a solid's frame (projection, rotate-extrude), the
    /// reported `after` frame does not let this recover the true effect;
    /// callers must override the delta instead.
    pub fn decompose(after: &Affine, before: &Affine) -> Affine {
        Affine(before.0.inverse() * after.0)
    }

    /// The inverse transform.
    pub fn inverse(&self) -> Affine {
        Affine(self.0.inverse())
    }

    /// Translation component (last column).
    pub fn translation(&self) -> DVec3 {
        self.0.w_axis.truncate()
    }

    /// Transform a point.
    pub fn transform_point(&self, p: DVec3) -> DVec3 {
        self.0.transform_point3(p)
    }

    /// Element-wise comparison within `eps`.
    pub fn abs_diff_eq(&self, other: &Affine, eps: f64) -> bool {
        self.0.abs_diff_eq(other.0, eps)
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_identity_is_neutral() {
        let t = Affine::from_translation(DVec3::new(1.0, 2.0, 3.0));
        assert!(t.compose(&Affine::IDENTITY).abs_diff_eq(&t, EPS));
        assert!(Affine::IDENTITY.compose(&t).abs_diff_eq(&t, EPS));
    }

    #[test]
    fn test_decompose_recovers_delta() {
        let before = Affine::from_rotation_z(0.7).compose(&Affine::from_translation(DVec3::X));
        let delta = Affine::from_translation(DVec3::new(5.0, -2.0, 1.0))
            .compose(&Affine::from_rotation_x(0.3));
        let after = before.compose(&delta);

        let recovered = Affine::decompose(&after, &before);
        assert!(recovered.abs_diff_eq(&delta, EPS));
        assert!(before.compose(&recovered).abs_diff_eq(&after, EPS));
    }

    #[test]
    fn test_inverse_round_trip() {
        let t = Affine::from_rotation_y(1.2).compose(&Affine::from_translation(DVec3::ONE));
        assert!(t.compose(&t.inverse()).abs_diff_eq(&Affine::IDENTITY, EPS));
    }

    #[test]
    fn test_translation_component() {
        let t = Affine::from_translation(DVec3::new(4.0, 5.0, 6.0));
        let v = t.translation();
        assert_abs_diff_eq!(v.x, 4.0, epsilon = EPS);
        assert_abs_diff_eq!(v.y, 5.0, epsilon = EPS);
        assert_abs_diff_eq!(v.z, 6.0, epsilon = EPS);
    }

    #[test]
    fn test_compose_applies_right_operand_first() {
        // Rotate 90 degrees around Z, then translate: the point lands at the
        // translated image of the rotated point.
        let rot = Affine::from_rotation_z(std::f64::consts::FRAC_PI_2);
        let tr = Affine::from_translation(DVec3::new(10.0, 0.0, 0.0));
        let p = tr.compose(&rot).transform_point(DVec3::X);
        assert_abs_diff_eq!(p.x, 10.0, epsilon = EPS);
        assert_abs_diff_eq!(p.y, 1.0, epsilon = EPS);
    }
}
