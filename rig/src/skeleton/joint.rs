use nalgebra as na;

use super::{Quat, Vec3};

/// Inclusive rotation range for a single local axis, in radians.
///
/// Ranges are asymmetric on purpose: a knuckle flexes toward the palm much
/// further than it hyperextends. A range of `[0, 0]` locks the axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisRange {
    pub min: f32,
    pub max: f32,
}

impl AxisRange {
    #[inline]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// A locked axis: no rotation permitted.
    #[inline]
    pub const fn locked() -> Self {
        Self { min: 0.0, max: 0.0 }
    }

    /// Symmetric range `[-half, half]`.
    #[inline]
    pub const fn symmetric(half: f32) -> Self {
        Self {
            min: -half,
            max: half,
        }
    }

    #[inline]
    pub fn clamp(&self, angle: f32) -> f32 {
        angle.clamp(self.min, self.max)
    }
}

/// Per-axis rotation limits for one joint, expressed in the joint's parent
/// frame and decomposed in a fixed X-Y-Z euler order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JointLimits {
    pub x: AxisRange,
    pub y: AxisRange,
    pub z: AxisRange,
}

impl JointLimits {
    /// Clamps `rotation` so each decomposed euler component lies within its
    /// configured range.
    ///
    /// This decompose/clamp/recompose step is an approximation, not a true
    /// constrained-optimization projection: when a clamp is active the
    /// recomposed orientation can deviate from the solver's requested one and
    /// reintroduce a small target-tracking error.
    pub fn clamp_rotation(&self, rotation: Quat) -> Quat {
        let (rx, ry, rz) = rotation.euler_angles();
        Quat::from_euler_angles(self.x.clamp(rx), self.y.clamp(ry), self.z.clamp(rz))
    }

    /// True if every decomposed euler component of `rotation` lies within its
    /// range, up to `tol` radians.
    pub fn contains(&self, rotation: Quat, tol: f32) -> bool {
        let (rx, ry, rz) = rotation.euler_angles();
        rx >= self.x.min - tol
            && rx <= self.x.max + tol
            && ry >= self.y.min - tol
            && ry <= self.y.max + tol
            && rz >= self.z.min - tol
            && rz <= self.z.max + tol
    }
}

/// An oriented pivot point in a kinematic chain.
///
/// The joint sits at a fixed `offset` from its parent pivot (the parent's bone
/// vector, in the parent's local frame) and contributes its own `rotation` to
/// everything further out. Joints are created once at hand-build time and
/// mutated every solver iteration; they are never destroyed during a session.
#[derive(Clone, Copy, Debug)]
pub struct Joint {
    /// Local rotation relative to the parent joint's frame.
    pub rotation: Quat,
    /// Fixed translation from the parent pivot, in the parent's local frame.
    pub offset: Vec3,
    /// Optional per-axis rotation limits. `None` leaves the joint free.
    pub limits: Option<JointLimits>,
}

impl Joint {
    #[inline]
    pub fn new(offset: Vec3, limits: Option<JointLimits>) -> Self {
        Self {
            rotation: Quat::identity(),
            offset,
            limits,
        }
    }

    /// The joint's local transform: translate by `offset`, then rotate.
    #[inline]
    pub fn local_iso(&self) -> super::Iso {
        super::Iso::from_parts(na::Translation3::from(self.offset), self.rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const TOL: f32 = 1.0e-5;

    #[test]
    fn clamp_is_identity_inside_the_range() {
        let limits = JointLimits {
            x: AxisRange::new(-FRAC_PI_2, 0.3),
            y: AxisRange::symmetric(0.2),
            z: AxisRange::symmetric(0.2),
        };
        let rot = Quat::from_euler_angles(-0.4, 0.1, -0.15);
        let clamped = limits.clamp_rotation(rot);
        assert!(clamped.angle_to(&rot) < TOL);
    }

    #[test]
    fn clamp_pulls_each_axis_to_its_bound() {
        let limits = JointLimits {
            x: AxisRange::new(-1.0, 0.25),
            y: AxisRange::locked(),
            z: AxisRange::locked(),
        };
        // Pure X rotation past the max: only the X component should survive,
        // clamped to the bound.
        let rot = Quat::from_euler_angles(0.9, 0.0, 0.0);
        let (rx, ry, rz) = limits.clamp_rotation(rot).euler_angles();
        assert!((rx - 0.25).abs() < TOL);
        assert!(ry.abs() < TOL);
        assert!(rz.abs() < TOL);
    }

    #[test]
    fn locked_axes_zero_out_rotation() {
        let limits = JointLimits {
            x: AxisRange::locked(),
            y: AxisRange::locked(),
            z: AxisRange::locked(),
        };
        let rot = Quat::from_euler_angles(0.3, -0.2, 0.5);
        let clamped = limits.clamp_rotation(rot);
        assert!(clamped.angle() < TOL);
    }

    #[test]
    fn contains_matches_clamp_fixpoint() {
        let limits = JointLimits {
            x: AxisRange::new(-1.2, 0.1),
            y: AxisRange::symmetric(0.3),
            z: AxisRange::symmetric(0.3),
        };
        let inside = Quat::from_euler_angles(-0.5, 0.1, -0.2);
        let outside = Quat::from_euler_angles(0.8, 0.0, 0.0);
        assert!(limits.contains(inside, 1.0e-6));
        assert!(!limits.contains(outside, 1.0e-6));
        assert!(limits.contains(limits.clamp_rotation(outside), 1.0e-4));
    }
}
