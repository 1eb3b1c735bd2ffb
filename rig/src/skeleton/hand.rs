use nalgebra as na;
use std::f32::consts::PI;

use super::chain::FingerChain;
use super::joint::{AxisRange, Joint, JointLimits};
use super::{Iso, Point3, Quat, Vec3};
use crate::constants::{
    METACARPAL_LENGTH, PALM_DEPTH, PALM_HEIGHT, PALM_WIDTH, PHALANX_LENGTH, THUMB_BASE_TILT,
    THUMB_BASE_TWIST, THUMB_FORWARD_FACTOR,
};

/// Which hand a chain or finger belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];

    /// Dense index in 0..2.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    /// X mirroring factor: +1 for the left hand model, -1 for the right.
    #[inline]
    pub fn mirror(self) -> f32 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }
}

/// Finger identity within one hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Digit {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Digit {
    pub const ALL: [Digit; 5] = [
        Digit::Thumb,
        Digit::Index,
        Digit::Middle,
        Digit::Ring,
        Digit::Pinky,
    ];

    /// Dense index in 0..5, thumb first (the palm mount order).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Digit::Thumb => 0,
            Digit::Index => 1,
            Digit::Middle => 2,
            Digit::Ring => 3,
            Digit::Pinky => 4,
        }
    }

    #[inline]
    pub fn is_thumb(self) -> bool {
        matches!(self, Digit::Thumb)
    }
}

/// Static per-finger configuration: segment count and bone length scaling.
///
/// Thumbs have two phalangeal joints past the knuckle; every other finger has
/// three. The solver relies on these structural invariants (chain length,
/// limit presence) to terminate correctly.
#[derive(Clone, Copy, Debug)]
pub struct FingerSpec {
    pub digit: Digit,
    /// Number of phalanx segments (2 for thumbs, 3 otherwise).
    pub segments: usize,
    pub phalanx_factor: f32,
    pub metacarpal_factor: f32,
}

/// The configuration table shared by both hands.
pub const FINGER_SPECS: [FingerSpec; 5] = [
    FingerSpec {
        digit: Digit::Thumb,
        segments: 2,
        phalanx_factor: 0.8,
        metacarpal_factor: 0.9,
    },
    FingerSpec {
        digit: Digit::Index,
        segments: 3,
        phalanx_factor: 1.0,
        metacarpal_factor: 1.0,
    },
    FingerSpec {
        digit: Digit::Middle,
        segments: 3,
        phalanx_factor: 1.05,
        metacarpal_factor: 1.02,
    },
    FingerSpec {
        digit: Digit::Ring,
        segments: 3,
        phalanx_factor: 1.0,
        metacarpal_factor: 1.0,
    },
    FingerSpec {
        digit: Digit::Pinky,
        segments: 3,
        phalanx_factor: 0.85,
        metacarpal_factor: 0.9,
    },
];

#[inline]
pub fn finger_spec(digit: Digit) -> &'static FingerSpec {
    &FINGER_SPECS[digit.index()]
}

/// Knuckle (metacarpophalangeal) limits. Flexion toward the palm is negative
/// X and reaches a right angle; hyperextension is much shallower. Side-to-side
/// spread lives on Z (pinkies get extra, thumbs a lot more), twist about the
/// bone axis on Y. Thumb limits bound the knuckle's total rotation, base tilt
/// included.
fn knuckle_limits(digit: Digit) -> JointLimits {
    let is_thumb = digit.is_thumb();
    let is_pinky = matches!(digit, Digit::Pinky);
    JointLimits {
        x: if is_thumb {
            AxisRange::symmetric(PI / 3.0)
        } else {
            AxisRange::new(-PI / 2.0, PI / 6.0)
        },
        y: if is_thumb {
            AxisRange::new(-PI / 6.0, PI / 8.0)
        } else {
            AxisRange::symmetric(PI / 12.0)
        },
        z: if is_thumb {
            AxisRange::symmetric(PI / 3.0)
        } else if is_pinky {
            AxisRange::symmetric(PI / 3.6)
        } else {
            AxisRange::symmetric(PI / 18.0)
        },
    }
}

/// Proximal interphalangeal limits: pure flexion, deep for thumbs.
fn proximal_limits(digit: Digit) -> JointLimits {
    JointLimits {
        x: if digit.is_thumb() {
            AxisRange::new(-PI * 3.0 / 4.0, 0.0)
        } else {
            AxisRange::new(-PI * 2.0 / 3.0, 0.0)
        },
        y: AxisRange::locked(),
        z: AxisRange::locked(),
    }
}

/// Distal interphalangeal limits.
fn distal_limits() -> JointLimits {
    JointLimits {
        x: AxisRange::new(-PI / 2.0, PI / 18.0),
        y: AxisRange::locked(),
        z: AxisRange::locked(),
    }
}

/// Limits for the tip-holding joint on three-segment fingers.
fn tip_joint_limits() -> JointLimits {
    JointLimits {
        x: AxisRange::new(-PI / 3.0, PI / 36.0),
        y: AxisRange::locked(),
        z: AxisRange::locked(),
    }
}

/// Hand-local placement of a finger's palm mount: knuckles spread across the
/// leading edge of the palm slab, thumbs pushed forward along the fingers and
/// in toward the board center.
fn mount_iso(side: Side, digit: Digit) -> Iso {
    let spacing = PALM_WIDTH / (Digit::ALL.len() as f32 - 1.0);
    let i = digit.index() as f32;
    let x = side.mirror() * (-PALM_WIDTH / 2.0 + i * spacing);
    let y = if digit.is_thumb() {
        PALM_DEPTH * THUMB_FORWARD_FACTOR
    } else {
        0.0
    };
    let z = -PALM_HEIGHT / 2.0;
    Iso::from_parts(na::Translation3::new(x, y, z), Quat::identity())
}

/// Builds one finger chain: knuckle at the mount, one pivot per phalanx, and
/// a fingertip offset past the outermost joint. Bones extend along local +Y.
///
/// Thumbs start with their knuckle pre-rotated toward the palm center; that
/// orientation is ordinary joint state, so the solver bends it within the
/// same limits as any other correction.
fn build_chain(side: Side, spec: &FingerSpec) -> FingerChain {
    let metacarpal = METACARPAL_LENGTH * spec.metacarpal_factor;
    let phalanx = PHALANX_LENGTH * spec.phalanx_factor;

    // Base-first: the knuckle pivots at the mount itself.
    let mut knuckle = Joint::new(Vec3::zeros(), Some(knuckle_limits(spec.digit)));
    if spec.digit.is_thumb() {
        knuckle.rotation =
            Quat::from_euler_angles(0.0, THUMB_BASE_TWIST, side.mirror() * THUMB_BASE_TILT);
    }
    let mut joints = vec![knuckle];
    joints.push(Joint::new(
        Vec3::new(0.0, metacarpal, 0.0),
        Some(proximal_limits(spec.digit)),
    ));
    joints.push(Joint::new(
        Vec3::new(0.0, phalanx, 0.0),
        Some(distal_limits()),
    ));
    if spec.segments == 3 {
        joints.push(Joint::new(
            Vec3::new(0.0, phalanx, 0.0),
            Some(tip_joint_limits()),
        ));
    }

    FingerChain::from_base_joints(mount_iso(side, spec.digit), joints, Vec3::new(0.0, phalanx, 0.0))
}

/// A rigid transform parenting five finger chains.
///
/// Two instances exist per scene (left and right), independently positioned.
/// `default_iso` stores the rest pose the hand eases back to when idle.
#[derive(Clone, Debug)]
pub struct Hand {
    pub side: Side,
    /// Current world transform; translated by the repositioning logic.
    pub iso: Iso,
    /// Stored default/rest transform.
    pub default_iso: Iso,
    /// Chains indexed by `Digit::index()`.
    pub chains: [FingerChain; 5],
}

impl Hand {
    #[inline]
    pub fn chain(&self, digit: Digit) -> &FingerChain {
        &self.chains[digit.index()]
    }

    #[inline]
    pub fn chain_mut(&mut self, digit: Digit) -> &mut FingerChain {
        &mut self.chains[digit.index()]
    }

    /// World position of a fingertip under the hand's current transform.
    #[inline]
    pub fn tip_world(&self, digit: Digit) -> Point3 {
        self.chain(digit).tip_world(&self.iso)
    }
}

/// Default hover pose for a hand: the palm floats above the near edge of the
/// board, pitched forward so straight fingers rise from the knuckles and arch
/// down over the home row, with a slight inward lean.
pub fn default_hand_iso(side: Side) -> Iso {
    // The left hand model covers the right half of the board (home keys
    // J K L ;), the right hand model the mirrored left half (F D S A).
    let translation = na::Translation3::new(side.mirror() * 1.17, 0.6725, 1.645);
    let rotation = Quat::from_axis_angle(&Vec3::x_axis(), PI / 6.0)
        * Quat::from_axis_angle(&Vec3::z_axis(), -side.mirror() * PI / 60.0);
    Iso::from_parts(translation, rotation)
}

/// Builds a hand in its default pose with all joints neutral.
pub fn build_hand(side: Side) -> Hand {
    let iso = default_hand_iso(side);
    let chains: [FingerChain; 5] =
        std::array::from_fn(|i| build_chain(side, finger_spec(Digit::ALL[i])));
    Hand {
        side,
        iso,
        default_iso: iso,
        chains,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra as na;

    const TOL: f32 = 1.0e-5;

    #[test]
    fn thumbs_have_one_fewer_joint() {
        for side in Side::ALL {
            let hand = build_hand(side);
            assert_eq!(hand.chain(Digit::Thumb).len(), 3);
            for digit in [Digit::Index, Digit::Middle, Digit::Ring, Digit::Pinky] {
                assert_eq!(hand.chain(digit).len(), 4);
            }
        }
    }

    #[test]
    fn every_joint_carries_limits() {
        // The solver's clamp step assumes limits exist on every finger joint.
        let hand = build_hand(Side::Left);
        for chain in &hand.chains {
            for joint in chain.joints() {
                assert!(joint.limits.is_some());
            }
        }
    }

    #[test]
    fn reach_matches_scaled_bone_lengths() {
        let hand = build_hand(Side::Right);
        // Index: metacarpal 0.8 + three phalanges 0.5 + tip 0.5.
        let expected = 0.8 + 3.0 * 0.5;
        assert!((hand.chain(Digit::Index).max_reach() - expected).abs() < TOL);
        // Thumb: metacarpal 0.72 + two phalanges 0.4 + tip 0.4.
        let expected_thumb = 0.8 * 0.9 + 2.0 * 0.4;
        assert!((hand.chain(Digit::Thumb).max_reach() - expected_thumb).abs() < 1.0e-4);
    }

    #[test]
    fn mounts_mirror_across_hands() {
        let left = build_hand(Side::Left);
        let right = build_hand(Side::Right);
        for digit in Digit::ALL {
            let lm = left.chain(digit).mount().translation.vector;
            let rm = right.chain(digit).mount().translation.vector;
            assert!((lm.x + rm.x).abs() < TOL, "x should mirror for {digit:?}");
            assert!((lm.y - rm.y).abs() < TOL);
            assert!((lm.z - rm.z).abs() < TOL);
        }
    }

    #[test]
    fn thumb_knuckles_start_tilted_inward() {
        // Each thumb chain begins pre-rotated toward the palm center, with
        // the tilt direction mirrored between hands.
        let left = build_hand(Side::Left);
        let right = build_hand(Side::Right);
        let (_, _, lz) = left.chain(Digit::Thumb).joints()[0].rotation.euler_angles();
        let (_, _, rz) = right.chain(Digit::Thumb).joints()[0].rotation.euler_angles();
        assert!((lz - THUMB_BASE_TILT).abs() < 1.0e-4);
        assert!((rz + THUMB_BASE_TILT).abs() < 1.0e-4);
        // Non-thumb knuckles stay neutral.
        let id = left.chain(Digit::Index).joints()[0].rotation;
        assert!(id.angle() < TOL);
    }

    #[test]
    fn home_row_is_within_reach_of_the_default_pose() {
        // Spot-check the pose tuning: each hand's index chain must be able to
        // reach its home key's surface with slack to spare (KeyJ sits near
        // x 0.65, z 0.02; KeyF mirrors it).
        for side in Side::ALL {
            let hand = build_hand(side);
            let chain = hand.chain(Digit::Index);
            let base = chain.base_world(&hand.iso);
            let home = Point3::new(side.mirror() * 0.65, 0.1, 0.02);
            assert!(
                na::distance(&base, &home) < 0.8 * chain.max_reach(),
                "{side:?} index home key out of comfortable reach"
            );
        }
    }
}
