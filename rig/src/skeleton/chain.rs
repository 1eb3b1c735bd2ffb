use super::joint::Joint;
use super::{Iso, Point3, Vec3};

/// An ordered sequence of joints from a fingertip back to its palm
/// attachment, used as the unit of IK solving.
///
/// Invariant: `joints` is stored in CCD iteration order, tip-adjacent joint
/// first and base (knuckle) joint last. Forward kinematics walks the slice in
/// reverse.
///
/// World transforms are recomputed deterministically on every query instead of
/// being cached: chains are at most four joints long, and the solver must see
/// already-corrected inner joints when it evaluates the next one.
#[derive(Clone, Debug)]
pub struct FingerChain {
    /// Fixed placement of the chain on the palm, in hand-local space.
    mount: Iso,
    /// Joints in CCD order: tip-adjacent first, base last.
    joints: Vec<Joint>,
    /// Fixed offset from the outermost joint to the fingertip point, in that
    /// joint's local frame.
    tip_offset: Vec3,
}

impl FingerChain {
    /// Builds a chain from joints listed base-first (the natural construction
    /// order); they are stored reversed, in CCD order.
    pub fn from_base_joints(mount: Iso, mut base_first: Vec<Joint>, tip_offset: Vec3) -> Self {
        base_first.reverse();
        Self {
            mount,
            joints: base_first,
            tip_offset,
        }
    }

    /// Number of joints in the chain.
    #[inline]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Joints in CCD order (tip-adjacent first).
    #[inline]
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    #[inline]
    pub fn joint(&self, ccd_index: usize) -> &Joint {
        &self.joints[ccd_index]
    }

    #[inline]
    pub fn joint_mut(&mut self, ccd_index: usize) -> &mut Joint {
        &mut self.joints[ccd_index]
    }

    #[inline]
    pub fn mount(&self) -> Iso {
        self.mount
    }

    /// World transform of the joint at `ccd_index`, composed base-to-tip from
    /// the hand transform through every joint at or inside the index.
    pub fn joint_world(&self, hand_iso: &Iso, ccd_index: usize) -> Iso {
        let mut acc = hand_iso * self.mount;
        // `joints` is tip-first, so the base-to-tip walk runs the indices
        // from the end of the slice down to the queried one.
        for i in (ccd_index..self.joints.len()).rev() {
            acc *= self.joints[i].local_iso();
        }
        acc
    }

    /// World position of the fingertip (the effector the solver matches to a
    /// target).
    pub fn tip_world(&self, hand_iso: &Iso) -> Point3 {
        let outer = self.joint_world(hand_iso, 0);
        outer.transform_point(&Point3::from(self.tip_offset))
    }

    /// Upper bound on the distance from the base pivot to the fingertip:
    /// the sum of all bone lengths when the chain is fully extended.
    pub fn max_reach(&self) -> f32 {
        let bones: f32 = self.joints.iter().map(|j| j.offset.norm()).sum();
        bones + self.tip_offset.norm()
    }

    /// World position of the base pivot (hand transform applied to the mount).
    pub fn base_world(&self, hand_iso: &Iso) -> Point3 {
        let iso = hand_iso * self.mount;
        Point3::from(iso.translation.vector)
    }
}
