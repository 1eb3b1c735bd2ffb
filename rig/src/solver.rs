//! Cyclic Coordinate Descent (CCD) solver for finger chains.
//!
//! CCD rotates one joint at a time, tip-adjacent first through the base, so
//! the fingertip approaches its target. It is chosen over analytic or
//! Jacobian methods because the chains are short (3-4 joints), per-axis
//! limits are trivial to enforce joint-by-joint, and the iterate-and-damp
//! approach is visually forgiving for real-time character motion.
//!
//! Behavior
//! - Runs up to [`CCD_ITERATIONS`] full sweeps, stopping early once the tip
//!   is within [`CCD_THRESHOLD`] of the target.
//! - Each joint applies only a damped fraction of its corrective rotation
//!   (slerp by [`CCD_SMOOTHING_FACTOR`]), then clamps to its limits.
//! - World transforms are recomputed after every joint update, so each
//!   correction sees the already-corrected joints closer to the tip.
//! - Exhausting the iteration cap is not an error: the chain simply keeps
//!   whatever residual remains. Convergence is best-effort only.

use nalgebra as na;

use crate::constants::{CCD_ITERATIONS, CCD_MIN_STEP_ANGLE, CCD_SMOOTHING_FACTOR, CCD_THRESHOLD};
use crate::skeleton::{FingerChain, Iso, Point3, Quat};

/// Informational summary of one solve. Never treated as a failure signal.
#[derive(Clone, Copy, Debug)]
pub struct CcdOutcome {
    /// Full sweeps executed before stopping.
    pub iterations: u32,
    /// Tip-to-target distance when the solve ended.
    pub residual: f32,
    /// Whether the residual is below the convergence threshold.
    pub converged: bool,
}

/// Solves one chain toward `target` (world space) under `hand_iso`, mutating
/// the chain's joint rotations in place.
pub fn solve_ccd(chain: &mut FingerChain, hand_iso: &Iso, target: &Point3) -> CcdOutcome {
    let mut iterations = 0;

    for _ in 0..CCD_ITERATIONS {
        let tip = chain.tip_world(hand_iso);
        if na::distance(&tip, target) < CCD_THRESHOLD {
            break;
        }
        iterations += 1;

        for j in 0..chain.len() {
            step_joint(chain, hand_iso, target, j);
        }
    }

    let residual = na::distance(&chain.tip_world(hand_iso), target);
    CcdOutcome {
        iterations,
        residual,
        converged: residual < CCD_THRESHOLD,
    }
}

/// One damped corrective rotation for the joint at `ccd_index`.
fn step_joint(chain: &mut FingerChain, hand_iso: &Iso, target: &Point3, ccd_index: usize) {
    let joint_iso = chain.joint_world(hand_iso, ccd_index);
    let joint_pos = Point3::from(joint_iso.translation.vector);
    let tip = chain.tip_world(hand_iso);

    let to_tip = tip - joint_pos;
    let to_target = target - joint_pos;

    // Degenerate geometry (tip or target on the pivot, or exactly opposed
    // vectors) has no well-defined corrective axis; skip the joint.
    let Some(corrective) = Quat::rotation_between(&to_tip, &to_target) else {
        return;
    };
    if corrective.angle() <= CCD_MIN_STEP_ANGLE {
        return;
    }

    let local = chain.joint(ccd_index).rotation;
    // The corrective rotation is expressed in world space; conjugate it into
    // the joint's parent frame before composing with the local rotation.
    let world_rot = joint_iso.rotation;
    let parent_rot = world_rot * local.inverse();
    let target_local = parent_rot.inverse() * corrective * world_rot;

    // Damped step: ease toward the fully-corrected orientation instead of
    // snapping to it.
    let stepped = local
        .try_slerp(&target_local, CCD_SMOOTHING_FACTOR, 1.0e-9)
        .unwrap_or(target_local);

    let joint = chain.joint_mut(ccd_index);
    joint.rotation = match joint.limits {
        Some(limits) => limits.clamp_rotation(stepped),
        None => stepped,
    };
}
