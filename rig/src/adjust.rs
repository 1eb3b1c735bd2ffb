//! Whole-hand repositioning math.
//!
//! Fingers have limited reach; when their targets drift outside it, the hand
//! itself translates to bring them back into range. When nothing is pressing,
//! the hand instead eases back to its stored default pose with a subtle idle
//! sway.
//!
//! Behavior
//! - Only fingers actively chasing a key contribute; resting fingers ride
//!   along with the hand and never steer it. Rest hovers track the hand, so
//!   letting them contribute would feed their own displacement back into the
//!   correction and walk the hand away from the board.
//! - Fingertip discrepancies beyond [`HAND_ADJUSTMENT_THRESHOLD`] contribute a
//!   correction vector; the average is damped and capped per tick so the hand
//!   glides rather than jumps.
//! - The idle return eases position and rotation independently toward the
//!   default pose; each hand gets its own sway phase/frequency seeds for
//!   visual variety.

use crate::constants::{
    HAND_ADJUSTMENT_FACTOR, HAND_ADJUSTMENT_THRESHOLD, HAND_RETURN_TO_DEFAULT_FACTOR,
    IDLE_PALM_MAGNITUDE_POS, IDLE_PALM_MAGNITUDE_ROT, IDLE_PALM_SPEED,
    MAX_HAND_ADJUSTMENT_PER_TICK,
};
use crate::skeleton::{Iso, Quat, Side, Vec3};

/// True if a discrepancy is large enough to ask the hand for help.
#[inline]
pub fn needs_hand_help(to_target: &Vec3) -> bool {
    to_target.norm() > HAND_ADJUSTMENT_THRESHOLD
}

/// Average correction for one hand this tick, damped and capped. Each entry
/// is a world-space fingertip-to-target vector from a pressing finger.
/// Returns `None` when no finger contributed.
pub fn hand_correction(errors: &[Vec3]) -> Option<Vec3> {
    if errors.is_empty() {
        return None;
    }

    let mut sum = Vec3::zeros();
    for e in errors {
        sum += e;
    }

    let mut correction = sum / errors.len() as f32 * HAND_ADJUSTMENT_FACTOR;
    let len = correction.norm();
    if len > MAX_HAND_ADJUSTMENT_PER_TICK {
        correction *= MAX_HAND_ADJUSTMENT_PER_TICK / len;
    }
    Some(correction)
}

/// Idle sway offsets for a hand at time `t`: `(position, rotation)` where the
/// rotation offset is euler `(x, y, z)` about the default orientation.
///
/// The two hands use distinct frequency seed sets so they never move in
/// lockstep; the Z rotation never sways.
pub fn idle_sway(side: Side, t: f32) -> (Vec3, Vec3) {
    let s = IDLE_PALM_SPEED;
    match side {
        Side::Left => (
            Vec3::new(
                (t * s * 0.7).sin() * IDLE_PALM_MAGNITUDE_POS,
                (t * s * 1.3).cos() * IDLE_PALM_MAGNITUDE_POS,
                (t * s * 0.9).sin() * IDLE_PALM_MAGNITUDE_POS,
            ),
            Vec3::new(
                (t * s * 1.1).cos() * IDLE_PALM_MAGNITUDE_ROT,
                (t * s * 0.8).sin() * IDLE_PALM_MAGNITUDE_ROT,
                0.0,
            ),
        ),
        Side::Right => (
            Vec3::new(
                (t * s * 0.75).cos() * IDLE_PALM_MAGNITUDE_POS,
                (t * s * 1.25).sin() * IDLE_PALM_MAGNITUDE_POS,
                (t * s * 0.95).cos() * IDLE_PALM_MAGNITUDE_POS,
            ),
            Vec3::new(
                (t * s * 1.15).sin() * IDLE_PALM_MAGNITUDE_ROT,
                (t * s * 0.85).cos() * IDLE_PALM_MAGNITUDE_ROT,
                0.0,
            ),
        ),
    }
}

/// Eases `iso` one tick toward the sway-offset default pose.
///
/// Position closes a fixed fraction of the gap, capped per tick; rotation
/// lerps each decomposed euler component independently, which is stable here
/// because the sway amplitudes are tiny.
pub fn ease_toward_default(iso: &mut Iso, default_iso: &Iso, side: Side, t: f32) {
    let (pos_sway, rot_sway) = idle_sway(side, t);

    let target_pos = default_iso.translation.vector + pos_sway;
    let delta = target_pos - iso.translation.vector;
    if delta.norm_squared() > 1.0e-6 {
        let mut step = delta * HAND_RETURN_TO_DEFAULT_FACTOR;
        let len = step.norm();
        if len > MAX_HAND_ADJUSTMENT_PER_TICK {
            step *= MAX_HAND_ADJUSTMENT_PER_TICK / len;
        }
        iso.translation.vector += step;
    } else {
        iso.translation.vector = target_pos;
    }

    let (cx, cy, cz) = iso.rotation.euler_angles();
    let (dx, dy, dz) = default_iso.rotation.euler_angles();
    let lerp = |from: f32, to: f32| from + (to - from) * HAND_RETURN_TO_DEFAULT_FACTOR;
    iso.rotation = Quat::from_euler_angles(
        lerp(cx, dx + rot_sway.x),
        lerp(cy, dy + rot_sway.y),
        lerp(cz, dz),
    );
}
