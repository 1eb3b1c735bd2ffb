//! "Desired destination" math for the per-finger motion planner.
//!
//! Keep this file focused on computing where an IK target wants to be; the
//! stateful decisions about which mode a finger is in live in the animator
//! crate, and the solver never reads destinations directly — only the live
//! target positions eased toward them.

use nalgebra as na;

use crate::constants::{
    FINGER_REST_CURL_OFFSET, IDLE_TARGET_MAGNITUDE, IDLE_TARGET_SPEED, KEY_PRESS_DEPTH,
};
use crate::skeleton::{Iso, Point3, Vec3};

/// Destination for a finger actively pressing a key: the key's top-center
/// pushed slightly into the cap along its normal, for press feel.
#[inline]
pub fn press_destination(key_top: Point3, key_normal: na::Unit<Vec3>) -> Point3 {
    key_top - key_normal.into_inner() * KEY_PRESS_DEPTH
}

/// Input for computing a resting finger's destination for this tick.
#[derive(Clone, Copy, Debug)]
pub struct RestParams {
    /// The owning hand's current world transform.
    pub hand_iso: Iso,
    /// The finger's fixed rest offset, in the hand's local frame.
    pub rest_offset: Vec3,
    /// Per-finger phase seed decorrelating the idle twitch across fingers.
    pub phase_seed: f32,
    /// Wall-clock time in seconds.
    pub time: f32,
}

/// Destination for a finger returning to (or holding) its rest pose.
///
/// The hand-local rest offset is reapplied through the hand's current world
/// transform, then pulled along the hand's local "down" axis so idle fingers
/// curl instead of lying flat, then given a small three-sinusoid twitch for
/// idle-breathing realism.
pub fn rest_destination(params: RestParams) -> Point3 {
    let RestParams {
        hand_iso,
        rest_offset,
        phase_seed,
        time,
    } = params;

    let rest_world = hand_iso.transform_point(&Point3::from(rest_offset));
    let curl = hand_iso.rotation * Vec3::new(0.0, -1.0, 0.0) * FINGER_REST_CURL_OFFSET;

    let twitch = Vec3::new(
        (time * IDLE_TARGET_SPEED + phase_seed).sin(),
        (time * IDLE_TARGET_SPEED * 1.2 + phase_seed * 0.5).cos(),
        (time * IDLE_TARGET_SPEED * 0.8 + phase_seed * 0.2).sin(),
    ) * IDLE_TARGET_MAGNITUDE;

    rest_world + curl + twitch
}

/// One exponential-smoothing step of a live target toward its destination.
///
/// The target is never snapped; it closes a fixed fraction of the remaining
/// gap per tick, producing continuous lag-behind motion.
#[inline]
pub fn ease_toward(current: Point3, destination: Point3, blend: f32) -> Point3 {
    current + (destination - current) * blend
}
