/*!
Pure kinematics for a pair of animated typing hands.

This crate holds the math with no I/O and no host integration:

- `skeleton`: the static hand rig (joints, chains, rotation limits) and its
  deterministic forward kinematics
- `solver`: the damped, limit-aware CCD inverse-kinematics solver
- `motion`: per-tick destination math for press, rest, and easing
- `adjust`: whole-hand repositioning and idle-sway math
- `constants`: every tuning value, in one place

The stateful orchestration (input events, finger assignment, the per-tick
driver) lives in the `animator` crate.
*/

pub mod adjust;
pub mod constants;
pub mod motion;
pub mod skeleton;
pub mod solver;

pub use skeleton::{
    AxisRange, Digit, FingerChain, Hand, Iso, Joint, JointLimits, Point3, Quat, Side, Vec3,
    build_hand,
};
pub use solver::{CcdOutcome, solve_ccd};
