/*!
Skeleton root module.

This module re-exports the submodules that describe the static hand rig and
its kinematic state. The code is split for clarity:

- joint: an oriented pivot in a chain, with optional per-axis rotation limits
- chain: an ordered joint sequence from fingertip back to palm, plus forward
  kinematics
- hand:  a rigid transform parenting five chains, with the static per-finger
  configuration table and the builders for both hands
*/

use nalgebra as na;

pub mod chain;
pub mod hand;
pub mod joint;

// Re-export commonly used types and functions.
pub use chain::FingerChain;
pub use hand::{Digit, FingerSpec, Hand, Side, build_hand, finger_spec};
pub use joint::{AxisRange, Joint, JointLimits};

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Point3 = na::Point3<f32>;
pub type Quat = na::UnitQuaternion<f32>;
pub type Iso = na::Isometry3<f32>;
