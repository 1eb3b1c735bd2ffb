/*!
Tuning constants for the hand rig, the CCD solver, and the per-tick motion
planning.

These centralize the parameters used by the solver, the target easing, the
idle animation, and the whole-hand repositioning. Keeping them together makes
tuning easier and helps ensure deterministic behavior across platforms.

Notes
- Distances are in world units (one standard keycap is 0.4 wide), angles in
  radians, time in seconds.
- Most values were tuned by eye against the rendered hands; treat them as
  sensible defaults, not derived quantities.
*/

use std::f32::consts::PI;
use std::time::Duration;

/// Maximum CCD sweeps over a finger chain per tick.
/// Chains are short (3-4 joints), so this caps worst-case work tightly.
pub const CCD_ITERATIONS: u32 = 10;

/// Fingertip-to-target distance below which a solve is considered converged.
pub const CCD_THRESHOLD: f32 = 0.01;

/// Fraction of each corrective joint rotation actually applied (slerp factor).
///
/// 1.0 applies the full correction per sweep (fast, visually snappy);
/// smaller values need more sweeps but move smoothly. 0.1 .. 1.0.
pub const CCD_SMOOTHING_FACTOR: f32 = 0.1;

/// Corrective rotations below this angle are skipped entirely.
/// Avoids numerical jitter from near-zero axis/angle extraction.
pub const CCD_MIN_STEP_ANGLE: f32 = 0.001;

/// Per-tick blend factor easing a live IK target toward its destination.
/// The target never snaps; it exponentially lags behind the destination.
pub const TARGET_EASE_FACTOR: f32 = 0.35;

/// Amplitude of the idle fingertip-destination twitch (world units).
pub const IDLE_TARGET_MAGNITUDE: f32 = 0.008;

/// Angular speed of the idle fingertip-destination twitch (rad/s base rate).
pub const IDLE_TARGET_SPEED: f32 = 0.02;

/// Amplitude of the idle palm position sway (world units).
pub const IDLE_PALM_MAGNITUDE_POS: f32 = 0.002;

/// Amplitude of the idle palm rotation sway (radians).
pub const IDLE_PALM_MAGNITUDE_ROT: f32 = 0.001;

/// Angular speed of the idle palm sway (rad/s base rate).
pub const IDLE_PALM_SPEED: f32 = 0.01;

/// Squared distance under which two IK targets count as crowded (0.3^2).
pub const CROWDING_PENALTY_DISTANCE_SQ: f32 = 0.09;

/// Multiplier applied to a candidate finger's effective squared distance when
/// its target crowds an already-assigned finger's target.
pub const CROWDING_PENALTY_FACTOR: f32 = 2.0;

/// Fingertip-to-target distance beyond which a finger asks the whole hand
/// to translate toward its target.
pub const HAND_ADJUSTMENT_THRESHOLD: f32 = 0.15;

/// Fraction of the averaged fingertip discrepancy applied to the hand.
pub const HAND_ADJUSTMENT_FACTOR: f32 = 0.5;

/// Cap on hand translation per tick, for both target-chasing and the return
/// to the default pose (world units).
pub const MAX_HAND_ADJUSTMENT_PER_TICK: f32 = 0.035;

/// Easing factor pulling an idle hand back toward its stored default pose.
pub const HAND_RETURN_TO_DEFAULT_FACTOR: f32 = 0.03;

/// How far resting fingertip destinations are pulled along the hand's local
/// "down" axis, so idle fingers curl instead of lying flat.
pub const FINGER_REST_CURL_OFFSET: f32 = 0.15;

/// How deep a pressing fingertip sinks into a key along the key normal.
pub const KEY_PRESS_DEPTH: f32 = 0.05;

/// Rest destinations hover this far above the home key's top surface.
pub const REST_HOVER_HEIGHT: f32 = 0.1;

/// Rest destinations sit this far toward the typist (+Z) of the home key.
pub const REST_PULLBACK: f32 = 0.15;

// --- Skeleton dimensions ---

/// Length of one phalanx bone before per-finger scaling.
pub const PHALANX_LENGTH: f32 = 0.5;

/// Length of the metacarpal bone before per-finger scaling.
pub const METACARPAL_LENGTH: f32 = 0.8;

pub const PALM_WIDTH: f32 = 1.5;
pub const PALM_HEIGHT: f32 = 0.2;
pub const PALM_DEPTH: f32 = 1.2;

/// Thumb mounts sit this fraction of the palm depth ahead of the other
/// knuckles along the finger direction.
pub const THUMB_FORWARD_FACTOR: f32 = 0.3;

/// Initial twist of the thumb knuckle about its bone axis.
pub const THUMB_BASE_TWIST: f32 = PI / 6.0;

/// Initial sideways tilt of the thumb knuckle toward the palm center;
/// the sign mirrors per hand.
pub const THUMB_BASE_TILT: f32 = PI / 4.0;

// --- Keyboard geometry ---

/// Width of a 1x keycap.
pub const KEY_UNIT_WIDTH: f32 = 0.4;

/// Depth (front to back) of a standard keycap.
pub const KEY_UNIT_DEPTH: f32 = KEY_UNIT_WIDTH * 0.9;

/// Keycap thickness; unpressed key tops sit at this height above the board.
pub const KEY_HEIGHT: f32 = 0.1;

/// Gap between adjacent keycap edges, both across and between rows.
pub const KEY_SPACING: f32 = 0.05;

/// How far a keycap sinks while pressed.
pub const KEY_PRESS_TRAVEL: f32 = 0.05;

/// Z of the back row's key centers; rows advance toward the typist (+Z).
pub const KEYBOARD_Z_OFFSET: f32 = -0.8;

/// Thumb rest points sit this far to either side of the spacebar's center.
pub const SPACEBAR_THUMB_X_OFFSET: f32 = KEY_UNIT_WIDTH * 1.2;

// --- Timing ---

/// Delay before a held modifier key (CapsLock) force-releases its finger.
///
/// Platforms suppress auto-repeat for lock keys, so the matching key-up may
/// never arrive; this timer is a best-effort safety net, not a guarantee.
pub const FORCED_RELEASE_DELAY: Duration = Duration::from_millis(150);
