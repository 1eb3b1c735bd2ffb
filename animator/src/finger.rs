//! Finger identities and per-finger animation state.

use rig::{Digit, Point3, Side, Vec3};

/// One of the ten fingers, addressed by hand side and digit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FingerId {
    pub side: Side,
    pub digit: Digit,
}

impl FingerId {
    pub const COUNT: usize = 10;

    pub const ALL: [FingerId; Self::COUNT] = {
        let mut out = [FingerId { side: Side::Left, digit: Digit::Thumb }; Self::COUNT];
        let mut i = 0;
        while i < Self::COUNT {
            out[i] = FingerId {
                side: if i < 5 { Side::Left } else { Side::Right },
                digit: Digit::ALL[i % 5],
            };
            i += 1;
        }
        out
    };

    /// Dense index into the finger arena: left hand 0..5, right hand 5..10.
    pub fn index(self) -> usize {
        self.side.index() * 5 + self.digit.index()
    }

    pub fn from_index(index: usize) -> FingerId {
        Self::ALL[index]
    }

    pub fn is_thumb(self) -> bool {
        self.digit.is_thumb()
    }

    /// Home-row key this finger hovers over while resting. Both thumbs
    /// share the spacebar and are spread apart along it.
    pub fn home_key(self) -> &'static str {
        match (self.side, self.digit) {
            (_, Digit::Thumb) => "Space",
            (Side::Left, Digit::Index) => "KeyJ",
            (Side::Left, Digit::Middle) => "KeyK",
            (Side::Left, Digit::Ring) => "KeyL",
            (Side::Left, Digit::Pinky) => "Semicolon",
            (Side::Right, Digit::Index) => "KeyF",
            (Side::Right, Digit::Middle) => "KeyD",
            (Side::Right, Digit::Ring) => "KeyS",
            (Side::Right, Digit::Pinky) => "KeyA",
        }
    }

    /// Phase offset fed into the idle twitch so fingers drift out of sync.
    pub fn phase_seed(self) -> f32 {
        4.0 + self.index() as f32
    }
}

/// Motion state for a single finger. Key assignments live in
/// [`crate::assignment::Assignments`], not here.
#[derive(Clone, Debug)]
pub struct FingerState {
    /// Point the IK solver chases this tick. Eases toward `destination`.
    pub target: Point3,
    /// Where the planner currently wants the fingertip.
    pub destination: Point3,
    /// Resting hover point expressed in the hand's default local frame.
    pub rest_offset: Vec3,
    /// Set on key release; cleared when the finger claims a new key.
    pub returning_to_rest: bool,
    /// While dragged the planner leaves `target` entirely to the host.
    pub dragged: bool,
}

impl FingerState {
    pub fn at_rest(rest_world: Point3, rest_offset: Vec3) -> FingerState {
        FingerState {
            target: rest_world,
            destination: rest_world,
            rest_offset,
            returning_to_rest: true,
            dragged: false,
        }
    }
}
