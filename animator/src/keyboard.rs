//! Key identifiers and the keyboard geometry seam.
//!
//! The animation core never owns the visual keyboard. It asks a
//! [`KeyGeometry`] provider where key tops are and tells it which keys
//! should render as pressed. [`QwertyBoard`] is the built-in provider: a
//! flat ANSI layout in the XZ plane used by the tests and by hosts that
//! do not bring their own scene.

use std::collections::HashMap;
use std::fmt;

use nalgebra::Unit;
use rig::constants::{
    KEYBOARD_Z_OFFSET, KEY_HEIGHT, KEY_PRESS_TRAVEL, KEY_SPACING, KEY_UNIT_DEPTH, KEY_UNIT_WIDTH,
};
use rig::{Point3, Vec3};

/// Physical key identifier in the familiar `KeyboardEvent.code` vocabulary
/// ("KeyA", "Space", "Semicolon", ...).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyId(String);

impl KeyId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Keys that never emit a key-up through normal host events and need
    /// a scheduled forced release instead.
    pub fn needs_forced_release(&self) -> bool {
        self.0 == "CapsLock"
    }
}

impl From<&str> for KeyId {
    fn from(code: &str) -> KeyId {
        KeyId(code.to_owned())
    }
}

impl From<String> for KeyId {
    fn from(code: String) -> KeyId {
        KeyId(code)
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of a key's touchable surface in world space.
#[derive(Clone, Copy, Debug)]
pub struct KeySurface {
    /// Center of the key cap's top face.
    pub top: Point3,
    /// Outward surface normal at `top`.
    pub normal: Unit<Vec3>,
}

/// Geometry seam between the animation core and whatever renders the
/// keyboard. Implementations report key tops in the shared world frame.
pub trait KeyGeometry {
    /// Surface of the key cap, reflecting its current pressed depth.
    /// `None` when the provider has no such key.
    fn key_top(&self, key: &KeyId) -> Option<KeySurface>;

    /// Visual press state. Unknown keys are ignored.
    fn set_pressed(&mut self, key: &KeyId, pressed: bool);
}

struct KeyPlacement {
    x: f32,
    z: f32,
    pressed: bool,
}

/// Flat ANSI QWERTY board lying in the XZ plane. Key tops sit at
/// `KEY_HEIGHT` and sink by `KEY_PRESS_TRAVEL` while pressed; normals
/// all point up.
pub struct QwertyBoard {
    keys: HashMap<KeyId, KeyPlacement>,
}

/// Rows from the digit row at the back to the spacebar at the front,
/// each as `(code, width in key units)`.
const LAYOUT: &[&[(&str, f32)]] = &[
    &[
        ("Backquote", 1.0),
        ("Digit1", 1.0),
        ("Digit2", 1.0),
        ("Digit3", 1.0),
        ("Digit4", 1.0),
        ("Digit5", 1.0),
        ("Digit6", 1.0),
        ("Digit7", 1.0),
        ("Digit8", 1.0),
        ("Digit9", 1.0),
        ("Digit0", 1.0),
        ("Minus", 1.0),
        ("Equal", 1.0),
        ("Backspace", 1.0),
    ],
    &[
        ("Tab", 1.0),
        ("KeyQ", 1.0),
        ("KeyW", 1.0),
        ("KeyE", 1.0),
        ("KeyR", 1.0),
        ("KeyT", 1.0),
        ("KeyY", 1.0),
        ("KeyU", 1.0),
        ("KeyI", 1.0),
        ("KeyO", 1.0),
        ("KeyP", 1.0),
        ("BracketLeft", 1.0),
        ("BracketRight", 1.0),
        ("Backslash", 1.0),
    ],
    &[
        ("CapsLock", 1.0),
        ("KeyA", 1.0),
        ("KeyS", 1.0),
        ("KeyD", 1.0),
        ("KeyF", 1.0),
        ("KeyG", 1.0),
        ("KeyH", 1.0),
        ("KeyJ", 1.0),
        ("KeyK", 1.0),
        ("KeyL", 1.0),
        ("Semicolon", 1.0),
        ("Quote", 1.0),
        ("Enter", 1.0),
    ],
    &[
        ("ShiftLeft", 1.0),
        ("KeyZ", 1.0),
        ("KeyX", 1.0),
        ("KeyC", 1.0),
        ("KeyV", 1.0),
        ("KeyB", 1.0),
        ("KeyN", 1.0),
        ("KeyM", 1.0),
        ("Comma", 1.0),
        ("Period", 1.0),
        ("Slash", 1.0),
        ("ShiftRight", 1.0),
    ],
    &[("Space", 6.25)],
];

/// Rightward shift of each row in key widths, as on a physical ANSI board
/// where each letter row sits a quarter key further right than the one
/// behind it. The spacebar row stays centered.
const ROW_STAGGER: [f32; 5] = [0.0, 0.25, 0.5, 0.75, 0.0];

impl QwertyBoard {
    pub fn new() -> QwertyBoard {
        let mut keys = HashMap::new();
        for (row_index, row) in LAYOUT.iter().enumerate() {
            let z = KEYBOARD_Z_OFFSET + row_index as f32 * (KEY_UNIT_DEPTH + KEY_SPACING);
            let row_width: f32 = row.iter().map(|(_, size)| size * KEY_UNIT_WIDTH).sum::<f32>()
                + (row.len().saturating_sub(1)) as f32 * KEY_SPACING;
            // Single-key rows (the spacebar) self-center; everything else
            // carries the physical stagger.
            let stagger = if row.len() == 1 {
                0.0
            } else {
                ROW_STAGGER[row_index] * KEY_UNIT_WIDTH
            };
            let mut cursor = -row_width / 2.0 + stagger;
            for (code, size) in row.iter() {
                let width = size * KEY_UNIT_WIDTH;
                keys.insert(
                    KeyId::from(*code),
                    KeyPlacement { x: cursor + width / 2.0, z, pressed: false },
                );
                cursor += width + KEY_SPACING;
            }
        }
        QwertyBoard { keys }
    }
}

impl Default for QwertyBoard {
    fn default() -> QwertyBoard {
        QwertyBoard::new()
    }
}

impl KeyGeometry for QwertyBoard {
    fn key_top(&self, key: &KeyId) -> Option<KeySurface> {
        let placement = self.keys.get(key)?;
        let y = if placement.pressed { KEY_HEIGHT - KEY_PRESS_TRAVEL } else { KEY_HEIGHT };
        Some(KeySurface {
            top: Point3::new(placement.x, y, placement.z),
            normal: Vec3::y_axis(),
        })
    }

    fn set_pressed(&mut self, key: &KeyId, pressed: bool) {
        if let Some(placement) = self.keys.get_mut(key) {
            placement.pressed = pressed;
        }
    }
}
