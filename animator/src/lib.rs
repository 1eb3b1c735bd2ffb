//! Typing-hands animation: key events in, posed skeletons out.
//!
//! This crate drives the skeletal rig from `rig`. It decides which
//! finger answers each key press, plans fingertip destinations (press
//! points, rest hovers, idle twitch), and steps the whole system once
//! per frame. Rendering and input capture stay on the host's side of
//! the [`keyboard::KeyGeometry`] seam.

pub mod assignment;
pub mod engine;
pub mod finger;
pub mod keyboard;

pub use assignment::CrowdingSettings;
pub use engine::HandsAnimator;
pub use finger::{FingerId, FingerState};
pub use keyboard::{KeyGeometry, KeyId, KeySurface, QwertyBoard};
