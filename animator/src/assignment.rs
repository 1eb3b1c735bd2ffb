//! Finger-to-key assignment: the bijection table and the selection rule
//! that picks which free finger travels to a newly pressed key.

use std::collections::HashMap;

use rig::Point3;
use rig::constants::{CROWDING_PENALTY_DISTANCE_SQ, CROWDING_PENALTY_FACTOR};

use crate::finger::FingerId;
use crate::keyboard::KeyId;

/// Two-way map between held keys and the fingers holding them. A finger
/// holds at most one key and a key is held by at most one finger; every
/// mutation goes through this table so the two directions cannot drift.
#[derive(Default)]
pub struct Assignments {
    by_finger: [Option<KeyId>; FingerId::COUNT],
    by_key: HashMap<KeyId, usize>,
}

impl Assignments {
    pub fn new() -> Assignments {
        Assignments::default()
    }

    pub fn key_of(&self, finger: usize) -> Option<&KeyId> {
        self.by_finger[finger].as_ref()
    }

    pub fn finger_of(&self, key: &KeyId) -> Option<usize> {
        self.by_key.get(key).copied()
    }

    pub fn is_finger_free(&self, finger: usize) -> bool {
        self.by_finger[finger].is_none()
    }

    /// Binds a free finger to an unheld key. Both sides must be free;
    /// callers check `finger_of` before selecting a finger.
    pub fn assign(&mut self, finger: usize, key: KeyId) {
        debug_assert!(self.by_finger[finger].is_none());
        debug_assert!(!self.by_key.contains_key(&key));
        self.by_key.insert(key.clone(), finger);
        self.by_finger[finger] = Some(key);
    }

    /// Unbinds whichever finger holds `key`, returning it. `None` when
    /// the key was not held, which callers treat as a no-op.
    pub fn release_key(&mut self, key: &KeyId) -> Option<usize> {
        let finger = self.by_key.remove(key)?;
        self.by_finger[finger] = None;
        Some(finger)
    }

    /// Drops every binding, returning the pairs that were live.
    pub fn clear(&mut self) -> Vec<(usize, KeyId)> {
        let released: Vec<(usize, KeyId)> = self.by_key.drain().map(|(k, f)| (f, k)).collect();
        self.by_finger = Default::default();
        released
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &KeyId)> {
        self.by_finger
            .iter()
            .enumerate()
            .filter_map(|(f, k)| k.as_ref().map(|k| (f, k)))
    }
}

/// Crowding-penalty tuning. The defaults are empirically tuned rather
/// than derived, so hosts may override them per animator.
#[derive(Clone, Copy, Debug)]
pub struct CrowdingSettings {
    /// Squared target-to-target distance under which two fingers crowd.
    pub distance_sq: f32,
    /// Multiplier applied to a crowded candidate's squared distance.
    pub factor: f32,
}

impl Default for CrowdingSettings {
    fn default() -> CrowdingSettings {
        CrowdingSettings {
            distance_sq: CROWDING_PENALTY_DISTANCE_SQ,
            factor: CROWDING_PENALTY_FACTOR,
        }
    }
}

/// Per-finger snapshot fed into [`select_finger`].
#[derive(Clone, Copy, Debug)]
pub struct CandidateFinger {
    /// Arena index of the finger.
    pub index: usize,
    /// Current fingertip position.
    pub tip: Point3,
    /// Point the finger's IK is chasing right now.
    pub target: Point3,
    /// Whether the finger already holds a key.
    pub assigned: bool,
}

/// Picks the free finger whose tip is closest to `key_top`, penalising
/// candidates whose current target sits inside the crowding radius of a
/// busy finger's target. The penalty steers presses away from keys
/// adjacent to held ones without forbidding them outright.
pub fn select_finger(
    candidates: &[CandidateFinger],
    key_top: &Point3,
    crowding: &CrowdingSettings,
) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for candidate in candidates.iter().filter(|c| !c.assigned) {
        let mut score = (candidate.tip - key_top).norm_squared();
        let crowded = candidates.iter().any(|other| {
            other.assigned
                && (other.target - candidate.target).norm_squared() < crowding.distance_sq
        });
        if crowded {
            score *= crowding.factor;
        }
        if best.is_none_or(|(_, best_score)| score < best_score) {
            best = Some((candidate.index, score));
        }
    }
    best.map(|(index, _)| index)
}
