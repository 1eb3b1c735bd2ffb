//! The per-tick animation driver.
//!
//! [`HandsAnimator`] owns both hand skeletons, the ten-finger state
//! arena and the key assignment table. Hosts feed it key events and
//! call [`HandsAnimator::advance`] once per frame; each tick runs the
//! same fixed pipeline:
//!
//! 1. fire scheduled forced releases that have come due,
//! 2. refresh rest destinations for fingers drifting home,
//! 3. ease every live IK target toward its destination,
//! 4. reposition each hand (chase the pressing fingertips' errors,
//!    drift back to the default pose while idle),
//! 5. run the CCD solver on all ten finger chains.
//!
//! The animator assumes a single-writer model: event handlers and
//! `advance` must be serialized by the host (one event loop or one
//! queue). Handlers run to completion before the next tick reads the
//! state they touched; nothing here locks.

use log::{debug, warn};

use rig::adjust;
use rig::constants::{
    FORCED_RELEASE_DELAY, REST_HOVER_HEIGHT, REST_PULLBACK, SPACEBAR_THUMB_X_OFFSET,
    TARGET_EASE_FACTOR,
};
use rig::motion::{self, RestParams};
use rig::{Digit, Hand, Point3, Side, Vec3, build_hand, solve_ccd};

use crate::assignment::{Assignments, CandidateFinger, CrowdingSettings, select_finger};
use crate::finger::{FingerId, FingerState};
use crate::keyboard::{KeyGeometry, KeyId};

struct PendingRelease {
    due: f32,
    key: KeyId,
}

/// Animation state for a pair of typing hands over a keyboard.
pub struct HandsAnimator<G> {
    board: G,
    hands: [Hand; 2],
    fingers: [FingerState; FingerId::COUNT],
    assignments: Assignments,
    crowding: CrowdingSettings,
    pending_releases: Vec<PendingRelease>,
    /// Time of the most recent `advance`, in seconds.
    now: f32,
}

impl<G: KeyGeometry> HandsAnimator<G> {
    /// Builds both hands at their default poses and parks every finger
    /// over its home key.
    pub fn new(board: G) -> HandsAnimator<G> {
        let hands = [build_hand(Side::Left), build_hand(Side::Right)];
        let fingers = std::array::from_fn(|i| {
            let id = FingerId::from_index(i);
            let hand = &hands[id.side.index()];
            let rest_world = match board.key_top(&KeyId::from(id.home_key())) {
                Some(surface) => {
                    let mut hover =
                        surface.top + Vec3::new(0.0, REST_HOVER_HEIGHT, REST_PULLBACK);
                    if id.is_thumb() {
                        // Both thumbs share the spacebar; spread them
                        // apart so they do not stack on its center.
                        hover.x += id.side.mirror() * SPACEBAR_THUMB_X_OFFSET;
                    }
                    hover
                }
                None => {
                    warn!(
                        "home key {} missing from keyboard geometry, parking {:?} under the palm",
                        id.home_key(),
                        id
                    );
                    hand.default_iso.transform_point(&Point3::new(
                        (id.digit.index() as f32 - 2.0) * 0.35,
                        -1.2,
                        0.0,
                    ))
                }
            };
            let rest_offset = hand.default_iso.inverse_transform_point(&rest_world).coords;
            FingerState::at_rest(rest_world, rest_offset)
        });

        HandsAnimator {
            board,
            hands,
            fingers,
            assignments: Assignments::new(),
            crowding: CrowdingSettings::default(),
            pending_releases: Vec::new(),
            now: 0.0,
        }
    }

    /// Advances the whole rig to wall-clock time `now` (seconds).
    pub fn advance(&mut self, now: f32) {
        self.now = now;
        self.run_due_forced_releases();
        self.refresh_rest_destinations();
        self.ease_targets();
        self.reposition_hands();
        self.solve_fingers();
    }

    /// A key went down. Claims the best free finger for it, marks the
    /// key pressed, and schedules a forced release for keys that never
    /// report a key-up of their own.
    pub fn on_key_down(&mut self, key: &KeyId) {
        if self.assignments.finger_of(key).is_some() {
            debug!("{key} is already held, ignoring repeat key-down");
            return;
        }
        let Some(surface) = self.board.key_top(key) else {
            warn!("key-down for {key} which has no geometry, ignoring");
            return;
        };

        let candidates: Vec<CandidateFinger> = FingerId::ALL
            .iter()
            .map(|id| CandidateFinger {
                index: id.index(),
                tip: self.hands[id.side.index()].tip_world(id.digit),
                target: self.fingers[id.index()].target,
                // Dragged fingers are off-limits just like busy ones.
                assigned: !self.assignments.is_finger_free(id.index())
                    || self.fingers[id.index()].dragged,
            })
            .collect();

        match select_finger(&candidates, &surface.top, &self.crowding) {
            Some(finger) => {
                self.assignments.assign(finger, key.clone());
                let state = &mut self.fingers[finger];
                state.returning_to_rest = false;
                state.destination = motion::press_destination(surface.top, surface.normal);
                debug!("{:?} takes {key}", FingerId::from_index(finger));
            }
            None => warn!("all fingers busy, {key} goes down without one"),
        }

        self.board.set_pressed(key, true);
        if key.needs_forced_release() {
            self.pending_releases.push(PendingRelease {
                due: self.now + FORCED_RELEASE_DELAY.as_secs_f32(),
                key: key.clone(),
            });
        }
    }

    /// A key came up. Frees its finger, if one held it.
    pub fn on_key_up(&mut self, key: &KeyId) {
        self.board.set_pressed(key, false);
        match self.assignments.release_key(key) {
            Some(finger) => {
                self.fingers[finger].returning_to_rest = true;
                debug!("{:?} releases {key}", FingerId::from_index(finger));
            }
            None => warn!("key-up for {key} which no finger holds"),
        }
    }

    /// Releases `key` regardless of host events. Harmless when the key
    /// is not held.
    pub fn force_release(&mut self, key: &KeyId) {
        if let Some(finger) = self.assignments.release_key(key) {
            self.fingers[finger].returning_to_rest = true;
            debug!("forced release of {key} from {:?}", FingerId::from_index(finger));
        }
        self.board.set_pressed(key, false);
    }

    /// Hands direct control of one fingertip to the host. The planner
    /// stops touching this finger's target until the drag is released.
    pub fn on_drag_target(&mut self, finger: FingerId, point: Point3) {
        let state = &mut self.fingers[finger.index()];
        state.dragged = true;
        state.target = point;
        state.destination = point;
    }

    /// Returns a dragged finger to automatic control: back to its held
    /// key's press point, or home if it holds nothing.
    pub fn on_drag_release(&mut self, finger: FingerId) {
        let index = finger.index();
        self.fingers[index].dragged = false;
        match self.assignments.key_of(index) {
            Some(key) => {
                if let Some(surface) = self.board.key_top(key) {
                    self.fingers[index].destination =
                        motion::press_destination(surface.top, surface.normal);
                }
            }
            None => self.fingers[index].returning_to_rest = true,
        }
    }

    /// Drops every assignment, drag and pending release, and sends all
    /// ten fingers home.
    pub fn reset_all_fingers(&mut self) {
        for (_, key) in self.assignments.clear() {
            self.board.set_pressed(&key, false);
        }
        self.pending_releases.clear();
        for state in self.fingers.iter_mut() {
            state.dragged = false;
            state.returning_to_rest = true;
        }
    }

    pub fn board(&self) -> &G {
        &self.board
    }

    /// Overrides the crowding-penalty tuning for future key presses.
    pub fn set_crowding(&mut self, crowding: CrowdingSettings) {
        self.crowding = crowding;
    }

    pub fn hand(&self, side: Side) -> &Hand {
        &self.hands[side.index()]
    }

    pub fn fingertip(&self, finger: FingerId) -> Point3 {
        self.hands[finger.side.index()].tip_world(finger.digit)
    }

    pub fn target_of(&self, finger: FingerId) -> Point3 {
        self.fingers[finger.index()].target
    }

    pub fn assigned_key(&self, finger: FingerId) -> Option<&KeyId> {
        self.assignments.key_of(finger.index())
    }

    pub fn assigned_finger(&self, key: &KeyId) -> Option<FingerId> {
        self.assignments.finger_of(key).map(FingerId::from_index)
    }

    pub fn is_resting(&self, finger: FingerId) -> bool {
        self.fingers[finger.index()].returning_to_rest
    }

    fn run_due_forced_releases(&mut self) {
        let mut i = 0;
        while i < self.pending_releases.len() {
            if self.pending_releases[i].due <= self.now {
                let pending = self.pending_releases.swap_remove(i);
                self.force_release(&pending.key);
            } else {
                i += 1;
            }
        }
    }

    fn refresh_rest_destinations(&mut self) {
        for (i, state) in self.fingers.iter_mut().enumerate() {
            if state.dragged || !state.returning_to_rest {
                continue;
            }
            let id = FingerId::from_index(i);
            state.destination = motion::rest_destination(RestParams {
                hand_iso: self.hands[id.side.index()].iso,
                rest_offset: state.rest_offset,
                phase_seed: id.phase_seed(),
                time: self.now,
            });
        }
    }

    fn ease_targets(&mut self) {
        for state in self.fingers.iter_mut() {
            if state.dragged {
                continue;
            }
            state.target = motion::ease_toward(state.target, state.destination, TARGET_EASE_FACTOR);
        }
    }

    fn reposition_hands(&mut self) {
        for side in Side::ALL {
            let mut errors = Vec::new();
            let mut any_pressing = false;
            for digit in Digit::ALL {
                let id = FingerId { side, digit };
                let pressing = self.assignments.key_of(id.index()).is_some();
                any_pressing |= pressing;
                // Resting fingers ride along; their hovers move with the
                // hand, so chasing them would never converge.
                if !pressing {
                    continue;
                }
                let tip = self.hands[side.index()].tip_world(digit);
                let to_target = self.fingers[id.index()].target - tip;
                if adjust::needs_hand_help(&to_target) {
                    errors.push(to_target);
                }
            }

            let hand = &mut self.hands[side.index()];
            if any_pressing {
                if let Some(correction) = adjust::hand_correction(&errors) {
                    hand.iso.translation.vector += correction;
                }
            } else {
                let default_iso = hand.default_iso;
                adjust::ease_toward_default(&mut hand.iso, &default_iso, side, self.now);
            }
        }
    }

    fn solve_fingers(&mut self) {
        for i in 0..FingerId::COUNT {
            let id = FingerId::from_index(i);
            let target = self.fingers[i].target;
            let hand = &mut self.hands[id.side.index()];
            let hand_iso = hand.iso;
            solve_ccd(hand.chain_mut(id.digit), &hand_iso, &target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::QwertyBoard;
    use rig::constants::KEY_HEIGHT;
    use std::collections::HashSet;

    const TICK: f32 = 0.016;

    fn animator() -> HandsAnimator<QwertyBoard> {
        let mut anim = HandsAnimator::new(QwertyBoard::new());
        anim.advance(0.0);
        anim
    }

    fn run(anim: &mut HandsAnimator<QwertyBoard>, from: f32, ticks: usize) -> f32 {
        let mut t = from;
        for _ in 0..ticks {
            t += TICK;
            anim.advance(t);
        }
        t
    }

    /// An animator whose fingers have settled over their home keys, so
    /// key selection sees resting fingertips rather than the raw
    /// just-built pose.
    fn settled() -> (HandsAnimator<QwertyBoard>, f32) {
        let mut anim = animator();
        let t = run(&mut anim, 0.0, 300);
        (anim, t)
    }

    #[test]
    fn every_press_claims_a_distinct_finger() {
        let mut anim = animator();
        let keys = [
            "KeyJ", "KeyF", "KeyD", "KeyK", "KeyS", "KeyL", "KeyA", "Semicolon", "Space", "KeyG",
        ];
        let mut t = 0.0;
        for key in keys {
            anim.on_key_down(&KeyId::from(key));
            t = run(&mut anim, t, 1);
        }

        let mut seen = HashSet::new();
        for key in keys {
            let key = KeyId::from(key);
            let finger = anim.assigned_finger(&key).unwrap();
            assert!(seen.insert(finger.index()), "{key} shares a finger");
            assert_eq!(anim.assigned_key(finger), Some(&key));
        }

        // All ten fingers are busy; an eleventh key goes unanswered but
        // still renders pressed.
        anim.on_key_down(&KeyId::from("KeyH"));
        assert!(anim.assigned_finger(&KeyId::from("KeyH")).is_none());
        let h_top = anim.board().key_top(&KeyId::from("KeyH")).unwrap().top;
        assert!(h_top.y < KEY_HEIGHT);
    }

    #[test]
    fn pressed_finger_reaches_into_the_key() {
        let (mut anim, t) = settled();
        let key = KeyId::from("KeyJ");
        anim.on_key_down(&key);
        run(&mut anim, t, 600);

        let finger = anim.assigned_finger(&key).unwrap();
        // KeyJ's top center, sunk by the press depth.
        let press_point = Point3::new(0.65, 0.05, 0.02);
        let target = anim.target_of(finger);
        assert!(
            (target - press_point).norm() < 0.01,
            "target stalled at {target:?}"
        );
        let tip = anim.fingertip(finger);
        assert!(
            (tip - press_point).norm() < 0.02,
            "fingertip stalled at {tip:?}"
        );
    }

    #[test]
    fn hand_stays_anchored_through_a_press() {
        // A press must move one finger, not walk the hand away: resting
        // fingers never steer the hand, so a held key far from a rest
        // hover cannot feed the hand's own motion back into itself.
        let (mut anim, t) = settled();
        anim.on_key_down(&KeyId::from("KeyJ"));

        let default = anim.hand(Side::Left).default_iso.translation.vector;
        let mut max_displacement = 0.0_f32;
        let mut t = t;
        for _ in 0..600 {
            t += TICK;
            anim.advance(t);
            let here = anim.hand(Side::Left).iso.translation.vector;
            max_displacement = max_displacement.max((here - default).norm());
        }
        assert!(
            max_displacement < 0.05,
            "hand wandered {max_displacement} from its default pose"
        );
    }

    #[test]
    fn adjacent_press_avoids_the_busy_finger() {
        let (mut anim, t) = settled();
        let j = KeyId::from("KeyJ");
        let h = KeyId::from("KeyH");
        anim.on_key_down(&j);
        run(&mut anim, t, 30);
        anim.on_key_down(&h);

        let first = anim.assigned_finger(&j).unwrap();
        let second = anim.assigned_finger(&h).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn released_finger_drifts_home() {
        let (mut anim, t) = settled();
        let key = KeyId::from("KeyJ");
        anim.on_key_down(&key);
        let t = run(&mut anim, t, 200);
        // Once settled, the finger resting over KeyJ is the natural pick.
        let finger = anim.assigned_finger(&key).unwrap();
        assert_eq!(finger, FingerId { side: Side::Left, digit: Digit::Index });

        anim.on_key_up(&key);
        assert!(anim.is_resting(finger));
        run(&mut anim, t, 800);

        // Rest point for the left index: KeyJ's top plus the hover and
        // pull-back offsets, plus the hand-down curl.
        let rest = Point3::new(0.64, 0.07, 0.095);
        let target = anim.target_of(finger);
        assert!((target - rest).norm() < 0.05, "target settled at {target:?}");

        // With nothing held the hand has eased back to its default pose.
        let hand = anim.hand(Side::Left);
        let drift = (hand.iso.translation.vector - hand.default_iso.translation.vector).norm();
        assert!(drift < 0.03, "hand still {drift} away from default");
    }

    #[test]
    fn idle_hands_hold_their_default_pose() {
        let mut anim = animator();
        run(&mut anim, 0.0, 500);
        for side in Side::ALL {
            let hand = anim.hand(side);
            let drift = (hand.iso.translation.vector - hand.default_iso.translation.vector).norm();
            assert!(drift < 0.02, "{side:?} hand drifted {drift}");
            let turn = hand.iso.rotation.angle_to(&hand.default_iso.rotation);
            assert!(turn < 0.02, "{side:?} hand turned {turn}");
        }
    }

    #[test]
    fn caps_lock_release_is_scheduled_and_idempotent() {
        let mut anim = animator();
        let caps = KeyId::from("CapsLock");
        anim.on_key_down(&caps);
        assert!(anim.assigned_finger(&caps).is_some());

        anim.advance(0.1);
        assert!(anim.assigned_finger(&caps).is_some(), "released too early");

        anim.advance(0.2);
        assert!(anim.assigned_finger(&caps).is_none());
        let top = anim.board().key_top(&caps).unwrap().top;
        assert!((top.y - KEY_HEIGHT).abs() < 1.0e-6, "key still sunk");

        // A late host key-up and a second forced release are no-ops.
        anim.on_key_up(&caps);
        anim.force_release(&caps);
        assert!(anim.assigned_finger(&caps).is_none());
    }

    #[test]
    fn repeat_key_down_is_ignored() {
        let mut anim = animator();
        let key = KeyId::from("KeyF");
        anim.on_key_down(&key);
        let finger = anim.assigned_finger(&key).unwrap();
        anim.on_key_down(&key);
        assert_eq!(anim.assigned_finger(&key), Some(finger));
        assert_eq!(
            FingerId::ALL.iter().filter(|f| anim.assigned_key(**f).is_some()).count(),
            1
        );
    }

    #[test]
    fn unknown_key_is_ignored() {
        let mut anim = animator();
        anim.on_key_down(&KeyId::from("NoSuchKey"));
        for finger in FingerId::ALL {
            assert!(anim.assigned_key(finger).is_none());
        }
    }

    #[test]
    fn dragged_finger_is_pinned_and_skipped() {
        let mut anim = animator();
        let dragged = FingerId { side: Side::Left, digit: Digit::Index };
        let pin = Point3::new(0.2, 0.8, 0.3);
        anim.on_drag_target(dragged, pin);
        let t = run(&mut anim, 0.0, 50);
        assert_eq!(anim.target_of(dragged), pin);

        // The dragged finger cannot be claimed even for its own home key.
        anim.on_key_down(&KeyId::from("KeyJ"));
        assert_ne!(anim.assigned_finger(&KeyId::from("KeyJ")), Some(dragged));

        anim.on_drag_release(dragged);
        assert!(anim.is_resting(dragged));
        run(&mut anim, t, 50);
        assert!((anim.target_of(dragged) - pin).norm() > 0.05);
    }

    #[test]
    fn reset_clears_keys_drags_and_schedules() {
        let mut anim = animator();
        anim.on_key_down(&KeyId::from("KeyJ"));
        anim.on_key_down(&KeyId::from("CapsLock"));
        anim.on_drag_target(FingerId { side: Side::Right, digit: Digit::Index }, Point3::origin());

        anim.reset_all_fingers();
        for finger in FingerId::ALL {
            assert!(anim.assigned_key(finger).is_none());
            assert!(anim.is_resting(finger));
        }
        let j_top = anim.board().key_top(&KeyId::from("KeyJ")).unwrap().top;
        assert!((j_top.y - KEY_HEIGHT).abs() < 1.0e-6);

        // The cancelled CapsLock timer must not fire on a later tick:
        // the first press armed a release at t=0.15, reset dropped it,
        // and the re-press at t=0.1 arms a fresh one at t=0.25.
        let caps = KeyId::from("CapsLock");
        anim.on_key_down(&caps);
        anim.advance(0.1);
        anim.reset_all_fingers();
        anim.on_key_down(&caps);
        let held = anim.assigned_finger(&caps);
        assert!(held.is_some());
        anim.advance(0.2);
        assert_eq!(anim.assigned_finger(&caps), held);
        anim.advance(0.3);
        assert_eq!(anim.assigned_finger(&caps), None);
    }
}
