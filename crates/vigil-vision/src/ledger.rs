//! Per-target detection confidence: accrual, decay, and the one-shot
//! seen-transition.
//!
//! The ledger owns one [`DetectionEntry`] per target currently being
//! tracked. Entries are created lazily on a target's first visible tick,
//! updated every tick the target stays eligible, and removed when their
//! progress decays to zero or the target leaves eligibility entirely.
//!
//! # State rules
//!
//! Progressive policy:
//! - visible, not committed: progress accrues by `1 / (dwell * tick_rate)`
//!   and commitment fires exactly once when it reaches 1.0;
//! - visible, committed: progress holds at 1.0 -- detection, once
//!   confirmed, never regresses while the target stays in sight;
//! - not visible: progress decays by `decay_per_second / tick_rate`. The
//!   committed flag rides the entry down and is only cleared by the entry
//!   being removed at zero, so a brief blink does not re-fire the
//!   transition; a re-sighting before full decay snaps progress back to
//!   1.0 silently.
//!
//! Immediate policy: progress mirrors visibility exactly. The first
//! visible tick after a non-visible tick fires; the first non-visible tick
//! clears the entry with no decay.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;
use vigil_types::TargetId;

use crate::config::{MIN_DETECT_SECONDS, StancePolicy};
use crate::geometry::ContainmentSample;

/// Guard against division by a degenerate radius.
const RADIUS_FLOOR: f64 = 1e-4;

/// Summing `1 / (dwell * rate)` per tick accumulates rounding error, so
/// after the nominal number of ticks progress can land a hair under 1.0.
/// Anything within this of full counts as full, keeping commit timing at
/// the tick count the dwell time names.
const PROGRESS_EPSILON: f64 = 1e-9;

/// Accrued detection state for one (perceiver, target) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DetectionEntry {
    /// Accrued confidence in `[0, 1]`.
    pub progress: f64,
    /// True once progress reached 1.0 and the seen-transition fired for
    /// the current visibility episode. On visible ticks this implies
    /// `progress == 1.0`.
    pub committed: bool,
    /// Whether the last visible update used the immediate policy. Decides
    /// how the entry is torn down when its target disappears without a
    /// stance to consult.
    pub immediate: bool,
}

/// The outcome of observing one target for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObservationResult {
    /// The seen-transition fired this tick (at most once per episode).
    pub fired: bool,
    /// The target is committed (fully detected) after this update.
    pub committed: bool,
    /// The update mutated ledger state.
    pub changed: bool,
}

/// Per-target detection state for a single perceiver.
///
/// One ledger per perception activity; no state is shared across
/// perceivers.
#[derive(Debug, Clone, Default)]
pub struct DetectionLedger {
    entries: BTreeMap<TargetId, DetectionEntry>,
}

impl DetectionLedger {
    /// Create an empty ledger.
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Observe a target that is visible this tick.
    ///
    /// `sample` must be the containment sample that established visibility
    /// (its distance and centrality drive the dwell-time derivation).
    pub fn observe_visible(
        &mut self,
        id: TargetId,
        policy: StancePolicy,
        sample: ContainmentSample,
        radius: f64,
        tick_rate: u32,
    ) -> ObservationResult {
        let entry = self.entries.entry(id).or_default();

        match policy {
            StancePolicy::Immediate => {
                let fired = !entry.committed;
                let changed = fired || (entry.progress - 1.0).abs() > f64::EPSILON;
                entry.progress = 1.0;
                entry.committed = true;
                entry.immediate = true;
                if fired {
                    debug!(target_id = %id, "immediate detection");
                }
                ObservationResult {
                    fired,
                    committed: true,
                    changed,
                }
            }
            StancePolicy::Progressive {
                min_seconds,
                max_seconds,
            } => {
                entry.immediate = false;
                if entry.committed {
                    // Re-sighted while still committed (possibly after a
                    // partial decay): restore full confidence, never
                    // re-fire within the same episode.
                    let changed = (entry.progress - 1.0).abs() > f64::EPSILON;
                    entry.progress = 1.0;
                    return ObservationResult {
                        fired: false,
                        committed: true,
                        changed,
                    };
                }

                let dwell = dwell_seconds(
                    min_seconds,
                    max_seconds,
                    sample.distance,
                    radius,
                    sample.center_factor,
                );
                let rate = f64::from(tick_rate.max(1));
                let increment = 1.0 / (dwell * rate);
                let next = (entry.progress + increment).min(1.0);
                let fired = next >= 1.0 - PROGRESS_EPSILON;
                let changed = (next - entry.progress).abs() > f64::EPSILON || fired;

                entry.progress = next;
                if fired {
                    entry.committed = true;
                    entry.progress = 1.0;
                    debug!(target_id = %id, dwell_seconds = dwell, "detection committed");
                }

                ObservationResult {
                    fired,
                    committed: entry.committed,
                    changed,
                }
            }
        }
    }

    /// Observe a target that is eligible but not visible this tick.
    pub fn observe_hidden(
        &mut self,
        id: TargetId,
        policy: StancePolicy,
        decay_per_second: f64,
        tick_rate: u32,
    ) -> ObservationResult {
        if policy.is_immediate() {
            let changed = self.entries.remove(&id).is_some();
            return ObservationResult {
                fired: false,
                committed: false,
                changed,
            };
        }

        let Some(entry) = self.entries.get_mut(&id) else {
            return ObservationResult::default();
        };

        let decrement = decay_per_second / f64::from(tick_rate.max(1));
        let next = (entry.progress - decrement).max(0.0);

        if next <= 0.0 {
            debug!(target_id = %id, "detection fully decayed");
            self.entries.remove(&id);
            return ObservationResult {
                fired: false,
                committed: false,
                changed: true,
            };
        }

        let changed = (next - entry.progress).abs() > f64::EPSILON;
        entry.progress = next;
        ObservationResult {
            fired: false,
            committed: entry.committed,
            changed,
        }
    }

    /// Apply an implicit not-visible tick to every tracked target that is
    /// no longer in the eligible set (despawned, out of range). Returns
    /// whether any state changed.
    ///
    /// Immediate-policy entries are dropped outright; progressive entries
    /// decay until they reach zero and are removed.
    pub fn decay_missing(
        &mut self,
        eligible: &BTreeSet<TargetId>,
        decay_per_second: f64,
        tick_rate: u32,
    ) -> bool {
        let missing: Vec<TargetId> = self
            .entries
            .keys()
            .filter(|id| !eligible.contains(id))
            .copied()
            .collect();

        let mut changed = false;
        for id in missing {
            let policy = if self.entries.get(&id).is_some_and(|e| e.immediate) {
                StancePolicy::Immediate
            } else {
                // The timing bounds are irrelevant for a hidden tick.
                StancePolicy::progressive(MIN_DETECT_SECONDS, MIN_DETECT_SECONDS)
            };
            if self
                .observe_hidden(id, policy, decay_per_second, tick_rate)
                .changed
            {
                changed = true;
            }
        }
        changed
    }

    /// Current progress for a target, 0.0 when untracked.
    pub fn progress(&self, id: TargetId) -> f64 {
        self.entries.get(&id).map_or(0.0, |e| e.progress)
    }

    /// Whether a target is currently committed (fully detected).
    pub fn is_committed(&self, id: TargetId) -> bool {
        self.entries.get(&id).is_some_and(|e| e.committed)
    }

    /// Whether any tracked target is currently committed.
    pub fn any_committed(&self) -> bool {
        self.entries.values().any(|e| e.committed)
    }

    /// Number of tracked targets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no targets are tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all tracked state. Called on activity disposal.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Seconds of continuous sight needed to commit a detection.
///
/// `min_seconds` applies at point-blank range, `max_seconds` at the edge
/// of the radius, interpolated linearly by distance. Centrality then
/// shortens the dwell by up to 50%: a dead-center target
/// (`center_factor == 1`) is detected in half the base time.
pub fn dwell_seconds(
    min_seconds: f64,
    max_seconds: f64,
    distance: f64,
    radius: f64,
    center_factor: f64,
) -> f64 {
    let min_base = min_seconds.max(MIN_DETECT_SECONDS);
    let max_base = max_seconds.max(min_base);

    let dist_factor = (distance / radius.max(RADIUS_FLOOR)).clamp(0.0, 1.0);
    let base = min_base + (max_base - min_base) * dist_factor;

    let angle_multiplier = (1.0 - 0.5 * center_factor).clamp(0.5, 1.0);
    base * angle_multiplier
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TICK_RATE: u32 = 20;
    const RADIUS: f64 = 5.0;

    fn walk_policy() -> StancePolicy {
        StancePolicy::progressive(0.3, 1.5)
    }

    fn point_blank() -> ContainmentSample {
        ContainmentSample {
            inside: true,
            distance: 0.0,
            center_factor: 1.0,
        }
    }

    fn far_edge() -> ContainmentSample {
        ContainmentSample {
            inside: true,
            distance: RADIUS,
            center_factor: 0.0,
        }
    }

    #[test]
    fn dwell_rewards_proximity_and_centrality() {
        // Point-blank, dead-center: 0.3 * 0.5 = 0.15 s.
        let t = dwell_seconds(0.3, 1.5, 0.0, RADIUS, 1.0);
        assert!((t - 0.15).abs() < 1e-9);

        // Max distance, edge of view: full 1.5 s.
        let t = dwell_seconds(0.3, 1.5, RADIUS, RADIUS, 0.0);
        assert!((t - 1.5).abs() < 1e-9);

        // Bounds are floored.
        let t = dwell_seconds(0.0, 0.0, 0.0, RADIUS, 0.0);
        assert!((t - MIN_DETECT_SECONDS).abs() < 1e-9);
    }

    #[test]
    fn point_blank_walk_commits_within_three_ticks() {
        let mut ledger = DetectionLedger::new();
        let id = TargetId::new();

        let r1 = ledger.observe_visible(id, walk_policy(), point_blank(), RADIUS, TICK_RATE);
        assert!(!r1.fired);
        let r2 = ledger.observe_visible(id, walk_policy(), point_blank(), RADIUS, TICK_RATE);
        assert!(!r2.fired);
        let r3 = ledger.observe_visible(id, walk_policy(), point_blank(), RADIUS, TICK_RATE);
        assert!(r3.fired);
        assert!(r3.committed);
        assert!((ledger.progress(id) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn commit_lands_on_the_nominal_tick_despite_rounding() {
        // Crouch bounds, point-blank: dwell 0.3 s at 20 tps is 6 ticks.
        // The per-tick increment is inexact in binary, so the naive sum
        // lands just under 1.0 on tick 6.
        let crouch = StancePolicy::progressive(0.6, 2.5);
        let mut ledger = DetectionLedger::new();
        let id = TargetId::new();
        for _ in 0..5 {
            let r = ledger.observe_visible(id, crouch, point_blank(), RADIUS, TICK_RATE);
            assert!(!r.fired);
        }
        let r = ledger.observe_visible(id, crouch, point_blank(), RADIUS, TICK_RATE);
        assert!(r.fired);

        // Walk bounds at the far edge: dwell 1.5 s is 30 ticks, with a
        // 1/30 increment that is also inexact.
        let mut ledger = DetectionLedger::new();
        let id = TargetId::new();
        let mut ticks = 0_u32;
        loop {
            ticks = ticks.saturating_add(1);
            if ledger
                .observe_visible(id, walk_policy(), far_edge(), RADIUS, TICK_RATE)
                .fired
            {
                break;
            }
            assert!(ticks < 100, "never committed");
        }
        assert_eq!(ticks, 30);
    }

    #[test]
    fn progress_stays_within_bounds() {
        let mut ledger = DetectionLedger::new();
        let id = TargetId::new();

        for _ in 0..100 {
            ledger.observe_visible(id, walk_policy(), point_blank(), RADIUS, TICK_RATE);
            let p = ledger.progress(id);
            assert!((0.0..=1.0).contains(&p));
        }
        for _ in 0..100 {
            ledger.observe_hidden(id, walk_policy(), 1.2, TICK_RATE);
            let p = ledger.progress(id);
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn accrual_is_monotone_while_visible() {
        let mut ledger = DetectionLedger::new();
        let id = TargetId::new();
        let mut last = 0.0;
        for _ in 0..40 {
            ledger.observe_visible(id, walk_policy(), far_edge(), RADIUS, TICK_RATE);
            let p = ledger.progress(id);
            assert!(p >= last);
            last = p;
        }
    }

    #[test]
    fn decay_is_monotone_while_hidden() {
        let mut ledger = DetectionLedger::new();
        let id = TargetId::new();
        for _ in 0..5 {
            ledger.observe_visible(id, walk_policy(), far_edge(), RADIUS, TICK_RATE);
        }
        let mut last = ledger.progress(id);
        for _ in 0..10 {
            ledger.observe_hidden(id, walk_policy(), 0.5, TICK_RATE);
            let p = ledger.progress(id);
            assert!(p <= last);
            last = p;
        }
    }

    #[test]
    fn seen_transition_fires_exactly_once_per_episode() {
        let mut ledger = DetectionLedger::new();
        let id = TargetId::new();

        let mut fires = 0_u32;
        for _ in 0..50 {
            if ledger
                .observe_visible(id, walk_policy(), point_blank(), RADIUS, TICK_RATE)
                .fired
            {
                fires = fires.saturating_add(1);
            }
        }
        assert_eq!(fires, 1);
    }

    #[test]
    fn brief_blink_does_not_refire() {
        let mut ledger = DetectionLedger::new();
        let id = TargetId::new();

        for _ in 0..3 {
            ledger.observe_visible(id, walk_policy(), point_blank(), RADIUS, TICK_RATE);
        }
        assert!(ledger.is_committed(id));

        // One hidden tick decays progress below 1 but keeps commitment.
        ledger.observe_hidden(id, walk_policy(), 1.2, TICK_RATE);
        assert!(ledger.is_committed(id));
        assert!(ledger.progress(id) < 1.0);

        // Re-sighting restores progress without firing again.
        let r = ledger.observe_visible(id, walk_policy(), point_blank(), RADIUS, TICK_RATE);
        assert!(!r.fired);
        assert!((ledger.progress(id) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn full_decay_resets_and_refires_on_reacquisition() {
        let mut ledger = DetectionLedger::new();
        let id = TargetId::new();

        for _ in 0..3 {
            ledger.observe_visible(id, walk_policy(), point_blank(), RADIUS, TICK_RATE);
        }
        assert!(ledger.is_committed(id));

        // Decay all the way to zero: the entry is removed.
        for _ in 0..100 {
            ledger.observe_hidden(id, walk_policy(), 1.2, TICK_RATE);
        }
        assert!(ledger.is_empty());
        assert!(!ledger.is_committed(id));

        // Re-accrual starts from zero and fires again.
        let r1 = ledger.observe_visible(id, walk_policy(), point_blank(), RADIUS, TICK_RATE);
        assert!(!r1.fired);
        assert!(ledger.progress(id) < 0.5);
        ledger.observe_visible(id, walk_policy(), point_blank(), RADIUS, TICK_RATE);
        let r3 = ledger.observe_visible(id, walk_policy(), point_blank(), RADIUS, TICK_RATE);
        assert!(r3.fired);
    }

    #[test]
    fn immediate_mode_mirrors_visibility() {
        let mut ledger = DetectionLedger::new();
        let id = TargetId::new();

        let r = ledger.observe_visible(id, StancePolicy::Immediate, point_blank(), RADIUS, TICK_RATE);
        assert!(r.fired);
        assert!(r.committed);
        assert!((ledger.progress(id) - 1.0).abs() < f64::EPSILON);

        // Still visible: no second fire.
        let r = ledger.observe_visible(id, StancePolicy::Immediate, point_blank(), RADIUS, TICK_RATE);
        assert!(!r.fired);
        assert!(r.committed);

        // First hidden tick clears everything, no decay.
        let r = ledger.observe_hidden(id, StancePolicy::Immediate, 1.2, TICK_RATE);
        assert!(r.changed);
        assert!(ledger.is_empty());

        // Visible again: a fresh episode fires again.
        let r = ledger.observe_visible(id, StancePolicy::Immediate, point_blank(), RADIUS, TICK_RATE);
        assert!(r.fired);
    }

    #[test]
    fn zero_decay_preserves_progress_forever() {
        let mut ledger = DetectionLedger::new();
        let id = TargetId::new();
        ledger.observe_visible(id, walk_policy(), far_edge(), RADIUS, TICK_RATE);
        let before = ledger.progress(id);
        for _ in 0..50 {
            let r = ledger.observe_hidden(id, walk_policy(), 0.0, TICK_RATE);
            assert!(!r.changed);
        }
        assert!((ledger.progress(id) - before).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_targets_decay_out_of_the_ledger() {
        let mut ledger = DetectionLedger::new();
        let gone = TargetId::new();
        let present = TargetId::new();

        for _ in 0..3 {
            ledger.observe_visible(gone, walk_policy(), point_blank(), RADIUS, TICK_RATE);
            ledger.observe_visible(present, walk_policy(), point_blank(), RADIUS, TICK_RATE);
        }
        assert_eq!(ledger.len(), 2);

        let eligible: BTreeSet<TargetId> = [present].into_iter().collect();
        for _ in 0..100 {
            ledger.decay_missing(&eligible, 1.2, TICK_RATE);
        }
        assert_eq!(ledger.len(), 1);
        assert!(ledger.is_committed(present));
        assert!(!ledger.is_committed(gone));
    }

    #[test]
    fn missing_immediate_targets_drop_outright() {
        let mut ledger = DetectionLedger::new();
        let id = TargetId::new();
        ledger.observe_visible(id, StancePolicy::Immediate, point_blank(), RADIUS, TICK_RATE);
        assert_eq!(ledger.len(), 1);

        let changed = ledger.decay_missing(&BTreeSet::new(), 1.2, TICK_RATE);
        assert!(changed);
        assert!(ledger.is_empty());
    }

    #[test]
    fn clear_empties_the_ledger() {
        let mut ledger = DetectionLedger::new();
        for _ in 0..4 {
            ledger.observe_visible(TargetId::new(), walk_policy(), point_blank(), RADIUS, TICK_RATE);
        }
        assert!(!ledger.is_empty());
        ledger.clear();
        assert!(ledger.is_empty());
    }
}
