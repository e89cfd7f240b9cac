//! The perception activity and its tick lifecycle.
//!
//! An [`Activity`] is a unit of per-tick behavior driven by an external
//! scheduler. [`PerceptionActivity`] is the engine's core activity: each
//! tick it pulls the eligible targets, runs containment and occlusion for
//! every one, feeds the outcomes into the detection ledger, raises
//! seen-transitions through the sink, and finally smooths the perceiver's
//! facing toward its closest committed target.
//!
//! # Tick order
//!
//! 1. Observer short-circuit: with no observers nearby the whole tick is
//!    skipped and no state moves, including confidence decay.
//! 2. Targets tracked in the ledger but absent from this tick's eligible
//!    set receive an implicit not-visible update.
//! 3. Every eligible target gets one containment sample, at most one
//!    occlusion query, and one ledger update.
//! 4. The nearest target this tick is the focus. If look-at is enabled,
//!    the pose takes one rotation step toward it, but only while the
//!    focus target is visible and committed -- a nearer unconfirmed
//!    target suspends the stare rather than redirecting it.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::Utc;
use tracing::{debug, info};
use vigil_types::{PerceiverId, PerceiverPose, SeenEvent, Target, TargetId};
use vigil_vision::{
    DetectionLedger, OrientationController, RaycastQuery, VisionConfig, geometry, occlusion,
};

use crate::providers::{SeenSink, TargetProvider};

/// Where an activity is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActivityPhase {
    /// Created but never initialized or ticked.
    #[default]
    Uninitialized,
    /// Receiving ticks.
    Active,
    /// Disposed; all accrued state has been dropped.
    Disposed,
}

/// Everything the scheduler hands an activity for one tick.
pub struct TickContext<'a> {
    /// Whether any observer is close enough for perception to matter.
    /// When false the activity skips all work, including decay.
    pub has_observers: bool,
    /// The source of this tick's eligible targets.
    pub targets: &'a dyn TargetProvider,
    /// The world line-of-sight query.
    pub raycast: &'a dyn RaycastQuery,
    /// Ticks per second of the driving scheduler.
    pub tick_rate: u32,
}

/// What one tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Any observable state moved this tick (confidence, pose, ledger
    /// membership).
    pub state_changed: bool,
    /// At least one target is currently committed.
    pub seeing_any: bool,
}

/// A unit of per-tick behavior owned by a perceiver.
///
/// The scheduler calls [`Activity::initialize`] once before the first
/// tick, [`Activity::tick`] every tick, and [`Activity::dispose`] when the
/// perceiver despawns or switches behavior. Disposal is idempotent.
pub trait Activity {
    /// Bind the activity to its starting pose and make it active.
    fn initialize(&mut self, pose: PerceiverPose);

    /// Run one tick. Fired seen-transitions are delivered to `sink`.
    fn tick(&mut self, ctx: &TickContext<'_>, sink: &mut dyn SeenSink) -> TickReport;

    /// The activity's current pose.
    fn pose(&self) -> PerceiverPose;

    /// Overwrite the activity's pose. Used by composite activities that
    /// feed a movement layer's position into perception.
    fn set_pose(&mut self, pose: PerceiverPose);

    /// Drop all accrued state. Safe to call more than once.
    fn dispose(&mut self);
}

/// The nearest target seen by the per-tick loop, and whether the stare
/// may follow it.
#[derive(Debug, Clone, Copy)]
struct Focus {
    distance: f64,
    target: Target,
    watching: bool,
}

/// Per-tick visibility detection for one perceiver.
#[derive(Debug, Clone)]
pub struct PerceptionActivity {
    id: PerceiverId,
    config: VisionConfig,
    controller: OrientationController,
    pose: PerceiverPose,
    ledger: DetectionLedger,
    phase: ActivityPhase,
    tick: u64,
    seeing: bool,
}

impl PerceptionActivity {
    /// A new, uninitialized perception activity.
    pub fn new(id: PerceiverId, config: VisionConfig, pose: PerceiverPose) -> Self {
        Self {
            id,
            config,
            controller: OrientationController::default(),
            pose,
            ledger: DetectionLedger::new(),
            phase: ActivityPhase::Uninitialized,
            tick: 0,
            seeing: false,
        }
    }

    /// This activity with a non-default orientation controller.
    #[must_use]
    pub const fn with_controller(mut self, controller: OrientationController) -> Self {
        self.controller = controller;
        self
    }

    /// The perceiver this activity belongs to.
    pub const fn id(&self) -> PerceiverId {
        self.id
    }

    /// The immutable vision parameters.
    pub const fn config(&self) -> &VisionConfig {
        &self.config
    }

    /// Whether any target was committed as of the last tick.
    pub const fn is_seeing(&self) -> bool {
        self.seeing
    }

    /// The current lifecycle phase.
    pub const fn phase(&self) -> ActivityPhase {
        self.phase
    }

    /// Read access to the detection ledger, for composition and tests.
    pub const fn ledger(&self) -> &DetectionLedger {
        &self.ledger
    }

    /// Whether `candidate` beats the current focus. `best` is threaded
    /// through the target loop; ties break on the smaller id so the focus
    /// is deterministic under equal distances.
    fn closer_focus(best: Option<&Focus>, distance: f64, candidate: TargetId) -> bool {
        best.is_none_or(|f| match distance.total_cmp(&f.distance) {
            Ordering::Less => true,
            Ordering::Equal => candidate < f.target.id,
            Ordering::Greater => false,
        })
    }
}

impl Activity for PerceptionActivity {
    fn initialize(&mut self, pose: PerceiverPose) {
        self.pose = pose;
        self.phase = ActivityPhase::Active;
        debug!(perceiver_id = %self.id, "perception activity initialized");
    }

    fn tick(&mut self, ctx: &TickContext<'_>, sink: &mut dyn SeenSink) -> TickReport {
        if self.phase != ActivityPhase::Active {
            // Ticking implies activation; a disposed activity restarts
            // with the empty ledger disposal left behind.
            self.phase = ActivityPhase::Active;
        }
        self.tick = self.tick.saturating_add(1);

        if !ctx.has_observers {
            self.seeing = false;
            return TickReport::default();
        }

        let targets = ctx.targets.eligible_targets(self.id);
        let eligible: BTreeSet<TargetId> = targets.iter().map(|t| t.id).collect();
        let mut changed =
            self.ledger
                .decay_missing(&eligible, self.config.decay_per_second, ctx.tick_rate);

        // The pose is sampled once so every target this tick sees the same
        // facing, regardless of processing order.
        let eye = self.pose.eye();
        let (yaw, pitch) = (self.pose.yaw, self.pose.pitch);

        let mut focus: Option<Focus> = None;

        for target in &targets {
            let sample = geometry::sample(
                self.config.shape,
                eye,
                yaw,
                pitch,
                target.eye,
                self.config.radius,
                self.config.width,
            );
            let visible = sample.inside && !occlusion::is_blocked(ctx.raycast, eye, target.eye);

            let policy = self.config.policy(target.stance);
            let result = if visible {
                self.ledger
                    .observe_visible(target.id, policy, sample, self.config.radius, ctx.tick_rate)
            } else {
                self.ledger.observe_hidden(
                    target.id,
                    policy,
                    self.config.decay_per_second,
                    ctx.tick_rate,
                )
            };
            changed = changed || result.changed;

            if result.fired {
                info!(
                    perceiver_id = %self.id,
                    target_id = %target.id,
                    tick = self.tick,
                    "target seen"
                );
                sink.notify(SeenEvent {
                    perceiver: self.id,
                    target: target.id,
                    tick: self.tick,
                    occurred_at: Utc::now(),
                });
            }

            if Self::closer_focus(focus.as_ref(), sample.distance, target.id) {
                focus = Some(Focus {
                    distance: sample.distance,
                    target: *target,
                    watching: visible && result.committed,
                });
            }
        }

        if self.config.look_at_target {
            if let Some(focus) = focus.filter(|f| f.watching) {
                let stepped = self.controller.step_toward(self.pose, focus.target.eye);
                if (stepped.yaw - self.pose.yaw).abs() > f64::EPSILON
                    || (stepped.pitch - self.pose.pitch).abs() > f64::EPSILON
                {
                    changed = true;
                }
                self.pose = stepped;
            }
        }

        let seeing_any = self.ledger.any_committed();
        self.seeing = seeing_any;
        TickReport {
            state_changed: changed,
            seeing_any,
        }
    }

    fn pose(&self) -> PerceiverPose {
        self.pose
    }

    fn set_pose(&mut self, pose: PerceiverPose) {
        self.pose = pose;
    }

    fn dispose(&mut self) {
        if self.phase != ActivityPhase::Disposed {
            debug!(perceiver_id = %self.id, "perception activity disposed");
        }
        self.phase = ActivityPhase::Disposed;
        self.ledger.clear();
        self.seeing = false;
    }
}
