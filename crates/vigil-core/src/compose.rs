//! Composing perception with a movement activity.
//!
//! A perceiver usually does something besides watching: it patrols, idles,
//! or follows a script. [`PatrolPerceptionActivity`] runs a movement
//! activity and a [`PerceptionActivity`] in lockstep, feeding the
//! movement layer's pose into perception each tick. When
//! `freeze_while_watching` is set, movement pauses for any tick on which
//! the perceiver has a committed target in sight, so a guard stops on its
//! route to stare.
//!
//! [`ScriptedPathActivity`] is the stock movement layer: it walks a cyclic
//! list of waypoints at a fixed per-tick speed, facing along its direction
//! of travel.

use vigil_types::{PerceiverPose, Vec3};
use vigil_vision::orientation::bearing_to;

use crate::activity::{Activity, PerceptionActivity, TickContext, TickReport};
use crate::providers::SeenSink;

/// Movement and perception ticked together for one perceiver.
pub struct PatrolPerceptionActivity {
    movement: Box<dyn Activity>,
    vision: PerceptionActivity,
    freeze_while_watching: bool,
}

impl PatrolPerceptionActivity {
    /// Combine a movement activity with perception.
    pub const fn new(
        movement: Box<dyn Activity>,
        vision: PerceptionActivity,
        freeze_while_watching: bool,
    ) -> Self {
        Self {
            movement,
            vision,
            freeze_while_watching,
        }
    }

    /// Read access to the perception half, for tests and hosts.
    pub const fn vision(&self) -> &PerceptionActivity {
        &self.vision
    }
}

impl Activity for PatrolPerceptionActivity {
    fn initialize(&mut self, pose: PerceiverPose) {
        self.movement.initialize(pose);
        self.vision.initialize(pose);
    }

    fn tick(&mut self, ctx: &TickContext<'_>, sink: &mut dyn SeenSink) -> TickReport {
        let frozen = self.freeze_while_watching && self.vision.is_seeing();

        let movement_report = if frozen {
            TickReport::default()
        } else {
            let report = self.movement.tick(ctx, sink);
            // Movement owns position; perception owns facing. Feed the new
            // position through while keeping the facing perception settled
            // on.
            let moved = self.movement.pose();
            let watching = self.vision.pose();
            self.vision
                .set_pose(moved.with_rotation(watching.yaw, watching.pitch));
            report
        };

        let vision_report = self.vision.tick(ctx, sink);

        TickReport {
            state_changed: movement_report.state_changed || vision_report.state_changed,
            seeing_any: vision_report.seeing_any,
        }
    }

    fn pose(&self) -> PerceiverPose {
        self.vision.pose()
    }

    fn set_pose(&mut self, pose: PerceiverPose) {
        self.movement.set_pose(pose);
        self.vision.set_pose(pose);
    }

    fn dispose(&mut self) {
        self.movement.dispose();
        self.vision.dispose();
    }
}

/// A movement activity that cycles through fixed waypoints.
///
/// Each tick it moves up to `speed` units toward the current waypoint,
/// advancing to the next (wrapping around) on arrival, and snaps its
/// facing along the direction of travel. An empty waypoint list leaves
/// the pose untouched.
#[derive(Debug, Clone)]
pub struct ScriptedPathActivity {
    waypoints: Vec<Vec3>,
    index: usize,
    speed: f64,
    pose: PerceiverPose,
}

impl ScriptedPathActivity {
    /// A path over `waypoints` walked at `speed` units per tick.
    pub fn new(waypoints: Vec<Vec3>, speed: f64, pose: PerceiverPose) -> Self {
        Self {
            waypoints,
            index: 0,
            speed: if speed.is_finite() { speed.max(0.0) } else { 0.0 },
            pose,
        }
    }

    /// The waypoint currently being walked toward.
    pub fn current_waypoint(&self) -> Option<Vec3> {
        self.waypoints.get(self.index).copied()
    }

    fn advance_index(&mut self) {
        self.index = self
            .index
            .wrapping_add(1)
            .checked_rem(self.waypoints.len())
            .unwrap_or(0);
    }
}

impl Activity for ScriptedPathActivity {
    fn initialize(&mut self, pose: PerceiverPose) {
        self.pose = pose;
        self.index = 0;
    }

    fn tick(&mut self, _ctx: &TickContext<'_>, _sink: &mut dyn SeenSink) -> TickReport {
        let Some(waypoint) = self.current_waypoint() else {
            return TickReport::default();
        };

        let before = self.pose.position;
        let to_waypoint = waypoint - before;
        let distance = to_waypoint.length();

        if distance <= self.speed {
            self.pose.position = waypoint;
            self.advance_index();
        } else if let Some(dir) = to_waypoint.normalized() {
            self.pose.position = before + dir.scaled(self.speed);
        }

        if let Some((yaw, pitch)) = bearing_to(self.pose.position, waypoint) {
            self.pose = self.pose.with_rotation(yaw, pitch);
        }

        TickReport {
            state_changed: self.pose.position.distance_squared(before) > f64::EPSILON,
            seeing_any: false,
        }
    }

    fn pose(&self) -> PerceiverPose {
        self.pose
    }

    fn set_pose(&mut self, pose: PerceiverPose) {
        self.pose = pose;
    }

    fn dispose(&mut self) {}
}
