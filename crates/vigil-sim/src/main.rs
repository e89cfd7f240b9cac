//! Headless demo world for the Vigil perception engine.
//!
//! Spawns patrolling guards and wandering targets in a small walled
//! courtyard and runs the perception tick loop for a configured number of
//! ticks, logging every seen-transition as it fires.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `vigil-config.yaml`
//! 3. Build the wall world
//! 4. Spawn wandering targets
//! 5. Build one patrol-plus-perception activity per guard
//! 6. Run the tick loop
//! 7. Dispose the guards and log the result

mod config;
mod error;
mod world;

use std::collections::BTreeMap;
use std::path::Path;

use tracing::info;
use tracing_subscriber::EnvFilter;
use vigil_core::{
    Activity, PatrolPerceptionActivity, PerceptionActivity, ScriptedPathActivity, SeenSink,
    TickContext,
};
use vigil_types::{PerceiverId, PerceiverPose, SeenEvent, TargetId, Vec3};

use crate::config::SimConfig;
use crate::error::SimError;
use crate::world::{WallWorld, WanderingTargets};

/// A sink that logs every seen-transition with display names attached.
struct LoggingSink {
    guard_names: BTreeMap<PerceiverId, String>,
    target_names: BTreeMap<TargetId, String>,
    total: u64,
}

impl LoggingSink {
    const fn new(
        guard_names: BTreeMap<PerceiverId, String>,
        target_names: BTreeMap<TargetId, String>,
    ) -> Self {
        Self {
            guard_names,
            target_names,
            total: 0,
        }
    }
}

impl SeenSink for LoggingSink {
    fn notify(&mut self, event: SeenEvent) {
        self.total = self.total.saturating_add(1);
        let guard = self
            .guard_names
            .get(&event.perceiver)
            .map_or("<unknown>", String::as_str);
        let target = self
            .target_names
            .get(&event.target)
            .map_or("<unknown>", String::as_str);
        info!(guard, target, tick = event.tick, "target seen");
    }
}

/// One named guard and its activity.
struct Guard {
    name: String,
    activity: PatrolPerceptionActivity,
}

/// Application entry point for the demo world.
///
/// # Errors
///
/// Returns an error if configuration loading or vision validation fails.
fn main() -> Result<(), SimError> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("vigil-sim starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        seed = config.world.seed,
        tick_rate = config.world.tick_rate,
        ticks = config.world.ticks,
        "Configuration loaded"
    );

    // 3. Build the wall world.
    let world = WallWorld::new(&config.walls);
    info!(wall_count = world.wall_count(), "Wall world built");

    // 4. Spawn wandering targets.
    let mut targets = WanderingTargets::new(&config.targets, config.world.seed);
    info!(target_count = targets.len(), "Targets spawned");

    // 5. Build the guards.
    let vision_config = config.vision.to_vision_config()?;
    let mut guards = Vec::new();
    let mut guard_names = BTreeMap::new();
    for guard_config in &config.guards {
        let start = guard_config
            .waypoints
            .first()
            .copied()
            .unwrap_or(Vec3::ZERO);
        let pose = PerceiverPose {
            position: start,
            yaw: 0.0,
            pitch: 0.0,
            eye_height: guard_config.eye_height,
        };
        let id = PerceiverId::new();
        let vision = PerceptionActivity::new(id, vision_config, pose);
        let path =
            ScriptedPathActivity::new(guard_config.waypoints.clone(), guard_config.speed, pose);
        let mut activity = PatrolPerceptionActivity::new(
            Box::new(path),
            vision,
            guard_config.freeze_while_watching,
        );
        activity.initialize(pose);
        guard_names.insert(id, guard_config.name.clone());
        guards.push(Guard {
            name: guard_config.name.clone(),
            activity,
        });
    }
    info!(guard_count = guards.len(), "Guards on patrol");

    // 6. Run the tick loop.
    let mut sink = LoggingSink::new(guard_names, targets.name_table());
    let tick_rate = config.world.tick_rate;
    for _ in 0..config.world.ticks {
        targets.advance();
        for guard in &mut guards {
            let ctx = TickContext {
                has_observers: true,
                targets: &targets,
                raycast: &world,
                tick_rate,
            };
            guard.activity.tick(&ctx, &mut sink);
        }
    }

    // 7. Dispose and log the result.
    for guard in &mut guards {
        guard.activity.dispose();
        info!(guard = %guard.name, "Guard disposed");
    }
    info!(
        ticks = config.world.ticks,
        seen_events = sink.total,
        "vigil-sim shutdown complete"
    );

    Ok(())
}

/// Load the demo configuration from `vigil-config.yaml`.
///
/// Looks for the config file relative to the current working directory;
/// the stock scenario runs when the file is absent.
fn load_config() -> Result<SimConfig, SimError> {
    let config_path = Path::new("vigil-config.yaml");
    if config_path.exists() {
        let config = SimConfig::from_file(config_path)?;
        Ok(config)
    } else {
        info!("Config file not found, using defaults");
        Ok(SimConfig::default())
    }
}
