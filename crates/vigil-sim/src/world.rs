//! The demo world: wall geometry and wandering targets.
//!
//! Walls are opaque axis-aligned boxes; line of sight is tested with a
//! segment/slab intersection. Targets shuttle between waypoints with a
//! little seeded jitter so runs are lively but reproducible.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use vigil_core::TargetProvider;
use vigil_types::{PerceiverId, Stance, Target, TargetId, Vec3};
use vigil_vision::RaycastQuery;

use crate::config::{TargetConfig, WallConfig};

/// An opaque axis-aligned box.
#[derive(Debug, Clone, Copy)]
struct Wall {
    min: Vec3,
    max: Vec3,
}

impl Wall {
    /// Whether the segment from `a` to `b` passes through this box.
    ///
    /// Standard slab test with the ray parameter clamped to the segment.
    fn intersects_segment(&self, a: Vec3, b: Vec3) -> bool {
        let d = b - a;
        let mut t_min = 0.0_f64;
        let mut t_max = 1.0_f64;

        let axes = [
            (a.x, d.x, self.min.x, self.max.x),
            (a.y, d.y, self.min.y, self.max.y),
            (a.z, d.z, self.min.z, self.max.z),
        ];
        for (origin, delta, lo, hi) in axes {
            if delta.abs() < f64::EPSILON {
                // Parallel to this slab: either always between the planes
                // or never.
                if origin < lo || origin > hi {
                    return false;
                }
                continue;
            }
            let t1 = (lo - origin) / delta;
            let t2 = (hi - origin) / delta;
            let (near, far) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
            t_min = t_min.max(near);
            t_max = t_max.min(far);
            if t_min > t_max {
                return false;
            }
        }
        true
    }
}

/// Static world geometry backing the engine's line-of-sight query.
#[derive(Debug, Clone)]
pub struct WallWorld {
    walls: Vec<Wall>,
}

impl WallWorld {
    /// A world with the given wall boxes. Degenerate boxes (min above max
    /// on any axis) are dropped.
    pub fn new(walls: &[WallConfig]) -> Self {
        let walls = walls
            .iter()
            .filter(|w| w.min.x <= w.max.x && w.min.y <= w.max.y && w.min.z <= w.max.z)
            .map(|w| Wall {
                min: w.min,
                max: w.max,
            })
            .collect();
        Self { walls }
    }

    /// Number of walls in the world.
    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }
}

impl RaycastQuery for WallWorld {
    fn blocked(&self, origin: Vec3, target: Vec3) -> bool {
        self.walls
            .iter()
            .any(|w| w.intersects_segment(origin, target))
    }
}

/// One target shuttling along its waypoints.
#[derive(Debug, Clone)]
struct WanderingTarget {
    id: TargetId,
    name: String,
    waypoints: Vec<Vec3>,
    index: usize,
    position: Vec3,
    speed: f64,
    eye_height: f64,
    stance: Stance,
    jitter: f64,
}

impl WanderingTarget {
    fn step(&mut self, rng: &mut StdRng) {
        let Some(&waypoint) = self.waypoints.get(self.index) else {
            return;
        };

        let to_waypoint = waypoint - self.position;
        let distance = to_waypoint.length();
        if distance <= self.speed {
            self.position = waypoint;
            self.index = self
                .index
                .wrapping_add(1)
                .checked_rem(self.waypoints.len())
                .unwrap_or(0);
        } else if let Some(dir) = to_waypoint.normalized() {
            self.position = self.position + dir.scaled(self.speed);
        }

        if self.jitter > 0.0 {
            let jx: f64 = rng.random_range(-1.0..=1.0);
            let jz: f64 = rng.random_range(-1.0..=1.0);
            self.position = Vec3::new(
                self.position.x + jx * self.jitter,
                self.position.y,
                self.position.z + jz * self.jitter,
            );
        }
    }

    fn as_target(&self) -> Target {
        Target {
            id: self.id,
            eye: Vec3::new(
                self.position.x,
                self.position.y + self.eye_height,
                self.position.z,
            ),
            stance: self.stance,
        }
    }
}

/// All wandering targets, advanced once per tick.
///
/// Doubles as the engine's [`TargetProvider`]: every guard sees the same
/// snapshot for a given tick.
#[derive(Debug, Clone)]
pub struct WanderingTargets {
    targets: Vec<WanderingTarget>,
    rng: StdRng,
}

impl WanderingTargets {
    /// Spawn targets from config, seeding the jitter source.
    pub fn new(configs: &[TargetConfig], seed: u64) -> Self {
        let targets = configs
            .iter()
            .map(|c| {
                let position = c.waypoints.first().copied().unwrap_or_default();
                WanderingTarget {
                    id: TargetId::new(),
                    name: c.name.clone(),
                    waypoints: c.waypoints.clone(),
                    index: 0,
                    position,
                    speed: if c.speed.is_finite() { c.speed.max(0.0) } else { 0.0 },
                    eye_height: c.eye_height,
                    stance: c.stance,
                    jitter: if c.jitter.is_finite() { c.jitter.max(0.0) } else { 0.0 },
                }
            })
            .collect();
        Self {
            targets,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Move every target one tick along its route.
    pub fn advance(&mut self) {
        for target in &mut self.targets {
            target.step(&mut self.rng);
        }
    }

    /// A snapshot of the id-to-name table, for log decoration.
    pub fn name_table(&self) -> std::collections::BTreeMap<TargetId, String> {
        self.targets
            .iter()
            .map(|t| (t.id, t.name.clone()))
            .collect()
    }

    /// Number of live targets.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether there are no targets.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl TargetProvider for WanderingTargets {
    fn eligible_targets(&self, _perceiver: PerceiverId) -> Vec<Target> {
        self.targets.iter().map(WanderingTarget::as_target).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn wall(min: Vec3, max: Vec3) -> WallWorld {
        WallWorld::new(&[WallConfig { min, max }])
    }

    #[test]
    fn segment_through_a_wall_is_blocked() {
        let world = wall(Vec3::new(-1.0, 0.0, 2.0), Vec3::new(1.0, 3.0, 3.0));
        assert!(world.blocked(Vec3::new(0.0, 1.5, 0.0), Vec3::new(0.0, 1.5, 5.0)));
    }

    #[test]
    fn segment_beside_a_wall_is_clear() {
        let world = wall(Vec3::new(-1.0, 0.0, 2.0), Vec3::new(1.0, 3.0, 3.0));
        assert!(!world.blocked(Vec3::new(2.0, 1.5, 0.0), Vec3::new(2.0, 1.5, 5.0)));
    }

    #[test]
    fn segment_stopping_short_of_a_wall_is_clear() {
        let world = wall(Vec3::new(-1.0, 0.0, 4.0), Vec3::new(1.0, 3.0, 5.0));
        assert!(!world.blocked(Vec3::new(0.0, 1.5, 0.0), Vec3::new(0.0, 1.5, 3.0)));
    }

    #[test]
    fn segment_over_a_wall_is_clear() {
        // Wall tops out at y 2; the segment passes at y 3.
        let world = wall(Vec3::new(-1.0, 0.0, 2.0), Vec3::new(1.0, 2.0, 3.0));
        assert!(!world.blocked(Vec3::new(0.0, 3.0, 0.0), Vec3::new(0.0, 3.0, 5.0)));
    }

    #[test]
    fn degenerate_walls_are_dropped() {
        let world = wall(Vec3::new(1.0, 0.0, 0.0), Vec3::new(-1.0, 3.0, 3.0));
        assert_eq!(world.wall_count(), 0);
    }

    #[test]
    fn targets_shuttle_between_waypoints_deterministically() {
        let config = TargetConfig {
            name: "walker".to_owned(),
            waypoints: vec![Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0)],
            speed: 0.5,
            eye_height: 1.62,
            stance: Stance::Standing,
            jitter: 0.0,
        };
        let mut a = WanderingTargets::new(std::slice::from_ref(&config), 7);
        let mut b = WanderingTargets::new(std::slice::from_ref(&config), 7);
        let perceiver = PerceiverId::new();
        for _ in 0..10 {
            a.advance();
            b.advance();
            let ta = a.eligible_targets(perceiver);
            let tb = b.eligible_targets(perceiver);
            let za = ta.first().unwrap().eye.z;
            let zb = tb.first().unwrap().eye.z;
            assert!((za - zb).abs() < f64::EPSILON, "same seed, same route");
        }
    }
}
