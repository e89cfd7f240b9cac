//! Host-facing collaborator traits.
//!
//! The activity layer knows nothing about the hosting world. Targets
//! arrive through a [`TargetProvider`] and seen-transitions leave through
//! a [`SeenSink`]; the host wires both to its entity registry and event
//! bus. The stubs here back the tests and any headless run.

use vigil_types::{PerceiverId, SeenEvent, Target};

/// Supplies the targets a perceiver may evaluate this tick.
///
/// Eligibility filtering (alive, loaded, within render distance) happens
/// behind this trait; every returned target is evaluated. The returned
/// snapshot must be stable for the duration of the tick.
pub trait TargetProvider {
    /// The eligible targets for `perceiver`, as of this tick.
    fn eligible_targets(&self, perceiver: PerceiverId) -> Vec<Target>;
}

/// Receives the one-shot seen-transitions raised by perception ticks.
pub trait SeenSink {
    /// Deliver one seen-transition. Called at most once per target per
    /// visibility episode.
    fn notify(&mut self, event: SeenEvent);
}

/// A provider backed by a fixed, externally mutated target list.
///
/// Tests and the headless simulator own one of these and edit
/// [`StaticTargetProvider::targets`] between ticks.
#[derive(Debug, Clone, Default)]
pub struct StaticTargetProvider {
    /// The targets returned to every perceiver.
    pub targets: Vec<Target>,
}

impl StaticTargetProvider {
    /// A provider over the given targets.
    pub const fn new(targets: Vec<Target>) -> Self {
        Self { targets }
    }
}

impl TargetProvider for StaticTargetProvider {
    fn eligible_targets(&self, _perceiver: PerceiverId) -> Vec<Target> {
        self.targets.clone()
    }
}

/// A sink that records every delivered event, in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    /// All events delivered so far, oldest first.
    pub events: Vec<SeenEvent>,
}

impl RecordingSink {
    /// An empty recording sink.
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }
}

impl SeenSink for RecordingSink {
    fn notify(&mut self, event: SeenEvent) {
        self.events.push(event);
    }
}

/// A sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl SeenSink for NullSink {
    fn notify(&mut self, _event: SeenEvent) {}
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use vigil_types::{Stance, TargetId, Vec3};

    use super::*;

    #[test]
    fn static_provider_returns_its_targets_to_any_perceiver() {
        let target = Target {
            id: TargetId::new(),
            eye: Vec3::new(0.0, 1.6, 3.0),
            stance: Stance::Standing,
        };
        let provider = StaticTargetProvider::new(vec![target]);
        let a = provider.eligible_targets(PerceiverId::new());
        let b = provider.eligible_targets(PerceiverId::new());
        assert_eq!(a, b);
        assert_eq!(a.len(), 1);
        assert_eq!(a.first().unwrap().id, target.id);
    }

    #[test]
    fn recording_sink_keeps_delivery_order() {
        let mut sink = RecordingSink::new();
        let perceiver = PerceiverId::new();
        let first = TargetId::new();
        let second = TargetId::new();
        for (tick, target) in [(1_u64, first), (2, second)] {
            sink.notify(SeenEvent {
                perceiver,
                target,
                tick,
                occurred_at: Utc::now(),
            });
        }
        assert_eq!(sink.events.len(), 2);
        assert_eq!(sink.events.first().unwrap().target, first);
        assert_eq!(sink.events.get(1).unwrap().target, second);
    }
}
