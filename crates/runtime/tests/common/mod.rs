#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bolt_core::{
    Combatant, DamageType, EntityId, EntityKind, Position, RegionId, SpellProfile, StatsOracle,
    TargetShape,
};
use bolt_runtime::{Event, LineOfSight, LosResponse, Runtime, RuntimeConfig};
use tokio::sync::broadcast;

pub const CASTER: EntityId = EntityId(1);

/// Stats oracle with a fixed resist chance; zero means bolts never miss
/// between equal-level combatants.
pub struct FixedStats {
    pub resist_chance: i32,
}

impl StatsOracle for FixedStats {
    fn resist_chance(&self, _caster: &Combatant, _target: &Combatant, _spell: &SpellProfile) -> i32 {
        self.resist_chance
    }
}

/// Refuses line of sight to the listed targets.
pub struct Walls {
    pub blocked: Vec<EntityId>,
}

#[async_trait]
impl LineOfSight for Walls {
    async fn check(&self, _caster: EntityId, target: EntityId) -> LosResponse {
        if self.blocked.contains(&target) {
            LosResponse::blocked(target)
        } else {
            LosResponse::clear(target)
        }
    }
}

pub async fn manual_runtime(regions: &[u16]) -> Runtime {
    let mut builder = Runtime::builder()
        .config(RuntimeConfig::manual().with_seed(11))
        .stats(FixedStats { resist_chance: 0 });
    for region in regions {
        builder = builder.region(RegionId(*region));
    }
    builder.build().await.expect("runtime builds")
}

pub fn player(id: u32, name: &str, region: u16) -> Combatant {
    Combatant::new(EntityId(id), name, EntityKind::Player, RegionId(region))
        .with_level(50)
        .with_health(2_000)
}

pub fn creature(id: u32, name: &str, region: u16) -> Combatant {
    Combatant::new(EntityId(id), name, EntityKind::Creature, RegionId(region))
        .with_level(50)
        .with_health(5_000)
}

/// Caster standing 850 units from the origin: bolts land 1001 ticks later.
pub fn caster(region: u16) -> Combatant {
    player(CASTER.0, "Aldric", region).at(Position::new(0, 850, 0))
}

pub fn heat_bolt() -> Arc<SpellProfile> {
    Arc::new(
        SpellProfile::bolt(1001, "Major Fire Bolt", 100.0, DamageType::Heat)
            .with_client_effect(55)
            .with_messages("A bolt of fire hits you!", "{0} is hit by a bolt of fire!"),
    )
}

pub fn cone_bolt() -> Arc<SpellProfile> {
    Arc::new((*heat_bolt()).clone().with_shape(TargetShape::Cone))
}

/// Waits for the first event matching `pred`, skipping the rest.
pub async fn recv_until<F>(rx: &mut broadcast::Receiver<Event>, mut pred: F) -> Event
where
    F: FnMut(&Event) -> bool,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let event = rx.recv().await.expect("event bus open");
            if pred(&event) {
                return event;
            }
        }
    })
    .await
    .expect("event before timeout")
}

/// Everything already published on the topic.
pub fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
