//! Staged fights.
//!
//! Every scenario runs on region [`REGION`] with a manual clock: it spawns its
//! combatants, commits casts and advances the clock until no bolt is left in
//! flight.

use std::sync::Arc;

use anyhow::{Result, bail};
use bolt_core::state::{Attributes, EngageEffect, Loadout, OffHand, WeaponHand};
use bolt_core::{
    Combatant, DamageType, EntityId, EntityKind, Heading, LaunchRequest, Position, Realm,
    RegionId, Resolution, SpellKind, SpellProfile,
};
use bolt_runtime::{RegionHandle, Runtime};
use tracing::info;

pub const REGION: RegionId = RegionId(1);

const ALDRIC: EntityId = EntityId(1);
const TARA: EntityId = EntityId(2);
const GATE: EntityId = EntityId(10);
const RAT: EntityId = EntityId(20);
const WOLF: EntityId = EntityId(21);
const TROLL: EntityId = EntityId(22);

/// Ticks per clock step while waiting for bolts to land.
const STEP: u64 = 250;
/// Steps after which a scenario gives up waiting.
const MAX_STEPS: usize = 100;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum Scenario {
    /// Three bolts at a shield-bearer who engages the caster
    Duel,
    /// Siege arrow and a plain bolt against a keep gate
    Siege,
    /// Bolts at creatures of different range; one dies before the second bolt lands
    Volley,
}

impl Scenario {
    pub async fn stage(self, runtime: &Runtime) -> Result<()> {
        let region = runtime.region(REGION)?;
        match self {
            Scenario::Duel => duel(&region).await,
            Scenario::Siege => siege(&region).await,
            Scenario::Volley => volley(&region).await,
        }
    }
}

async fn duel(region: &RegionHandle) -> Result<()> {
    region
        .spawn(player(ALDRIC, "Aldric", Realm::Albion).at(Position::new(0, 850, 0)))
        .await?;

    let mut tara = player(TARA, "Tara", Realm::Midgard)
        .facing(Heading::new(0))
        .with_attributes(Attributes {
            dexterity: 60,
            shield_spec: 42,
            ..Attributes::default()
        })
        .with_loadout(Loadout {
            main_hand: Some(WeaponHand::RightHand),
            off_hand: Some(OffHand::Shield),
        });
    tara.engage = Some(EngageEffect { target: ALDRIC });
    tara.combat.attack_state = true;
    region.spawn(tara).await?;

    for _ in 0..3 {
        region
            .launch(LaunchRequest::single(ALDRIC, TARA, fire_bolt()))
            .await?;
        settle(region).await?;
    }
    Ok(())
}

async fn siege(region: &RegionHandle) -> Result<()> {
    region
        .spawn(player(ALDRIC, "Aldric", Realm::Albion).at(Position::new(0, 850, 0)))
        .await?;
    region
        .spawn(
            Combatant::new(GATE, "keep gate", EntityKind::KeepDoor, REGION)
                .with_level(50)
                .with_health(25_000),
        )
        .await?;

    let arrow = Arc::new(
        SpellProfile::bolt(2001, "Siege Arrow", 300.0, DamageType::Thrust)
            .with_kind(SpellKind::SiegeArrow)
            .with_client_effect(7)
            .with_messages("An arrow strikes you!", "{0} is struck by an arrow!"),
    );
    region
        .launch(LaunchRequest::single(ALDRIC, GATE, arrow))
        .await?;
    region
        .launch(LaunchRequest::single(ALDRIC, GATE, fire_bolt()))
        .await?;
    settle(region).await
}

async fn volley(region: &RegionHandle) -> Result<()> {
    region
        .spawn(player(ALDRIC, "Aldric", Realm::Hibernia))
        .await?;
    region
        .spawn(creature(RAT, "rat", 5, 10).at(Position::new(0, 85, 0)))
        .await?;
    region
        .spawn(creature(WOLF, "wolf", 45, 1_500).at(Position::new(0, 850, 0)))
        .await?;
    region
        .spawn(creature(TROLL, "troll", 55, 6_000).at(Position::new(0, 1_700, 0)))
        .await?;

    let bolt = fire_bolt();
    region
        .launch(LaunchRequest::new(ALDRIC, vec![RAT, WOLF, TROLL], Arc::clone(&bolt)))
        .await?;
    region.launch(LaunchRequest::single(ALDRIC, RAT, bolt)).await?;
    settle(region).await
}

/// Advances the clock until nothing is left in flight.
async fn settle(region: &RegionHandle) -> Result<()> {
    for _ in 0..MAX_STEPS {
        for resolution in region.advance(STEP).await? {
            match resolution {
                Resolution::Expired { caster, target } => {
                    info!(caster = %caster, target = %target, "bolt expired");
                }
                Resolution::Missed(outcome) | Resolution::Landed(outcome) => {
                    info!(
                        caster = %outcome.attacker,
                        target = %outcome.target,
                        result = ?outcome.result,
                        damage = outcome.damage,
                        "bolt resolved"
                    );
                }
            }
        }
        if region.snapshot().await?.pending_bolts == 0 {
            return Ok(());
        }
    }
    bail!("bolts still in flight after {} ticks", STEP * MAX_STEPS as u64)
}

fn player(id: EntityId, name: &str, realm: Realm) -> Combatant {
    Combatant::new(id, name, EntityKind::Player, REGION)
        .with_realm(realm)
        .with_level(50)
        .with_health(1_800)
}

fn creature(id: EntityId, name: &str, level: u8, health: i32) -> Combatant {
    Combatant::new(id, name, EntityKind::Creature, REGION)
        .with_level(level)
        .with_health(health)
}

fn fire_bolt() -> Arc<SpellProfile> {
    Arc::new(
        SpellProfile::bolt(1001, "Major Fire Bolt", 120.0, DamageType::Heat)
            .with_client_effect(55)
            .with_messages("A bolt of fire hits you!", "{0} is hit by a bolt of fire!"),
    )
}
