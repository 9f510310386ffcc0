#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use bolt_core::state::{Attributes, Loadout, OffHand, WeaponHand};
use bolt_core::{
    AttackOutcome, BoltImpact, ChatKind, CombatConfig, CombatEnv, Combatant, DamageType,
    DefaultHooks, Dice, EntityId, EntityKind, Heading, ImpactContext, LaunchContext, LaunchError,
    LaunchRequest, LaunchStep, Notifier, Position, RegionId, RegionState, Resolution,
    ScriptedRandom, Scheduler, SpellEffect, SpellProfile, StatsOracle,
};

pub const REGION: RegionId = RegionId(1);

/// Stats oracle with a fixed resist chance and record-backed everything else.
pub struct FixedStats {
    pub resist_chance: i32,
}

impl StatsOracle for FixedStats {
    fn resist_chance(&self, _caster: &Combatant, _target: &Combatant, _spell: &SpellProfile) -> i32 {
        self.resist_chance
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub effects: Mutex<Vec<SpellEffect>>,
    pub messages: Mutex<Vec<(EntityId, ChatKind, String)>>,
    pub area: Mutex<Vec<(EntityId, Vec<EntityId>, ChatKind, String)>>,
    pub numbers: Mutex<Vec<AttackOutcome>>,
}

impl RecordingNotifier {
    pub fn messages_to(&self, to: EntityId) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _, _)| *id == to)
            .map(|(_, _, text)| text.clone())
            .collect()
    }

    pub fn message_count(&self) -> usize {
        self.messages.lock().unwrap().len() + self.area.lock().unwrap().len()
    }

    pub fn effect_count(&self) -> usize {
        self.effects.lock().unwrap().len()
    }
}

impl Notifier for RecordingNotifier {
    fn spell_effect(&self, effect: SpellEffect) {
        self.effects.lock().unwrap().push(effect);
    }

    fn message(&self, to: EntityId, kind: ChatKind, text: &str) {
        self.messages.lock().unwrap().push((to, kind, text.to_string()));
    }

    fn area_message(&self, origin: EntityId, excluded: &[EntityId], kind: ChatKind, text: &str) {
        self.area
            .lock()
            .unwrap()
            .push((origin, excluded.to_vec(), kind, text.to_string()));
    }

    fn damage_numbers(&self, outcome: &AttackOutcome) {
        self.numbers.lock().unwrap().push(outcome.clone());
    }
}

/// One region with its scheduler and collaborators.
pub struct World {
    pub region: RegionState,
    pub scheduler: Scheduler<BoltImpact>,
    pub dice: Dice,
    pub config: CombatConfig,
    pub stats: FixedStats,
    pub notifier: RecordingNotifier,
}

impl World {
    pub fn new(resist_chance: i32) -> Self {
        Self {
            region: RegionState::new(REGION),
            scheduler: Scheduler::new(),
            dice: Dice::with_ambient(7, ScriptedRandom::new(vec![50])),
            config: CombatConfig::default(),
            stats: FixedStats { resist_chance },
            notifier: RecordingNotifier::default(),
        }
    }

    /// Replaces the ambient generator used for non-player rolls, blocks,
    /// hit locations and criticals.
    pub fn script_ambient(&mut self, values: Vec<u32>) {
        self.dice = Dice::with_ambient(7, ScriptedRandom::new(values));
    }

    /// Scripts the rolls drawn from a player's own sequence.
    pub fn script_player(&mut self, player: EntityId, values: Vec<u32>) {
        self.dice.set_player(player, ScriptedRandom::new(values));
    }

    pub fn spawn(&mut self, combatant: Combatant) {
        self.region.insert(combatant);
    }

    pub fn get(&self, id: EntityId) -> &Combatant {
        self.region.get(id).expect("combatant in region")
    }

    pub fn get_mut(&mut self, id: EntityId) -> &mut Combatant {
        self.region.get_mut(id).expect("combatant in region")
    }

    pub fn launch(&mut self, request: &LaunchRequest) -> Result<Vec<LaunchStep>, LaunchError> {
        let mut ctx = LaunchContext::new(
            &self.region,
            &self.config,
            &self.notifier,
            &mut self.scheduler,
        );
        bolt_core::launch(request, &mut ctx)
    }

    /// Moves the clock forward and fires every due impact.
    pub fn advance(&mut self, ticks: u64) -> Vec<Resolution> {
        let now = self.region.now() + ticks;
        self.region.advance_to(now);
        self.region.expire_combat(self.config.combat_timeout);
        let env = CombatEnv::new(&self.stats, &self.config);
        let mut ctx = ImpactContext::new(
            &mut self.region,
            env,
            &mut self.dice,
            &self.notifier,
            &DefaultHooks,
        );
        self.scheduler.run_due(now, &mut ctx);
        ctx.resolutions
    }

    /// Resolves a bolt immediately, bypassing travel.
    pub fn strike(&mut self, caster: EntityId, target: EntityId, spell: &Arc<SpellProfile>) -> Resolution {
        let impact = BoltImpact::new(
            self.get(caster),
            self.get(target),
            Arc::clone(spell),
            self.region.now(),
        );
        let env = CombatEnv::new(&self.stats, &self.config);
        let mut ctx = ImpactContext::new(
            &mut self.region,
            env,
            &mut self.dice,
            &self.notifier,
            &DefaultHooks,
        );
        impact.resolve(&mut ctx)
    }
}

pub fn player(id: u32, name: &str) -> Combatant {
    Combatant::new(EntityId(id), name, EntityKind::Player, REGION)
        .with_level(50)
        .with_health(2_000)
}

pub fn creature(id: u32, name: &str) -> Combatant {
    Combatant::new(EntityId(id), name, EntityKind::Creature, REGION)
        .with_level(50)
        .with_health(5_000)
}

/// Player at the origin facing +y with a shield and a one-handed weapon.
pub fn shield_bearer(id: u32, name: &str, dexterity: i32, shield_spec: i32) -> Combatant {
    player(id, name)
        .facing(Heading::new(0))
        .with_attributes(Attributes {
            dexterity,
            shield_spec,
            ..Attributes::default()
        })
        .with_loadout(Loadout {
            main_hand: Some(WeaponHand::RightHand),
            off_hand: Some(OffHand::Shield),
        })
}

/// Somewhere in front of a combatant at the origin facing +y.
pub fn in_front(distance: i32) -> Position {
    Position::new(0, distance, 0)
}

pub fn heat_bolt(damage: f64) -> Arc<SpellProfile> {
    Arc::new(
        SpellProfile::bolt(1001, "Major Fire Bolt", damage, DamageType::Heat)
            .with_client_effect(55)
            .with_messages("A bolt of fire hits you!", "{0} is hit by a bolt of fire!"),
    )
}
