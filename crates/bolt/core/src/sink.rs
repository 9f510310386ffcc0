//! Outbound collaborators: notifications and world mutations.
//!
//! [`Notifier`] carries everything players see or hear. [`CombatHooks`] owns
//! the few mutations a resolution performs on live combatants; its default
//! methods implement the standard behavior and servers override only what
//! they model differently.

use crate::combat::{AttackOutcome, HitFlags};
use crate::message::ChatKind;
use crate::state::{Combatant, EntityId, Tick};

/// Travel animation for one bolt.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellEffect {
    pub caster: EntityId,
    pub target: EntityId,
    pub client_effect: u16,
    /// Animation delay in tenths of a second; matches the impact delay.
    pub delay: u16,
    /// Players that should render the effect.
    pub observers: Vec<EntityId>,
}

/// Sink for visual effects and chat.
pub trait Notifier: Send + Sync {
    fn spell_effect(&self, effect: SpellEffect);

    /// Chat line for one recipient.
    fn message(&self, to: EntityId, kind: ChatKind, text: &str);

    /// Chat line for everyone around `origin` except `excluded`.
    fn area_message(&self, origin: EntityId, excluded: &[EntityId], kind: ChatKind, text: &str);

    /// Damage numbers shown over the target.
    fn damage_numbers(&self, outcome: &AttackOutcome);
}

/// Notifier that drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn spell_effect(&self, _effect: SpellEffect) {}

    fn message(&self, _to: EntityId, _kind: ChatKind, _text: &str) {}

    fn area_message(&self, _origin: EntityId, _excluded: &[EntityId], _kind: ChatKind, _text: &str) {}

    fn damage_numbers(&self, _outcome: &AttackOutcome) {}
}

/// Mutations a resolution applies to live combatants.
pub trait CombatHooks: Send + Sync {
    /// Target reacts to being attacked (hit or miss): AI wakes up, attacker
    /// is remembered.
    fn on_attacked_by_enemy(&self, target: &mut Combatant, outcome: &AttackOutcome, now: Tick) {
        target.combat.in_combat = true;
        target.combat.last_attacked_by_enemy = Some(now);
        target.combat.add_attacker(outcome.attacker, now);
    }

    /// Caster-side bookkeeping after an attack resolves.
    fn on_attack_enemy(&self, caster: &mut Combatant, _outcome: &AttackOutcome, now: Tick) {
        caster.combat.in_combat = true;
        caster.combat.last_attacked_enemy = Some(now);
    }

    /// Adds `attacker` to a creature's threat table.
    fn add_to_aggro_list(&self, creature: &mut Combatant, attacker: EntityId, weight: i64) {
        *creature.threat.entry(attacker).or_insert(0) += weight;
    }

    /// Applies the outcome to the target's health.
    ///
    /// `direct` distinguishes direct-damage spells from projectile delivery;
    /// `flags` tell clients whether the hit was blocked.
    fn apply_damage(
        &self,
        target: &mut Combatant,
        outcome: &AttackOutcome,
        _direct: bool,
        _flags: HitFlags,
        now: Tick,
    ) {
        self.on_attacked_by_enemy(target, outcome, now);
        if target.kind.is_creature() {
            let weight = i64::from(outcome.total_damage().max(1));
            self.add_to_aggro_list(target, outcome.attacker, weight);
        }
        target.health = target.health.saturating_sub(outcome.total_damage().max(0));
        if target.health <= 0 {
            target.health = 0;
            target.combat.in_combat = false;
            target.combat.attackers.clear();
        }
    }
}

/// Hooks using only the default behavior.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultHooks;

impl CombatHooks for DefaultHooks {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::DamageType;
    use crate::state::{EntityKind, RegionId};

    fn outcome(damage: i32, critical: i32) -> AttackOutcome {
        let mut outcome = AttackOutcome::new(EntityId(1), EntityId(2), 7, DamageType::Heat);
        outcome.damage = damage;
        outcome.critical_damage = critical;
        outcome
    }

    #[test]
    fn damage_includes_critical_and_kills_at_zero() {
        let mut target = Combatant::new(EntityId(2), "mob", EntityKind::Creature, RegionId(1))
            .with_health(100);
        DefaultHooks.apply_damage(&mut target, &outcome(60, 10), false, HitFlags::UNBLOCKED, Tick(5));
        assert_eq!(target.health, 30);
        assert_eq!(target.combat.last_attacked_by_enemy, Some(Tick(5)));
        assert_eq!(target.combat.attackers.get(&EntityId(1)), Some(&Tick(5)));
        assert_eq!(target.threat.get(&EntityId(1)), Some(&70));

        DefaultHooks.apply_damage(&mut target, &outcome(60, 0), false, HitFlags::UNBLOCKED, Tick(6));
        assert_eq!(target.health, 0);
        assert!(!target.is_alive());
    }

    #[test]
    fn aggro_accumulates() {
        let mut mob = Combatant::new(EntityId(2), "mob", EntityKind::Creature, RegionId(1));
        DefaultHooks.add_to_aggro_list(&mut mob, EntityId(1), 1);
        DefaultHooks.add_to_aggro_list(&mut mob, EntityId(1), 1);
        assert_eq!(mob.threat.get(&EntityId(1)), Some(&2));
    }
}
