//! Read-only character statistics.

use crate::combat::{ArmorSlot, DamageType};
use crate::spell::SpellProfile;
use crate::state::{Combatant, Realm};

/// Relative difficulty of `to_level` as seen from `from_level`.
///
/// One con step per ten levels of the viewer (at least one level per step);
/// positive when the other side is higher.
pub fn con_level_between(from_level: u8, to_level: u8) -> f64 {
    let step = ((i32::from(from_level) + 9) / 10).max(1);
    f64::from(i32::from(to_level) - i32::from(from_level)) / f64::from(step)
}

/// Oracle answering stat queries about live combatants.
///
/// Only [`resist_chance`](StatsOracle::resist_chance) has no default; the rest
/// read the combatant record directly and can be overridden by servers that
/// derive stats differently.
pub trait StatsOracle: Send + Sync {
    /// Chance, in percent, that `target` resists `spell` cast by `caster`.
    fn resist_chance(&self, caster: &Combatant, target: &Combatant, spell: &SpellProfile) -> i32;

    /// Con level of `other` relative to `from`.
    fn con_level(&self, from: &Combatant, other: &Combatant) -> f64 {
        con_level_between(from.level, other.level)
    }

    /// Percent resistance of `target` to `damage_type`.
    fn resist(&self, target: &Combatant, damage_type: DamageType) -> i32 {
        if damage_type == DamageType::Natural {
            return 0;
        }
        target.resists.get(damage_type)
    }

    fn armor_factor(&self, target: &Combatant, slot: ArmorSlot) -> f64 {
        target.armor.get(&slot).map_or(0.0, |piece| piece.armor_factor)
    }

    fn armor_absorb(&self, target: &Combatant, slot: ArmorSlot) -> f64 {
        target.armor.get(&slot).map_or(0.0, |piece| piece.absorb)
    }

    fn dexterity(&self, combatant: &Combatant) -> i32 {
        combatant.attributes.dexterity
    }

    fn shield_spec(&self, combatant: &Combatant) -> i32 {
        combatant.attributes.shield_spec
    }

    fn spell_damage_bonus(&self, combatant: &Combatant) -> i32 {
        combatant.attributes.spell_damage_bonus
    }

    fn spell_critical_chance(&self, combatant: &Combatant) -> i32 {
        combatant.attributes.spell_critical_chance
    }

    /// Realm-wide magic damage bonus from relics, as a fraction.
    fn relic_bonus(&self, _realm: Realm) -> f64 {
        0.0
    }
}
