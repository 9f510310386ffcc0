//! Table-driven stats oracle.

use std::collections::BTreeMap;

use bolt_core::{Combatant, OracleError, Realm, SpellProfile, StatsOracle};

/// Stats oracle with a level-gap resist chance and per-realm relic bonuses.
///
/// Everything not listed here falls through to the combatant record.
#[derive(Debug, Clone)]
pub struct TableStatsOracle {
    base_hit_chance: i32,
    relics: BTreeMap<Realm, f64>,
}

impl TableStatsOracle {
    pub const DEFAULT_BASE_HIT_CHANCE: i32 = 85;

    pub fn new() -> Self {
        Self {
            base_hit_chance: Self::DEFAULT_BASE_HIT_CHANCE,
            relics: BTreeMap::new(),
        }
    }

    /// Hit chance, in percent, between combatants of equal level.
    pub fn with_base_hit_chance(mut self, chance: i32) -> Result<Self, OracleError> {
        if !(0..=100).contains(&chance) {
            return Err(OracleError::HitChanceOutOfRange(chance));
        }
        self.base_hit_chance = chance;
        Ok(self)
    }

    /// Magic damage bonus granted to `realm` by captured relics, as a fraction.
    pub fn with_relic_bonus(mut self, realm: Realm, bonus: f64) -> Result<Self, OracleError> {
        if !(0.0..=1.0).contains(&bonus) {
            return Err(OracleError::RelicBonusOutOfRange { realm, bonus });
        }
        self.relics.insert(realm, bonus);
        Ok(self)
    }

    pub fn base_hit_chance(&self) -> i32 {
        self.base_hit_chance
    }
}

impl Default for TableStatsOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsOracle for TableStatsOracle {
    /// Half a percent per level of difference, in either direction.
    fn resist_chance(&self, caster: &Combatant, target: &Combatant, _spell: &SpellProfile) -> i32 {
        let gap = i32::from(target.level) - i32::from(caster.level);
        (100 - self.base_hit_chance + gap / 2).clamp(0, 100)
    }

    fn relic_bonus(&self, realm: Realm) -> f64 {
        self.relics.get(&realm).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bolt_core::{DamageType, EntityId, EntityKind, RegionId};

    fn combatant(level: u8) -> Combatant {
        Combatant::new(EntityId(1), "x", EntityKind::Player, RegionId(1)).with_level(level)
    }

    #[test]
    fn resist_chance_follows_the_level_gap() {
        let oracle = TableStatsOracle::new();
        let spell = SpellProfile::bolt(1, "bolt", 10.0, DamageType::Heat);

        assert_eq!(oracle.resist_chance(&combatant(50), &combatant(50), &spell), 15);
        assert_eq!(oracle.resist_chance(&combatant(40), &combatant(50), &spell), 20);
        assert_eq!(oracle.resist_chance(&combatant(50), &combatant(40), &spell), 10);
        assert_eq!(oracle.resist_chance(&combatant(50), &combatant(1), &spell), 0);
    }

    #[test]
    fn relic_table_is_validated() {
        let oracle = TableStatsOracle::new()
            .with_relic_bonus(Realm::Midgard, 0.1)
            .unwrap();
        assert_eq!(oracle.relic_bonus(Realm::Midgard), 0.1);
        assert_eq!(oracle.relic_bonus(Realm::Albion), 0.0);

        let err = TableStatsOracle::new()
            .with_relic_bonus(Realm::Albion, 1.5)
            .unwrap_err();
        assert_eq!(
            err,
            OracleError::RelicBonusOutOfRange {
                realm: Realm::Albion,
                bonus: 1.5
            }
        );
        assert_eq!(
            TableStatsOracle::new().with_base_hit_chance(101).unwrap_err(),
            OracleError::HitChanceOutOfRange(101)
        );
    }
}
