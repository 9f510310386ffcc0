//! Miss-rate computation.
//!
//! Every contribution is summed into one pool without an upper bound; the roll
//! in [`is_miss`] is what turns it into a probability.

use crate::config::CombatConfig;
use crate::state::{EntityId, Position};

/// Everything the miss rate depends on, gathered at impact time.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MissRateInputs {
    /// Target's resist chance against the spell.
    pub base_resist: i32,
    /// Other attackers near an in-combat player target (player caster only).
    pub nearby_attackers: u32,
    /// Con level of the target relative to the caster, when a creature is involved.
    pub creature_con_level: Option<f64>,
    /// Defense bonus of the style the target last hit with.
    pub style_defense_bonus: Option<i32>,
    /// Doors and fortifications are never missed.
    pub siege_target: bool,
}

/// Final miss rate and whether combat caused it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MissRate {
    pub value: i32,
    /// The target's own fighting contributed; changes the miss wording only.
    pub combat_miss: bool,
}

/// Sums all miss-rate contributions.
///
/// ```text
/// miss = resist
///      + penalty * nearby_attackers
///      + trunc(pve_percent * con_level)
///      + style_defense_bonus
/// miss = 0 for siege targets
/// ```
pub fn compute_miss_rate(inputs: &MissRateInputs, config: &CombatConfig) -> MissRate {
    let mut rate = MissRate {
        value: inputs.base_resist,
        combat_miss: false,
    };

    if inputs.nearby_attackers > 0 {
        rate.value += config.attacker_miss_penalty * inputs.nearby_attackers as i32;
        rate.combat_miss = true;
    }

    if let Some(con) = inputs.creature_con_level {
        rate.value += (config.pve_spell_con_hit_percent * con) as i32;
    }

    if let Some(bonus) = inputs.style_defense_bonus {
        rate.value += bonus;
        rate.combat_miss = true;
    }

    if inputs.siege_target {
        rate.value = 0;
    }

    rate
}

/// Counts attackers other than `caster` within `radius` of the target.
pub fn count_nearby_attackers<I>(
    target_position: &Position,
    caster: EntityId,
    attackers: I,
    radius: u32,
) -> u32
where
    I: IntoIterator<Item = (EntityId, Position)>,
{
    attackers
        .into_iter()
        .filter(|(id, position)| *id != caster && target_position.distance_to(position) <= radius)
        .count() as u32
}

/// A roll in `[0, 100)` misses when it is strictly below the miss rate.
pub fn is_miss(miss_rate: i32, roll: u32) -> bool {
    i64::from(miss_rate) > i64::from(roll)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_attackers_add_sixty() {
        let inputs = MissRateInputs {
            base_resist: 10,
            nearby_attackers: 3,
            ..Default::default()
        };
        let rate = compute_miss_rate(&inputs, &CombatConfig::default());
        assert_eq!(rate.value, 70);
        assert!(rate.combat_miss);

        assert!(is_miss(rate.value, 69));
        assert!(!is_miss(rate.value, 70));
        assert!(!is_miss(rate.value, 99));
    }

    #[test]
    fn each_attacker_adds_exactly_the_penalty() {
        let config = CombatConfig::default();
        let mut previous = compute_miss_rate(&MissRateInputs::default(), &config).value;
        for n in 1..=6 {
            let inputs = MissRateInputs {
                nearby_attackers: n,
                ..Default::default()
            };
            let value = compute_miss_rate(&inputs, &config).value;
            assert_eq!(value - previous, 20);
            previous = value;
        }
    }

    #[test]
    fn con_level_contribution_truncates() {
        let inputs = MissRateInputs {
            base_resist: 5,
            creature_con_level: Some(1.5),
            ..Default::default()
        };
        let config = CombatConfig::default().with_pve_spell_con_hit_percent(7.0);
        // 5 + trunc(10.5)
        let rate = compute_miss_rate(&inputs, &config);
        assert_eq!(rate.value, 15);
        assert!(!rate.combat_miss);
    }

    #[test]
    fn lower_con_creature_reduces_miss() {
        let inputs = MissRateInputs {
            base_resist: 10,
            creature_con_level: Some(-2.0),
            ..Default::default()
        };
        assert_eq!(compute_miss_rate(&inputs, &CombatConfig::default()).value, -10);
    }

    #[test]
    fn style_bonus_marks_combat_miss() {
        let inputs = MissRateInputs {
            base_resist: 3,
            style_defense_bonus: Some(15),
            ..Default::default()
        };
        let rate = compute_miss_rate(&inputs, &CombatConfig::default());
        assert_eq!(rate.value, 18);
        assert!(rate.combat_miss);
    }

    #[test]
    fn siege_target_is_never_missed() {
        let inputs = MissRateInputs {
            base_resist: 40,
            nearby_attackers: 2,
            creature_con_level: Some(3.0),
            style_defense_bonus: Some(10),
            siege_target: true,
        };
        let rate = compute_miss_rate(&inputs, &CombatConfig::default());
        assert_eq!(rate.value, 0);
        for roll in 0..100 {
            assert!(!is_miss(rate.value, roll));
        }
    }

    #[test]
    fn nearby_attackers_exclude_caster_and_far_ones() {
        let target = Position::ORIGIN;
        let attackers = vec![
            (EntityId(1), Position::new(50, 0, 0)),  // caster
            (EntityId(2), Position::new(200, 0, 0)), // on the edge
            (EntityId(3), Position::new(201, 0, 0)), // too far
            (EntityId(4), Position::new(0, 10, 0)),
        ];
        assert_eq!(count_nearby_attackers(&target, EntityId(1), attackers, 200), 2);
    }
}
