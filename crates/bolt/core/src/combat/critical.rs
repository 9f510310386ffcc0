//! Critical damage.

use crate::env::RandomSource;

/// Whether the caster's critical chance grants a critical allotment.
///
/// `roll` is in `[0, 100)`.
pub fn has_critical_allotment(critical_chance: i32, roll: u32) -> bool {
    i64::from(critical_chance) > i64::from(roll)
}

/// Upper bound of the critical bonus: players take half.
pub fn critical_cap(final_damage: i32, target_is_player: bool) -> i32 {
    if target_is_player {
        final_damage / 2
    } else {
        final_damage
    }
}

/// Rolls the critical bonus uniformly between 10% and 100% of the cap.
pub fn roll_critical(final_damage: i32, target_is_player: bool, rng: &mut dyn RandomSource) -> i32 {
    let cap = critical_cap(final_damage, target_is_player).max(0);
    rng.range(cap / 10, cap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ScriptedRandom;

    #[test]
    fn player_targets_halve_the_cap() {
        assert_eq!(critical_cap(300, true), 150);
        assert_eq!(critical_cap(300, false), 300);
    }

    #[test]
    fn critical_stays_within_bounds() {
        let mut low = ScriptedRandom::new(vec![0]);
        assert_eq!(roll_critical(300, true, &mut low), 15);

        // cap 300: range [30, 300] has 271 values
        let mut high = ScriptedRandom::new(vec![270]);
        assert_eq!(roll_critical(300, false, &mut high), 300);
    }

    #[test]
    fn allotment_follows_chance() {
        assert!(!has_critical_allotment(0, 0));
        assert!(has_critical_allotment(10, 9));
        assert!(!has_critical_allotment(10, 10));
    }
}
