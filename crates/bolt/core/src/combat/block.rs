//! Shield block chance and the engage stance.

use crate::state::Tick;

pub const MIN_BLOCK_CHANCE: f64 = 1.0;
pub const MAX_BLOCK_CHANCE: f64 = 99.0;

/// Shield block chance against a bolt, in percent.
///
/// ```text
/// chance = (dex * 2 - 100) / 40 + 0.5 * shield_spec + 5 - 5 * con_level
/// ```
///
/// `con_level` is the caster's con relative to the blocker; a higher-level
/// caster is harder to block. The result is clamped to `[1, 99]`.
pub fn block_chance(dexterity: i32, shield_spec: i32, con_level: f64) -> f64 {
    let shield = 0.5 * f64::from(shield_spec);
    let chance = f64::from(dexterity * 2 - 100) / 40.0 + shield + 5.0 - con_level * 5.0;
    chance.clamp(MIN_BLOCK_CHANCE, MAX_BLOCK_CHANCE)
}

/// What an engage stance does for one incoming bolt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngageDecision {
    /// The engage target was attacked within the grace window; engage does
    /// nothing and the owner is told why.
    RecentlyAttacked,
    /// Owner cannot pay the endurance cost; the effect is cancelled.
    Exhausted,
    /// Owner pays the cost and the block chance is raised.
    Concentrate,
}

/// Decides how engage reacts to a bolt from its designated target.
pub fn decide_engage(
    engage_target_last_attacked: Option<Tick>,
    now: Tick,
    attack_delay: u64,
    owner_endurance: i32,
    endurance_cost: i32,
) -> EngageDecision {
    let window_start = i128::from(now.0) - i128::from(attack_delay);
    let recently_attacked =
        engage_target_last_attacked.is_some_and(|tick| i128::from(tick.0) > window_start);

    if recently_attacked {
        EngageDecision::RecentlyAttacked
    } else if owner_endurance < endurance_cost {
        EngageDecision::Exhausted
    } else {
        EngageDecision::Concentrate
    }
}

/// Block chance after engage has been considered.
pub fn engaged_block_chance(chance: f64, decision: EngageDecision, floor: f64) -> f64 {
    match decision {
        EngageDecision::Concentrate => chance.max(floor),
        EngageDecision::RecentlyAttacked | EngageDecision::Exhausted => chance,
    }
}

/// Roll in `[1, 100]`; the block succeeds when the chance reaches it.
pub fn is_blocked(chance: f64, roll: i32) -> bool {
    chance >= f64::from(roll)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shield_spec_ten_dex_sixty() {
        // (120 - 100) / 40 + 5 + 5
        let chance = block_chance(60, 10, 0.0);
        assert!((chance - 10.5).abs() < 1e-9);
        assert!(is_blocked(chance, 10));
        assert!(!is_blocked(chance, 11));
    }

    #[test]
    fn chance_is_clamped() {
        assert!((block_chance(10, 0, 3.0) - MIN_BLOCK_CHANCE).abs() < 1e-9);
        assert!((block_chance(400, 250, -3.0) - MAX_BLOCK_CHANCE).abs() < 1e-9);
    }

    #[test]
    fn higher_caster_con_lowers_chance() {
        let even = block_chance(100, 40, 0.0);
        let harder = block_chance(100, 40, 2.0);
        assert!((even - harder - 10.0).abs() < 1e-9);
    }

    #[test]
    fn engage_recent_attack_blocks_activation() {
        let decision = decide_engage(Some(Tick(15_000)), Tick(20_000), 10_000, 100, 15);
        assert_eq!(decision, EngageDecision::RecentlyAttacked);
        assert!((engaged_block_chance(12.0, decision, 95.0) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn engage_without_endurance_is_exhausted() {
        let decision = decide_engage(Some(Tick(1_000)), Tick(20_000), 10_000, 10, 15);
        assert_eq!(decision, EngageDecision::Exhausted);
    }

    #[test]
    fn engage_raises_chance_to_floor() {
        let decision = decide_engage(None, Tick(500), 10_000, 15, 15);
        assert_eq!(decision, EngageDecision::Concentrate);
        assert!((engaged_block_chance(12.0, decision, 95.0) - 95.0).abs() < 1e-9);
        assert!((engaged_block_chance(97.0, decision, 95.0) - 97.0).abs() < 1e-9);
    }

    #[test]
    fn engage_window_early_in_the_world_clock() {
        // Attacked at tick 0 while the clock is still inside the first window.
        let decision = decide_engage(Some(Tick(0)), Tick(500), 10_000, 100, 15);
        assert_eq!(decision, EngageDecision::RecentlyAttacked);
    }
}
