//! Damage formula for bolt impacts.
//!
//! A bolt's damage has two layers: a magic component resolved from the spell's
//! configured damage at reduced effectiveness, and a physical component that is
//! mitigated by armor like a melee swing. Both are reduced by the target's
//! resistance to the spell's damage type.

/// Damage type for resistances and damage calculation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageType {
    Crush,
    Slash,
    Thrust,
    Body,
    Cold,
    Energy,
    Heat,
    Matter,
    Spirit,
    /// Ignores all resistances.
    Natural,
}

/// Applies a percentage spell-damage bonus, truncating toward zero.
pub fn apply_spell_damage_bonus(damage: i32, bonus_percent: i32) -> i32 {
    (f64::from(damage) * (1.0 + f64::from(bonus_percent) * 0.01)) as i32
}

/// Signed damage change caused by a percent resistance.
///
/// Positive resists produce a negative modifier; negative resists (weaknesses)
/// a positive one.
pub fn resist_modifier(damage: f64, resist_percent: i32) -> i32 {
    (damage * f64::from(resist_percent) / -100.0) as i32
}

/// Caster's weapon-skill equivalent used to push the physical component
/// through armor.
///
/// ```text
/// ws = level * 2.85 * (1 + (dexterity - 50) / 200)
/// ```
pub fn weapon_skill_equivalent(level: u8, dexterity: i32) -> f64 {
    f64::from(level) * 2.85 * (1.0 + f64::from(dexterity - 50) / 200.0)
}

/// Armor factor every target has before items: players scale with level,
/// everything else uses a flat value.
pub fn base_armor_factor(is_player: bool, level: u8) -> f64 {
    if is_player {
        f64::from(level) * 45.0 / 50.0
    } else {
        45.0
    }
}

/// Denominator of the physical formula.
///
/// ```text
/// armor_mod = (base_af + location_af) / (1 - absorb)
/// ```
///
/// Absorb is kept below 1 and the result at least 1 so a degenerate armor
/// table cannot produce infinite or negative damage.
pub fn armor_mitigation(base_af: f64, location_af: f64, absorb: f64) -> f64 {
    let absorb = absorb.clamp(0.0, 0.99);
    ((base_af + location_af) / (1.0 - absorb)).max(1.0)
}

/// Inputs of the physical component, all read at impact time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicalInputs {
    pub spell_damage: f64,
    pub caster_level: u8,
    pub caster_dexterity: i32,
    pub target_is_player: bool,
    pub target_level: u8,
    pub location_armor_factor: f64,
    pub location_absorb: f64,
    pub resist_percent: i32,
    pub spell_damage_bonus: i32,
    pub relic_bonus: f64,
}

/// Result of the physical component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PhysicalComponent {
    /// Damage to add on top of the magic component, never negative.
    pub damage: i32,
    /// Resist modifier applied to this component.
    pub modifier: i32,
}

/// Computes the physical half of a bolt.
///
/// ```text
/// damage  = spell_damage / 2 * ws / armor_mod
/// damage += resist_modifier(damage)
/// damage *= (1 + spell_damage_bonus%) * (1 + relic_bonus)
/// damage  = max(damage, 0)
/// ```
pub fn physical_component(inputs: &PhysicalInputs) -> PhysicalComponent {
    let ws = weapon_skill_equivalent(inputs.caster_level, inputs.caster_dexterity);
    let base_af = base_armor_factor(inputs.target_is_player, inputs.target_level);
    let armor_mod = armor_mitigation(base_af, inputs.location_armor_factor, inputs.location_absorb);

    let mut damage = inputs.spell_damage / 2.0;
    damage *= ws / armor_mod;

    let modifier = resist_modifier(damage, inputs.resist_percent);
    damage += f64::from(modifier);

    damage *= 1.0 + f64::from(inputs.spell_damage_bonus) * 0.01;
    damage *= 1.0 + inputs.relic_bonus;

    if damage < 0.0 {
        damage = 0.0;
    }

    PhysicalComponent {
        damage: damage as i32,
        modifier,
    }
}

/// Caps `damage` at `cap`, returning `(capped, uncapped)`.
pub fn cap_damage(damage: i32, cap: f64) -> (i32, i32) {
    let capped = f64::from(damage).min(cap) as i32;
    (capped, damage)
}

/// Scales by the caster's overall effectiveness, truncating.
pub fn apply_effectiveness(damage: i32, effectiveness: f64) -> i32 {
    (f64::from(damage) * effectiveness) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> PhysicalInputs {
        PhysicalInputs {
            spell_damage: 400.0,
            caster_level: 50,
            caster_dexterity: 50,
            target_is_player: false,
            target_level: 50,
            location_armor_factor: 0.0,
            location_absorb: 0.0,
            resist_percent: 0,
            spell_damage_bonus: 0,
            relic_bonus: 0.0,
        }
    }

    #[test]
    fn weapon_skill_scales_with_dexterity() {
        assert!((weapon_skill_equivalent(50, 50) - 142.5).abs() < 1e-9);
        assert!((weapon_skill_equivalent(50, 250) - 285.0).abs() < 1e-9);
    }

    #[test]
    fn base_af_for_players_scales_with_level() {
        assert!((base_armor_factor(true, 50) - 45.0).abs() < 1e-9);
        assert!((base_armor_factor(true, 25) - 22.5).abs() < 1e-9);
        assert!((base_armor_factor(false, 1) - 45.0).abs() < 1e-9);
    }

    #[test]
    fn physical_component_against_unarmored_npc() {
        // 200 * 142.5 / 45 = 633.33
        let physical = physical_component(&inputs());
        assert_eq!(physical.damage, 633);
        assert_eq!(physical.modifier, 0);
    }

    #[test]
    fn physical_component_applies_resist_and_bonuses() {
        let mut i = inputs();
        i.resist_percent = 10;
        i.spell_damage_bonus = 10;
        i.relic_bonus = 0.1;
        let physical = physical_component(&i);
        // 633.33 - 63 = 570.33; * 1.1 * 1.1 = 690.1
        assert_eq!(physical.modifier, -63);
        assert_eq!(physical.damage, 690);
    }

    #[test]
    fn physical_component_never_negative() {
        let mut i = inputs();
        i.resist_percent = 250;
        assert_eq!(physical_component(&i).damage, 0);
    }

    #[test]
    fn degenerate_absorb_is_bounded() {
        assert!(armor_mitigation(45.0, 0.0, 1.0).is_finite());
        assert!(armor_mitigation(0.0, 0.0, 0.0) >= 1.0);
    }

    #[test]
    fn capping_keeps_uncapped_value() {
        assert_eq!(cap_damage(1500, 1200.0), (1200, 1500));
        assert_eq!(cap_damage(300, 1200.0), (300, 300));
    }

    #[test]
    fn resist_modifier_sign() {
        assert_eq!(resist_modifier(100.0, 20), -20);
        assert_eq!(resist_modifier(100.0, -10), 10);
        assert_eq!(apply_spell_damage_bonus(260, 10), 286);
    }
}
