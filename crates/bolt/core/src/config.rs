/// Tunable combat constants consumed by the launch and resolution steps.
///
/// Passed explicitly to every call that needs it; nothing reads global state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Miss chance added per con level when a creature is involved.
    pub pve_spell_con_hit_percent: f64,
    /// Endurance spent each time engage raises the block chance.
    pub engage_endurance_cost: i32,
    /// Ticks after being attacked during which an engage target cannot be engaged.
    pub engage_attack_delay: u64,
    /// Minimum block chance granted by a working engage.
    pub engage_block_floor: f64,
    /// Ticks after its last attack during which a combatant stays in combat
    /// and an attacker still counts as attacking it.
    pub combat_timeout: u64,
    /// Bolt travel speed in distance units per 100 ticks.
    pub bolt_speed: u32,
    /// Radius around the target in which other attackers cause combat misses.
    pub combat_miss_radius: u32,
    /// Miss chance added per qualifying nearby attacker.
    pub attacker_miss_penalty: i32,
    /// Fraction of spell damage resolved as magic on impact.
    pub magic_effectiveness: f64,
    /// Damage cap as a multiple of base spell damage.
    pub damage_cap_multiplier: f64,
    /// Radius in which players see the travel animation.
    pub visibility_distance: u32,
    /// Frontal arc, in degrees, within which a shield can block.
    pub block_arc: u16,
    /// Frontal arc, in degrees, covered by Nature's Shield.
    pub natures_shield_arc: u16,
    /// Style id of Nature's Shield.
    pub natures_shield_style: u16,
}

impl CombatConfig {
    pub const DEFAULT_PVE_SPELL_CON_HIT_PERCENT: f64 = 10.0;
    pub const DEFAULT_ENGAGE_ENDURANCE_COST: i32 = 15;
    pub const DEFAULT_ENGAGE_ATTACK_DELAY: u64 = 10_000;
    pub const DEFAULT_ENGAGE_BLOCK_FLOOR: f64 = 95.0;
    pub const DEFAULT_COMBAT_TIMEOUT: u64 = 10_000;
    pub const DEFAULT_BOLT_SPEED: u32 = 85;
    pub const DEFAULT_COMBAT_MISS_RADIUS: u32 = 200;
    pub const DEFAULT_ATTACKER_MISS_PENALTY: i32 = 20;
    pub const DEFAULT_MAGIC_EFFECTIVENESS: f64 = 0.65;
    pub const DEFAULT_DAMAGE_CAP_MULTIPLIER: f64 = 3.0;
    pub const DEFAULT_VISIBILITY_DISTANCE: u32 = 3600;
    pub const DEFAULT_BLOCK_ARC: u16 = 180;
    pub const DEFAULT_NATURES_SHIELD_ARC: u16 = 120;
    pub const NATURES_SHIELD_STYLE_ID: u16 = 394;

    pub fn new() -> Self {
        Self {
            pve_spell_con_hit_percent: Self::DEFAULT_PVE_SPELL_CON_HIT_PERCENT,
            engage_endurance_cost: Self::DEFAULT_ENGAGE_ENDURANCE_COST,
            engage_attack_delay: Self::DEFAULT_ENGAGE_ATTACK_DELAY,
            engage_block_floor: Self::DEFAULT_ENGAGE_BLOCK_FLOOR,
            combat_timeout: Self::DEFAULT_COMBAT_TIMEOUT,
            bolt_speed: Self::DEFAULT_BOLT_SPEED,
            combat_miss_radius: Self::DEFAULT_COMBAT_MISS_RADIUS,
            attacker_miss_penalty: Self::DEFAULT_ATTACKER_MISS_PENALTY,
            magic_effectiveness: Self::DEFAULT_MAGIC_EFFECTIVENESS,
            damage_cap_multiplier: Self::DEFAULT_DAMAGE_CAP_MULTIPLIER,
            visibility_distance: Self::DEFAULT_VISIBILITY_DISTANCE,
            block_arc: Self::DEFAULT_BLOCK_ARC,
            natures_shield_arc: Self::DEFAULT_NATURES_SHIELD_ARC,
            natures_shield_style: Self::NATURES_SHIELD_STYLE_ID,
        }
    }

    pub fn with_pve_spell_con_hit_percent(mut self, percent: f64) -> Self {
        self.pve_spell_con_hit_percent = percent;
        self
    }

    pub fn with_bolt_speed(mut self, speed: u32) -> Self {
        self.bolt_speed = speed.max(1);
        self
    }

    pub fn with_engage(mut self, endurance_cost: i32, attack_delay: u64) -> Self {
        self.engage_endurance_cost = endurance_cost;
        self.engage_attack_delay = attack_delay;
        self
    }

    pub fn with_combat_timeout(mut self, timeout: u64) -> Self {
        self.combat_timeout = timeout;
        self
    }

    /// Maximum damage a bolt may deal at the given effectiveness.
    pub fn damage_cap(&self, spell_damage: f64, effectiveness: f64) -> f64 {
        spell_damage * self.damage_cap_multiplier * effectiveness
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
