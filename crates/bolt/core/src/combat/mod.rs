//! Combat math for bolt impacts.
//!
//! This module provides pure functions for resolving bolt hits. None of them
//! touch world state; the resolution handler gathers inputs from live
//! combatants and feeds them through here.
//!
//! # Core Functions
//!
//! - `compute_miss_rate` / `is_miss`: resist, crowding, con and style bonuses
//! - `block_chance` / `decide_engage` / `is_blocked`: shield blocks
//! - `physical_component` / `cap_damage`: the damage formula
//! - `roll_critical`: critical bonus
//! - `hit_location_from_roll`: armor location for player targets

pub mod armor;
pub mod block;
pub mod critical;
pub mod damage;
pub mod miss;
pub mod outcome;

pub use armor::{ArmorSlot, hit_location_from_roll};
pub use block::{EngageDecision, block_chance, decide_engage, engaged_block_chance, is_blocked};
pub use critical::{critical_cap, has_critical_allotment, roll_critical};
pub use damage::{
    DamageType, PhysicalComponent, PhysicalInputs, apply_effectiveness, apply_spell_damage_bonus,
    armor_mitigation, base_armor_factor, cap_damage, physical_component, resist_modifier,
    weapon_skill_equivalent,
};
pub use miss::{MissRate, MissRateInputs, compute_miss_rate, count_nearby_attackers, is_miss};
pub use outcome::{AttackOutcome, HitFlags, HitResult};
