//! Result of one bolt resolution.

use crate::state::EntityId;

use super::armor::ArmorSlot;
use super::damage::DamageType;

/// Final tag of an attack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitResult {
    #[default]
    Hit,
    Missed,
    Blocked,
}

bitflags::bitflags! {
    /// Delivery flags forwarded to clients with the damage.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct HitFlags: u8 {
        /// The bolt was (partially) blocked by a shield.
        const BLOCKED = 0x02;
        /// The bolt connected unhindered.
        const UNBLOCKED = 0x14;
    }
}

impl HitFlags {
    pub fn for_result(result: HitResult) -> Self {
        if result == HitResult::Blocked {
            Self::BLOCKED
        } else {
            Self::UNBLOCKED
        }
    }
}

/// Per-resolution attack record handed to the damage and notification sinks.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackOutcome {
    pub attacker: EntityId,
    pub target: EntityId,
    pub spell_id: u32,
    pub damage_type: DamageType,
    pub damage: i32,
    /// Damage before capping; equals `damage` for uncapped handlers.
    pub uncapped_damage: i32,
    pub critical_damage: i32,
    /// Sum of resist modifiers applied to both components.
    pub modifier: i32,
    pub armor_hit_location: ArmorSlot,
    pub result: HitResult,
    /// Miss or block caused by the target's own fighting.
    pub combat_miss: bool,
}

impl AttackOutcome {
    pub fn new(attacker: EntityId, target: EntityId, spell_id: u32, damage_type: DamageType) -> Self {
        Self {
            attacker,
            target,
            spell_id,
            damage_type,
            damage: 0,
            uncapped_damage: 0,
            critical_damage: 0,
            modifier: 0,
            armor_hit_location: ArmorSlot::Unspecified,
            result: HitResult::Hit,
            combat_miss: false,
        }
    }

    /// Damage plus critical bonus.
    pub fn total_damage(&self) -> i32 {
        self.damage.saturating_add(self.critical_damage)
    }

    pub fn is_miss(&self) -> bool {
        self.result == HitResult::Missed
    }

    pub fn is_blocked(&self) -> bool {
        self.result == HitResult::Blocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_follow_block_state() {
        assert_eq!(HitFlags::for_result(HitResult::Blocked).bits(), 0x02);
        assert_eq!(HitFlags::for_result(HitResult::Hit).bits(), 0x14);
    }
}
