//! Spell metadata carried by a bolt from launch to impact.

use crate::combat::DamageType;

/// Area shape of the spell's target selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetShape {
    #[default]
    Single,
    /// Frontal cone; player targets must pass a line-of-sight check.
    Cone,
    Area,
}

/// Handler variant driving the bolt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpellKind {
    #[default]
    Bolt,
    /// Siege arrow: uncapped damage.
    SiegeArrow,
    SiegeDirectDamage,
}

impl SpellKind {
    /// Spells that are allowed to affect doors and keep components.
    pub const fn is_siege(self) -> bool {
        matches!(self, Self::SiegeArrow | Self::SiegeDirectDamage)
    }

    pub const fn is_damage_capped(self) -> bool {
        !matches!(self, Self::SiegeArrow)
    }
}

/// Chat templates. `{0}` is replaced with the target's name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellMessages {
    /// Shown to the target on a hit, e.g. "A bolt of runic energy hits you!".
    pub target_hit: String,
    /// Shown to the caster and the area, e.g. "{0} is hit by a bolt of runic energy!".
    pub area_hit: String,
}

/// Read-only spell definition shared by every bolt of one cast.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellProfile {
    pub id: u32,
    pub name: String,
    /// Configured base damage.
    pub damage: f64,
    pub damage_type: DamageType,
    /// Visual effect id sent to clients.
    pub client_effect: u16,
    pub shape: TargetShape,
    pub kind: SpellKind,
    pub messages: SpellMessages,
}

impl SpellProfile {
    pub fn bolt(id: u32, name: impl Into<String>, damage: f64, damage_type: DamageType) -> Self {
        Self {
            id,
            name: name.into(),
            damage,
            damage_type,
            client_effect: 0,
            shape: TargetShape::Single,
            kind: SpellKind::Bolt,
            messages: SpellMessages {
                target_hit: "A bolt hits you!".to_string(),
                area_hit: "{0} is hit by a bolt!".to_string(),
            },
        }
    }

    pub fn with_kind(mut self, kind: SpellKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_shape(mut self, shape: TargetShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_client_effect(mut self, effect: u16) -> Self {
        self.client_effect = effect;
        self
    }

    pub fn with_messages(mut self, target_hit: impl Into<String>, area_hit: impl Into<String>) -> Self {
        self.messages = SpellMessages {
            target_hit: target_hit.into(),
            area_hit: area_hit.into(),
        };
        self
    }

    pub fn is_siege(&self) -> bool {
        self.kind.is_siege()
    }
}
