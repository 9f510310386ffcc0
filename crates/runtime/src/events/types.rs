//! Event types for different topics.

use bolt_core::{AttackOutcome, ChatKind, EntityId, RegionId, SpellEffect, Tick};
use serde::{Deserialize, Serialize};

/// Bolt lifecycle inside a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// A bolt left the caster and will land at `fire_at`.
    BoltLaunched {
        region: RegionId,
        caster: EntityId,
        target: EntityId,
        fire_at: Tick,
    },

    /// The bolt waits for the target's client to confirm line of sight.
    AwaitingLineOfSight {
        region: RegionId,
        caster: EntityId,
        target: EntityId,
    },

    /// Line of sight was refused; no bolt was launched at this target.
    LineOfSightDenied {
        region: RegionId,
        caster: EntityId,
        target: EntityId,
    },

    /// The target cannot be harmed by this spell (siege structures).
    TargetImmune {
        region: RegionId,
        caster: EntityId,
        target: EntityId,
    },

    /// A bolt landed or missed. Expired bolts are not reported.
    BoltResolved {
        region: RegionId,
        at: Tick,
        outcome: AttackOutcome,
    },

    /// The launch request named entities the region does not know.
    LaunchRejected {
        region: RegionId,
        caster: EntityId,
        reason: String,
    },

    /// A combatant moved between regions.
    Transferred {
        entity: EntityId,
        from: RegionId,
        to: RegionId,
    },
}

/// Chat lines produced by combat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatEvent {
    /// Line for a single recipient.
    Direct {
        region: RegionId,
        to: EntityId,
        kind: ChatKind,
        text: String,
    },

    /// Line for everyone around `origin` except `excluded`.
    Area {
        region: RegionId,
        origin: EntityId,
        excluded: Vec<EntityId>,
        kind: ChatKind,
        text: String,
    },
}

impl ChatEvent {
    pub fn text(&self) -> &str {
        match self {
            ChatEvent::Direct { text, .. } | ChatEvent::Area { text, .. } => text,
        }
    }
}

/// Client-side visuals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectEvent {
    SpellEffect { region: RegionId, effect: SpellEffect },
    DamageNumbers { region: RegionId, outcome: AttackOutcome },
}
