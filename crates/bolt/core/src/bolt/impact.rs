//! The in-flight bolt record.

use std::sync::Arc;

use crate::combat::AttackOutcome;
use crate::env::{CombatEnv, Dice};
use crate::schedule::TimedAction;
use crate::sink::{CombatHooks, Notifier};
use crate::spell::SpellProfile;
use crate::state::{Combatant, EntityId, RegionState, Tick};

/// A bolt travelling towards its target.
///
/// Holds ids only. Both sides are looked up again when the bolt lands, so a
/// target that died, despawned or changed region in the meantime is never
/// touched.
#[derive(Clone, Debug, PartialEq)]
pub struct BoltImpact {
    pub caster: EntityId,
    pub target: EntityId,
    pub spell: Arc<SpellProfile>,
    pub fire_at: Tick,
}

impl BoltImpact {
    /// Built from live combatants so that a missing side cannot be represented.
    pub fn new(caster: &Combatant, target: &Combatant, spell: Arc<SpellProfile>, fire_at: Tick) -> Self {
        Self {
            caster: caster.id,
            target: target.id,
            spell,
            fire_at,
        }
    }
}

/// How one impact ended.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Resolution {
    /// The target was no longer valid; nothing happened.
    Expired { caster: EntityId, target: EntityId },
    Missed(AttackOutcome),
    /// The bolt connected, possibly blocked.
    Landed(AttackOutcome),
}

impl Resolution {
    pub fn outcome(&self) -> Option<&AttackOutcome> {
        match self {
            Self::Expired { .. } => None,
            Self::Missed(outcome) | Self::Landed(outcome) => Some(outcome),
        }
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired { .. })
    }
}

/// Everything an impact may read or mutate when it fires.
pub struct ImpactContext<'a> {
    pub region: &'a mut RegionState,
    pub env: CombatEnv<'a>,
    pub dice: &'a mut Dice,
    pub notifier: &'a dyn Notifier,
    pub hooks: &'a dyn CombatHooks,
    /// Resolutions of every impact fired with this context, in firing order.
    pub resolutions: Vec<Resolution>,
}

impl<'a> ImpactContext<'a> {
    pub fn new(
        region: &'a mut RegionState,
        env: CombatEnv<'a>,
        dice: &'a mut Dice,
        notifier: &'a dyn Notifier,
        hooks: &'a dyn CombatHooks,
    ) -> Self {
        Self {
            region,
            env,
            dice,
            notifier,
            hooks,
            resolutions: Vec::new(),
        }
    }
}

impl<'a> TimedAction<ImpactContext<'a>> for BoltImpact {
    fn on_tick(&mut self, _now: Tick, ctx: &mut ImpactContext<'a>) -> u32 {
        let resolution = self.resolve(ctx);
        ctx.resolutions.push(resolution);
        0
    }
}
