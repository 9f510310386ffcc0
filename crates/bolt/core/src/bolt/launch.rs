//! Turning a committed cast into travelling bolts.

use std::sync::Arc;

use crate::config::CombatConfig;
use crate::error::LaunchError;
use crate::message::{self, ChatKind};
use crate::schedule::{Scheduler, TimerId};
use crate::sink::{Notifier, SpellEffect};
use crate::spell::{SpellProfile, TargetShape};
use crate::state::{Combatant, EntityId, RegionState, Tick};

use super::impact::BoltImpact;

/// A cast whose cost has been paid and whose targets have been selected.
#[derive(Clone, Debug, PartialEq)]
pub struct LaunchRequest {
    pub caster: EntityId,
    pub targets: Vec<EntityId>,
    pub spell: Arc<SpellProfile>,
}

impl LaunchRequest {
    pub fn new(caster: EntityId, targets: Vec<EntityId>, spell: Arc<SpellProfile>) -> Self {
        Self {
            caster,
            targets,
            spell,
        }
    }

    pub fn single(caster: EntityId, target: EntityId, spell: Arc<SpellProfile>) -> Self {
        Self::new(caster, vec![target], spell)
    }
}

/// What happened to one target of a launch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LaunchStep {
    /// A bolt is in flight and lands at `fire_at`.
    Scheduled {
        target: EntityId,
        timer: TimerId,
        fire_at: Tick,
    },
    /// The target's client must confirm line of sight before the bolt flies.
    AwaitLineOfSight { target: EntityId },
    /// Structures shrug off non-siege spells; nothing was launched.
    Immune { target: EntityId },
}

impl LaunchStep {
    pub fn target(&self) -> EntityId {
        match *self {
            Self::Scheduled { target, .. }
            | Self::AwaitLineOfSight { target }
            | Self::Immune { target } => target,
        }
    }
}

/// Ticks a bolt needs to cover `distance` at `speed` units per 100 ticks.
pub fn travel_ticks(distance: u32, speed: u32) -> u64 {
    u64::from(distance) * 100 / u64::from(speed.max(1))
}

/// Animation delay sent to clients, in tenths of a second.
pub fn visual_delay(travel_ticks: u64) -> u64 {
    1 + travel_ticks / 100
}

/// Ticks from launch until the impact resolves.
pub fn impact_delay(travel_ticks: u64) -> u64 {
    1 + travel_ticks
}

/// Mutable view of a region used while launching.
pub struct LaunchContext<'a> {
    pub region: &'a RegionState,
    pub config: &'a CombatConfig,
    pub notifier: &'a dyn Notifier,
    pub scheduler: &'a mut Scheduler<BoltImpact>,
}

impl<'a> LaunchContext<'a> {
    pub fn new(
        region: &'a RegionState,
        config: &'a CombatConfig,
        notifier: &'a dyn Notifier,
        scheduler: &'a mut Scheduler<BoltImpact>,
    ) -> Self {
        Self {
            region,
            config,
            notifier,
            scheduler,
        }
    }
}

/// Launches one bolt per target.
///
/// The whole request is rejected before any side effect if the caster or any
/// target is unknown to the region.
pub fn launch(request: &LaunchRequest, ctx: &mut LaunchContext<'_>) -> Result<Vec<LaunchStep>, LaunchError> {
    let region = ctx.region;
    let now = region.now();
    let caster = region
        .get(request.caster)
        .ok_or_else(|| LaunchError::unknown_caster(request.caster, now))?;

    if request.targets.is_empty() {
        return Err(LaunchError::empty_targets(request.caster, caster.position, now));
    }

    let targets = request
        .targets
        .iter()
        .map(|&id| {
            region
                .get(id)
                .ok_or_else(|| LaunchError::unknown_target(request.caster, caster.position, id, now))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut steps = Vec::with_capacity(targets.len());
    for target in targets {
        let step = if target.kind.is_siege_target() && !request.spell.is_siege() {
            ctx.notifier.message(
                caster.id,
                ChatKind::SpellResisted,
                &message::spell_no_effect(&target.name),
            );
            LaunchStep::Immune { target: target.id }
        } else if target.kind.is_player() && request.spell.shape == TargetShape::Cone {
            LaunchStep::AwaitLineOfSight { target: target.id }
        } else {
            schedule_bolt(caster, target, Arc::clone(&request.spell), ctx)
        };
        steps.push(step);
    }

    Ok(steps)
}

/// Continues a launch after the target's client confirmed line of sight.
///
/// Both sides are looked up again by id; if either has left the region in the
/// meantime nothing is launched.
pub fn resume_after_line_of_sight(
    caster: EntityId,
    target: EntityId,
    spell: Arc<SpellProfile>,
    ctx: &mut LaunchContext<'_>,
) -> Option<LaunchStep> {
    let region = ctx.region;
    let caster = region.get(caster)?;
    let target = region.get(target)?;
    Some(schedule_bolt(caster, target, spell, ctx))
}

/// Broadcasts the travel animation and queues the impact.
pub fn schedule_bolt(
    caster: &Combatant,
    target: &Combatant,
    spell: Arc<SpellProfile>,
    ctx: &mut LaunchContext<'_>,
) -> LaunchStep {
    let now = ctx.region.now();
    let ticks = travel_ticks(caster.position.distance_to(&target.position), ctx.config.bolt_speed);
    let delay = impact_delay(ticks);

    ctx.notifier.spell_effect(SpellEffect {
        caster: caster.id,
        target: target.id,
        client_effect: spell.client_effect,
        delay: u16::try_from(visual_delay(ticks)).unwrap_or(u16::MAX),
        observers: ctx
            .region
            .players_near(&target.position, ctx.config.visibility_distance),
    });

    let fire_at = now + delay;
    let impact = BoltImpact::new(caster, target, spell, fire_at);
    let timer = ctx.scheduler.start(now, delay, impact);

    LaunchStep::Scheduled {
        target: target.id,
        timer,
        fire_at,
    }
}
