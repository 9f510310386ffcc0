//! Event collection and rendering.

use std::collections::HashMap;

use anyhow::Result;
use bolt_runtime::{ChatEvent, CombatEvent, EffectEvent, Event, Topic};
use tokio::sync::broadcast::{Receiver, error::TryRecvError};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// One readable line per event, grouped by topic
    Text,
    /// One JSON object per line
    Json,
}

/// Drains every receiver, topic by topic.
pub fn collect(receivers: &mut HashMap<Topic, Receiver<Event>>) -> Vec<Event> {
    let mut events = Vec::new();
    for topic in Topic::ALL {
        let Some(rx) = receivers.get_mut(&topic) else {
            continue;
        };
        loop {
            match rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(topic = ?topic, skipped, "event buffer overflowed");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }
    events
}

pub fn print(events: &[Event], format: OutputFormat) -> Result<()> {
    for event in events {
        match format {
            OutputFormat::Text => println!("{}", describe(event)),
            OutputFormat::Json => println!("{}", serde_json::to_string(event)?),
        }
    }
    Ok(())
}

fn describe(event: &Event) -> String {
    match event {
        Event::Combat(combat) => match combat {
            CombatEvent::BoltLaunched {
                caster,
                target,
                fire_at,
                ..
            } => format!("[combat] {caster} launched a bolt at {target}, lands {fire_at}"),
            CombatEvent::AwaitingLineOfSight { caster, target, .. } => {
                format!("[combat] {caster} waits for line of sight to {target}")
            }
            CombatEvent::LineOfSightDenied { caster, target, .. } => {
                format!("[combat] {caster} cannot see {target}")
            }
            CombatEvent::TargetImmune { caster, target, .. } => {
                format!("[combat] {target} is immune to {caster}'s spell")
            }
            CombatEvent::BoltResolved { at, outcome, .. } => format!(
                "[combat] {at}: {} -> {} {:?} for {} {} (+{} critical, {} uncapped, {:?})",
                outcome.attacker,
                outcome.target,
                outcome.result,
                outcome.damage,
                outcome.damage_type,
                outcome.critical_damage,
                outcome.uncapped_damage,
                outcome.armor_hit_location,
            ),
            CombatEvent::LaunchRejected { caster, reason, .. } => {
                format!("[combat] launch by {caster} rejected: {reason}")
            }
            CombatEvent::Transferred { entity, from, to } => {
                format!("[combat] {entity} moved from {from} to {to}")
            }
        },
        Event::Chat(chat) => match chat {
            ChatEvent::Direct { to, kind, text, .. } => format!("[chat] {to} ({kind:?}): {text}"),
            ChatEvent::Area {
                origin, kind, text, ..
            } => format!("[chat] around {origin} ({kind:?}): {text}"),
        },
        Event::Effect(effect) => match effect {
            EffectEvent::SpellEffect { effect, .. } => format!(
                "[effect] spell effect {} from {} to {}, delay {}, seen by {}",
                effect.client_effect,
                effect.caster,
                effect.target,
                effect.delay,
                effect.observers.len()
            ),
            EffectEvent::DamageNumbers { outcome, .. } => {
                format!("[effect] {} takes {}", outcome.target, outcome.damage + outcome.critical_damage)
            }
        },
    }
}
