//! [`Notifier`] that forwards everything to the [`EventBus`].

use bolt_core::{AttackOutcome, ChatKind, EntityId, Notifier, RegionId, SpellEffect};

use crate::events::{ChatEvent, EffectEvent, Event, EventBus};

/// Publishes a region's chat and visuals on the `Chat` and `Effects` topics.
#[derive(Clone)]
pub struct EventBusNotifier {
    region: RegionId,
    bus: EventBus,
}

impl EventBusNotifier {
    pub fn new(region: RegionId, bus: EventBus) -> Self {
        Self { region, bus }
    }
}

impl Notifier for EventBusNotifier {
    fn spell_effect(&self, effect: SpellEffect) {
        self.bus.publish(Event::Effect(EffectEvent::SpellEffect {
            region: self.region,
            effect,
        }));
    }

    fn message(&self, to: EntityId, kind: ChatKind, text: &str) {
        self.bus.publish(Event::Chat(ChatEvent::Direct {
            region: self.region,
            to,
            kind,
            text: text.to_string(),
        }));
    }

    fn area_message(&self, origin: EntityId, excluded: &[EntityId], kind: ChatKind, text: &str) {
        self.bus.publish(Event::Chat(ChatEvent::Area {
            region: self.region,
            origin,
            excluded: excluded.to_vec(),
            kind,
            text: text.to_string(),
        }));
    }

    fn damage_numbers(&self, outcome: &AttackOutcome) {
        self.bus.publish(Event::Effect(EffectEvent::DamageNumbers {
            region: self.region,
            outcome: outcome.clone(),
        }));
    }
}
