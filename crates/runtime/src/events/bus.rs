//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

use super::types::{ChatEvent, CombatEvent, EffectEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Launches, resolutions and rejections
    Combat,
    /// Chat lines sent to players
    Chat,
    /// Spell animations and damage numbers
    Effects,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Combat, Topic::Chat, Topic::Effects];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Combat(CombatEvent),
    Chat(ChatEvent),
    Effect(EffectEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Combat(_) => Topic::Combat,
            Event::Chat(_) => Topic::Chat,
            Event::Effect(_) => Topic::Effects,
        }
    }
}

struct Channels {
    combat: broadcast::Sender<Event>,
    chat: broadcast::Sender<Event>,
    effects: broadcast::Sender<Event>,
}

impl Channels {
    fn get(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Combat => &self.combat,
            Topic::Chat => &self.chat,
            Topic::Effects => &self.effects,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing never blocks; events sent while a topic
/// has no subscribers are dropped.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Channels {
                combat: broadcast::channel(capacity).0,
                chat: broadcast::channel(capacity).0,
                effects: broadcast::channel(capacity).0,
            }),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channels.get(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels.get(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bolt_core::{EntityId, RegionId};

    fn rejected() -> Event {
        Event::Combat(CombatEvent::LaunchRejected {
            region: RegionId(1),
            caster: EntityId(1),
            reason: "no targets".into(),
        })
    }

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let bus = EventBus::new();
        let mut combat = bus.subscribe(Topic::Combat);
        let mut chat = bus.subscribe(Topic::Chat);

        bus.publish(rejected());

        assert_eq!(combat.recv().await.unwrap(), rejected());
        assert!(chat.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_silent() {
        let bus = EventBus::with_capacity(0);
        bus.publish(rejected());
    }
}
