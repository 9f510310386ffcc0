//! Topic-based event bus for runtime events.
//!
//! Region workers publish to specific topics, and consumers subscribe only to
//! the topics they need.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{ChatEvent, CombatEvent, EffectEvent};
