//! Runtime orchestration for deferred bolt combat.
//!
//! This crate hosts `bolt-core` regions on tokio: one worker task per region
//! owns its combatants and bolt scheduler, drives its clock and publishes
//! everything players would see on a topic-based event bus. Consumers embed
//! [`Runtime`] to host regions and talk to each one through a [`RegionHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`config`] loads runtime settings from the environment
//! - [`los`] and [`oracle`] provide default collaborator implementations
//! - `workers` keeps the region tasks internal to the crate
pub mod api;
pub mod config;
pub mod events;
pub mod los;
pub mod notify;
pub mod oracle;
pub mod runtime;

mod workers;

pub use api::{RegionHandle, RegionSnapshot, Result, RuntimeError};
pub use config::{ClockMode, RuntimeConfig};
pub use events::{ChatEvent, CombatEvent, EffectEvent, Event, EventBus, Topic};
pub use los::{AlwaysClear, LineOfSight, LosResponse};
pub use notify::EventBusNotifier;
pub use oracle::TableStatsOracle;
pub use runtime::{Runtime, RuntimeBuilder};
