//! Deterministic bolt combat rules.
//!
//! `bolt-core` turns a committed spell cast into travelling bolts and resolves
//! each bolt when it lands: miss rate, shield block, the two-layer damage
//! formula, capping, critical hits and the resulting messages. It performs no
//! I/O and no logging; stat queries, notifications and world mutations go
//! through the traits in [`env`] and [`sink`], and the clock is driven by
//! whoever owns the region's [`Scheduler`].
pub mod bolt;
pub mod combat;
pub mod config;
pub mod env;
pub mod error;
pub mod message;
pub mod schedule;
pub mod sink;
pub mod spell;
pub mod state;

pub use bolt::{
    BoltImpact, ImpactContext, LaunchContext, LaunchRequest, LaunchStep, Resolution, launch,
    resume_after_line_of_sight,
};
pub use combat::{AttackOutcome, DamageType, HitFlags, HitResult};
pub use config::CombatConfig;
pub use env::{
    CombatEnv, Dice, NumberDeck, PcgRandom, PlayerSequence, RandomSource, ScriptedRandom,
    StatsOracle,
};
pub use error::{BoltError, ErrorContext, ErrorSeverity, LaunchError, OracleError};
pub use message::ChatKind;
pub use schedule::{Scheduler, TimedAction, TimerId};
pub use sink::{CombatHooks, DefaultHooks, Notifier, SilentNotifier, SpellEffect};
pub use spell::{SpellKind, SpellMessages, SpellProfile, TargetShape};
pub use state::{
    Combatant, EntityId, EntityKind, Heading, ObjectState, Position, Realm, RegionId, RegionState,
    Tick,
};
