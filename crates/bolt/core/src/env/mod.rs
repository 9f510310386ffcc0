//! Read-only collaborators and random sources.
//!
//! The [`CombatEnv`] aggregate bundles what the launch and resolution steps
//! query without mutating: stat derivation and the tunable constants.
mod rng;
mod stats;

pub use rng::{
    Dice, NumberDeck, PcgRandom, PlayerSequence, RandomSource, ScriptedRandom, compute_seed,
};
pub use stats::{StatsOracle, con_level_between};

use crate::config::CombatConfig;

/// Aggregates read-only collaborators required by the bolt pipeline.
#[derive(Clone, Copy)]
pub struct CombatEnv<'a> {
    stats: &'a dyn StatsOracle,
    config: &'a CombatConfig,
}

impl<'a> CombatEnv<'a> {
    pub fn new(stats: &'a dyn StatsOracle, config: &'a CombatConfig) -> Self {
        Self { stats, config }
    }

    pub fn stats(&self) -> &'a dyn StatsOracle {
        self.stats
    }

    pub fn config(&self) -> &'a CombatConfig {
        self.config
    }
}

impl core::fmt::Debug for CombatEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CombatEnv")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}
