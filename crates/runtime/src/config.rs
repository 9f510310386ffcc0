//! Runtime configuration structures and loaders.
use std::env;
use std::time::Duration;

use bolt_core::CombatConfig;
use serde::{Deserialize, Serialize};

use crate::api::{Result, RuntimeError};

/// How a region's clock moves forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockMode {
    /// Advance by the interval's milliseconds every time it elapses.
    Realtime(Duration),
    /// Advance only when asked through `RegionHandle::advance`.
    Manual,
}

impl ClockMode {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(50);

    pub fn is_realtime(&self) -> bool {
        matches!(self, ClockMode::Realtime(_))
    }
}

impl Default for ClockMode {
    fn default() -> Self {
        ClockMode::Realtime(Self::DEFAULT_INTERVAL)
    }
}

/// Runtime configuration shared across the orchestrator and region workers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub combat: CombatConfig,
    pub clock: ClockMode,
    pub command_buffer_size: usize,
    pub event_buffer_size: usize,
    /// Seed for every region's dice; each region mixes in its own id.
    pub seed: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            combat: CombatConfig::default(),
            clock: ClockMode::default(),
            command_buffer_size: 32,
            event_buffer_size: 256,
            seed: 0,
        }
    }
}

impl RuntimeConfig {
    /// Deterministic configuration driven by `RegionHandle::advance`.
    pub fn manual() -> Self {
        Self {
            clock: ClockMode::Manual,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_combat(mut self, combat: CombatConfig) -> Self {
        self.combat = combat;
        self
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BOLT_PVE_CON_HIT_PERCENT` - Miss chance per con level against creatures (default: 10)
    /// - `BOLT_ENGAGE_ENDURANCE_COST` - Endurance spent per engaged block (default: 15)
    /// - `BOLT_ENGAGE_ATTACK_DELAY` - Ticks after an attack during which engage fails (default: 10000)
    /// - `BOLT_COMBAT_TIMEOUT` - Ticks a combatant stays in combat after its last attack (default: 10000)
    /// - `BOLT_SPEED` - Bolt travel speed, units per 100 ticks (default: 85)
    /// - `BOLT_DAMAGE_CAP_MULTIPLIER` - Damage cap as a multiple of spell damage (default: 3)
    /// - `BOLT_VISIBILITY_DISTANCE` - Radius that sees travel animations (default: 3600)
    /// - `BOLT_TICK_INTERVAL_MS` - Realtime clock interval, `0` for a manual clock (default: 50)
    /// - `BOLT_COMMAND_BUFFER` - Region command queue size (default: 32)
    /// - `BOLT_EVENT_BUFFER` - Per-topic event buffer size (default: 256)
    /// - `BOLT_SEED` - Dice seed (default: random per process)
    ///
    /// Unparsable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        let combat = &mut config.combat;

        if let Some(percent) = read_env::<f64>("BOLT_PVE_CON_HIT_PERCENT") {
            combat.pve_spell_con_hit_percent = percent;
        }
        if let Some(cost) = read_env::<i32>("BOLT_ENGAGE_ENDURANCE_COST") {
            combat.engage_endurance_cost = cost.max(0);
        }
        if let Some(delay) = read_env::<u64>("BOLT_ENGAGE_ATTACK_DELAY") {
            combat.engage_attack_delay = delay;
        }
        if let Some(timeout) = read_env::<u64>("BOLT_COMBAT_TIMEOUT") {
            combat.combat_timeout = timeout;
        }
        if let Some(speed) = read_env::<u32>("BOLT_SPEED") {
            combat.bolt_speed = speed.max(1);
        }
        if let Some(multiplier) = read_env::<f64>("BOLT_DAMAGE_CAP_MULTIPLIER") {
            combat.damage_cap_multiplier = multiplier;
        }
        if let Some(distance) = read_env::<u32>("BOLT_VISIBILITY_DISTANCE") {
            combat.visibility_distance = distance;
        }

        if let Some(interval) = read_env::<u64>("BOLT_TICK_INTERVAL_MS") {
            config.clock = match interval {
                0 => ClockMode::Manual,
                ms => ClockMode::Realtime(Duration::from_millis(ms)),
            };
        }
        if let Some(capacity) = read_env::<usize>("BOLT_COMMAND_BUFFER") {
            config.command_buffer_size = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("BOLT_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }

        config.seed = read_env::<u64>("BOLT_SEED").unwrap_or_else(rand::random);

        config
    }

    /// Rejects values the workers cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.command_buffer_size == 0 {
            return Err(RuntimeError::InvalidConfig("command buffer must hold at least one command"));
        }
        if self.combat.bolt_speed == 0 {
            return Err(RuntimeError::InvalidConfig("bolt speed must be positive"));
        }
        if let ClockMode::Realtime(interval) = self.clock
            && interval.is_zero()
        {
            return Err(RuntimeError::InvalidConfig("realtime clock interval must be positive"));
        }
        let multiplier = self.combat.damage_cap_multiplier;
        if multiplier.is_nan() || multiplier <= 0.0 {
            return Err(RuntimeError::InvalidConfig("damage cap multiplier must be positive"));
        }
        Ok(())
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(RuntimeConfig::default().validate().is_ok());
        assert!(RuntimeConfig::manual().validate().is_ok());
    }

    #[test]
    fn zero_speed_and_empty_buffers_are_rejected() {
        let mut config = RuntimeConfig::manual();
        config.combat.bolt_speed = 0;
        assert!(matches!(config.validate(), Err(RuntimeError::InvalidConfig(_))));

        let config = RuntimeConfig {
            command_buffer_size: 0,
            ..RuntimeConfig::manual()
        };
        assert!(config.validate().is_err());

        let config = RuntimeConfig {
            clock: ClockMode::Realtime(Duration::ZERO),
            ..RuntimeConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
