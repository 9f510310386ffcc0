//! Common error infrastructure for bolt-core.
//!
//! Staleness at impact time (dead target, region change, inactive object) is
//! not an error: the bolt simply expires. The types here cover caller bugs
//! detected when a launch is requested and invalid oracle configuration.

use crate::state::{EntityId, Position, Realm, Tick};

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: may succeed later with the same input
/// - **Validation**: invalid input, rejected without retry
/// - **Internal**: state inconsistency that needs investigation
/// - **Fatal**: the region cannot keep running
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Where and when an error was raised.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorContext {
    pub actor: Option<EntityId>,
    pub position: Option<Position>,
    /// Region clock when the error was raised.
    pub tick: Tick,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(tick: Tick) -> Self {
        Self {
            actor: None,
            position: None,
            tick,
        }
    }

    #[must_use]
    pub const fn with_actor(mut self, actor: EntityId) -> Self {
        self.actor = Some(actor);
        self
    }

    #[must_use]
    pub const fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }
}

/// Common trait for all bolt-core errors.
pub trait BoltError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Static identifier of the variant, for metrics and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// A launch request that cannot be turned into bolts.
///
/// These indicate a caller bug: the cast was committed against entities the
/// region does not know about.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LaunchError {
    #[error("caster {caster} is not in the region")]
    UnknownCaster { caster: EntityId, context: ErrorContext },

    #[error("target {target} is not in the region")]
    UnknownTarget { target: EntityId, context: ErrorContext },

    #[error("launch request from {caster} has no targets")]
    EmptyTargets { caster: EntityId, context: ErrorContext },
}

impl LaunchError {
    pub fn unknown_caster(caster: EntityId, tick: Tick) -> Self {
        Self::UnknownCaster {
            caster,
            context: ErrorContext::new(tick).with_actor(caster),
        }
    }

    /// `position` is where the caster stood when the cast was committed.
    pub fn unknown_target(caster: EntityId, position: Position, target: EntityId, tick: Tick) -> Self {
        Self::UnknownTarget {
            target,
            context: ErrorContext::new(tick).with_actor(caster).with_position(position),
        }
    }

    pub fn empty_targets(caster: EntityId, position: Position, tick: Tick) -> Self {
        Self::EmptyTargets {
            caster,
            context: ErrorContext::new(tick).with_actor(caster).with_position(position),
        }
    }
}

impl BoltError for LaunchError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::UnknownCaster { context, .. }
            | Self::UnknownTarget { context, .. }
            | Self::EmptyTargets { context, .. } => Some(context),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCaster { .. } => "LAUNCH_UNKNOWN_CASTER",
            Self::UnknownTarget { .. } => "LAUNCH_UNKNOWN_TARGET",
            Self::EmptyTargets { .. } => "LAUNCH_EMPTY_TARGETS",
        }
    }
}

/// Invalid stat oracle configuration.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum OracleError {
    #[error("relic bonus {bonus} for {realm:?} is outside [0, 1]")]
    RelicBonusOutOfRange { realm: Realm, bonus: f64 },

    #[error("base hit chance {0} is outside [0, 100]")]
    HitChanceOutOfRange(i32),
}

impl BoltError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::RelicBonusOutOfRange { .. } => "ORACLE_RELIC_BONUS_RANGE",
            Self::HitChanceOutOfRange(_) => "ORACLE_HIT_CHANCE_RANGE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_errors_are_validation_with_context() {
        let err = LaunchError::unknown_target(EntityId(1), Position::new(5, 6, 0), EntityId(9), Tick(40));
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert!(!err.severity().is_recoverable());
        assert_eq!(err.error_code(), "LAUNCH_UNKNOWN_TARGET");
        assert_eq!(err.context().and_then(|c| c.actor), Some(EntityId(1)));
        assert_eq!(err.context().and_then(|c| c.position), Some(Position::new(5, 6, 0)));
        assert_eq!(err.to_string(), "target #9 is not in the region");
    }
}
