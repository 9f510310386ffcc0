//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, launch validation and oracle
//! configuration so clients can bubble them up with consistent context.
use bolt_core::{
    BoltError, EntityId, ErrorContext, ErrorSeverity, LaunchError, OracleError, RegionId,
};
use thiserror::Error;
use tokio::sync::oneshot;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("region worker command channel closed")]
    CommandChannelClosed,

    #[error("region worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("region worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("{0} is not hosted by this runtime")]
    UnknownRegion(RegionId),

    #[error("{region} is hosted twice")]
    DuplicateRegion { region: RegionId },

    #[error("{entity} is not in {region}")]
    UnknownEntity { entity: EntityId, region: RegionId },

    #[error(transparent)]
    Launch(#[from] LaunchError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

impl BoltError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            // The region is gone; nothing sent to it will ever be processed.
            Self::CommandChannelClosed | Self::WorkerJoin(_) => ErrorSeverity::Fatal,
            Self::ReplyChannelClosed(_) => ErrorSeverity::Internal,
            // The entity may still arrive, e.g. while a transfer is in progress.
            Self::UnknownEntity { .. } => ErrorSeverity::Recoverable,
            Self::Launch(err) => err.severity(),
            Self::Oracle(err) => err.severity(),
            Self::UnknownRegion(_) | Self::DuplicateRegion { .. } | Self::InvalidConfig(_) => {
                ErrorSeverity::Validation
            }
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::Launch(err) => err.context(),
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::CommandChannelClosed => "RUNTIME_COMMAND_CHANNEL_CLOSED",
            Self::ReplyChannelClosed(_) => "RUNTIME_REPLY_CHANNEL_CLOSED",
            Self::WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
            Self::UnknownRegion(_) => "RUNTIME_UNKNOWN_REGION",
            Self::DuplicateRegion { .. } => "RUNTIME_DUPLICATE_REGION",
            Self::UnknownEntity { .. } => "RUNTIME_UNKNOWN_ENTITY",
            Self::Launch(err) => err.error_code(),
            Self::Oracle(err) => err.error_code(),
            Self::InvalidConfig(_) => "RUNTIME_INVALID_CONFIG",
        }
    }
}

#[cfg(test)]
mod tests {
    use bolt_core::{Position, Tick};

    use super::*;

    #[test]
    fn severity_separates_dead_regions_from_bad_input() {
        assert_eq!(RuntimeError::CommandChannelClosed.severity(), ErrorSeverity::Fatal);
        assert!(RuntimeError::CommandChannelClosed.severity().is_internal());
        assert_eq!(
            RuntimeError::InvalidConfig("bolt speed").severity(),
            ErrorSeverity::Validation
        );

        let missing = RuntimeError::UnknownEntity {
            entity: EntityId(4),
            region: RegionId(1),
        };
        assert!(missing.severity().is_recoverable());
        assert_eq!(missing.error_code(), "RUNTIME_UNKNOWN_ENTITY");
    }

    #[test]
    fn launch_errors_keep_their_code_and_context() {
        let err = RuntimeError::from(LaunchError::empty_targets(
            EntityId(1),
            Position::new(0, 850, 0),
            Tick(12),
        ));
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert_eq!(err.error_code(), "LAUNCH_EMPTY_TARGETS");
        assert_eq!(err.context().map(|c| c.tick), Some(Tick(12)));
    }
}
