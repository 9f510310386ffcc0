//! Line-of-sight checks answered by the target's client.
//!
//! A cone bolt aimed at a player is only launched once that player's client
//! confirms it can see the caster. The check is asynchronous; the region
//! worker keeps ticking while it is outstanding and re-resolves the target by
//! id when the answer arrives.

use async_trait::async_trait;
use bolt_core::EntityId;
use serde::{Deserialize, Serialize};

/// Raw answer to a line-of-sight query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LosResponse {
    pub flags: u16,
    /// Object the answer refers to; looked up again before use.
    pub target: EntityId,
}

impl LosResponse {
    pub const CLEAR: u16 = 0x100;

    pub fn clear(target: EntityId) -> Self {
        Self {
            flags: Self::CLEAR,
            target,
        }
    }

    pub fn blocked(target: EntityId) -> Self {
        Self { flags: 0, target }
    }

    pub fn is_clear(&self) -> bool {
        self.flags & Self::CLEAR == Self::CLEAR
    }
}

#[async_trait]
pub trait LineOfSight: Send + Sync {
    async fn check(&self, caster: EntityId, target: EntityId) -> LosResponse;
}

/// Open terrain: every check succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysClear;

#[async_trait]
impl LineOfSight for AlwaysClear {
    async fn check(&self, _caster: EntityId, target: EntityId) -> LosResponse {
        LosResponse::clear(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_clear_bit_matters() {
        let target = EntityId(4);
        assert!(LosResponse::clear(target).is_clear());
        assert!(!LosResponse::blocked(target).is_clear());
        assert!(LosResponse { flags: 0x1ff, target }.is_clear());
        assert!(!LosResponse { flags: 0x0ff, target }.is_clear());
    }
}
