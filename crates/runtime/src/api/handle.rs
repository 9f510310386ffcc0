//! Cloneable façade for issuing commands to one region.
//!
//! [`RegionHandle`] hides channel plumbing and offers async helpers for
//! managing combatants, launching bolts, stepping a manual clock and streaming
//! events from specific topics.
use bolt_core::{
    Combatant, EntityId, LaunchRequest, LaunchStep, RegionId, Resolution, Tick,
};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, oneshot};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::{Command, Emigrant};

/// Read-only copy of a region at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSnapshot {
    pub region: RegionId,
    pub now: Tick,
    pub pending_bolts: usize,
    /// Players whose own roll sequence lives in this region.
    pub player_sequences: usize,
    pub combatants: Vec<Combatant>,
}

impl RegionSnapshot {
    pub fn get(&self, id: EntityId) -> Option<&Combatant> {
        self.combatants.iter().find(|combatant| combatant.id == id)
    }
}

/// Client-facing handle to interact with a region worker
#[derive(Clone)]
pub struct RegionHandle {
    region: RegionId,
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RegionHandle {
    pub(crate) fn new(region: RegionId, command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            region,
            command_tx,
            event_bus,
        }
    }

    pub fn region(&self) -> RegionId {
        self.region
    }

    /// Place a combatant in the region. Returns the record it replaced, if any.
    pub async fn spawn(&self, combatant: Combatant) -> Result<Option<Combatant>> {
        self.request(|reply| Command::Spawn {
            combatant: Box::new(combatant),
            reply,
        })
        .await
    }

    /// Remove a combatant from the region.
    pub async fn despawn(&self, entity: EntityId) -> Result<Option<Combatant>> {
        self.request(|reply| Command::Despawn { entity, reply }).await
    }

    /// Edit a live combatant in place.
    ///
    /// Fails with [`RuntimeError::UnknownEntity`] when the region does not
    /// host `entity`.
    pub async fn update<F>(&self, entity: EntityId, update: F) -> Result<()>
    where
        F: FnOnce(&mut Combatant) + Send + 'static,
    {
        let found = self
            .request(|reply| Command::Update {
                entity,
                update: Box::new(update),
                reply,
            })
            .await?;
        if found {
            Ok(())
        } else {
            Err(RuntimeError::UnknownEntity {
                entity,
                region: self.region,
            })
        }
    }

    /// Launch one bolt per target of a committed cast.
    pub async fn launch(&self, request: LaunchRequest) -> Result<Vec<LaunchStep>> {
        let steps = self
            .request(|reply| Command::Launch { request, reply })
            .await??;
        Ok(steps)
    }

    /// Move a manual clock forward and return every bolt that fired.
    ///
    /// Also works on a realtime clock, in which case the extra ticks are
    /// added on top of the elapsed time.
    pub async fn advance(&self, ticks: u64) -> Result<Vec<Resolution>> {
        self.request(|reply| Command::Advance { ticks, reply }).await
    }

    /// Query one combatant (read-only copy)
    pub async fn query(&self, entity: EntityId) -> Result<Option<Combatant>> {
        self.request(|reply| Command::Query { entity, reply }).await
    }

    /// Query the whole region (read-only copy)
    pub async fn snapshot(&self) -> Result<RegionSnapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// Every region of a runtime shares one bus; filter on the `region` field
    /// of the event to follow a single region.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Take a combatant out together with its roll sequence.
    pub(crate) async fn emigrate(&self, entity: EntityId) -> Result<Option<Emigrant>> {
        self.request(|reply| Command::Emigrate { entity, reply }).await
    }

    /// Hand a combatant from another region to this one.
    ///
    /// When the worker is gone before the command is queued, the emigrant
    /// comes back with the error.
    pub(crate) async fn immigrate(
        &self,
        emigrant: Emigrant,
    ) -> std::result::Result<Option<Combatant>, (RuntimeError, Option<Box<Emigrant>>)> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let command = Command::Immigrate {
            emigrant: Box::new(emigrant),
            reply: reply_tx,
        };
        if let Err(mpsc::error::SendError(command)) = self.command_tx.send(command).await {
            let returned = match command {
                Command::Immigrate { emigrant, .. } => Some(emigrant),
                _ => None,
            };
            return Err((RuntimeError::CommandChannelClosed, returned));
        }
        reply_rx
            .await
            .map_err(|err| (RuntimeError::ReplyChannelClosed(err), None))
    }

    /// Stop the worker. Bolts still in flight are dropped.
    pub(crate) async fn shutdown(&self) -> Result<()> {
        self.command_tx
            .send(Command::Shutdown)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }
}
