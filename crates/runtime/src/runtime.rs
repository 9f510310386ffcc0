//! High-level runtime orchestrator.
//!
//! The runtime owns one worker per hosted region, wires up command and event
//! channels, and exposes a builder-based API for clients to drive combat.

use std::collections::BTreeMap;
use std::sync::Arc;

use bolt_core::{CombatHooks, DefaultHooks, Dice, EntityId, RegionId, RegionState, StatsOracle};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::api::{RegionHandle, Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::events::{CombatEvent, Event, EventBus, Topic};
use crate::los::{AlwaysClear, LineOfSight};
use crate::oracle::TableStatsOracle;
use crate::workers::{Command, Emigrant, RegionServices, RegionWorker};

struct HostedRegion {
    handle: RegionHandle,
    worker: JoinHandle<()>,
}

/// Main runtime that hosts region workers
///
/// Design: Runtime owns workers and coordinates cross-region operations.
/// [`RegionHandle`] provides a cloneable façade for clients of one region.
pub struct Runtime {
    config: RuntimeConfig,
    event_bus: EventBus,
    regions: BTreeMap<RegionId, HostedRegion>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Get a cloneable handle to one region
    pub fn region(&self, region: RegionId) -> Result<RegionHandle> {
        self.regions
            .get(&region)
            .map(|hosted| hosted.handle.clone())
            .ok_or(RuntimeError::UnknownRegion(region))
    }

    /// Ids of every hosted region, in order.
    pub fn regions(&self) -> impl Iterator<Item = RegionId> + '_ {
        self.regions.keys().copied()
    }

    /// Subscribe to events from every region on one topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Move a combatant to another region.
    ///
    /// Bolts already flying at it from `from` expire when they land; the
    /// combatant keeps its id and its own roll sequence. If `to` cannot take
    /// it, the combatant is put back into `from`.
    pub async fn transfer(&self, entity: EntityId, from: RegionId, to: RegionId) -> Result<()> {
        let source = self.region(from)?;
        let destination = self.region(to)?;

        let mut emigrant = source
            .emigrate(entity)
            .await?
            .ok_or(RuntimeError::UnknownEntity { entity, region: from })?;
        let fallback = emigrant.combatant.clone();
        emigrant.combatant.region = to;

        if let Err((err, returned)) = destination.immigrate(emigrant).await {
            warn!(
                target: "runtime::region",
                entity = %entity,
                from = %from,
                to = %to,
                error = %err,
                "transfer failed, returning combatant"
            );
            let mut emigrant = returned.map(|emigrant| *emigrant).unwrap_or(Emigrant {
                combatant: fallback,
                sequence: None,
            });
            emigrant.combatant.region = from;
            if let Err((restore_err, _)) = source.immigrate(emigrant).await {
                error!(
                    target: "runtime::region",
                    entity = %entity,
                    region = %from,
                    error = %restore_err,
                    "combatant lost during transfer"
                );
            }
            return Err(err);
        }

        info!(
            target: "runtime::region",
            entity = %entity,
            from = %from,
            to = %to,
            "combatant transferred"
        );
        self.event_bus
            .publish(Event::Combat(CombatEvent::Transferred { entity, from, to }));
        Ok(())
    }

    /// Shutdown the runtime gracefully
    ///
    /// Every worker stops after the commands already queued; bolts still in
    /// flight are dropped.
    pub async fn shutdown(self) -> Result<()> {
        for hosted in self.regions.values() {
            // A worker that already stopped has nothing left to shut down.
            let _ = hosted.handle.shutdown().await;
        }
        for (_, hosted) in self.regions {
            hosted.worker.await.map_err(RuntimeError::WorkerJoin)?;
        }
        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    regions: Vec<RegionId>,
    stats: Option<Arc<dyn StatsOracle>>,
    hooks: Option<Arc<dyn CombatHooks>>,
    line_of_sight: Option<Arc<dyn LineOfSight>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            regions: Vec::new(),
            stats: None,
            hooks: None,
            line_of_sight: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Host a region. Call once per region.
    pub fn region(mut self, region: RegionId) -> Self {
        self.regions.push(region);
        self
    }

    /// Set the stats oracle (default: [`TableStatsOracle`])
    pub fn stats(mut self, stats: impl StatsOracle + 'static) -> Self {
        self.stats = Some(Arc::new(stats));
        self
    }

    /// Set the combat hooks (default: [`DefaultHooks`])
    pub fn hooks(mut self, hooks: impl CombatHooks + 'static) -> Self {
        self.hooks = Some(Arc::new(hooks));
        self
    }

    /// Set the line-of-sight service (default: [`AlwaysClear`])
    pub fn line_of_sight(mut self, line_of_sight: impl LineOfSight + 'static) -> Self {
        self.line_of_sight = Some(Arc::new(line_of_sight));
        self
    }

    /// Build the runtime and start one worker per region
    pub async fn build(self) -> Result<Runtime> {
        self.config.validate()?;
        if self.regions.is_empty() {
            return Err(RuntimeError::InvalidConfig("runtime needs at least one region"));
        }

        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let services = RegionServices {
            config: self.config.combat.clone(),
            stats: self
                .stats
                .unwrap_or_else(|| Arc::new(TableStatsOracle::new())),
            hooks: self.hooks.unwrap_or_else(|| Arc::new(DefaultHooks)),
            line_of_sight: self.line_of_sight.unwrap_or_else(|| Arc::new(AlwaysClear)),
            event_bus: event_bus.clone(),
        };

        let mut regions = BTreeMap::new();
        for region in self.regions {
            if regions.contains_key(&region) {
                return Err(RuntimeError::DuplicateRegion { region });
            }

            let (command_tx, command_rx) =
                mpsc::channel::<Command>(self.config.command_buffer_size);
            let worker = RegionWorker::new(
                RegionState::new(region),
                Dice::seeded(self.config.seed ^ u64::from(region.0)),
                services.clone(),
                self.config.clock,
                command_rx,
                command_tx.downgrade(),
            );
            let worker = tokio::spawn(async move {
                worker.run().await;
            });

            let handle = RegionHandle::new(region, command_tx, event_bus.clone());
            regions.insert(region, HostedRegion { handle, worker });
        }

        Ok(Runtime {
            config: self.config,
            event_bus,
            regions,
        })
    }
}
