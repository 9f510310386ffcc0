//! Region worker that owns the authoritative [`RegionState`].
//!
//! One worker runs per region and is the only code that touches that region's
//! combatants and bolt scheduler, so resolution needs no locks. Commands arrive
//! from [`RegionHandle`](crate::RegionHandle); line-of-sight checks run as
//! detached tasks and report back through the same command channel.

use std::sync::Arc;

use bolt_core::{
    BoltImpact, CombatConfig, CombatEnv, CombatHooks, Combatant, Dice, EntityId, ImpactContext,
    LaunchContext, LaunchError, LaunchRequest, LaunchStep, PlayerSequence, RegionState,
    Resolution, Scheduler, SpellProfile, StatsOracle, launch, resume_after_line_of_sight,
};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::api::RegionSnapshot;
use crate::config::ClockMode;
use crate::events::{CombatEvent, Event, EventBus};
use crate::los::{LineOfSight, LosResponse};
use crate::notify::EventBusNotifier;

/// In-place edit applied to a live combatant.
pub type CombatantUpdate = Box<dyn FnOnce(&mut Combatant) + Send>;

/// A combatant leaving its region together with its own roll sequence.
pub struct Emigrant {
    pub combatant: Combatant,
    pub sequence: Option<PlayerSequence>,
}

/// Commands that can be sent to a region worker
pub enum Command {
    /// Add a combatant, replacing any record with the same id.
    Spawn {
        combatant: Box<Combatant>,
        reply: oneshot::Sender<Option<Combatant>>,
    },
    /// Remove a combatant; in-flight bolts against it expire and its roll
    /// sequence is forgotten.
    Despawn {
        entity: EntityId,
        reply: oneshot::Sender<Option<Combatant>>,
    },
    /// Remove a combatant and hand over its roll sequence.
    Emigrate {
        entity: EntityId,
        reply: oneshot::Sender<Option<Emigrant>>,
    },
    /// Place a combatant arriving from another region.
    Immigrate {
        emigrant: Box<Emigrant>,
        reply: oneshot::Sender<Option<Combatant>>,
    },
    /// Mutate a combatant in place. Replies `false` if it is not here.
    Update {
        entity: EntityId,
        update: CombatantUpdate,
        reply: oneshot::Sender<bool>,
    },
    /// Launch one bolt per target.
    Launch {
        request: LaunchRequest,
        reply: oneshot::Sender<Result<Vec<LaunchStep>, LaunchError>>,
    },
    /// Answer to a line-of-sight check started by this worker.
    LineOfSightAnswer {
        caster: EntityId,
        spell: Arc<SpellProfile>,
        response: LosResponse,
    },
    /// Move the clock forward and fire every due bolt.
    Advance {
        ticks: u64,
        reply: oneshot::Sender<Vec<Resolution>>,
    },
    /// Read one combatant.
    Query {
        entity: EntityId,
        reply: oneshot::Sender<Option<Combatant>>,
    },
    /// Read the whole region.
    Snapshot { reply: oneshot::Sender<RegionSnapshot> },
    /// Stop the worker; pending bolts are dropped.
    Shutdown,
}

/// Collaborators shared by every region of a runtime.
#[derive(Clone)]
pub struct RegionServices {
    pub config: CombatConfig,
    pub stats: Arc<dyn StatsOracle>,
    pub hooks: Arc<dyn CombatHooks>,
    pub line_of_sight: Arc<dyn LineOfSight>,
    pub event_bus: EventBus,
}

/// Background task that processes region commands and drives its clock.
pub struct RegionWorker {
    region: RegionState,
    scheduler: Scheduler<BoltImpact>,
    dice: Dice,
    services: RegionServices,
    notifier: EventBusNotifier,
    clock: ClockMode,
    command_rx: mpsc::Receiver<Command>,
    /// Handed to line-of-sight tasks; does not keep the channel open.
    command_tx: mpsc::WeakSender<Command>,
}

impl RegionWorker {
    /// Creates a new region worker.
    pub fn new(
        region: RegionState,
        dice: Dice,
        services: RegionServices,
        clock: ClockMode,
        command_rx: mpsc::Receiver<Command>,
        command_tx: mpsc::WeakSender<Command>,
    ) -> Self {
        let notifier = EventBusNotifier::new(region.id(), services.event_bus.clone());
        Self {
            region,
            scheduler: Scheduler::new(),
            dice,
            services,
            notifier,
            clock,
            command_rx,
            command_tx,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        info!(
            target: "runtime::region",
            region = %self.region.id(),
            clock = ?self.clock,
            combatants = self.region.len(),
            "region worker started"
        );

        let mut ticker = self.clock_ticker();
        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(Command::Shutdown) | None => break,
                        Some(cmd) => self.handle_command(cmd),
                    }
                }
                elapsed = next_tick(&mut ticker) => {
                    self.advance(elapsed);
                }
            }
        }

        info!(
            target: "runtime::region",
            region = %self.region.id(),
            dropped_bolts = self.scheduler.pending(),
            "region worker stopped"
        );
    }

    fn clock_ticker(&self) -> Option<(Interval, u64)> {
        match self.clock {
            ClockMode::Realtime(period) => {
                let start = tokio::time::Instant::now() + period;
                let mut interval = tokio::time::interval_at(start, period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                let millis = u64::try_from(period.as_millis()).unwrap_or(u64::MAX);
                Some((interval, millis))
            }
            ClockMode::Manual => None,
        }
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Spawn { combatant, reply } => {
                let replaced = self.region.insert(*combatant);
                if reply.send(replaced).is_err() {
                    warn!(target: "runtime::region", "Spawn reply channel closed (caller dropped)");
                }
            }
            Command::Despawn { entity, reply } => {
                let removed = self.region.remove(entity);
                self.dice.take_player(entity);
                if reply.send(removed).is_err() {
                    warn!(target: "runtime::region", "Despawn reply channel closed (caller dropped)");
                }
            }
            Command::Emigrate { entity, reply } => {
                let emigrant = self.region.remove(entity).map(|combatant| Emigrant {
                    combatant,
                    sequence: self.dice.take_player(entity),
                });
                if let Err(Some(emigrant)) = reply.send(emigrant) {
                    warn!(
                        target: "runtime::region",
                        entity = %entity,
                        "Emigrate reply channel closed (caller dropped), keeping combatant"
                    );
                    self.settle(emigrant);
                }
            }
            Command::Immigrate { emigrant, reply } => {
                let replaced = self.settle(*emigrant);
                if reply.send(replaced).is_err() {
                    warn!(target: "runtime::region", "Immigrate reply channel closed (caller dropped)");
                }
            }
            Command::Update {
                entity,
                update,
                reply,
            } => {
                let found = match self.region.get_mut(entity) {
                    Some(combatant) => {
                        update(combatant);
                        true
                    }
                    None => false,
                };
                if reply.send(found).is_err() {
                    warn!(target: "runtime::region", "Update reply channel closed (caller dropped)");
                }
            }
            Command::Launch { request, reply } => {
                let result = self.launch(&request);
                if reply.send(result).is_err() {
                    warn!(target: "runtime::region", "Launch reply channel closed (caller dropped)");
                }
            }
            Command::LineOfSightAnswer {
                caster,
                spell,
                response,
            } => {
                self.on_line_of_sight(caster, spell, response);
            }
            Command::Advance { ticks, reply } => {
                let resolutions = self.advance(ticks);
                if reply.send(resolutions).is_err() {
                    warn!(target: "runtime::region", "Advance reply channel closed (caller dropped)");
                }
            }
            Command::Query { entity, reply } => {
                if reply.send(self.region.get(entity).cloned()).is_err() {
                    warn!(target: "runtime::region", "Query reply channel closed (caller dropped)");
                }
            }
            Command::Snapshot { reply } => {
                let snapshot = RegionSnapshot {
                    region: self.region.id(),
                    now: self.region.now(),
                    pending_bolts: self.scheduler.pending(),
                    player_sequences: self.dice.player_count(),
                    combatants: self.region.iter().cloned().collect(),
                };
                if reply.send(snapshot).is_err() {
                    warn!(target: "runtime::region", "Snapshot reply channel closed (caller dropped)");
                }
            }
            // handled by the run loop
            Command::Shutdown => {}
        }
    }

    fn settle(&mut self, emigrant: Emigrant) -> Option<Combatant> {
        let Emigrant {
            combatant,
            sequence,
        } = emigrant;
        if let Some(sequence) = sequence {
            self.dice.restore_player(combatant.id, sequence);
        }
        self.region.insert(combatant)
    }

    fn launch(&mut self, request: &LaunchRequest) -> Result<Vec<LaunchStep>, LaunchError> {
        let mut ctx = LaunchContext::new(
            &self.region,
            &self.services.config,
            &self.notifier,
            &mut self.scheduler,
        );
        let steps = match launch(request, &mut ctx) {
            Ok(steps) => steps,
            Err(err) => {
                error!(
                    target: "runtime::region",
                    region = %self.region.id(),
                    caster = %request.caster,
                    error = %err,
                    "bolt launch rejected"
                );
                self.publish(CombatEvent::LaunchRejected {
                    region: self.region.id(),
                    caster: request.caster,
                    reason: err.to_string(),
                });
                return Err(err);
            }
        };

        for step in &steps {
            self.on_launch_step(request.caster, step);
            if let LaunchStep::AwaitLineOfSight { target } = *step {
                self.request_line_of_sight(request.caster, target, Arc::clone(&request.spell));
            }
        }
        Ok(steps)
    }

    fn on_launch_step(&self, caster: EntityId, step: &LaunchStep) {
        let region = self.region.id();
        let event = match *step {
            LaunchStep::Scheduled {
                target, fire_at, ..
            } => {
                debug!(
                    target: "runtime::region",
                    region = %region,
                    caster = %caster,
                    target = %target,
                    fire_at = %fire_at,
                    "bolt launched"
                );
                CombatEvent::BoltLaunched {
                    region,
                    caster,
                    target,
                    fire_at,
                }
            }
            LaunchStep::AwaitLineOfSight { target } => {
                debug!(
                    target: "runtime::region",
                    region = %region,
                    caster = %caster,
                    target = %target,
                    "waiting for line of sight"
                );
                CombatEvent::AwaitingLineOfSight {
                    region,
                    caster,
                    target,
                }
            }
            LaunchStep::Immune { target } => {
                debug!(
                    target: "runtime::region",
                    region = %region,
                    caster = %caster,
                    target = %target,
                    "target immune to spell"
                );
                CombatEvent::TargetImmune {
                    region,
                    caster,
                    target,
                }
            }
        };
        self.publish(event);
    }

    fn request_line_of_sight(&self, caster: EntityId, target: EntityId, spell: Arc<SpellProfile>) {
        let Some(command_tx) = self.command_tx.upgrade() else {
            return;
        };
        let line_of_sight = Arc::clone(&self.services.line_of_sight);

        tokio::spawn(async move {
            let response = line_of_sight.check(caster, target).await;
            let answer = Command::LineOfSightAnswer {
                caster,
                spell,
                response,
            };
            if command_tx.send(answer).await.is_err() {
                debug!(
                    target: "runtime::region",
                    caster = %caster,
                    target = %target,
                    "region stopped before line of sight answered"
                );
            }
        });
    }

    fn on_line_of_sight(&mut self, caster: EntityId, spell: Arc<SpellProfile>, response: LosResponse) {
        let region = self.region.id();
        debug!(
            target: "runtime::region",
            region = %region,
            caster = %caster,
            target = %response.target,
            flags = response.flags,
            "line of sight answered"
        );

        if !response.is_clear() {
            self.publish(CombatEvent::LineOfSightDenied {
                region,
                caster,
                target: response.target,
            });
            return;
        }

        let mut ctx = LaunchContext::new(
            &self.region,
            &self.services.config,
            &self.notifier,
            &mut self.scheduler,
        );
        if let Some(step) = resume_after_line_of_sight(caster, response.target, spell, &mut ctx) {
            self.on_launch_step(caster, &step);
        }
    }

    /// Moves the clock forward by `ticks` and fires every bolt due by then.
    fn advance(&mut self, ticks: u64) -> Vec<Resolution> {
        let now = self.region.now() + ticks;
        self.region.advance_to(now);
        self.region.expire_combat(self.services.config.combat_timeout);

        let env = CombatEnv::new(self.services.stats.as_ref(), &self.services.config);
        let mut ctx = ImpactContext::new(
            &mut self.region,
            env,
            &mut self.dice,
            &self.notifier,
            self.services.hooks.as_ref(),
        );
        self.scheduler.run_due(now, &mut ctx);
        let resolutions = ctx.resolutions;

        for resolution in &resolutions {
            let Some(outcome) = resolution.outcome() else {
                continue;
            };
            debug!(
                target: "runtime::region",
                region = %self.region.id(),
                caster = %outcome.attacker,
                target = %outcome.target,
                result = ?outcome.result,
                damage = outcome.damage,
                critical = outcome.critical_damage,
                "bolt resolved"
            );
            self.publish(CombatEvent::BoltResolved {
                region: self.region.id(),
                at: now,
                outcome: outcome.clone(),
            });
        }
        resolutions
    }

    fn publish(&self, event: CombatEvent) {
        self.services.event_bus.publish(Event::Combat(event));
    }
}

/// Resolves with the elapsed ticks when the realtime clock fires; never
/// resolves for a manual clock.
async fn next_tick(ticker: &mut Option<(Interval, u64)>) -> u64 {
    match ticker {
        Some((interval, millis)) => {
            interval.tick().await;
            *millis
        }
        None => std::future::pending().await,
    }
}
