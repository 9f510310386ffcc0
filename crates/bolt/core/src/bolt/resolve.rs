//! Resolution of a bolt at its impact tick.
//!
//! ```text
//! validity gate ─▶ miss rate ─▶ roll ─┬─▶ Missed
//!                                     └─▶ magic ─▶ block ─▶ physical ─▶ cap
//!                                             ─▶ effectiveness ─▶ critical ─▶ apply
//! ```
//!
//! Caster and target are cloned out of the region before any math runs, so
//! every formula sees the state as it was when the bolt landed. Mutations go
//! back through [`CombatHooks`](crate::sink::CombatHooks) on the live records.

use crate::combat::{
    AttackOutcome, EngageDecision, HitFlags, HitResult, MissRateInputs, PhysicalInputs,
    apply_effectiveness, apply_spell_damage_bonus, block_chance, cap_damage, compute_miss_rate,
    count_nearby_attackers, decide_engage, engaged_block_chance, has_critical_allotment,
    hit_location_from_roll, is_blocked, is_miss, physical_component, resist_modifier,
    roll_critical,
};
use crate::message::{self, ChatKind};
use crate::state::{Combatant, SwingResult, is_in_front};

use super::impact::{BoltImpact, ImpactContext, Resolution};

impl BoltImpact {
    /// Resolves the impact against the live region.
    pub fn resolve(&self, ctx: &mut ImpactContext<'_>) -> Resolution {
        let Some((caster, target)) = self.live_pair(ctx) else {
            return Resolution::Expired {
                caster: self.caster,
                target: self.target,
            };
        };

        let now = ctx.region.now();
        let stats = ctx.env.stats();
        let config = ctx.env.config();
        let spell = self.spell.as_ref();
        let mut outcome = AttackOutcome::new(caster.id, target.id, spell.id, spell.damage_type);

        // Miss rate
        let mut inputs = MissRateInputs {
            base_resist: stats.resist_chance(&caster, &target, spell),
            siege_target: target.kind.is_siege_target(),
            ..Default::default()
        };
        if caster.kind.is_player()
            && target.kind.is_player()
            && target.combat.is_in_combat(now, config.combat_timeout)
        {
            let attackers = target
                .combat
                .current_attackers(now, config.combat_timeout)
                .filter_map(|id| ctx.region.get(id))
                .map(|attacker| (attacker.id, attacker.position));
            inputs.nearby_attackers = count_nearby_attackers(
                &target.position,
                caster.id,
                attackers,
                config.combat_miss_radius,
            );
        }
        if caster.kind.is_creature() || target.kind.is_creature() {
            inputs.creature_con_level = Some(stats.con_level(&caster, &target));
        }
        if let Some(last) = target.combat.last_attack
            && last.result == SwingResult::HitStyle
            && let Some(style) = last.style
        {
            inputs.style_defense_bonus = Some(style.bonus_to_defense);
        }
        let miss_rate = compute_miss_rate(&inputs, config);

        // Roll
        let roll = ctx.dice.for_roller(&caster).percent();
        if is_miss(miss_rate.value, roll) {
            outcome.result = HitResult::Missed;
            outcome.combat_miss = miss_rate.combat_miss;
            self.on_miss(ctx, &caster, &target, &outcome);
            return Resolution::Missed(outcome);
        }

        // Magic component
        let critical_chance = stats.spell_critical_chance(&caster);
        let critical_allotment = critical_chance > 0
            && has_critical_allotment(critical_chance, ctx.dice.for_roller(&caster).percent());
        let damage_bonus = stats.spell_damage_bonus(&caster);
        let resist = stats.resist(&target, spell.damage_type);

        let magic = (spell.damage * config.magic_effectiveness) as i32;
        outcome.damage = apply_spell_damage_bonus(magic, damage_bonus);
        outcome.modifier = resist_modifier(f64::from(outcome.damage), resist);
        outcome.damage = (outcome.damage + outcome.modifier).max(0);

        // Block
        let mut blocked = false;
        if target.kind.is_player() {
            if target.loadout.can_block_with_shield()
                && is_in_front(&target.position, target.heading, &caster.position, config.block_arc)
            {
                let mut chance = block_chance(
                    stats.dexterity(&target),
                    stats.shield_spec(&target),
                    stats.con_level(&target, &caster),
                );

                let engaged = target
                    .engage
                    .is_some_and(|engage| engage.target == caster.id && target.combat.attack_state);
                if engaged {
                    let decision = decide_engage(
                        caster.combat.last_attacked_by_enemy,
                        now,
                        config.engage_attack_delay,
                        target.endurance,
                        config.engage_endurance_cost,
                    );
                    self.on_engage(ctx, &caster, &target, decision);
                    chance = engaged_block_chance(chance, decision, config.engage_block_floor);
                }

                if is_blocked(chance, ctx.dice.ambient().range(1, 100)) {
                    ctx.notifier.message(
                        target.id,
                        ChatKind::Missed,
                        &message::partial_block_to_target(&caster.name),
                    );
                    ctx.notifier.message(
                        caster.id,
                        ChatKind::YouHit,
                        &message::block_to_caster(&target.name),
                    );
                    blocked = true;
                }
            }

            if is_in_front(&target.position, target.heading, &caster.position, config.natures_shield_arc)
                && target.combat.has_style_queued(config.natures_shield_style)
            {
                ctx.notifier.message(
                    target.id,
                    ChatKind::Missed,
                    &message::full_block_to_target(&caster.name),
                );
                ctx.notifier.message(
                    caster.id,
                    ChatKind::YouHit,
                    &message::block_to_caster(&target.name),
                );
                blocked = true;
                outcome.damage = 0;
            }
        }

        // Physical component
        if !blocked {
            if target.kind.is_player() {
                outcome.armor_hit_location = hit_location_from_roll(ctx.dice.ambient().percent());
            }
            let location = outcome.armor_hit_location;
            let physical = physical_component(&PhysicalInputs {
                spell_damage: spell.damage,
                caster_level: caster.level,
                caster_dexterity: stats.dexterity(&caster),
                target_is_player: target.kind.is_player(),
                target_level: target.level,
                location_armor_factor: stats.armor_factor(&target, location),
                location_absorb: stats.armor_absorb(&target, location),
                resist_percent: resist,
                spell_damage_bonus: damage_bonus,
                relic_bonus: stats.relic_bonus(caster.realm),
            });
            outcome.modifier += physical.modifier;
            outcome.damage += physical.damage;
        }

        // Cap
        let effectiveness = 1.0 + f64::from(damage_bonus) * 0.01;
        outcome.uncapped_damage = outcome.damage;
        if spell.kind.is_damage_capped() {
            let (capped, _) = cap_damage(outcome.damage, config.damage_cap(spell.damage, effectiveness));
            outcome.damage = capped;
        }

        outcome.damage = apply_effectiveness(outcome.damage, caster.effectiveness).max(0);

        // Critical
        if !blocked && critical_allotment {
            outcome.critical_damage =
                roll_critical(outcome.damage, target.kind.is_player(), ctx.dice.ambient());
        }

        if blocked {
            outcome.result = HitResult::Blocked;
        }
        self.on_landed(ctx, &caster, &target, &outcome);
        Resolution::Landed(outcome)
    }

    /// Snapshot of both sides, or `None` when the bolt missed its window.
    fn live_pair(&self, ctx: &ImpactContext<'_>) -> Option<(Combatant, Combatant)> {
        let caster = ctx.region.get(self.caster)?;
        let target = ctx.region.get(self.target)?;

        let valid = target.region == caster.region
            && target.region == ctx.region.id()
            && target.is_active()
            && target.is_alive();
        valid.then(|| (caster.clone(), target.clone()))
    }

    fn on_miss(
        &self,
        ctx: &mut ImpactContext<'_>,
        caster: &Combatant,
        target: &Combatant,
        outcome: &AttackOutcome,
    ) {
        let now = ctx.region.now();
        ctx.notifier.message(
            caster.id,
            ChatKind::YouHit,
            &message::miss_to_caster(&target.name, outcome.combat_miss),
        );
        ctx.notifier.message(target.id, ChatKind::Missed, &message::miss_to_target(&caster.name));

        if let Some(live) = ctx.region.get_mut(target.id) {
            ctx.hooks.on_attacked_by_enemy(live, outcome, now);
            live.start_interrupt_timer(now, live.spell_interrupt_duration);
            if live.kind.is_creature() {
                ctx.hooks.add_to_aggro_list(live, caster.id, 1);
            }
        }
    }

    fn on_engage(
        &self,
        ctx: &mut ImpactContext<'_>,
        caster: &Combatant,
        target: &Combatant,
        decision: EngageDecision,
    ) {
        let cost = ctx.env.config().engage_endurance_cost;
        match decision {
            EngageDecision::RecentlyAttacked => {
                ctx.notifier.message(
                    target.id,
                    ChatKind::System,
                    &message::engage_recently_attacked(&caster.name),
                );
            }
            EngageDecision::Exhausted => {
                if let Some(live) = ctx.region.get_mut(target.id) {
                    live.engage = None;
                }
            }
            EngageDecision::Concentrate => {
                if let Some(live) = ctx.region.get_mut(target.id) {
                    live.endurance -= cost;
                }
                ctx.notifier
                    .message(target.id, ChatKind::Skill, message::ENGAGE_CONCENTRATE);
            }
        }
    }

    fn on_landed(
        &self,
        ctx: &mut ImpactContext<'_>,
        caster: &Combatant,
        target: &Combatant,
        outcome: &AttackOutcome,
    ) {
        let now = ctx.region.now();
        if let Some(live) = ctx.region.get_mut(caster.id) {
            ctx.hooks.on_attack_enemy(live, outcome, now);
        }

        if outcome.damage > 0 {
            let messages = &self.spell.messages;
            let target_name = target.capitalized_name();
            ctx.notifier.message(target.id, ChatKind::Spell, &messages.target_hit);
            ctx.notifier.message(
                caster.id,
                ChatKind::Spell,
                &message::format_template(&messages.area_hit, &[&target_name]),
            );
            ctx.notifier.area_message(
                target.id,
                &[target.id, caster.id],
                ChatKind::System,
                &message::make_sentence(&messages.area_hit, &[&target_name]),
            );
            for line in message::damage_report(&target.name, outcome) {
                ctx.notifier.message(caster.id, ChatKind::YouHit, &line);
            }
            ctx.notifier.damage_numbers(outcome);
        }

        if let Some(live) = ctx.region.get_mut(target.id) {
            ctx.hooks
                .apply_damage(live, outcome, false, HitFlags::for_result(outcome.result), now);
            live.start_interrupt_timer(now, live.spell_interrupt_duration);
        }
    }
}
