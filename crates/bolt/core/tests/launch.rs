mod common;

use std::sync::Arc;

use bolt_core::{
    EntityId, LaunchContext, LaunchError, LaunchRequest, LaunchStep, Position, Resolution,
    SpellProfile, TargetShape, Tick, resume_after_line_of_sight,
};

use common::*;

const CASTER: EntityId = EntityId(1);

fn cone_bolt() -> Arc<SpellProfile> {
    let spell = heat_bolt(100.0);
    Arc::new((*spell).clone().with_shape(TargetShape::Cone))
}

#[test]
fn travel_effect_reaches_players_near_the_target() {
    let mut world = World::new(0);
    world.spawn(player(1, "Aldric").at(Position::new(0, 850, 0)));
    world.spawn(creature(2, "goblin"));
    world.spawn(player(3, "Brom").at(Position::new(3_000, 0, 0)));
    world.spawn(player(4, "Cael").at(Position::new(0, -3_601, 0)));
    world.spawn(creature(5, "wolf").at(Position::new(10, 0, 0)));

    world
        .launch(&LaunchRequest::single(CASTER, EntityId(2), heat_bolt(100.0)))
        .expect("launch");

    let effects = world.notifier.effects.lock().unwrap().clone();
    assert_eq!(effects.len(), 1);
    assert_eq!(effects[0].caster, CASTER);
    assert_eq!(effects[0].target, EntityId(2));
    assert_eq!(effects[0].client_effect, 55);
    // 850 units: 1000 travel ticks, shown as 11 tenths
    assert_eq!(effects[0].delay, 11);
    assert_eq!(effects[0].observers, vec![CASTER, EntityId(3)]);
    assert_eq!(world.scheduler.next_due(), Some(Tick(1001)));
}

#[test]
fn one_bolt_per_target_and_nearer_lands_first() {
    let mut world = World::new(0);
    world.spawn(player(1, "Aldric"));
    world.spawn(creature(2, "near").at(Position::new(0, 85, 0)));
    world.spawn(creature(3, "far").at(Position::new(0, 1_700, 0)));
    world.script_player(CASTER, vec![99]);

    let steps = world
        .launch(&LaunchRequest::new(
            CASTER,
            vec![EntityId(3), EntityId(2)],
            heat_bolt(100.0),
        ))
        .expect("launch");
    assert_eq!(steps.len(), 2);
    assert_eq!(world.scheduler.pending(), 2);

    let first = world.advance(101);
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].outcome().map(|o| o.target), Some(EntityId(2)));

    let second = world.advance(2_000);
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].outcome().map(|o| o.target), Some(EntityId(3)));
    assert!(world.scheduler.is_empty());
}

#[test]
fn cone_bolts_at_players_wait_for_line_of_sight() {
    let mut world = World::new(0);
    world.spawn(player(1, "Aldric").at(Position::new(0, 170, 0)));
    world.spawn(player(2, "Tara"));
    world.spawn(creature(3, "goblin"));

    let steps = world
        .launch(&LaunchRequest::new(CASTER, vec![EntityId(2), EntityId(3)], cone_bolt()))
        .expect("launch");
    assert_eq!(steps[0], LaunchStep::AwaitLineOfSight { target: EntityId(2) });
    assert!(matches!(steps[1], LaunchStep::Scheduled { target: EntityId(3), .. }));
    assert_eq!(world.scheduler.pending(), 1);
    assert_eq!(world.notifier.effect_count(), 1);

    let mut ctx = LaunchContext::new(
        &world.region,
        &world.config,
        &world.notifier,
        &mut world.scheduler,
    );
    let resumed = resume_after_line_of_sight(CASTER, EntityId(2), cone_bolt(), &mut ctx);
    assert!(matches!(
        resumed,
        Some(LaunchStep::Scheduled { target: EntityId(2), fire_at: Tick(201), .. })
    ));
    assert_eq!(world.scheduler.pending(), 2);
}

#[test]
fn line_of_sight_answer_for_a_vanished_target_launches_nothing() {
    let mut world = World::new(0);
    world.spawn(player(1, "Aldric").at(Position::new(0, 170, 0)));
    world.spawn(player(2, "Tara"));
    world
        .launch(&LaunchRequest::single(CASTER, EntityId(2), cone_bolt()))
        .expect("launch");
    world.region.remove(EntityId(2));

    let mut ctx = LaunchContext::new(
        &world.region,
        &world.config,
        &world.notifier,
        &mut world.scheduler,
    );
    assert_eq!(resume_after_line_of_sight(CASTER, EntityId(2), cone_bolt(), &mut ctx), None);
    assert!(world.scheduler.is_empty());
    assert_eq!(world.notifier.effect_count(), 0);
}

#[test]
fn unknown_ids_reject_the_whole_request() {
    let mut world = World::new(0);
    world.spawn(player(1, "Aldric"));
    world.spawn(creature(2, "goblin"));

    let err = world
        .launch(&LaunchRequest::new(CASTER, vec![EntityId(2), EntityId(9)], heat_bolt(50.0)))
        .expect_err("unknown target");
    assert!(matches!(err, LaunchError::UnknownTarget { target: EntityId(9), .. }));
    assert!(world.scheduler.is_empty());
    assert_eq!(world.notifier.effect_count(), 0);

    let err = world
        .launch(&LaunchRequest::single(EntityId(8), EntityId(2), heat_bolt(50.0)))
        .expect_err("unknown caster");
    assert!(matches!(err, LaunchError::UnknownCaster { caster: EntityId(8), .. }));

    let err = world
        .launch(&LaunchRequest::new(CASTER, Vec::new(), heat_bolt(50.0)))
        .expect_err("no targets");
    assert!(matches!(err, LaunchError::EmptyTargets { .. }));
}

#[test]
fn earlier_bolt_can_kill_the_target_of_a_later_one() {
    let mut world = World::new(0);
    world.spawn(player(1, "Aldric").at(Position::new(0, 85, 0)));
    world.spawn(creature(2, "rat").with_health(10));
    world.script_player(CASTER, vec![99]);

    let request = LaunchRequest::single(CASTER, EntityId(2), heat_bolt(100.0));
    world.launch(&request).expect("first");
    world.launch(&request).expect("second");

    let resolutions = world.advance(101);
    assert_eq!(resolutions.len(), 2);
    assert!(matches!(resolutions[0], Resolution::Landed(_)));
    assert!(resolutions[1].is_expired());
    assert!(!world.get(EntityId(2)).is_alive());
}
