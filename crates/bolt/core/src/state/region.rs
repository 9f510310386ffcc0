//! Region-local entity storage.

use std::collections::BTreeMap;

use super::combatant::Combatant;
use super::ids::{EntityId, RegionId, Tick};
use super::position::Position;

/// Entities of one region plus its clock.
///
/// Only the region's own tick loop holds a `&mut RegionState`, which is what
/// makes every resolution step free of locks.
#[derive(Clone, Debug)]
pub struct RegionState {
    id: RegionId,
    now: Tick,
    entities: BTreeMap<EntityId, Combatant>,
}

impl RegionState {
    pub fn new(id: RegionId) -> Self {
        Self {
            id,
            now: Tick::ZERO,
            entities: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> RegionId {
        self.id
    }

    pub fn now(&self) -> Tick {
        self.now
    }

    /// Moves the clock forward; time never runs backwards.
    pub fn advance_to(&mut self, now: Tick) {
        if now > self.now {
            self.now = now;
        }
    }

    /// Inserts a combatant, stamping it with this region's id.
    ///
    /// Returns the previous record under the same id, if any.
    pub fn insert(&mut self, mut combatant: Combatant) -> Option<Combatant> {
        combatant.region = self.id;
        self.entities.insert(combatant.id, combatant)
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Combatant> {
        self.entities.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Combatant> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Combatant> {
        self.entities.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.entities.values()
    }

    /// Drops combat state older than `timeout` ticks from every combatant.
    pub fn expire_combat(&mut self, timeout: u64) {
        let now = self.now;
        for combatant in self.entities.values_mut() {
            combatant.combat.expire(now, timeout);
        }
    }

    /// Players within `radius` of `center`, in id order.
    pub fn players_near(&self, center: &Position, radius: u32) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|c| c.kind.is_player() && c.position.distance_to(center) <= radius)
            .map(|c| c.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::EntityKind;

    #[test]
    fn expire_combat_uses_the_region_clock() {
        let mut region = RegionState::new(RegionId(1));
        let mut tara = Combatant::new(EntityId(2), "tara", EntityKind::Player, RegionId(1));
        tara.combat.in_combat = true;
        tara.combat.last_attacked_by_enemy = Some(Tick(100));
        tara.combat.add_attacker(EntityId(3), Tick(100));
        region.insert(tara);

        region.advance_to(Tick(10_099));
        region.expire_combat(10_000);
        assert!(region.get(EntityId(2)).is_some_and(|c| c.combat.in_combat));

        region.advance_to(Tick(10_100));
        region.expire_combat(10_000);
        let tara = region.get(EntityId(2)).map(|c| c.combat.clone()).unwrap_or_default();
        assert!(!tara.in_combat);
        assert!(tara.attackers.is_empty());
    }

    #[test]
    fn insert_stamps_region() {
        let mut region = RegionState::new(RegionId(7));
        region.insert(Combatant::new(EntityId(1), "a", EntityKind::Player, RegionId(99)));
        assert_eq!(region.get(EntityId(1)).map(|c| c.region), Some(RegionId(7)));
    }

    #[test]
    fn players_near_skips_creatures_and_far_players() {
        let mut region = RegionState::new(RegionId(1));
        region.insert(Combatant::new(EntityId(1), "near", EntityKind::Player, RegionId(1)));
        region.insert(
            Combatant::new(EntityId(2), "far", EntityKind::Player, RegionId(1))
                .at(Position::new(5000, 0, 0)),
        );
        region.insert(Combatant::new(EntityId(3), "mob", EntityKind::Creature, RegionId(1)));

        assert_eq!(region.players_near(&Position::ORIGIN, 3600), vec![EntityId(1)]);
    }

    #[test]
    fn clock_is_monotonic() {
        let mut region = RegionState::new(RegionId(1));
        region.advance_to(Tick(50));
        region.advance_to(Tick(10));
        assert_eq!(region.now(), Tick(50));
    }
}
