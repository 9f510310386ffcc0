//! Live combatant records.
//!
//! A [`Combatant`] is owned by exactly one region and is only ever mutated by
//! that region's tick loop. The resolution handler reads it at impact time, so
//! everything in here reflects the world *now*, not at launch.

use std::collections::BTreeMap;

use crate::combat::{ArmorSlot, DamageType};

use super::ids::{EntityId, Realm, RegionId, Tick};
use super::position::{Heading, Position};

/// Capability tag used by the combat rules instead of concrete type checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityKind {
    /// Player character with a client connection.
    Player,
    /// Non-player creature driven by a brain.
    Creature,
    /// Keep door.
    KeepDoor,
    /// Keep wall, tower or other fortification piece.
    KeepComponent,
}

impl EntityKind {
    pub const fn is_player(self) -> bool {
        matches!(self, Self::Player)
    }

    pub const fn is_creature(self) -> bool {
        matches!(self, Self::Creature)
    }

    pub const fn is_door(self) -> bool {
        matches!(self, Self::KeepDoor)
    }

    /// Doors and fortification pieces: only siege spells affect them, and
    /// those always land.
    pub const fn is_siege_target(self) -> bool {
        matches!(self, Self::KeepDoor | Self::KeepComponent)
    }
}

/// Lifecycle of an object inside its region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectState {
    #[default]
    Active,
    Inactive,
    Deleted,
}

/// Attributes the stat oracle derives its answers from.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attributes {
    /// Modified dexterity (base + items + buffs).
    pub dexterity: i32,
    /// Modified shield specialization level.
    pub shield_spec: i32,
    /// Spell damage bonus, in percent.
    pub spell_damage_bonus: i32,
    /// Chance for a spell to carry a critical allotment, in percent.
    pub spell_critical_chance: i32,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            dexterity: 50,
            shield_spec: 0,
            spell_damage_bonus: 0,
            spell_critical_chance: 0,
        }
    }
}

/// Percent resistances per damage type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resists(BTreeMap<DamageType, i32>);

impl Resists {
    pub fn get(&self, damage_type: DamageType) -> i32 {
        self.0.get(&damage_type).copied().unwrap_or(0)
    }

    pub fn set(&mut self, damage_type: DamageType, percent: i32) {
        self.0.insert(damage_type, percent);
    }

    pub fn with(mut self, damage_type: DamageType, percent: i32) -> Self {
        self.set(damage_type, percent);
        self
    }
}

/// Armor worn on one body location.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArmorPiece {
    /// Armor factor contributed by the piece.
    pub armor_factor: f64,
    /// Fraction of physical damage absorbed, `0.0..1.0`.
    pub absorb: f64,
}

impl ArmorPiece {
    pub const fn new(armor_factor: f64, absorb: f64) -> Self {
        Self {
            armor_factor,
            absorb,
        }
    }
}

/// Category of the item held in the main hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeaponHand {
    /// One-handed weapon meant for the right hand.
    RightHand,
    /// Weapon that may be wielded in either hand.
    LeftHand,
    TwoHanded,
    Ranged,
}

/// Item carried in the off hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OffHand {
    Shield,
    Weapon,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Loadout {
    pub main_hand: Option<WeaponHand>,
    pub off_hand: Option<OffHand>,
}

impl Loadout {
    /// Shield in the off hand with nothing in the main hand that prevents
    /// bringing it up.
    pub fn can_block_with_shield(&self) -> bool {
        self.off_hand == Some(OffHand::Shield)
            && matches!(
                self.main_hand,
                None | Some(WeaponHand::RightHand) | Some(WeaponHand::LeftHand)
            )
    }
}

/// How the combatant's last swing resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SwingResult {
    Hit,
    /// Hit executed with a combat style.
    HitStyle,
    Missed,
    Blocked,
    Parried,
    Evaded,
}

/// Combat style metadata relevant to defense.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StyleInfo {
    pub id: u16,
    pub bonus_to_defense: i32,
}

/// The last attack this combatant executed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LastAttack {
    pub result: SwingResult,
    pub style: Option<StyleInfo>,
}

/// Engage effect: the owner guards against one designated attacker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngageEffect {
    pub target: EntityId,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatStatus {
    pub in_combat: bool,
    /// Actively swinging (attack stance).
    pub attack_state: bool,
    /// Entities that attacked this combatant, with the tick of their latest
    /// attack. Entries older than the combat timeout are stale.
    pub attackers: BTreeMap<EntityId, Tick>,
    pub last_attacked_by_enemy: Option<Tick>,
    /// When this combatant last attacked someone.
    pub last_attacked_enemy: Option<Tick>,
    pub last_attack: Option<LastAttack>,
    /// Style queued for the next swing.
    pub next_style: Option<u16>,
    /// Fallback style queued behind `next_style`.
    pub next_backup_style: Option<u16>,
}

impl CombatStatus {
    pub fn has_style_queued(&self, style_id: u16) -> bool {
        self.next_style == Some(style_id) || self.next_backup_style == Some(style_id)
    }

    pub fn add_attacker(&mut self, attacker: EntityId, now: Tick) {
        self.attackers.insert(attacker, now);
    }

    /// Attackers whose latest attack is less than `timeout` ticks old.
    pub fn current_attackers(&self, now: Tick, timeout: u64) -> impl Iterator<Item = EntityId> + '_ {
        self.attackers
            .iter()
            .filter(move |(_, at)| now.since(**at) < timeout)
            .map(|(id, _)| *id)
    }

    /// In combat and either attacked or was attacked within `timeout` ticks.
    pub fn is_in_combat(&self, now: Tick, timeout: u64) -> bool {
        self.in_combat
            && [self.last_attacked_by_enemy, self.last_attacked_enemy]
                .into_iter()
                .flatten()
                .any(|at| now.since(at) < timeout)
    }

    /// Forgets stale attackers and leaves combat once nothing is recent.
    pub fn expire(&mut self, now: Tick, timeout: u64) {
        self.attackers.retain(|_, at| now.since(*at) < timeout);
        if !self.is_in_combat(now, timeout) {
            self.in_combat = false;
            self.attackers.clear();
        }
    }
}

/// Live record of a player, creature or structure.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: EntityId,
    pub name: String,
    pub kind: EntityKind,
    pub realm: Realm,
    pub level: u8,
    pub region: RegionId,
    pub position: Position,
    pub heading: Heading,
    pub object_state: ObjectState,
    pub health: i32,
    pub max_health: i32,
    pub endurance: i32,
    pub attributes: Attributes,
    /// Aggregate buff/debuff multiplier applied to outgoing damage.
    pub effectiveness: f64,
    pub resists: Resists,
    pub armor: BTreeMap<ArmorSlot, ArmorPiece>,
    pub loadout: Loadout,
    pub combat: CombatStatus,
    pub engage: Option<EngageEffect>,
    pub interrupted_until: Option<Tick>,
    pub spell_interrupt_duration: u64,
    /// Threat table, only meaningful for creatures.
    pub threat: BTreeMap<EntityId, i64>,
}

impl Combatant {
    pub const DEFAULT_SPELL_INTERRUPT_DURATION: u64 = 4500;

    /// Creates an active, full-health combatant with neutral stats.
    pub fn new(id: EntityId, name: impl Into<String>, kind: EntityKind, region: RegionId) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            realm: Realm::None,
            level: 1,
            region,
            position: Position::ORIGIN,
            heading: Heading::default(),
            object_state: ObjectState::Active,
            health: 100,
            max_health: 100,
            endurance: 100,
            attributes: Attributes::default(),
            effectiveness: 1.0,
            resists: Resists::default(),
            armor: BTreeMap::new(),
            loadout: Loadout::default(),
            combat: CombatStatus::default(),
            engage: None,
            interrupted_until: None,
            spell_interrupt_duration: Self::DEFAULT_SPELL_INTERRUPT_DURATION,
            threat: BTreeMap::new(),
        }
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    pub fn with_realm(mut self, realm: Realm) -> Self {
        self.realm = realm;
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn facing(mut self, heading: Heading) -> Self {
        self.heading = heading;
        self
    }

    pub fn with_health(mut self, health: i32) -> Self {
        self.health = health;
        self.max_health = self.max_health.max(health);
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_resists(mut self, resists: Resists) -> Self {
        self.resists = resists;
        self
    }

    pub fn with_armor(mut self, slot: ArmorSlot, piece: ArmorPiece) -> Self {
        self.armor.insert(slot, piece);
        self
    }

    pub fn with_loadout(mut self, loadout: Loadout) -> Self {
        self.loadout = loadout;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0 && self.object_state != ObjectState::Deleted
    }

    pub fn is_active(&self) -> bool {
        self.object_state == ObjectState::Active
    }

    /// Turns the combatant to face `position`.
    pub fn turn_to(&mut self, position: &Position) {
        self.heading = self.position.heading_to(position);
    }

    /// Restarts the spell-interrupt window from `now`.
    pub fn start_interrupt_timer(&mut self, now: Tick, duration: u64) {
        let until = now + duration;
        self.interrupted_until = Some(match self.interrupted_until {
            Some(current) if current > until => current,
            _ => until,
        });
    }

    pub fn is_interrupted(&self, now: Tick) -> bool {
        self.interrupted_until.is_some_and(|until| until > now)
    }

    /// Name with the first letter upper-cased, for sentence starts.
    pub fn capitalized_name(&self) -> String {
        crate::message::capitalize(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Combatant {
        Combatant::new(EntityId(1), "aldric", EntityKind::Player, RegionId(1))
    }

    #[test]
    fn shield_block_requires_compatible_main_hand() {
        let mut loadout = Loadout {
            main_hand: None,
            off_hand: Some(OffHand::Shield),
        };
        assert!(loadout.can_block_with_shield());

        loadout.main_hand = Some(WeaponHand::RightHand);
        assert!(loadout.can_block_with_shield());

        loadout.main_hand = Some(WeaponHand::TwoHanded);
        assert!(!loadout.can_block_with_shield());

        loadout.main_hand = Some(WeaponHand::LeftHand);
        loadout.off_hand = Some(OffHand::Weapon);
        assert!(!loadout.can_block_with_shield());
    }

    #[test]
    fn combat_state_decays_after_timeout() {
        let mut status = CombatStatus {
            in_combat: true,
            last_attacked_by_enemy: Some(Tick(5_000)),
            ..CombatStatus::default()
        };
        status.add_attacker(EntityId(3), Tick(1_000));
        status.add_attacker(EntityId(4), Tick(5_000));

        assert!(status.is_in_combat(Tick(14_999), 10_000));
        assert_eq!(
            status.current_attackers(Tick(11_000), 10_000).collect::<Vec<_>>(),
            vec![EntityId(4)]
        );

        status.expire(Tick(11_000), 10_000);
        assert!(status.in_combat);
        assert_eq!(status.attackers.len(), 1);

        status.expire(Tick(15_000), 10_000);
        assert!(!status.in_combat);
        assert!(status.attackers.is_empty());
    }

    #[test]
    fn attacking_keeps_the_attacker_in_combat() {
        let mut status = CombatStatus {
            in_combat: true,
            last_attacked_enemy: Some(Tick(2_000)),
            ..CombatStatus::default()
        };
        status.expire(Tick(9_000), 10_000);
        assert!(status.in_combat);
        assert!(!status.is_in_combat(Tick(12_000), 10_000));
    }

    #[test]
    fn interrupt_timer_never_shortens() {
        let mut c = player();
        c.start_interrupt_timer(Tick(1000), 4500);
        assert_eq!(c.interrupted_until, Some(Tick(5500)));

        c.start_interrupt_timer(Tick(1200), 1000);
        assert_eq!(c.interrupted_until, Some(Tick(5500)));
        assert!(c.is_interrupted(Tick(5499)));
        assert!(!c.is_interrupted(Tick(5500)));
    }

    #[test]
    fn zero_health_is_dead() {
        let c = player().with_health(0);
        assert!(!c.is_alive());
    }

    #[test]
    fn siege_capabilities() {
        assert!(EntityKind::KeepDoor.is_siege_target());
        assert!(EntityKind::KeepComponent.is_siege_target());
        assert!(!EntityKind::KeepComponent.is_door());
        assert!(!EntityKind::Creature.is_siege_target());
    }
}
