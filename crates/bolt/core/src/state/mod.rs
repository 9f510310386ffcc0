//! World state read and written by the bolt pipeline.
mod combatant;
mod ids;
mod position;
mod region;

pub use combatant::{
    ArmorPiece, Attributes, CombatStatus, Combatant, EngageEffect, EntityKind, LastAttack,
    Loadout, ObjectState, OffHand, Resists, StyleInfo, SwingResult, WeaponHand,
};
pub use ids::{EntityId, Realm, RegionId, Tick};
pub use position::{HEADING_UNITS, Heading, Position, is_in_front};
pub use region::RegionState;
