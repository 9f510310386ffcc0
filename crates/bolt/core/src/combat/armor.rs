//! Armor locations.

/// Body location an attack lands on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArmorSlot {
    /// No location resolved; creatures and structures use their overall armor.
    #[default]
    Unspecified,
    Head,
    Hands,
    Feet,
    Torso,
    Legs,
    Arms,
}

/// Maps a `[0, 100)` roll to a player hit location.
///
/// | roll     | location |
/// |----------|----------|
/// | 0..40    | torso    |
/// | 40..65   | legs     |
/// | 65..80   | arms     |
/// | 80..90   | head     |
/// | 90..95   | hands    |
/// | 95..100  | feet     |
pub fn hit_location_from_roll(roll: u32) -> ArmorSlot {
    match roll % 100 {
        0..40 => ArmorSlot::Torso,
        40..65 => ArmorSlot::Legs,
        65..80 => ArmorSlot::Arms,
        80..90 => ArmorSlot::Head,
        90..95 => ArmorSlot::Hands,
        _ => ArmorSlot::Feet,
    }
}
