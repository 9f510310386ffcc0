//! Random sources for combat rolls.
//!
//! Combat math only ever sees `&mut dyn RandomSource`. Which source sits behind
//! it is decided by [`Dice::for_roller`]: players draw from their own shuffled
//! [`NumberDeck`] so streaks even out, everything else from the region's
//! ambient [`PcgRandom`].
//!
//! # Determinism
//!
//! Every source here is seeded and reproducible: the same region seed yields
//! the same rolls, which is what the tests and scenario replays rely on.

use std::collections::BTreeMap;

use crate::state::{Combatant, EntityId};

/// Source of combat rolls.
pub trait RandomSource {
    /// Next raw 32-bit value.
    fn next_u32(&mut self) -> u32;

    /// Roll in `[0, 100)`.
    fn percent(&mut self) -> u32 {
        self.next_u32() % 100
    }

    /// Roll in `[min, max]` inclusive. Returns `min` when the range is empty.
    fn range(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        let span = (i64::from(max) - i64::from(min) + 1) as u64;
        let offset = u64::from(self.next_u32()) % span;
        (i64::from(min) + offset as i64) as i32
    }
}

/// Stateful PCG-XSH-RR generator (64-bit state, 32-bit output).
#[derive(Clone, Debug)]
pub struct PcgRandom {
    state: u64,
}

impl PcgRandom {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation.
    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RandomSource for PcgRandom {
    fn next_u32(&mut self) -> u32 {
        self.state = Self::step(self.state);
        Self::output(self.state)
    }
}

/// Shuffled deck of the numbers `0..100`, reshuffled when exhausted.
///
/// Over any 100 consecutive draws from a fresh deck each value appears exactly
/// once.
#[derive(Clone, Debug)]
pub struct NumberDeck {
    cards: Vec<u32>,
    shuffler: PcgRandom,
}

impl NumberDeck {
    pub const SIZE: u32 = 100;

    pub fn new(seed: u64) -> Self {
        Self {
            cards: Vec::with_capacity(Self::SIZE as usize),
            shuffler: PcgRandom::new(seed),
        }
    }

    /// Cards left before the next reshuffle.
    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    fn refill(&mut self) {
        self.cards.clear();
        self.cards.extend(0..Self::SIZE);
        // Fisher-Yates
        for i in (1..self.cards.len()).rev() {
            let j = (self.shuffler.next_u32() as usize) % (i + 1);
            self.cards.swap(i, j);
        }
    }

    pub fn draw(&mut self) -> u32 {
        if self.cards.is_empty() {
            self.refill();
        }
        self.cards.pop().unwrap_or(0)
    }
}

impl RandomSource for NumberDeck {
    fn next_u32(&mut self) -> u32 {
        self.draw()
    }

    fn percent(&mut self) -> u32 {
        self.draw()
    }
}

/// Replays a fixed list of raw values, cycling when it runs out.
///
/// Used to script outcomes in tests and scenario replays.
#[derive(Clone, Debug)]
pub struct ScriptedRandom {
    values: Vec<u32>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: Vec<u32>) -> Self {
        Self { values, cursor: 0 }
    }
}

impl RandomSource for ScriptedRandom {
    fn next_u32(&mut self) -> u32 {
        if self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

/// Compute deterministic seed from region and entity components.
///
/// Combines multiple entropy sources so every player deck in every region
/// gets its own sequence.
pub fn compute_seed(region_seed: u64, nonce: u64, entity: u32, context: u32) -> u64 {
    // SplitMix64 / FxHash multipliers
    let mut hash = region_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (entity as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    // Final avalanche step
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

/// A player's own roll sequence, detached from the region that dealt it.
pub type PlayerSequence = Box<dyn RandomSource + Send>;

/// Per-region roll provider.
pub struct Dice {
    seed: u64,
    ambient: Box<dyn RandomSource + Send>,
    players: BTreeMap<EntityId, PlayerSequence>,
}

impl Dice {
    /// Seeded dice with a PCG ambient generator.
    pub fn seeded(seed: u64) -> Self {
        Self::with_ambient(seed, PcgRandom::new(compute_seed(seed, 0, 0, 0)))
    }

    /// Dice with a caller-supplied ambient generator; decks still derive from `seed`.
    pub fn with_ambient(seed: u64, ambient: impl RandomSource + Send + 'static) -> Self {
        Self {
            seed,
            ambient: Box::new(ambient),
            players: BTreeMap::new(),
        }
    }

    /// Generic generator for rolls that are not tied to a player.
    pub fn ambient(&mut self) -> &mut dyn RandomSource {
        self.ambient.as_mut()
    }

    /// The player's own sequence, a fresh [`NumberDeck`] on first use.
    pub fn player(&mut self, player: EntityId) -> &mut dyn RandomSource {
        let seed = self.seed;
        self.players
            .entry(player)
            .or_insert_with(|| Box::new(NumberDeck::new(compute_seed(seed, 0, player.0, 1))))
            .as_mut()
    }

    /// Installs a specific sequence for a player, replacing any existing one.
    pub fn set_player(&mut self, player: EntityId, source: impl RandomSource + Send + 'static) {
        self.players.insert(player, Box::new(source));
    }

    /// Detaches the player's sequence, if one was dealt here.
    ///
    /// Dropping the result forgets the player; handing it to another region's
    /// [`Dice::restore_player`] lets the sequence continue there.
    pub fn take_player(&mut self, player: EntityId) -> Option<PlayerSequence> {
        self.players.remove(&player)
    }

    pub fn restore_player(&mut self, player: EntityId, sequence: PlayerSequence) {
        self.players.insert(player, sequence);
    }

    /// Number of players with a sequence in this region.
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Source for a roll made by `roller`: their own sequence if they are a player.
    pub fn for_roller(&mut self, roller: &Combatant) -> &mut dyn RandomSource {
        if roller.kind.is_player() {
            self.player(roller.id)
        } else {
            self.ambient()
        }
    }
}

impl core::fmt::Debug for Dice {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Dice")
            .field("seed", &self.seed)
            .field("players", &self.players.len())
            .finish_non_exhaustive()
    }
}
