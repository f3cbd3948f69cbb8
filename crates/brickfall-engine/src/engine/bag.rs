use std::{collections::VecDeque, fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom as _,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Piece, PieceKind};

/// Supplies pieces using the 7-bag randomization algorithm.
///
/// # 7-Bag System
///
/// 1. When the queue runs dry, all 7 piece kinds are shuffled into a new bag
/// 2. Pieces are drawn from the front of the queue in order
///
/// Every 7 draws starting at a bag boundary therefore yield each kind exactly
/// once, which bounds how long any kind can be absent.
///
/// Previews share the same queue: [`PieceBag::peek`] appends real bags when it
/// needs to look further ahead, so what it shows is exactly what
/// [`PieceBag::next_piece`] returns later.
///
/// # Example
///
/// ```
/// use brickfall_engine::PieceBag;
///
/// let mut bag = PieceBag::new();
/// let upcoming = bag.peek(3);
/// let first = bag.next_piece();
/// assert_eq!(first.kind(), upcoming[0]);
/// ```
#[derive(Debug, Clone)]
pub struct PieceBag {
    rng: Pcg32,
    queue: VecDeque<PieceKind>,
    spawn_shift: i32,
}

impl Default for PieceBag {
    fn default() -> Self {
        Self::new()
    }
}

/// Seed for deterministic piece generation.
///
/// A 128-bit seed for the piece generator. The same seed always produces the
/// same piece sequence. Serialized as a 32-character hex string.
///
/// # Example
///
/// ```
/// use brickfall_engine::{PieceBag, PieceSeed};
/// use rand::Rng as _;
///
/// let seed: PieceSeed = rand::rng().random();
/// let mut a = PieceBag::with_seed(seed);
/// let mut b = PieceBag::with_seed(seed);
/// assert_eq!(a.next_piece(), b.next_piece());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Error parsing a [`PieceSeed`] from its hex representation.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed {input:?}: expected 32 hex characters")]
pub struct ParseSeedError {
    input: String,
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 {
            return Err(err());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| err())?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

impl PieceBag {
    /// Creates a bag with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic piece generation.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
            queue: VecDeque::with_capacity(PieceKind::LEN * 2),
            spawn_shift: 0,
        }
    }

    /// Shifts the spawn column of every piece this bag produces.
    #[must_use]
    pub fn with_spawn_shift(mut self, dx: i32) -> Self {
        self.spawn_shift = dx;
        self
    }

    /// Appends one shuffled permutation of all 7 kinds to the queue.
    fn push_bag(&mut self) {
        let mut bag = PieceKind::ALL;
        bag.shuffle(&mut self.rng);
        self.queue.extend(bag);
    }

    /// Draws the next kind, refilling only when the queue is empty.
    pub fn next_kind(&mut self) -> PieceKind {
        loop {
            if let Some(kind) = self.queue.pop_front() {
                return kind;
            }
            self.push_bag();
        }
    }

    /// Draws the next piece, placed at its spawn position.
    pub fn next_piece(&mut self) -> Piece {
        Piece::with_spawn_shift(self.next_kind(), self.spawn_shift)
    }

    /// Returns the next `n` kinds without consuming them.
    ///
    /// Bags generated to satisfy the preview stay queued and are the ones
    /// later drawn by [`Self::next_piece`].
    pub fn peek(&mut self, n: usize) -> Vec<PieceKind> {
        while self.queue.len() < n {
            self.push_bag();
        }
        self.queue.iter().copied().take(n).collect()
    }

    /// Number of kinds already generated but not drawn yet.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }
}

impl Iterator for PieceBag {
    type Item = Piece;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_piece())
    }
}
