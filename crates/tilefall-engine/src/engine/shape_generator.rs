use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::ShapeId;

/// Draws shapes uniformly from `1..=7` and keeps one of them as the lookahead.
///
/// The lookahead is what the preview panel shows: [`ShapeGenerator::peek`]
/// reads it, [`ShapeGenerator::pop_next`] hands it out and draws a fresh one.
///
/// # Example
///
/// ```
/// use tilefall_engine::{PieceSeed, ShapeGenerator};
///
/// let seed: PieceSeed = "000102030405060708090a0b0c0d0e0f".parse().unwrap();
/// let mut a = ShapeGenerator::with_seed(seed);
/// let mut b = ShapeGenerator::with_seed(seed);
///
/// let previewed = a.peek();
/// assert_eq!(a.pop_next(), previewed);
/// assert_eq!(b.pop_next(), previewed);
/// assert_eq!(a.peek(), b.peek());
/// ```
#[derive(Debug, Clone)]
pub struct ShapeGenerator {
    rng: Pcg32,
    next: ShapeId,
}

impl Default for ShapeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeGenerator {
    /// Creates a generator with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but reproducible: the same seed yields the same shapes.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        let mut rng = Pcg32::from_seed(seed.0);
        let next = rng.random();
        Self { rng, next }
    }

    /// The lookahead shape.
    #[must_use]
    pub fn peek(&self) -> ShapeId {
        self.next
    }

    /// Returns the lookahead shape and replaces it with a new draw.
    pub fn pop_next(&mut self) -> ShapeId {
        std::mem::replace(&mut self.next, self.rng.random())
    }
}

/// 128-bit seed for [`ShapeGenerator`].
///
/// Written as 32 hex digits, both in its `Display`/`FromStr` form and when
/// serialized.
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

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed {input:?}: expected 32 hex digits")]
pub struct ParseSeedError {
    input: String,
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| err())?;
        Ok(Self(num.to_be_bytes()))
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

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}
