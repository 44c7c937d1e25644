use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Block, BlockKind};

/// Supplies upcoming blocks, never repeating the same kind twice in a row.
///
/// The queue keeps one preview block. Each [`BlockQueue::get_and_update`] hands
/// out the previewed kind and draws a fresh preview uniformly from the seven
/// kinds, drawing again whenever it matches the block just handed out.
///
/// # Example
///
/// ```
/// use blockfall_engine::{BlockQueue, QueueSeed};
/// use rand::Rng as _;
///
/// let seed: QueueSeed = rand::rng().random();
/// let mut queue = BlockQueue::with_seed(seed);
///
/// let upcoming = queue.next_block();
/// let block = queue.get_and_update();
/// assert_eq!(block.kind(), upcoming);
/// assert_ne!(queue.next_block(), upcoming);
/// ```
#[derive(Debug, Clone)]
pub struct BlockQueue {
    rng: Pcg32,
    seed: QueueSeed,
    next: BlockKind,
}

impl Default for BlockQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Seed for deterministic block generation.
///
/// A 128-bit seed for the queue's random number generator. Two queues built from
/// the same seed hand out the same sequence of blocks, which makes sessions
/// replayable and tests deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueSeed([u8; 16]);

impl QueueSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }
}

impl fmt::Display for QueueSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 32 lowercase hex digits, big-endian
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl Serialize for QueueSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for QueueSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed: {reason}")]
pub struct ParseSeedError {
    reason: String,
}

impl FromStr for QueueSeed {
    type Err = ParseSeedError;

    fn from_str(hex_str: &str) -> Result<Self, Self::Err> {
        if hex_str.len() != 32 {
            return Err(ParseSeedError {
                reason: format!("expected 32 characters, got {}", hex_str.len()),
            });
        }
        let num = u128::from_str_radix(hex_str, 16).map_err(|e| ParseSeedError {
            reason: format!("{hex_str} ({e})"),
        })?;
        Ok(Self::from_u128(num))
    }
}

impl Distribution<QueueSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> QueueSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        QueueSeed(seed)
    }
}

impl BlockQueue {
    /// Creates a queue seeded from the OS random source.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic generation.
    #[must_use]
    pub fn with_seed(seed: QueueSeed) -> Self {
        let mut rng = Pcg32::from_seed(seed.0);
        let next = rng.random();
        Self { rng, seed, next }
    }

    /// Returns the seed this queue was created with.
    #[must_use]
    pub fn seed(&self) -> QueueSeed {
        self.seed
    }

    /// Returns the kind the next call to [`Self::get_and_update`] will hand out.
    #[must_use]
    pub fn next_block(&self) -> BlockKind {
        self.next
    }

    /// Hands out a fresh block of the previewed kind and draws a new preview.
    pub fn get_and_update(&mut self) -> Block {
        let block = Block::new(self.next);
        self.next = loop {
            let candidate: BlockKind = self.rng.random();
            if candidate != block.kind() {
                break candidate;
            }
        };
        block
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const SEED: QueueSeed = QueueSeed::from_u128(0x1234_5678_9abc_def0_1122_3344_5566_7788);

    #[test]
    fn test_consecutive_blocks_differ() {
        let mut queue = BlockQueue::with_seed(SEED);
        let mut prev = queue.get_and_update().kind();
        for _ in 0..1000 {
            let block = queue.get_and_update();
            assert_ne!(block.kind(), prev);
            prev = block.kind();
        }
    }

    #[test]
    fn test_get_and_update_returns_previewed_kind() {
        let mut queue = BlockQueue::with_seed(SEED);
        for _ in 0..50 {
            let preview = queue.next_block();
            let block = queue.get_and_update();
            assert_eq!(block.kind(), preview);
            assert_eq!(block, Block::new(preview), "blocks come out in spawn state");
        }
    }

    #[test]
    fn test_all_kinds_are_produced() {
        let mut queue = BlockQueue::with_seed(SEED);
        let seen: HashSet<_> = (0..200).map(|_| queue.get_and_update().kind()).collect();
        assert_eq!(seen.len(), BlockKind::LEN);
    }

    #[test]
    fn test_deterministic_block_generation() {
        let mut queue1 = BlockQueue::with_seed(SEED);
        let mut queue2 = BlockQueue::with_seed(SEED);
        for _ in 0..50 {
            assert_eq!(queue1.get_and_update(), queue2.get_and_update());
        }
        assert_eq!(queue1.seed(), SEED);
    }

    mod queue_seed_serialization {
        use super::*;

        #[test]
        fn test_known_value_sequential_bytes() {
            let seed = QueueSeed::from_bytes([
                0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
                0x32, 0x10,
            ]);
            let serialized = serde_json::to_string(&seed).unwrap();
            assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");

            let deserialized: QueueSeed = serde_json::from_str(&serialized).unwrap();
            assert_eq!(deserialized, seed);
        }

        #[test]
        fn test_known_value_all_zeros() {
            let seed = QueueSeed::from_bytes([0; 16]);
            let serialized = serde_json::to_string(&seed).unwrap();
            assert_eq!(serialized, "\"00000000000000000000000000000000\"");
        }

        #[test]
        fn test_accepts_uppercase_hex() {
            let seed: QueueSeed = "0123456789ABCDEFFEDCBA9876543210".parse().unwrap();
            assert_eq!(
                seed,
                QueueSeed::from_u128(0x0123_4567_89ab_cdef_fedc_ba98_7654_3210)
            );
        }

        #[test]
        fn test_rejects_bad_input() {
            for input in [
                "",
                "0123456789abcdef0123456789abcde",
                "0123456789abcdef0123456789abcdef0",
                "ghijklmnopqrstuvwxyzghijklmnopqr",
            ] {
                let err = input.parse::<QueueSeed>().unwrap_err();
                assert!(err.to_string().contains("invalid hex"), "{input:?}: {err}");
            }
        }

        #[test]
        fn test_serialized_seed_replays_same_blocks() {
            let original: QueueSeed = rand::rng().random();
            let json = serde_json::to_string(&original).unwrap();
            let restored: QueueSeed = serde_json::from_str(&json).unwrap();

            let mut queue1 = BlockQueue::with_seed(original);
            let mut queue2 = BlockQueue::with_seed(restored);
            for _ in 0..20 {
                assert_eq!(queue1.get_and_update(), queue2.get_and_update());
            }
        }
    }
}
