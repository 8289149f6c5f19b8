use crate::error::{Error, Result};
use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};

/// A source of unpredictable bits for the random field of an identifier.
///
/// Implementations are owned by a single generator and are only ever called
/// while its state lock is held, so they need `Send` but not `Sync`.
pub trait EntropySource: Send {
    /// Draws the next value below `2^bits`. `bits` is in `1..=64`.
    fn next_bits(&mut self, bits: u32) -> u64;
}

/// Pseudo-random engine backed by [`StdRng`].
#[derive(Debug, Clone)]
pub struct SeededEntropy {
    rng: StdRng,
}

impl SeededEntropy {
    /// Seeds the engine from the operating system.
    pub fn from_os() -> Result<Self> {
        Self::from_rng(OsRng)
    }

    /// Seeds the engine from another generator, usually an OS-backed one.
    ///
    /// A source that cannot fill the seed yields [`Error::EntropyUnavailable`].
    pub fn from_rng<R: RngCore>(source: R) -> Result<Self> {
        let rng =
            StdRng::from_rng(source).map_err(|e| Error::EntropyUnavailable(e.to_string()))?;
        Ok(Self { rng })
    }

    /// Seeds the engine deterministically.
    ///
    /// Every engine built from the same seed yields the same sequence, so this
    /// must only be used for tests and reproductions.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl EntropySource for SeededEntropy {
    fn next_bits(&mut self, bits: u32) -> u64 {
        debug_assert!((1..=64).contains(&bits), "bits out of range: {bits}");
        self.rng.next_u64() & low_mask(bits)
    }
}

/// Mask selecting the lowest `bits` bits of a `u64`.
pub(crate) const fn low_mask(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1_u64 << bits) - 1
    }
}
