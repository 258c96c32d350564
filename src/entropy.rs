//! Secure randomness for key generation.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::{Error, Result};

/// A source of key material.
///
/// [`crate::KeyGenerator`] always calls [`EntropySource::check_seeded`]
/// before the first [`EntropySource::fill`], and aborts if it fails.
pub trait EntropySource {
    /// Confirms the source is seeded well enough to produce secret keys.
    fn check_seeded(&mut self) -> Result<()>;

    /// Fills `dest` entirely with random bytes.
    fn fill(&mut self, dest: &mut [u8]) -> Result<()>;
}

/// Any cryptographically secure [`rand`] generator.
#[derive(Debug, Clone)]
pub struct RngEntropy<R> {
    rng: R,
}

/// The operating system random number generator.
pub type OsEntropy = RngEntropy<OsRng>;

impl<R: RngCore + CryptoRng> RngEntropy<R> {
    pub fn new(rng: R) -> Self {
        RngEntropy { rng }
    }
}

impl Default for OsEntropy {
    fn default() -> Self {
        RngEntropy::new(OsRng)
    }
}

impl<R: RngCore + CryptoRng> EntropySource for RngEntropy<R> {
    fn check_seeded(&mut self) -> Result<()> {
        // Discarded test draw; an unseeded source errors here.
        let mut sample = Zeroizing::new([0u8; 16]);
        self.rng
            .try_fill_bytes(&mut sample[..])
            .map_err(|e| Error::Entropy(e.to_string()))
    }

    fn fill(&mut self, dest: &mut [u8]) -> Result<()> {
        self.rng
            .try_fill_bytes(dest)
            .map_err(|e| Error::Entropy(e.to_string()))
    }
}
