use tracing::debug;
use zeroize::Zeroizing;

use crate::entropy::{EntropySource, OsEntropy};
use crate::hash::{OneWayHash, Sha256};
use crate::keys::{KeyComponent, PrivateKey, PublicKey};
use crate::{Result, KEY_SIZE, SLOTS};

/// Produces fresh Lamport key pairs.
#[derive(Debug, Clone)]
pub struct KeyGenerator<H = Sha256, E = OsEntropy> {
    hash: H,
    entropy: E,
}

impl KeyGenerator {
    /// SHA-256 and the operating system random number generator.
    pub fn new() -> Self {
        KeyGenerator {
            hash: Sha256,
            entropy: OsEntropy::default(),
        }
    }
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: OneWayHash, E: EntropySource> KeyGenerator<H, E> {
    pub fn with(hash: H, entropy: E) -> Self {
        KeyGenerator { hash, entropy }
    }

    /// Draws two independent secrets for each of the [`SLOTS`] slots and
    /// hashes each of them to build the matching public key.
    ///
    /// Nothing is returned unless both keys are complete. The entropy
    /// source is checked before any key bytes are drawn.
    pub fn generate(&mut self) -> Result<(PrivateKey, PublicKey)> {
        self.entropy.check_seeded()?;

        let mut slots: Zeroizing<Vec<[KeyComponent; 2]>> =
            Zeroizing::new(Vec::with_capacity(SLOTS));
        for _ in 0..SLOTS {
            let mut pair = Zeroizing::new([[0u8; KEY_SIZE]; 2]);
            self.entropy.fill(&mut pair[0])?;
            self.entropy.fill(&mut pair[1])?;
            slots.push(*pair);
        }
        let private_key = PrivateKey::from_slots(std::mem::take(&mut *slots));
        let public_key = private_key.public_key(&self.hash)?;

        debug!(slots = SLOTS, "generated lamport key pair");
        Ok((private_key, public_key))
    }
}
