use std::collections::HashSet;
use std::convert::Infallible;

use tracing::{debug, trace, warn};

use crate::bits::bit_indices;
use crate::hash::OneWayHash;
use crate::keys::{PrivateKey, Signature};
use crate::{Error, Result, DIGEST_SIZE, SLOTS};

impl PrivateKey {
    /// Signs `digest`, producing a [`Signature`] which another party can
    /// check with [`crate::Verifier::verify`] and the [`crate::PublicKey`]
    /// derived from this key.
    ///
    /// The key is consumed: a Lamport key must sign at most one message.
    /// Keys that live on disk between processes also need a [`KeyStore`]
    /// to record that they were spent; see [`Signer`].
    pub fn sign(self, digest: &[u8]) -> Result<Signature> {
        select_components(&self, digest)
    }

    /// Hashes `message` with `hash` and signs the digest.
    pub fn sign_message<H: OneWayHash, A: AsRef<[u8]>>(
        self,
        hash: &H,
        message: A,
    ) -> Result<Signature> {
        let digest = hash.hash(message.as_ref())?;
        self.sign(&digest)
    }
}

fn select_components(private_key: &PrivateKey, digest: &[u8]) -> Result<Signature> {
    if digest.len() != DIGEST_SIZE {
        return Err(Error::malformed("digest", DIGEST_SIZE, digest.len()));
    }
    if private_key.len() != SLOTS {
        return Err(Error::malformed("private key", SLOTS, private_key.len()));
    }

    let slots = private_key.slots();
    let components = bit_indices(digest)
        .map(|bit| {
            trace!(slot = bit.slot, bit = bit.value, "selecting private key half");
            slots[bit.slot][bit.half()]
        })
        .collect();
    Ok(Signature::from_components(components))
}

/// Remembers which private keys have already signed something.
///
/// The scheme itself cannot tell a fresh key from a spent one, so this is
/// where the at-most-once rule is enforced for keys that outlive a process.
pub trait KeyStore {
    type Error: std::error::Error + Send + Sync + 'static;

    fn is_consumed(&self, key_id: &str) -> Result<bool, Self::Error>;

    /// Atomically claims `key_id`. Returns `false` if it was already
    /// marked, including by a concurrent signer since `is_consumed`.
    fn mark_consumed(&mut self, key_id: &str) -> Result<bool, Self::Error>;
}

/// A [`KeyStore`] that only lives as long as the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryKeyStore {
    consumed: HashSet<String>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyStore for MemoryKeyStore {
    type Error = Infallible;

    fn is_consumed(&self, key_id: &str) -> Result<bool, Infallible> {
        Ok(self.consumed.contains(key_id))
    }

    fn mark_consumed(&mut self, key_id: &str) -> Result<bool, Infallible> {
        Ok(self.consumed.insert(key_id.to_owned()))
    }
}

/// Signs with private keys while keeping a [`KeyStore`] up to date.
#[derive(Debug, Clone)]
pub struct Signer<S> {
    store: S,
}

impl<S: KeyStore> Signer<S> {
    pub fn new(store: S) -> Self {
        Signer { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Signs `digest` with the key known to the store as `key_id`.
    ///
    /// Fails with [`Error::KeyConsumed`] if the store has seen this key
    /// sign before, or if another signer claims it first. The signature
    /// is only returned once this call has claimed the key; otherwise it
    /// is discarded.
    pub fn sign(
        &mut self,
        key_id: &str,
        private_key: PrivateKey,
        digest: &[u8],
    ) -> Result<Signature> {
        if self.store.is_consumed(key_id).map_err(store_error)? {
            warn!(key_id, "refusing to sign with a consumed private key");
            return Err(Error::KeyConsumed(key_id.to_owned()));
        }

        let signature = private_key.sign(digest)?;
        if !self.store.mark_consumed(key_id).map_err(store_error)? {
            warn!(key_id, "private key was claimed by another signer, discarding signature");
            return Err(Error::KeyConsumed(key_id.to_owned()));
        }

        debug!(key_id, components = signature.len(), "signed digest");
        Ok(signature)
    }
}

fn store_error<E: std::error::Error + Send + Sync + 'static>(error: E) -> Error {
    Error::KeyStore(Box::new(error))
}
