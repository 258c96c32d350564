use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::hash::OneWayHash;
use crate::{Digest, Result, KEY_SIZE};

/// One random secret. Two of these make up each slot of a [`PrivateKey`].
pub type KeyComponent = [u8; KEY_SIZE];

/// A private key is what you generate and keep in order to sign exactly
/// one message. From it you derive a [`PublicKey`] to hand to others.
///
/// Slot `i` holds `[secret0, secret1]`; signing reveals one of the two for
/// every bit of the digest. Revealing both halves of a slot, which is what
/// happens when one key signs two different digests, lets anyone forge.
/// For that reason [`PrivateKey::sign`] takes `self` by value, and the
/// bytes are wiped when the key is dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    slots: Vec<[KeyComponent; 2]>,
}

impl PrivateKey {
    /// Wraps already decoded key material. The slot count is checked by
    /// the operations that use the key, not here.
    pub fn from_slots(slots: Vec<[KeyComponent; 2]>) -> Self {
        PrivateKey { slots }
    }

    pub fn slots(&self) -> &[[KeyComponent; 2]] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Creates the [`PublicKey`] associated with this [`PrivateKey`] by
    /// hashing every secret on its own.
    pub fn public_key<H: OneWayHash>(&self, hash: &H) -> Result<PublicKey> {
        let slots = self
            .slots
            .iter()
            .map(|[secret0, secret1]| Ok([hash.hash(secret0)?, hash.hash(secret1)?]))
            .collect::<Result<Vec<_>>>()?;
        Ok(PublicKey { slots })
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("slots", &self.slots.len())
            .finish_non_exhaustive()
    }
}

/// The public key associated with a given [`PrivateKey`]: slot `i` holds
/// `[hash(secret0), hash(secret1)]`. Safe to publish.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct PublicKey {
    slots: Vec<[Digest; 2]>,
}

impl PublicKey {
    pub fn from_slots(slots: Vec<[Digest; 2]>) -> Self {
        PublicKey { slots }
    }

    pub fn slots(&self) -> &[[Digest; 2]] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// The result of signing a digest: for every slot, the one secret that
/// the corresponding digest bit selected, in slot order.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct Signature {
    components: Vec<KeyComponent>,
}

impl Signature {
    pub fn from_components(components: Vec<KeyComponent>) -> Self {
        Signature { components }
    }

    pub fn components(&self) -> &[KeyComponent] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl From<Signature> for Vec<KeyComponent> {
    fn from(signature: Signature) -> Self {
        signature.components
    }
}
