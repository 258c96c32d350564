//! The one-way function every public key component and message digest is
//! computed with.

use std::io::{self, Read};

use sha2::Digest as _;

use crate::{Digest, Result, DIGEST_SIZE};

/// A collision- and preimage-resistant hash with a [`DIGEST_SIZE`] output.
pub trait OneWayHash {
    /// Hashes a single in-memory buffer.
    fn hash(&self, bytes: &[u8]) -> Result<Digest>;

    /// Hashes everything `reader` yields until EOF.
    fn hash_reader<R: Read>(&self, reader: R) -> Result<Digest>;
}

/// SHA-256. This is the primitive the on-disk key format is defined over.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Sha256;

impl OneWayHash for Sha256 {
    fn hash(&self, bytes: &[u8]) -> Result<Digest> {
        let mut digest = [0u8; DIGEST_SIZE];
        digest.copy_from_slice(&sha2::Sha256::digest(bytes));
        Ok(digest)
    }

    fn hash_reader<R: Read>(&self, mut reader: R) -> Result<Digest> {
        let mut hasher = sha2::Sha256::new();
        let read = io::copy(&mut reader, &mut hasher)?;
        tracing::trace!(bytes = read, "hashed message with sha256");
        let mut digest = [0u8; DIGEST_SIZE];
        digest.copy_from_slice(&hasher.finalize());
        Ok(digest)
    }
}

/// Blake 3 with its default 32 byte output.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Blake3;

impl OneWayHash for Blake3 {
    fn hash(&self, bytes: &[u8]) -> Result<Digest> {
        Ok(*blake3::hash(bytes).as_bytes())
    }

    fn hash_reader<R: Read>(&self, mut reader: R) -> Result<Digest> {
        let mut hasher = blake3::Hasher::new();
        let read = io::copy(&mut reader, &mut hasher)?;
        tracing::trace!(bytes = read, "hashed message with blake3");
        Ok(*hasher.finalize().as_bytes())
    }
}
