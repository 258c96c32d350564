//! Lamport one-time signatures.
//!
//! A [`PrivateKey`] holds two random secrets for every bit of a message
//! digest, and its [`PublicKey`] holds the hash of each secret. Signing a
//! digest reveals one secret per bit, picked by that bit's value; verifying
//! hashes the revealed secrets and compares them with the public key.
//!
//! ```
//! use lamport_ots::{KeyGenerator, OneWayHash, Sha256, Verifier};
//!
//! let (private_key, public_key) = KeyGenerator::new().generate()?;
//! let digest = Sha256.hash(b"attack at dawn")?;
//! let signature = private_key.sign(&digest)?;
//! assert!(Verifier::new().verify(&public_key, &signature, &digest)?);
//! # Ok::<(), lamport_ots::Error>(())
//! ```
//!
//! A key pair must sign **at most one** digest. Two signatures under the same
//! key reveal both secrets of every slot where the digests differ, and anyone
//! holding them can forge signatures mixing those bits. [`PrivateKey::sign`]
//! consumes the key so one value cannot sign twice; for keys persisted
//! between processes, sign through a [`Signer`] backed by a [`KeyStore`]
//! that remembers which keys are spent.

pub mod bits;
pub mod codec;
pub mod entropy;
mod error;
pub mod hash;
mod keygen;
mod keys;
mod sign;
mod verify;

pub use entropy::{EntropySource, OsEntropy, RngEntropy};
pub use error::{Error, Result};
pub use hash::{Blake3, OneWayHash, Sha256};
pub use keygen::KeyGenerator;
pub use keys::{KeyComponent, PrivateKey, PublicKey, Signature};
pub use sign::{KeyStore, MemoryKeyStore, Signer};
pub use verify::Verifier;

/// Size in bytes of a message digest and of every public key component.
pub const DIGEST_SIZE: usize = 32;

/// Size in bytes of every private key component.
pub const KEY_SIZE: usize = 32;

/// Number of slots in a key, one per digest bit.
pub const SLOTS: usize = 8 * DIGEST_SIZE;

/// The output of a [`OneWayHash`].
pub type Digest = [u8; DIGEST_SIZE];
