use thiserror::Error;

/// Everything that can go wrong inside the signature core.
///
/// A signature that fails to verify is not an error: [`crate::Verifier::verify`]
/// returns `Ok(false)` for it. [`Error::MalformedInput`] means the inputs
/// themselves had the wrong shape and no verdict was reached.
#[derive(Debug, Error)]
pub enum Error {
    /// The random source could not certify that it is adequately seeded.
    #[error("entropy source unusable: {0}")]
    Entropy(String),

    /// A key, digest or signature does not have the size the scheme requires.
    #[error("malformed {what}: expected {expected}, got {actual}")]
    MalformedInput {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The underlying hash primitive faulted.
    #[error("hash primitive failed: {0}")]
    HashFailure(String),

    /// The key store reports this private key has already signed a message.
    #[error("private key {0:?} has already been used to sign")]
    KeyConsumed(String),

    /// The key store itself failed.
    #[error("key store: {0}")]
    KeyStore(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Encoded key material could not be decoded.
    #[error("invalid {what} encoding at {position}: {reason}")]
    Encoding {
        what: &'static str,
        position: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn malformed(what: &'static str, expected: usize, actual: usize) -> Self {
        Error::MalformedInput {
            what,
            expected,
            actual,
        }
    }

    /// True for errors caused by the caller's inputs rather than the environment.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::MalformedInput { .. } | Error::Encoding { .. })
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
