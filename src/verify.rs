use subtle::ConstantTimeEq;
use tracing::{debug, trace};

use crate::bits::bit_indices;
use crate::hash::{OneWayHash, Sha256};
use crate::keys::{PublicKey, Signature};
use crate::{Error, Result, DIGEST_SIZE, SLOTS};

/// Checks signatures against public keys. Holds no state besides the
/// hash, so one verifier can be shared and reused freely.
#[derive(Debug, Default, Clone, Copy)]
pub struct Verifier<H = Sha256> {
    hash: H,
}

impl Verifier {
    pub fn new() -> Self {
        Verifier { hash: Sha256 }
    }
}

impl<H: OneWayHash> Verifier<H> {
    pub fn with(hash: H) -> Self {
        Verifier { hash }
    }

    /// Returns whether `signature` is a valid signature of `digest` under
    /// `public_key`.
    ///
    /// `Ok(false)` means the signature does not match. Inputs of the
    /// wrong shape are an [`Error::MalformedInput`] instead, since no
    /// verdict about the signature can be reached for them.
    pub fn verify(
        &self,
        public_key: &PublicKey,
        signature: &Signature,
        digest: &[u8],
    ) -> Result<bool> {
        if digest.len() != DIGEST_SIZE {
            return Err(Error::malformed("digest", DIGEST_SIZE, digest.len()));
        }
        if public_key.len() != SLOTS {
            return Err(Error::malformed("public key", SLOTS, public_key.len()));
        }
        if signature.len() != SLOTS {
            return Err(Error::malformed("signature", SLOTS, signature.len()));
        }

        let expected = public_key.slots();
        let components = signature.components();
        for bit in bit_indices(digest) {
            let computed = self.hash.hash(&components[bit.slot])?;
            let committed = &expected[bit.slot][bit.half()];
            if !bool::from(computed[..].ct_eq(&committed[..])) {
                debug!(slot = bit.slot, "signature component does not match public key");
                return Ok(false);
            }
            trace!(slot = bit.slot, bit = bit.value, "signature component matches");
        }
        Ok(true)
    }

    /// Hashes `message` and verifies the signature over its digest.
    pub fn verify_message<A: AsRef<[u8]>>(
        &self,
        public_key: &PublicKey,
        signature: &Signature,
        message: A,
    ) -> Result<bool> {
        let digest = self.hash.hash(message.as_ref())?;
        self.verify(public_key, signature, &digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Blake3;
    use crate::keys::{KeyComponent, PrivateKey};
    use crate::{Digest, KeyGenerator, KEY_SIZE};
    use proptest::prelude::*;

    #[test]
    fn end_to_end() -> Result<(), Box<dyn std::error::Error>> {
        let (private_key, public_key) = KeyGenerator::new().generate()?;
        let verifier = Verifier::new();
        let message = b"Hello, world!";

        let signature = private_key.clone().sign_message(&Sha256, message)?;
        assert!(verifier.verify_message(&public_key, &signature, message)?);

        let faulty_message = b"Hello, not world!";
        assert!(!verifier.verify_message(&public_key, &signature, faulty_message)?);

        let faulty_signature = private_key.sign_message(&Sha256, faulty_message)?;
        assert!(!verifier.verify_message(&public_key, &faulty_signature, message)?);
        assert!(verifier.verify_message(&public_key, &faulty_signature, faulty_message)?);
        Ok(())
    }

    #[test]
    fn verification_is_repeatable() {
        let (private_key, public_key) = KeyGenerator::new().generate().unwrap();
        let digest = [0xA5u8; DIGEST_SIZE];
        let signature = private_key.sign(&digest).unwrap();
        let verifier = Verifier::new();
        for _ in 0..3 {
            assert!(verifier.verify(&public_key, &signature, &digest).unwrap());
        }
    }

    #[test]
    fn flipped_signature_bit_is_rejected() {
        let (private_key, public_key) = KeyGenerator::new().generate().unwrap();
        let digest = Sha256.hash(b"tamper").unwrap();
        let signature = private_key.sign(&digest).unwrap();

        let mut components: Vec<KeyComponent> = signature.into();
        components[100][5] ^= 0x10;
        let tampered = Signature::from_components(components);
        assert!(!Verifier::new().verify(&public_key, &tampered, &digest).unwrap());
    }

    #[test]
    fn flipped_digest_bit_is_rejected() {
        let (private_key, public_key) = KeyGenerator::new().generate().unwrap();
        let digest = Sha256.hash(b"tamper").unwrap();
        let signature = private_key.sign(&digest).unwrap();

        let mut tampered = digest;
        tampered[31] ^= 0x01;
        assert!(!Verifier::new().verify(&public_key, &signature, &tampered).unwrap());
    }

    #[test]
    fn wrong_hash_is_rejected() {
        let (private_key, public_key) = KeyGenerator::new().generate().unwrap();
        let digest = [0u8; DIGEST_SIZE];
        let signature = private_key.sign(&digest).unwrap();
        let blake3 = Verifier::with(Blake3);
        assert!(!blake3.verify(&public_key, &signature, &digest).unwrap());
    }

    struct Broken;

    impl OneWayHash for Broken {
        fn hash(&self, _: &[u8]) -> Result<Digest> {
            Err(Error::HashFailure("backend unavailable".into()))
        }

        fn hash_reader<R: std::io::Read>(&self, _: R) -> Result<Digest> {
            Err(Error::HashFailure("backend unavailable".into()))
        }
    }

    #[test]
    fn hash_failure_is_an_error_not_a_verdict() {
        let (private_key, public_key) = KeyGenerator::new().generate().unwrap();
        let digest = [0x3Cu8; DIGEST_SIZE];
        let signature = private_key.sign(&digest).unwrap();

        let err = Verifier::with(Broken)
            .verify(&public_key, &signature, &digest)
            .unwrap_err();
        assert!(matches!(err, Error::HashFailure(_)));
    }

    #[test]
    fn malformed_shapes_are_errors_not_verdicts() {
        let (private_key, public_key) = KeyGenerator::new().generate().unwrap();
        let digest = [0u8; DIGEST_SIZE];
        let signature = private_key.sign(&digest).unwrap();
        let verifier = Verifier::new();

        let err = verifier
            .verify(&public_key, &signature, &digest[..DIGEST_SIZE - 1])
            .unwrap_err();
        assert!(matches!(err, Error::MalformedInput { what: "digest", .. }));

        let mut components: Vec<KeyComponent> = signature.clone().into();
        components.pop();
        let short_signature = Signature::from_components(components);
        let err = verifier
            .verify(&public_key, &short_signature, &digest)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedInput { what: "signature", actual, .. } if actual == SLOTS - 1
        ));

        let short_key = PublicKey::from_slots(public_key.slots()[1..].to_vec());
        let err = verifier.verify(&short_key, &signature, &digest).unwrap_err();
        assert!(matches!(err, Error::MalformedInput { what: "public key", .. }));
    }

    /// Every `secret0` is all zeroes and every `secret1` all `0xFF`.
    fn fixed_private_key() -> PrivateKey {
        PrivateKey::from_slots(vec![[[0x00; KEY_SIZE], [0xFF; KEY_SIZE]]; SLOTS])
    }

    #[test]
    fn fixed_key_vector() {
        let private_key = fixed_private_key();
        let public_key = private_key.public_key(&Sha256).unwrap();

        let mut digest: Digest = [0xFF; DIGEST_SIZE];
        digest[0] = 0x00;
        let signature = private_key.sign(&digest).unwrap();

        assert_eq!(signature.len(), SLOTS);
        for (slot, component) in signature.components().iter().enumerate() {
            if slot < 8 {
                assert_eq!(component, &[0x00; KEY_SIZE]);
            } else {
                assert_eq!(component, &[0xFF; KEY_SIZE]);
            }
        }

        let verifier = Verifier::new();
        assert!(verifier.verify(&public_key, &signature, &digest).unwrap());

        let (_, unrelated) = KeyGenerator::new().generate().unwrap();
        assert!(!verifier.verify(&unrelated, &signature, &digest).unwrap());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 99, .. ProptestConfig::default()
        })]

        #[test]
        fn really_works(s in "\\PC*") {
            let (private_key, public_key) = KeyGenerator::new().generate()?;
            let message = s.as_bytes();

            let signature = private_key.sign_message(&Sha256, message)?;
            prop_assert!(Verifier::new().verify_message(&public_key, &signature, message)?);
        }

        #[test]
        fn any_single_flipped_digest_bit_is_rejected(
            digest in any::<[u8; DIGEST_SIZE]>(),
            slot in 0..SLOTS,
        ) {
            let (private_key, public_key) = KeyGenerator::new().generate()?;
            let signature = private_key.sign(&digest)?;

            let mut tampered = digest;
            tampered[slot / 8] ^= 0x80 >> (slot % 8);
            prop_assert!(!Verifier::new().verify(&public_key, &signature, &tampered)?);
        }
    }
}
