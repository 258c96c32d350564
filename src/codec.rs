//! Byte encodings for keys and signatures.
//!
//! Both encodings list key components in slot order; for keys, each slot
//! contributes `secret0` (or its hash) followed by `secret1`. The hex form
//! puts one component per line as 64 hex digits. The binary form is the
//! bare concatenation.
//!
//! Decoding only checks the encoding. Slot counts are left to signing and
//! verification, which report them as [`Error::MalformedInput`].

use zeroize::Zeroizing;

use crate::keys::{KeyComponent, PrivateKey, PublicKey, Signature};
use crate::{Error, Result, KEY_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Hex,
    Binary,
}

pub fn encode_private_key(private_key: &PrivateKey, encoding: Encoding) -> Zeroizing<Vec<u8>> {
    encode_components(private_key.slots().iter().flatten(), encoding)
}

pub fn encode_public_key(public_key: &PublicKey, encoding: Encoding) -> Vec<u8> {
    let encoded = encode_components(public_key.slots().iter().flatten(), encoding);
    encoded.to_vec()
}

pub fn encode_signature(signature: &Signature, encoding: Encoding) -> Vec<u8> {
    let encoded = encode_components(signature.components().iter(), encoding);
    encoded.to_vec()
}

pub fn decode_private_key(bytes: &[u8], encoding: Encoding) -> Result<PrivateKey> {
    let components = decode_components(bytes, encoding, "private key")?;
    Ok(PrivateKey::from_slots(pair_up(&components, "private key")?))
}

pub fn decode_public_key(bytes: &[u8], encoding: Encoding) -> Result<PublicKey> {
    let components = decode_components(bytes, encoding, "public key")?;
    Ok(PublicKey::from_slots(pair_up(&components, "public key")?))
}

pub fn decode_signature(bytes: &[u8], encoding: Encoding) -> Result<Signature> {
    let components = decode_components(bytes, encoding, "signature")?;
    Ok(Signature::from_components(components.to_vec()))
}

fn encode_components<'a>(
    components: impl Iterator<Item = &'a KeyComponent>,
    encoding: Encoding,
) -> Zeroizing<Vec<u8>> {
    let mut out = Zeroizing::new(Vec::new());
    for component in components {
        match encoding {
            Encoding::Binary => out.extend_from_slice(component),
            Encoding::Hex => {
                let line = Zeroizing::new(hex::encode(component));
                out.extend_from_slice(line.as_bytes());
                out.push(b'\n');
            }
        }
    }
    out
}

fn decode_components(
    bytes: &[u8],
    encoding: Encoding,
    what: &'static str,
) -> Result<Zeroizing<Vec<KeyComponent>>> {
    match encoding {
        Encoding::Binary => decode_binary(bytes, what),
        Encoding::Hex => decode_hex(bytes, what),
    }
}

fn decode_binary(bytes: &[u8], what: &'static str) -> Result<Zeroizing<Vec<KeyComponent>>> {
    let chunks = bytes.chunks_exact(KEY_SIZE);
    if !chunks.remainder().is_empty() {
        return Err(Error::Encoding {
            what,
            position: format!("byte {}", bytes.len() - chunks.remainder().len()),
            reason: format!("trailing partial component of {} bytes", chunks.remainder().len()),
        });
    }

    let mut components = Zeroizing::new(Vec::with_capacity(bytes.len() / KEY_SIZE));
    for chunk in chunks {
        let mut component = [0u8; KEY_SIZE];
        component.copy_from_slice(chunk);
        components.push(component);
    }
    Ok(components)
}

fn decode_hex(bytes: &[u8], what: &'static str) -> Result<Zeroizing<Vec<KeyComponent>>> {
    let text = std::str::from_utf8(bytes).map_err(|e| Error::Encoding {
        what,
        position: format!("byte {}", e.valid_up_to()),
        reason: "not valid UTF-8".into(),
    })?;

    let mut lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }

    let mut components = Zeroizing::new(Vec::with_capacity(lines.len()));
    for (number, line) in lines.iter().enumerate() {
        let position = || format!("line {}", number + 1);
        if line.len() != 2 * KEY_SIZE {
            return Err(Error::Encoding {
                what,
                position: position(),
                reason: format!("expected {} hex digits, found {}", 2 * KEY_SIZE, line.len()),
            });
        }
        let mut component = [0u8; KEY_SIZE];
        hex::decode_to_slice(line, &mut component).map_err(|e| Error::Encoding {
            what,
            position: position(),
            reason: e.to_string(),
        })?;
        components.push(component);
    }
    Ok(components)
}

fn pair_up(components: &[KeyComponent], what: &'static str) -> Result<Vec<[KeyComponent; 2]>> {
    if components.len() % 2 != 0 {
        return Err(Error::Encoding {
            what,
            position: format!("component {}", components.len()),
            reason: "key components must come in pairs".into(),
        });
    }
    Ok(components
        .chunks_exact(2)
        .map(|pair| [pair[0], pair[1]])
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{KeyGenerator, DIGEST_SIZE, SLOTS};

    #[test]
    fn hex_layout_is_one_component_per_line() {
        let private_key = PrivateKey::from_slots(vec![[[0x00; KEY_SIZE], [0xAB; KEY_SIZE]]]);
        let encoded = encode_private_key(&private_key, Encoding::Hex);
        let text = std::str::from_utf8(&encoded).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, ["00".repeat(KEY_SIZE), "ab".repeat(KEY_SIZE)]);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn generated_keys_survive_both_encodings() {
        let (private_key, public_key) = KeyGenerator::new().generate().unwrap();
        for encoding in [Encoding::Hex, Encoding::Binary] {
            let bytes = encode_private_key(&private_key, encoding);
            assert_eq!(decode_private_key(&bytes, encoding).unwrap(), private_key);
            let bytes = encode_public_key(&public_key, encoding);
            assert_eq!(decode_public_key(&bytes, encoding).unwrap(), public_key);
        }
        assert_eq!(
            encode_private_key(&private_key, Encoding::Binary).len(),
            SLOTS * 2 * KEY_SIZE
        );
    }

    #[test]
    fn signature_file_has_a_line_per_slot() {
        let (private_key, _) = KeyGenerator::new().generate().unwrap();
        let signature = private_key.sign(&[0x42; DIGEST_SIZE]).unwrap();
        let encoded = encode_signature(&signature, Encoding::Hex);
        assert_eq!(encoded.iter().filter(|&&b| b == b'\n').count(), SLOTS);
        assert_eq!(decode_signature(&encoded, Encoding::Hex).unwrap(), signature);
    }

    #[test]
    fn accepts_uppercase_and_crlf() {
        let text = format!("{}\r\n{}\r\n\n", "AB".repeat(KEY_SIZE), "cd".repeat(KEY_SIZE));
        let public_key = decode_public_key(text.as_bytes(), Encoding::Hex).unwrap();
        assert_eq!(public_key.slots(), &[[[0xAB; KEY_SIZE], [0xCD; KEY_SIZE]]]);
    }

    #[test]
    fn rejects_bad_hex() {
        let text = format!("{}\n{}zz\n", "00".repeat(KEY_SIZE), "00".repeat(KEY_SIZE - 1));
        let err = decode_signature(text.as_bytes(), Encoding::Hex).unwrap_err();
        assert!(matches!(err, Error::Encoding { what: "signature", ref position, .. } if position == "line 2"));
    }

    #[test]
    fn rejects_short_lines() {
        let err = decode_signature(b"abcd\n", Encoding::Hex).unwrap_err();
        assert!(matches!(err, Error::Encoding { .. }));
    }

    #[test]
    fn rejects_partial_binary_component() {
        let err = decode_signature(&[0u8; KEY_SIZE + 3], Encoding::Binary).unwrap_err();
        assert!(matches!(err, Error::Encoding { ref position, .. } if position == "byte 32"));
    }

    #[test]
    fn rejects_unpaired_key_component() {
        let err = decode_private_key(&[0u8; 3 * KEY_SIZE], Encoding::Binary).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn truncated_key_decodes_but_cannot_sign() {
        let (private_key, _) = KeyGenerator::new().generate().unwrap();
        let bytes = encode_private_key(&private_key, Encoding::Binary);
        let truncated = decode_private_key(&bytes[..bytes.len() - 2 * KEY_SIZE], Encoding::Binary)
            .unwrap();
        assert_eq!(truncated.len(), SLOTS - 1);
        assert!(matches!(
            truncated.sign(&[0u8; DIGEST_SIZE]),
            Err(Error::MalformedInput { what: "private key", .. })
        ));
    }
}
