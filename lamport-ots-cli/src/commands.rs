use std::path::Path;

use anyhow::Context;
use lamport_ots::codec::{self, Encoding};
use lamport_ots::{KeyGenerator, OneWayHash, OsEntropy, Signer, Verifier};
use tracing::info;

use crate::config::{signature_path, Config};
use crate::storage::{self, FileKeyStore};

fn encodings(binary: bool) -> &'static [Encoding] {
    if binary {
        &[Encoding::Hex, Encoding::Binary]
    } else {
        &[Encoding::Hex]
    }
}

/// The hex private key path doubles as the key's id in the [`FileKeyStore`].
fn key_id(config: &Config) -> String {
    config.private_key_path(Encoding::Hex).display().to_string()
}

pub fn generate<H: OneWayHash>(config: &Config, hash: H, binary: bool) -> anyhow::Result<()> {
    let (private_key, public_key) = KeyGenerator::with(hash, OsEntropy::default())
        .generate()
        .context("generating key pair")?;

    // Everything is staged before anything replaces the old pair, so a
    // failed write leaves the previous keys as they were.
    let mut public_files = Vec::new();
    let mut private_files = Vec::new();
    for &encoding in encodings(binary) {
        let public_path = config.public_key_path(encoding);
        public_files.push(storage::stage_public(
            &public_path,
            &codec::encode_public_key(&public_key, encoding),
        )?);
        let private_path = config.private_key_path(encoding);
        private_files.push(storage::stage_private_key(
            &private_path,
            &codec::encode_private_key(&private_key, encoding),
        )?);
    }
    for staged in public_files.into_iter().chain(private_files) {
        staged.commit()?;
    }
    info!(dir = %config.key_dir.display(), binary, "wrote key pair");
    FileKeyStore::new().clear(&key_id(config))?;

    println!("Lamport one-time signature key pair generated successfully.");
    println!("Private key: {}", config.private_key_path(Encoding::Hex).display());
    println!("Public key: {}", config.public_key_path(Encoding::Hex).display());
    if binary {
        println!(
            "Binary files created: {} and {}",
            config.private_key_path(Encoding::Binary).display(),
            config.public_key_path(Encoding::Binary).display()
        );
    }
    Ok(())
}

pub fn sign<H: OneWayHash>(
    config: &Config,
    hash: H,
    file: &Path,
    binary: bool,
) -> anyhow::Result<()> {
    let key_path = config.private_key_path(Encoding::Hex);
    let key_bytes = storage::read_private_key(&key_path)?;
    let private_key = codec::decode_private_key(&key_bytes, Encoding::Hex)
        .with_context(|| format!("decoding {}", key_path.display()))?;

    let message = storage::open_message(file)?;
    let digest = hash
        .hash_reader(message)
        .with_context(|| format!("hashing {}", file.display()))?;

    let mut signer = Signer::new(FileKeyStore::new());
    let signature = signer
        .sign(&key_id(config), private_key, &digest)
        .with_context(|| format!("signing {}", file.display()))?;

    let mut written = Vec::new();
    for &encoding in encodings(binary) {
        let path = signature_path(file, encoding);
        storage::write_public(&path, &codec::encode_signature(&signature, encoding))?;
        written.push(path);
    }

    println!("Signature successfully created for file: {}", file.display());
    for path in written {
        println!("Signature file: {}", path.display());
    }
    Ok(())
}

/// Returns whether the signature next to `file` is valid.
pub fn verify<H: OneWayHash>(
    config: &Config,
    hash: H,
    file: &Path,
    binary: bool,
) -> anyhow::Result<bool> {
    let encoding = if binary { Encoding::Binary } else { Encoding::Hex };

    let public_path = config.public_key_path(encoding);
    let public_key = codec::decode_public_key(&storage::read_public(&public_path)?, encoding)
        .with_context(|| format!("decoding {}", public_path.display()))?;

    let signature_path = signature_path(file, encoding);
    let signature = codec::decode_signature(&storage::read_public(&signature_path)?, encoding)
        .with_context(|| format!("decoding {}", signature_path.display()))?;

    let digest = hash
        .hash_reader(storage::open_message(file)?)
        .with_context(|| format!("hashing {}", file.display()))?;

    let valid = Verifier::with(hash)
        .verify(&public_key, &signature, &digest)
        .with_context(|| format!("verifying {}", signature_path.display()))?;
    println!("{}", if valid { "VALID" } else { "INVALID" });
    Ok(valid)
}
