use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use lamport_ots::codec::Encoding;

pub const PRIVATE_KEY_FILE: &str = "lamport-ots.priv";
pub const PUBLIC_KEY_FILE: &str = "lamport-ots.pub";
pub const PRIVATE_KEY_BINARY_FILE: &str = "lamport-ots.bin.priv";
pub const PUBLIC_KEY_BINARY_FILE: &str = "lamport-ots.bin.pub";
pub const SIGNATURE_EXTENSION: &str = ".sign";
pub const SIGNATURE_BINARY_EXTENSION: &str = ".bin.sign";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Blake3,
}

/// Options shared by every subcommand.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Directory holding the key pair
    #[arg(long, env = "LAMPORT_OTS_KEY_DIR", default_value = ".", global = true)]
    key_dir: PathBuf,

    /// Hash used for public keys and message digests
    #[arg(
        long,
        value_enum,
        env = "LAMPORT_OTS_HASH",
        default_value_t = HashAlgorithm::Sha256,
        global = true
    )]
    hash: HashAlgorithm,

    /// Log more; repeat for more detail. RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub key_dir: PathBuf,
    pub hash: HashAlgorithm,
    pub verbose: u8,
}

impl From<GlobalArgs> for Config {
    fn from(args: GlobalArgs) -> Self {
        Config {
            key_dir: args.key_dir,
            hash: args.hash,
            verbose: args.verbose,
        }
    }
}

impl Config {
    pub fn private_key_path(&self, encoding: Encoding) -> PathBuf {
        self.key_dir.join(match encoding {
            Encoding::Hex => PRIVATE_KEY_FILE,
            Encoding::Binary => PRIVATE_KEY_BINARY_FILE,
        })
    }

    pub fn public_key_path(&self, encoding: Encoding) -> PathBuf {
        self.key_dir.join(match encoding {
            Encoding::Hex => PUBLIC_KEY_FILE,
            Encoding::Binary => PUBLIC_KEY_BINARY_FILE,
        })
    }

    pub fn default_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// `<message>.sign`, or `<message>.bin.sign` for the binary encoding.
pub fn signature_path(message: &Path, encoding: Encoding) -> PathBuf {
    let mut path = OsString::from(message.as_os_str());
    path.push(match encoding {
        Encoding::Hex => SIGNATURE_EXTENSION,
        Encoding::Binary => SIGNATURE_BINARY_EXTENSION,
    });
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_path_appends_extension() {
        assert_eq!(
            signature_path(Path::new("docs/report.pdf"), Encoding::Hex),
            PathBuf::from("docs/report.pdf.sign")
        );
        assert_eq!(
            signature_path(Path::new("report"), Encoding::Binary),
            PathBuf::from("report.bin.sign")
        );
    }

    #[test]
    fn key_paths_live_in_key_dir() {
        let config = Config {
            key_dir: PathBuf::from("/keys"),
            hash: HashAlgorithm::default(),
            verbose: 0,
        };
        assert_eq!(
            config.private_key_path(Encoding::Hex),
            PathBuf::from("/keys/lamport-ots.priv")
        );
        assert_eq!(
            config.public_key_path(Encoding::Binary),
            PathBuf::from("/keys/lamport-ots.bin.pub")
        );
    }
}
