mod commands;
mod config;
mod storage;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use lamport_ots::{Blake3, Sha256};
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, GlobalArgs, HashAlgorithm};

/// Sign files with Lamport one-time signatures.
///
/// Each key pair may sign a single file. Signing marks the private key as
/// spent; run `generate` again before signing something else.
#[derive(Parser, Debug)]
#[command(name = "lamport-ots", version)]
struct Arguments {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a new key pair in the key directory
    Generate {
        /// Also write binary copies of both keys
        #[arg(short, long)]
        binary: bool,
    },
    /// Sign FILE, writing FILE.sign
    Sign {
        file: PathBuf,
        /// Also write FILE.bin.sign
        #[arg(short, long)]
        binary: bool,
    },
    /// Verify FILE against FILE.sign and the public key
    Verify {
        file: PathBuf,
        /// Use the binary public key and FILE.bin.sign
        #[arg(short, long)]
        binary: bool,
    },
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(config: &Config, cmd: Command) -> anyhow::Result<bool> {
    use Command::*;
    match (cmd, config.hash) {
        (Generate { binary }, HashAlgorithm::Sha256) => {
            commands::generate(config, Sha256, binary).map(|()| true)
        }
        (Generate { binary }, HashAlgorithm::Blake3) => {
            commands::generate(config, Blake3, binary).map(|()| true)
        }
        (Sign { file, binary }, HashAlgorithm::Sha256) => {
            commands::sign(config, Sha256, &file, binary).map(|()| true)
        }
        (Sign { file, binary }, HashAlgorithm::Blake3) => {
            commands::sign(config, Blake3, &file, binary).map(|()| true)
        }
        (Verify { file, binary }, HashAlgorithm::Sha256) => {
            commands::verify(config, Sha256, &file, binary)
        }
        (Verify { file, binary }, HashAlgorithm::Blake3) => {
            commands::verify(config, Blake3, &file, binary)
        }
    }
}

fn main() -> ExitCode {
    let args = Arguments::parse();
    let config = Config::from(args.global);
    init_tracing(&config);

    match run(&config, args.cmd) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
