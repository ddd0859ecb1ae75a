mod commands;
mod config;
mod prompt;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use pktsig_core::{HashAlgorithm, SignError, Signer, SigningMode, SigningPolicy};

use crate::commands::policy::run_policy;
use crate::commands::sign::{run_sign, SignArgs};
use crate::commands::verify::{run_verify, VerifyArgs};
use crate::prompt::run_prompt;

#[derive(Parser)]
#[command(name = "pktsig", version, about = "Packet-number HMAC signing")]
struct Cli {
    #[command(flatten)]
    policy: PolicyArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Overrides for `[policy]` in the config file.
#[derive(Args, Debug, Default)]
struct PolicyArgs {
    /// HMAC hash: sha256 | sha384 | sha512
    #[arg(long, global = true)]
    hash: Option<HashAlgorithm>,

    /// Minimum key length in bits (multiple of 8, at least 128)
    #[arg(long, global = true)]
    min_key_bits: Option<u32>,

    /// counter | payload-bound
    #[arg(long, global = true)]
    mode: Option<SigningMode>,
}

impl PolicyArgs {
    fn overlay(&self, base: SigningPolicy) -> SigningPolicy {
        SigningPolicy {
            hash: self.hash.unwrap_or(base.hash),
            min_key_bits: self.min_key_bits.unwrap_or(base.min_key_bits),
            mode: self.mode.unwrap_or(base.mode),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive loop: prompt for data, packet number and key (default)
    Prompt,

    /// Sign a single packet
    Sign(SignArgs),

    /// Check a signature against a packet
    Verify(VerifyArgs),

    /// Show the signing policy in force
    Policy,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("PKTSIG_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn build_signer(args: &PolicyArgs) -> Result<Signer> {
    let file_policy = config::read_config()?
        .map(|cfg| cfg.policy())
        .unwrap_or_default();
    let policy = args.overlay(file_policy);
    debug!(?policy, "effective signing policy");
    Signer::new(policy).context("signing policy")
}

fn run(cli: Cli) -> Result<ExitCode> {
    let signer = build_signer(&cli.policy)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command.unwrap_or(Commands::Prompt) {
        Commands::Prompt => {
            let stdin = io::stdin();
            let mut err = io::stderr();
            run_prompt(&signer, stdin.lock(), &mut out, &mut err)?;
        }
        Commands::Sign(args) => run_sign(&signer, &args, &mut out)?,
        Commands::Verify(args) => {
            if !run_verify(&signer, &args, &mut out)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Policy => run_policy(&signer, &mut out)?,
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            match e.downcast_ref::<SignError>() {
                Some(se) => eprintln!("error: {e:#} [code {}]", se.code().as_u16()),
                None => eprintln!("error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
