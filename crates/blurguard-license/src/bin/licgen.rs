//! License generator for BlurGuard distributors.
//!
//! `licgen init` creates a signing keypair; `licgen make` signs a license
//! file for a customer. The public half of the keypair is what ships
//! embedded in the application.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use rsa::pkcs8::{DecodePrivateKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::{RsaPrivateKey, RsaPublicKey};

use blurguard_license::LicenseRecord;

const KEY_BITS: usize = 2048;

#[derive(Parser)]
#[command(name = "licgen", about = "Generate BlurGuard signing keys and licenses")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a new RSA signing keypair.
    Init {
        /// Directory to write private.pem and public.pem into.
        #[arg(long, default_value = "keys")]
        out_dir: PathBuf,
    },
    /// Sign a license file for a customer.
    Make {
        /// Customer email address.
        #[arg(long)]
        email: String,
        /// License edition.
        #[arg(long, default_value = "Pro")]
        edition: String,
        /// Expiry date (YYYY-MM-DD). Defaults to ten years from now.
        #[arg(long)]
        expires: Option<String>,
        /// Path to the signing private key.
        #[arg(long, default_value = "keys/private.pem")]
        priv_key: PathBuf,
        /// Output license file. Defaults to license_<email>.lic.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("licgen: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Init { out_dir } => {
            std::fs::create_dir_all(&out_dir)?;
            let key = RsaPrivateKey::new(&mut rand::thread_rng(), KEY_BITS)?;
            let priv_pem = key.to_pkcs8_pem(LineEnding::LF)?;
            let pub_pem = RsaPublicKey::from(&key).to_public_key_pem(LineEnding::LF)?;
            let priv_path = out_dir.join("private.pem");
            let pub_path = out_dir.join("public.pem");
            std::fs::write(&priv_path, priv_pem.as_bytes())?;
            std::fs::write(&pub_path, pub_pem)?;
            println!("Generated keys:");
            println!("  {}", priv_path.display());
            println!("  {}", pub_path.display());
            Ok(())
        }
        Command::Make {
            email,
            edition,
            expires,
            priv_key,
            out,
        } => {
            let expires = expires.unwrap_or_else(|| {
                (Utc::now() + Duration::days(365 * 10))
                    .format("%Y-%m-%d")
                    .to_string()
            });
            let pem = std::fs::read_to_string(&priv_key)?;
            let key = RsaPrivateKey::from_pkcs8_pem(&pem)?;
            let record = LicenseRecord::signed(&key, &email, &edition, &expires)?;
            let out = out.unwrap_or_else(|| {
                PathBuf::from(format!(
                    "license_{}.lic",
                    email.replace(['@', '.'], "_")
                ))
            });
            std::fs::write(&out, serde_json::to_string_pretty(&record)?)?;
            println!("Wrote license: {}", out.display());
            Ok(())
        }
    }
}
