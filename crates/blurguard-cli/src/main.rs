//! Batch redaction binary.
//!
//! Expands the input to a list of media files, verifies an optional license,
//! snapshots the entitlement once, then processes files one by one. A
//! failing file is logged and counted; the batch continues.
//!
//! Exit codes: 0 all jobs succeeded, 1 one or more jobs failed, 2 invalid or
//! missing input.

mod expand;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use blurguard_license::Entitlement;
use blurguard_media::{default_model_dir, run_job, Detector};
use blurguard_models::{DetectionPolicy, MediaJob, RedactionPolicy};

#[derive(Parser)]
#[command(
    name = "blurguard",
    about = "Redact faces and license plates from images and video"
)]
struct Cli {
    /// Input media file or directory.
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory. Defaults to each input file's directory.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Gaussian blur kernel size (even values round up to the next odd).
    #[arg(short = 'k', long, default_value_t = 35)]
    kernel: i32,

    /// Pixelate regions instead of blurring them.
    #[arg(long)]
    pixelate: bool,

    /// Recurse into subdirectories when the input is a directory.
    #[arg(short, long)]
    recursive: bool,

    /// License file; without a valid one, outputs carry a trial watermark.
    #[arg(long)]
    license: Option<PathBuf>,

    /// Prefer the DNN face detector when its model files are present.
    #[arg(long = "dnn-face")]
    dnn_face: bool,

    /// Directory holding cascade and DNN model artifacts.
    #[arg(long)]
    models: Option<PathBuf>,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    if let Some(license) = &cli.license {
        // Failure only means trial output, never a fatal error.
        blurguard_license::load_and_verify(license);
    }
    let entitlement = Entitlement::capture();

    let files = expand::media_files(&cli.input, cli.recursive);
    if files.is_empty() {
        error!(input = %cli.input.display(), "no matching media files");
        return ExitCode::from(2);
    }

    let detection = DetectionPolicy {
        prefer_neural_faces: cli.dnn_face,
        ..Default::default()
    };
    let redaction = RedactionPolicy {
        blur_kernel: cli.kernel,
        pixelate: cli.pixelate,
        watermark: !entitlement.is_pro(),
    };

    // One detector for the whole batch: model artifacts load once.
    let model_dir = cli.models.clone().unwrap_or_else(default_model_dir);
    let mut detector = match Detector::open(&model_dir, &detection) {
        Ok(d) => d,
        Err(e) => {
            error!(models = %model_dir.display(), "cannot initialize detectors: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut succeeded = 0u32;
    let mut failed = 0u32;
    for file in files {
        let job = MediaJob::new(file.clone(), cli.output.as_deref(), detection, redaction);
        match run_job(&job, &mut detector) {
            Ok(outcome) => {
                succeeded += 1;
                info!("OK: {} -> {}", file.display(), outcome.output.display());
            }
            Err(e) => {
                failed += 1;
                error!("ERR: {}: {e}", file.display());
            }
        }
    }

    info!(succeeded, failed, "batch finished");
    if failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_file(false)
                .with_line_number(false),
        )
        .with(env_filter)
        .init();
}
