//! idv: command-line entry point for the verification engine.

use anyhow::Context;
use clap::Parser;
use idv_imaging::decode_file;
use idv_signals::{Collaborators, RecordedSignals};
use idv_similarity::ImageSimilarityDetector;
use idv_types::{ImageRole, RequestId, VerificationRequest};
use idv_utils::{init_logging, LogFormat};
use idv_verification::{EngineConfig, VerificationEngine};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "idv", about = "Fraud-aware identity verification engine")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "IDV_CONFIG")]
    config: Option<PathBuf>,

    /// Log format: "human" or "json".
    #[arg(long, env = "IDV_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "IDV_LOG_LEVEL")]
    log_level: Option<String>,

    /// Per-collaborator timeout in milliseconds.
    #[arg(long, env = "IDV_SIGNAL_TIMEOUT_MS")]
    signal_timeout_ms: Option<u64>,

    /// Fused similarity at or above which document and selfie are duplicates.
    #[arg(long, env = "IDV_SIMILARITY_THRESHOLD")]
    similarity_threshold: Option<f64>,

    /// Structure confidence needed to accept a document.
    #[arg(long, env = "IDV_DOCUMENT_THRESHOLD")]
    document_threshold: Option<f64>,

    /// Face area ratio above which a document is just a face.
    #[arg(long, env = "IDV_FACE_ONLY_THRESHOLD")]
    face_only_threshold: Option<f64>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run only the local gates on a document/selfie pair.
    Gates {
        #[command(flatten)]
        images: ImagePair,

        /// Recorded collaborator outputs (TOML or JSON); only the face box
        /// is used.
        #[arg(long)]
        signals: Option<PathBuf>,
    },

    /// Run a full evaluation with collaborator outputs replayed from a file.
    Evaluate {
        #[command(flatten)]
        images: ImagePair,

        /// Recorded collaborator outputs (TOML or JSON).
        #[arg(long)]
        signals: PathBuf,

        /// Request id to echo on the decision; random when omitted.
        #[arg(long)]
        request_id: Option<String>,
    },

    /// Compare every pair in a batch of images for duplicates.
    Uniqueness {
        /// Image files, at least two.
        #[arg(required = true, num_args = 2..)]
        images: Vec<PathBuf>,
    },

    /// Inspect configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Args)]
struct ImagePair {
    /// Document image (PNG or JPEG).
    #[arg(long)]
    document: PathBuf,

    /// Selfie image (PNG or JPEG).
    #[arg(long)]
    selfie: PathBuf,
}

#[derive(clap::Subcommand)]
enum ConfigAction {
    /// Print the default configuration as TOML.
    PrintDefault,
    /// Load and validate a configuration file, then print it resolved.
    Check { file: PathBuf },
}

impl Cli {
    /// File (or default) configuration with flag and env overrides applied.
    fn resolve_config(&self) -> anyhow::Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::from_toml_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => EngineConfig::default(),
        };
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(ms) = self.signal_timeout_ms {
            config.signal_timeout_ms = ms;
        }
        if let Some(t) = self.similarity_threshold {
            config.policy.similarity_threshold = t;
        }
        if let Some(t) = self.document_threshold {
            config.policy.document_threshold = t;
        }
        if let Some(t) = self.face_only_threshold {
            config.policy.face_only_threshold = t;
        }
        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

impl ImagePair {
    fn load(&self, request_id: Option<String>) -> anyhow::Result<VerificationRequest> {
        let document = decode_file(&self.document, ImageRole::Document)?;
        let selfie = decode_file(&self.selfie, ImageRole::Selfie)?;
        let mut builder = VerificationRequest::builder()
            .document(document)
            .selfie(selfie);
        if let Some(id) = request_id {
            builder = builder.request_id(RequestId::new(id));
        }
        Ok(builder.build()?)
    }
}

fn replayed(path: Option<&Path>) -> anyhow::Result<Collaborators> {
    let recorded = match path {
        Some(path) => RecordedSignals::from_file(path)
            .with_context(|| format!("loading recorded signals {}", path.display()))?,
        None => RecordedSignals::default(),
    };
    Ok(Collaborators::from_shared(Arc::new(recorded)))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    init_logging(config.log_format, &config.log_level)?;

    match cli.command {
        Command::Gates { images, signals } => {
            let request = images.load(None)?;
            let engine = VerificationEngine::new(config, replayed(signals.as_deref())?)?;
            let outcome = engine.run_gates(&request).await?;
            print_json(&outcome)?;
        }
        Command::Evaluate {
            images,
            signals,
            request_id,
        } => {
            let request = images.load(request_id)?;
            let engine = VerificationEngine::new(config, replayed(Some(signals.as_path()))?)?;
            tracing::info!(request_id = %request.request_id, "evaluating");
            let decision = engine.evaluate(&request).await?;
            print_json(&decision)?;
        }
        Command::Uniqueness { images } => {
            let decoded = images
                .iter()
                .map(|path| {
                    decode_file(path, ImageRole::Selfie)
                        .with_context(|| format!("decoding {}", path.display()))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            let detector = ImageSimilarityDetector::new(config.policy.similarity_threshold);
            print_json(&detector.check_uniqueness(&decoded))?;
        }
        Command::Config { action } => match action {
            ConfigAction::PrintDefault => {
                print!("{}", EngineConfig::default().to_toml_string()?);
            }
            ConfigAction::Check { file } => {
                let checked = EngineConfig::from_toml_file(&file)
                    .with_context(|| format!("checking {}", file.display()))?;
                tracing::info!("{} is valid", file.display());
                print!("{}", checked.to_toml_string()?);
            }
        },
    }
    Ok(())
}
