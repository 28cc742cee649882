//! Quran EPUB CLI
//!
//! Commands: build, validate, fonts
//! Outputs JSON to stdout, logs to stderr
//! Returns 2 on validation failure, 1 on any other failure

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

use quran_ebook_core::{
    config::{config_paths_in, BuildConfig},
    registry, BuildPipeline, CorpusSource, DirFontResolver, JsonCorpusSource, PipelineError,
    ValidationResult, Validator,
};

#[derive(Parser)]
#[command(name = "quran-ebook-cli")]
#[command(about = "Quran EPUB Compiler - validate a corpus and package it as EPUB 3")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build one EPUB per config file
    Build {
        /// Config files (JSON)
        configs: Vec<PathBuf>,

        /// Also build every *.json config in this directory
        #[arg(long)]
        all: Option<PathBuf>,

        /// Corpus dump (JSON)
        #[arg(short, long)]
        corpus: PathBuf,

        /// Directory holding the font files
        #[arg(short, long)]
        fonts: PathBuf,

        /// Output directory, overriding each config's own
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Validate a corpus dump without building
    Validate {
        /// Corpus dump (JSON)
        #[arg(short, long)]
        corpus: PathBuf,

        /// Script field to read
        #[arg(short, long, default_value = "qpc_uthmani_hafs")]
        script: String,
    },

    /// List the font registry
    Fonts,
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => println!(r#"{{"error": "Failed to serialize output: {}"}}"#, e),
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn build(
    mut configs: Vec<PathBuf>,
    all: Option<PathBuf>,
    corpus: PathBuf,
    fonts: PathBuf,
    out: Option<PathBuf>,
) -> ExitCode {
    if let Some(dir) = all {
        match config_paths_in(&dir) {
            Ok(paths) => configs.extend(paths),
            Err(e) => {
                print_json(&serde_json::json!({
                    "success": false,
                    "error": format!("Failed to list {}: {}", dir.display(), e),
                }));
                return ExitCode::FAILURE;
            }
        }
    }
    if configs.is_empty() {
        print_json(&serde_json::json!({"success": false, "error": "No config files given"}));
        return ExitCode::FAILURE;
    }

    let pipeline = BuildPipeline::new(JsonCorpusSource::new(corpus), DirFontResolver::new(fonts));
    let mut results = vec![];
    let mut exit = ExitCode::SUCCESS;

    for path in configs {
        let outcome = BuildConfig::load(&path)
            .map_err(PipelineError::from)
            .and_then(|config| {
                let output = pipeline.build(&config)?;
                let dir = out.clone().unwrap_or_else(|| config.output.directory.clone());
                let written = output.write_to(&dir)?;
                Ok((output, written))
            });

        match outcome {
            Ok((output, written)) => results.push(serde_json::json!({
                "config": path,
                "success": true,
                "path": written,
                "build": output,
            })),
            Err(e) => {
                tracing::error!(config = %path.display(), "{}", e);
                exit = match e {
                    PipelineError::ValidationFailed(_) => ExitCode::from(2),
                    _ => ExitCode::FAILURE,
                };
                let mut result = serde_json::json!({
                    "config": path,
                    "success": false,
                    "error": e.to_string(),
                });
                if let PipelineError::ValidationFailed(violations) = &e {
                    result["violations"] = serde_json::json!(violations);
                }
                results.push(result);
            }
        }
    }

    print_json(&results);
    exit
}

fn load_failure(error: &impl std::fmt::Display) -> serde_json::Value {
    serde_json::json!({"valid": false, "error": error.to_string()})
}

fn validate(corpus: PathBuf, script: String) -> ExitCode {
    let loaded = match JsonCorpusSource::new(corpus).load(&script, None) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("{}", e);
            print_json(&load_failure(&e));
            return ExitCode::FAILURE;
        }
    };

    let result: ValidationResult = Validator::new().validate(&loaded);
    print_json(&result);
    if result.valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2) // Validation failure
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    match cli.command {
        Commands::Build { configs, all, corpus, fonts, out } => {
            build(configs, all, corpus, fonts, out)
        }
        Commands::Validate { corpus, script } => validate(corpus, script),
        Commands::Fonts => {
            let fonts: Vec<_> = registry::FONTS
                .iter()
                .map(|f| {
                    serde_json::json!({
                        "key": f.key,
                        "family": f.family,
                        "filename": f.filename,
                        "license": f.license,
                        "scripts": registry::SCRIPT_FONT_PAIRS
                            .iter()
                            .filter(|(_, fonts)| fonts.contains(&f.key))
                            .map(|(script, _)| *script)
                            .collect::<Vec<_>>(),
                    })
                })
                .collect();
            print_json(&serde_json::json!({
                "fonts": fonts,
                "scripts": registry::scripts(),
            }));
            ExitCode::SUCCESS
        }
    }
}
