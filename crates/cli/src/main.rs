//! `oapi-ts`: OpenAPI 3.x documents to TypeScript types.

#![forbid(unsafe_code)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

mod config;
mod generate;

/// Crates whose logs the default filter shows.
const LOG_TARGETS: [&str; 2] = ["oapi_ts", "oapi_ts_core"];

#[derive(Parser, Debug)]
#[command(
    name = "oapi-ts",
    version,
    about = "Generate TypeScript types from an OpenAPI 3.x document"
)]
struct Cli {
    /// OpenAPI document (JSON or YAML), already bundled
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Write the generated types here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// TOML file with transform options (camelCase keys)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(flatten)]
    flags: config::OptionFlags,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    std::process::exit(generate::run(cli));
}

fn init_tracing() {
    // OAPI_TS_LOG controls log level: "trace", "debug", "info", "warn", "error"
    // or a full tracing filter spec like "oapi_ts_core=debug"
    let filter = match std::env::var("OAPI_TS_LOG") {
        Ok(level) if is_plain_level(&level) => LOG_TARGETS
            .iter()
            .map(|target| format!("{target}={level}"))
            .collect::<Vec<_>>()
            .join(","),
        Ok(spec) => spec,
        Err(_) => LOG_TARGETS
            .iter()
            .map(|target| format!("{target}=info"))
            .collect::<Vec<_>>()
            .join(","),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}
