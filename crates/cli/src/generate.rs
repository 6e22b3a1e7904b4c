//! Load a document, transform it and write the rendered types.

use std::fs;
use std::path::Path;
use std::time::Instant;

use oapi_ts_core::{Emit, NoopHooks, TransformOptions, transform_document};
use serde_json::Value;
use tracing::{info, warn};

use crate::Cli;
use crate::config::resolve_options;

pub fn run(cli: Cli) -> i32 {
    match generate(&cli) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

fn generate(cli: &Cli) -> Result<(), String> {
    let start = Instant::now();
    let options = resolve_options(cli.config.as_deref(), &cli.flags)?;
    let document = load_document(&cli.input)?;
    let output = render(&document, &options)?;

    match &cli.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
            }
            fs::write(path, &output).map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
            info!(
                output = %path.display(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Generated TypeScript types."
            );
        }
        None => print!("{output}"),
    }
    Ok(())
}

/// Transform and render, reporting how many warnings were collected.
fn render(document: &Value, options: &TransformOptions) -> Result<String, String> {
    let output = transform_document(document, options, &NoopHooks).map_err(|e| e.to_string())?;
    if !output.warnings.is_empty() && !options.silent {
        warn!(count = output.warnings.len(), "Generated with warnings.");
    }
    Ok(output.emit())
}

/// Parse a JSON or YAML document. The extension picks the parser; anything
/// else is tried as JSON first.
pub fn load_document(path: &Path) -> Result<Value, String> {
    let contents =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("yaml" | "yml") => parse_yaml(&contents, path),
        Some("json") => parse_json(&contents, path),
        _ => parse_json(&contents, path).or_else(|_| parse_yaml(&contents, path)),
    }
}

fn parse_json(contents: &str, path: &Path) -> Result<Value, String> {
    serde_json::from_str(contents).map_err(|e| format!("Invalid JSON in {}: {e}", path.display()))
}

/// YAML goes through its own value type first so unquoted keys like `200:`
/// become JSON string keys.
fn parse_yaml(contents: &str, path: &Path) -> Result<Value, String> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(contents)
        .map_err(|e| format!("Invalid YAML in {}: {e}", path.display()))?;
    serde_json::to_value(yaml).map_err(|e| format!("Unsupported YAML in {}: {e}", path.display()))
}
