//! Transform options from a TOML file and command-line flags.

use std::fs;
use std::path::Path;

use clap::Args;
use oapi_ts_core::TransformOptions;
use tracing::debug;

/// One switch per transform option. A flag that is set turns the option on
/// regardless of the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct OptionFlags {
    /// Allow extra keys on objects that don't forbid them
    #[arg(long)]
    pub additional_properties: bool,
    /// Sort keys alphabetically
    #[arg(long)]
    pub alphabetize: bool,
    /// Treat properties with a default as required
    #[arg(long)]
    pub default_non_nullable: bool,
    /// Type empty objects as Record<string, unknown>
    #[arg(long)]
    pub empty_objects_unknown: bool,
    /// Hoist enums to TypeScript enums
    #[arg(long = "enum")]
    pub enums: bool,
    /// Export enum values as const arrays
    #[arg(long)]
    pub enum_values: bool,
    /// Reuse one declaration for identical enums
    #[arg(long)]
    pub dedupe_enums: bool,
    /// Drop deprecated fields, parameters and operations
    #[arg(long)]
    pub exclude_deprecated: bool,
    /// Use type aliases instead of interfaces for sections
    #[arg(long)]
    pub export_type: bool,
    /// Make every member and array readonly
    #[arg(long)]
    pub immutable: bool,
    /// Key templated paths by template literal types
    #[arg(long)]
    pub path_params_as_types: bool,
    /// Model minItems/maxItems with tuples
    #[arg(long)]
    pub array_length: bool,
    /// Treat all properties as required when a schema has no `required` list
    #[arg(long)]
    pub properties_required_by_default: bool,
    /// Export an alias for every component
    #[arg(long)]
    pub root_types: bool,
    /// Don't log resolution warnings
    #[arg(long)]
    pub silent: bool,
}

impl OptionFlags {
    /// Turn on every option whose flag is set.
    pub fn apply(&self, options: &mut TransformOptions) {
        let pairs = [
            (self.additional_properties, &mut options.additional_properties),
            (self.alphabetize, &mut options.alphabetize),
            (self.default_non_nullable, &mut options.default_non_nullable),
            (self.empty_objects_unknown, &mut options.empty_objects_unknown),
            (self.enums, &mut options.enums),
            (self.enum_values, &mut options.enum_values),
            (self.dedupe_enums, &mut options.dedupe_enums),
            (self.exclude_deprecated, &mut options.exclude_deprecated),
            (self.export_type, &mut options.export_type),
            (self.immutable, &mut options.immutable),
            (self.path_params_as_types, &mut options.path_params_as_types),
            (self.array_length, &mut options.array_length),
            (
                self.properties_required_by_default,
                &mut options.properties_required_by_default,
            ),
            (self.root_types, &mut options.root_types),
            (self.silent, &mut options.silent),
        ];
        for (flag, option) in pairs {
            if flag {
                *option = true;
            }
        }
    }
}

/// Read options from a TOML file.
pub fn load_config(path: &Path) -> Result<TransformOptions, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let options = toml::from_str(&contents)
        .map_err(|e| format!("Invalid config {}: {e}", path.display()))?;
    debug!(path = %path.display(), "Loaded config.");
    Ok(options)
}

/// Config file (if any) with the flags layered on top.
pub fn resolve_options(config: Option<&Path>, flags: &OptionFlags) -> Result<TransformOptions, String> {
    let mut options = match config {
        Some(path) => load_config(path)?,
        None => TransformOptions::default(),
    };
    flags.apply(&mut options);
    Ok(options)
}
