use clap::{ArgAction, Parser, ValueEnum};
use config::{
    Config as ConfigCrate, ConfigError as ConfigCrateError, Environment, File, Map, Source, Value,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::drag::DragConfig;
use crate::store::DocumentFormat;
use crate::tree::{
    OrphanPolicy, ProjectionConfig, RootFallback, DEFAULT_INDENTATION_THRESHOLD, DEFAULT_MAX_DEPTH,
};

const DEFAULT_COLUMN_WIDTH_PX: i32 = 8;
const DEFAULT_INDENT_WIDTH: u16 = 2;
const DEFAULT_MAX_UNDO: usize = 24;
const DEFAULT_AUTO_SAVE: bool = false;
const DEFAULT_SHOW_HIDDEN: bool = true;

// Upper bounds keep pointer arithmetic well inside i32.
const MAX_THRESHOLD_PX: i32 = 10_000;
const MAX_COLUMN_WIDTH_PX: i32 = 256;
const ENV_PREFIX: &str = "PAGETREE";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] ConfigCrateError),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

// Everything optional so that each layer only overrides what it sets.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
struct FileConfig {
    threshold: Option<i32>,
    max_depth: Option<usize>,
    root_fallback: Option<RootFallback>,
    strict: Option<bool>,
    format: Option<DocumentFormat>,
    column_width_px: Option<i32>,
    indent_width: Option<u16>,
    max_undo_steps: Option<usize>,
    auto_save: Option<bool>,
    show_hidden: Option<bool>,
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Horizontal drag distance, in pixels, past which the depth changes.
    pub threshold: i32,
    pub max_depth: usize,
    pub root_fallback: RootFallback,
    /// Fail on dangling or cyclic parent references instead of dropping them.
    pub strict: bool,
    pub format: DocumentFormat,
    /// Pixel width of one terminal cell, used to turn mouse columns into a
    /// drag offset.
    pub column_width_px: i32,
    pub indent_width: u16,
    pub max_undo_steps: usize,
    pub auto_save: bool,
    pub show_hidden: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            threshold: DEFAULT_INDENTATION_THRESHOLD,
            max_depth: DEFAULT_MAX_DEPTH,
            root_fallback: RootFallback::default(),
            strict: false,
            format: DocumentFormat::default(),
            column_width_px: DEFAULT_COLUMN_WIDTH_PX,
            indent_width: DEFAULT_INDENT_WIDTH,
            max_undo_steps: DEFAULT_MAX_UNDO,
            auto_save: DEFAULT_AUTO_SAVE,
            show_hidden: DEFAULT_SHOW_HIDDEN,
            log_file: None,
        }
    }
}

impl AppConfig {
    pub fn projection(&self) -> ProjectionConfig {
        ProjectionConfig {
            threshold: self.threshold,
            max_depth: self.max_depth,
            root_fallback: self.root_fallback,
        }
    }

    pub fn orphan_policy(&self) -> OrphanPolicy {
        if self.strict {
            OrphanPolicy::Reject
        } else {
            OrphanPolicy::Drop
        }
    }

    pub fn drag(&self) -> DragConfig {
        DragConfig {
            projection: self.projection(),
            orphans: self.orphan_policy(),
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Nested,
    Flat,
}

impl From<FormatArg> for DocumentFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Nested => DocumentFormat::Nested,
            FormatArg::Flat => DocumentFormat::Flat,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Reorder a page/section/module tree", long_about = None)]
pub struct CliArgs {
    /// JSON document holding the content tree
    pub filename: Option<PathBuf>,

    /// Path to a custom configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Document layout: nested children or a flat parentId list
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Drag distance in pixels before the depth changes
    #[arg(long)]
    pub threshold: Option<i32>,

    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Reject dangling or cyclic parent references
    #[arg(long)]
    pub strict: bool,

    #[arg(long)]
    pub auto_save: Option<bool>,

    /// Print the outline to stdout and exit
    #[arg(long)]
    pub print: bool,

    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Show the resolved configuration and exit
    #[arg(long)]
    pub debug_config: bool,

    /// Verbosity: -d info, -dd debug, -ddd trace
    #[arg(short = 'd', long = "debug", action = ArgAction::Count)]
    pub debug: u8,
}

/// Resolves the configuration: defaults < file < `PAGETREE__*` env < flags.
pub fn load_config(args: &CliArgs) -> Result<AppConfig, ConfigError> {
    let env_source = Environment::with_prefix(ENV_PREFIX).separator("__");
    let env_map: Map<String, Value> = env_source.collect().unwrap_or_else(|_| Map::new());

    build_config_from_args(args, Some(env_map))
}

fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "pagetree")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

fn build_config_from_args(
    args: &CliArgs,
    override_source: Option<Map<String, Value>>,
) -> Result<AppConfig, ConfigError> {
    let config_file_path = args.config.clone().or_else(default_config_path);

    let mut config_builder = ConfigCrate::builder();

    if let Some(ref path) = config_file_path {
        config_builder = config_builder.add_source(File::from(path.clone()).required(false));
    }

    if let Some(overrides) = override_source {
        for (key, value) in overrides {
            config_builder = config_builder.set_override(&key, value)?;
        }
    }

    let loaded: FileConfig = config_builder.build()?.try_deserialize()?;
    let defaults = AppConfig::default();

    let config = AppConfig {
        threshold: args
            .threshold
            .or(loaded.threshold)
            .unwrap_or(defaults.threshold),
        max_depth: args
            .max_depth
            .or(loaded.max_depth)
            .unwrap_or(defaults.max_depth),
        root_fallback: loaded.root_fallback.unwrap_or(defaults.root_fallback),
        strict: args.strict || loaded.strict.unwrap_or(defaults.strict),
        format: args
            .format
            .map(DocumentFormat::from)
            .or(loaded.format)
            .unwrap_or(defaults.format),
        column_width_px: loaded.column_width_px.unwrap_or(defaults.column_width_px),
        indent_width: loaded.indent_width.unwrap_or(defaults.indent_width),
        max_undo_steps: loaded.max_undo_steps.unwrap_or(defaults.max_undo_steps),
        auto_save: args
            .auto_save
            .or(loaded.auto_save)
            .unwrap_or(defaults.auto_save),
        show_hidden: loaded.show_hidden.unwrap_or(defaults.show_hidden),
        log_file: args.log_file.clone().or(loaded.log_file),
    };

    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if !(1..=MAX_THRESHOLD_PX).contains(&config.threshold) {
        return Err(ConfigError::ValidationError(format!(
            "threshold must be between 1 and {} pixels",
            MAX_THRESHOLD_PX
        )));
    }
    if config.max_depth == 0 {
        return Err(ConfigError::ValidationError(
            "max_depth must be at least 1".to_string(),
        ));
    }
    if config.indent_width == 0 {
        return Err(ConfigError::ValidationError(
            "indent_width must be positive".to_string(),
        ));
    }
    if !(1..=MAX_COLUMN_WIDTH_PX).contains(&config.column_width_px) {
        return Err(ConfigError::ValidationError(format!(
            "column_width_px must be between 1 and {}",
            MAX_COLUMN_WIDTH_PX
        )));
    }
    Ok(())
}
