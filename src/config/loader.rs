//! Configuration file loading with precedence handling.

use crate::config::options::{
    ClassNames, InvalidPattern, MatchMethod, Options, SearchLocation, DEFAULT_LABEL,
    DEFAULT_MIN_CHARS, DEFAULT_TYPING_THRESHOLD,
};
use crate::model::{ElementTemplate, ItemFilter, SelectorError, TemplateError};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "SEARCHIFY_CONFIG";
/// Environment override for `min_chars`.
pub const MIN_CHARS_ENV: &str = "SEARCHIFY_MIN_CHARS";
/// Environment override for `match_method`.
pub const MATCH_METHOD_ENV: &str = "SEARCHIFY_MATCH_METHOD";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A setting parsed as TOML (or came from the environment) but is not usable.
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue {
        /// Config key or environment variable.
        key: String,
        /// What was wrong with it.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/searchify/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Label text. An empty string omits the label.
    #[serde(default)]
    pub label: Option<String>,

    /// Minimum query length before a debounced search fires.
    #[serde(default)]
    pub min_chars: Option<usize>,

    /// Typing pause before a debounced search fires, in milliseconds.
    #[serde(default)]
    pub typing_threshold_ms: Option<u64>,

    /// `before`, `after` or `both`.
    #[serde(default)]
    pub search_location: Option<SearchLocation>,

    /// Class on a bound container.
    #[serde(default)]
    pub active_class: Option<String>,

    /// Class on each matched item.
    #[serde(default)]
    pub match_class: Option<String>,

    /// Class on the container and message when nothing matches.
    #[serde(default)]
    pub no_matches_class: Option<String>,

    /// Class on generated forms.
    #[serde(default)]
    pub form_class: Option<String>,

    /// Element template for the label, e.g. `<label class="sr-only">`.
    #[serde(default)]
    pub label_template: Option<String>,

    /// Element template for the input, e.g. `<input type="search" id="q">`.
    #[serde(default)]
    pub input_template: Option<String>,

    /// Nest the input inside the label.
    #[serde(default)]
    pub wrap_label: Option<bool>,

    /// Item selector such as `:visible` or `li.fruit`.
    #[serde(default)]
    pub item_filter: Option<String>,

    /// `in-place` or `duplicate`.
    #[serde(default)]
    pub match_method: Option<MatchMethod>,

    /// `fail` or `literal`.
    #[serde(default)]
    pub invalid_pattern: Option<InvalidPattern>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
/// Templates and the selector stay textual until [`ResolvedConfig::to_options`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Label text, `None` for no label.
    pub label: Option<String>,
    /// Shortest query that triggers a search.
    pub min_chars: usize,
    /// Debounce delay.
    pub typing_threshold: Duration,
    /// Form placement.
    pub search_location: SearchLocation,
    /// Resolved class names.
    pub classes: ClassNames,
    /// Label template source.
    pub label_template: String,
    /// Input template source.
    pub input_template: String,
    /// Nest the input inside the label.
    pub wrap_label: bool,
    /// Item selector source.
    pub item_filter: String,
    /// In-place or duplicate.
    pub match_method: MatchMethod,
    /// Malformed query handling.
    pub invalid_pattern: InvalidPattern,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        let options = Options::default();
        Self {
            label: Some(DEFAULT_LABEL.to_string()),
            min_chars: DEFAULT_MIN_CHARS,
            typing_threshold: DEFAULT_TYPING_THRESHOLD,
            search_location: SearchLocation::Before,
            classes: ClassNames::default(),
            label_template: options.label_template.to_string(),
            input_template: options.input_template.to_string(),
            wrap_label: true,
            item_filter: "*".to_string(),
            match_method: MatchMethod::InPlace,
            invalid_pattern: InvalidPattern::Fail,
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// Build controller options, parsing templates and the item selector.
    ///
    /// # Errors
    ///
    /// `InvalidValue` naming the key whose template or selector does not parse.
    pub fn to_options(&self) -> Result<Options, ConfigError> {
        let label_template: ElementTemplate = self
            .label_template
            .parse()
            .map_err(|e: TemplateError| invalid_value("label_template", e))?;
        let input_template: ElementTemplate = self
            .input_template
            .parse()
            .map_err(|e: TemplateError| invalid_value("input_template", e))?;
        let item_filter: ItemFilter = self
            .item_filter
            .parse()
            .map_err(|e: SelectorError| invalid_value("item_filter", e))?;

        Ok(Options::default()
            .label(self.label.as_deref())
            .min_chars(self.min_chars)
            .typing_threshold(self.typing_threshold)
            .search_location(self.search_location.clone())
            .classes(self.classes.clone())
            .label_template(label_template)
            .input_template(input_template)
            .wrap_label(self.wrap_label)
            .item_filter(item_filter)
            .match_method(self.match_method)
            .invalid_pattern(self.invalid_pattern))
    }
}

fn invalid_value(key: &str, err: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: err.to_string(),
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/searchify/searchify.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("searchify").join("searchify.log")
    } else {
        PathBuf::from("searchify.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
/// Returns `Err` if file exists but cannot be read or parsed.
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/searchify/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("searchify").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `SEARCHIFY_CONFIG` environment variable
/// 3. Default path `~/.config/searchify/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed,
/// or if `SEARCHIFY_CONFIG` is not valid unicode.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    match std::env::var(CONFIG_ENV) {
        Ok(env_path) => return load_config_file(PathBuf::from(env_path)),
        Err(std::env::VarError::NotUnicode(raw)) => {
            return Err(ConfigError::InvalidPath(raw.to_string_lossy().into_owned()))
        }
        Err(std::env::VarError::NotPresent) => {}
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    let label = match config.label {
        Some(text) if text.is_empty() => None,
        Some(text) => Some(text),
        None => defaults.label,
    };

    ResolvedConfig {
        label,
        min_chars: config.min_chars.unwrap_or(defaults.min_chars),
        typing_threshold: config
            .typing_threshold_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.typing_threshold),
        search_location: config.search_location.unwrap_or(defaults.search_location),
        classes: ClassNames {
            active: config.active_class.unwrap_or(defaults.classes.active),
            matched: config.match_class.unwrap_or(defaults.classes.matched),
            no_matches: config
                .no_matches_class
                .unwrap_or(defaults.classes.no_matches),
            form: config.form_class.unwrap_or(defaults.classes.form),
        },
        label_template: config.label_template.unwrap_or(defaults.label_template),
        input_template: config.input_template.unwrap_or(defaults.input_template),
        wrap_label: config.wrap_label.unwrap_or(defaults.wrap_label),
        item_filter: config.item_filter.unwrap_or(defaults.item_filter),
        match_method: config.match_method.unwrap_or(defaults.match_method),
        invalid_pattern: config.invalid_pattern.unwrap_or(defaults.invalid_pattern),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `SEARCHIFY_MIN_CHARS`: Override minimum query length
/// - `SEARCHIFY_MATCH_METHOD`: Override match method (`in-place` or `duplicate`)
///
/// # Errors
///
/// `InvalidValue` if a set variable does not parse.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    if let Ok(raw) = std::env::var(MIN_CHARS_ENV) {
        config.min_chars = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
            ConfigError::InvalidValue {
                key: MIN_CHARS_ENV.to_string(),
                reason: e.to_string(),
            }
        })?;
    }

    if let Ok(raw) = std::env::var(MATCH_METHOD_ENV) {
        config.match_method = raw
            .trim()
            .parse()
            .map_err(|reason| ConfigError::InvalidValue {
                key: MATCH_METHOD_ENV.to_string(),
                reason,
            })?;
    }

    Ok(config)
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    min_chars_override: Option<usize>,
    match_method_override: Option<MatchMethod>,
    item_filter_override: Option<String>,
    invalid_pattern_override: Option<InvalidPattern>,
) -> ResolvedConfig {
    if let Some(min_chars) = min_chars_override {
        config.min_chars = min_chars;
    }

    if let Some(method) = match_method_override {
        config.match_method = method;
    }

    if let Some(filter) = item_filter_override {
        config.item_filter = filter;
    }

    if let Some(behavior) = invalid_pattern_override {
        config.invalid_pattern = behavior;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
