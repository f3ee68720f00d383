//! Configuration module.
//!
//! [`Options`] is what a controller is built from. [`loader`] resolves a
//! TOML file, the environment and CLI flags into a [`ResolvedConfig`] that
//! converts to `Options`.

pub mod loader;
pub mod options;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    load_config_file, load_config_with_precedence, merge_config, ConfigError, ConfigFile,
    ResolvedConfig,
};
pub use options::{
    ClassNames, HookResult, Hooks, InvalidPattern, LifecycleHook, MatchMethod, MatchesHook,
    Options, QueryHook, SearchLocation, TextExtractor, DEFAULT_LABEL, DEFAULT_MIN_CHARS,
    DEFAULT_TYPING_THRESHOLD,
};
