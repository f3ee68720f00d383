//! Error types for searchify.
//!
//! This module defines a hierarchical error taxonomy using `thiserror` for structured error
//! handling. Errors compose via `?` and `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level binary error wrapping all domain-specific failures
//!   - [`InputError`] - Item file/stdin reading failures
//!   - [`crate::config::ConfigError`] - Config file loading and validation failures
//!   - [`crate::logging::LoggingError`] - Tracing subscriber setup failures
//!   - [`SearchifyError`] - Controller failures
//!   - `std::io::Error` - Terminal failures
//!   - [`crate::view::TuiError`] - Interactive UI failures
//! - [`SearchifyError`] - Everything a controller operation can return
//!   - [`PatternError`] - Query did not compile to a pattern
//!   - [`SelectorError`] - Item filter selector did not parse
//!   - [`TemplateError`] - Label/input template did not parse
//!   - [`DomError`] - Document operation on a missing or unattached element
//!
//! # Error Recovery Strategy
//!
//! Pattern errors are non-fatal in the terminal front end: the query stays in the input,
//! the previous result set stays on screen, and the error is shown in the status line.
//! Input, config and terminal errors are fatal and propagate to `main`.

use crate::model::ElementId;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error for the `searchify` binary.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to read items from file or stdin.
    #[error("Failed to read input: {0}")]
    Input(#[from] InputError),

    /// Failed to load or validate configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Failed to set up logging.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// A controller operation failed.
    #[error("Search error: {0}")]
    Searchify(#[from] SearchifyError),

    /// Terminal or TUI rendering error.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// Interactive UI failure.
    #[error("{0}")]
    Tui(#[from] crate::view::TuiError),
}

/// Errors encountered when reading items from files or stdin.
#[derive(Debug, Error)]
pub enum InputError {
    /// The specified item file does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use searchify::model::InputError;
    ///
    /// let err = InputError::FileNotFound {
    ///     path: PathBuf::from("/tmp/missing.txt")
    /// };
    /// assert!(err.to_string().contains("/tmp/missing.txt"));
    /// ```
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// No file argument was given and stdin is a terminal.
    #[error("No input provided: pass a file path or pipe items on stdin")]
    NoInput,

    /// A JSON item document did not parse.
    #[error("Invalid JSON items in {source_name}: {reason}")]
    InvalidJson {
        /// File path or `<stdin>`.
        source_name: String,
        /// Parser message.
        reason: String,
    },

    /// Generic I/O failure while reading.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors returned by controller and registry operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SearchifyError {
    /// The operation needs an initialized controller.
    #[error("No searchify instance is initialized on element {container:?}")]
    NotInitialized {
        /// Container the operation targeted.
        container: ElementId,
    },

    /// The controller was destroyed and cannot be used again.
    #[error("Searchify instance on element {container:?} was already destroyed")]
    Destroyed {
        /// Container the destroyed controller was bound to.
        container: ElementId,
    },

    /// The query is not a valid pattern.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// The dispatch table has no operation with this name.
    #[error("Unknown operation: {0:?}")]
    UnknownOperation(String),

    /// The name refers to an internal step that is not callable from outside.
    #[error("Operation {0:?} is internal and cannot be invoked")]
    InternalOperation(String),

    /// A required operation argument was not supplied.
    #[error("Operation {operation:?} requires argument <{argument}>")]
    MissingArgument {
        /// Operation name.
        operation: &'static str,
        /// Argument name.
        argument: &'static str,
    },

    /// Item filter selector did not parse.
    #[error(transparent)]
    Selector(#[from] SelectorError),

    /// Element template did not parse.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// A document operation failed.
    #[error(transparent)]
    Dom(#[from] DomError),
}

/// A query that does not compile as a case-insensitive pattern.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("Invalid search pattern {pattern:?}: {source}")]
pub struct PatternError {
    /// The query as typed.
    pub pattern: String,
    /// Compiler diagnostic.
    #[source]
    pub source: regex::Error,
}

/// An item filter selector that does not parse.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid item selector {selector:?}: {reason}")]
pub struct SelectorError {
    /// The selector text.
    pub selector: String,
    /// What was wrong with it.
    pub reason: String,
}

/// An element template that does not parse.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid element template {template:?}: {reason}")]
pub struct TemplateError {
    /// The template text.
    pub template: String,
    /// What was wrong with it.
    pub reason: String,
}

/// Failures of [`crate::model::Document`] operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DomError {
    /// The id does not refer to a live element.
    #[error("Element {0:?} does not exist")]
    UnknownElement(ElementId),

    /// Sibling insertion relative to an element that has no parent.
    #[error("Element {0:?} has no parent")]
    Detached(ElementId),

    /// Appending an element into its own subtree.
    #[error("Cannot move element {child:?} into its own descendant {parent:?}")]
    Cycle {
        /// The would-be parent.
        parent: ElementId,
        /// The element being moved.
        child: ElementId,
    },
}
