//! Controller state machine and input handling.
//!
//! Everything here runs synchronously against a [`crate::model::Document`]
//! and is testable without a terminal.

pub mod controller;
pub mod debounce;
pub mod input_handler;
pub mod matcher;
pub mod registry;

// Re-export for convenience
pub use controller::{Lifecycle, Searchify};
pub use debounce::{DebouncedInput, InputAction};
pub use input_handler::InputBuffer;
pub use matcher::Matcher;
pub use registry::{Operation, Registry};
