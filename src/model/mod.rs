//! Domain model types.
//!
//! The element tree the controller manipulates, plus the parsed forms of
//! user-supplied selectors, templates and item descriptions.

pub mod document;
pub mod error;
pub mod item;
pub mod selector;
pub mod template;

// Re-export for convenience
pub use document::{Document, Element, ElementId};
pub use error::{
    AppError, DomError, InputError, PatternError, SearchifyError, SelectorError, TemplateError,
};
pub use item::{ItemList, ItemSpec};
pub use selector::ItemFilter;
pub use template::ElementTemplate;
