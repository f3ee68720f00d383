//! Item descriptions loaded from input and the container built from them.

use crate::model::{Document, DomError, ElementId};
use serde::{Deserialize, Serialize};

/// One item as read from a file or stdin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSpec {
    /// Text content of the element.
    pub text: String,
    /// Element tag, `li` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Classes to put on the element.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    /// Start hidden.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
}

impl ItemSpec {
    /// Visible `li` item with the given text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tag: None,
            classes: Vec::new(),
            hidden: false,
        }
    }

    /// Tag to create, falling back to `li`.
    pub fn tag(&self) -> &str {
        self.tag.as_deref().unwrap_or("li")
    }
}

/// A `ul` container attached to a document, populated with one element per item.
#[derive(Debug, Clone)]
pub struct ItemList {
    /// Document owning the container.
    pub document: Document,
    /// The `ul` holding the items.
    pub container: ElementId,
}

impl ItemList {
    /// Build a document whose body holds a single `ul` with the items.
    pub fn build(items: &[ItemSpec]) -> Result<Self, DomError> {
        let mut document = Document::new();
        let container = document.create_element("ul");
        document.append_child(document.root(), container)?;

        for spec in items {
            let item = document.create_text_element(spec.tag(), &spec.text);
            for class in &spec.classes {
                document.add_class(item, class)?;
            }
            document.set_hidden(item, spec.hidden)?;
            document.append_child(container, item)?;
        }

        Ok(Self {
            document,
            container,
        })
    }
}
