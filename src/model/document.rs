//! In-memory element tree.
//!
//! `Document` is the host the controller manipulates: an arena of elements with
//! ordered children, class lists and text. Ids are generational, so an id of a
//! removed element never resolves to a newer element.

use crate::model::error::DomError;
use crate::model::template::ElementTemplate;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Stable handle to an element in a [`Document`].
    pub struct ElementId;
}

/// A single element node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    classes: Vec<String>,
    text: String,
    hidden: bool,
    children: Vec<ElementId>,
    parent: Option<ElementId>,
}

impl Element {
    fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            classes: Vec::new(),
            text: String::new(),
            hidden: false,
            children: Vec::new(),
            parent: None,
        }
    }

    /// Lowercase tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attributes in insertion order. `class` is kept separately, see [`Element::classes`].
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Value of the named attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Class list in insertion order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// True if the class list contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Own text, not including descendants.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Own hidden flag. See [`Document::is_visible`] for the inherited one.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Child ids in document order.
    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    /// Parent id, `None` when detached.
    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }
}

/// Arena of elements rooted at a `body` element.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: SlotMap<ElementId, Element>,
    root: ElementId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty document holding only the `body` root.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Element::new("body"));
        Self { nodes, root }
    }

    /// The `body` element.
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Number of live elements, attached or not, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Never true in practice, the root always exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// True if `id` refers to a live element.
    pub fn contains(&self, id: ElementId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Borrow an element, `None` for unknown ids.
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.nodes.get(id)
    }

    fn node(&self, id: ElementId) -> Result<&Element, DomError> {
        self.nodes.get(id).ok_or(DomError::UnknownElement(id))
    }

    fn node_mut(&mut self, id: ElementId) -> Result<&mut Element, DomError> {
        self.nodes.get_mut(id).ok_or(DomError::UnknownElement(id))
    }

    // ===== Construction =====

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> ElementId {
        self.nodes.insert(Element::new(tag))
    }

    /// Create a detached element with own text.
    pub fn create_text_element(&mut self, tag: &str, text: &str) -> ElementId {
        let mut element = Element::new(tag);
        element.text = text.to_string();
        self.nodes.insert(element)
    }

    /// Create a detached element from a parsed template.
    pub fn create_from_template(&mut self, template: &ElementTemplate) -> ElementId {
        let mut element = Element::new(template.tag());
        for (name, value) in template.attributes() {
            if name == "class" {
                for class in value.split_whitespace() {
                    if !element.has_class(class) {
                        element.classes.push(class.to_string());
                    }
                }
            } else {
                element.attributes.push((name.clone(), value.clone()));
            }
        }
        self.nodes.insert(element)
    }

    /// Deep copy of `id` and its subtree. The copy is detached.
    pub fn deep_clone(&mut self, id: ElementId) -> Result<ElementId, DomError> {
        let mut copy = self.node(id)?.clone();
        let children = std::mem::take(&mut copy.children);
        copy.parent = None;
        let new_id = self.nodes.insert(copy);

        for child in children {
            let child_copy = self.deep_clone(child)?;
            self.attach(new_id, child_copy, None)?;
        }

        Ok(new_id)
    }

    // ===== Tree structure =====

    /// Parent of `id`, `None` for detached or unknown ids.
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.nodes.get(id).and_then(|e| e.parent)
    }

    /// Children of `id`, empty for unknown ids.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.nodes.get(id).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    /// True if `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// True if the element is reachable from the root.
    pub fn is_attached(&self, id: ElementId) -> bool {
        self.contains(id) && self.is_ancestor_or_self(self.root, id)
    }

    /// Append `child` as the last child of `parent`, moving it if already attached.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> Result<(), DomError> {
        self.attach(parent, child, None)
    }

    /// Insert `new` as the sibling immediately before `reference`.
    ///
    /// On error the tree is left as it was. Inserting an element next to itself
    /// is a no-op.
    pub fn insert_before(&mut self, reference: ElementId, new: ElementId) -> Result<(), DomError> {
        self.insert_sibling(reference, new, 0)
    }

    /// Insert `new` as the sibling immediately after `reference`.
    ///
    /// Same failure guarantees as [`Document::insert_before`].
    pub fn insert_after(&mut self, reference: ElementId, new: ElementId) -> Result<(), DomError> {
        self.insert_sibling(reference, new, 1)
    }

    fn insert_sibling(
        &mut self,
        reference: ElementId,
        new: ElementId,
        offset: usize,
    ) -> Result<(), DomError> {
        let parent = self.sibling_parent(reference)?;
        self.node(new)?;
        if new == reference {
            return Ok(());
        }
        if self.is_ancestor_or_self(new, parent) {
            return Err(DomError::Cycle { parent, child: new });
        }

        // nothing below can fail once the checks above pass
        self.detach(new)?;
        let index = self.index_in_parent(parent, reference)?;
        self.attach(parent, new, Some(index + offset))
    }

    /// Insert `child` at `index` among `parent`'s children.
    pub fn insert_child(
        &mut self,
        parent: ElementId,
        index: usize,
        child: ElementId,
    ) -> Result<(), DomError> {
        self.attach(parent, child, Some(index))
    }

    fn sibling_parent(&self, reference: ElementId) -> Result<ElementId, DomError> {
        self.node(reference)?
            .parent
            .ok_or(DomError::Detached(reference))
    }

    fn index_in_parent(&self, parent: ElementId, child: ElementId) -> Result<usize, DomError> {
        self.node(parent)?
            .children
            .iter()
            .position(|c| *c == child)
            .ok_or(DomError::Detached(child))
    }

    fn attach(
        &mut self,
        parent: ElementId,
        child: ElementId,
        index: Option<usize>,
    ) -> Result<(), DomError> {
        self.node(parent)?;
        self.node(child)?;
        if self.is_ancestor_or_self(child, parent) {
            return Err(DomError::Cycle { parent, child });
        }

        self.detach(child)?;
        let children = &mut self.node_mut(parent)?.children;
        let index = index.unwrap_or(children.len()).min(children.len());
        children.insert(index, child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Unlink `id` from its parent, keeping it alive.
    pub fn detach(&mut self, id: ElementId) -> Result<(), DomError> {
        let Some(parent) = self.node(id)?.parent else {
            return Ok(());
        };
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        self.node_mut(id)?.parent = None;
        Ok(())
    }

    /// Unlink `id` and free it with its whole subtree. Unknown ids are ignored.
    pub fn remove(&mut self, id: ElementId) {
        if id == self.root || !self.contains(id) {
            return;
        }
        // detach cannot fail for a live id
        let _ = self.detach(id);
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(element) = self.nodes.remove(next) {
                stack.extend(element.children);
            }
        }
    }

    // ===== Classes, attributes, text =====

    /// Add a class unless already present.
    pub fn add_class(&mut self, id: ElementId, class: &str) -> Result<(), DomError> {
        let element = self.node_mut(id)?;
        if !element.has_class(class) {
            element.classes.push(class.to_string());
        }
        Ok(())
    }

    /// Remove a class if present.
    pub fn remove_class(&mut self, id: ElementId, class: &str) -> Result<(), DomError> {
        self.node_mut(id)?.classes.retain(|c| c != class);
        Ok(())
    }

    /// False for unknown ids.
    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.nodes.get(id).is_some_and(|e| e.has_class(class))
    }

    /// Set or overwrite an attribute, keeping its position.
    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) -> Result<(), DomError> {
        let element = self.node_mut(id)?;
        match element.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => element
                .attributes
                .push((name.to_string(), value.to_string())),
        }
        Ok(())
    }

    /// Attribute of `id`, `None` if unset or the id is unknown.
    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.nodes.get(id).and_then(|e| e.attribute(name))
    }

    /// Current value of an input element.
    pub fn value(&self, id: ElementId) -> &str {
        self.attribute(id, "value").unwrap_or("")
    }

    /// Set the `value` attribute of an input.
    pub fn set_value(&mut self, id: ElementId, value: &str) -> Result<(), DomError> {
        self.set_attribute(id, "value", value)
    }

    /// Replace the element's own text.
    pub fn set_text(&mut self, id: ElementId, text: &str) -> Result<(), DomError> {
        self.node_mut(id)?.text = text.to_string();
        Ok(())
    }

    /// Concatenated text of the element and its descendants, depth first.
    pub fn text_content(&self, id: ElementId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: ElementId, out: &mut String) {
        if let Some(element) = self.nodes.get(id) {
            out.push_str(&element.text);
            for child in &element.children {
                self.collect_text(*child, out);
            }
        }
    }

    /// Set the element's own hidden flag.
    pub fn set_hidden(&mut self, id: ElementId, hidden: bool) -> Result<(), DomError> {
        self.node_mut(id)?.hidden = hidden;
        Ok(())
    }

    /// Neither the element nor any ancestor is hidden.
    pub fn is_visible(&self, id: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            match self.nodes.get(node) {
                Some(element) if !element.hidden => current = element.parent,
                _ => return false,
            }
        }
        true
    }

    // ===== Serialization =====

    /// Serialize the element and its subtree as HTML-like markup.
    pub fn outer_html(&self, id: ElementId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    /// Serialize only the children of `id`.
    pub fn inner_html(&self, id: ElementId) -> String {
        let mut out = String::new();
        for child in self.children(id) {
            self.write_html(*child, &mut out);
        }
        out
    }

    fn write_html(&self, id: ElementId, out: &mut String) {
        let Some(element) = self.nodes.get(id) else {
            return;
        };

        out.push('<');
        out.push_str(&element.tag);
        if !element.classes.is_empty() {
            out.push_str(" class=\"");
            out.push_str(&escape_html(&element.classes.join(" ")));
            out.push('"');
        }
        for (name, value) in &element.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_html(value));
            out.push('"');
        }
        if element.hidden {
            out.push_str(" hidden");
        }
        out.push('>');

        if is_void_tag(&element.tag) {
            return;
        }

        out.push_str(&escape_html(&element.text));
        for child in &element.children {
            self.write_html(*child, out);
        }
        out.push_str("</");
        out.push_str(&element.tag);
        out.push('>');
    }
}

fn is_void_tag(tag: &str) -> bool {
    matches!(tag, "input" | "br" | "hr" | "img" | "meta" | "link")
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
