//! Filter controller bound to one container element.
//!
//! Lifecycle: `Uninitialized → Active → Destroyed`, with `reload` as a
//! re-entrant `Active → Active` transition.
//!
//! A search pass is synchronous and runs in a fixed order:
//! compile pattern → sync inputs → clear per-pass artifacts → reset counters →
//! `search_init` → evaluate items → `matches`/`no_matches` → `search_complete`.
//! A query that fails to compile aborts before any side effect.

use crate::config::{MatchMethod, Options, SearchLocation};
use crate::model::{Document, DomError, ElementId, ItemFilter, SearchifyError};
use crate::state::debounce::InputAction;
use crate::state::matcher::Matcher;
use std::rc::Rc;
use tracing::{debug, info};

/// Controller lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Created but not yet initialized.
    Uninitialized,
    /// Markup is in place and searches run.
    Active,
    /// Torn down. The controller cannot be reused.
    Destroyed,
}

/// Incremental filter over the children of one container.
#[derive(Debug)]
pub struct Searchify {
    container: ElementId,
    options: Options,
    lifecycle: Lifecycle,
    /// In-place: live children. Duplicate: detached snapshot copies.
    captured: Vec<ElementId>,
    /// `captured` after the item filter.
    items: Vec<ElementId>,
    /// Clones appended to the container by the last pass (duplicate mode).
    results: Vec<ElementId>,
    matches: Vec<ElementId>,
    num_results: usize,
    search_terms: String,
    inputs: Vec<ElementId>,
    search_forms: Vec<ElementId>,
    no_results_alert: Option<ElementId>,
}

impl Searchify {
    /// Create an uninitialized controller for `container`.
    pub fn new(container: ElementId, options: Options) -> Self {
        Self {
            container,
            options,
            lifecycle: Lifecycle::Uninitialized,
            captured: Vec::new(),
            items: Vec::new(),
            results: Vec::new(),
            matches: Vec::new(),
            num_results: 0,
            search_terms: String::new(),
            inputs: Vec::new(),
            search_forms: Vec::new(),
            no_results_alert: None,
        }
    }

    /// Create and initialize in one step.
    pub fn bind(
        doc: &mut Document,
        container: ElementId,
        options: Options,
    ) -> Result<Self, SearchifyError> {
        let mut controller = Self::new(container, options);
        controller.initialize(doc)?;
        Ok(controller)
    }

    // ===== Accessors =====

    /// The bound container.
    pub fn container(&self) -> ElementId {
        self.container
    }

    /// Options the controller was created with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Current lifecycle state.
    pub fn state(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Shorthand for `state() == Lifecycle::Active`.
    pub fn is_active(&self) -> bool {
        self.lifecycle == Lifecycle::Active
    }

    /// Query of the last pass.
    pub fn query(&self) -> &str {
        &self.search_terms
    }

    /// Items considered by a pass, in container order.
    pub fn items(&self) -> &[ElementId] {
        &self.items
    }

    /// Matched elements of the last pass. In duplicate mode these are the clones.
    pub fn matches(&self) -> &[ElementId] {
        &self.matches
    }

    /// Number of matches in the last pass.
    pub fn match_count(&self) -> usize {
        self.num_results
    }

    /// True if the last pass matched anything.
    pub fn has_matches(&self) -> bool {
        self.num_results > 0
    }

    /// Inputs kept in sync with the query.
    pub fn inputs(&self) -> &[ElementId] {
        &self.inputs
    }

    /// Generated forms, empty when bound to an external input.
    pub fn search_forms(&self) -> &[ElementId] {
        &self.search_forms
    }

    /// The "no results" message element, present only while nothing matches.
    pub fn no_results_alert(&self) -> Option<ElementId> {
        self.no_results_alert
    }

    fn ensure_active(&self) -> Result<(), SearchifyError> {
        match self.lifecycle {
            Lifecycle::Active => Ok(()),
            Lifecycle::Uninitialized => Err(SearchifyError::NotInitialized {
                container: self.container,
            }),
            Lifecycle::Destroyed => Err(SearchifyError::Destroyed {
                container: self.container,
            }),
        }
    }

    // ===== Lifecycle =====

    /// Capture items, render the input affordance and run the initial empty search.
    ///
    /// No-op on an active controller.
    ///
    /// # Errors
    ///
    /// `Destroyed` after [`Searchify::destroy`]; `Dom` if the container or the
    /// external input does not exist, or a sibling form cannot be placed.
    pub fn initialize(&mut self, doc: &mut Document) -> Result<&mut Self, SearchifyError> {
        match self.lifecycle {
            Lifecycle::Active => return Ok(self),
            Lifecycle::Destroyed => {
                return Err(SearchifyError::Destroyed {
                    container: self.container,
                })
            }
            Lifecycle::Uninitialized => {}
        }
        if !doc.contains(self.container) {
            return Err(DomError::UnknownElement(self.container).into());
        }

        self.search_terms.clear();
        self.lifecycle = Lifecycle::Active;
        self.render_or_rollback(doc)?;

        info!(
            container = ?self.container,
            method = %self.options.match_method,
            items = self.items.len(),
            "searchify initialized"
        );
        Ok(self)
    }

    /// Replace the item predicate, re-capture items and re-run the current query.
    pub fn filter(
        &mut self,
        doc: &mut Document,
        filter: ItemFilter,
    ) -> Result<&mut Self, SearchifyError> {
        self.ensure_active()?;
        self.options.item_filter = filter;
        self.capture(doc)?;
        self.load_items(doc)?;
        Ok(self)
    }

    /// Run a search pass for `query`.
    ///
    /// # Errors
    ///
    /// `PatternError` if the query does not compile and the options say to fail;
    /// the previous match state is left untouched in that case.
    pub fn search(&mut self, doc: &mut Document, query: &str) -> Result<&mut Self, SearchifyError> {
        self.ensure_active()?;
        self.run_search(doc, query)?;
        Ok(self)
    }

    /// Same as `search("")`.
    pub fn reset(&mut self, doc: &mut Document) -> Result<&mut Self, SearchifyError> {
        self.search(doc, "")
    }

    /// Tear down and rebuild from the container's current children.
    ///
    /// # Errors
    ///
    /// If the rebuild fails, whatever it added is removed again and the
    /// controller drops back to [`Lifecycle::Uninitialized`], so a later
    /// [`Searchify::initialize`] can start over.
    pub fn reload(&mut self, doc: &mut Document) -> Result<&mut Self, SearchifyError> {
        self.ensure_active()?;
        if let Err(err) = self.teardown(doc) {
            self.lifecycle = Lifecycle::Uninitialized;
            return Err(err.into());
        }
        self.search_terms.clear();
        self.render_or_rollback(doc)?;
        info!(container = ?self.container, items = self.items.len(), "searchify reloaded");
        Ok(self)
    }

    /// Remove generated markup, strip classes and fire the `destroyed` hook.
    pub fn destroy(&mut self, doc: &mut Document) -> Result<(), SearchifyError> {
        self.ensure_active()?;
        self.teardown(doc)?;
        self.lifecycle = Lifecycle::Destroyed;
        info!(container = ?self.container, "searchify destroyed");

        let hook = Rc::clone(&self.options.hooks.destroyed);
        hook(self, doc)
    }

    /// Execute a debounced input decision.
    pub fn apply(
        &mut self,
        doc: &mut Document,
        action: InputAction,
    ) -> Result<&mut Self, SearchifyError> {
        match action {
            InputAction::Search(query) => self.search(doc, &query),
            InputAction::Reset => self.reset(doc),
        }
    }

    // ===== "No results" message =====

    /// Insert the "no results" message before the container, replacing any previous one.
    pub fn show_no_results(&mut self, doc: &mut Document, query: &str) -> Result<(), SearchifyError> {
        self.clear_no_results(doc);

        let alert = doc.create_text_element("div", &format!("No results for \"{}\"", query));
        doc.add_class(alert, &self.options.classes.no_matches)?;
        if let Err(err) = doc.insert_before(self.container, alert) {
            doc.remove(alert);
            return Err(err.into());
        }
        self.no_results_alert = Some(alert);
        Ok(())
    }

    /// Remove the "no results" message if one is shown.
    pub fn dismiss_no_results(&mut self, doc: &mut Document) -> Result<&mut Self, SearchifyError> {
        self.ensure_active()?;
        self.clear_no_results(doc);
        Ok(self)
    }

    fn clear_no_results(&mut self, doc: &mut Document) {
        if let Some(alert) = self.no_results_alert.take() {
            doc.remove(alert);
        }
    }

    // ===== Rendering =====

    /// Render, or undo a partial render and leave the controller uninitialized.
    fn render_or_rollback(&mut self, doc: &mut Document) -> Result<(), SearchifyError> {
        if let Err(err) = self.render(doc) {
            // keep the render error, ignore cleanup failures
            let _ = self.teardown(doc);
            self.lifecycle = Lifecycle::Uninitialized;
            return Err(err);
        }
        Ok(())
    }

    fn render(&mut self, doc: &mut Document) -> Result<(), SearchifyError> {
        self.capture(doc)?;
        doc.add_class(self.container, &self.options.classes.active)?;

        match self.options.form_input {
            Some(input) => {
                if !doc.contains(input) {
                    return Err(DomError::UnknownElement(input).into());
                }
                self.inputs = vec![input];
            }
            None => {
                self.inputs.clear();
                self.search_forms.clear();
                let location = self.options.search_location.clone();
                self.insert_search_form(doc, &location)?;
            }
        }

        self.load_items(doc)?;

        let hook = Rc::clone(&self.options.hooks.rendered);
        hook(self, doc)
    }

    fn insert_search_form(
        &mut self,
        doc: &mut Document,
        location: &SearchLocation,
    ) -> Result<(), SearchifyError> {
        match location {
            SearchLocation::Into(targets) => {
                for target in targets {
                    let form = self.build_search_form(doc)?;
                    doc.append_child(*target, form)?;
                }
            }
            SearchLocation::Before => {
                let form = self.build_search_form(doc)?;
                doc.add_class(form, &format!("{}-before", self.options.classes.form))?;
                doc.insert_before(self.container, form)?;
            }
            SearchLocation::After => {
                let form = self.build_search_form(doc)?;
                doc.add_class(form, &format!("{}-after", self.options.classes.form))?;
                doc.insert_after(self.container, form)?;
            }
            SearchLocation::Both => {
                self.insert_search_form(doc, &SearchLocation::Before)?;
                self.insert_search_form(doc, &SearchLocation::After)?;
            }
        }
        Ok(())
    }

    /// Build a detached `form > [label] > input` and register it.
    fn build_search_form(&mut self, doc: &mut Document) -> Result<ElementId, SearchifyError> {
        let form = doc.create_element("form");
        self.search_forms.push(form);
        doc.add_class(form, &self.options.classes.form)?;

        let label = match &self.options.label {
            Some(text) => {
                let label = doc.create_from_template(&self.options.label_template);
                doc.set_text(label, text)?;
                doc.append_child(form, label)?;
                Some(label)
            }
            None => None,
        };

        let input = doc.create_from_template(&self.options.input_template);
        match label {
            Some(label) if self.options.wrap_label => doc.append_child(label, input)?,
            Some(label) => {
                doc.append_child(form, input)?;
                let input_id = doc.attribute(input, "id").map(str::to_string);
                if let Some(id) = input_id {
                    if doc.attribute(label, "for").is_none() {
                        doc.set_attribute(label, "for", &id)?;
                    }
                }
            }
            None => doc.append_child(form, input)?,
        }
        self.inputs.push(input);

        Ok(form)
    }

    /// Undo everything `render` and the search passes added.
    fn teardown(&mut self, doc: &mut Document) -> Result<(), DomError> {
        self.clear_no_results(doc);
        for form in std::mem::take(&mut self.search_forms) {
            doc.remove(form);
        }
        self.inputs.clear();

        for clone in std::mem::take(&mut self.results) {
            doc.remove(clone);
        }
        if self.options.match_method == MatchMethod::Duplicate && doc.contains(self.container) {
            for (index, item) in std::mem::take(&mut self.captured).into_iter().enumerate() {
                doc.insert_child(self.container, index, item)?;
            }
        }
        self.captured.clear();
        self.items.clear();
        self.matches.clear();
        self.num_results = 0;

        if doc.contains(self.container) {
            let classes = &self.options.classes;
            doc.remove_class(self.container, &classes.active)?;
            doc.remove_class(self.container, &classes.no_matches)?;
            for child in doc.children(self.container).to_vec() {
                doc.remove_class(child, &classes.matched)?;
            }
        }
        Ok(())
    }

    // ===== Item capture =====

    /// Re-capture the item source from the container's current children.
    fn capture(&mut self, doc: &mut Document) -> Result<(), SearchifyError> {
        let own: Vec<ElementId> = self
            .results
            .iter()
            .chain(self.search_forms.iter())
            .copied()
            .collect();
        let children: Vec<ElementId> = doc
            .children(self.container)
            .iter()
            .copied()
            .filter(|child| !own.contains(child))
            .collect();

        match self.options.match_method {
            MatchMethod::InPlace => self.captured = children,
            MatchMethod::Duplicate => {
                for child in children {
                    let copy = doc.deep_clone(child)?;
                    doc.remove(child);
                    self.captured.push(copy);
                }
            }
        }
        Ok(())
    }

    /// Clear match marks, apply the item filter and re-run the current query.
    fn load_items(&mut self, doc: &mut Document) -> Result<(), SearchifyError> {
        self.captured.retain(|id| doc.contains(*id));
        for id in &self.captured {
            doc.remove_class(*id, &self.options.classes.matched)?;
        }
        self.items = self.options.item_filter.apply(doc, &self.captured);

        let query = self.search_terms.clone();
        self.run_search(doc, &query)
    }

    // ===== Search pass =====

    fn run_search(&mut self, doc: &mut Document, query: &str) -> Result<(), SearchifyError> {
        let matcher = Matcher::compile(query, self.options.invalid_pattern)?;
        self.search_terms = query.to_string();

        self.search_init(doc)?;

        let extract = Rc::clone(&self.options.item_text);
        self.items.retain(|id| doc.contains(*id));
        for item in self.items.clone() {
            if matcher.matches_everything() || matcher.is_match(&extract(doc, item)) {
                self.mark_match(doc, item)?;
                self.num_results += 1;
            } else {
                self.mark_no_match(doc, item)?;
            }
        }

        self.search_complete(doc)
    }

    fn search_init(&mut self, doc: &mut Document) -> Result<(), SearchifyError> {
        for input in &self.inputs {
            if doc.contains(*input) {
                doc.set_value(*input, &self.search_terms)?;
            }
        }

        self.clear_no_results(doc);
        for clone in std::mem::take(&mut self.results) {
            doc.remove(clone);
        }

        self.num_results = 0;
        self.matches.clear();
        doc.remove_class(self.container, &self.options.classes.no_matches)?;

        let hook = Rc::clone(&self.options.hooks.search_init);
        let query = self.search_terms.clone();
        hook(self, doc, &query)
    }

    fn mark_match(&mut self, doc: &mut Document, item: ElementId) -> Result<(), SearchifyError> {
        let matched = &self.options.classes.matched;
        match self.options.match_method {
            MatchMethod::InPlace => {
                doc.add_class(item, matched)?;
                self.matches.push(item);
            }
            MatchMethod::Duplicate => {
                let copy = doc.deep_clone(item)?;
                doc.add_class(copy, matched)?;
                doc.append_child(self.container, copy)?;
                self.results.push(copy);
                self.matches.push(copy);
            }
        }
        Ok(())
    }

    fn mark_no_match(&mut self, doc: &mut Document, item: ElementId) -> Result<(), SearchifyError> {
        if self.options.match_method == MatchMethod::InPlace {
            doc.remove_class(item, &self.options.classes.matched)?;
        }
        Ok(())
    }

    fn search_complete(&mut self, doc: &mut Document) -> Result<(), SearchifyError> {
        let query = self.search_terms.clone();
        debug!(
            query = %query,
            items = self.items.len(),
            matches = self.num_results,
            "search pass evaluated"
        );

        if self.num_results > 0 {
            doc.remove_class(self.container, &self.options.classes.no_matches)?;
            let hook = Rc::clone(&self.options.hooks.matches);
            let matches = self.matches.clone();
            hook(self, doc, &matches, &query)?;
        } else {
            self.matches.clear();
            doc.add_class(self.container, &self.options.classes.no_matches)?;
            let hook = Rc::clone(&self.options.hooks.no_matches);
            hook(self, doc, &query)?;
        }

        let hook = Rc::clone(&self.options.hooks.search_complete);
        hook(self, doc)
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
