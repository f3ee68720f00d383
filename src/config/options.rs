//! Controller options.
//!
//! An explicit record passed at construction. Several fields are strategies
//! (item predicate, text extractor) or lifecycle hooks. Every field has a
//! default, see [`Options::default`].

use crate::model::{Document, ElementId, ElementTemplate, ItemFilter, SearchifyError};
use crate::state::Searchify;
use serde::Deserialize;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use std::time::Duration;

/// Default label text.
pub const DEFAULT_LABEL: &str = "Search:";
/// Default minimum query length before a debounced search fires.
pub const DEFAULT_MIN_CHARS: usize = 3;
/// Default typing pause before a debounced search fires.
pub const DEFAULT_TYPING_THRESHOLD: Duration = Duration::from_millis(350);

/// Result type every hook returns.
pub type HookResult = Result<(), SearchifyError>;

/// Hook receiving only the controller and the document.
pub type LifecycleHook = Rc<dyn Fn(&mut Searchify, &mut Document) -> HookResult>;

/// Hook receiving the query of the running pass.
pub type QueryHook = Rc<dyn Fn(&mut Searchify, &mut Document, &str) -> HookResult>;

/// Hook receiving the matched items and the query.
pub type MatchesHook = Rc<dyn Fn(&mut Searchify, &mut Document, &[ElementId], &str) -> HookResult>;

/// Extracts the text an item is matched against.
pub type TextExtractor = Rc<dyn Fn(&Document, ElementId) -> String>;

// ===== Enumerated options =====

/// How match state is made visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMethod {
    /// Toggle the match class on the existing children.
    #[default]
    #[serde(alias = "css")]
    InPlace,
    /// Keep a detached snapshot and append clones of the matches each pass.
    #[serde(alias = "dom")]
    Duplicate,
}

impl FromStr for MatchMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in-place" | "css" => Ok(MatchMethod::InPlace),
            "duplicate" | "dom" => Ok(MatchMethod::Duplicate),
            other => Err(format!(
                "unknown match method {:?} (expected in-place or duplicate)",
                other
            )),
        }
    }
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMethod::InPlace => write!(f, "in-place"),
            MatchMethod::Duplicate => write!(f, "duplicate"),
        }
    }
}

/// What to do with a query that does not compile as a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidPattern {
    /// Abort the pass with a pattern error.
    #[default]
    Fail,
    /// Match the query as a literal substring instead.
    Literal,
}

/// Where generated search forms go.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchLocation {
    /// Sibling immediately before the container.
    #[default]
    Before,
    /// Sibling immediately after the container.
    After,
    /// One form before and one after.
    Both,
    /// Appended inside each target element.
    #[serde(skip)]
    Into(Vec<ElementId>),
}

/// Class names applied by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNames {
    /// On the container while a controller is bound.
    pub active: String,
    /// On each matched item.
    pub matched: String,
    /// On the container when a pass found nothing, and on the message element.
    pub no_matches: String,
    /// On generated forms; `-before`/`-after` variants mark sibling placement.
    pub form: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            active: "searchify".to_string(),
            matched: "searchify-match".to_string(),
            no_matches: "searchify-no-results".to_string(),
            form: "searchify-form".to_string(),
        }
    }
}

// ===== Hooks =====

/// Lifecycle callbacks. The controller is passed explicitly and may be called back into.
#[derive(Clone)]
pub struct Hooks {
    /// After the form is rendered and the initial search ran.
    pub rendered: LifecycleHook,
    /// Before a pass evaluates items.
    pub search_init: QueryHook,
    /// A pass matched at least one item.
    pub matches: MatchesHook,
    /// A pass matched nothing. The default shows the "no results" message.
    pub no_matches: QueryHook,
    /// After every pass.
    pub search_complete: LifecycleHook,
    /// After destroy.
    pub destroyed: LifecycleHook,
}

impl Default for Hooks {
    fn default() -> Self {
        Self {
            rendered: Rc::new(ignore_lifecycle),
            search_init: Rc::new(ignore_query),
            matches: Rc::new(ignore_matches),
            no_matches: Rc::new(show_no_results),
            search_complete: Rc::new(ignore_lifecycle),
            destroyed: Rc::new(ignore_lifecycle),
        }
    }
}

fn ignore_lifecycle(_: &mut Searchify, _: &mut Document) -> HookResult {
    Ok(())
}

fn ignore_query(_: &mut Searchify, _: &mut Document, _: &str) -> HookResult {
    Ok(())
}

fn ignore_matches(_: &mut Searchify, _: &mut Document, _: &[ElementId], _: &str) -> HookResult {
    Ok(())
}

fn show_no_results(ctl: &mut Searchify, doc: &mut Document, query: &str) -> HookResult {
    ctl.show_no_results(doc, query)
}

fn text_content(doc: &Document, id: ElementId) -> String {
    doc.text_content(id)
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks").finish_non_exhaustive()
    }
}

// ===== Options =====

/// Everything a controller is configured with.
///
/// Built with [`Options::default`] and the chained setters, or from a
/// [`ResolvedConfig`](crate::config::loader::ResolvedConfig).
#[derive(Clone)]
pub struct Options {
    /// Label text, `None` to omit the label.
    pub label: Option<String>,
    /// Shortest query that triggers a search. Shorter input resets.
    pub min_chars: usize,
    /// Quiet period after the last key before a search fires.
    pub typing_threshold: Duration,
    /// Where generated forms go relative to the container.
    pub search_location: SearchLocation,
    /// Class names applied to container, matches, message and forms.
    pub classes: ClassNames,
    /// Element the label text is rendered into.
    pub label_template: ElementTemplate,
    /// Element used for each generated input.
    pub input_template: ElementTemplate,
    /// Nest the input inside the label instead of linking them with `for`.
    pub wrap_label: bool,
    /// Which container children are searchable.
    pub item_filter: ItemFilter,
    /// Existing input to bind instead of generating a form.
    pub form_input: Option<ElementId>,
    /// Mark matches in place or rebuild the container from clones.
    pub match_method: MatchMethod,
    /// Text an item is matched against.
    pub item_text: TextExtractor,
    /// What to do with a query that is not a valid pattern.
    pub invalid_pattern: InvalidPattern,
    /// Lifecycle callbacks.
    pub hooks: Hooks,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            label: Some(DEFAULT_LABEL.to_string()),
            min_chars: DEFAULT_MIN_CHARS,
            typing_threshold: DEFAULT_TYPING_THRESHOLD,
            search_location: SearchLocation::Before,
            classes: ClassNames::default(),
            label_template: ElementTemplate::bare("label"),
            input_template: ElementTemplate::bare("input").with_attribute("type", "search"),
            wrap_label: true,
            item_filter: ItemFilter::All,
            form_input: None,
            match_method: MatchMethod::InPlace,
            item_text: Rc::new(text_content),
            invalid_pattern: InvalidPattern::Fail,
            hooks: Hooks::default(),
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("label", &self.label)
            .field("min_chars", &self.min_chars)
            .field("typing_threshold", &self.typing_threshold)
            .field("search_location", &self.search_location)
            .field("classes", &self.classes)
            .field("label_template", &self.label_template)
            .field("input_template", &self.input_template)
            .field("wrap_label", &self.wrap_label)
            .field("item_filter", &self.item_filter)
            .field("form_input", &self.form_input)
            .field("match_method", &self.match_method)
            .field("invalid_pattern", &self.invalid_pattern)
            .finish_non_exhaustive()
    }
}

impl Options {
    /// Set the label text, `None` to omit it.
    pub fn label(mut self, label: Option<&str>) -> Self {
        self.label = label.map(str::to_string);
        self
    }

    /// Set [`Options::min_chars`].
    pub fn min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars;
        self
    }

    /// Set [`Options::typing_threshold`].
    pub fn typing_threshold(mut self, delay: Duration) -> Self {
        self.typing_threshold = delay;
        self
    }

    /// Set [`Options::search_location`].
    pub fn search_location(mut self, location: SearchLocation) -> Self {
        self.search_location = location;
        self
    }

    /// Set [`Options::classes`].
    pub fn classes(mut self, classes: ClassNames) -> Self {
        self.classes = classes;
        self
    }

    /// Set [`Options::label_template`].
    pub fn label_template(mut self, template: ElementTemplate) -> Self {
        self.label_template = template;
        self
    }

    /// Set [`Options::input_template`].
    pub fn input_template(mut self, template: ElementTemplate) -> Self {
        self.input_template = template;
        self
    }

    /// Set [`Options::wrap_label`].
    pub fn wrap_label(mut self, wrap: bool) -> Self {
        self.wrap_label = wrap;
        self
    }

    /// Set [`Options::item_filter`].
    pub fn item_filter(mut self, filter: ItemFilter) -> Self {
        self.item_filter = filter;
        self
    }

    /// Bind an existing input instead of generating forms.
    pub fn form_input(mut self, input: ElementId) -> Self {
        self.form_input = Some(input);
        self
    }

    /// Set [`Options::match_method`].
    pub fn match_method(mut self, method: MatchMethod) -> Self {
        self.match_method = method;
        self
    }

    /// Set [`Options::invalid_pattern`].
    pub fn invalid_pattern(mut self, behavior: InvalidPattern) -> Self {
        self.invalid_pattern = behavior;
        self
    }

    /// Replace the default text-content extractor.
    pub fn item_text(mut self, extract: impl Fn(&Document, ElementId) -> String + 'static) -> Self {
        self.item_text = Rc::new(extract);
        self
    }

    /// Called once after initialize or reload has built the markup.
    pub fn on_rendered(
        mut self,
        hook: impl Fn(&mut Searchify, &mut Document) -> HookResult + 'static,
    ) -> Self {
        self.hooks.rendered = Rc::new(hook);
        self
    }

    /// Called at the start of every search pass with the query.
    pub fn on_search_init(
        mut self,
        hook: impl Fn(&mut Searchify, &mut Document, &str) -> HookResult + 'static,
    ) -> Self {
        self.hooks.search_init = Rc::new(hook);
        self
    }

    /// Called when a pass matched at least one item.
    pub fn on_matches(
        mut self,
        hook: impl Fn(&mut Searchify, &mut Document, &[ElementId], &str) -> HookResult + 'static,
    ) -> Self {
        self.hooks.matches = Rc::new(hook);
        self
    }

    /// Called when a pass matched nothing.
    pub fn on_no_matches(
        mut self,
        hook: impl Fn(&mut Searchify, &mut Document, &str) -> HookResult + 'static,
    ) -> Self {
        self.hooks.no_matches = Rc::new(hook);
        self
    }

    /// Called at the end of every search pass.
    pub fn on_search_complete(
        mut self,
        hook: impl Fn(&mut Searchify, &mut Document) -> HookResult + 'static,
    ) -> Self {
        self.hooks.search_complete = Rc::new(hook);
        self
    }

    /// Called after destroy has torn everything down.
    pub fn on_destroyed(
        mut self,
        hook: impl Fn(&mut Searchify, &mut Document) -> HookResult + 'static,
    ) -> Self {
        self.hooks.destroyed = Rc::new(hook);
        self
    }
}
