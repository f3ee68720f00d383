//! Container → controller bindings and named-operation dispatch.
//!
//! At most one controller is bound per container. Attaching to a bound
//! container is a silent no-op; `destroy` removes the binding so a fresh
//! controller can be attached later.

use crate::config::Options;
use crate::model::{Document, ElementId, ItemFilter, SearchifyError};
use crate::state::Searchify;
use std::collections::HashMap;
use tracing::debug;

/// A public controller operation with its arguments.
#[derive(Debug, Clone)]
pub enum Operation {
    /// Replace the item filter and re-capture.
    Filter(ItemFilter),
    /// Run one search pass.
    Search(String),
    /// Same as an empty search.
    Reset,
    /// Tear down and rebuild the markup.
    Reload,
    /// Tear down and drop the binding.
    Destroy,
}

type OperationParser = fn(&[&str]) -> Result<Operation, SearchifyError>;

/// Every operation callable by name.
const DISPATCH: &[(&str, OperationParser)] = &[
    ("filter", parse_filter),
    ("search", parse_search),
    ("reset", parse_reset),
    ("reload", parse_reload),
    ("destroy", parse_destroy),
];

fn parse_filter(args: &[&str]) -> Result<Operation, SearchifyError> {
    let selector = args.first().ok_or(SearchifyError::MissingArgument {
        operation: "filter",
        argument: "selector",
    })?;
    Ok(Operation::Filter(selector.parse()?))
}

fn parse_search(args: &[&str]) -> Result<Operation, SearchifyError> {
    Ok(Operation::Search(args.first().copied().unwrap_or("").to_string()))
}

fn parse_reset(_: &[&str]) -> Result<Operation, SearchifyError> {
    Ok(Operation::Reset)
}

fn parse_reload(_: &[&str]) -> Result<Operation, SearchifyError> {
    Ok(Operation::Reload)
}

fn parse_destroy(_: &[&str]) -> Result<Operation, SearchifyError> {
    Ok(Operation::Destroy)
}

impl Operation {
    /// Look up `name` in the dispatch table and parse its arguments.
    ///
    /// # Errors
    ///
    /// `InternalOperation` for `init` and `_`-prefixed names, `UnknownOperation`
    /// for anything else not in the table, and argument errors from the parser.
    pub fn parse(name: &str, args: &[&str]) -> Result<Self, SearchifyError> {
        if name.starts_with('_') || name == "init" {
            return Err(SearchifyError::InternalOperation(name.to_string()));
        }
        let (_, parser) = DISPATCH
            .iter()
            .find(|(known, _)| *known == name)
            .ok_or_else(|| SearchifyError::UnknownOperation(name.to_string()))?;
        parser(args)
    }

    /// Name the operation is dispatched under.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Filter(_) => "filter",
            Operation::Search(_) => "search",
            Operation::Reset => "reset",
            Operation::Reload => "reload",
            Operation::Destroy => "destroy",
        }
    }

    /// Names accepted by [`Operation::parse`].
    pub fn names() -> impl Iterator<Item = &'static str> {
        DISPATCH.iter().map(|(name, _)| *name)
    }
}

/// Owns the controllers bound to containers of one document.
#[derive(Debug, Default)]
pub struct Registry {
    instances: HashMap<ElementId, Searchify>,
}

impl Registry {
    /// Registry with no bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a new controller to `container`.
    ///
    /// Returns `false` without touching anything if one is already bound.
    pub fn attach(
        &mut self,
        doc: &mut Document,
        container: ElementId,
        options: Options,
    ) -> Result<bool, SearchifyError> {
        if self.instances.contains_key(&container) {
            debug!(container = ?container, "searchify already bound, ignoring attach");
            return Ok(false);
        }
        let controller = Searchify::bind(doc, container, options)?;
        self.instances.insert(container, controller);
        Ok(true)
    }

    /// Attach the same options to several containers. Returns how many were newly bound.
    pub fn attach_all(
        &mut self,
        doc: &mut Document,
        containers: &[ElementId],
        options: &Options,
    ) -> Result<usize, SearchifyError> {
        let mut attached = 0;
        for container in containers {
            if self.attach(doc, *container, options.clone())? {
                attached += 1;
            }
        }
        Ok(attached)
    }

    /// Controller bound to `container`.
    pub fn get(&self, container: ElementId) -> Option<&Searchify> {
        self.instances.get(&container)
    }

    /// Mutable access to the controller bound to `container`.
    pub fn get_mut(&mut self, container: ElementId) -> Option<&mut Searchify> {
        self.instances.get_mut(&container)
    }

    /// True if a controller is bound to `container`.
    pub fn is_bound(&self, container: ElementId) -> bool {
        self.instances.contains_key(&container)
    }

    /// Number of bound containers.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// True when nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Run a typed operation on the controller bound to `container`.
    ///
    /// `Destroy` always drops the binding, even when the `destroyed` hook fails.
    pub fn call(
        &mut self,
        doc: &mut Document,
        container: ElementId,
        operation: Operation,
    ) -> Result<(), SearchifyError> {
        let controller = self
            .instances
            .get_mut(&container)
            .ok_or(SearchifyError::NotInitialized { container })?;

        debug!(container = ?container, operation = operation.name(), "dispatching");
        match operation {
            Operation::Filter(filter) => {
                controller.filter(doc, filter)?;
            }
            Operation::Search(query) => {
                controller.search(doc, &query)?;
            }
            Operation::Reset => {
                controller.reset(doc)?;
            }
            Operation::Reload => {
                controller.reload(doc)?;
            }
            Operation::Destroy => {
                let result = controller.destroy(doc);
                self.instances.remove(&container);
                result?;
            }
        }
        Ok(())
    }

    /// Run an operation by name, see [`Operation::parse`].
    pub fn invoke(
        &mut self,
        doc: &mut Document,
        container: ElementId,
        name: &str,
        args: &[&str],
    ) -> Result<(), SearchifyError> {
        let operation = Operation::parse(name, args)?;
        self.call(doc, container, operation)
    }

    /// Run an operation by name on several containers, stopping at the first error.
    pub fn invoke_all(
        &mut self,
        doc: &mut Document,
        containers: &[ElementId],
        name: &str,
        args: &[&str],
    ) -> Result<(), SearchifyError> {
        let operation = Operation::parse(name, args)?;
        for container in containers {
            self.call(doc, *container, operation.clone())?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
