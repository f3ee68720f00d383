//! Searchify
//!
//! Incremental, debounced text filtering over the children of a container
//! element, with a terminal front end.
//!
//! The core is pure: an arena [`model::Document`] holds the element tree and a
//! [`state::Searchify`] controller mutates it by explicit `&mut` access. The
//! impure shell (terminal, files, stdin, logging) lives in [`view`],
//! [`source`] and [`logging`].

pub mod config;
pub mod logging;
pub mod model;
pub mod source;
pub mod state;
pub mod view;
