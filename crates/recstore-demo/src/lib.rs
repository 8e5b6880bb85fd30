#![forbid(unsafe_code)]

//! Scripted demo of the observable record store.
//!
//! Two stores back a handful of views: a user form (`name`, `age`) and a
//! counter. A line-oriented script drives the stores; after every command,
//! views whose binding asked for a redraw render once and log it. The
//! `UserCard` view selects a freshly built composite, so it re-renders on
//! every user mutation, while the single-field inputs only re-render when
//! their own field is written.

pub mod cli;
pub mod error;
pub mod logging;
pub mod script;
pub mod session;
pub mod stores;
pub mod views;

pub use cli::{run, run_from_env};
pub use error::{DemoError, Result};
