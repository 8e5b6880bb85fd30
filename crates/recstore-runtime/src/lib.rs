#![forbid(unsafe_code)]

//! Runtime: the observable record store and its binding layer.

pub mod reactive;

pub use reactive::{Binding, Compare, Derived, Identity, Store, Subscription};
