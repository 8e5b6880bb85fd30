#![forbid(unsafe_code)]

//! Reactive record store.
//!
//! This module provides the change-notification primitives views build on:
//!
//! - [`Store`]: a shared handle to one current [`Record`] with field-scoped
//!   mutators and synchronous subscriber notification.
//! - [`Subscription`]: RAII guard that unsubscribes on drop.
//! - [`Identity`] and [`Compare`]: the rule deciding whether a selector's
//!   projection "changed". The default rule is reference identity.
//! - [`Derived`]: a lazily evaluated, memoized projection of a store.
//! - [`Binding`]: the per-view binding that tracks the selected value and a
//!   pending redraw.
//!
//! # Architecture
//!
//! `Store` uses `Rc<RefCell<..>>` for single-threaded shared ownership.
//! Subscribers are stored as `Weak` function pointers and pruned lazily
//! during notification and registration. The consumer owns the only strong
//! reference through its [`Subscription`].
//!
//! # Invariants
//!
//! 1. Version increments exactly once per mutation, including mutations that
//!    write content equal to what was already there.
//! 2. Subscribers are notified in registration order.
//! 3. The record is replaced whole before any subscriber runs; subscribers
//!    only ever observe complete snapshots.
//! 4. Dropping a [`Subscription`] removes the callback before its next
//!    invocation, even mid-pass.
//! 5. A mutation issued from inside a callback runs its own full pass and
//!    supersedes the remainder of the outer pass.
//!
//! [`Record`]: recstore_core::Record

pub mod binding;
pub mod derived;
pub mod selector;
pub mod store;

pub use binding::Binding;
pub use derived::Derived;
pub use selector::{Compare, Identity};
pub use store::{Store, Subscription};
