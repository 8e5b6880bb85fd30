#![forbid(unsafe_code)]

//! Selectors and the comparison rules applied to their projections.
//!
//! A selector is a plain `Fn(&Record) -> P`. Whether a new projection counts
//! as a change is decided by a [`Compare`] rule. The default rule,
//! [`Compare::identity`], asks whether the two projections are the *same
//! allocation* ([`Identity`]), not whether they hold equal content.
//!
//! That default has a sharp edge that is kept on purpose: a selector that
//! builds a fresh composite on every call (a new `Rc`, a new record) never
//! yields the same allocation twice, so its subscriber fires on every
//! mutation, including mutations of fields it does not read.

use std::rc::Rc;
use std::sync::Arc;

use recstore_core::{Record, Value};

/// Reference-identity comparison.
///
/// Deliberately not implemented for plain values such as `String` or `i64`:
/// a projection has to be an allocation handle for identity to mean anything.
pub trait Identity {
    /// True iff `self` and `other` refer to the same allocation.
    fn same(&self, other: &Self) -> bool;
}

impl<T: ?Sized> Identity for Rc<T> {
    fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl<T: ?Sized> Identity for Arc<T> {
    fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<T: Identity> Identity for Option<T> {
    fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.same(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl Identity for Record {
    fn same(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

/// The rule deciding whether two successive projections are "the same".
pub struct Compare<P> {
    same: Box<dyn Fn(&P, &P) -> bool>,
    kind: &'static str,
}

impl<P: Identity> Compare<P> {
    /// Same allocation. The default for [`Store::subscribe`](super::Store::subscribe).
    #[must_use]
    pub fn identity() -> Self {
        Self {
            same: Box::new(|a: &P, b: &P| a.same(b)),
            kind: "identity",
        }
    }
}

impl<P: PartialEq> Compare<P> {
    /// Structural equality via `PartialEq`.
    #[must_use]
    pub fn value() -> Self {
        Self {
            same: Box::new(|a: &P, b: &P| a == b),
            kind: "value",
        }
    }
}

impl<P> Compare<P> {
    /// A caller-supplied rule. Must return true when the projections should be
    /// treated as unchanged.
    #[must_use]
    pub fn custom(same: impl Fn(&P, &P) -> bool + 'static) -> Self {
        Self {
            same: Box::new(same),
            kind: "custom",
        }
    }

    #[must_use]
    pub fn same(&self, previous: &P, next: &P) -> bool {
        (self.same)(previous, next)
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl<P> std::fmt::Debug for Compare<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Compare").field(&self.kind).finish()
    }
}

/// Selector projecting one field's shared value handle.
///
/// Yields `None` while the field is absent.
pub fn field(name: &str) -> impl Fn(&Record) -> Option<Rc<Value>> + 'static {
    let name: Rc<str> = Rc::from(name);
    move |record: &Record| record.get(&name).cloned()
}

/// Selector projecting the whole snapshot.
pub fn whole(record: &Record) -> Record {
    record.clone()
}
