#![forbid(unsafe_code)]

//! The observable record store.
//!
//! # Design
//!
//! [`Store`] is a cheap, clonable handle to shared interior state: the
//! current [`Record`], the record the store was created with, a version
//! counter, and a list of `Weak` subscriber callbacks. There is no global
//! instance; every consumer is handed a `Store` explicitly.
//!
//! Every mutator follows the same shape: read the current snapshot, build the
//! next one outside the borrow, install it whole, bump the version, release
//! the borrow, then run a notification pass. The pass walks the subscribers
//! that were registered when it started, in registration order, upgrading
//! each `Weak` right before the call.
//!
//! # Failure Modes
//!
//! - **Callback panics**: the new record is already installed; the remaining
//!   subscribers of that pass are skipped.
//! - **Callback mutates the store**: the nested mutation runs its own pass to
//!   completion, then the outer pass stops, since every remaining subscriber
//!   has already seen a newer snapshot.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use recstore_core::{Record, Value};

use super::selector::{Compare, Identity};

/// Raw listener: `(next, previous)`.
type Callback = dyn Fn(&Record, &Record);

/// Shared interior for [`Store`].
struct StoreInner {
    /// The current snapshot.
    record: Record,
    /// The snapshot `reset()` restores.
    initial: Record,
    /// Bumped once per mutation.
    version: u64,
    /// Registered callbacks, in registration order. Dead entries are pruned
    /// lazily.
    subscribers: Vec<Weak<Callback>>,
}

/// A shared, observable record with field-scoped mutators.
///
/// Cloning a `Store` creates a new handle to the **same** record and
/// subscriber list.
///
/// # Invariants
///
/// 1. `snapshot()` always returns a complete record; no subscriber can see a
///    half-applied write.
/// 2. `version()` increments by exactly 1 per mutation.
/// 3. Every mutator returns only after the notification pass it started has
///    finished.
#[derive(Clone)]
pub struct Store {
    inner: Rc<RefCell<StoreInner>>,
}

/// RAII guard for a store subscription.
///
/// The store only holds a weak reference to the callback; this guard owns the
/// strong one. Dropping it (or calling [`unsubscribe`](Self::unsubscribe))
/// stops delivery.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    _callback: Rc<Callback>,
}

impl Subscription {
    /// Explicitly release the subscription.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

impl Store {
    /// Create a store holding `initial`.
    #[must_use]
    pub fn new(initial: Record) -> Self {
        Self {
            inner: Rc::new(RefCell::new(StoreInner {
                record: initial.clone(),
                initial,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    // -- Reads ---------------------------------------------------------------

    /// The current record. Never blocks.
    #[must_use]
    pub fn snapshot(&self) -> Record {
        self.inner.borrow().record.clone()
    }

    /// Apply `selector` to the current record.
    pub fn select<P>(&self, selector: impl FnOnce(&Record) -> P) -> P {
        let record = self.snapshot();
        selector(&record)
    }

    /// The record this store was created with.
    #[must_use]
    pub fn initial(&self) -> Record {
        self.inner.borrow().initial.clone()
    }

    /// Number of mutations applied so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    // -- Mutators ------------------------------------------------------------

    /// Replace the record with a copy in which `name` holds `value`.
    ///
    /// Always succeeds. Writing content equal to the current content still
    /// produces a new value allocation and still notifies.
    pub fn set_field(&self, name: &str, value: impl Into<Value>) {
        let value = value.into();
        #[cfg(feature = "tracing")]
        tracing::debug!(message = "store.set", field = name, kind = value.kind());
        self.commit(|record| record.with_field(name, value));
    }

    /// Write several fields as one mutation: one version bump, one pass.
    pub fn set_fields<N, V, I>(&self, writes: I)
    where
        N: AsRef<str>,
        V: Into<Value>,
        I: IntoIterator<Item = (N, V)>,
    {
        #[cfg(feature = "tracing")]
        tracing::debug!(message = "store.set_fields");
        self.commit(|record| record.merged(writes));
    }

    /// Replace the record with `f(current)`.
    pub fn update(&self, f: impl FnOnce(&Record) -> Record) {
        #[cfg(feature = "tracing")]
        tracing::debug!(message = "store.update");
        self.commit(f);
    }

    /// Replace the whole record.
    pub fn replace(&self, record: Record) {
        #[cfg(feature = "tracing")]
        tracing::debug!(message = "store.replace", fields = record.len());
        self.commit(|_| record);
    }

    /// Restore the record the store was created with.
    pub fn reset(&self) {
        #[cfg(feature = "tracing")]
        tracing::debug!(message = "store.reset");
        let initial = self.initial();
        self.commit(|_| initial);
    }

    // -- Subscriptions -------------------------------------------------------

    /// Register a raw listener called with `(next, previous)` after every
    /// mutation.
    pub fn listen(&self, listener: impl Fn(&Record, &Record) + 'static) -> Subscription {
        let callback: Rc<Callback> = Rc::new(listener);
        let mut inner = self.inner.borrow_mut();
        inner.subscribers.retain(|w| w.strong_count() > 0);
        inner.subscribers.push(Rc::downgrade(&callback));
        Subscription {
            _callback: callback,
        }
    }

    /// Register `on_change` for changes of `selector`'s projection, compared
    /// by reference identity.
    ///
    /// The baseline projection is taken now. After each mutation the selector
    /// is re-run; if the result is not the same allocation as the last one
    /// observed, it becomes the new baseline and `on_change` is called with it.
    ///
    /// A selector that allocates a new composite on every call therefore fires
    /// on every mutation.
    pub fn subscribe<P, S, F>(&self, selector: S, on_change: F) -> Subscription
    where
        P: Identity + Clone + 'static,
        S: Fn(&Record) -> P + 'static,
        F: Fn(&P) + 'static,
    {
        self.subscribe_with(selector, Compare::identity(), on_change)
    }

    /// Like [`subscribe`](Self::subscribe) with an explicit comparison rule.
    pub fn subscribe_with<P, S, F>(
        &self,
        selector: S,
        compare: Compare<P>,
        on_change: F,
    ) -> Subscription
    where
        P: Clone + 'static,
        S: Fn(&Record) -> P + 'static,
        F: Fn(&P) + 'static,
    {
        let last = RefCell::new(self.select(&selector));
        self.listen(move |record, _previous| {
            let next = selector(record);
            let changed = !compare.same(&last.borrow(), &next);
            if changed {
                *last.borrow_mut() = next.clone();
                on_change(&next);
            }
        })
    }

    // -- Internals -----------------------------------------------------------

    fn commit(&self, next: impl FnOnce(&Record) -> Record) {
        let previous = self.snapshot();
        let record = next(&previous);

        let (version, pass) = {
            let mut inner = self.inner.borrow_mut();
            inner.record = record.clone();
            inner.version += 1;
            inner.subscribers.retain(|w| w.strong_count() > 0);
            (inner.version, inner.subscribers.clone())
        };

        self.notify(version, &pass, &record, &previous);
    }

    fn notify(&self, version: u64, pass: &[Weak<Callback>], record: &Record, previous: &Record) {
        let mut delivered = 0usize;
        for weak in pass {
            let Some(callback) = weak.upgrade() else {
                continue;
            };
            callback(record, previous);
            delivered += 1;
            if self.version() != version {
                #[cfg(feature = "tracing")]
                tracing::debug!(message = "store.notify.superseded", version, delivered);
                return;
            }
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "store.notify",
            version,
            delivered,
            registered = pass.len()
        );
        #[cfg(not(feature = "tracing"))]
        let _ = delivered;
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(Record::new())
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Store")
            .field("record", &inner.record)
            .field("version", &inner.version)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
