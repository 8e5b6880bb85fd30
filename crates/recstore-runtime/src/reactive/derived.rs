#![forbid(unsafe_code)]

//! Lazy derived values that follow one or more [`Store`]s.
//!
//! # Design
//!
//! [`Derived<T>`] wraps a compute function and its cached result in shared,
//! reference-counted storage. Every mutation of a source store marks the
//! cache dirty; the next [`get()`](Derived::get) recomputes it. Staleness is
//! also checked against the source versions seen at the last computation, so
//! a read from a subscriber that runs before the derived value's own listener
//! still sees the new snapshot. Unlike a
//! selector subscription, a derived value does not compare projections at
//! all: any mutation invalidates it.
//!
//! # Invariants
//!
//! 1. `get()` never returns a value computed before the latest completed
//!    mutation of a source store.
//! 2. The compute function runs at most once per invalidation.
//! 3. Version increments by exactly 1 per recomputation.
//!
//! # Failure Modes
//!
//! - **Compute function panics**: the previous cached value is kept and the
//!   dirty flag stays set, so the next `get()` retries.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use recstore_core::Record;

use super::store::{Store, Subscription};

/// Shared interior for [`Derived<T>`].
struct DerivedInner<T> {
    compute: Box<dyn Fn() -> T>,
    /// None only before the first computation.
    cached: Option<T>,
    dirty: Cell<bool>,
    version: u64,
    /// Tracked stores and their versions at the last computation.
    sources: Vec<(Store, u64)>,
    /// Keeps the store callbacks alive; never read.
    _subscriptions: Vec<Subscription>,
}

/// A lazily evaluated, memoized projection of one or more stores.
///
/// Cloning a `Derived` creates a new handle to the **same** cache.
pub struct Derived<T> {
    inner: Rc<RefCell<DerivedInner<T>>>,
}

impl<T> Clone for Derived<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Derived<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Derived")
            .field("cached", &inner.cached)
            .field("dirty", &inner.dirty.get())
            .field("version", &inner.version)
            .finish()
    }
}

impl<T: Clone + 'static> Derived<T> {
    /// Derive a value from a single store.
    pub fn new(source: &Store, map: impl Fn(&Record) -> T + 'static) -> Self {
        let handle = source.clone();
        let derived = Self::from_fn(move || map(&handle.snapshot()), Vec::new());
        derived.track(source);
        derived
    }

    /// Derive a value from two stores.
    pub fn from2(a: &Store, b: &Store, map: impl Fn(&Record, &Record) -> T + 'static) -> Self {
        let (ha, hb) = (a.clone(), b.clone());
        let derived = Self::from_fn(move || map(&ha.snapshot(), &hb.snapshot()), Vec::new());
        derived.track(a);
        derived.track(b);
        derived
    }

    /// Low-level constructor: the caller owns dependency wiring and calls
    /// [`invalidate`](Self::invalidate) as needed.
    pub fn from_fn(compute: impl Fn() -> T + 'static, subscriptions: Vec<Subscription>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(DerivedInner {
                compute: Box::new(compute),
                cached: None,
                dirty: Cell::new(true),
                version: 0,
                sources: Vec::new(),
                _subscriptions: subscriptions,
            })),
        }
    }

    /// Current value, recomputed first if dirty.
    #[must_use]
    pub fn get(&self) -> T {
        self.with(T::clone)
    }

    /// Access the current value by reference, recomputing first if dirty.
    ///
    /// # Panics
    ///
    /// Panics if `f` re-enters this same `Derived`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.refresh();
        let inner = self.inner.borrow();
        match inner.cached.as_ref() {
            Some(value) => f(value),
            None => unreachable!("refresh always fills the cache"),
        }
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        let inner = self.inner.borrow();
        inner.dirty.get() || inner.sources_moved()
    }

    /// Force the next `get()` to recompute.
    pub fn invalidate(&self) {
        self.inner.borrow().dirty.set(true);
    }

    /// Number of recomputations so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    fn refresh(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.dirty.get() || inner.cached.is_none() || inner.sources_moved() {
            let value = (inner.compute)();
            inner.cached = Some(value);
            inner.dirty.set(false);
            inner.version += 1;
            for (store, seen) in &mut inner.sources {
                *seen = store.version();
            }
        }
    }

    fn track(&self, source: &Store) {
        let weak = Rc::downgrade(&self.inner);
        let sub = source.listen(move |_, _| {
            if let Some(strong) = weak.upgrade() {
                let inner = strong.borrow();
                if inner.sources_moved() {
                    inner.dirty.set(true);
                }
            }
        });
        let mut inner = self.inner.borrow_mut();
        inner._subscriptions.push(sub);
        inner.sources.push((source.clone(), source.version()));
    }
}

impl<T> DerivedInner<T> {
    fn sources_moved(&self) -> bool {
        self.sources
            .iter()
            .any(|(store, seen)| store.version() != *seen)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
