#![forbid(unsafe_code)]

//! View bindings: the consumer side of a selector subscription.
//!
//! A view owns one [`Binding`] per selector it reads. The binding keeps the
//! last observed projection and raises a redraw request whenever the store
//! reports a change; the view decides when to act on it via
//! [`take_redraw`](Binding::take_redraw). Nothing is scheduled here.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use recstore_core::Record;

use super::selector::{Compare, Identity};
use super::store::{Store, Subscription};

type Hook<P> = Rc<dyn Fn(&P)>;

struct Shared<P> {
    current: RefCell<P>,
    redraw: Cell<bool>,
    changes: Cell<u64>,
    hook: RefCell<Option<Hook<P>>>,
}

/// A view's live view of one selector over a [`Store`].
///
/// Dropping the binding releases its subscription.
pub struct Binding<P> {
    shared: Rc<Shared<P>>,
    _subscription: Subscription,
}

impl<P: Clone + 'static> Binding<P> {
    /// Bind with the default reference-identity rule.
    pub fn new(store: &Store, selector: impl Fn(&Record) -> P + 'static) -> Self
    where
        P: Identity,
    {
        Self::with_compare(store, selector, Compare::identity())
    }

    /// Bind with an explicit comparison rule.
    pub fn with_compare(
        store: &Store,
        selector: impl Fn(&Record) -> P + 'static,
        compare: Compare<P>,
    ) -> Self {
        let shared = Rc::new(Shared {
            current: RefCell::new(store.select(&selector)),
            redraw: Cell::new(false),
            changes: Cell::new(0),
            hook: RefCell::new(None),
        });

        let weak = Rc::downgrade(&shared);
        let subscription = store.subscribe_with(selector, compare, move |next: &P| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            *shared.current.borrow_mut() = next.clone();
            shared.redraw.set(true);
            shared.changes.set(shared.changes.get() + 1);
            let hook = shared.hook.borrow().clone();
            if let Some(hook) = hook {
                hook(next);
            }
        });

        Self {
            shared,
            _subscription: subscription,
        }
    }

    /// The last projection delivered by the store.
    #[must_use]
    pub fn get(&self) -> P {
        self.shared.current.borrow().clone()
    }

    /// Run `f` on a copy of the last projection; `f` may mutate the store.
    pub fn with<R>(&self, f: impl FnOnce(&P) -> R) -> R {
        let current = self.get();
        f(&current)
    }

    /// Install a hook run synchronously on each change, after the binding has
    /// recorded the new value. Replaces any previous hook.
    pub fn on_change(&self, hook: impl Fn(&P) + 'static) {
        *self.shared.hook.borrow_mut() = Some(Rc::new(hook));
    }

    #[must_use]
    pub fn needs_redraw(&self) -> bool {
        self.shared.redraw.get()
    }

    /// Consume the pending redraw request.
    pub fn take_redraw(&self) -> bool {
        self.shared.redraw.replace(false)
    }

    /// Changes delivered since the binding was created.
    #[must_use]
    pub fn change_count(&self) -> u64 {
        self.shared.changes.get()
    }

    /// Release the subscription explicitly.
    pub fn unbind(self) {
        drop(self);
    }
}

impl<P: fmt::Debug> fmt::Debug for Binding<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("current", &self.shared.current.borrow())
            .field("redraw", &self.shared.redraw.get())
            .field("changes", &self.shared.changes.get())
            .finish()
    }
}
