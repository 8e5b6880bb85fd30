#![forbid(unsafe_code)]

//! Demo views.
//!
//! Each view owns a [`Binding`] and renders a single line of text. Rendering
//! is the view's job; the binding only says whether a redraw is due.

use std::rc::Rc;

use recstore_core::{Record, Value};
use recstore_runtime::Binding;
use recstore_runtime::reactive::selector::field;

use crate::stores::{CounterStore, UserStore};

/// A line-rendering view driven by a store binding.
pub trait View {
    /// Stable name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Consume the binding's pending redraw request.
    fn take_redraw(&self) -> bool;

    /// Produce the view's output. Counts as one render.
    fn render(&mut self) -> String;

    /// Renders so far, including the initial mount.
    fn renders(&self) -> u64;
}

fn text_of(value: Option<&Rc<Value>>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn log_render(view: &'static str, render: u64) {
    tracing::info!(message = "view.render", view, render);
}

/// Text input bound to a single user field.
pub struct FieldInput {
    name: &'static str,
    label: &'static str,
    binding: Binding<Option<Rc<Value>>>,
    renders: u64,
}

impl FieldInput {
    /// The `name` input.
    #[must_use]
    pub fn name_input(user: &UserStore) -> Self {
        Self::new("NameInput", UserStore::NAME, user)
    }

    /// The `age` input.
    #[must_use]
    pub fn age_input(user: &UserStore) -> Self {
        Self::new("AgeInput", UserStore::AGE, user)
    }

    fn new(name: &'static str, label: &'static str, user: &UserStore) -> Self {
        Self {
            name,
            label,
            binding: Binding::new(user.store(), field(label)),
            renders: 0,
        }
    }
}

impl View for FieldInput {
    fn name(&self) -> &'static str {
        self.name
    }

    fn take_redraw(&self) -> bool {
        self.binding.take_redraw()
    }

    fn render(&mut self) -> String {
        self.renders += 1;
        log_render(self.name, self.renders);
        let value = self.binding.with(|v| text_of(v.as_ref()));
        format!("[{}] {}={value:?}", self.name, self.label)
    }

    fn renders(&self) -> u64 {
        self.renders
    }
}

/// The composite the card selects: rebuilt on every selector call.
#[derive(Debug)]
pub struct CardModel {
    pub name: String,
    pub age: String,
}

/// Summary card selecting a freshly built [`CardModel`].
///
/// Because the model is a new allocation each time, identity comparison
/// never sees it as unchanged and the card re-renders on every user
/// mutation, including writes to fields it does not display.
pub struct UserCard {
    binding: Binding<Rc<CardModel>>,
    renders: u64,
}

impl UserCard {
    #[must_use]
    pub fn new(user: &UserStore) -> Self {
        Self {
            binding: Binding::new(user.store(), |r: &Record| {
                Rc::new(CardModel {
                    name: text_of(r.get(UserStore::NAME)),
                    age: text_of(r.get(UserStore::AGE)),
                })
            }),
            renders: 0,
        }
    }
}

impl View for UserCard {
    fn name(&self) -> &'static str {
        "UserCard"
    }

    fn take_redraw(&self) -> bool {
        self.binding.take_redraw()
    }

    fn render(&mut self) -> String {
        self.renders += 1;
        log_render(self.name(), self.renders);
        let model = self.binding.get();
        format!("[UserCard] {:?} aged {:?}", model.name, model.age)
    }

    fn renders(&self) -> u64 {
        self.renders
    }
}

/// Counter display.
pub struct CounterView {
    binding: Binding<Option<Rc<Value>>>,
    renders: u64,
}

impl CounterView {
    #[must_use]
    pub fn new(counter: &CounterStore) -> Self {
        Self {
            binding: Binding::new(counter.store(), field(CounterStore::COUNT)),
            renders: 0,
        }
    }
}

impl View for CounterView {
    fn name(&self) -> &'static str {
        "CounterView"
    }

    fn take_redraw(&self) -> bool {
        self.binding.take_redraw()
    }

    fn render(&mut self) -> String {
        self.renders += 1;
        log_render(self.name(), self.renders);
        let count = self.binding.with(|v| text_of(v.as_ref()));
        format!("[CounterView] count={count}")
    }

    fn renders(&self) -> u64 {
        self.renders
    }
}
