#![forbid(unsafe_code)]

//! Typed stores used by the demo: a two-field user form and a counter.

use recstore_core::Record;
use recstore_runtime::Store;

/// `{name, age}` form state. Both fields are text, as typed into an input.
#[derive(Debug, Clone)]
pub struct UserStore {
    store: Store,
}

impl UserStore {
    pub const NAME: &'static str = "name";
    pub const AGE: &'static str = "age";

    /// `{name: "", age: ""}`.
    #[must_use]
    pub fn blank() -> Record {
        Record::builder()
            .field(Self::NAME, "")
            .field(Self::AGE, "")
            .build()
    }

    #[must_use]
    pub fn new() -> Self {
        Self::with_initial(Self::blank())
    }

    /// Seed the store with `overrides` laid over the blank form. Extra fields
    /// are kept after `name` and `age`.
    #[must_use]
    pub fn with_initial(overrides: Record) -> Self {
        let initial = Self::blank().merged(
            overrides
                .iter()
                .map(|field| (field.name().to_owned(), (**field.value()).clone())),
        );
        Self {
            store: Store::new(initial),
        }
    }

    pub fn set_name(&self, name: &str) {
        self.store.set_field(Self::NAME, name);
    }

    pub fn set_age(&self, age: &str) {
        self.store.set_field(Self::AGE, age);
    }

    pub fn reset(&self) {
        self.store.reset();
    }

    #[must_use]
    pub fn name(&self) -> String {
        self.text(Self::NAME)
    }

    #[must_use]
    pub fn age(&self) -> String {
        self.text(Self::AGE)
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    fn text(&self, field: &str) -> String {
        self.store
            .select(|r| r.value(field).map(ToString::to_string))
            .unwrap_or_default()
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

/// `{count}` counter state.
#[derive(Debug, Clone)]
pub struct CounterStore {
    store: Store,
}

impl CounterStore {
    pub const COUNT: &'static str = "count";

    #[must_use]
    pub fn new() -> Self {
        Self {
            store: Store::new(Record::from_fields([(Self::COUNT, 0)])),
        }
    }

    pub fn increment(&self) {
        self.step(1);
    }

    pub fn decrement(&self) {
        self.step(-1);
    }

    #[must_use]
    pub fn count(&self) -> i64 {
        self.store
            .select(|r| r.int(Self::COUNT))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    fn step(&self, delta: i64) {
        self.store.update(|r| {
            let count = r.int(Self::COUNT).unwrap_or_default();
            r.with_field(Self::COUNT, count.saturating_add(delta))
        });
    }
}

impl Default for CounterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_store_setters_and_reset() {
        let user = UserStore::new();
        user.set_name("Alice");
        user.set_age("30");
        assert_eq!(user.name(), "Alice");
        assert_eq!(user.age(), "30");

        user.reset();
        assert_eq!(user.name(), "");
        assert_eq!(user.age(), "");
        assert_eq!(user.store().version(), 3);
    }

    #[test]
    fn user_store_initial_overrides() {
        let seed = Record::from_fields([("age", "41"), ("email", "a@b.c")]);
        let user = UserStore::with_initial(seed);

        assert_eq!(user.age(), "41");
        assert_eq!(
            user.store().snapshot().names().collect::<Vec<_>>(),
            ["name", "age", "email"]
        );

        user.set_age("42");
        user.reset();
        assert_eq!(user.age(), "41");
    }

    #[test]
    fn numeric_seed_reads_as_text() {
        let user = UserStore::with_initial(Record::from_fields([("age", 30)]));
        assert_eq!(user.age(), "30");
    }

    #[test]
    fn counter_steps() {
        let counter = CounterStore::new();
        counter.increment();
        counter.increment();
        counter.decrement();
        assert_eq!(counter.count(), 1);
        assert_eq!(counter.store().version(), 3);
    }
}
