#![forbid(unsafe_code)]
#![cfg(feature = "tracing")]

//! Structured tracing events emitted by store mutations.

use std::sync::{Arc, Mutex};

use recstore_core::Record;
use recstore_runtime::Store;
use recstore_runtime::reactive::selector::field;
use tracing::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

#[derive(Default)]
struct Captured {
    messages: Vec<String>,
    delivered: Vec<u64>,
}

struct Capture {
    state: Arc<Mutex<Captured>>,
}

impl<S> Layer<S> for Capture
where
    S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        struct Fields {
            message: Option<String>,
            delivered: Option<u64>,
        }
        impl tracing::field::Visit for Fields {
            fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
                if field.name() == "message" {
                    self.message = Some(value.to_string());
                }
            }

            fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
                if field.name() == "delivered" {
                    self.delivered = Some(value);
                }
            }

            fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
                if field.name() == "message" {
                    self.message = Some(format!("{value:?}").trim_matches('"').to_string());
                }
            }
        }
        let mut fields = Fields {
            message: None,
            delivered: None,
        };
        event.record(&mut fields);

        let mut state = self.state.lock().expect("capture lock");
        if let Some(message) = fields.message {
            state.messages.push(message);
        }
        if let Some(delivered) = fields.delivered {
            state.delivered.push(delivered);
        }
    }
}

#[test]
fn set_and_notify_events_emitted() {
    let state = Arc::new(Mutex::new(Captured::default()));
    let subscriber = tracing_subscriber::registry().with(Capture {
        state: Arc::clone(&state),
    });
    let _guard = tracing::subscriber::set_default(subscriber);

    let store = Store::new(Record::builder().field("name", "").build());
    let _a = store.subscribe(field("name"), |_| {});
    let _b = store.listen(|_, _| {});

    store.set_field("name", "Alice");
    store.reset();

    let captured = state.lock().expect("capture lock");
    assert!(captured.messages.iter().any(|m| m == "store.set"), "expected store.set");
    assert!(captured.messages.iter().any(|m| m == "store.reset"), "expected store.reset");
    assert_eq!(
        captured.messages.iter().filter(|m| *m == "store.notify").count(),
        2
    );
    assert_eq!(captured.delivered, [2, 2]);
}

#[test]
fn nested_write_supersedes_outer_pass() {
    let state = Arc::new(Mutex::new(Captured::default()));
    let subscriber = tracing_subscriber::registry().with(Capture {
        state: Arc::clone(&state),
    });
    let _guard = tracing::subscriber::set_default(subscriber);

    let store = Store::new(Record::builder().field("name", "").build());
    let writer = store.clone();
    let _rename = store.listen(move |next, _| {
        if next.text("name") == Some("Alice") {
            writer.set_field("name", "Bob");
        }
    });
    let _tail = store.listen(|_, _| {});

    store.set_field("name", "Alice");

    assert_eq!(store.snapshot().text("name"), Some("Bob"));
    let captured = state.lock().expect("capture lock");
    assert_eq!(
        captured
            .messages
            .iter()
            .filter(|m| *m == "store.notify.superseded")
            .count(),
        1
    );
    // Inner pass reaches both listeners, then the outer pass stops after one.
    assert_eq!(captured.delivered, [2, 1]);
}

#[test]
fn bulk_mutators_emit_events() {
    let state = Arc::new(Mutex::new(Captured::default()));
    let subscriber = tracing_subscriber::registry().with(Capture {
        state: Arc::clone(&state),
    });
    let _guard = tracing::subscriber::set_default(subscriber);

    let store = Store::new(Record::builder().field("name", "").field("age", "").build());
    store.set_fields([("name", "Ann"), ("age", "30")]);
    store.update(|r| r.with_field("age", "31"));
    store.replace(Record::builder().field("name", "Bo").build());

    let captured = state.lock().expect("capture lock");
    for expected in ["store.set_fields", "store.update", "store.replace"] {
        assert!(
            captured.messages.iter().any(|m| m == expected),
            "expected {expected}"
        );
    }
    assert_eq!(
        captured.messages.iter().filter(|m| *m == "store.notify").count(),
        3
    );
}
