#![forbid(unsafe_code)]

//! recstore public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for users.
//!
//! ```
//! use recstore::prelude::*;
//!
//! let store = Store::new(Record::builder().field("name", "").field("age", "").build());
//! let name = Binding::new(&store, selector::field("name"));
//! let age = Binding::new(&store, selector::field("age"));
//!
//! store.set_field("name", "Alice");
//!
//! assert!(name.take_redraw());
//! assert!(!age.take_redraw());
//! ```

pub use recstore_core as record;
pub use recstore_runtime as runtime;

pub mod prelude {
    pub use recstore_core::{Record, RecordError, Value};
    pub use recstore_runtime::reactive::selector;
    pub use recstore_runtime::{Binding, Compare, Derived, Identity, Store, Subscription};
}
