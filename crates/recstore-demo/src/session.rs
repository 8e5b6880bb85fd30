#![forbid(unsafe_code)]

//! A demo session: stores, mounted views, and a transcript.
//!
//! Views are mounted (rendered once) when the session starts. After each
//! command, every view whose binding requested a redraw renders exactly once,
//! in mount order.

use serde::Serialize;

use recstore_core::Record;

use crate::script::Command;
use crate::stores::{CounterStore, UserStore};
use crate::views::{CounterView, FieldInput, UserCard, View};

/// Per-view render count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewRenders {
    pub view: &'static str,
    pub renders: u64,
}

/// Outcome of a session, printable as text or JSON.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub commands: usize,
    pub renders: Vec<ViewRenders>,
    pub user: Record,
    pub user_version: u64,
    pub counter: Record,
    pub counter_version: u64,
    pub transcript: Vec<String>,
}

impl SessionReport {
    /// Render count for `view`, if mounted.
    #[must_use]
    pub fn renders_of(&self, view: &str) -> Option<u64> {
        self.renders
            .iter()
            .find(|r| r.view == view)
            .map(|r| r.renders)
    }
}

pub struct Session {
    user: UserStore,
    counter: CounterStore,
    views: Vec<Box<dyn View>>,
    commands: usize,
    transcript: Vec<String>,
}

impl Session {
    /// Mount the demo views over `user` and `counter`.
    #[must_use]
    pub fn new(user: UserStore, counter: CounterStore) -> Self {
        let views: Vec<Box<dyn View>> = vec![
            Box::new(FieldInput::name_input(&user)),
            Box::new(FieldInput::age_input(&user)),
            Box::new(UserCard::new(&user)),
            Box::new(CounterView::new(&counter)),
        ];
        let mut session = Self {
            user,
            counter,
            views,
            commands: 0,
            transcript: Vec::new(),
        };
        session.mount();
        session
    }

    fn mount(&mut self) {
        self.transcript.push("mount".to_owned());
        for view in &mut self.views {
            let line = view.render();
            self.transcript.push(format!("  {line}"));
        }
    }

    /// Apply one command, then redraw the views that asked for it.
    pub fn apply(&mut self, command: &Command) {
        self.commands += 1;
        self.transcript.push(format!("> {}", describe(command)));
        tracing::debug!(message = "session.command", command = ?command);

        match command {
            Command::SetName(name) => self.user.set_name(name),
            Command::SetAge(age) => self.user.set_age(age),
            Command::Set { field, value } => self.user.store().set_field(field, value.as_str()),
            Command::Reset => self.user.reset(),
            Command::Increment => self.counter.increment(),
            Command::Decrement => self.counter.decrement(),
            Command::Show => {
                self.transcript
                    .push(format!("  user    {}", self.user.store().snapshot()));
                self.transcript
                    .push(format!("  counter {}", self.counter.store().snapshot()));
            }
        }

        self.redraw();
    }

    pub fn run<'a>(&mut self, commands: impl IntoIterator<Item = &'a Command>) {
        for command in commands {
            self.apply(command);
        }
    }

    fn redraw(&mut self) {
        for view in &mut self.views {
            if view.take_redraw() {
                let line = view.render();
                self.transcript.push(format!("  {line}"));
            }
        }
    }

    #[must_use]
    pub fn user(&self) -> &UserStore {
        &self.user
    }

    #[must_use]
    pub fn counter(&self) -> &CounterStore {
        &self.counter
    }

    #[must_use]
    pub fn report(&self) -> SessionReport {
        SessionReport {
            commands: self.commands,
            renders: self
                .views
                .iter()
                .map(|v| ViewRenders {
                    view: v.name(),
                    renders: v.renders(),
                })
                .collect(),
            user: self.user.store().snapshot(),
            user_version: self.user.store().version(),
            counter: self.counter.store().snapshot(),
            counter_version: self.counter.store().version(),
            transcript: self.transcript.clone(),
        }
    }
}

fn describe(command: &Command) -> String {
    match command {
        Command::SetName(v) => format!("name {v}"),
        Command::SetAge(v) => format!("age {v}"),
        Command::Set { field, value } => format!("set {field} {value}"),
        Command::Reset => "reset".to_owned(),
        Command::Increment => "inc".to_owned(),
        Command::Decrement => "dec".to_owned(),
        Command::Show => "show".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{DEMO_SCRIPT, parse};

    fn session() -> Session {
        Session::new(UserStore::new(), CounterStore::new())
    }

    #[test]
    fn mount_renders_every_view_once() {
        let report = session().report();
        assert_eq!(report.commands, 0);
        assert!(report.renders.iter().all(|r| r.renders == 1));
        assert_eq!(report.renders.len(), 4);
    }

    #[test]
    fn name_write_rerenders_name_and_card_only() {
        let mut s = session();
        s.apply(&Command::SetName("Alice".into()));
        let report = s.report();

        assert_eq!(report.renders_of("NameInput"), Some(2));
        assert_eq!(report.renders_of("AgeInput"), Some(1));
        assert_eq!(report.renders_of("UserCard"), Some(2));
        assert_eq!(report.renders_of("CounterView"), Some(1));
    }

    #[test]
    fn counter_does_not_touch_user_views() {
        let mut s = session();
        s.apply(&Command::Increment);
        s.apply(&Command::Increment);
        let report = s.report();

        assert_eq!(report.renders_of("CounterView"), Some(3));
        assert_eq!(report.renders_of("UserCard"), Some(1));
        assert_eq!(s.counter().count(), 2);
    }

    #[test]
    fn show_renders_nothing() {
        let mut s = session();
        s.apply(&Command::Show);
        let report = s.report();
        assert!(report.renders.iter().all(|r| r.renders == 1));
        assert!(report.transcript.iter().any(|l| l.contains("user    {")));
    }

    #[test]
    fn demo_script_render_counts() {
        let mut s = session();
        s.run(&parse(DEMO_SCRIPT).unwrap());
        let report = s.report();

        // mount + 3 name writes + reset
        assert_eq!(report.renders_of("NameInput"), Some(5));
        // mount + 2 age writes + reset
        assert_eq!(report.renders_of("AgeInput"), Some(4));
        // mount + every user mutation (3 name, 2 age, 1 set, 1 reset)
        assert_eq!(report.renders_of("UserCard"), Some(8));
        // mount + inc, inc, dec
        assert_eq!(report.renders_of("CounterView"), Some(4));

        assert_eq!(report.user, UserStore::blank());
        assert_eq!(report.user_version, 7);
        assert_eq!(report.counter.int("count"), Some(1));
        assert_eq!(report.commands, 12);
    }

    #[test]
    fn report_serializes() {
        let mut s = session();
        s.apply(&Command::SetAge("30".into()));
        let json = serde_json::to_value(s.report()).unwrap();
        assert_eq!(json["user"]["age"], "30");
        assert_eq!(json["renders"][1]["view"], "AgeInput");
        assert_eq!(json["renders"][1]["renders"], 2);
    }
}
