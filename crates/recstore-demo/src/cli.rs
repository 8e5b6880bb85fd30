#![forbid(unsafe_code)]

//! Command-line interface for the demo.
//!
//! Every global option has a `RECSTORE_DEMO_*` environment override; explicit
//! flags win over the environment.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

use recstore_core::Record;

use crate::error::Result;
use crate::logging;
use crate::script::{self, DEMO_SCRIPT};
use crate::session::{Session, SessionReport};
use crate::stores::{CounterStore, UserStore};

#[derive(Debug, Parser)]
#[command(
    name = "recstore-demo",
    about = "Replay store scripts against bound views and report every re-render",
    version
)]
pub struct Cli {
    /// Default tracing filter when RUST_LOG is unset.
    #[arg(long, env = "RECSTORE_DEMO_LOG", default_value = "warn", global = true)]
    pub log: String,

    /// Output format.
    #[arg(
        long,
        env = "RECSTORE_DEMO_FORMAT",
        value_enum,
        default_value_t = OutputFormat::Text,
        global = true
    )]
    pub format: OutputFormat,

    /// JSON object seeding the user store, laid over `{name: "", age: ""}`.
    #[arg(long, env = "RECSTORE_DEMO_INITIAL", global = true)]
    pub initial: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a script file, or stdin when no file is given.
    Run {
        script: Option<PathBuf>,
    },

    /// Run the built-in walkthrough.
    Demo,

    /// Print the built-in walkthrough script.
    #[command(name = "print-demo")]
    PrintDemo,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    run(cli, &mut stdin.lock(), &mut stdout.lock())
}

/// Execute `cli`, reading a script from `input` when needed.
pub fn run(cli: Cli, input: &mut dyn BufRead, out: &mut dyn Write) -> Result<()> {
    let source = match &cli.command {
        Commands::PrintDemo => {
            out.write_all(DEMO_SCRIPT.as_bytes())?;
            return Ok(());
        }
        Commands::Demo => DEMO_SCRIPT.to_owned(),
        Commands::Run { script: Some(path) } => fs::read_to_string(path)?,
        Commands::Run { script: None } => {
            let mut buf = String::new();
            input.read_to_string(&mut buf)?;
            buf
        }
    };

    let commands = script::parse(&source)?;
    let user = match &cli.initial {
        Some(path) => UserStore::with_initial(load_initial(path)?),
        None => UserStore::new(),
    };

    let mut session = Session::new(user, CounterStore::new());
    session.run(&commands);
    let report = session.report();
    tracing::info!(
        message = "session.done",
        commands = report.commands,
        user_version = report.user_version,
        counter_version = report.counter_version
    );

    match cli.format {
        OutputFormat::Text => write_text(&report, out)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn load_initial(path: &Path) -> Result<Record> {
    let json = fs::read_to_string(path)?;
    Ok(Record::from_json_str(&json)?)
}

fn write_text(report: &SessionReport, out: &mut dyn Write) -> Result<()> {
    for line in &report.transcript {
        writeln!(out, "{line}")?;
    }
    writeln!(out)?;
    writeln!(out, "renders:")?;
    for r in &report.renders {
        writeln!(out, "  {:<12} {}", r.view, r.renders)?;
    }
    writeln!(out, "user    {} (v{})", report.user, report.user_version)?;
    writeln!(out, "counter {} (v{})", report.counter, report.counter_version)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args(args: &[&str], stdin: &str) -> Result<String> {
        let cli = Cli::try_parse_from(args).expect("valid args");
        let mut input = stdin.as_bytes();
        let mut out = Vec::new();
        run(cli, &mut input, &mut out)?;
        Ok(String::from_utf8(out).expect("utf8 output"))
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn run_reads_stdin() {
        let out = run_args(&["recstore-demo", "run"], "name Alice\n").unwrap();
        assert!(out.contains("> name Alice"));
        assert!(out.contains(r#"[NameInput] name="Alice""#));
        assert_eq!(out.matches("[AgeInput]").count(), 1);
    }

    #[test]
    fn json_format() {
        let out = run_args(
            &["recstore-demo", "--format", "json", "run"],
            "age 30\nage 30\n",
        )
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["user_version"], 2);
        assert_eq!(json["renders"][1]["view"], "AgeInput");
        assert_eq!(json["renders"][1]["renders"], 3);
    }

    #[test]
    fn print_demo_echoes_script() {
        let out = run_args(&["recstore-demo", "print-demo"], "").unwrap();
        assert_eq!(out, DEMO_SCRIPT);
    }

    #[test]
    fn script_errors_propagate() {
        let err = run_args(&["recstore-demo", "run"], "jump\n").unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn missing_initial_file_is_io_error() {
        let err = run_args(
            &["recstore-demo", "--initial", "/nonexistent/recstore.json", "demo"],
            "",
        )
        .unwrap_err();
        assert!(matches!(err, crate::DemoError::Io(_)));
        assert_eq!(err.exit_code(), 1);
    }
}
