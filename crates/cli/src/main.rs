#![forbid(unsafe_code)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

//! `typemux` command-line entry point.

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

mod cli;
mod output;
mod project;

#[derive(Parser)]
#[command(
    name = "typemux",
    version,
    about = "typemux renders one schema as GraphQL, Protobuf, OpenAPI and Go"
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error) or a full filter spec
    #[arg(long = "log-level", global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate output files for one or more formats
    Generate(cli::generate::GenerateArgs),
    /// Print the types synthesized by the lowering pass as JSON
    Lower(cli::lower::LowerArgs),
}

fn main() {
    std::process::exit(run_cli(std::env::args_os()));
}

fn run_cli<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => {
            init_tracing(cli.log_level.as_deref());
            match cli.command {
                Some(Commands::Generate(args)) => cli::generate::run(args),
                Some(Commands::Lower(args)) => cli::lower::run(args),
                None => {
                    let mut cmd = Cli::command();
                    let _ = cmd.print_help();
                    println!();
                    0
                }
            }
        }
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

fn init_tracing(level: Option<&str>) {
    // --log-level wins over TYPEMUX_LOG; both accept a plain level or a
    // full tracing filter spec like "typemux_core=debug"
    let filter = match level
        .map(str::to_string)
        .or_else(|| std::env::var("TYPEMUX_LOG").ok())
    {
        Some(level) if is_plain_level(&level) => {
            format!("typemux={level},typemux_core={level},typemux_common={level}")
        }
        Some(spec) => spec,
        None => "warn".to_string(),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}
