use clap::Args;
use std::path::PathBuf;
use typemux_core::lower;

use crate::cli::run_cli;
use crate::project::load_schema;

#[derive(Args, Debug, Clone)]
pub struct LowerArgs {
    #[arg(
        long = "schema",
        short = 's',
        value_name = "SCHEMA",
        help = "Path to the schema IR document (.json, .yaml or .yml)"
    )]
    pub schema: PathBuf,
}

pub fn run(args: LowerArgs) -> i32 {
    run_cli(|| {
        println!("{}", render(&args)?);
        Ok(())
    })
}

/// Synthesized types of the schema, as pretty JSON.
fn render(args: &LowerArgs) -> Result<String, String> {
    let schema = load_schema(&args.schema)?;
    let lowering = lower(&schema).map_err(|e| format!("Failed to lower schema: {e}"))?;
    serde_json::to_string_pretty(lowering.synthesized())
        .map_err(|e| format!("Failed to serialize lowering: {e}"))
}
