use clap::Args;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use typemux_common::Format;
use typemux_core::generate;

use crate::cli::run_cli;
use crate::output::{output_files, unified_diff};
use crate::project::{load_project, load_schema};

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(
        long = "schema",
        short = 's',
        value_name = "SCHEMA",
        help = "Path to the schema IR document (.json, .yaml or .yml)"
    )]
    pub schema: PathBuf,
    #[arg(
        long = "format",
        short = 'f',
        value_name = "FORMAT",
        help = "Format to generate (graphql, protobuf, openapi, go). Repeatable; defaults to the config's formats, else all"
    )]
    pub formats: Vec<Format>,
    #[arg(
        long = "out",
        short = 'o',
        value_name = "DIR",
        help = "Output directory. Defaults to output.directory from the config, else the schema's directory"
    )]
    pub out: Option<PathBuf>,
    #[arg(
        long = "config",
        value_name = "CONFIG",
        help = "Path to a TOML config. Defaults to typemux.toml next to the schema"
    )]
    pub config: Option<PathBuf>,
    #[arg(
        long = "check",
        help = "Do not write files; fail if any generated file differs from the one on disk"
    )]
    pub check: bool,
}

pub fn run(args: GenerateArgs) -> i32 {
    run_cli(|| run_inner(args))
}

fn run_inner(args: GenerateArgs) -> Result<(), String> {
    let schema = load_schema(&args.schema)?;
    let project = load_project(args.config.as_deref(), &args.schema)?;
    let formats = project.formats(&args.formats);
    let out_dir = project.output_dir(args.out.as_deref());

    let outputs = generate(&schema, &formats, &project.config.generator)
        .map_err(|e| format!("Failed to lower schema: {e}"))?;

    let mut failures = Vec::new();
    let mut stale = 0usize;
    for (format, result) in &outputs {
        let rendered = match result {
            Ok(rendered) => rendered,
            Err(e) => {
                failures.push(format!("Failed to generate {format}: {e}"));
                continue;
            }
        };

        for file in output_files(*format, rendered, &project.config.output) {
            let path = out_dir.join(&file.rel_path);
            let rel = file.rel_path.display().to_string();

            if args.check {
                let existing = read_existing(&path)?;
                if let Some(diff) = unified_diff(&rel, &existing, file.contents) {
                    println!("{diff}");
                    stale += 1;
                } else {
                    debug!(path = %path.display(), "up to date");
                }
                continue;
            }

            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
            }
            fs::write(&path, file.contents)
                .map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
            info!(format = %format, path = %path.display(), bytes = file.contents.len(), "wrote file");
            println!("Generated {}", path.display());
        }
    }

    if stale > 0 {
        failures.push(format!("{stale} generated file(s) are out of date"));
    }
    if failures.is_empty() {
        Ok(())
    } else {
        Err(failures.join("\n"))
    }
}

/// Current contents of a generated file; a missing file reads as empty.
fn read_existing(path: &Path) -> Result<String, String> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(contents),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(format!("Failed to read {}: {e}", path.display())),
    }
}
