//! `luigi` — expand `%{key | filter}` templates from the command line.
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use luigi::{Cache, FilterRegistry, Template};
use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};
use tracing_subscriber::EnvFilter;

mod render;
mod sources;
mod transaction;
mod util;
mod vars;

#[derive(Parser)]
#[command(name = "luigi", about = "Pipe-style string templates")]
struct Cli {
    /// Log at debug level (overridden by LUIGI_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Args)]
struct RowArgs {
    /// TOML file of template variables; tables flatten to `table_key`
    #[arg(long = "vars", value_name = "FILE")]
    vars: Vec<PathBuf>,

    /// Set a single variable, overriding files
    #[arg(long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Expand one template file (`-` for stdin) to stdout
    Expand {
        file: PathBuf,
        #[command(flatten)]
        row: RowArgs,
    },

    /// Run a named template from a TOML file of templates
    Run {
        key: String,
        #[arg(long, value_name = "FILE")]
        templates: PathBuf,
        #[command(flatten)]
        row: RowArgs,
    },

    /// Render every *.tpl under a directory into an output directory
    Render {
        templates_dir: PathBuf,
        out_dir: PathBuf,
        /// Directory whose templates replace same-named defaults
        #[arg(long)]
        user_templates: Option<PathBuf>,
        #[command(flatten)]
        row: RowArgs,
    },

    /// Parse templates and report their keys and unknown filters
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.cmd {
        Cmd::Expand { file, row } => {
            let row = vars::build_row(&row.vars, &row.set)?;
            let template = Template::new(read_source(&file)?)
                .with_context(|| format!("parse {}", file.display()))?;
            template
                .write_to(&row, &mut io::stdout().lock())
                .with_context(|| format!("expand {}", file.display()))
        }

        Cmd::Run {
            key,
            templates,
            row,
        } => {
            let row = vars::build_row(&row.vars, &row.set)?;
            let cache = Cache::new(sources::load(&templates)?);
            let out = cache.run(&key, &row).with_context(|| format!("run {key}"))?;
            print!("{out}");
            Ok(())
        }

        Cmd::Render {
            templates_dir,
            out_dir,
            user_templates,
            row,
        } => {
            let row = vars::build_row(&row.vars, &row.set)?;
            let written =
                render::render_all(&templates_dir, user_templates.as_deref(), &out_dir, &row)?;
            tracing::info!(written, out = %out_dir.display(), "rendered templates");
            Ok(())
        }

        Cmd::Check { files } => cmd_check(&files),
    }
}

/// Logs go to stderr; stdout carries template output only.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("LUIGI_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).context("read stdin")?;
        return Ok(buf);
    }
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

fn cmd_check(files: &[PathBuf]) -> Result<()> {
    let filters = FilterRegistry::builtin();
    let mut failures = 0;

    for file in files {
        let template = Template::new(read_source(file)?)
            .with_context(|| format!("parse {}", file.display()))?;

        println!("{}: keys: {}", file.display(), template.keys().join(", "));

        let unknown: Vec<&str> = template
            .filter_names()
            .into_iter()
            .filter(|name| !filters.contains(name))
            .collect();
        if !unknown.is_empty() {
            failures += 1;
            println!("{}: unknown filters: {}", file.display(), unknown.join(", "));
        }
    }

    anyhow::ensure!(failures == 0, "{failures} template(s) use unknown filters");
    Ok(())
}
