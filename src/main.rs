use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueHint};
use search_tree::export::{self, DEFAULT_EXPORT_PATH};
use search_tree::session::Session;
use search_tree::Tree;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Insert, search, delete, list, and export values kept in a binary search tree.
///
/// Commands come from the positional arguments, from --script, or else from stdin, one per line:
/// `insert <v>`, `search <v>`, `delete <v>`, `list`, `export [path]`.
#[derive(Parser, Debug)]
#[command(name = "search_tree")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Preload the tree from a dump with one value per line
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    load: Option<PathBuf>,

    /// Compare values as integers instead of as text
    #[arg(short, long)]
    numeric: bool,

    /// Read commands from this file
    #[arg(short, long, value_hint = ValueHint::FilePath, conflicts_with = "commands")]
    script: Option<PathBuf>,

    /// Where `export` without a path writes to
    #[arg(short, long, default_value = DEFAULT_EXPORT_PATH, value_hint = ValueHint::FilePath)]
    export_path: PathBuf,

    /// Report failed commands and carry on instead of stopping
    #[arg(short, long)]
    keep_going: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Commands to run, e.g. "insert 5" "list"
    commands: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let result = if cli.numeric {
        run::<i64>(&cli)
    } else {
        run::<String>(&cli)
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

/// Logs go to stderr so they never mix with command output. `RUST_LOG` overrides `-v`.
fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run<T>(cli: &Cli) -> Result<()>
where
    T: Ord + FromStr + Display,
    T::Err: Display,
{
    let tree = match &cli.load {
        Some(path) => export::import_from_file::<T>(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => Tree::new(),
    };
    let mut session = Session::with_tree(tree).export_path(&cli.export_path);
    let output = io::stdout().lock();

    let applied = if let Some(script) = &cli.script {
        let file = File::open(script)
            .with_context(|| format!("Failed to open script {}", script.display()))?;
        session
            .run(BufReader::new(file), output, cli.keep_going)
            .with_context(|| format!("Script {} failed", script.display()))?
    } else if !cli.commands.is_empty() {
        let commands = cli.commands.join("\n");
        session.run(commands.as_bytes(), output, cli.keep_going)?
    } else {
        session.run(io::stdin().lock(), output, cli.keep_going)?
    };

    info!(applied, size = session.tree().len(), "session finished");
    Ok(())
}
