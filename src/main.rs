use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pagedb::common::TABLE_MAX_PAGES;
use pagedb::frontend::Repl;
use pagedb::{Table, TableConfig};

#[derive(Parser, Debug)]
#[command(version, about = "A single-table B-tree row store with a line-oriented shell")]
struct Cli {
    /// Path to the table file, created if it does not exist
    db_file: PathBuf,

    /// Upper bound on the number of pages the table file may grow to
    #[arg(long, default_value_t = TABLE_MAX_PAGES)]
    max_pages: usize,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> pagedb::Result<()> {
    let config = TableConfig::default().with_max_pages(cli.max_pages);
    let table = Table::open_with_config(&cli.db_file, config)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    Repl::new(table, stdin.lock(), stdout.lock()).run()
}
