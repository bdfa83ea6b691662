// Entrypoint for the CLI application.
// - Parses arguments and sets up logging.
// - Loads the API key, builds the client and hands everything to `ui::run`.

use clap::Parser;
use std::path::PathBuf;
use tracing::Level;

use epub_renamer::{api::ApiClient, key, ui};

/// Rename EPUB directories into a standardized "Lastname - Title (year)"
/// format using a language model.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// One or more directories containing EPUB folders
    #[arg(required = true)]
    directories: Vec<PathBuf>,
    /// Preview renaming without making changes
    #[arg(long)]
    dry_run: bool,
    /// Print debug output to stderr
    #[arg(long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let api_key = key::load_api_key(&key::key_file_path(), &ui::TerminalPrompt)?;
    let api = ApiClient::new(api_key)?;

    let stdout = std::io::stdout();
    ui::run(&cli.directories, cli.dry_run, &api, &mut stdout.lock())?;
    Ok(())
}
