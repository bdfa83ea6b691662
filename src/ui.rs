// UI layer: runs one rename pass and prints human-readable status lines.
// Interactive prompts use `dialoguer`; a spinner from `indicatif` is shown
// on stderr while the service is thinking.

use anyhow::Result;
use dialoguer::{Confirm, Password};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::key::KeyPrompt;
use crate::rename::apply;
use crate::scan::scan;
use crate::suggest::Suggester;

/// Asks for the API key on the terminal.
pub struct TerminalPrompt;

impl KeyPrompt for TerminalPrompt {
    fn ask_key(&self) -> Result<String> {
        // `Password` hides the key while it is typed.
        let key = Password::new()
            .with_prompt("Enter your OpenAI API key")
            .allow_empty_password(true)
            .interact()?;
        Ok(key)
    }

    fn confirm_save(&self, path: &Path) -> Result<bool> {
        let save = Confirm::new()
            .with_prompt(format!("Save this key to {} for future use?", path.display()))
            .default(false)
            .interact()?;
        Ok(save)
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Scan `base_paths`, ask `suggester` for new names and apply them,
/// writing one status line per event to `out`.
///
/// Only a failing suggester (or a broken `out`) makes this return an
/// error, and in that case nothing has been renamed yet.
pub fn run<P: AsRef<Path>>(
    base_paths: &[P],
    dry_run: bool,
    suggester: &impl Suggester,
    out: &mut impl Write,
) -> Result<()> {
    let scanned = scan(base_paths);
    for skipped in &scanned.skipped {
        writeln!(out, "Skipping: {} (not a directory)", skipped.display())?;
    }
    for odd in &scanned.non_utf8 {
        writeln!(out, "Skipping: {} (name is not valid UTF-8)", odd.display())?;
    }
    if scanned.entries.is_empty() {
        writeln!(out, "No valid directories found.")?;
        return Ok(());
    }

    let names = scanned.names();
    debug!(?names, "requesting rename suggestions");

    let progress = spinner("Asking for new names...");
    let suggested = suggester.suggest(&names);
    progress.finish_and_clear();
    let pairs = suggested?;

    for outcome in apply(&scanned.entries, &pairs, dry_run) {
        writeln!(out, "{outcome}")?;
    }
    Ok(())
}
