// Key provider: the API key lives in a plain-text file in the user's home
// directory. When it is missing the user is asked for one and may choose
// to save it for next time.

use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const KEY_FILE_NAME: &str = ".gpt_apikey";

/// Interactive source for a key when no key file exists.
pub trait KeyPrompt {
    fn ask_key(&self) -> Result<String>;
    fn confirm_save(&self, path: &Path) -> Result<bool>;
}

/// Location of the key file, `~/.gpt_apikey`.
pub fn key_file_path() -> PathBuf {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.join(KEY_FILE_NAME)
}

/// Read the key file. `Ok(None)` means the file does not exist.
pub fn read_key_file(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(data) => Ok(Some(data.trim().to_string())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

/// Persist a key into the key file.
pub fn save_key_file(path: &Path, key: &str) -> Result<()> {
    std::fs::write(path, key).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Load the key from `path`, falling back to `prompt`. The key is not
/// validated.
pub fn load_api_key(path: &Path, prompt: &impl KeyPrompt) -> Result<String> {
    if let Some(key) = read_key_file(path)? {
        return Ok(key);
    }

    println!("API key file '{}' not found.", path.display());
    let key = prompt.ask_key()?.trim().to_string();
    if prompt.confirm_save(path)? {
        save_key_file(path, &key)?;
        println!("API key saved to {}", path.display());
    }
    Ok(key)
}
