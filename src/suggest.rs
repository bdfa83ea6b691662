// Suggestion layer: everything between "a list of directory names" and
// "a list of rename pairs". The network call itself lives in `api`; this
// module owns the prompt text and the strict parsing of the reply so both
// can be exercised without a service.

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

/// A proposed mapping from an original directory name to a new one.
/// On the wire this is a two-element JSON array `[original, proposed]`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "(String, String)")]
pub struct RenamePair {
    pub original: String,
    pub proposed: String,
}

#[cfg(test)]
impl RenamePair {
    pub fn new(original: impl Into<String>, proposed: impl Into<String>) -> Self {
        RenamePair {
            original: original.into(),
            proposed: proposed.into(),
        }
    }
}

impl From<(String, String)> for RenamePair {
    fn from((original, proposed): (String, String)) -> Self {
        RenamePair { original, proposed }
    }
}

/// Ways the service reply can be unusable. All of them abort the run.
#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("the service returned no message content")]
    MissingContent,
    #[error("the service returned an empty reply")]
    EmptyReply,
    #[error("the service reply is not a JSON list of [original, new] pairs")]
    MalformedReply(#[source] serde_json::Error),
}

/// Anything that can turn directory names into rename suggestions.
/// The real implementation asks a language model; tests use a stub.
pub trait Suggester {
    fn suggest(&self, names: &[String]) -> Result<Vec<RenamePair>>;
}

/// Build the single instruction sent to the service. The full list of
/// names is embedded as a pretty-printed JSON array.
pub fn build_prompt(names: &[String]) -> Result<String> {
    let listing = serde_json::to_string_pretty(names).context("Encoding directory names")?;
    Ok(format!(
        r#"This is a list of names of directories containing EPUB files.
The goal is to rename the directories into a standardized structure. Each
directory name normally contains a title and its author, along with unimportant
terms like epub or xpost or retail. Please extract the author and title from
each line, and return in structured JSON format instructions that my script can
use for renaming. The JSON should contain a list where each element is a list
with two elements, where the first element has the original directory name and
the second element has the form "Lastname - Title (year)", where "Lastname" is
the last name of the author.

Rules for the new name:
- If the title contains a colon, replace it with " - " (colons are not allowed
  in directory names).
- If the book has two authors, give both last names separated by a comma,
  e.g. "Lastname1, Lastname2 - Title (year)".
- If the book has more than two authors, give the first author's last name
  followed by "et al.", e.g. "Lastname1 et al. - Title (year)".

Example: if the single input is
"Jill_Lepore_-_These_Truths_-_A_History_of_The_United_States_(retail)_(epub)",
the JSON output should be:

  [
    [
      "Jill_Lepore_-_These_Truths_-_A_History_of_The_United_States_(retail)_(epub)",
      "Lepore - These Truths - A History of the United States (2018)"
    ]
  ]

Here 2018 is the year where the book was published. It is not in the
original string, but perhaps you know the information.

Here are the directory names: {listing}

Return only a JSON list of two-element lists without any extra text or markdown."#
    ))
}

/// Strictly parse the service reply. Surrounding whitespace is ignored;
/// anything else that is not exactly a JSON array of two-string arrays is
/// rejected.
pub fn parse_reply(text: &str) -> Result<Vec<RenamePair>, SuggestError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SuggestError::EmptyReply);
    }
    serde_json::from_str(trimmed).map_err(SuggestError::MalformedReply)
}
