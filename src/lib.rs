// Library root
// -----------
// This crate exposes the pieces of the renamer so the binary stays thin
// and the rename logic can be tested without network access.
//
// Module responsibilities:
// - `key`: loads the API key from `~/.gpt_apikey` or asks for it.
// - `scan`: expands base paths into their immediate subdirectories.
// - `suggest`: the `Suggester` seam, prompt text and reply parsing.
// - `api`: blocking chat-completions client, the real `Suggester`.
// - `rename`: matches suggestions to directories and renames them.
// - `ui`: runs one pass end to end and prints status lines.
pub mod api;
pub mod key;
pub mod rename;
pub mod scan;
pub mod suggest;
pub mod ui;
