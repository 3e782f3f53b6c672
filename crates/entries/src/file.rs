use std::{fs, path::Path};

use tracing::debug;

use crate::{errors::EntriesFileError, model::EntryDescription};

/// Reads an entries file. Either every entry parses or an error is returned.
pub fn parse_entries_file(path: impl AsRef<Path>) -> Result<Vec<EntryDescription>, EntriesFileError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| EntriesFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let entries = parse_entries_json(&raw)?;
    debug!(path = %path.display(), count = entries.len(), "parsed entries file");
    Ok(entries)
}

pub fn parse_entries_json(raw: &str) -> Result<Vec<EntryDescription>, EntriesFileError> {
    Ok(serde_json::from_str(raw)?)
}
