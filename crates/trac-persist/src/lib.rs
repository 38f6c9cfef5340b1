//! Block (file) persistence for `sb`/`fb`/`eb`, grounded on `trac.py`'s
//! `block` class. The wire format is a self-describing JSON document
//! rather than a host-native object dump (spec §9 open question): a flat
//! list of [`Form`]s, each carrying its full chunk list and cursor, so any
//! form round-trips exactly including its positional pointer.

use std::fs;
use std::path::Path;

use thiserror::Error;
use trac_text::Form;

#[derive(Debug, Error)]
pub enum BlockError {
    #[error("<STE> could not write block '{path}': {source}")]
    Write { path: String, #[source] source: std::io::Error },
    #[error("<STE> could not read block '{path}': {source}")]
    Read { path: String, #[source] source: std::io::Error },
    #[error("<STE> could not remove block '{path}': {source}")]
    Remove { path: String, #[source] source: std::io::Error },
    #[error("<STE> block '{path}' is not valid TRAC block data: {source}")]
    Decode { path: String, #[source] source: serde_json::Error },
}

/// `sb`: serialize `forms` (already deduplicated by the caller) to `path`.
pub fn store(path: &str, forms: &[&Form]) -> Result<(), BlockError> {
    let json = serde_json::to_string_pretty(forms).expect("Form serialization is infallible");
    fs::write(Path::new(path), json)
        .map_err(|source| BlockError::Write { path: path.to_string(), source })
}

/// `fb`: deserialize every form in `path`.
pub fn fetch(path: &str) -> Result<Vec<Form>, BlockError> {
    let text = fs::read_to_string(Path::new(path))
        .map_err(|source| BlockError::Read { path: path.to_string(), source })?;
    serde_json::from_str(&text).map_err(|source| BlockError::Decode { path: path.to_string(), source })
}

/// `eb`: delete the block file.
pub fn erase(path: &str) -> Result<(), BlockError> {
    fs::remove_file(Path::new(path))
        .map_err(|source| BlockError::Remove { path: path.to_string(), source })
}
