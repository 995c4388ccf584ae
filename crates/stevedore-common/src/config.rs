//! Loading specifications from YAML or JSON files.

use std::path::Path;

use crate::error::{Result, StevedoreError};
use crate::types::Specification;

/// On-disk encoding of a specification file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    /// YAML document (`.yaml`, `.yml`, and anything unrecognised).
    Yaml,
    /// JSON document (`.json`).
    Json,
}

impl SpecFormat {
    /// Picks the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Parses a specification from text in the given format.
///
/// # Errors
///
/// Returns an error if the text is not a valid specification document.
pub fn parse_specification(input: &str, format: SpecFormat) -> Result<Specification> {
    let spec = match format {
        SpecFormat::Yaml => serde_yaml::from_str(input)?,
        SpecFormat::Json => serde_json::from_str(input)?,
    };
    Ok(spec)
}

/// Reads and parses a specification file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not parse.
pub fn load_specification(path: &Path) -> Result<Specification> {
    tracing::info!(path = %path.display(), "loading specification");
    let content = std::fs::read_to_string(path).map_err(|source| StevedoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_specification(&content, SpecFormat::from_path(path))
}
