//! Candidate list files: a JSON array of strings or one entry per line.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CandidateError {
    #[error("failed to read candidates from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("candidates file {path} looks like JSON but is not an array of strings: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub fn load_candidates(path: &Path) -> Result<Vec<String>, CandidateError> {
    let data = fs::read_to_string(path).map_err(|source| CandidateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_candidates(&data).map_err(|source| CandidateError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse candidate text. Input starting with `[` must be a JSON string
/// array; anything else is read line by line, skipping blank lines.
pub fn parse_candidates(data: &str) -> Result<Vec<String>, serde_json::Error> {
    if data.trim_start().starts_with('[') {
        return serde_json::from_str(data);
    }
    Ok(data
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}
