use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use thiserror::Error;

use super::alert_logic::AlertRecord;
use crate::monitor::recorder::write_replacing;

#[derive(Debug, Error)]
pub enum StateStoreError {
    #[error("alert state file {path} does not exist; run `sitewatch init` first")]
    Missing { path: String },
    #[error("failed to read alert state {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("alert state {path} is corrupt: {source}")]
    Corrupt {
        path: String,
        source: serde_json::Error,
    },
    #[error("failed to encode alert state {path}: {source}")]
    Encode {
        path: String,
        source: serde_json::Error,
    },
    #[error("failed to write alert state {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Writes a default record unless one already exists. Returns whether a file was created.
pub fn seed<S: AlertRecord>(path: &Path) -> Result<bool, StateStoreError> {
    if path.exists() {
        return Ok(false);
    }
    store(path, &S::default())?;
    Ok(true)
}

pub fn load<S: AlertRecord>(path: &Path) -> Result<S, StateStoreError> {
    let path_str = path.display().to_string();
    let raw = fs::read(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            StateStoreError::Missing {
                path: path_str.clone(),
            }
        } else {
            StateStoreError::Read {
                path: path_str.clone(),
                source,
            }
        }
    })?;

    serde_json::from_slice(&raw).map_err(|source| StateStoreError::Corrupt {
        path: path_str,
        source,
    })
}

/// Applies one cycle of transitions to the record at `path` and writes it back whole.
///
/// The record must already exist. Nothing is written when reading fails.
pub fn update<S: AlertRecord>(
    path: &Path,
    transitions: &S::Transitions,
    now: f64,
) -> Result<S, StateStoreError> {
    let mut state = load::<S>(path)?;
    state.apply(transitions, now);
    store(path, &state)?;
    Ok(state)
}

fn store<S: AlertRecord>(path: &Path, state: &S) -> Result<(), StateStoreError> {
    let path_str = path.display().to_string();
    let encoded = serde_json::to_vec_pretty(state).map_err(|source| StateStoreError::Encode {
        path: path_str.clone(),
        source,
    })?;
    write_replacing(path, &encoded).map_err(|source| StateStoreError::Write {
        path: path_str,
        source,
    })
}
