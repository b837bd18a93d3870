use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("failed to read time series {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to write time series {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to encode sample for {path}: {source}")]
    Encode {
        path: String,
        source: serde_json::Error,
    },
}

/// Appends `sample` to the JSON array stored at `output_file`.
///
/// A missing, empty or corrupt file is treated as an empty series. Any other read
/// failure aborts without touching the file. The array is rewritten through a
/// sibling temporary file so a crash never leaves half a document.
pub fn record<T: Serialize>(sample: &T, output_file: &Path) -> Result<(), RecorderError> {
    let path_str = output_file.display().to_string();
    let mut series = read_series_values(output_file).map_err(|source| RecorderError::Read {
        path: path_str.clone(),
        source,
    })?;

    let value = serde_json::to_value(sample).map_err(|source| RecorderError::Encode {
        path: path_str.clone(),
        source,
    })?;
    series.push(value);

    let encoded = serde_json::to_vec_pretty(&series).map_err(|source| RecorderError::Encode {
        path: path_str.clone(),
        source,
    })?;

    write_replacing(output_file, &encoded).map_err(|source| RecorderError::Write {
        path: path_str,
        source,
    })
}

/// Last `count` samples that decode as `T`, oldest first.
pub fn tail<T: DeserializeOwned>(path: &Path, count: usize) -> Vec<T> {
    let series = match read_series_values(path) {
        Ok(series) => series,
        Err(error) => {
            log::warn!("time_series_unreadable path={} error={}", path.display(), error);
            Vec::new()
        }
    };
    let skip = series.len().saturating_sub(count);
    series
        .into_iter()
        .skip(skip)
        .filter_map(|value| serde_json::from_value::<T>(value).ok())
        .collect()
}

pub fn read_all<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    tail(path, usize::MAX)
}

/// Newest `.json` file in `dir` by name; daily files embed the date so names sort by day.
pub fn latest_file(dir: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;

    entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|extension| extension.to_str())
                    .map(|extension| extension == "json")
                    .unwrap_or(false)
        })
        .max_by(|left, right| left.file_name().cmp(&right.file_name()))
}

fn read_series_values(path: &Path) -> Result<Vec<serde_json::Value>, std::io::Error> {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(error) => return Err(error),
    };

    Ok(match serde_json::from_slice::<Vec<serde_json::Value>>(&raw) {
        Ok(series) => series,
        Err(error) => {
            if !raw.iter().all(u8::is_ascii_whitespace) {
                log::warn!(
                    "time_series_reset path={} reason=corrupt error={}",
                    path.display(),
                    error
                );
            }
            Vec::new()
        }
    })
}

pub(crate) fn write_replacing(path: &Path, bytes: &[u8]) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde::{Deserialize, Serialize};

    use super::{RecorderError, latest_file, read_all, record, tail};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Point {
        timestamp: f64,
        value: f64,
    }

    fn point(value: f64) -> Point {
        Point {
            timestamp: value,
            value,
        }
    }

    #[test]
    fn creates_missing_file_and_parents() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested/site/series.json");

        record(&point(1.0), &path).expect("record into missing file");
        record(&point(2.0), &path).expect("append");

        let series: Vec<Point> = read_all(&path);
        assert_eq!(series, vec![point(1.0), point(2.0)]);
    }

    #[test]
    fn corrupt_file_is_reset_to_empty_series() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("series.json");
        fs::write(&path, b"[{\"timestamp\": 1.0, \"val").expect("write corrupt file");

        record(&point(3.0), &path).expect("record over corrupt file");

        let series: Vec<Point> = read_all(&path);
        assert_eq!(series, vec![point(3.0)]);
    }

    #[test]
    fn empty_file_is_treated_as_empty_series() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("series.json");
        fs::write(&path, b"").expect("write empty file");

        record(&point(4.0), &path).expect("record over empty file");
        assert_eq!(read_all::<Point>(&path).len(), 1);
    }

    #[test]
    fn unreadable_series_aborts_without_overwriting() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("series.json");
        fs::create_dir(&path).expect("directory in place of the series");
        fs::write(path.join("keep.txt"), b"x").expect("write marker");

        let result = record(&point(5.0), &path);
        assert!(matches!(result, Err(RecorderError::Read { .. })));
        assert!(path.join("keep.txt").exists());
        assert!(tail::<Point>(&path, 10).is_empty());
    }

    #[test]
    fn tail_returns_last_samples_in_order() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("series.json");
        for value in 0..15 {
            record(&point(value as f64), &path).expect("record");
        }

        let last: Vec<Point> = tail(&path, 10);
        assert_eq!(last.len(), 10);
        assert_eq!(last[0], point(5.0));
        assert_eq!(last[9], point(14.0));

        assert!(tail::<Point>(&dir.path().join("missing.json"), 10).is_empty());
    }

    #[test]
    fn latest_file_picks_newest_day() {
        let dir = tempfile::tempdir().expect("temp dir");
        for name in [
            "ping_results_2024_01_30.json",
            "ping_results_2024_02_01.json",
            "ping_results_2023_12_31.json",
            "notes.txt",
        ] {
            fs::write(dir.path().join(name), b"[]").expect("write file");
        }

        let latest = latest_file(dir.path()).expect("a json file exists");
        assert!(latest.ends_with("ping_results_2024_02_01.json"));
    }
}
