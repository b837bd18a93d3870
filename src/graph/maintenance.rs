use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const BYTES_PER_MB: u64 = 1024 * 1024;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PruneOutcome {
    pub removed_files: usize,
    pub remaining_bytes: u64,
}

/// Deletes the oldest files under `dir` (recursively, by modification time)
/// until the folder fits in `max_mb`. A missing folder is already within budget.
pub fn prune_exports(dir: &Path, max_mb: u64) -> Result<PruneOutcome, std::io::Error> {
    if !dir.exists() {
        return Ok(PruneOutcome::default());
    }

    let mut files = Vec::new();
    collect_files(dir, &mut files)?;
    files.sort_by(|left, right| left.modified.cmp(&right.modified).then(left.path.cmp(&right.path)));

    let budget = max_mb.saturating_mul(BYTES_PER_MB);
    let mut total = files.iter().map(|file| file.size).sum::<u64>();
    let mut removed_files = 0;

    for file in &files {
        if total <= budget {
            break;
        }
        // Another job may have pruned the same file already; it is gone either way.
        if remove_export(&file.path)? {
            removed_files += 1;
            log::info!(
                "export_pruned path={} size_bytes={}",
                file.path.display(),
                file.size
            );
        }
        total = total.saturating_sub(file.size);
    }

    Ok(PruneOutcome {
        removed_files,
        remaining_bytes: total,
    })
}

/// Returns `false` when the file was already gone.
fn remove_export(path: &Path) -> Result<bool, std::io::Error> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(error) if error.kind() == ErrorKind::NotFound => Ok(false),
        Err(error) => Err(error),
    }
}

struct ExportFile {
    path: PathBuf,
    size: u64,
    modified: SystemTime,
}

fn collect_files(dir: &Path, out: &mut Vec<ExportFile>) -> Result<(), std::io::Error> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let metadata = entry.metadata()?;
        if metadata.is_dir() {
            collect_files(&entry.path(), out)?;
        } else if metadata.is_file() {
            out.push(ExportFile {
                path: entry.path(),
                size: metadata.len(),
                modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            });
        }
    }
    Ok(())
}
