// Whole-file JSON persistence for the task store

use crate::error::TaskError;
use crate::store::TaskStore;
use eyre::{Context, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Load the store document
///
/// A missing file is an empty store. A file that is not an array of task
/// objects fails with [`TaskError::Format`] and is left untouched on disk.
pub fn load(path: &Path) -> Result<TaskStore> {
    if !path.exists() {
        info!(file = ?path, "Task file not found, starting empty");
        return Ok(TaskStore::new());
    }

    let content = fs::read(path).with_context(|| format!("Failed to read task file {}", path.display()))?;
    let store = TaskStore::from_slice(&content).with_context(|| format!("Failed to parse task file {}", path.display()))?;

    info!(file = ?path, count = store.len(), "Loaded tasks");
    Ok(store)
}

/// Load the store, moving a malformed document aside instead of failing
///
/// The bad file is renamed to `<file>.corrupt` so the next save cannot overwrite it.
pub fn load_or_recover(path: &Path) -> Result<TaskStore> {
    match load(path) {
        Ok(store) => Ok(store),
        Err(e) if is_format_error(&e) => {
            let backup = sibling(path, "corrupt");
            warn!(
                file = ?path,
                backup = ?backup,
                error = %e.root_cause(),
                "Malformed task file, starting empty"
            );
            fs::rename(path, &backup).context("Failed to move malformed task file aside")?;
            Ok(TaskStore::new())
        }
        Err(e) => Err(e),
    }
}

/// Write the whole store, replacing the previous document atomically
///
/// Writers serialize on a persistent `<file>.lock`; a failed write removes its `<file>.tmp`.
pub fn save(path: &Path, store: &TaskStore) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("Failed to create task file directory")?;
    }

    let lock_file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(sibling(path, "lock"))
        .context("Failed to open task file lock")?;
    lock_file.lock_exclusive().context("Failed to acquire file lock")?;

    let json = store.to_json()?;
    let tmp_path = sibling(path, "tmp");
    if let Err(e) = write_and_replace(&tmp_path, path, json.as_bytes()) {
        if tmp_path.exists() {
            let _ = fs::remove_file(&tmp_path);
        }
        return Err(e);
    }

    debug!(file = ?path, count = store.len(), "Saved tasks");
    // Lock is released when lock_file is dropped
    Ok(())
}

fn write_and_replace(tmp_path: &Path, path: &Path, content: &[u8]) -> Result<()> {
    let mut tmp = File::create(tmp_path).context("Failed to create temporary task file")?;
    tmp.write_all(content)?;
    tmp.write_all(b"\n")?;
    tmp.sync_all()?; // Ensure data is flushed to disk before the rename
    drop(tmp);

    fs::rename(tmp_path, path).context("Failed to replace task file")?;
    Ok(())
}

/// Whether a load error came from a malformed document rather than I/O
pub fn is_format_error(err: &eyre::Report) -> bool {
    matches!(err.downcast_ref::<TaskError>(), Some(TaskError::Format(_)))
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(format!(".{}", suffix));
    path.with_file_name(name)
}
