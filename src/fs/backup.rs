//! Recoverable delete: mirrored backup copies plus a LIFO undo stack.
//!
//! A deleted file is first copied to `backup_root + "/" + live_path`, and only
//! then removed. Undo copies the backup back; the backup itself stays on disk.
//! The mirror path depends on the live path alone, so deleting the same path
//! twice overwrites the earlier backup and only the latest one survives.

use std::ffi::OsString;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{AppError, Result};
use crate::fs::entry::{Entry, EntryKind};
use crate::fs::tree::TreeStore;

/// Default mirror root for backups.
pub const DEFAULT_BACKUP_DIR: &str = "/tmp/fl-backup";

/// Owns the backup mirror location and the stack of deleted entries.
#[derive(Debug)]
pub struct BackupManager {
    root: PathBuf,
    stack: Vec<Entry>,
}

impl BackupManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            stack: Vec::new(),
        }
    }

    /// Number of deletions that can still be undone.
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Mirror location for `live`: plain string concatenation of the root, a
    /// separator and the live path.
    pub fn backup_path(&self, live: &Path) -> PathBuf {
        let mut s = OsString::from(self.root.as_os_str());
        s.push("/");
        s.push(live.as_os_str());
        PathBuf::from(s)
    }

    /// Back up the file at `index`, remove it from disk, then move its entry
    /// from the store onto the undo stack.
    ///
    /// Nothing in memory changes unless both the copy and the removal
    /// succeed; a failed copy never touches the live file.
    pub fn soft_delete(&mut self, store: &mut TreeStore, index: usize) -> Result<Entry> {
        let entry = match store.get(index) {
            Some(e) => e.clone(),
            None => {
                return Err(AppError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no entry at selection",
                )))
            }
        };
        let live = entry.full_path();
        if entry.kind != EntryKind::File {
            return Err(AppError::NotAFile(live));
        }

        let backup = self.backup_path(&live);
        create_parent_dirs(&backup)?;
        if same_file(&live, &backup) {
            return Err(AppError::SameFile(live));
        }
        ensure_writable(&backup)?;
        fs::copy(&live, &backup)?;
        fs::remove_file(&live)?;

        tracing::info!(live = %live.display(), backup = %backup.display(), "file backed up and removed");
        store.remove(index);
        self.stack.push(entry.clone());
        Ok(entry)
    }

    /// Restore the most recently deleted entry and put it back into the
    /// store. Returns `Ok(None)` when there is nothing to undo.
    ///
    /// The stack is only popped once the file is back on disk.
    pub fn undo(&mut self, store: &mut TreeStore) -> Result<Option<(Entry, usize)>> {
        let entry = match self.stack.last() {
            Some(e) => e.clone(),
            None => return Ok(None),
        };
        let live = entry.full_path();
        let backup = self.backup_path(&live);

        create_parent_dirs(&live)?;
        if same_file(&backup, &live) {
            return Err(AppError::SameFile(live));
        }
        ensure_writable(&live)?;
        fs::copy(&backup, &live)?;

        tracing::info!(live = %live.display(), backup = %backup.display(), "file restored");
        self.stack.pop();
        let index = store.insert(entry.clone());
        Ok(Some((entry, index)))
    }
}

/// Create every missing directory above `path`, ignoring `.` components.
fn create_parent_dirs(path: &Path) -> Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    let dir: PathBuf = parent
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    fs::create_dir_all(&dir)?;
    Ok(())
}

/// Whether `a` and `b` are the same file on disk. A missing path is never
/// the same file as anything.
#[cfg(unix)]
fn same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(ma), Ok(mb)) => ma.dev() == mb.dev() && ma.ino() == mb.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(ca), Ok(cb)) => ca == cb,
        _ => false,
    }
}

/// Give the owner write access to an existing regular file at `path`, so a
/// copy can overwrite it. `fs::copy` carries the source mode over, which
/// leaves backups of read-only files read-only.
fn ensure_writable(path: &Path) -> Result<()> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };
    let mut perms = meta.permissions();
    if !meta.is_file() || !perms.readonly() {
        return Ok(());
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        perms.set_mode(perms.mode() | 0o200);
    }
    #[cfg(not(unix))]
    #[allow(clippy::permissions_set_readonly_false)]
    perms.set_readonly(false);
    fs::set_permissions(path, perms)?;
    Ok(())
}
