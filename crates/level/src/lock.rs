use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Fixed marker payload written into session.lock.
pub const LOCK_PAYLOAD: &[u8] = "\u{2603}".as_bytes();

/// Errors acquiring the exclusive session lock.
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("world directory is locked by another instance: {}", .0.display())]
    AlreadyLocked(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Exclusive marker file preventing concurrent access to one world directory.
///
/// Acquire-or-fail at construction. The single release point is `release`,
/// called from world save; a lock that is never released leaves a stale
/// marker that blocks future opens of the directory. There is no automatic
/// recovery - operators delete the marker by hand after a crash.
#[derive(Debug)]
pub struct SessionLock {
    handle: File,
    path: PathBuf,
}

impl SessionLock {
    pub const FILE_NAME: &'static str = "session.lock";

    /// Exclusively create the marker file and write the fixed payload.
    /// Fails if the marker already exists.
    pub fn acquire(root: impl AsRef<Path>) -> Result<Self, LockError> {
        let path = root.as_ref().join(Self::FILE_NAME);
        let mut handle = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(LockError::AlreadyLocked(path));
            }
            Err(e) => return Err(e.into()),
        };
        handle.write_all(LOCK_PAYLOAD)?;
        tracing::debug!(path = %path.display(), "acquired session lock");
        Ok(Self { handle, path })
    }

    /// Close the handle and remove the marker, allowing future opens.
    pub fn release(self) -> std::io::Result<()> {
        drop(self.handle);
        std::fs::remove_file(&self.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
