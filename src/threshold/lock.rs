//! Advisory lock around threshold writes.
//!
//! Only the ratchet writes markers. It holds a `.covgate.lock` file in the
//! source root while it runs; a second ratchet against the same tree fails
//! with [`CovgateError::Locked`] instead of interleaving writes. The gate
//! never writes and never locks.
//!
//! The lock records the holder's PID. A lock whose holder is gone, or whose
//! holder cannot be determined and which is older than [`STALE_AFTER`], is
//! reclaimed.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::error::{CovgateError, Result};

/// Lock file name, created in the source root.
pub const LOCK_FILE: &str = ".covgate.lock";

/// Age after which a lock without a live holder is considered abandoned.
pub const STALE_AFTER: Duration = Duration::from_secs(60 * 60);

/// Held lock; released when dropped.
#[derive(Debug)]
pub struct ThresholdLock {
    path: PathBuf,
}

impl ThresholdLock {
    /// Take the lock for `source_root`, reclaiming it if the holder is gone.
    pub fn acquire(source_root: &Path) -> Result<Self> {
        let path = source_root.join(LOCK_FILE);
        match Self::try_create(&path) {
            Err(CovgateError::Locked { .. }) if is_stale(&path)? => {
                tracing::info!("Removing stale lock {}", path.display());
                match fs::remove_file(&path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == ErrorKind::NotFound => {}
                    Err(e) => return Err(e.into()),
                }
                Self::try_create(&path)
            }
            other => other,
        }
    }

    fn try_create(path: &Path) -> Result<Self> {
        let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(CovgateError::Locked {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        // Built before writing so a failed write still removes the file.
        let lock = Self {
            path: path.to_path_buf(),
        };
        writeln!(file, "{}", std::process::id())?;
        tracing::debug!("Acquired threshold lock {}", path.display());
        Ok(lock)
    }

    /// Path of the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ThresholdLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!("Failed to release lock {}: {}", self.path.display(), e);
        }
    }
}

/// Whether an existing lock file may be taken over.
fn is_stale(path: &Path) -> Result<bool> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(true),
        Err(e) => return Err(e.into()),
    };

    if let Some(alive) = content.trim().parse::<u32>().ok().and_then(process_alive) {
        return Ok(!alive);
    }

    let modified = fs::metadata(path)?.modified()?;
    let age = SystemTime::now()
        .duration_since(modified)
        .unwrap_or(Duration::ZERO);
    Ok(age > STALE_AFTER)
}

/// Whether `pid` names a running process; `None` when it cannot be told.
fn process_alive(pid: u32) -> Option<bool> {
    #[cfg(unix)]
    {
        let pid = libc::pid_t::try_from(pid).ok().filter(|p| *p > 0)?;
        // SAFETY: signal 0 performs the permission and existence checks only
        if unsafe { libc::kill(pid, 0) } == 0 {
            return Some(true);
        }
        match std::io::Error::last_os_error().raw_os_error() {
            Some(libc::ESRCH) => Some(false),
            Some(libc::EPERM) => Some(true),
            _ => None,
        }
    }

    #[cfg(not(unix))]
    {
        let _ = pid;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn acquire_creates_and_drop_removes() {
        let temp = TempDir::new().unwrap();
        let lock = ThresholdLock::acquire(temp.path()).unwrap();
        let path = lock.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            format!("{}\n", std::process::id())
        );

        drop(lock);
        assert!(!path.exists());
    }

    #[test]
    fn second_acquire_is_locked() {
        let temp = TempDir::new().unwrap();
        let _held = ThresholdLock::acquire(temp.path()).unwrap();

        let err = ThresholdLock::acquire(temp.path()).unwrap_err();
        assert!(matches!(err, CovgateError::Locked { .. }));
    }

    #[test]
    fn reacquire_after_release() {
        let temp = TempDir::new().unwrap();
        drop(ThresholdLock::acquire(temp.path()).unwrap());
        assert!(ThresholdLock::acquire(temp.path()).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn lock_of_exited_process_is_reclaimed() {
        let temp = TempDir::new().unwrap();
        let mut child = std::process::Command::new("true").spawn().unwrap();
        let dead = child.id();
        child.wait().unwrap();
        let path = temp.path().join(LOCK_FILE);
        fs::write(&path, format!("{dead}\n")).unwrap();

        let lock = ThresholdLock::acquire(temp.path()).unwrap();

        assert_eq!(
            fs::read_to_string(lock.path()).unwrap(),
            format!("{}\n", std::process::id())
        );
    }

    #[cfg(unix)]
    #[test]
    fn lock_of_running_process_is_kept() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(LOCK_FILE);
        fs::write(&path, format!("{}\n", std::process::id())).unwrap();

        let err = ThresholdLock::acquire(temp.path()).unwrap_err();
        assert!(matches!(err, CovgateError::Locked { .. }));
        assert!(path.exists());
    }

    #[test]
    fn unreadable_pid_is_kept_while_fresh() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(LOCK_FILE), "").unwrap();

        let err = ThresholdLock::acquire(temp.path()).unwrap_err();
        assert!(matches!(err, CovgateError::Locked { .. }));
    }

    #[test]
    fn unreadable_pid_is_reclaimed_when_old() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(LOCK_FILE);
        fs::write(&path, "garbage").unwrap();
        let old = SystemTime::now() - STALE_AFTER - Duration::from_secs(60);
        OpenOptions::new()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(old)
            .unwrap();

        assert!(ThresholdLock::acquire(temp.path()).is_ok());
    }
}
