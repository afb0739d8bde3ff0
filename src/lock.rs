//! Advisory locking and atomic document replacement
//!
//! Two tt processes racing on `tasks.json` would each load the whole
//! document, mutate it in memory and write it back, and the slower
//! writer would erase the faster one's change. Mutations therefore hold
//! an exclusive flock on a sibling `.lock` file for the duration of the
//! read-modify-write, and every overwrite goes through a temp file plus
//! rename so readers never observe a half-written document.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use fs2::FileExt;

use crate::error::{Error, Result};

/// How long a mutation waits on a contended lock before giving up
pub const LOCK_WAIT: Duration = Duration::from_secs(5);

const RETRY_SLEEP: Duration = Duration::from_millis(50);

/// Exclusive advisory lock on a document, released on drop
///
/// The lock lives on a sibling `<document>.lock` file so the document
/// itself can be renamed over while the lock is held.
#[derive(Debug)]
pub struct DocumentLock {
    file: File,
}

impl DocumentLock {
    /// Lock a document for a read-modify-write cycle
    ///
    /// Creates the lock file if needed and retries until `wait` has
    /// elapsed, then fails with `Error::LockFailed`.
    pub fn acquire(document: &Path, wait: Duration) -> Result<Self> {
        let lock_file = sibling_lock_file(document);
        if let Some(parent) = lock_file.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_file)?;

        let deadline = Instant::now() + wait;
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => return Ok(Self { file }),
                Err(err) if contended(&err) => {
                    if Instant::now() >= deadline {
                        return Err(Error::LockFailed(lock_file));
                    }
                    thread::sleep(RETRY_SLEEP);
                }
                Err(err) => return Err(Error::Io(err)),
            }
        }
    }
}

impl Drop for DocumentLock {
    fn drop(&mut self) {
        // An unlock error during drop has nowhere to go
        let _ = self.file.unlock();
    }
}

fn sibling_lock_file(document: &Path) -> PathBuf {
    let mut name = document
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".lock");
    document.with_file_name(name)
}

fn contended(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::WouldBlock {
        return true;
    }

    // fs2 reports Windows sharing violations with a raw OS code instead
    // of WouldBlock; those still mean "held elsewhere, retry".
    #[cfg(windows)]
    {
        matches!(err.raw_os_error(), Some(32) | Some(33))
    }
    #[cfg(not(windows))]
    {
        false
    }
}

/// Replace a file's contents in one step
///
/// The data lands in a temp file beside the target (same filesystem, so
/// the rename is atomic) and is then renamed over it. A crash mid-write
/// leaves the previous document intact.
pub fn replace_file(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut tmp_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    tmp_name.push(format!(".{}.tmp", std::process::id()));
    let tmp = path.with_file_name(tmp_name);

    let mut file = File::create(&tmp)?;
    file.write_all(data)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use tempfile::TempDir;

    #[test]
    fn lock_file_sits_beside_the_document() {
        let temp = TempDir::new().unwrap();
        let document = temp.path().join("tasks.json");

        let _lock = DocumentLock::acquire(&document, LOCK_WAIT).unwrap();
        assert!(temp.path().join("tasks.json.lock").exists());
        assert!(!document.exists());
    }

    #[test]
    fn contended_acquire_fails_after_wait() {
        let temp = TempDir::new().unwrap();
        let document = temp.path().join("tasks.json");

        let held = DocumentLock::acquire(&document, LOCK_WAIT).unwrap();
        let result = DocumentLock::acquire(&document, Duration::from_millis(60));
        assert!(matches!(result, Err(Error::LockFailed(_))));

        drop(held);
        assert!(DocumentLock::acquire(&document, Duration::from_millis(60)).is_ok());
    }

    #[test]
    fn replace_file_swaps_contents_whole() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tasks.json");

        replace_file(&path, b"[]").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");

        replace_file(&path, b"[{\"id\":1}]").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[{\"id\":1}]");

        // No temp file left behind
        let entries: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("tasks.json")]);
    }

    #[test]
    fn locked_read_modify_write_loses_no_updates() {
        let temp = TempDir::new().unwrap();
        let document = Arc::new(temp.path().join("counter.json"));
        replace_file(&document, b"0").unwrap();

        let writers = 8;
        let barrier = Arc::new(Barrier::new(writers));

        let handles: Vec<_> = (0..writers)
            .map(|_| {
                let barrier = Arc::clone(&barrier);
                let document = Arc::clone(&document);
                thread::spawn(move || {
                    barrier.wait();
                    let _lock = DocumentLock::acquire(&document, LOCK_WAIT).unwrap();
                    let value: u64 = fs::read_to_string(document.as_path())
                        .unwrap()
                        .trim()
                        .parse()
                        .unwrap();
                    replace_file(&document, (value + 1).to_string().as_bytes()).unwrap();
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let total: u64 = fs::read_to_string(document.as_path())
            .unwrap()
            .trim()
            .parse()
            .unwrap();
        assert_eq!(total, writers as u64);
    }
}
