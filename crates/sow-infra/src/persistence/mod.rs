//! Persistence implementations
//!
//! File-backed and remote implementations of the repository traits, plus
//! in-memory fakes for tests.

mod file_document_repo;
mod file_draft_repo;
mod memory;
mod remote_document_repo;

pub use file_document_repo::FileDocumentRepository;
pub use file_draft_repo::FileDraftRepository;
pub use memory::{MemoryDocumentRepository, MemoryDraftRepository};
pub use remote_document_repo::{RemoteDocumentRepository, RemoteSettings};

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use sow_types::{Error, Result};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| Error::Storage("store lock poisoned".to_string()))
}

/// Replace `path` with `bytes` through a temp file in the same directory.
///
/// A crash mid-write leaves the previous contents in place.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| Error::Storage(format!("invalid store path: {}", path.display())))?;
    let tmp = path.with_file_name(format!(".{}.tmp.{}", file_name, std::process::id()));
    {
        let mut file = File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

/// Move an unreadable store aside as `<name>.corrupt` and return the new path
fn quarantine(path: &Path) -> Result<PathBuf> {
    let mut name = path.as_os_str().to_os_string();
    name.push(".corrupt");
    let target = PathBuf::from(name);
    fs::rename(path, &target)?;
    Ok(target)
}
