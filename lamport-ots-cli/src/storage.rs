//! Key, signature and message files.
//!
//! Private keys are only ever written owner read/write and only read back
//! when nobody else can read them.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use lamport_ots::KeyStore;
use thiserror::Error;
use tracing::{debug, info};
#[cfg(not(unix))]
use tracing::warn;
use zeroize::Zeroizing;

#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: permissions {mode:o} let group or others read the private key", .path.display())]
    InsecurePermissions { path: PathBuf, mode: u32 },

    #[error("{}: private key is not readable by its owner", .path.display())]
    NotOwnerReadable { path: PathBuf },
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// A file written next to its destination as `<path>.tmp` and moved into
/// place by [`Staged::commit`]. Dropping it uncommitted removes the
/// temporary file and leaves the destination untouched.
#[derive(Debug)]
pub struct Staged {
    tmp: PathBuf,
    dest: PathBuf,
    committed: bool,
}

impl Staged {
    pub fn commit(mut self) -> Result<(), StorageError> {
        fs::rename(&self.tmp, &self.dest).map_err(io_error(&self.dest))?;
        self.committed = true;
        debug!(path = %self.dest.display(), "committed file");
        Ok(())
    }
}

impl Drop for Staged {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.tmp);
        }
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = OsString::from(path.as_os_str());
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

/// Stages a private key with mode `0600`.
///
/// The mode is applied when the file is created and again before any key
/// bytes are written, since a leftover file keeps its old mode. If the
/// file still ends up readable by anyone else, staging fails.
pub fn stage_private_key(path: &Path, bytes: &[u8]) -> Result<Staged, StorageError> {
    let tmp = tmp_path(path);
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(&tmp).map_err(io_error(&tmp))?;
    let staged = Staged {
        tmp,
        dest: path.to_path_buf(),
        committed: false,
    };
    #[cfg(unix)]
    file.set_permissions(fs::Permissions::from_mode(0o600))
        .map_err(io_error(&staged.tmp))?;
    check_owner_only(&staged.tmp)?;

    file.write_all(bytes).map_err(io_error(&staged.tmp))?;
    file.sync_all().map_err(io_error(&staged.tmp))?;
    Ok(staged)
}

/// Stages a public key or signature with default permissions.
pub fn stage_public(path: &Path, bytes: &[u8]) -> Result<Staged, StorageError> {
    let tmp = tmp_path(path);
    let staged = Staged {
        tmp,
        dest: path.to_path_buf(),
        committed: false,
    };
    fs::write(&staged.tmp, bytes).map_err(io_error(&staged.tmp))?;
    Ok(staged)
}

/// Reads a private key, refusing files that group or others can read.
pub fn read_private_key(path: &Path) -> Result<Zeroizing<Vec<u8>>, StorageError> {
    check_owner_only(path)?;
    let mut file = File::open(path).map_err(io_error(path))?;
    let mut bytes = Zeroizing::new(Vec::new());
    file.read_to_end(&mut bytes).map_err(io_error(path))?;
    Ok(bytes)
}

#[cfg(unix)]
fn check_owner_only(path: &Path) -> Result<(), StorageError> {
    let mode = fs::metadata(path).map_err(io_error(path))?.permissions().mode();
    if mode & 0o400 == 0 {
        return Err(StorageError::NotOwnerReadable {
            path: path.to_path_buf(),
        });
    }
    if mode & 0o077 != 0 {
        return Err(StorageError::InsecurePermissions {
            path: path.to_path_buf(),
            mode: mode & 0o777,
        });
    }
    Ok(())
}

#[cfg(not(unix))]
fn check_owner_only(path: &Path) -> Result<(), StorageError> {
    fs::metadata(path).map_err(io_error(path))?;
    warn!(path = %path.display(), "cannot check private key permissions on this platform");
    Ok(())
}

/// Writes a public key or signature with default permissions.
pub fn write_public(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    fs::write(path, bytes).map_err(io_error(path))?;
    debug!(path = %path.display(), bytes = bytes.len(), "wrote file");
    Ok(())
}

pub fn read_public(path: &Path) -> Result<Vec<u8>, StorageError> {
    fs::read(path).map_err(io_error(path))
}

pub fn open_message(path: &Path) -> Result<File, StorageError> {
    File::open(path).map_err(io_error(path))
}

/// Tracks spent private keys with a `<key file>.consumed` marker next to
/// each key file. Key ids are key file paths.
#[derive(Debug, Default, Clone)]
pub struct FileKeyStore;

impl FileKeyStore {
    pub fn new() -> Self {
        FileKeyStore
    }

    pub fn marker_path(key_id: &str) -> PathBuf {
        let mut path = OsString::from(key_id);
        path.push(".consumed");
        PathBuf::from(path)
    }

    /// Forgets that `key_id` was used, for when a fresh key replaces it.
    pub fn clear(&self, key_id: &str) -> Result<(), StorageError> {
        let marker = Self::marker_path(key_id);
        match fs::remove_file(&marker) {
            Ok(()) => {
                debug!(marker = %marker.display(), "removed stale consumed marker");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&marker)(e)),
        }
    }
}

impl KeyStore for FileKeyStore {
    type Error = StorageError;

    fn is_consumed(&self, key_id: &str) -> Result<bool, StorageError> {
        let marker = Self::marker_path(key_id);
        marker.try_exists().map_err(io_error(&marker))
    }

    fn mark_consumed(&mut self, key_id: &str) -> Result<bool, StorageError> {
        let marker = Self::marker_path(key_id);
        let created = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&marker);
        let mut file = match created {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                debug!(key_id, "consumed marker already present");
                return Ok(false);
            }
            Err(e) => return Err(io_error(&marker)(e)),
        };
        file.write_all(b"consumed\n").map_err(io_error(&marker))?;
        file.sync_all().map_err(io_error(&marker))?;
        info!(key_id, "private key is now spent; generate a new key pair before signing again");
        Ok(true)
    }
}
