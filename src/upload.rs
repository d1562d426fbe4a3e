//! Background mirroring of rendered thumbnails.
//!
//! After a render succeeds the caller may hand the file to a [`RemoteStore`]
//! on a detached thread. The outcome is logged and never reported back: a
//! failed mirror does not change the render result.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Upload rejected: {0}")]
    Rejected(String),
}

/// A destination for finished thumbnails.
pub trait RemoteStore: Send + Sync {
    /// Short name for log lines.
    fn name(&self) -> &str;

    /// Store the file at `local` under `key`.
    fn put(&self, local: &Path, key: &str) -> Result<(), UploadError>;
}

/// Mirrors files into a local (or mounted) directory.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
    name: String,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = format!("dir:{}", root.display());
        Self { root, name }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl RemoteStore for DirectoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn put(&self, local: &Path, key: &str) -> Result<(), UploadError> {
        if key.is_empty() || key.contains(['/', '\\']) || key == "." || key == ".." {
            return Err(UploadError::Rejected(format!("invalid key {key:?}")));
        }
        std::fs::create_dir_all(&self.root)?;

        let mut source = File::open(local)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)?;
        io::copy(&mut source, tmp.as_file_mut())?;
        tmp.persist(self.root.join(key)).map_err(|e| e.error)?;
        Ok(())
    }
}

/// Copy `local` to `store` on a new thread.
///
/// The returned handle is only for callers that want to wait (the CLI does,
/// before exiting). Dropping it leaves the upload running.
pub fn spawn_upload(store: Arc<dyn RemoteStore>, local: PathBuf, key: String) -> JoinHandle<()> {
    std::thread::spawn(move || match store.put(&local, &key) {
        Ok(()) => log::info!("mirrored {key} to {}", store.name()),
        Err(e) => log::warn!("mirroring {key} to {} failed: {e}", store.name()),
    })
}
