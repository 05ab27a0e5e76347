use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// opaque identifier minted by the registry for each queued file.
/// it can be displayed, compared and hashed, but not parsed or built by callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UploadId(Uuid);

impl UploadId {
    pub(crate) fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for UploadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

/// anything the host can hand us as a selected file
pub trait FileHandle: Send + Sync + 'static {
    /// display name of the file, None if the host can't provide one
    fn file_name(&self) -> Option<String>;
}

/// a file on the local filesystem, referenced by path only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    path: PathBuf,
}

impl LocalFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FileHandle for LocalFile {
    fn file_name(&self) -> Option<String> {
        // paths like "/" or "foo/.." have no final component
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }
}

/// one file queued by the user
#[derive(Serialize, Debug)]
#[serde(bound = "")]
pub struct UploadRecord<H: ?Sized> {
    pub name: String,
    /// shared with the host; never closed or read by the registry
    #[serde(skip)]
    pub handle: Arc<H>,
    pub queued_at: DateTime<Utc>,
}

// manual impl so H itself doesn't need to be Clone
impl<H: ?Sized> Clone for UploadRecord<H> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            handle: Arc::clone(&self.handle),
            queued_at: self.queued_at,
        }
    }
}
