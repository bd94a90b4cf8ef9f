//! Object storage collaborator.
//!
//! The processor only needs two capabilities from storage: fetch the object
//! named by a trigger event, and write a generated image back. [`ImageStorage`]
//! is that seam. Retries and timeouts belong to implementations, not to the
//! processor.
//!
//! [`LocalStorage`] maps buckets to directories under a root, which is what
//! the CLI uses and what the integration tests drive:
//!
//! ```text
//! <root>/
//! ├── sourcebucket/
//! │   ├── HappyFace.jpg
//! │   └── a_HappyFace_b.jpg
//! └── foo/
//!     └── some/HappyFace.jpg
//! ```

use crate::event::StorageEvent;
use crate::types::ImageValue;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },
    #[error("Invalid object location {location}: {reason}")]
    InvalidKey {
        location: String,
        reason: &'static str,
    },
    #[error("IO error on {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: io::Error,
    },
}

/// Fetch/write capability the processor runs against.
///
/// `Sync` so one storage can be shared by the processor across threads.
pub trait ImageStorage: Sync {
    /// Resolve a trigger event into the source image.
    fn fetch(&self, event: &StorageEvent) -> Result<ImageValue, StorageError>;

    /// Durably store `image` at its bucket/key and echo it back.
    fn write(&self, image: ImageValue) -> Result<ImageValue, StorageError>;
}

/// Filesystem-backed storage: `<root>/<bucket>/<key>`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve `bucket`/`key` to a path strictly inside the root.
    pub fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, StorageError> {
        let invalid = |reason| StorageError::InvalidKey {
            location: format!("{bucket}/{key}"),
            reason,
        };

        if bucket.is_empty() || bucket.contains(['/', '\\']) || bucket == "." || bucket == ".." {
            return Err(invalid("bucket must be a single path segment"));
        }
        if key.is_empty() {
            return Err(invalid("key is empty"));
        }
        if key.starts_with('/') || key.contains('\\') {
            return Err(invalid("key must be relative"));
        }
        if key
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..")
        {
            return Err(invalid("key contains an empty or relative segment"));
        }

        let mut path = self.root.join(bucket);
        path.extend(key.split('/'));
        Ok(path)
    }
}

impl ImageStorage for LocalStorage {
    fn fetch(&self, event: &StorageEvent) -> Result<ImageValue, StorageError> {
        let path = self.object_path(&event.bucket, &event.key)?;
        match std::fs::read(&path) {
            Ok(data) => Ok(ImageValue::new(&event.bucket, &event.key, data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StorageError::NotFound {
                bucket: event.bucket.clone(),
                key: event.key.clone(),
            }),
            Err(source) => Err(StorageError::Io {
                location: event.to_string(),
                source,
            }),
        }
    }

    fn write(&self, image: ImageValue) -> Result<ImageValue, StorageError> {
        let path = self.object_path(image.bucket(), image.key())?;
        let io_err = |source| StorageError::Io {
            location: image.to_string(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(&path, image.data()).map_err(io_err)?;
        Ok(image)
    }
}
