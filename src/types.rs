//! Shared types that flow through every pipeline stage.
//!
//! [`ImageValue`] is the unit of work: a fetch produces one, each transform
//! produces a new one, and a write consumes one. The byte buffer is a
//! reference-counted [`Bytes`] so parallel transforms can read the same source
//! without copying it.

use bytes::Bytes;
use std::fmt;

/// An immutable `(bucket, key, bytes)` triple.
///
/// There are no setters. [`with_data`](Self::with_data) and
/// [`relocated`](Self::relocated) consume the value and hand back a new one.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageValue {
    bucket: String,
    key: String,
    data: Bytes,
}

impl ImageValue {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            data: data.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Full object key including directory and filename.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Same identity, new contents.
    pub fn with_data(self, data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            ..self
        }
    }

    /// Same contents, new identity.
    pub fn relocated(self, bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            data: self.data,
        }
    }
}

// Manual impl: dumping the whole buffer into logs is never useful.
impl fmt::Debug for ImageValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageValue")
            .field("bucket", &self.bucket)
            .field("key", &self.key)
            .field("len", &self.data.len())
            .finish()
    }
}

impl fmt::Display for ImageValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}
