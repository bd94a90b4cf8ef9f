//! Trigger events.
//!
//! A [`StorageEvent`] names the uploaded object (`bucket` + `key`). It is the
//! only thing the processor needs from the trigger; the storage adapter turns
//! it into bytes.
//!
//! S3 put notifications deliver keys form-encoded: spaces arrive as `+` and
//! everything else non-ASCII as `%XX`. [`StorageEvent::from_notification`]
//! undoes both.
//!
//! ```json
//! {
//!   "Records": [
//!     { "s3": { "bucket": { "name": "sourcebucket" }, "object": { "key": "HappyFace.jpg" } } }
//!   ]
//! }
//! ```

use serde::Deserialize;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EventError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Notification contains no records")]
    NoRecords,
    #[error("Invalid object key encoding: {0}")]
    KeyEncoding(String),
}

/// The uploaded object that triggered a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub bucket: String,
    pub key: String,
}

#[derive(Deserialize)]
struct Notification {
    #[serde(rename = "Records", default)]
    records: Vec<Record>,
}

#[derive(Deserialize)]
struct Record {
    s3: S3Entity,
}

#[derive(Deserialize)]
struct S3Entity {
    bucket: BucketEntity,
    object: ObjectEntity,
}

#[derive(Deserialize)]
struct BucketEntity {
    name: String,
}

#[derive(Deserialize)]
struct ObjectEntity {
    key: String,
}

impl StorageEvent {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Parse every record of an S3 put notification, in delivery order.
    pub fn from_notification(json: &str) -> Result<Vec<StorageEvent>, EventError> {
        let notification: Notification = serde_json::from_str(json)?;
        if notification.records.is_empty() {
            return Err(EventError::NoRecords);
        }

        notification
            .records
            .into_iter()
            .map(|record| {
                Ok(StorageEvent {
                    bucket: record.s3.bucket.name,
                    key: decode_key(&record.s3.object.key)?,
                })
            })
            .collect()
    }
}

impl fmt::Display for StorageEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// Decode a form-encoded object key (`+` → space, then `%XX`).
pub fn decode_key(raw: &str) -> Result<String, EventError> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|key| key.into_owned())
        .map_err(|e| EventError::KeyEncoding(e.to_string()))
}
