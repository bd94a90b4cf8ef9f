//! Destination naming for generated images.
//!
//! Every output lands at a `(bucket, key)` computed from the source identity
//! and the operation that produced it. All functions here are pure.
//!
//! | Operation | Bucket | Key |
//! |---|---|---|
//! | reduce | `bucket` override or source | source key, or `directory/basename` |
//! | backup | source | `dir/` + prefix + stem + suffix + `.ext` |
//! | resize | source | source key, or extension swapped for the format's |
//!
//! ## Key anatomy
//!
//! `photos/2024/HappyFace.jpg` splits into directory `photos/2024/`, stem
//! `HappyFace` and extension `.jpg`. A basename without a dot (or whose only
//! dot is the first character, like `.profile`) has an empty extension; the
//! whole basename is the stem.

use crate::config::{BackupConfig, Operation, ReduceConfig, ResizeConfig};

/// Where an output is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub bucket: String,
    pub key: String,
}

/// A key split into directory, stem and extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyParts<'a> {
    /// Everything up to and including the last `/`. Empty at the bucket root.
    pub directory: &'a str,
    pub stem: &'a str,
    /// Includes the leading dot. Empty when the basename has none.
    pub extension: &'a str,
}

/// Split a key into its parts.
///
/// - `"a/b/photo.jpg"` → (`"a/b/"`, `"photo"`, `".jpg"`)
/// - `"photo"` → (`""`, `"photo"`, `""`)
/// - `"archive.tar.gz"` → (`""`, `"archive.tar"`, `".gz"`)
/// - `".profile"` → (`""`, `".profile"`, `""`)
pub fn split_key(key: &str) -> KeyParts<'_> {
    let (directory, basename) = match key.rfind('/') {
        Some(pos) => key.split_at(pos + 1),
        None => ("", key),
    };
    let (stem, extension) = match basename.rfind('.') {
        Some(pos) if pos > 0 => basename.split_at(pos),
        _ => (basename, ""),
    };
    KeyParts {
        directory,
        stem,
        extension,
    }
}

/// Filename portion of a key.
pub fn basename(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Compute the destination for `operation` applied to the source object.
pub fn destination(source_bucket: &str, source_key: &str, operation: &Operation) -> Destination {
    match operation {
        Operation::Reduce(reduce) => reduce_destination(source_bucket, source_key, reduce),
        Operation::Backup(backup) => backup_destination(source_bucket, source_key, backup),
        Operation::Resize { spec, .. } => resize_destination(source_bucket, source_key, spec),
    }
}

/// Same filename; optionally a different bucket and/or directory.
///
/// An empty directory (or one made only of slashes) counts as unset.
pub fn reduce_destination(
    source_bucket: &str,
    source_key: &str,
    reduce: &ReduceConfig,
) -> Destination {
    let bucket = reduce
        .bucket
        .as_deref()
        .filter(|b| !b.is_empty())
        .unwrap_or(source_bucket);

    let key = match reduce
        .directory
        .as_deref()
        .map(|d| d.trim_matches('/'))
        .filter(|d| !d.is_empty())
    {
        Some(directory) => format!("{}/{}", directory, basename(source_key)),
        None => source_key.to_string(),
    };

    Destination {
        bucket: bucket.to_string(),
        key,
    }
}

/// Source bucket, source directory, decorated stem, original extension.
pub fn backup_destination(
    source_bucket: &str,
    source_key: &str,
    backup: &BackupConfig,
) -> Destination {
    let parts = split_key(source_key);
    Destination {
        bucket: source_bucket.to_string(),
        key: format!(
            "{}{}{}{}{}",
            parts.directory, backup.prefix, parts.stem, backup.suffix, parts.extension
        ),
    }
}

/// Source bucket and key, except that `changeExtension` with a `format`
/// swaps the extension for the format's own.
pub fn resize_destination(
    source_bucket: &str,
    source_key: &str,
    resize: &ResizeConfig,
) -> Destination {
    let key = match resize.format {
        Some(format) if resize.change_extension => {
            let parts = split_key(source_key);
            format!("{}{}.{}", parts.directory, parts.stem, format.extension())
        }
        // No format means nothing to change to
        _ => source_key.to_string(),
    };

    Destination {
        bucket: source_bucket.to_string(),
        key,
    }
}
