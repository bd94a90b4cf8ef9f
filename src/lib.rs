//! # Image Fanout
//!
//! Turns one uploaded image into several derived images. An object-storage
//! put notification names the source; a JSON configuration says which
//! derivatives to make and where to put them.
//!
//! # Architecture: One Fetch, Many Outputs
//!
//! ```text
//! 1. Event     notification  →  StorageEvent      (bucket + decoded key)
//! 2. Fetch     StorageEvent  →  ImageValue        (source bytes, once)
//! 3. Expand    Config        →  [Operation]       (reduce, backup, resizes...)
//! 4. Transform source × op   →  ImageValue        (parallel, order kept)
//! 5. Write     [ImageValue]  →  storage           (sequential, declared order)
//! ```
//!
//! Every transform reads the same immutable source buffer. Outputs are tied to
//! their operation by position, so the n-th write always belongs to the n-th
//! operation of the expanded configuration.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`event`] | Parses put notifications into [`event::StorageEvent`]s |
//! | [`config`] | JSON configuration loading, validation, and expansion into operations |
//! | [`naming`] | Destination bucket/key policy for each operation |
//! | [`imaging`] | Pure-Rust codec: identify, re-encode, resize |
//! | [`storage`] | Fetch/write seam plus a filesystem implementation |
//! | [`process`] | The orchestrator: fetch, transform, name, write |
//! | [`types`] | [`types::ImageValue`], the (bucket, key, bytes) triple passed between stages |
//! | [`output`] | CLI output formatting |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Design Decisions
//!
//! ## Codec Failures Are All-Or-Nothing
//!
//! All transforms finish before the first write. If any of them fails the run
//! fails and storage is untouched, so a bad upload never leaves a partial set
//! of derivatives behind. Backups bypass the codec entirely and therefore
//! cannot trigger this.
//!
//! ## Shared Immutable Bytes
//!
//! Image data lives in [`bytes::Bytes`]. A backup is the source buffer itself,
//! not a copy, which makes "backup is byte-identical" true by construction.
//!
//! ## Pure-Rust Imaging
//!
//! The [`imaging`] module uses the `image` crate for every format, AVIF
//! encoding included. No system libraries, so the binary runs anywhere.

pub mod config;
pub mod event;
pub mod imaging;
pub mod logging;
pub mod naming;
pub mod output;
pub mod process;
pub mod storage;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
