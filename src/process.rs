//! Orchestration: one trigger event in, zero or more derived images out.
//!
//! ## Steps
//!
//! ```text
//! 1. validate   config            → ConfigError aborts before any I/O
//! 2. expand     config            → [reduce?, backup?, resizes...]
//! 3. fetch      event             → source ImageValue (exactly once)
//! 4. transform  source × ops      → parallel, one ImageValue per op
//! 5. name       op                → destination bucket/key
//! 6. write      outputs           → sequential, in declared order
//! ```
//!
//! ## Parallel Processing
//!
//! Transforms run in parallel using [rayon](https://docs.rs/rayon). They all
//! read the same source buffer, which is never mutated. Results are collected
//! through an indexed parallel iterator, so they come back in declared order
//! no matter which finishes first; writes are then dispatched one by one in
//! that order. Consumers match outputs to configuration positionally.
//!
//! ## Failure Policy
//!
//! Codec failures are all-or-nothing: if any operation fails to decode or
//! encode, the run fails with the first failing operation (in declared order)
//! and **nothing** is written. Backup never touches the codec, so it cannot
//! fail this way. A failed write stops the run; earlier writes stay in place.
//!
//! With no operations enabled the run returns immediately: no fetch, no writes.

use crate::config::{Config, ConfigError, Operation};
use crate::event::StorageEvent;
use crate::imaging::{CodecError, ImageCodec, RustCodec, transform};
use crate::logging;
use crate::naming;
use crate::storage::{ImageStorage, StorageError};
use crate::types::ImageValue;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to fetch source image: {0}")]
    Fetch(#[source] StorageError),
    #[error("Image processing failed for {operation}: {source}")]
    Codec {
        operation: String,
        #[source]
        source: CodecError,
    },
    #[error("Failed to write {operation} output: {source}")]
    Write {
        operation: String,
        #[source]
        source: StorageError,
    },
}

/// Summary of one dispatched write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenImage {
    /// Operation label, e.g. `reduce` or `resizes[1] (100px, gif)`.
    pub operation: String,
    pub bucket: String,
    pub key: String,
    pub size: usize,
}

/// Runs a [`Config`] against the object named by one trigger event.
pub struct ImageProcessor<'a, S, C> {
    storage: &'a S,
    codec: &'a C,
    event: StorageEvent,
}

impl<'a, S: ImageStorage, C: ImageCodec> ImageProcessor<'a, S, C> {
    pub fn new(storage: &'a S, codec: &'a C, event: StorageEvent) -> Self {
        Self {
            storage,
            codec,
            event,
        }
    }

    /// Process the event and return how many images were written.
    pub fn run(&self, config: &Config) -> Result<usize, ProcessError> {
        Ok(self.run_with_report(config)?.len())
    }

    /// Process the event and describe every write, in dispatch order.
    pub fn run_with_report(&self, config: &Config) -> Result<Vec<WrittenImage>, ProcessError> {
        let _span = logging::event_span(&self.event).entered();
        config.validate()?;

        let operations = config.operations();
        if operations.is_empty() {
            info!(source = %self.event, "no operations configured, nothing to do");
            return Ok(Vec::new());
        }

        let source = self.storage.fetch(&self.event).map_err(ProcessError::Fetch)?;
        info!(
            source = %source,
            bytes = source.len(),
            operations = operations.len(),
            "processing image"
        );

        let outputs = render_all(self.codec, &source, &operations)?;

        let mut written = Vec::with_capacity(outputs.len());
        for (operation, image) in operations.iter().zip(outputs) {
            let image = self
                .storage
                .write(image)
                .map_err(|err| ProcessError::Write {
                    operation: operation.to_string(),
                    source: err,
                })?;
            info!(
                operation = %operation,
                bucket = image.bucket(),
                key = image.key(),
                bytes = image.len(),
                "wrote image"
            );
            written.push(WrittenImage {
                operation: operation.to_string(),
                bucket: image.bucket().to_string(),
                key: image.key().to_string(),
                size: image.len(),
            });
        }

        Ok(written)
    }
}

/// Process one event with the default codec.
pub fn process(
    storage: &impl ImageStorage,
    event: StorageEvent,
    config: &Config,
) -> Result<Vec<WrittenImage>, ProcessError> {
    let codec = RustCodec::new();
    ImageProcessor::new(storage, &codec, event).run_with_report(config)
}

/// Transform and name every operation in parallel.
///
/// The returned images are in the same order as `operations`. If any
/// operation fails, the error for the earliest one is returned.
pub fn render_all(
    codec: &impl ImageCodec,
    source: &ImageValue,
    operations: &[Operation],
) -> Result<Vec<ImageValue>, ProcessError> {
    let results: Vec<Result<ImageValue, ProcessError>> = operations
        .par_iter()
        .map(|operation| render(codec, source, operation))
        .collect();

    results.into_iter().collect()
}

fn render(
    codec: &impl ImageCodec,
    source: &ImageValue,
    operation: &Operation,
) -> Result<ImageValue, ProcessError> {
    debug!(operation = %operation, "transforming");

    let image = transform(codec, source, operation).map_err(|err| {
        warn!(operation = %operation, error = %err, "transform failed");
        ProcessError::Codec {
            operation: operation.to_string(),
            source: err,
        }
    })?;

    let destination = naming::destination(source.bucket(), source.key(), operation);
    Ok(image.relocated(destination.bucket, destination.key))
}
