//! CLI output formatting.
//!
//! Output is **destination-centric**: every line names an operation by its
//! declared position and shows where its image went (or will go). Byte sizes
//! are secondary context in parentheses.
//!
//! # Output Format
//!
//! ## Run
//!
//! ```text
//! sourcebucket/HappyFace.jpg
//!     001 reduce → foo/some/HappyFace.jpg (18.2 KB)
//!     002 backup → sourcebucket/a_HappyFace_b.jpg (61.0 KB)
//!     003 resizes[0] (300px, png) → sourcebucket/HappyFace.png (97.4 KB)
//! Wrote 3 images
//! ```
//!
//! ## Check
//!
//! ```text
//! Operations for sourcebucket/HappyFace.jpg
//!     001 reduce → foo/some/HappyFace.jpg
//!     002 resizes[0] (100px) → sourcebucket/HappyFace.jpg
//! Configuration is valid (2 operations)
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::config::Config;
use crate::event::StorageEvent;
use crate::naming;
use crate::process::WrittenImage;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Human-readable byte count: `512 B`, `18.2 KB`, `3.4 MB`.
fn format_bytes(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{} B", bytes)
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

// ============================================================================
// Run
// ============================================================================

/// Format the result of processing one event.
pub fn format_run_output(event: &StorageEvent, written: &[WrittenImage]) -> Vec<String> {
    let mut lines = vec![event.to_string()];

    if written.is_empty() {
        lines.push(format!("{}nothing to do", indent(1)));
    }
    for (i, image) in written.iter().enumerate() {
        lines.push(format!(
            "{}{} {} → {}/{} ({})",
            indent(1),
            format_index(i + 1),
            image.operation,
            image.bucket,
            image.key,
            format_bytes(image.size)
        ));
    }

    lines.push(format!("Wrote {}", plural(written.len(), "image")));
    lines
}

pub fn print_run_output(event: &StorageEvent, written: &[WrittenImage]) {
    for line in format_run_output(event, written) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the operation plan `config` would execute for `sample`.
pub fn format_plan(config: &Config, sample: &StorageEvent) -> Vec<String> {
    let operations = config.operations();
    let mut lines = vec![format!("Operations for {}", sample)];

    if operations.is_empty() {
        lines.push(format!("{}none enabled", indent(1)));
    }
    for (i, operation) in operations.iter().enumerate() {
        let dest = naming::destination(&sample.bucket, &sample.key, operation);
        lines.push(format!(
            "{}{} {} → {}/{}",
            indent(1),
            format_index(i + 1),
            operation,
            dest.bucket,
            dest.key
        ));
    }

    lines.push(format!(
        "Configuration is valid ({})",
        plural(operations.len(), "operation")
    ));
    lines
}

pub fn print_plan(config: &Config, sample: &StorageEvent) {
    for line in format_plan(config, sample) {
        println!("{}", line);
    }
}
