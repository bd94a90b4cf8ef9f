//! Operation configuration.
//!
//! Parses and validates the declarative operation set, then expands it into
//! the ordered list of [`Operation`]s the processor runs. Input is plain JSON,
//! usually the contents of a `config.json` next to the deployed function.
//!
//! ## Configuration Options
//!
//! ```json
//! {
//!   "reduce": {
//!     "bucket": "optimized",      // destination bucket (default: source bucket)
//!     "directory": "reduced"      // destination directory (default: source key unchanged)
//!   },
//!   "backup": {
//!     "prefix": "orig_",          // prepended to the file stem (default: "")
//!     "suffix": "_bak"            // appended to the file stem (default: "")
//!   },
//!   "resizes": [
//!     { "size": 300 },
//!     { "size": 100, "quality": 90, "format": "png", "changeExtension": true }
//!   ]
//! }
//! ```
//!
//! Every group is optional. A group that is present (even as `{}`) produces
//! exactly one output (one per entry for `resizes`). A configuration with no
//! groups is valid and produces nothing.
//!
//! Unknown keys are ignored at every level so older deployments keep working
//! with newer config files. Invalid values are not: a bad `resizes` entry
//! fails the whole configuration and the error names its index.

use crate::imaging::{MAX_DIMENSION, OutputFormat};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Configuration must be a JSON object")]
    NotAnObject,
    #[error("Invalid `{group}` configuration: {message}")]
    InvalidGroup {
        group: &'static str,
        message: String,
    },
    #[error("Invalid resizes[{index}]: {message}")]
    InvalidResize { index: usize, message: String },
}

/// Recompress the source in place (same dimensions, same format).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReduceConfig {
    /// Destination bucket. Defaults to the source bucket.
    #[serde(default)]
    pub bucket: Option<String>,
    /// Destination directory. When set, the output key is `directory/basename`.
    #[serde(default)]
    pub directory: Option<String>,
}

/// Copy the source byte-for-byte under a decorated name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BackupConfig {
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
}

/// One resized output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeConfig {
    /// Target length of the longer edge, in pixels.
    pub size: u32,
    /// Encoding quality (1-100). Defaults to the output format's own default.
    pub quality: Option<u32>,
    /// Output format. Defaults to the source format.
    pub format: Option<OutputFormat>,
    /// Rewrite the key's extension to match `format`.
    pub change_extension: bool,
}

impl ResizeConfig {
    pub fn new(size: u32) -> Self {
        Self {
            size,
            quality: None,
            format: None,
            change_extension: false,
        }
    }

    fn validate(&self, index: usize) -> Result<(), ConfigError> {
        if self.size == 0 {
            return Err(ConfigError::InvalidResize {
                index,
                message: "size must be a positive integer".into(),
            });
        }
        if self.size > MAX_DIMENSION {
            return Err(ConfigError::InvalidResize {
                index,
                message: format!("size must be at most {MAX_DIMENSION}, got {}", self.size),
            });
        }
        if let Some(q) = self.quality.filter(|q| !(1..=100).contains(q)) {
            return Err(ConfigError::InvalidResize {
                index,
                message: format!("quality must be 1-100, got {q}"),
            });
        }
        Ok(())
    }
}

/// Wire shape of a `resizes` entry before validation.
///
/// Numbers are read as `i64` so that zero, negative and out-of-range values
/// surface as validation errors instead of opaque type errors.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResize {
    size: Option<i64>,
    quality: Option<i64>,
    format: Option<String>,
    #[serde(alias = "change_extension")]
    change_extension: Option<bool>,
}

impl RawResize {
    fn into_config(self, index: usize) -> Result<ResizeConfig, ConfigError> {
        let invalid = |message: String| ConfigError::InvalidResize { index, message };

        let size = match self.size {
            None => return Err(invalid("size is required".into())),
            Some(s) if s <= 0 => {
                return Err(invalid(format!("size must be a positive integer, got {s}")));
            }
            Some(s) => u32::try_from(s).map_err(|_| invalid(format!("size {s} is too large")))?,
        };

        let quality = match self.quality {
            None => None,
            Some(q) if (1..=100).contains(&q) => Some(q as u32),
            Some(q) => return Err(invalid(format!("quality must be 1-100, got {q}"))),
        };

        let format = match self.format {
            None => None,
            Some(name) => Some(
                OutputFormat::parse(&name)
                    .ok_or_else(|| invalid(format!("unsupported format `{name}`")))?,
            ),
        };

        let config = ResizeConfig {
            size,
            quality,
            format,
            change_extension: self.change_extension.unwrap_or(false),
        };
        config.validate(index)?;
        Ok(config)
    }
}

/// Validated operation configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub reduce: Option<ReduceConfig>,
    pub backup: Option<BackupConfig>,
    pub resizes: Vec<ResizeConfig>,
}

impl Config {
    /// Parse from an already-decoded JSON value.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        let map = value.as_object().ok_or(ConfigError::NotAnObject)?;

        let reduce = parse_group::<ReduceConfig>(map.get("reduce"), "reduce")?;
        let backup = parse_group::<BackupConfig>(map.get("backup"), "backup")?;

        let resizes = match map.get("resizes") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(entries)) => entries
                .iter()
                .enumerate()
                .map(|(index, entry)| {
                    let raw: RawResize = serde_json::from_value(entry.clone()).map_err(|e| {
                        ConfigError::InvalidResize {
                            index,
                            message: e.to_string(),
                        }
                    })?;
                    raw.into_config(index)
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(other) => {
                return Err(ConfigError::InvalidGroup {
                    group: "resizes",
                    message: format!("expected an array, got {}", json_type(other)),
                });
            }
        };

        Ok(Self {
            reduce,
            backup,
            resizes,
        })
    }

    /// Parse from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// Load and parse a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Re-check values that the parser already guarantees, for configs
    /// assembled in code.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, resize) in self.resizes.iter().enumerate() {
            resize.validate(index)?;
        }
        Ok(())
    }

    /// True when no group is enabled.
    pub fn is_empty(&self) -> bool {
        self.reduce.is_none() && self.backup.is_none() && self.resizes.is_empty()
    }

    /// Expand into the ordered operation list: reduce, backup, then every
    /// resize in declared order. Disabled groups contribute nothing.
    pub fn operations(&self) -> Vec<Operation> {
        let reduce = self.reduce.clone().map(Operation::Reduce);
        let backup = self.backup.clone().map(Operation::Backup);
        let resizes = self
            .resizes
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, spec)| Operation::Resize { index, spec });

        reduce.into_iter().chain(backup).chain(resizes).collect()
    }
}

fn parse_group<T: serde::de::DeserializeOwned>(
    value: Option<&Value>,
    group: &'static str,
) -> Result<Option<T>, ConfigError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v @ Value::Object(_)) => serde_json::from_value(v.clone())
            .map(Some)
            .map_err(|e| ConfigError::InvalidGroup {
                group,
                message: e.to_string(),
            }),
        Some(other) => Err(ConfigError::InvalidGroup {
            group,
            message: format!("expected an object, got {}", json_type(other)),
        }),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// One unit of work derived from [`Config`].
///
/// Each variant carries everything the transform and naming steps need, so
/// operations can run independently of each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Reduce(ReduceConfig),
    Backup(BackupConfig),
    /// `index` is the entry's position in `resizes`.
    Resize { index: usize, spec: ResizeConfig },
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Reduce(_) => f.write_str("reduce"),
            Operation::Backup(_) => f.write_str("backup"),
            Operation::Resize { index, spec } => {
                write!(f, "resizes[{index}] ({}px", spec.size)?;
                if let Some(format) = spec.format {
                    write!(f, ", {format}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Resolve the effective rayon thread count.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (callers can constrain down, not up)
pub fn effective_threads(requested: Option<usize>) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    requested
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    // =========================================================================
    // Parsing
    // =========================================================================

    #[test]
    fn empty_object_has_no_operations() {
        let config = Config::from_value(&json!({})).unwrap();
        assert!(config.is_empty());
        assert!(config.operations().is_empty());
    }

    #[test]
    fn empty_groups_use_defaults() {
        let config = Config::from_value(&json!({ "reduce": {}, "backup": {} })).unwrap();
        assert_eq!(config.reduce, Some(ReduceConfig::default()));
        assert_eq!(
            config.backup,
            Some(BackupConfig {
                prefix: String::new(),
                suffix: String::new(),
            })
        );
    }

    #[test]
    fn null_group_is_absent() {
        let config = Config::from_value(&json!({ "reduce": null, "resizes": null })).unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config = Config::from_value(&json!({
            "acl": "public-read",
            "reduce": { "bucket": "foo", "quality": 80, "acl": "private" },
            "resizes": [{ "size": 100, "gravity": "center" }]
        }))
        .unwrap();

        assert_eq!(config.reduce.unwrap().bucket.as_deref(), Some("foo"));
        assert_eq!(config.resizes, vec![ResizeConfig::new(100)]);
    }

    #[test]
    fn full_resize_entry() {
        let config = Config::from_json(
            r#"{"resizes": [{"size": 100, "quality": 90, "format": "PNG", "changeExtension": true}]}"#,
        )
        .unwrap();

        assert_eq!(
            config.resizes[0],
            ResizeConfig {
                size: 100,
                quality: Some(90),
                format: Some(OutputFormat::Png),
                change_extension: true,
            }
        );
    }

    #[test]
    fn snake_case_change_extension_alias() {
        let config =
            Config::from_value(&json!({"resizes": [{"size": 1, "change_extension": true}]}))
                .unwrap();
        assert!(config.resizes[0].change_extension);
    }

    // =========================================================================
    // Invalid input
    // =========================================================================

    #[test]
    fn missing_size_names_index() {
        let err = Config::from_value(&json!({
            "resizes": [{ "size": 100 }, { "quality": 50 }]
        }))
        .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidResize { index: 1, .. }));
        assert!(err.to_string().contains("resizes[1]"));
    }

    #[test]
    fn non_positive_size_fails() {
        for size in [0, -5] {
            let err = Config::from_value(&json!({ "resizes": [{ "size": size }] })).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidResize { index: 0, .. }));
        }
    }

    #[test]
    fn oversized_size_fails() {
        let err =
            Config::from_value(&json!({ "resizes": [{ "size": 10_000_000_000i64 }] })).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn size_above_max_dimension_fails() {
        let err = Config::from_value(&json!({
            "resizes": [{ "size": 100 }, { "size": 4_000_000_000u64 }]
        }))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidResize { index: 1, .. }));
        assert!(err.to_string().contains("16384"), "{err}");
    }

    #[test]
    fn size_at_max_dimension_accepted() {
        let config =
            Config::from_value(&json!({ "resizes": [{ "size": MAX_DIMENSION }] })).unwrap();
        assert_eq!(config.resizes[0].size, MAX_DIMENSION);
    }

    #[test]
    fn fractional_size_fails() {
        let err = Config::from_value(&json!({ "resizes": [{ "size": 10.5 }] })).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidResize { index: 0, .. }));
    }

    #[test]
    fn quality_out_of_range_fails() {
        for quality in [0, 101, -1] {
            let err = Config::from_value(&json!({
                "resizes": [{ "size": 10 }, { "size": 10 }, { "size": 10, "quality": quality }]
            }))
            .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidResize { index: 2, .. }));
            assert!(err.to_string().contains("quality"));
        }
    }

    #[test]
    fn quality_boundaries_accepted() {
        let config = Config::from_value(&json!({
            "resizes": [{ "size": 10, "quality": 1 }, { "size": 10, "quality": 100 }]
        }))
        .unwrap();
        assert_eq!(config.resizes[0].quality, Some(1));
        assert_eq!(config.resizes[1].quality, Some(100));
    }

    #[test]
    fn unknown_format_fails() {
        let err =
            Config::from_value(&json!({ "resizes": [{ "size": 10, "format": "bmp" }] })).unwrap_err();
        assert!(err.to_string().contains("bmp"));
    }

    #[test]
    fn wrong_group_types_fail() {
        let err = Config::from_value(&json!({ "reduce": true })).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidGroup { group: "reduce", .. }));

        let err = Config::from_value(&json!({ "backup": { "prefix": 3 } })).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidGroup { group: "backup", .. }));

        let err = Config::from_value(&json!({ "resizes": { "size": 3 } })).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidGroup { group: "resizes", .. }));
    }

    #[test]
    fn non_object_root_fails() {
        assert!(matches!(
            Config::from_value(&json!([1, 2])),
            Err(ConfigError::NotAnObject)
        ));
        assert!(matches!(
            Config::from_json("not json"),
            Err(ConfigError::Json(_))
        ));
    }

    // =========================================================================
    // Validation of configs built in code
    // =========================================================================

    #[test]
    fn validate_rejects_zero_size() {
        let config = Config {
            resizes: vec![ResizeConfig::new(10), ResizeConfig::new(0)],
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidResize { index: 1, .. })
        ));
    }

    #[test]
    fn validate_rejects_size_above_max_dimension() {
        let config = Config {
            resizes: vec![ResizeConfig::new(MAX_DIMENSION + 1)],
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidResize { index: 0, .. })
        ));
    }

    #[test]
    fn validate_rejects_bad_quality() {
        let config = Config {
            resizes: vec![ResizeConfig {
                quality: Some(0),
                ..ResizeConfig::new(10)
            }],
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(Config::default().validate().is_ok());
    }

    // =========================================================================
    // Expansion
    // =========================================================================

    #[test]
    fn operations_follow_fixed_order() {
        // Key order in the input must not matter
        let config = Config::from_value(&json!({
            "resizes": [{ "size": 300 }, { "size": 100, "format": "gif" }],
            "backup": { "prefix": "a_" },
            "reduce": {}
        }))
        .unwrap();

        let ops = config.operations();
        assert_eq!(ops.len(), 4);
        assert!(matches!(ops[0], Operation::Reduce(_)));
        assert!(matches!(ops[1], Operation::Backup(_)));
        assert!(matches!(&ops[2], Operation::Resize { index: 0, spec } if spec.size == 300));
        assert!(matches!(&ops[3], Operation::Resize { index: 1, spec } if spec.size == 100));
    }

    #[test]
    fn operation_labels() {
        let config = Config::from_value(&json!({
            "reduce": {},
            "backup": {},
            "resizes": [{ "size": 300 }, { "size": 100, "format": "gif" }]
        }))
        .unwrap();

        let labels: Vec<String> = config.operations().iter().map(|o| o.to_string()).collect();
        assert_eq!(
            labels,
            vec!["reduce", "backup", "resizes[0] (300px)", "resizes[1] (100px, gif)"]
        );
    }

    // =========================================================================
    // Loading
    // =========================================================================

    #[test]
    fn load_reads_json_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(&path, r#"{"backup": {"suffix": "_b"}}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.backup.unwrap().suffix, "_b");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = Config::load(&tmp.path().join("nope.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    // =========================================================================
    // Threads
    // =========================================================================

    #[test]
    fn effective_threads_never_exceeds_cores() {
        let cores = effective_threads(None);
        assert!(cores >= 1);
        assert_eq!(effective_threads(Some(usize::MAX)), cores);
        assert_eq!(effective_threads(Some(1)), 1);
        assert_eq!(effective_threads(Some(0)), 1);
    }
}
