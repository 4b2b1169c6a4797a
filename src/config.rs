use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::model::DEFAULT_NULL;
use crate::data::quality::AliasMap;

/// Sample interval assumed when a source gives no geometry: half a foot.
pub const DEFAULT_STEP: f64 = 0.1524;

// ---------------------------------------------------------------------------
// Ingestion options
// ---------------------------------------------------------------------------

/// Settings applied to every curve a loader produces.
///
/// Every field has a default, so a partial JSON object is enough:
///
/// ```json
/// { "null": -9999.0, "basis_units": "ft" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestOptions {
    /// Fallback step when the basis column cannot provide one.
    pub step: f64,
    pub run: i64,
    /// Values equal to this sentinel are read as missing.
    pub null: f64,
    pub service_company: Option<String>,
    pub date: Option<String>,
    pub basis_units: Option<String>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            run: -1,
            null: DEFAULT_NULL,
            service_company: None,
            date: None,
            basis_units: None,
        }
    }
}

impl IngestOptions {
    /// Read options from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading options file {}", path.display()))?;
        serde_json::from_str(&text).context("parsing ingest options")
    }

    /// Whether `v` is the missing-value sentinel.
    pub fn is_null(&self, v: f64) -> bool {
        v.is_nan() || (v - self.null).abs() < 1e-9
    }
}

// ---------------------------------------------------------------------------
// Alias files
// ---------------------------------------------------------------------------

/// Load an alias map from JSON: `{ "Gamma": ["GR", "GRC"], ... }`.
pub fn load_alias_map(path: &Path) -> Result<AliasMap> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading alias file {}", path.display()))?;
    serde_json::from_str(&text).context("parsing alias map")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let opts: IngestOptions = serde_json::from_str(r#"{ "null": -9999.0 }"#).unwrap();
        assert_eq!(opts.null, -9999.0);
        assert_eq!(opts.step, DEFAULT_STEP);
        assert_eq!(opts.run, -1);
    }

    #[test]
    fn null_detection() {
        let opts = IngestOptions::default();
        assert!(opts.is_null(-999.25));
        assert!(opts.is_null(f64::NAN));
        assert!(!opts.is_null(0.0));
    }

    #[test]
    fn alias_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alias.json");
        std::fs::write(&path, r#"{ "Gamma": ["GR", "GRC"] }"#).unwrap();
        let alias = load_alias_map(&path).unwrap();
        assert_eq!(alias["Gamma"], vec!["GR", "GRC"]);
        assert!(load_alias_map(&dir.path().join("missing.json")).is_err());
    }
}
