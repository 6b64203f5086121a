//! Run result types - classified items, per-part summaries, run metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Final classification of one measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    /// Within specification with comfortable margin
    Pass,
    /// Within specification but at or under the borderline threshold
    Borderline,
    /// Outside specification
    Fail,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Pass => write!(f, "PASS"),
            Verdict::Borderline => write!(f, "BORDERLINE"),
            Verdict::Fail => write!(f, "FAIL"),
        }
    }
}

/// A measurement joined to its specification and classified.
///
/// Spec fields are copied in at join time; for a measurement with no
/// matching specification they are all empty/absent. The verdict is a pure
/// function of (value, bounds, threshold) - no hidden state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedItem {
    /// Part identifier (trimmed)
    pub part_id: String,

    /// Part name copied from the specification
    #[serde(default)]
    pub part_name: String,

    /// Category copied from the specification
    #[serde(default)]
    pub category: String,

    /// Measurement type (trimmed)
    pub measurement_type: String,

    /// Parsed numeric value
    pub measured_value: f64,

    /// Resolved display unit (measurement's own unit, else the spec's)
    #[serde(default)]
    pub unit: String,

    /// Lower bound applied, if any
    pub spec_min: Option<f64>,

    /// Upper bound applied, if any
    pub spec_max: Option<f64>,

    /// Critical characteristic flag copied from the specification
    #[serde(default)]
    pub critical: bool,

    /// Signed margin percentage (positive = inside spec)
    pub margin_pct: f64,

    /// Classification verdict
    pub verdict: Verdict,

    /// Inspector label carried through from the measurement
    #[serde(default)]
    pub inspector: String,

    /// Date label carried through from the measurement
    #[serde(default)]
    pub date: String,
}

/// Rolling per-part aggregate.
///
/// Holds positions into the run's item list rather than owning items, so
/// the item list stays the single source of truth.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartSummary {
    /// Part name from the first specification seen for this part
    #[serde(default)]
    pub part_name: String,

    /// Category from the first specification seen for this part
    #[serde(default)]
    pub category: String,

    /// Number of classified measurements for this part
    pub measurement_count: usize,

    /// Indices into [`RunResult::items`], in input order
    #[serde(default)]
    pub item_indices: Vec<usize>,
}

/// Run metadata. The timestamp is supplied by the caller, never read
/// inside the engine, so classification itself stays deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMeta {
    /// Source identifier of the measurement data
    pub measurements_file: String,

    /// Source identifier of the specification data
    pub specifications_file: String,

    /// When the extraction ran
    pub extraction_timestamp: DateTime<Utc>,
}

/// Top-level output of one classification run.
///
/// Items keep input order; the part map is ordered so serializing the same
/// run twice yields byte-identical JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Run metadata
    pub meta: RunMeta,

    /// Classified items, one per parsed measurement, in input order
    pub items: Vec<ClassifiedItem>,

    /// Per-part summaries keyed by part identifier
    pub parts_summary: BTreeMap<String, PartSummary>,
}

impl RunResult {
    /// Count items carrying the given verdict
    pub fn count(&self, verdict: Verdict) -> usize {
        self.items.iter().filter(|i| i.verdict == verdict).count()
    }
}
