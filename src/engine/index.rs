//! Specification index - (part_id, measurement_type) lookup

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::engine::parse_float;
use crate::records::{SpecRecord, Specification};

/// How duplicate (part_id, measurement_type) keys are handled when the
/// index is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Last record wins, in input order
    #[default]
    Overwrite,
    /// Index construction fails on the first duplicate key
    Reject,
}

/// Errors from index construction
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("duplicate specification key {part_id}/{measurement_type}")]
    DuplicateKey {
        part_id: String,
        measurement_type: String,
    },
}

/// Lookup from (part_id, measurement_type) to resolved specification
/// fields. Keys are trimmed of surrounding whitespace on both build and
/// lookup. Immutable once built.
#[derive(Debug, Default)]
pub struct SpecIndex {
    map: HashMap<(String, String), Specification>,
}

impl SpecIndex {
    /// Build the index from raw specification records.
    ///
    /// Bounds that fail to parse count as absent; the criticality flag is
    /// "true" case-insensitively. Under [`DuplicatePolicy::Overwrite`] a
    /// repeated key silently replaces the earlier entry.
    pub fn build(records: &[SpecRecord], policy: DuplicatePolicy) -> Result<Self, IndexError> {
        let mut map = HashMap::new();

        for record in records {
            let key = (
                record.part_id.trim().to_string(),
                record.measurement_type.trim().to_string(),
            );

            if policy == DuplicatePolicy::Reject && map.contains_key(&key) {
                return Err(IndexError::DuplicateKey {
                    part_id: key.0,
                    measurement_type: key.1,
                });
            }

            let spec = Specification {
                part_name: record.part_name.trim().to_string(),
                category: record.category.trim().to_string(),
                spec_min: parse_float(&record.spec_min),
                spec_max: parse_float(&record.spec_max),
                unit: record.unit.trim().to_string(),
                critical: record.critical.trim().eq_ignore_ascii_case("true"),
            };
            map.insert(key, spec);
        }

        Ok(Self { map })
    }

    /// Total lookup: a missing key yields the empty specification, which
    /// the margin calculator treats as unconstrained.
    pub fn lookup(&self, part_id: &str, measurement_type: &str) -> Specification {
        self.map
            .get(&(
                part_id.trim().to_string(),
                measurement_type.trim().to_string(),
            ))
            .cloned()
            .unwrap_or_default()
    }

    /// Number of distinct keys in the index
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True when no specifications were indexed
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
