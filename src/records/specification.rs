//! Specification records - tolerance limits keyed by part and measurement type

use serde::{Deserialize, Serialize};

/// A raw specification row, as handed over by an input adapter.
///
/// Bounds and the criticality flag are kept as raw strings; the index
/// resolves them when it is built. Invariant lower <= upper is not checked
/// here - an inverted window simply fails every value at margin time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpecRecord {
    /// Part identifier this specification applies to
    pub part_id: String,

    /// Physical quantity the limits constrain
    pub measurement_type: String,

    /// Human-readable part name
    #[serde(default)]
    pub part_name: String,

    /// Category label for grouping in reports
    #[serde(default)]
    pub category: String,

    /// Raw lower bound field (empty means no lower bound)
    #[serde(default)]
    pub spec_min: String,

    /// Raw upper bound field (empty means no upper bound)
    #[serde(default)]
    pub spec_max: String,

    /// Display unit
    #[serde(default)]
    pub unit: String,

    /// Raw criticality flag ("true", case-insensitively, marks critical)
    #[serde(default)]
    pub critical: String,
}

/// Resolved specification fields, as stored in the index.
///
/// The `Default` value doubles as the "empty" specification returned for
/// measurements with no matching entry: no bounds, blank labels, not
/// critical. The margin calculator treats that as unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Specification {
    /// Human-readable part name
    pub part_name: String,

    /// Category label
    pub category: String,

    /// Lower bound, if any
    pub spec_min: Option<f64>,

    /// Upper bound, if any
    pub spec_max: Option<f64>,

    /// Display unit
    pub unit: String,

    /// Critical characteristic flag
    pub critical: bool,
}

impl Specification {
    /// True when neither bound is present
    pub fn is_unconstrained(&self) -> bool {
        self.spec_min.is_none() && self.spec_max.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_specification_is_unconstrained() {
        let spec = Specification::default();
        assert!(spec.is_unconstrained());
        assert!(!spec.critical);
        assert_eq!(spec.unit, "");
    }

    #[test]
    fn test_spec_record_defaults() {
        let json = r#"{"part_id": "P-001", "measurement_type": "diameter"}"#;
        let rec: SpecRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.part_id, "P-001");
        assert_eq!(rec.spec_min, "");
        assert_eq!(rec.spec_max, "");
        assert_eq!(rec.critical, "");
    }

    #[test]
    fn test_specification_roundtrip() {
        let spec = Specification {
            part_name: "Bearing Housing".to_string(),
            category: "machined".to_string(),
            spec_min: Some(24.98),
            spec_max: Some(25.02),
            unit: "mm".to_string(),
            critical: true,
        };

        let json = serde_json::to_string(&spec).unwrap();
        let parsed: Specification = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, spec);
        assert!(!parsed.is_unconstrained());
    }
}
