//! Join & aggregate engine - streams measurements through the index,
//! margin calculator, and classifier

use serde::Serialize;
use std::collections::BTreeMap;

use crate::engine::classify::classify;
use crate::engine::index::SpecIndex;
use crate::engine::margin::{margin, SpecWindow};
use crate::engine::parse_float;
use crate::records::{ClassifiedItem, MeasurementRecord, PartSummary, RunMeta, RunResult};

/// Warning event for a measurement whose value could not be parsed.
/// The row index is 1-based, matching the input's row numbering.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedMeasurement {
    /// 1-based position in the input sequence
    pub row: usize,

    /// The offending record, unmodified
    pub record: MeasurementRecord,
}

/// Output of one engine run: the result plus the warning events the
/// surrounding tool is responsible for surfacing. Skipped rows appear in
/// no counts or summaries.
#[derive(Debug)]
pub struct JoinOutcome {
    pub result: RunResult,
    pub skipped: Vec<SkippedMeasurement>,
}

/// Run the engine over an ordered measurement batch.
///
/// Per measurement, in input order: parse the value (skip-and-warn on
/// failure), look up the specification, resolve the display unit, compute
/// margin and verdict, append the item, and update the part summary. For
/// fixed inputs and threshold the outcome is fully deterministic.
pub fn run(
    measurements: &[MeasurementRecord],
    index: &SpecIndex,
    borderline_threshold: f64,
    meta: RunMeta,
) -> JoinOutcome {
    let mut items: Vec<ClassifiedItem> = Vec::with_capacity(measurements.len());
    let mut parts_summary: BTreeMap<String, PartSummary> = BTreeMap::new();
    let mut skipped: Vec<SkippedMeasurement> = Vec::new();

    for (i, meas) in measurements.iter().enumerate() {
        let value = match parse_float(&meas.measured_value) {
            Some(v) => v,
            None => {
                skipped.push(SkippedMeasurement {
                    row: i + 1,
                    record: meas.clone(),
                });
                continue;
            }
        };

        let part_id = meas.part_id.trim().to_string();
        let measurement_type = meas.measurement_type.trim().to_string();
        let spec = index.lookup(&part_id, &measurement_type);

        // Prefer the measurement's own unit, fall back to the spec's
        let unit = meas
            .unit
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| spec.unit.clone());

        let window = SpecWindow::from_bounds(spec.spec_min, spec.spec_max);
        let (margin_pct, raw_verdict) = margin(value, window);
        let verdict = classify(margin_pct, raw_verdict, borderline_threshold);

        items.push(ClassifiedItem {
            part_id: part_id.clone(),
            part_name: spec.part_name.clone(),
            category: spec.category.clone(),
            measurement_type,
            measured_value: value,
            unit,
            spec_min: spec.spec_min,
            spec_max: spec.spec_max,
            critical: spec.critical,
            margin_pct,
            verdict,
            inspector: meas.inspector.trim().to_string(),
            date: meas.date.trim().to_string(),
        });

        let summary = parts_summary.entry(part_id).or_insert_with(|| PartSummary {
            part_name: spec.part_name,
            category: spec.category,
            measurement_count: 0,
            item_indices: Vec::new(),
        });
        summary.measurement_count += 1;
        summary.item_indices.push(items.len() - 1);
    }

    JoinOutcome {
        result: RunResult {
            meta,
            items,
            parts_summary,
        },
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::index::DuplicatePolicy;
    use crate::records::{SpecRecord, Verdict};

    fn spec_record(part_id: &str, mtype: &str, min: &str, max: &str) -> SpecRecord {
        SpecRecord {
            part_id: part_id.to_string(),
            measurement_type: mtype.to_string(),
            part_name: "Bearing Housing".to_string(),
            category: "machined".to_string(),
            spec_min: min.to_string(),
            spec_max: max.to_string(),
            unit: "mm".to_string(),
            critical: "true".to_string(),
        }
    }

    fn measurement(part_id: &str, mtype: &str, value: &str) -> MeasurementRecord {
        MeasurementRecord::new(part_id, mtype, value)
    }

    fn meta() -> RunMeta {
        RunMeta {
            measurements_file: "measurements.csv".to_string(),
            specifications_file: "specifications.csv".to_string(),
            extraction_timestamp: "2024-03-02T09:30:00Z".parse().unwrap(),
        }
    }

    fn index(records: &[SpecRecord]) -> SpecIndex {
        SpecIndex::build(records, DuplicatePolicy::Overwrite).unwrap()
    }

    #[test]
    fn test_join_classifies_in_input_order() {
        let idx = index(&[spec_record("P-001", "diameter", "10", "20")]);
        let measurements = vec![
            measurement("P-001", "diameter", "15"),
            measurement("P-001", "diameter", "22"),
            measurement("P-001", "diameter", "10"),
        ];

        let outcome = run(&measurements, &idx, 10.0, meta());
        let items = &outcome.result.items;

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].margin_pct, 50.0);
        assert_eq!(items[0].verdict, Verdict::Pass);
        assert_eq!(items[1].margin_pct, -20.0);
        assert_eq!(items[1].verdict, Verdict::Fail);
        // Boundary value: zero margin, passing, flagged borderline
        assert_eq!(items[2].margin_pct, 0.0);
        assert_eq!(items[2].verdict, Verdict::Borderline);
    }

    #[test]
    fn test_unparsable_value_skipped_with_warning() {
        let idx = index(&[spec_record("P-001", "diameter", "10", "20")]);
        let measurements = vec![
            measurement("P-001", "diameter", "15"),
            measurement("P-001", "diameter", "not-a-number"),
            measurement("P-001", "diameter", "18"),
        ];

        let outcome = run(&measurements, &idx, 10.0, meta());

        assert_eq!(outcome.result.items.len(), 2);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].row, 2);
        assert_eq!(outcome.skipped[0].record.measured_value, "not-a-number");
        // Skipped rows appear in no counts
        let summary = &outcome.result.parts_summary["P-001"];
        assert_eq!(summary.measurement_count, 2);
        assert_eq!(summary.item_indices, vec![0, 1]);
    }

    #[test]
    fn test_unmatched_specification_auto_passes() {
        let idx = index(&[]);
        let measurements = vec![measurement("P-404", "weight", "123.4")];

        let outcome = run(&measurements, &idx, 10.0, meta());
        let item = &outcome.result.items[0];

        assert_eq!(item.margin_pct, 100.0);
        assert_eq!(item.verdict, Verdict::Pass);
        assert_eq!(item.spec_min, None);
        assert_eq!(item.spec_max, None);
        assert_eq!(item.part_name, "");
        assert_eq!(item.unit, "");
        assert!(!item.critical);
    }

    #[test]
    fn test_unit_prefers_measurement_over_spec() {
        let idx = index(&[spec_record("P-001", "diameter", "10", "20")]);

        let mut with_unit = measurement("P-001", "diameter", "15");
        with_unit.unit = Some("um".to_string());
        let without_unit = measurement("P-001", "diameter", "15");
        let mut blank_unit = measurement("P-001", "diameter", "15");
        blank_unit.unit = Some("  ".to_string());

        let outcome = run(&[with_unit, without_unit, blank_unit], &idx, 10.0, meta());

        assert_eq!(outcome.result.items[0].unit, "um");
        assert_eq!(outcome.result.items[1].unit, "mm");
        assert_eq!(outcome.result.items[2].unit, "mm");
    }

    #[test]
    fn test_part_summary_created_lazily_and_accumulated() {
        let idx = index(&[
            spec_record("P-001", "diameter", "10", "20"),
            spec_record("P-002", "weight", "", "50"),
        ]);
        let measurements = vec![
            measurement("P-001", "diameter", "15"),
            measurement("P-002", "weight", "45"),
            measurement("P-001", "diameter", "11"),
        ];

        let outcome = run(&measurements, &idx, 10.0, meta());
        let parts = &outcome.result.parts_summary;

        assert_eq!(parts.len(), 2);
        assert_eq!(parts["P-001"].measurement_count, 2);
        assert_eq!(parts["P-001"].item_indices, vec![0, 2]);
        assert_eq!(parts["P-001"].part_name, "Bearing Housing");
        assert_eq!(parts["P-002"].measurement_count, 1);
        assert_eq!(parts["P-002"].item_indices, vec![1]);
    }

    #[test]
    fn test_keys_trimmed_before_lookup() {
        let idx = index(&[spec_record("P-001", "diameter", "10", "20")]);
        let measurements = vec![measurement("  P-001 ", " diameter ", "15")];

        let outcome = run(&measurements, &idx, 10.0, meta());
        let item = &outcome.result.items[0];

        assert_eq!(item.part_id, "P-001");
        assert_eq!(item.measurement_type, "diameter");
        assert_eq!(item.spec_min, Some(10.0));
        assert!(outcome.result.parts_summary.contains_key("P-001"));
    }

    #[test]
    fn test_one_sided_zero_bound_short_circuit() {
        let idx = index(&[spec_record("P-001", "runout", "", "0")]);
        let measurements = vec![
            measurement("P-001", "runout", "5"),
            measurement("P-001", "runout", "-3"),
        ];

        let outcome = run(&measurements, &idx, 10.0, meta());

        assert_eq!(outcome.result.items[0].margin_pct, -100.0);
        assert_eq!(outcome.result.items[0].verdict, Verdict::Fail);
        assert_eq!(outcome.result.items[1].margin_pct, 100.0);
        assert_eq!(outcome.result.items[1].verdict, Verdict::Pass);
    }

    #[test]
    fn test_run_is_idempotent() {
        let idx = index(&[spec_record("P-001", "diameter", "10", "20")]);
        let measurements = vec![
            measurement("P-001", "diameter", "15"),
            measurement("P-001", "diameter", "bad"),
            measurement("P-001", "diameter", "19.5"),
        ];

        let first = run(&measurements, &idx, 10.0, meta());
        let second = run(&measurements, &idx, 10.0, meta());

        let a = serde_json::to_string(&first.result).unwrap();
        let b = serde_json::to_string(&second.result).unwrap();
        assert_eq!(a, b);
    }
}
