//! Measurement record - one observed value as supplied by an input adapter

use serde::{Deserialize, Serialize};

/// A single measurement row, as handed over by an input adapter.
///
/// The value is kept as the raw string it arrived with; parsing it is the
/// join engine's job, so an unparsable value can be skipped with a warning
/// instead of failing the whole batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeasurementRecord {
    /// Part identifier this measurement belongs to
    pub part_id: String,

    /// Physical quantity measured (e.g., a dimension or weight)
    pub measurement_type: String,

    /// Raw value field, not yet parsed
    pub measured_value: String,

    /// Unit as recorded with the measurement, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// Inspector label (opaque, not interpreted)
    #[serde(default)]
    pub inspector: String,

    /// Date label (opaque, not interpreted)
    #[serde(default)]
    pub date: String,
}

impl MeasurementRecord {
    /// Create a record with the three required fields
    pub fn new(
        part_id: impl Into<String>,
        measurement_type: impl Into<String>,
        measured_value: impl Into<String>,
    ) -> Self {
        Self {
            part_id: part_id.into(),
            measurement_type: measurement_type.into(),
            measured_value: measured_value.into(),
            ..Default::default()
        }
    }
}
