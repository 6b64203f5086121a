//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use csv::StringRecord;
use std::collections::HashMap;

/// Build a map from header name to column index
///
/// Headers are lowercased and trimmed so input files can vary in casing
/// and padding.
pub fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.to_lowercase().trim().to_string(), i))
        .collect()
}

/// Get a field value from a CSV record
///
/// Returns None for missing columns and empty cells; values are trimmed.
pub fn get_field(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    field: &str,
) -> Option<String> {
    header_map
        .get(field)
        .and_then(|&idx| record.get(idx))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Truncate a string to max_len, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}

/// Format a specification range for display (e.g., "24.98~25.02mm")
pub fn format_spec_range(spec_min: Option<f64>, spec_max: Option<f64>, unit: &str) -> String {
    match (spec_min, spec_max) {
        (Some(min), Some(max)) => format!("{}~{}{}", min, max, unit),
        (None, Some(max)) => format!("~{}{}", max, unit),
        (Some(min), None) => format!("{}~{}", min, unit),
        (None, None) => "-".to_string(),
    }
}
