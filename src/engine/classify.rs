//! Verdict refinement with the borderline threshold

use crate::engine::margin::RawVerdict;
use crate::records::Verdict;

/// Refine a raw verdict into PASS, BORDERLINE, or FAIL.
///
/// BORDERLINE only warns about passing measurements that sit at or under
/// the threshold; a genuine failure is never demoted.
pub fn classify(margin_pct: f64, raw_verdict: RawVerdict, borderline_threshold: f64) -> Verdict {
    if raw_verdict == RawVerdict::Fail {
        return Verdict::Fail;
    }
    if margin_pct <= borderline_threshold {
        return Verdict::Borderline;
    }
    Verdict::Pass
}
