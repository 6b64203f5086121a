//! Margin calculation - normalized distance of a value from its limits
//!
//! The margin is a signed percentage of a meaningful scale (the tolerance
//! window when both bounds exist, the bound magnitude otherwise) so that
//! measurements of very different units and magnitudes can be ranked by
//! "how close to failing" consistently.

/// Raw verdict from the margin calculation, before borderline refinement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawVerdict {
    Pass,
    Fail,
}

/// The four presence combinations of (lower bound, upper bound).
///
/// Expressed as a tagged variant so every margin branch is explicit -
/// there is no fallthrough between "no bounds" and "both bounds".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpecWindow {
    /// No bounds: the measurement is unconstrained
    Unbounded,
    /// Only a lower bound
    LowerOnly(f64),
    /// Only an upper bound
    UpperOnly(f64),
    /// Both bounds present
    Both { min: f64, max: f64 },
}

impl SpecWindow {
    /// Build the window from optional bounds
    pub fn from_bounds(spec_min: Option<f64>, spec_max: Option<f64>) -> Self {
        match (spec_min, spec_max) {
            (None, None) => SpecWindow::Unbounded,
            (Some(min), None) => SpecWindow::LowerOnly(min),
            (None, Some(max)) => SpecWindow::UpperOnly(max),
            (Some(min), Some(max)) => SpecWindow::Both { min, max },
        }
    }
}

/// Round a percentage to one decimal place
fn round1(pct: f64) -> f64 {
    (pct * 10.0).round() / 10.0
}

/// Compute the signed margin percentage and raw verdict for one value.
///
/// Both bounds: the scale is the window width. Inside the window the
/// margin is the distance to the nearer limit (the binding constraint);
/// outside it is negative and grows with the excursion. A zero-width
/// window accepts exactly its single point (+100) and fails everything
/// else (-100).
///
/// One bound: the scale is the bound's magnitude. A zero-valued bound
/// short-circuits to +/-100 so there is never a division by zero.
///
/// No bounds: +100, PASS - a value cannot fail a specification that does
/// not exist.
pub fn margin(value: f64, window: SpecWindow) -> (f64, RawVerdict) {
    match window {
        SpecWindow::Unbounded => (100.0, RawVerdict::Pass),

        SpecWindow::Both { min, max } => {
            let range = max - min;
            if range == 0.0 {
                if value == min {
                    return (100.0, RawVerdict::Pass);
                }
                return (-100.0, RawVerdict::Fail);
            }

            if value < min {
                (round1(-((min - value) / range * 100.0)), RawVerdict::Fail)
            } else if value > max {
                (round1(-((value - max) / range * 100.0)), RawVerdict::Fail)
            } else {
                let dist_to_min = value - min;
                let dist_to_max = max - value;
                (
                    round1(dist_to_min.min(dist_to_max) / range * 100.0),
                    RawVerdict::Pass,
                )
            }
        }

        SpecWindow::UpperOnly(max) => {
            if value > max {
                if max == 0.0 {
                    return (-100.0, RawVerdict::Fail);
                }
                (round1(-((value - max) / max.abs() * 100.0)), RawVerdict::Fail)
            } else {
                if max == 0.0 {
                    return (100.0, RawVerdict::Pass);
                }
                (round1((max - value) / max.abs() * 100.0), RawVerdict::Pass)
            }
        }

        SpecWindow::LowerOnly(min) => {
            if value < min {
                if min == 0.0 {
                    return (-100.0, RawVerdict::Fail);
                }
                (round1(-((min - value) / min.abs() * 100.0)), RawVerdict::Fail)
            } else {
                if min == 0.0 {
                    return (100.0, RawVerdict::Pass);
                }
                (round1((value - min) / min.abs() * 100.0), RawVerdict::Pass)
            }
        }
    }
}
