//! Recovery progress estimate.
//!
//! Piecewise-linear expectation: up to 30% in the first week, 70% by day 30,
//! full recovery by day 90.

use super::disease::DiseaseInfo;

/// Expected recovery percentage on `day` since treatment started.
#[must_use]
pub fn expected_progress(day: u32) -> f64 {
    let day = f64::from(day);
    if day <= 7.0 {
        (day / 7.0 * 30.0).min(30.0)
    } else if day <= 30.0 {
        (30.0 + (day - 7.0) / 23.0 * 40.0).min(70.0)
    } else {
        (70.0 + (day - 30.0) / 60.0 * 30.0).min(100.0)
    }
}

/// Expected recovery for a disease, or 0 when it carries no recovery data.
#[must_use]
pub fn recovery_progress(info: &DiseaseInfo, day: u32) -> f64 {
    if info.recovery.is_none() {
        return 0.0;
    }
    expected_progress(day)
}
