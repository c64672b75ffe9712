//! Decimal to American odds conversion.
//!
//! Rounding is half away from zero (`f64::round`), so 112.5 becomes 113
//! and -112.5 becomes -113.

use crate::error::OddsError;

/// Convert decimal odds to American odds.
///
/// Prices at or above 2.0 take the underdog branch, so even money is +100.
pub fn decimal_to_american(decimal: f64) -> Result<i64, OddsError> {
    if !decimal.is_finite() || decimal <= 1.0 {
        return Err(OddsError::InvalidOdds(decimal));
    }

    let american = if decimal >= 2.0 {
        (decimal - 1.0) * 100.0
    } else {
        -100.0 / (decimal - 1.0)
    };

    let rounded = american.round();
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
    if !rounded.is_finite() || rounded >= i64::MAX as f64 || rounded < i64::MIN as f64 {
        return Err(OddsError::InvalidOdds(decimal));
    }

    Ok(rounded as i64)
}
