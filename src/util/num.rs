use std::str::FromStr;

use dashu::float::DBig;

/// Largest integer magnitude accepted as a decimal exponent.
pub const MAX_DECIMAL_EXPONENT: i64 = 999_999_999;

/// Largest magnitude of the `e` exponent in a numeric literal.
pub const MAX_LITERAL_EXPONENT: i64 = 9_999;

/// Converts an `f64` to a decimal through its shortest round-trip text.
///
/// The result is the decimal a reader sees when printing the float, so
/// `0.1_f64` becomes exactly `0.1` and not the binary expansion of the float.
///
/// ## Returns
/// - `Some(DBig)`: The decimal if the float is finite.
/// - `None`: For infinities and NaN, which have no decimal counterpart.
///
/// ## Example
/// ```
/// use std::str::FromStr;
///
/// use dashu::float::DBig;
/// use decimath::util::num::decimal_from_f64;
///
/// assert_eq!(decimal_from_f64(0.1), Some(DBig::from_str("0.1").unwrap()));
/// assert_eq!(decimal_from_f64(f64::INFINITY), None);
/// ```
#[must_use]
pub fn decimal_from_f64(value: f64) -> Option<DBig> {
    if !value.is_finite() {
        return None;
    }
    DBig::from_str(&value.to_string()).ok()
}

/// Converts a decimal to the nearest `f64`, ties to even.
///
/// The significand and exponent are handed to the standard float parser as
/// `<digits>e<exponent>` text, which rounds correctly. Values beyond the
/// float range become infinities or zeros.
///
/// ## Example
/// ```
/// use std::str::FromStr;
///
/// use dashu::float::DBig;
/// use decimath::util::num::decimal_to_f64;
///
/// let tiny = DBig::from_str("0.00000000000006076808").unwrap();
/// assert_eq!(decimal_to_f64(&tiny), 6.076808e-14);
/// ```
#[must_use]
pub fn decimal_to_f64(value: &DBig) -> f64 {
    let repr = value.repr();
    format!("{}e{}", repr.significand(), repr.exponent()).parse::<f64>()
                                                         .unwrap_or_else(|_| value.to_f64().value())
}

/// Returns `true` when the decimal has no fractional part.
#[must_use]
pub fn is_integral(value: &DBig) -> bool {
    value.fract().repr().is_zero()
}

/// Converts an integral decimal to `i64` if its magnitude is at most
/// [`MAX_DECIMAL_EXPONENT`].
///
/// ## Returns
/// - `Some(i64)`: The integer value.
/// - `None`: If the value is fractional or out of range.
///
/// ## Example
/// ```
/// use std::str::FromStr;
///
/// use dashu::float::DBig;
/// use decimath::util::num::decimal_to_exponent;
///
/// assert_eq!(decimal_to_exponent(&DBig::from_str("-12").unwrap()), Some(-12));
/// assert_eq!(decimal_to_exponent(&DBig::from_str("1.5").unwrap()), None);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn decimal_to_exponent(value: &DBig) -> Option<i64> {
    if !is_integral(value) {
        return None;
    }
    let as_float = decimal_to_f64(value);
    if as_float.abs() > MAX_DECIMAL_EXPONENT as f64 {
        return None;
    }
    Some(as_float as i64)
}
