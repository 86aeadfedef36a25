use std::{str::FromStr, sync::OnceLock};

use dashu::float::DBig;

use crate::util::num::{MAX_LITERAL_EXPONENT, decimal_from_f64, decimal_to_f64};

/// A numeric constant with a binary float and a decimal representation.
///
/// The float is fixed at construction. The decimal is either supplied up
/// front (literals parsed from text, folded constants) or derived from the
/// float the first time decimal mode asks for it and cached afterwards.
///
/// The cache is a [`OnceLock`], so concurrent first requests derive the same
/// value and exactly one write is kept.
#[derive(Debug, Clone)]
pub struct Number {
    double:  f64,
    decimal: OnceLock<DBig>,
    derived: bool,
}

impl Number {
    /// Parses decimal literal text such as `0.1`, `.5`, `1.` or `2.5e-3`.
    ///
    /// The decimal keeps every digit of the text; the float is derived from
    /// the decimal.
    ///
    /// # Returns
    /// `None` if the text is not a decimal number, or if its exponent is
    /// larger in magnitude than
    /// [`MAX_LITERAL_EXPONENT`](crate::util::num::MAX_LITERAL_EXPONENT).
    ///
    /// # Example
    /// ```
    /// use decimath::interpreter::value::number::Number;
    ///
    /// let n = Number::from_literal("0.1").unwrap();
    /// assert_eq!(n.as_f64(), 0.1);
    /// assert_eq!(n.as_decimal().unwrap().to_string(), "0.1");
    /// ```
    #[must_use]
    pub fn from_literal(text: &str) -> Option<Self> {
        let (mantissa, exponent) = match text.find(['e', 'E']) {
            Some(index) => text.split_at(index),
            None => (text, ""),
        };
        if mantissa.is_empty() || mantissa == "." {
            return None;
        }
        let exponent = match exponent.get(1..) {
            Some(digits) => {
                let value = digits.parse::<i64>().ok()?;
                if value.unsigned_abs() > MAX_LITERAL_EXPONENT.unsigned_abs() {
                    return None;
                }
                Some(value)
            },
            None => None,
        };
        let mut normalized = String::with_capacity(text.len() + 2);
        if mantissa.starts_with('.') {
            normalized.push('0');
        }
        normalized.push_str(mantissa);
        if mantissa.ends_with('.') {
            normalized.push('0');
        }
        if let Some(exponent) = exponent {
            normalized.push_str(&format!("e{exponent}"));
        }
        DBig::from_str(&normalized).ok().map(Self::from_decimal)
    }

    /// Builds a number from a decimal; the float is derived immediately.
    #[must_use]
    pub fn from_decimal(value: DBig) -> Self {
        Self { double:  decimal_to_f64(&value),
               decimal: OnceLock::from(value),
               derived: false, }
    }

    /// Builds a number from a float; the decimal is derived lazily.
    #[must_use]
    pub const fn from_f64(value: f64) -> Self {
        Self { double:  value,
               decimal: OnceLock::new(),
               derived: true, }
    }

    /// Builds a number whose two representations were computed separately.
    pub(crate) fn with_both(double: f64, decimal: DBig) -> Self {
        Self { double,
               decimal: OnceLock::from(decimal),
               derived: false }
    }

    /// The binary float representation.
    #[must_use]
    pub const fn as_f64(&self) -> f64 {
        self.double
    }

    /// The decimal representation, derived from the float on first use.
    ///
    /// # Returns
    /// `None` when the float is infinite or NaN.
    #[must_use]
    pub fn as_decimal(&self) -> Option<&DBig> {
        if let Some(decimal) = self.decimal.get() {
            return Some(decimal);
        }
        let decimal = decimal_from_f64(self.double)?;
        Some(self.decimal.get_or_init(|| decimal))
    }

    /// Whether the decimal representation is already available without
    /// deriving it.
    #[must_use]
    pub fn has_decimal(&self) -> bool {
        self.decimal.get().is_some()
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl From<DBig> for Number {
    fn from(value: DBig) -> Self {
        Self::from_decimal(value)
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self.decimal.get(), other.decimal.get()) {
            (Some(a), Some(b)) if !self.derived && !other.derived => a == b,
            _ => self.double.to_bits() == other.double.to_bits(),
        }
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.decimal.get() {
            Some(decimal) if !self.derived => write!(f, "{decimal}"),
            _ => write!(f, "{}", self.double),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_keeps_all_digits() {
        let text = "0.1000000000000000000000000000000001";
        let n = Number::from_literal(text).unwrap();
        assert_eq!(n.as_decimal(), Some(&DBig::from_str(text).unwrap()));
        assert!((n.as_f64() - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn float_number_derives_decimal_lazily() {
        let n = Number::from_f64(0.25);
        assert!(!n.has_decimal());

        let first = n.as_decimal().cloned();
        assert!(n.has_decimal());
        assert_eq!(first, Some(DBig::from_str("0.25").unwrap()));
        assert_eq!(n.as_decimal().cloned(), first);
    }

    #[test]
    fn infinite_float_has_no_decimal() {
        let n = Number::from_f64(f64::INFINITY);
        assert!(n.as_decimal().is_none());
        assert!(!n.has_decimal());
    }

    #[test]
    fn display_does_not_depend_on_the_cache() {
        let n = Number::from_f64(1.5);
        let before = n.to_string();
        let _ = n.as_decimal();
        assert_eq!(n.to_string(), before);
        assert_eq!(before, "1.5");
    }

    #[test]
    fn bare_point_literals() {
        assert_eq!(Number::from_literal(".5").unwrap().as_f64(), 0.5);
        assert_eq!(Number::from_literal("1.").unwrap().as_f64(), 1.0);
        assert_eq!(Number::from_literal("1.e2").unwrap().as_f64(), 100.0);
        assert!(Number::from_literal(".").is_none());
    }

    #[test]
    fn invalid_literal_is_rejected() {
        assert!(Number::from_literal("1..2").is_none());
        assert!(Number::from_literal("abc").is_none());
    }

    #[test]
    fn literal_exponent_is_bounded() {
        assert!(Number::from_literal("1e9999").is_some());
        assert!(Number::from_literal("1E-9999").is_some());
        assert!(Number::from_literal("1e+12").is_some());
        assert!(Number::from_literal("1e10000").is_none());
        assert!(Number::from_literal("1e-100000000").is_none());
        assert!(Number::from_literal("1e99999999999999999999").is_none());
    }

    #[test]
    fn literal_float_is_the_nearest_double() {
        for text in ["0.00000000000006076808",
                     "0.6076808e-13",
                     "0.0000000000000000004337930725",
                     "7.0e-300",
                     "0.1"]
        {
            assert_eq!(Number::from_literal(text).unwrap().as_f64().to_bits(),
                       text.parse::<f64>().unwrap().to_bits(),
                       "{text}");
        }
    }

    #[test]
    fn concurrent_first_access_agrees() {
        let n = Number::from_f64(3.75);
        let results: Vec<DBig> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4).map(|_| s.spawn(|| n.as_decimal().cloned().unwrap()))
                                        .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(results.iter().all(|d| *d == results[0]));
    }
}
