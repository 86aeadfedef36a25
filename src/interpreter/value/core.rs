use dashu::float::DBig;

use crate::util::num::{decimal_from_f64, decimal_to_f64};

/// The result of evaluating a tree in one mode.
///
/// The variant always matches the mode the evaluation was requested in.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A binary floating-point result.
    Double(f64),
    /// An arbitrary-precision decimal result.
    Decimal(DBig),
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<DBig> for Value {
    fn from(v: DBig) -> Self {
        Self::Decimal(v)
    }
}

impl Value {
    /// Returns the value as an `f64`, converting a decimal to the nearest
    /// float.
    ///
    /// # Example
    /// ```
    /// use decimath::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::Double(2.5).as_f64(), 2.5);
    /// ```
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Double(v) => *v,
            Self::Decimal(d) => decimal_to_f64(d),
        }
    }

    /// Returns the value as a decimal, or `None` for a non-finite float.
    #[must_use]
    pub fn as_decimal(&self) -> Option<DBig> {
        match self {
            Self::Double(v) => decimal_from_f64(*v),
            Self::Decimal(d) => Some(d.clone()),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Double(v) => write!(f, "{v}"),
            Self::Decimal(d) => write!(f, "{d}"),
        }
    }
}
