use dashu::float::DBig;

use crate::ast::UnaryOperator;

impl UnaryOperator {
    /// Applies the operator to a float.
    ///
    /// # Example
    /// ```
    /// use decimath::ast::UnaryOperator;
    ///
    /// assert_eq!(UnaryOperator::Negate.eval_f64(5.0), -5.0);
    /// ```
    #[must_use]
    pub fn eval_f64(self, value: f64) -> f64 {
        match self {
            Self::Negate => -value,
        }
    }

    /// Applies the operator to a decimal. Negation is exact, so no context is
    /// needed.
    #[must_use]
    pub fn eval_decimal(self, value: &DBig) -> DBig {
        match self {
            Self::Negate => -value.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn negation_in_both_modes() {
        assert!(UnaryOperator::Negate.eval_f64(0.0).is_sign_negative());
        assert_eq!(UnaryOperator::Negate.eval_decimal(&DBig::from_str("1.25").unwrap()),
                   DBig::from_str("-1.25").unwrap());
    }
}
