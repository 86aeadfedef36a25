use dashu::float::DBig;

use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::decimal::MathContext},
    util::num::{decimal_from_f64, decimal_to_exponent, decimal_to_f64, is_integral},
};

impl BinaryOperator {
    /// Applies the operator to two floats with IEEE-754 semantics.
    ///
    /// Modulo is the truncated remainder (the sign follows the dividend).
    /// Division or modulo by zero gives an infinity or NaN.
    ///
    /// # Example
    /// ```
    /// use decimath::ast::BinaryOperator;
    ///
    /// assert_eq!(BinaryOperator::Pow.eval_f64(2.0, 10.0), 1024.0);
    /// assert_eq!(BinaryOperator::Mod.eval_f64(-7.0, 3.0), -1.0);
    /// assert_eq!(BinaryOperator::Div.eval_f64(1.0, 0.0), f64::INFINITY);
    /// ```
    #[must_use]
    pub fn eval_f64(self, left: f64, right: f64) -> f64 {
        match self {
            Self::Add => left + right,
            Self::Sub => left - right,
            Self::Mul => left * right,
            Self::Div => left / right,
            Self::Mod => left % right,
            Self::Pow => left.powf(right),
        }
    }

    /// Applies the operator to two decimals, rounding to `ctx`.
    ///
    /// # Parameters
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    /// - `ctx`: Precision and rounding for the result.
    /// - `position`: Byte offset reported in errors.
    ///
    /// # Errors
    /// - `DivisionByZero` for division or modulo by zero.
    /// - See [`eval_decimal_pow`](Self::eval_decimal_pow) for `^`.
    pub fn eval_decimal(self,
                        left: &DBig,
                        right: &DBig,
                        ctx: &MathContext,
                        position: usize)
                        -> EvalResult<DBig> {
        match self {
            Self::Add => Ok(ctx.add(left, right)),
            Self::Sub => Ok(ctx.sub(left, right)),
            Self::Mul => Ok(ctx.mul(left, right)),
            Self::Div => ctx.div(left, right)
                            .ok_or(RuntimeError::DivisionByZero { position }),
            Self::Mod => ctx.rem(left, right)
                            .ok_or(RuntimeError::DivisionByZero { position }),
            Self::Pow => Self::eval_decimal_pow(left, right, ctx, position),
        }
    }

    /// Evaluates `base ^ exponent` in decimal.
    ///
    /// An integral exponent is computed natively by repeated squaring. Any
    /// other exponent goes through `f64::powf`, and the float result is
    /// converted back and rounded to `ctx`; such a result is only as precise
    /// as an `f64`.
    ///
    /// # Errors
    /// - `DivisionByZero` for a zero base with a negative integral exponent.
    /// - `ExponentOutOfRange` for an integral exponent whose magnitude is
    ///   above [`MAX_DECIMAL_EXPONENT`](crate::util::num::MAX_DECIMAL_EXPONENT).
    /// - `NotRepresentable` when the float fallback gives infinity or NaN.
    ///
    /// # Example
    /// ```
    /// use std::str::FromStr;
    ///
    /// use dashu::float::DBig;
    /// use decimath::{ast::BinaryOperator, interpreter::value::decimal::MathContext};
    ///
    /// let ctx = MathContext::default();
    /// let two = DBig::from_str("2").unwrap();
    /// let half = DBig::from_str("0.5").unwrap();
    ///
    /// let exact = BinaryOperator::eval_decimal_pow(&two, &DBig::from_str("-3").unwrap(), &ctx, 0);
    /// assert_eq!(exact, Ok(DBig::from_str("0.125").unwrap()));
    ///
    /// let fallback = BinaryOperator::eval_decimal_pow(&two, &half, &ctx, 0).unwrap();
    /// assert!((fallback.to_f64().value() - 2f64.sqrt()).abs() < 1e-15);
    /// ```
    pub fn eval_decimal_pow(base: &DBig,
                            exponent: &DBig,
                            ctx: &MathContext,
                            position: usize)
                            -> EvalResult<DBig> {
        if let Some(exp) = decimal_to_exponent(exponent) {
            return ctx.powi(base, exp)
                      .ok_or(RuntimeError::DivisionByZero { position });
        }
        if is_integral(exponent) {
            return Err(RuntimeError::ExponentOutOfRange { position });
        }

        let result = decimal_to_f64(base).powf(decimal_to_f64(exponent));
        tracing::trace!(result, "fractional power through f64");
        decimal_from_f64(result).map(|decimal| ctx.round(decimal))
                                .ok_or(RuntimeError::NotRepresentable { value: result,
                                                                        position })
    }
}
