use dashu::float::DBig;

use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        evaluator::bindings::Bindings,
        value::{core::Value, decimal::MathContext},
    },
    util::num::{decimal_from_f64, decimal_to_f64},
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// The numeric semantics of one evaluation call.
///
/// Every node of the tree is evaluated in the same mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Binary floating point with IEEE-754 semantics.
    #[default]
    Double,
    /// Arbitrary-precision decimal, rounded to the given context.
    Decimal(MathContext),
}

impl Expr {
    /// Evaluates the tree in the requested mode.
    ///
    /// This is the main entry point for evaluation. The returned [`Value`]
    /// variant always matches `mode`.
    ///
    /// # Example
    /// ```
    /// use std::collections::HashMap;
    ///
    /// use decimath::{
    ///     interpreter::{
    ///         evaluator::{core::Mode, function::core::FunctionRegistry},
    ///         parser::core::parse,
    ///         value::{core::Value, decimal::MathContext},
    ///     },
    /// };
    ///
    /// let expr = parse("x * 2", &FunctionRegistry::default()).unwrap();
    /// let bindings: HashMap<String, f64> = [("x".to_string(), 1.5)].into_iter().collect();
    ///
    /// assert_eq!(expr.evaluate(&bindings, &Mode::Double), Ok(Value::Double(3.0)));
    /// let decimal = expr.evaluate(&bindings, &Mode::Decimal(MathContext::default())).unwrap();
    /// assert_eq!(decimal.as_f64(), 3.0);
    /// ```
    #[tracing::instrument(level = "debug", skip_all, fields(mode = ?mode))]
    pub fn evaluate(&self, bindings: &dyn Bindings, mode: &Mode) -> EvalResult<Value> {
        let value = match mode {
            Mode::Double => Value::Double(self.eval_f64(bindings)?),
            Mode::Decimal(ctx) => Value::Decimal(self.eval_decimal(bindings, ctx)?),
        };
        tracing::debug!(%value, "evaluated");
        Ok(value)
    }

    /// Evaluates the tree with binary floating point.
    ///
    /// Division by zero is not an error here: it produces an infinity or NaN
    /// as IEEE-754 prescribes.
    ///
    /// # Errors
    /// `UnboundVariable` when a variable is missing from `bindings`.
    pub fn eval_f64(&self, bindings: &dyn Bindings) -> EvalResult<f64> {
        match self {
            Self::Number { value, .. } => Ok(value.as_f64()),
            Self::Variable { name, position } => {
                bindings.lookup(name)
                        .ok_or_else(|| unbound(name, *position))
            },
            Self::UnaryOp { op, operand, .. } => Ok(op.eval_f64(operand.eval_f64(bindings)?)),
            Self::BinaryOp { left, op, right, .. } => {
                let left = left.eval_f64(bindings)?;
                let right = right.eval_f64(bindings)?;
                Ok(op.eval_f64(left, right))
            },
            Self::Call { function,
                         arguments,
                         .. } => {
                let args = arguments.iter()
                                    .map(|argument| argument.eval_f64(bindings))
                                    .collect::<EvalResult<Vec<_>>>()?;
                Ok(function.call_f64(&args))
            },
        }
    }

    /// Evaluates the tree with decimal arithmetic rounded to `ctx`.
    ///
    /// Literals return their stored decimal unrounded. Variables ask the
    /// binding for a decimal first and fall back to its float.
    ///
    /// # Errors
    /// - `UnboundVariable` when a variable is missing from `bindings`.
    /// - `DivisionByZero` for division or modulo by zero, or a zero base with
    ///   a negative integral exponent.
    /// - `NotRepresentable` when a float-derived value is infinite or NaN.
    /// - `ExponentOutOfRange` for an integral exponent too large to compute.
    pub fn eval_decimal(&self, bindings: &dyn Bindings, ctx: &MathContext) -> EvalResult<DBig> {
        match self {
            Self::Number { value, position } => {
                value.as_decimal()
                     .cloned()
                     .ok_or(RuntimeError::NotRepresentable { value:    value.as_f64(),
                                                             position: *position, })
            },
            Self::Variable { name, position } => {
                if let Some(decimal) = bindings.lookup_decimal(name) {
                    return Ok(decimal);
                }
                let double = bindings.lookup(name)
                                     .ok_or_else(|| unbound(name, *position))?;
                decimal_from_f64(double).ok_or(RuntimeError::NotRepresentable { value:    double,
                                                                                position: *position, })
            },
            Self::UnaryOp { op, operand, .. } => {
                Ok(op.eval_decimal(&operand.eval_decimal(bindings, ctx)?))
            },
            Self::BinaryOp { left,
                             op,
                             right,
                             position, } => {
                let left = left.eval_decimal(bindings, ctx)?;
                let right = right.eval_decimal(bindings, ctx)?;
                op.eval_decimal(&left, &right, ctx, *position)
            },
            Self::Call { function,
                         arguments,
                         position,
                         .. } => {
                let args = arguments.iter()
                                    .map(|argument| argument.eval_decimal(bindings, ctx))
                                    .collect::<EvalResult<Vec<_>>>()?;
                if let Some(result) = function.call_decimal(&args, ctx) {
                    return result;
                }

                let floats: Vec<f64> = args.iter().map(decimal_to_f64).collect();
                let result = function.call_f64(&floats);
                tracing::trace!(function = function.name(), result, "float fallback");
                decimal_from_f64(result).map(|decimal| ctx.round(decimal))
                                        .ok_or(RuntimeError::NotRepresentable { value: result,
                                                                                position:
                                                                                    *position, })
            },
        }
    }

    /// Returns `true` when the value of the tree cannot depend on the
    /// bindings.
    ///
    /// A tree is static when it contains no variable and every call it
    /// contains is to a deterministic function. Nothing is evaluated.
    ///
    /// # Example
    /// ```
    /// use decimath::interpreter::{evaluator::function::core::FunctionRegistry, parser::core::parse};
    ///
    /// let registry = FunctionRegistry::default();
    /// assert!(parse("max(1, 2) * 3", &registry).unwrap().is_static());
    /// assert!(!parse("1 + abs(-(x))", &registry).unwrap().is_static());
    /// ```
    #[must_use]
    pub fn is_static(&self) -> bool {
        match self {
            Self::Number { .. } => true,
            Self::Variable { .. } => false,
            Self::UnaryOp { operand, .. } => operand.is_static(),
            Self::BinaryOp { left, right, .. } => left.is_static() && right.is_static(),
            Self::Call { function,
                         arguments,
                         .. } => function.is_deterministic() && arguments.iter().all(Self::is_static),
        }
    }
}

fn unbound(name: &str, position: usize) -> RuntimeError {
    RuntimeError::UnboundVariable { name: name.to_string(),
                                    position }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, str::FromStr, sync::Arc};

    use super::*;
    use crate::{
        ast::{BinaryOperator, UnaryOperator},
        interpreter::{
            evaluator::{
                bindings::Variables,
                function::core::{Arity, Function},
            },
            value::number::Number,
        },
    };

    fn dec(text: &str) -> DBig {
        DBig::from_str(text).unwrap()
    }

    fn lit(text: &str) -> Expr {
        Expr::Number { value:    Number::from_literal(text).unwrap(),
                       position: 0, }
    }

    fn var(name: &str) -> Expr {
        Expr::Variable { name:     name.to_string(),
                         position: 0, }
    }

    fn bin(left: Expr, op: BinaryOperator, right: Expr) -> Expr {
        Expr::BinaryOp { left: Box::new(left),
                         op,
                         right: Box::new(right),
                         position: 0 }
    }

    fn call(function: Function, arguments: Vec<Expr>) -> Expr {
        Expr::Call { name: function.name().to_string(),
                     function: Arc::new(function),
                     arguments,
                     position: 0 }
    }

    fn empty() -> HashMap<String, f64> {
        HashMap::new()
    }

    #[test]
    fn literal_decimal_is_not_rounded() {
        let ctx = MathContext::new(3, Default::default());
        let expr = lit("3.14159265358979323846");
        assert_eq!(expr.eval_decimal(&empty(), &ctx), Ok(dec("3.14159265358979323846")));
    }

    #[test]
    fn variables_prefer_decimal_lookup() {
        let mut vars = Variables::new();
        vars.set_text("a", "0.1").unwrap();
        vars.set("b", 0.2);
        let expr = bin(var("a"), BinaryOperator::Add, var("b"));

        assert_eq!(expr.eval_decimal(&vars, &MathContext::default()), Ok(dec("0.3")));
        assert!((expr.eval_f64(&vars).unwrap() - 0.30000000000000004).abs() < f64::EPSILON);
    }

    #[test]
    fn unbound_variable_names_the_variable() {
        let expr = bin(var("x"), BinaryOperator::Add, lit("1"));
        let err = expr.eval_f64(&empty()).unwrap_err();
        assert_eq!(err.unbound_name(), Some("x"));
        let err = expr.eval_decimal(&empty(), &MathContext::default()).unwrap_err();
        assert_eq!(err.unbound_name(), Some("x"));
    }

    #[test]
    fn non_finite_binding_is_not_representable() {
        let bindings: HashMap<String, f64> = [("inf".to_string(), f64::INFINITY)].into_iter().collect();
        assert!(matches!(var("inf").eval_decimal(&bindings, &MathContext::default()),
                         Err(RuntimeError::NotRepresentable { .. })));
    }

    #[test]
    fn call_without_decimal_falls_back_to_float() {
        let half = Function::new("half", Arity::exact(1), |a| a[0] / 2.0);
        let expr = call(half, vec![lit("3")]);
        assert_eq!(expr.eval_decimal(&empty(), &MathContext::default()), Ok(dec("1.5")));

        let blowup = Function::new("blowup", Arity::exact(0), |_| f64::INFINITY);
        let expr = call(blowup, vec![]);
        assert!(matches!(expr.eval_decimal(&empty(), &MathContext::default()),
                         Err(RuntimeError::NotRepresentable { .. })));
        assert_eq!(expr.eval_f64(&empty()), Ok(f64::INFINITY));
    }

    #[test]
    fn staticness_is_structural() {
        let negated = Expr::UnaryOp { op:       UnaryOperator::Negate,
                                      operand:  Box::new(var("x")),
                                      position: 0, };
        assert!(!bin(lit("1"), BinaryOperator::Mul, negated).is_static());
        assert!(bin(lit("1"), BinaryOperator::Mul, lit("2")).is_static());

        let noise = Function::new("noise", Arity::exact(0), |_| 0.5).non_deterministic();
        assert!(!call(noise, vec![]).is_static());
        let id = Function::new("id", Arity::exact(1), |a| a[0]);
        assert!(call(id, vec![lit("1")]).is_static());
    }

    #[test]
    fn mode_selects_value_variant() {
        let expr = bin(lit("1"), BinaryOperator::Div, lit("4"));
        assert_eq!(expr.evaluate(&empty(), &Mode::Double), Ok(Value::Double(0.25)));
        assert_eq!(expr.evaluate(&empty(), &Mode::Decimal(MathContext::default())),
                   Ok(Value::Decimal(dec("0.25"))));
    }
}
