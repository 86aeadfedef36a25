use std::{collections::HashMap, sync::OnceLock};

use dashu::float::DBig;
use parking_lot::RwLock;

use crate::{
    ast::Expr,
    interpreter::{
        evaluator::{
            bindings::Bindings,
            core::{EvalResult, Mode},
            function::core::FunctionRegistry,
        },
        parser::core::{ParseResult, parse},
        value::{core::Value, decimal::MathContext},
    },
};

/// Decimal results kept per formula, one per distinct [`MathContext`].
pub const MAX_CACHED_CONTEXTS: usize = 16;

/// A parsed formula that remembers the results of a static tree.
///
/// When the tree is static its value cannot depend on the bindings, so the
/// first successful result in each mode is kept and returned by every later
/// call. Float results are kept once; decimal results are kept per
/// [`MathContext`] for the first [`MAX_CACHED_CONTEXTS`] contexts, and
/// computed afresh for any context after those. Errors are never cached.
/// Dynamic trees are evaluated on every call.
///
/// `Formula` is `Send + Sync`; one instance can serve many threads.
#[derive(Debug)]
pub struct Formula {
    source:    String,
    expr:      Expr,
    is_static: bool,
    double:    OnceLock<f64>,
    decimals:  RwLock<HashMap<MathContext, DBig>>,
}

impl Formula {
    /// Parses `source` against `functions`.
    ///
    /// # Errors
    /// Any [`ParseError`](crate::error::ParseError) from parsing.
    ///
    /// # Example
    /// ```
    /// use std::collections::HashMap;
    ///
    /// use decimath::{
    ///     formula::Formula,
    ///     interpreter::{
    ///         evaluator::{core::Mode, function::core::FunctionRegistry},
    ///         value::core::Value,
    ///     },
    /// };
    ///
    /// let formula = Formula::compile("sqrt(16) + 1", &FunctionRegistry::default()).unwrap();
    /// assert!(formula.is_static());
    /// assert_eq!(formula.evaluate(&HashMap::<String, f64>::new(), &Mode::Double),
    ///            Ok(Value::Double(5.0)));
    /// ```
    pub fn compile(source: &str, functions: &FunctionRegistry) -> ParseResult<Self> {
        let expr = parse(source, functions)?;
        Ok(Self::from_expr(source, expr))
    }

    /// Wraps an already parsed tree.
    #[must_use]
    pub fn from_expr(source: impl Into<String>, expr: Expr) -> Self {
        Self { source: source.into(),
               is_static: expr.is_static(),
               expr,
               double: OnceLock::new(),
               decimals: RwLock::new(HashMap::new()) }
    }

    /// Evaluates the formula, reusing an earlier result when the tree is
    /// static.
    ///
    /// # Errors
    /// Any [`RuntimeError`](crate::error::RuntimeError) from evaluation.
    pub fn evaluate(&self, bindings: &dyn Bindings, mode: &Mode) -> EvalResult<Value> {
        if !self.is_static {
            return self.expr.evaluate(bindings, mode);
        }

        match mode {
            Mode::Double => {
                if let Some(value) = self.double.get() {
                    return Ok(Value::Double(*value));
                }
                let value = self.expr.eval_f64(bindings)?;
                Ok(Value::Double(*self.double.get_or_init(|| value)))
            },
            Mode::Decimal(ctx) => {
                let cached = self.decimals.read().get(ctx).cloned();
                if let Some(value) = cached {
                    return Ok(Value::Decimal(value));
                }
                let value = self.expr.eval_decimal(bindings, ctx)?;
                let mut decimals = self.decimals.write();
                if let Some(existing) = decimals.get(ctx) {
                    return Ok(Value::Decimal(existing.clone()));
                }
                if decimals.len() < MAX_CACHED_CONTEXTS {
                    decimals.insert(*ctx, value.clone());
                }
                Ok(Value::Decimal(value))
            },
        }
    }

    /// Whether results are cached.
    #[must_use]
    pub const fn is_static(&self) -> bool {
        self.is_static
    }

    /// The text the formula was compiled from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The parsed tree.
    #[must_use]
    pub const fn expr(&self) -> &Expr {
        &self.expr
    }
}

impl std::fmt::Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.expr)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;
    use crate::interpreter::{
        evaluator::{
            bindings::Variables,
            function::core::{Arity, Function},
        },
        value::decimal::Rounding,
    };

    fn counting_registry(calls: &Arc<AtomicUsize>) -> FunctionRegistry {
        let counter = Arc::clone(calls);
        let mut registry = FunctionRegistry::new();
        registry.register(Function::new("count", Arity::exact(1), move |a| {
                              counter.fetch_add(1, Ordering::SeqCst);
                              a[0]
                          }));
        registry
    }

    #[test]
    fn static_formula_is_evaluated_once_per_mode() {
        let calls = Arc::new(AtomicUsize::new(0));
        let formula = Formula::compile("count(2) * 3", &counting_registry(&calls)).unwrap();
        let empty = Variables::new();

        for _ in 0..3 {
            assert_eq!(formula.evaluate(&empty, &Mode::Double), Ok(Value::Double(6.0)));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let ctx = MathContext::decimal64();
        for _ in 0..3 {
            assert_eq!(formula.evaluate(&empty, &Mode::Decimal(ctx)).map(|v| v.as_f64()),
                       Ok(6.0));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        formula.evaluate(&empty, &Mode::Decimal(MathContext::decimal32())).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn decimal_cache_holds_a_bounded_number_of_contexts() {
        let calls = Arc::new(AtomicUsize::new(0));
        let formula = Formula::compile("count(1) / 3", &counting_registry(&calls)).unwrap();
        let empty = Variables::new();
        let contexts: Vec<MathContext> =
            (1..=MAX_CACHED_CONTEXTS + 4).map(|digits| MathContext::new(digits, Rounding::HalfEven))
                                         .collect();

        for ctx in &contexts {
            formula.evaluate(&empty, &Mode::Decimal(*ctx)).unwrap();
        }
        assert_eq!(formula.decimals.read().len(), MAX_CACHED_CONTEXTS);
        assert_eq!(calls.load(Ordering::SeqCst), MAX_CACHED_CONTEXTS + 4);

        for ctx in &contexts {
            formula.evaluate(&empty, &Mode::Decimal(*ctx)).unwrap();
        }
        assert_eq!(formula.decimals.read().len(), MAX_CACHED_CONTEXTS);
        assert_eq!(calls.load(Ordering::SeqCst), MAX_CACHED_CONTEXTS + 8);
    }

    #[test]
    fn dynamic_formula_is_never_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let formula = Formula::compile("count(x)", &counting_registry(&calls)).unwrap();
        assert!(!formula.is_static());

        let mut vars = Variables::new();
        vars.set("x", 1.0);
        assert_eq!(formula.evaluate(&vars, &Mode::Double), Ok(Value::Double(1.0)));
        vars.set("x", 2.0);
        assert_eq!(formula.evaluate(&vars, &Mode::Double), Ok(Value::Double(2.0)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn errors_are_not_cached() {
        let formula = Formula::compile("1 / 0", &FunctionRegistry::default()).unwrap();
        let empty = Variables::new();
        let ctx = MathContext::default();
        assert!(formula.evaluate(&empty, &Mode::Decimal(ctx)).is_err());
        assert!(formula.evaluate(&empty, &Mode::Decimal(ctx)).is_err());
        assert_eq!(formula.evaluate(&empty, &Mode::Double), Ok(Value::Double(f64::INFINITY)));
    }

    #[test]
    fn keeps_source_and_renders_tree() {
        let formula = Formula::compile("(1+2)*x", &FunctionRegistry::default()).unwrap();
        assert_eq!(formula.source(), "(1+2)*x");
        assert_eq!(formula.to_string(), "(1 + 2) * x");
    }
}
