use std::{collections::HashMap, sync::Arc};

use dashu::float::DBig;

use crate::interpreter::{
    evaluator::{core::EvalResult, function::builtin},
    value::decimal::MathContext,
};

/// Signature of a function's binary float implementation.
pub type DoubleFn = dyn Fn(&[f64]) -> f64 + Send + Sync;

/// Signature of a function's native decimal implementation.
pub type DecimalFn = dyn Fn(&[DBig], &MathContext) -> EvalResult<DBig> + Send + Sync;

/// Specifies the allowed number of arguments for a function.
///
/// `max` is `None` for variadic functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Arity {
    /// Fewest arguments accepted.
    pub min: usize,
    /// Most arguments accepted, or `None` for no upper bound.
    pub max: Option<usize>,
}

impl Arity {
    /// Exactly `n` arguments.
    #[must_use]
    pub const fn exact(n: usize) -> Self {
        Self { min: n,
               max: Some(n), }
    }

    /// Between `min` and `max` arguments, inclusive.
    #[must_use]
    pub const fn range(min: usize, max: usize) -> Self {
        Self { min,
               max: Some(max) }
    }

    /// At least `min` arguments.
    #[must_use]
    pub const fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    /// Tests whether the given argument count satisfies this arity.
    ///
    /// # Example
    /// ```
    /// use decimath::interpreter::evaluator::function::core::Arity;
    ///
    /// assert!(Arity::range(1, 2).check(2));
    /// assert!(!Arity::exact(1).check(0));
    /// assert!(Arity::at_least(1).check(10));
    /// ```
    #[must_use]
    pub const fn check(&self, n: usize) -> bool {
        match self.max {
            Some(max) => n >= self.min && n <= max,
            None => n >= self.min,
        }
    }
}

impl std::fmt::Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "{max}"),
            Some(max) => write!(f, "{} to {max}", self.min),
            None => write!(f, "at least {}", self.min),
        }
    }
}

/// A named function callable from formulas.
///
/// Every function has a binary float implementation. A native decimal
/// implementation is optional; without one, decimal mode converts the
/// arguments to `f64`, calls the float implementation and converts the result
/// back, rounded to the active context.
pub struct Function {
    name:          String,
    arity:         Arity,
    deterministic: bool,
    double:        Box<DoubleFn>,
    decimal:       Option<Box<DecimalFn>>,
}

impl Function {
    /// Creates a deterministic function with only a float implementation.
    ///
    /// # Example
    /// ```
    /// use decimath::interpreter::evaluator::function::core::{Arity, Function};
    ///
    /// let cube = Function::new("cube", Arity::exact(1), |args| args[0].powi(3));
    /// assert_eq!(cube.call_f64(&[2.0]), 8.0);
    /// assert!(cube.is_deterministic());
    /// ```
    pub fn new(name: impl Into<String>,
               arity: Arity,
               double: impl Fn(&[f64]) -> f64 + Send + Sync + 'static)
               -> Self {
        Self { name: name.into(),
               arity,
               deterministic: true,
               double: Box::new(double),
               decimal: None }
    }

    /// Adds a native decimal implementation.
    #[must_use]
    pub fn with_decimal(mut self,
                        decimal: impl Fn(&[DBig], &MathContext) -> EvalResult<DBig>
                        + Send
                        + Sync
                        + 'static)
                        -> Self {
        self.decimal = Some(Box::new(decimal));
        self
    }

    /// Marks the function as returning different results for the same
    /// arguments. Calls to it are never static.
    #[must_use]
    pub fn non_deterministic(mut self) -> Self {
        self.deterministic = false;
        self
    }

    /// The function name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared arity.
    #[must_use]
    pub const fn arity(&self) -> Arity {
        self.arity
    }

    /// Whether equal arguments always give equal results.
    #[must_use]
    pub const fn is_deterministic(&self) -> bool {
        self.deterministic
    }

    /// Whether a native decimal implementation exists.
    #[must_use]
    pub const fn has_decimal(&self) -> bool {
        self.decimal.is_some()
    }

    /// Calls the float implementation.
    #[must_use]
    pub fn call_f64(&self, args: &[f64]) -> f64 {
        (self.double)(args)
    }

    /// Calls the native decimal implementation, if there is one.
    pub fn call_decimal(&self, args: &[DBig], ctx: &MathContext) -> Option<EvalResult<DBig>> {
        self.decimal.as_ref().map(|decimal| decimal(args, ctx))
    }
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
         .field("name", &self.name)
         .field("arity", &self.arity)
         .field("deterministic", &self.deterministic)
         .field("decimal", &self.decimal.is_some())
         .finish_non_exhaustive()
    }
}

/// Named functions known to the parser.
///
/// The parser resolves every call against this table, so unknown names and
/// wrong argument counts are reported before evaluation.
#[derive(Debug, Clone)]
pub struct FunctionRegistry {
    functions: HashMap<String, Arc<Function>>,
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl FunctionRegistry {
    /// Creates a registry with no functions.
    #[must_use]
    pub fn new() -> Self {
        Self { functions: HashMap::new() }
    }

    /// Creates a registry holding the builtin functions.
    ///
    /// # Example
    /// ```
    /// use decimath::interpreter::evaluator::function::core::FunctionRegistry;
    ///
    /// let registry = FunctionRegistry::with_builtins();
    /// assert!(registry.get("sqrt").is_some());
    /// assert!(registry.get("nope").is_none());
    /// ```
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for function in builtin::functions() {
            registry.register(function);
        }
        registry
    }

    /// Adds a function, replacing any earlier one with the same name.
    pub fn register(&mut self, function: Function) -> &mut Self {
        self.functions
            .insert(function.name.clone(), Arc::new(function));
        self
    }

    /// Looks a function up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<Function>> {
        self.functions.get(name)
    }

    /// The declared arity of every function, by name.
    #[must_use]
    pub fn arities(&self) -> HashMap<&str, Arity> {
        self.functions
            .iter()
            .map(|(name, function)| (name.as_str(), function.arity))
            .collect()
    }

    /// Number of registered functions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Whether no function is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_display() {
        assert_eq!(Arity::exact(2).to_string(), "2");
        assert_eq!(Arity::range(1, 2).to_string(), "1 to 2");
        assert_eq!(Arity::at_least(1).to_string(), "at least 1");
    }

    #[test]
    fn register_replaces_existing_entry() {
        let mut registry = FunctionRegistry::new();
        registry.register(Function::new("f", Arity::exact(1), |a| a[0]));
        registry.register(Function::new("f", Arity::exact(2), |a| a[0] + a[1]));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.arities().get("f"), Some(&Arity::exact(2)));
        assert!((registry.get("f").unwrap().call_f64(&[1.0, 2.0]) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn builder_flags() {
        let f = Function::new("noise", Arity::exact(0), |_| 0.5).non_deterministic();
        assert!(!f.is_deterministic());
        assert!(!f.has_decimal());
        assert!(f.call_decimal(&[], &MathContext::default()).is_none());

        let g = Function::new("id", Arity::exact(1), |a| a[0]).with_decimal(|a, _| Ok(a[0].clone()));
        assert!(g.has_decimal());
    }
}
