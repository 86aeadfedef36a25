use dashu::float::DBig;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::EvalResult,
            function::core::{Arity, Function},
        },
        value::decimal::MathContext,
    },
};

/// Defines the builtin functions by generating a constructor list and a name
/// list.
///
/// Each entry provides:
/// - a string name,
/// - an arity specification,
/// - the float implementation,
/// - optionally, a native decimal implementation.
///
/// The macro produces:
/// - `functions()` (fresh [`Function`] values for a registry),
/// - `BUILTIN_FUNCTIONS` (public list of builtin names).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                double: $double:expr
                $(, decimal: $decimal:expr)? $(,)?
            }
        ),* $(,)?
    ) => {
        /// Builds every builtin function.
        #[must_use]
        pub fn functions() -> Vec<Function> {
            vec![
                $(
                    Function::new($name, $arity, $double) $(.with_decimal($decimal))?,
                )*
            ]
        }

        /// Names of all builtin functions.
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "abs"   => { arity: Arity::exact(1), double: |a: &[f64]| a[0].abs(), decimal: abs },
    "sign"  => { arity: Arity::exact(1), double: sign, decimal: sign_decimal },
    "floor" => { arity: Arity::exact(1), double: |a: &[f64]| a[0].floor(), decimal: |a: &[DBig], _: &MathContext| Ok(a[0].floor()) },
    "ceil"  => { arity: Arity::exact(1), double: |a: &[f64]| a[0].ceil(), decimal: |a: &[DBig], _: &MathContext| Ok(a[0].ceil()) },
    "round" => { arity: Arity::exact(1), double: |a: &[f64]| a[0].round(), decimal: |a: &[DBig], _: &MathContext| Ok(a[0].round()) },
    "trunc" => { arity: Arity::exact(1), double: |a: &[f64]| a[0].trunc(), decimal: |a: &[DBig], _: &MathContext| Ok(a[0].trunc()) },
    "min"   => { arity: Arity::at_least(1), double: |a: &[f64]| a.iter().copied().fold(f64::INFINITY, f64::min), decimal: min },
    "max"   => { arity: Arity::at_least(1), double: |a: &[f64]| a.iter().copied().fold(f64::NEG_INFINITY, f64::max), decimal: max },
    "clamp" => { arity: Arity::exact(3), double: |a: &[f64]| a[0].max(a[1]).min(a[2]), decimal: clamp },
    "sqrt"  => { arity: Arity::exact(1), double: |a: &[f64]| a[0].sqrt() },
    "exp"   => { arity: Arity::exact(1), double: |a: &[f64]| a[0].exp() },
    "ln"    => { arity: Arity::exact(1), double: |a: &[f64]| a[0].ln() },
    "log"   => { arity: Arity::range(1, 2), double: log },
    "sin"   => { arity: Arity::exact(1), double: |a: &[f64]| a[0].sin() },
    "cos"   => { arity: Arity::exact(1), double: |a: &[f64]| a[0].cos() },
    "tan"   => { arity: Arity::exact(1), double: |a: &[f64]| a[0].tan() },
    "asin"  => { arity: Arity::exact(1), double: |a: &[f64]| a[0].asin() },
    "acos"  => { arity: Arity::exact(1), double: |a: &[f64]| a[0].acos() },
    "atan"  => { arity: Arity::exact(1), double: |a: &[f64]| a[0].atan() },
    "atan2" => { arity: Arity::exact(2), double: |a: &[f64]| a[0].atan2(a[1]) },
    "hypot" => { arity: Arity::exact(2), double: |a: &[f64]| a[0].hypot(a[1]) },
}

/// Logarithm in base 10, or in the base given as the second argument.
///
/// # Example
/// ```
/// use decimath::interpreter::evaluator::function::builtin::log;
///
/// assert_eq!(log(&[1000.0]), 3.0);
/// assert_eq!(log(&[8.0, 2.0]), 3.0);
/// ```
#[must_use]
pub fn log(args: &[f64]) -> f64 {
    match args {
        [value, base] => value.ln() / base.ln(),
        [value, ..] => value.log10(),
        [] => f64::NAN,
    }
}

/// `-1`, `0` or `1` by the sign of the argument; NaN stays NaN.
#[must_use]
pub fn sign(args: &[f64]) -> f64 {
    match args {
        [x, ..] if *x > 0.0 => 1.0,
        [x, ..] if *x < 0.0 => -1.0,
        [x, ..] => *x,
        [] => f64::NAN,
    }
}

fn abs(args: &[DBig], _: &MathContext) -> EvalResult<DBig> {
    if args[0] < DBig::ZERO {
        Ok(-args[0].clone())
    } else {
        Ok(args[0].clone())
    }
}

fn sign_decimal(args: &[DBig], _: &MathContext) -> EvalResult<DBig> {
    let x = &args[0];
    Ok(match x.partial_cmp(&DBig::ZERO) {
        Some(std::cmp::Ordering::Greater) => DBig::ONE,
        Some(std::cmp::Ordering::Less) => -DBig::ONE,
        _ => DBig::ZERO,
    })
}

fn min(args: &[DBig], _: &MathContext) -> EvalResult<DBig> {
    let mut best = &args[0];
    for candidate in &args[1..] {
        if candidate < best {
            best = candidate;
        }
    }
    Ok(best.clone())
}

fn max(args: &[DBig], _: &MathContext) -> EvalResult<DBig> {
    let mut best = &args[0];
    for candidate in &args[1..] {
        if candidate > best {
            best = candidate;
        }
    }
    Ok(best.clone())
}

fn clamp(args: &[DBig], _: &MathContext) -> EvalResult<DBig> {
    let (value, low, high) = (&args[0], &args[1], &args[2]);
    if low > high {
        return Err(RuntimeError::InvalidArgument { function: "clamp".to_string(),
                                                   details:  format!("lower bound {low} is above upper bound {high}"), });
    }
    let raised = if value < low { low } else { value };
    Ok(if raised > high { high.clone() } else { raised.clone() })
}
