//! # decimath
//!
//! decimath parses arithmetic formulas into expression trees and evaluates
//! them either with binary floating point (`f64`) or with arbitrary-precision
//! decimals rounded to a precision context.
//!
//! Formulas support `+ - * / % ^`, unary negation, parentheses, variables
//! resolved at evaluation time and calls to registered functions. Trees report
//! whether they are static (independent of the bindings) so callers can fold
//! or cache constant results.
//!
//! ```
//! use std::collections::HashMap;
//!
//! use decimath::{Mode, Value, evaluate_str};
//!
//! let empty = HashMap::<String, f64>::new();
//! assert_eq!(evaluate_str("2 + 3 * 4 ^ 2", &empty, &Mode::Double).unwrap(),
//!            Value::Double(50.0));
//! ```

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

/// Defines the structure of parsed formulas.
///
/// This module declares the `Expr` enum and the operator types that represent
/// a formula as a tree. The tree is built by the parser and walked by the
/// evaluator.
///
/// # Responsibilities
/// - Defines the five node kinds and the operators.
/// - Attaches source byte offsets to nodes for error reporting.
/// - Renders trees back into parseable formula text.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator).
/// - Attaches byte offsets and detailed messages for context.
/// - Implements the standard error traits.
pub mod error;
/// Compiled formulas that cache the results of static trees.
pub mod formula;
/// Orchestrates lexing, parsing and evaluation.
///
/// # Responsibilities
/// - Coordinates the lexer, parser, evaluator, and value types.
/// - Provides entry points for parsing and evaluating formulas.
pub mod interpreter;
/// General utilities for numeric conversion.
///
/// This module provides the conversions between `f64` and decimals used by
/// the evaluator and the value types.
pub mod util;

pub use crate::{
    ast::Expr,
    error::{Error, ParseError, RuntimeError},
    formula::Formula,
    interpreter::{
        evaluator::{
            bindings::{Bindings, Variables},
            core::Mode,
            fold::fold_constants,
            function::core::{Arity, Function, FunctionRegistry},
        },
        parser::core::parse,
        value::{
            core::Value,
            decimal::{MathContext, Rounding},
        },
    },
};

/// Parses `source` with the builtin functions and evaluates it once.
///
/// # Errors
/// Returns [`Error::Parse`] if the formula is malformed, or
/// [`Error::Runtime`] if evaluation fails.
///
/// # Examples
/// ```
/// use std::collections::HashMap;
///
/// use decimath::{Error, MathContext, Mode, RuntimeError, evaluate_str};
///
/// let empty = HashMap::<String, f64>::new();
///
/// // Division by zero is a value in float mode...
/// let v = evaluate_str("1 / 0", &empty, &Mode::Double).unwrap();
/// assert_eq!(v.as_f64(), f64::INFINITY);
///
/// // ...and an error in decimal mode.
/// let err = evaluate_str("1 / 0", &empty, &Mode::Decimal(MathContext::default())).unwrap_err();
/// assert!(matches!(err, Error::Runtime(RuntimeError::DivisionByZero { .. })));
/// ```
pub fn evaluate_str(source: &str, bindings: &dyn Bindings, mode: &Mode) -> Result<Value, Error> {
    let expr = parse(source, &FunctionRegistry::default())?;
    Ok(expr.evaluate(bindings, mode)?)
}
