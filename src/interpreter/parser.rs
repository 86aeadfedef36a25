/// Parser entry point.
///
/// Contains [`core::parse`], the parse context and the top of the expression
/// grammar.
pub mod core;

/// Unary and primary expression parsing.
///
/// Handles negation, literals, parenthesized groups, variables and function
/// calls with their registry lookup and arity check.
pub mod unary;

/// Binary operator parsing.
///
/// Implements the precedence levels for `+ -`, `* / %` and the
/// right-associative `^`.
pub mod binary;

/// Utility functions for the parser.
///
/// Provides the comma-separated list helper used by argument lists.
pub mod utils;
