/// Binary operator evaluation logic.
///
/// Implements the six arithmetic operators in both numeric modes, including
/// the decimal power algorithm and its float fallback.
pub mod binary;

/// Unary operator evaluation logic.
///
/// Implements arithmetic negation.
pub mod unary;

/// Core evaluation logic.
///
/// Contains the tree walk for both modes, the evaluation mode selector and the
/// staticness predicate.
pub mod core;

/// Variable bindings.
///
/// Defines the lookup capability consulted by variable nodes and the provided
/// binding tables.
pub mod bindings;

/// Constant folding.
///
/// Rewrites static subtrees into literals carrying both representations.
pub mod fold;

/// Function evaluation.
///
/// Holds function definitions, their arity bounds, the registry consulted by
/// the parser and the builtin functions.
pub mod function;
