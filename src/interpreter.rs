/// The evaluator module walks expression trees and computes results.
///
/// # Responsibilities
/// - Evaluates every node kind in float and in decimal mode.
/// - Resolves variables through caller-supplied bindings.
/// - Reports runtime errors such as unbound variables or decimal division by
///   zero.
/// - Decides staticness and folds static subtrees.
pub mod evaluator;
/// The lexer module tokenizes formula text for further parsing.
///
/// The lexer reads the raw text and produces a stream of tokens (numbers,
/// identifiers, operators and delimiters), each paired with its byte offset.
pub mod lexer;
/// The parser module builds expression trees from tokens.
///
/// # Responsibilities
/// - Converts tokens into `Expr` nodes honoring precedence and associativity.
/// - Resolves function calls against the registry and checks their arity.
/// - Reports syntax errors with their byte offset.
pub mod parser;
/// The value module defines the numeric types used during evaluation.
///
/// # Responsibilities
/// - Defines the `Value` result type and the dual-representation `Number`.
/// - Defines the decimal precision context and its rounded arithmetic.
pub mod value;
