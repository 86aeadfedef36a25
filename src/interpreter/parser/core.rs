use std::iter::Peekable;

use crate::{
    ast::Expr,
    error::ParseError,
    interpreter::{
        evaluator::function::core::FunctionRegistry,
        lexer::{Token, tokenize},
        parser::binary::parse_additive,
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Deepest tree the parser builds.
///
/// Parentheses, call arguments, negations, the right side of `^` and chains
/// of `+ - * / %` all count. Evaluation, folding and rendering recurse over
/// the tree, so this also bounds their stack use.
pub const MAX_NESTING_DEPTH: usize = 256;

/// What every parsing function needs besides the tokens.
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'r> {
    /// Functions that calls are resolved against.
    pub functions: &'r FunctionRegistry,
    /// Byte length of the source; the position reported at end of input.
    pub end:       usize,
    /// Number of enclosing levels.
    pub depth:     usize,
}

impl ParseContext<'_> {
    /// The context for a sub-expression one level further in.
    ///
    /// # Errors
    /// `NestingTooDeep` at `position` when the new level is past
    /// [`MAX_NESTING_DEPTH`].
    pub fn nested(&self, position: usize) -> ParseResult<Self> {
        let depth = self.depth + 1;
        if depth > MAX_NESTING_DEPTH {
            return Err(ParseError::NestingTooDeep { limit: MAX_NESTING_DEPTH,
                                                    position });
        }
        Ok(Self { depth, ..*self })
    }

    /// Checks that a subtree of height `height` still fits below this level.
    ///
    /// # Errors
    /// `NestingTooDeep` at `position` when it does not.
    pub fn check_height(&self, height: usize, position: usize) -> ParseResult<()> {
        if self.depth + height > MAX_NESTING_DEPTH {
            return Err(ParseError::NestingTooDeep { limit: MAX_NESTING_DEPTH,
                                                    position });
        }
        Ok(())
    }
}

/// Parses a formula into an expression tree.
///
/// This is the entry point for parsing. The whole input must form exactly
/// one expression. Calls are resolved against `functions` and their argument
/// counts are checked here, so a tree returned by this function never fails
/// for an unknown function or a wrong arity.
///
/// # Errors
/// - Any syntax error variant of [`ParseError`] for malformed text, unknown
///   functions, trailing tokens or empty input.
/// - [`ParseError::ArityMismatch`] for a call with a wrong number of
///   arguments.
///
/// # Example
/// ```
/// use decimath::{
///     error::ParseError,
///     interpreter::{evaluator::function::core::FunctionRegistry, parser::core::parse},
/// };
///
/// let registry = FunctionRegistry::default();
/// assert_eq!(parse("2 * (x + 1)", &registry).unwrap().to_string(), "2 * (x + 1)");
/// assert!(matches!(parse("1 2", &registry),
///                  Err(ParseError::UnexpectedTrailingTokens { position: 2, .. })));
/// ```
#[tracing::instrument(level = "debug", skip(functions), err(level = "debug"))]
pub fn parse(source: &str, functions: &FunctionRegistry) -> ParseResult<Expr> {
    let tokens = tokenize(source)?;
    let ctx = ParseContext { functions,
                             end: source.len(),
                             depth: 0 };
    let mut iter = tokens.iter().peekable();

    let expr = parse_expression(&mut iter, &ctx)?;
    if let Some((token, position)) = iter.next() {
        return Err(ParseError::UnexpectedTrailingTokens { token:    token.to_string(),
                                                          position: *position, });
    }
    tracing::debug!(tokens = tokens.len(), "parsed");
    Ok(expr)
}

/// Parses a full expression.
///
/// It begins at the lowest-precedence level, addition, and recursively
/// descends through the precedence hierarchy.
///
/// Grammar: `expression := additive`
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>, ctx: &ParseContext<'_>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_additive(tokens, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_err(source: &str) -> ParseError {
        parse(source, &FunctionRegistry::default()).unwrap_err()
    }

    #[test]
    fn empty_input_is_a_syntax_error() {
        assert_eq!(parse_err(""), ParseError::UnexpectedEndOfInput { position: 0 });
        assert_eq!(parse_err("   "), ParseError::UnexpectedEndOfInput { position: 3 });
    }

    #[test]
    fn trailing_tokens_are_rejected() {
        assert_eq!(parse_err("(1 + 2) 3"),
                   ParseError::UnexpectedTrailingTokens { token:    "3".to_string(),
                                                          position: 8, });
        assert_eq!(parse_err("1 )"),
                   ParseError::UnexpectedTrailingTokens { token:    ")".to_string(),
                                                          position: 2, });
    }

    #[test]
    fn deep_nesting_is_a_syntax_error() {
        let parens = format!("{}1{}", "(".repeat(600), ")".repeat(600));
        let err = parse_err(&parens);
        assert!(matches!(err, ParseError::NestingTooDeep { limit: MAX_NESTING_DEPTH, .. }));
        assert!(err.is_syntax_error());

        let negations = format!("{}1", "-".repeat(20_000));
        assert!(matches!(parse_err(&negations), ParseError::NestingTooDeep { .. }));

        let powers = format!("2{}", " ^ 2".repeat(1_000));
        assert!(matches!(parse_err(&powers), ParseError::NestingTooDeep { .. }));

        let sum = format!("1{}", " + 1".repeat(10_000));
        assert!(matches!(parse_err(&sum), ParseError::NestingTooDeep { .. }));

        let calls = format!("{}1{}", "abs(".repeat(600), ")".repeat(600));
        assert!(matches!(parse_err(&calls), ParseError::NestingTooDeep { .. }));
    }

    #[test]
    fn nesting_below_the_limit_parses() {
        let registry = FunctionRegistry::default();
        let parens = format!("{}x{}", "(".repeat(100), ")".repeat(100));
        assert!(parse(&parens, &registry).is_ok());

        let sum = format!("1{}", " + 1".repeat(200));
        let expr = parse(&sum, &registry).unwrap();
        assert_eq!(expr.height(), 201);
    }

    #[test]
    fn missing_operand_is_reported_at_end() {
        assert_eq!(parse_err("1 +"), ParseError::UnexpectedEndOfInput { position: 3 });
        assert_eq!(parse_err("2 * * 3"),
                   ParseError::UnexpectedToken { token:    "*".to_string(),
                                                 position: 4, });
    }
}
