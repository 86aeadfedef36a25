use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, Expr},
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParseContext, ParseResult},
            unary::parse_unary,
        },
    },
};

/// Parses addition and subtraction expressions.
///
/// Handles left-associative binary operators: `+` and `-`.
///
/// The rule is: `additive := multiplicative (("+" | "-") multiplicative)*`
///
/// The chain builds a left-leaning tree, so its height is checked against
/// the nesting limit as it grows.
///
/// # Parameters
/// - `tokens`: Token stream with byte offsets.
/// - `ctx`: Function registry and input length.
///
/// # Returns
/// An `Expr::BinaryOp` tree representing the parsed expression.
pub fn parse_additive<'a, I>(tokens: &mut Peekable<I>, ctx: &ParseContext<'_>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut left = parse_multiplicative(tokens, ctx)?;
    let mut height = left.height();
    loop {
        if let Some((token, position)) = tokens.peek()
           && let Some(op) = token_to_binary_operator(token)
           && matches!(op, BinaryOperator::Add | BinaryOperator::Sub)
        {
            let position = *position;
            tokens.next();
            let right = parse_multiplicative(tokens, ctx)?;
            height = height.max(right.height()) + 1;
            ctx.check_height(height, position)?;
            left = binary(left, op, right);
            continue;
        }
        break;
    }
    Ok(left)
}

/// Parses multiplication-level expressions.
///
/// Handles left-associative operators: `*`, `/` and `%`.
///
/// The rule is: `multiplicative := exponent (("*" | "/" | "%") exponent)*`
pub fn parse_multiplicative<'a, I>(tokens: &mut Peekable<I>,
                                   ctx: &ParseContext<'_>)
                                   -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut left = parse_exponent(tokens, ctx)?;
    let mut height = left.height();
    loop {
        if let Some((token, position)) = tokens.peek()
           && let Some(op) = token_to_binary_operator(token)
           && matches!(op,
                       BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Mod)
        {
            let position = *position;
            tokens.next();
            let right = parse_exponent(tokens, ctx)?;
            height = height.max(right.height()) + 1;
            ctx.check_height(height, position)?;
            left = binary(left, op, right);
            continue;
        }
        break;
    }
    Ok(left)
}

/// Parses exponentiation expressions.
///
/// Exponentiation is right-associative: `a ^ b ^ c` parses as
/// `a ^ (b ^ c)`. Each operand is a unary expression, so negation binds
/// tighter than `^` on both sides: `-2 ^ 2` is `(-2) ^ 2` and `2 ^ -1` is
/// accepted.
///
/// The rule is: `exponent := unary ("^" exponent)?`
pub fn parse_exponent<'a, I>(tokens: &mut Peekable<I>, ctx: &ParseContext<'_>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let base = parse_unary(tokens, ctx)?;
    if let Some((Token::Caret, position)) = tokens.peek() {
        tokens.next();
        let exponent = parse_exponent(tokens, &ctx.nested(*position)?)?;
        return Ok(binary(base, BinaryOperator::Pow, exponent));
    }
    Ok(base)
}

/// Maps a token to its corresponding binary operator.
///
/// # Returns
/// `Some(BinaryOperator)` if the token corresponds to a binary operator,
/// otherwise `None`.
///
/// # Example
/// ```
/// use decimath::{
///     ast::BinaryOperator,
///     interpreter::{lexer::Token, parser::binary::token_to_binary_operator},
/// };
///
/// assert_eq!(token_to_binary_operator(&Token::Plus),
///            Some(BinaryOperator::Add));
/// assert_eq!(token_to_binary_operator(&Token::Comma), None);
/// ```
#[must_use]
pub const fn token_to_binary_operator(token: &Token) -> Option<BinaryOperator> {
    match token {
        Token::Plus => Some(BinaryOperator::Add),
        Token::Minus => Some(BinaryOperator::Sub),
        Token::Star => Some(BinaryOperator::Mul),
        Token::Slash => Some(BinaryOperator::Div),
        Token::Percent => Some(BinaryOperator::Mod),
        Token::Caret => Some(BinaryOperator::Pow),
        _ => None,
    }
}

// A binary node starts where its left operand starts.
fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Expr {
    let position = left.position();
    Expr::BinaryOp { left: Box::new(left),
                     op,
                     right: Box::new(right),
                     position }
}

#[cfg(test)]
mod tests {
    use crate::{
        ast::{BinaryOperator, Expr, UnaryOperator},
        interpreter::{evaluator::function::core::FunctionRegistry, parser::core::parse},
    };

    fn tree(source: &str) -> Expr {
        parse(source, &FunctionRegistry::default()).unwrap()
    }

    #[test]
    fn power_is_right_associative() {
        let Expr::BinaryOp { op, right, .. } = tree("2 ^ 3 ^ 2") else {
            panic!("expected a binary node");
        };
        assert_eq!(op, BinaryOperator::Pow);
        assert!(matches!(*right, Expr::BinaryOp { op: BinaryOperator::Pow, .. }));
    }

    #[test]
    fn subtraction_is_left_associative() {
        let Expr::BinaryOp { left, op, .. } = tree("10 - 4 - 3") else {
            panic!("expected a binary node");
        };
        assert_eq!(op, BinaryOperator::Sub);
        assert!(matches!(*left, Expr::BinaryOp { op: BinaryOperator::Sub, .. }));
    }

    #[test]
    fn negation_binds_tighter_than_power() {
        let Expr::BinaryOp { left, op, .. } = tree("-2 ^ 2") else {
            panic!("expected a binary node");
        };
        assert_eq!(op, BinaryOperator::Pow);
        assert!(matches!(*left, Expr::UnaryOp { op: UnaryOperator::Negate, .. }));
    }

    #[test]
    fn negative_exponent_is_accepted() {
        let Expr::BinaryOp { right, .. } = tree("2 ^ -1") else {
            panic!("expected a binary node");
        };
        assert!(matches!(*right, Expr::UnaryOp { .. }));
    }

    #[test]
    fn positions_point_at_left_operand() {
        let expr = tree("  a * b + c");
        assert_eq!(expr.position(), 2);
    }
}
