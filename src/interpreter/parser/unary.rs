use std::iter::Peekable;

use crate::{
    ast::{Expr, UnaryOperator},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParseContext, ParseResult, parse_expression},
            utils::parse_comma_separated,
        },
        value::number::Number,
    },
};

/// Parses a unary expression.
///
/// Supports the prefix operator `-` (numeric negation). It may repeat, so
/// `--x` is parsed as `-(-x)`. Each `-` is one nesting level.
///
/// If no unary operator is present, the function delegates to
/// [`parse_primary`].
///
/// Grammar:
/// ```text
///     unary := "-" unary
///            | primary
/// ```
pub(crate) fn parse_unary<'a, I>(tokens: &mut Peekable<I>, ctx: &ParseContext<'_>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    if let Some((Token::Minus, position)) = tokens.peek() {
        tokens.next();
        let operand = parse_unary(tokens, &ctx.nested(*position)?)?;
        Ok(Expr::UnaryOp { op:       UnaryOperator::Negate,
                           operand:  Box::new(operand),
                           position: *position, })
    } else {
        parse_primary(tokens, ctx)
    }
}

/// Parses a primary (atomic) expression.
///
/// Grammar:
/// ```text
///     primary := number
///              | identifier
///              | identifier "(" arguments? ")"
///              | "(" expression ")"
/// ```
///
/// # Errors
/// - `UnexpectedEndOfInput` when the input ends where an operand is due.
/// - `UnexpectedToken` for an operator, comma or `)` in operand position.
pub(crate) fn parse_primary<'a, I>(tokens: &mut Peekable<I>, ctx: &ParseContext<'_>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let peeked = tokens.peek()
                       .ok_or(ParseError::UnexpectedEndOfInput { position: ctx.end })?;

    match peeked {
        (Token::Number(_), _) => parse_literal(tokens, ctx),
        (Token::LParen, _) => parse_grouping(tokens, ctx),
        (Token::Identifier(_), _) => parse_identifier_or_function(tokens, ctx),
        (token, position) => Err(ParseError::UnexpectedToken { token:    token.to_string(),
                                                               position: *position, }),
    }
}

/// Parses a numeric literal.
///
/// The literal text becomes the exact decimal of the node; its float is
/// derived from that decimal.
fn parse_literal<'a, I>(tokens: &mut Peekable<I>, ctx: &ParseContext<'_>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    match tokens.next() {
        Some((Token::Number(text), position)) => {
            let value = Number::from_literal(text).ok_or_else(|| ParseError::InvalidNumber {
                literal: text.clone(),
                position: *position,
            })?;
            Ok(Expr::Number { value,
                              position: *position })
        },
        Some((token, position)) => Err(ParseError::UnexpectedToken { token:    token.to_string(),
                                                                     position: *position, }),
        None => Err(ParseError::UnexpectedEndOfInput { position: ctx.end }),
    }
}

/// Parses a parenthesized expression.
///
/// Grammar: `grouping := "(" expression ")"`
///
/// # Errors
/// `ExpectedClosingParen`, at the opening parenthesis, when the matching `)`
/// is missing.
fn parse_grouping<'a, I>(tokens: &mut Peekable<I>, ctx: &ParseContext<'_>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let position = match tokens.next() {
        Some((Token::LParen, position)) => *position,
        Some((token, position)) => {
            return Err(ParseError::UnexpectedToken { token:    token.to_string(),
                                                     position: *position, });
        },
        None => return Err(ParseError::UnexpectedEndOfInput { position: ctx.end }),
    };
    let expr = parse_expression(tokens, &ctx.nested(position)?)?;
    match tokens.next() {
        Some((Token::RParen, _)) => Ok(expr),
        _ => Err(ParseError::ExpectedClosingParen { position }),
    }
}

/// Parses a variable reference or a function call.
///
/// The identifier is a function name when `(` follows it. The function must
/// be registered, and the argument count must fit its arity.
///
/// # Returns
/// - [`Expr::Call`] if followed by parentheses,
/// - [`Expr::Variable`] otherwise.
///
/// # Errors
/// - `UnknownFunction` for a name missing from the registry.
/// - `ArityMismatch` for a wrong number of arguments, at the function name.
/// - Any error from parsing the arguments.
fn parse_identifier_or_function<'a, I>(tokens: &mut Peekable<I>,
                                       ctx: &ParseContext<'_>)
                                       -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let (name, position) = match tokens.next() {
        Some((Token::Identifier(name), position)) => (name.clone(), *position),
        Some((token, position)) => {
            return Err(ParseError::UnexpectedToken { token:    token.to_string(),
                                                     position: *position, });
        },
        None => return Err(ParseError::UnexpectedEndOfInput { position: ctx.end }),
    };

    let Some((Token::LParen, _)) = tokens.peek() else {
        return Ok(Expr::Variable { name, position });
    };

    let function = ctx.functions
                      .get(&name)
                      .cloned()
                      .ok_or_else(|| ParseError::UnknownFunction { name: name.clone(),
                                                                   position })?;
    tokens.next();
    let arguments = parse_comma_separated(tokens, &ctx.nested(position)?, parse_expression, &Token::RParen)?;

    let arity = function.arity();
    if !arity.check(arguments.len()) {
        return Err(ParseError::ArityMismatch { name,
                                               expected: arity,
                                               found: arguments.len(),
                                               position });
    }

    Ok(Expr::Call { name,
                    function,
                    arguments,
                    position })
}
