use logos::Logos;

use crate::error::ParseError;

/// Represents a lexical token in a formula.
/// A token is a minimal but meaningful unit of text produced by the lexer.
#[derive(Logos, Debug, PartialEq, Eq, Clone)]
pub enum Token {
    /// Numeric literal tokens, such as `3.14`, `.5`, `2.`, `42` or `2.1e-10`.
    ///
    /// The exact source text is kept so the decimal value can be built without
    /// going through a binary float first.
    #[regex(r"[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?", |lex| lex.slice().to_string())]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().to_string())]
    Number(String),
    /// Identifier tokens; variable or function names such as `x` or `sqrt`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `^`
    #[token("^")]
    Caret,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `,`
    #[token(",")]
    Comma,
    /// Spaces, tabs, feeds and line breaks.
    #[regex(r"[ \t\r\n\f]+", logos::skip)]
    Ignored,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(text) | Self::Identifier(text) => write!(f, "{text}"),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Star => write!(f, "*"),
            Self::Slash => write!(f, "/"),
            Self::Percent => write!(f, "%"),
            Self::Caret => write!(f, "^"),
            Self::LParen => write!(f, "("),
            Self::RParen => write!(f, ")"),
            Self::Comma => write!(f, ","),
            Self::Ignored => Ok(()),
        }
    }
}

/// Splits a formula into tokens paired with the byte offset where each one
/// starts.
///
/// # Errors
/// Returns [`ParseError::UnexpectedCharacter`] for the first slice of input
/// that does not form a token.
///
/// # Example
/// ```
/// use decimath::interpreter::lexer::{Token, tokenize};
///
/// let tokens = tokenize("2 * x").unwrap();
/// assert_eq!(tokens,
///            vec![(Token::Number("2".to_string()), 0),
///                 (Token::Star, 2),
///                 (Token::Identifier("x".to_string()), 4)]);
/// ```
pub fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, ParseError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(token) = lexer.next() {
        match token {
            Ok(tok) => tokens.push((tok, lexer.span().start)),
            Err(()) => {
                return Err(ParseError::UnexpectedCharacter { text:     lexer.slice().to_string(),
                                                             position: lexer.span().start, });
            },
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source).unwrap().into_iter().map(|(tok, _)| tok).collect()
    }

    #[test]
    fn numbers_keep_their_source_text() {
        assert_eq!(kinds("0.10 .5 7. 1e3 2.5E-4"),
                   vec![Token::Number("0.10".into()),
                        Token::Number(".5".into()),
                        Token::Number("7.".into()),
                        Token::Number("1e3".into()),
                        Token::Number("2.5E-4".into())]);
    }

    #[test]
    fn operators_and_identifiers() {
        assert_eq!(kinds("max(a_1, -b) % 2 ^ c"),
                   vec![Token::Identifier("max".into()),
                        Token::LParen,
                        Token::Identifier("a_1".into()),
                        Token::Comma,
                        Token::Minus,
                        Token::Identifier("b".into()),
                        Token::RParen,
                        Token::Percent,
                        Token::Number("2".into()),
                        Token::Caret,
                        Token::Identifier("c".into())]);
    }

    #[test]
    fn positions_are_byte_offsets() {
        let positions: Vec<usize> = tokenize("  a +\tb").unwrap()
                                                       .into_iter()
                                                       .map(|(_, pos)| pos)
                                                       .collect();
        assert_eq!(positions, vec![2, 4, 6]);
    }

    #[test]
    fn unknown_character_is_reported_with_offset() {
        let err = tokenize("1 + $").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedCharacter { ref text, position: 4 } if text == "$"));
    }
}
