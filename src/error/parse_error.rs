use crate::interpreter::evaluator::function::core::Arity;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur during lexing or parsing.
///
/// Every variant carries the byte offset in the source where the problem was
/// detected.
pub enum ParseError {
    /// A character that does not start any token.
    UnexpectedCharacter {
        /// The offending text.
        text:     String,
        /// Byte offset in the source.
        position: usize,
    },
    /// Found an unexpected token while parsing.
    UnexpectedToken {
        /// The token encountered.
        token:    String,
        /// Byte offset in the source.
        position: usize,
    },
    /// Reached the end of input unexpectedly.
    UnexpectedEndOfInput {
        /// Byte offset in the source (the input length).
        position: usize,
    },
    /// A closing parenthesis `)` was expected but not found.
    ExpectedClosingParen {
        /// Byte offset of the unmatched `(`.
        position: usize,
    },
    /// Found extra tokens after a complete expression.
    UnexpectedTrailingTokens {
        /// The first extra token.
        token:    String,
        /// Byte offset in the source.
        position: usize,
    },
    /// A numeric literal could not be read as a decimal number.
    InvalidNumber {
        /// The literal text.
        literal:  String,
        /// Byte offset in the source.
        position: usize,
    },
    /// The expression nests deeper than the parser allows.
    NestingTooDeep {
        /// The maximum depth.
        limit:    usize,
        /// Byte offset of the token that went past the limit.
        position: usize,
    },
    /// Called a function that is not in the registry.
    UnknownFunction {
        /// The name of the function.
        name:     String,
        /// Byte offset in the source.
        position: usize,
    },
    /// A function call supplied an argument count outside the declared arity.
    ArityMismatch {
        /// The name of the function.
        name:     String,
        /// The declared arity.
        expected: Arity,
        /// The number of arguments found.
        found:    usize,
        /// Byte offset of the function name.
        position: usize,
    },
}

impl ParseError {
    /// Byte offset in the source where the error was detected.
    ///
    /// ## Example
    /// ```
    /// use decimath::error::ParseError;
    ///
    /// let err = ParseError::UnexpectedEndOfInput { position: 3 };
    /// assert_eq!(err.position(), 3);
    /// ```
    #[must_use]
    pub const fn position(&self) -> usize {
        match self {
            Self::UnexpectedCharacter { position, .. }
            | Self::UnexpectedToken { position, .. }
            | Self::UnexpectedEndOfInput { position }
            | Self::ExpectedClosingParen { position }
            | Self::UnexpectedTrailingTokens { position, .. }
            | Self::InvalidNumber { position, .. }
            | Self::NestingTooDeep { position, .. }
            | Self::UnknownFunction { position, .. }
            | Self::ArityMismatch { position, .. } => *position,
        }
    }

    /// Returns `true` for malformed text, `false` for an arity violation.
    #[must_use]
    pub const fn is_syntax_error(&self) -> bool {
        !matches!(self, Self::ArityMismatch { .. })
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedCharacter { text, position } => {
                write!(f, "Syntax error at {position}: Unexpected character '{text}'.")
            },
            Self::UnexpectedToken { token, position } => {
                write!(f, "Syntax error at {position}: Unexpected token: {token}.")
            },
            Self::UnexpectedEndOfInput { position } => {
                write!(f, "Syntax error at {position}: Unexpected end of input.")
            },
            Self::ExpectedClosingParen { position } => write!(f,
                                                              "Syntax error at {position}: Expected closing parenthesis ')' but none found."),
            Self::UnexpectedTrailingTokens { token, position } => write!(f,
                                                                         "Syntax error at {position}: Extra tokens after expression, starting at '{token}'."),
            Self::InvalidNumber { literal, position } => {
                write!(f, "Syntax error at {position}: Invalid number '{literal}'.")
            },
            Self::NestingTooDeep { limit, position } => {
                write!(f, "Syntax error at {position}: Expression nested deeper than {limit} levels.")
            },
            Self::UnknownFunction { name, position } => {
                write!(f, "Syntax error at {position}: Unknown function '{name}'.")
            },
            Self::ArityMismatch { name,
                                  expected,
                                  found,
                                  position, } => write!(f,
                                                        "Arity error at {position}: '{name}' takes {expected} argument(s), but {found} were supplied."),
        }
    }
}

impl std::error::Error for ParseError {}
