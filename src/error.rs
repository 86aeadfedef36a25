/// Parsing errors.
///
/// Defines all error types that can occur while lexing and parsing a formula.
/// Parse errors include malformed text, unbalanced parentheses, unknown
/// functions and calls whose argument count is outside the declared arity.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised while evaluating a parsed tree,
/// such as unbound variables or decimal division by zero.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;

/// Either failure of a one-shot parse-then-evaluate call.
#[derive(Debug)]
pub enum Error {
    /// The formula text could not be parsed.
    Parse(ParseError),
    /// The parsed tree could not be evaluated.
    Runtime(RuntimeError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "{e}"),
            Self::Runtime(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Runtime(e) => Some(e),
        }
    }
}

impl From<ParseError> for Error {
    fn from(value: ParseError) -> Self {
        Self::Parse(value)
    }
}

impl From<RuntimeError> for Error {
    fn from(value: RuntimeError) -> Self {
        Self::Runtime(value)
    }
}
