#[derive(Debug, Clone, PartialEq)]
/// Represents all errors that can occur during evaluation.
pub enum RuntimeError {
    /// The tree references a variable the binding does not provide.
    UnboundVariable {
        /// The name of the variable.
        name:     String,
        /// Byte offset of the variable in the source.
        position: usize,
    },
    /// Decimal division or modulo by zero.
    DivisionByZero {
        /// Byte offset of the operator's left operand in the source.
        position: usize,
    },
    /// A binary float result has no decimal counterpart (infinity or NaN).
    NotRepresentable {
        /// The float that could not be converted.
        value:    f64,
        /// Byte offset of the node that produced it.
        position: usize,
    },
    /// An integral decimal exponent is too large to compute.
    ExponentOutOfRange {
        /// Byte offset of the power expression.
        position: usize,
    },
    /// A function rejected its arguments.
    InvalidArgument {
        /// The name of the function.
        function: String,
        /// Details about why the argument is invalid.
        details:  String,
    },
}

impl RuntimeError {
    /// Name of the unbound variable, if this is an unbound-variable error.
    ///
    /// ## Example
    /// ```
    /// use decimath::error::RuntimeError;
    ///
    /// let err = RuntimeError::UnboundVariable { name:     "x".to_string(),
    ///                                           position: 0, };
    /// assert_eq!(err.unbound_name(), Some("x"));
    /// ```
    #[must_use]
    pub fn unbound_name(&self) -> Option<&str> {
        match self {
            Self::UnboundVariable { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnboundVariable { name, position } => {
                write!(f, "Error at {position}: Unbound variable '{name}'.")
            },
            Self::DivisionByZero { position } => write!(f, "Error at {position}: Division by zero."),
            Self::NotRepresentable { value, position } => write!(f,
                                                                 "Error at {position}: {value} has no decimal representation."),
            Self::ExponentOutOfRange { position } => {
                write!(f, "Error at {position}: Exponent is out of range.")
            },
            Self::InvalidArgument { function, details } => {
                write!(f, "Error in '{function}': Invalid argument: {details}.")
            },
        }
    }
}

impl std::error::Error for RuntimeError {}
