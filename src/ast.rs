use std::sync::Arc;

use crate::interpreter::{evaluator::function::core::Function, value::number::Number};

/// A node of a parsed formula.
///
/// `Expr` covers the five kinds of evaluable nodes: literal numbers, variable
/// references, negation, binary arithmetic and function calls. Each node owns
/// its children and records the byte offset in the source where it starts.
///
/// A tree is never modified after parsing. The only interior mutation is the
/// lazily derived decimal inside [`Number`], which is value-preserving.
#[derive(Debug, Clone)]
pub enum Expr {
    /// A literal constant.
    Number {
        /// The constant value.
        value:    Number,
        /// Byte offset in the source.
        position: usize,
    },
    /// Reference to a variable by name, resolved against the bindings of each
    /// evaluation.
    Variable {
        /// Name of the variable.
        name:     String,
        /// Byte offset in the source.
        position: usize,
    },
    /// A unary operation (negation).
    UnaryOp {
        /// The unary operator to apply.
        op:       UnaryOperator,
        /// The operand expression.
        operand:  Box<Self>,
        /// Byte offset in the source.
        position: usize,
    },
    /// A binary arithmetic operation.
    BinaryOp {
        /// Left operand.
        left:     Box<Self>,
        /// The operator.
        op:       BinaryOperator,
        /// Right operand.
        right:    Box<Self>,
        /// Byte offset in the source.
        position: usize,
    },
    /// Function call expression (e.g. `max(a, b, 3)`).
    Call {
        /// Name of the function being called.
        name:      String,
        /// The registry entry resolved while parsing.
        function:  Arc<Function>,
        /// Arguments to the function.
        arguments: Vec<Self>,
        /// Byte offset in the source.
        position:  usize,
    },
}

impl Expr {
    /// Gets the byte offset from `self`.
    /// ## Example
    /// ```
    /// use decimath::ast::Expr;
    ///
    /// let expr = Expr::Variable { name:     "x".to_string(),
    ///                             position: 5, };
    ///
    /// assert_eq!(expr.position(), 5);
    /// ```
    #[must_use]
    pub const fn position(&self) -> usize {
        match self {
            Self::Number { position, .. }
            | Self::Variable { position, .. }
            | Self::UnaryOp { position, .. }
            | Self::BinaryOp { position, .. }
            | Self::Call { position, .. } => *position,
        }
    }

    /// Number of nodes on the longest path from this node to a leaf.
    ///
    /// ## Example
    /// ```
    /// use decimath::interpreter::{evaluator::function::core::FunctionRegistry, parser::core::parse};
    ///
    /// let expr = parse("1 + -(2 * x)", &FunctionRegistry::default()).unwrap();
    /// assert_eq!(expr.height(), 4);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        match self {
            Self::Number { .. } | Self::Variable { .. } => 1,
            Self::UnaryOp { operand, .. } => operand.height() + 1,
            Self::BinaryOp { left, right, .. } => left.height().max(right.height()) + 1,
            Self::Call { arguments, .. } => arguments.iter().map(Self::height).max().unwrap_or(0) + 1,
        }
    }

    /// Builds a literal node from anything convertible to a [`Number`]: a
    /// float, whose decimal is derived lazily, or a decimal.
    #[must_use]
    pub fn number(value: impl Into<Number>, position: usize) -> Self {
        Self::Number { value: value.into(),
                       position }
    }
}

/// Represents a binary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Modulo (`%`)
    Mod,
    /// Exponentiation (`^`)
    Pow,
}

impl BinaryOperator {
    /// Binding strength; higher binds tighter.
    ///
    /// # Example
    /// ```
    /// use decimath::ast::BinaryOperator;
    ///
    /// assert!(BinaryOperator::Pow.precedence() > BinaryOperator::Mul.precedence());
    /// assert_eq!(BinaryOperator::Add.precedence(), BinaryOperator::Sub.precedence());
    /// ```
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div | Self::Mod => 2,
            Self::Pow => 3,
        }
    }

    /// Only `^` groups to the right.
    #[must_use]
    pub const fn is_right_associative(self) -> bool {
        matches!(self, Self::Pow)
    }
}

/// Represents a unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    /// Arithmetic negation (e.g. `-x`).
    Negate,
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let operator = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Pow => "^",
        };
        write!(f, "{operator}")
    }
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Negate => write!(f, "-"),
        }
    }
}

/// Renders the tree as formula text that parses back to an equivalent tree.
///
/// Parentheses are emitted only where precedence or associativity requires
/// them.
impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number { value, .. } => write!(f, "{value}"),
            Self::Variable { name, .. } => write!(f, "{name}"),
            Self::UnaryOp { op, operand, .. } => match operand.as_ref() {
                Self::BinaryOp { .. } => write!(f, "{op}({operand})"),
                _ => write!(f, "{op}{operand}"),
            },
            Self::BinaryOp { left, op, right, .. } => {
                let right_assoc = op.is_right_associative();
                write_operand(f, left, op.precedence(), right_assoc)?;
                write!(f, " {op} ")?;
                write_operand(f, right, op.precedence(), !right_assoc)
            },
            Self::Call { name, arguments, .. } => {
                write!(f, "{name}(")?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{argument}")?;
                }
                write!(f, ")")
            },
        }
    }
}

fn write_operand(f: &mut std::fmt::Formatter<'_>,
                 operand: &Expr,
                 parent_precedence: u8,
                 parens_on_tie: bool)
                 -> std::fmt::Result {
    let needs_parens = match operand {
        Expr::BinaryOp { op, .. } => {
            op.precedence() < parent_precedence
            || (op.precedence() == parent_precedence && parens_on_tie)
        },
        _ => false,
    };
    if needs_parens {
        write!(f, "({operand})")
    } else {
        write!(f, "{operand}")
    }
}
