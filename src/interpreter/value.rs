/// Decimal precision contexts.
///
/// Defines `MathContext`, the significant-digit count and rounding mode that
/// govern every decimal operation of one evaluation call, and the rounded
/// arithmetic built on top of it.
pub mod decimal;
/// Literal numbers with two representations.
///
/// Defines `Number`, which keeps a binary float and a decimal side by side and
/// derives the missing one on first use.
pub mod number;

pub mod core;
