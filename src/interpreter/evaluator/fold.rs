use std::collections::HashMap;

use crate::{
    ast::Expr,
    interpreter::value::{decimal::MathContext, number::Number},
    util::num::decimal_to_f64,
};

/// Replaces every maximal static subtree with a literal.
///
/// A folded literal carries the float result of the subtree and its decimal
/// result under `ctx`, so the folded tree answers both modes the way the
/// original did. A static subtree whose evaluation fails in either mode
/// (`1 / 0` in decimal) is kept as it is, so the failure still surfaces at
/// evaluation time. A subtree whose float result is not the nearest float to
/// its decimal result is kept too: a literal renders as its decimal, and the
/// rendered text must parse back to the same float. Non-static subtrees are
/// rebuilt with their static parts folded.
///
/// Decimal results of a folded tree match the original only under `ctx`.
///
/// # Example
/// ```
/// use std::collections::HashMap;
///
/// use decimath::interpreter::{
///     evaluator::{fold::fold_constants, function::core::FunctionRegistry},
///     parser::core::parse,
///     value::decimal::MathContext,
/// };
///
/// let expr = parse("x * (2 + 3)", &FunctionRegistry::default()).unwrap();
/// let folded = fold_constants(&expr, &MathContext::default());
/// assert_eq!(folded.to_string(), "x * 5");
/// ```
#[must_use]
pub fn fold_constants(expr: &Expr, ctx: &MathContext) -> Expr {
    if expr.is_static() {
        if matches!(expr, Expr::Number { .. }) {
            return expr.clone();
        }
        if let Some(folded) = fold_static(expr, ctx) {
            return folded;
        }
    }

    match expr {
        Expr::UnaryOp { op, operand, position } => {
            Expr::UnaryOp { op:       *op,
                            operand:  Box::new(fold_constants(operand, ctx)),
                            position: *position, }
        },
        Expr::BinaryOp { left,
                         op,
                         right,
                         position, } => Expr::BinaryOp { left:     Box::new(fold_constants(left, ctx)),
                                                         op:       *op,
                                                         right:    Box::new(fold_constants(right, ctx)),
                                                         position: *position, },
        Expr::Call { name,
                     function,
                     arguments,
                     position, } => {
            Expr::Call { name:      name.clone(),
                         function:  function.clone(),
                         arguments: arguments.iter()
                                             .map(|argument| fold_constants(argument, ctx))
                                             .collect(),
                         position:  *position, }
        },
        Expr::Number { .. } | Expr::Variable { .. } => expr.clone(),
    }
}

fn fold_static(expr: &Expr, ctx: &MathContext) -> Option<Expr> {
    let empty: HashMap<String, f64> = HashMap::new();
    let double = expr.eval_f64(&empty).ok()?;
    let decimal = match expr.eval_decimal(&empty, ctx) {
        Ok(decimal) => decimal,
        Err(err) => {
            tracing::debug!(%err, position = expr.position(), "left unfolded");
            return None;
        },
    };
    if decimal_to_f64(&decimal).to_bits() != double.to_bits() {
        tracing::debug!(double, %decimal, position = expr.position(), "modes disagree, left unfolded");
        return None;
    }
    Some(Expr::Number { value:    Number::with_both(double, decimal),
                        position: expr.position(), })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::{
        evaluator::function::core::FunctionRegistry, parser::core::parse,
        value::decimal::Rounding,
    };

    fn fold(source: &str) -> Expr {
        let expr = parse(source, &FunctionRegistry::default()).unwrap();
        fold_constants(&expr, &MathContext::default())
    }

    #[test]
    fn static_tree_becomes_single_literal() {
        let folded = fold("2 + 3 * 4 ^ 2");
        assert!(matches!(folded, Expr::Number { .. }));
        assert_eq!(folded.eval_f64(&HashMap::<String, f64>::new()), Ok(50.0));
    }

    #[test]
    fn dynamic_parts_are_kept() {
        let folded = fold("max(x, 1 + 1) - -(3)");
        assert_eq!(folded.to_string(), "max(x, 2) - -3");
        assert!(!folded.is_static());
    }

    #[test]
    fn failing_subtree_is_not_folded() {
        let folded = fold("1 / 0");
        assert!(matches!(folded, Expr::BinaryOp { .. }));
        let empty = HashMap::<String, f64>::new();
        assert_eq!(folded.eval_f64(&empty), Ok(f64::INFINITY));
        assert!(folded.eval_decimal(&empty, &MathContext::default()).is_err());
    }

    #[test]
    fn folded_text_parses_back_to_the_same_values() {
        let registry = FunctionRegistry::default();
        let ctx = MathContext::default();
        let bound: HashMap<String, f64> = [("x".to_string(), 1.5)].into_iter().collect();
        for source in ["1e30 * 3", "0.1 + 0.2", "2 ^ 0.5", "10 / 4 - 1", "max(1e300 * 1e300, 1)", "7 % 3 * x"] {
            let expr = parse(source, &registry).unwrap();
            let folded = fold_constants(&expr, &ctx);
            let reparsed = parse(&folded.to_string(), &registry).unwrap();

            assert_eq!(reparsed.eval_f64(&bound).map(f64::to_bits),
                       expr.eval_f64(&bound).map(f64::to_bits),
                       "{source}");
            assert_eq!(reparsed.eval_decimal(&bound, &ctx), expr.eval_decimal(&bound, &ctx), "{source}");
            assert_eq!(reparsed.is_static(), folded.is_static());
        }
    }

    #[test]
    fn disagreeing_modes_are_not_folded() {
        assert!(matches!(fold("1e30 * 3"), Expr::BinaryOp { .. }));
        assert!(matches!(fold("0.1 + 0.2"), Expr::BinaryOp { .. }));
        assert!(matches!(fold("0.5 + 0.25"), Expr::Number { .. }));
    }

    #[test]
    fn folded_literal_keeps_both_representations() {
        let expr = parse("0.1 + 0.2", &FunctionRegistry::default()).unwrap();
        let ctx = MathContext::new(10, Rounding::HalfEven);
        let folded = fold_constants(&expr, &ctx);
        let empty = HashMap::<String, f64>::new();

        assert_eq!(folded.eval_f64(&empty), expr.eval_f64(&empty));
        assert_eq!(folded.eval_decimal(&empty, &ctx), expr.eval_decimal(&empty, &ctx));
    }
}
