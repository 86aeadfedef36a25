use std::borrow::Cow;

use dashu::{
    float::{
        Context, DBig,
        round::{Round, mode},
    },
    integer::IBig,
};

/// Rounding applied when a decimal result has more significant digits than
/// the context allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rounding {
    /// Round to nearest, ties to the even neighbour.
    #[default]
    HalfEven,
    /// Round to nearest, ties away from zero.
    HalfAway,
    /// Truncate toward zero.
    TowardZero,
    /// Round away from zero.
    AwayFromZero,
    /// Round toward positive infinity.
    Up,
    /// Round toward negative infinity.
    Down,
}

/// Defines the rounded operations by dispatching a generic helper on the
/// runtime rounding mode.
macro_rules! with_rounding {
    ($rounding:expr, $helper:ident($($arg:expr),* $(,)?)) => {
        match $rounding {
            Rounding::HalfEven => $helper::<mode::HalfEven>($($arg),*),
            Rounding::HalfAway => $helper::<mode::HalfAway>($($arg),*),
            Rounding::TowardZero => $helper::<mode::Zero>($($arg),*),
            Rounding::AwayFromZero => $helper::<mode::Away>($($arg),*),
            Rounding::Up => $helper::<mode::Up>($($arg),*),
            Rounding::Down => $helper::<mode::Down>($($arg),*),
        }
    };
}

/// Precision context for decimal evaluation: significant digits plus a
/// rounding mode.
///
/// One context is used for every operation of one evaluation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MathContext {
    precision: usize,
    rounding:  Rounding,
}

impl Default for MathContext {
    fn default() -> Self {
        Self::decimal128()
    }
}

#[derive(Clone, Copy)]
enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

impl MathContext {
    /// Creates a context with `precision` significant digits.
    ///
    /// A precision of zero is raised to one digit; decimal division needs a
    /// finite precision.
    ///
    /// # Example
    /// ```
    /// use decimath::interpreter::value::decimal::{MathContext, Rounding};
    ///
    /// let ctx = MathContext::new(0, Rounding::HalfEven);
    /// assert_eq!(ctx.precision(), 1);
    /// ```
    #[must_use]
    pub const fn new(precision: usize, rounding: Rounding) -> Self {
        let precision = if precision == 0 { 1 } else { precision };
        Self { precision, rounding }
    }

    /// 7 digits, half-even.
    #[must_use]
    pub const fn decimal32() -> Self {
        Self::new(7, Rounding::HalfEven)
    }

    /// 16 digits, half-even.
    #[must_use]
    pub const fn decimal64() -> Self {
        Self::new(16, Rounding::HalfEven)
    }

    /// 34 digits, half-even.
    #[must_use]
    pub const fn decimal128() -> Self {
        Self::new(34, Rounding::HalfEven)
    }

    /// Number of significant digits kept by every operation.
    #[must_use]
    pub const fn precision(&self) -> usize {
        self.precision
    }

    /// The rounding mode.
    #[must_use]
    pub const fn rounding(&self) -> Rounding {
        self.rounding
    }

    /// `lhs + rhs`, rounded.
    #[must_use]
    pub fn add(&self, lhs: &DBig, rhs: &DBig) -> DBig {
        with_rounding!(self.rounding, apply(self.precision, Op::Add, lhs, rhs))
    }

    /// `lhs - rhs`, rounded.
    #[must_use]
    pub fn sub(&self, lhs: &DBig, rhs: &DBig) -> DBig {
        with_rounding!(self.rounding, apply(self.precision, Op::Sub, lhs, rhs))
    }

    /// `lhs * rhs`, rounded.
    #[must_use]
    pub fn mul(&self, lhs: &DBig, rhs: &DBig) -> DBig {
        with_rounding!(self.rounding, apply(self.precision, Op::Mul, lhs, rhs))
    }

    /// `lhs / rhs`, rounded.
    ///
    /// # Returns
    /// `None` when `rhs` is zero.
    ///
    /// # Example
    /// ```
    /// use std::str::FromStr;
    ///
    /// use dashu::float::DBig;
    /// use decimath::interpreter::value::decimal::{MathContext, Rounding};
    ///
    /// let ctx = MathContext::new(5, Rounding::HalfEven);
    /// let one = DBig::from_str("1").unwrap();
    /// let three = DBig::from_str("3").unwrap();
    ///
    /// assert_eq!(ctx.div(&one, &three), Some(DBig::from_str("0.33333").unwrap()));
    /// assert_eq!(ctx.div(&one, &DBig::ZERO), None);
    /// ```
    #[must_use]
    pub fn div(&self, lhs: &DBig, rhs: &DBig) -> Option<DBig> {
        if rhs.repr().is_zero() {
            return None;
        }
        Some(with_rounding!(self.rounding, apply(self.precision, Op::Div, lhs, rhs)))
    }

    /// Truncated remainder of `lhs / rhs`; the sign follows `lhs`.
    ///
    /// The remainder is computed exactly and then rounded. The power of ten
    /// that aligns a dividend with a much larger exponent is reduced modulo
    /// the divisor, so the cost grows with the digit counts and only
    /// logarithmically with the exponent gap.
    ///
    /// # Returns
    /// `None` when `rhs` is zero.
    ///
    /// # Example
    /// ```
    /// use std::str::FromStr;
    ///
    /// use dashu::float::DBig;
    /// use decimath::interpreter::value::decimal::MathContext;
    ///
    /// let ctx = MathContext::default();
    /// let big = DBig::from_str("1e9999").unwrap();
    /// let seven = DBig::from_str("7").unwrap();
    /// assert_eq!(ctx.rem(&big, &seven), Some(DBig::from_str("6").unwrap()));
    /// ```
    #[must_use]
    pub fn rem(&self, lhs: &DBig, rhs: &DBig) -> Option<DBig> {
        if rhs.repr().is_zero() {
            return None;
        }
        if magnitude(lhs) < magnitude(rhs) {
            return Some(self.round(lhs.clone()));
        }

        // |lhs| >= |rhs| bounds the divisor's shift by the dividend's digits.
        let (left, right) = (lhs.repr(), rhs.repr());
        let exponent = left.exponent().min(right.exponent());
        let shift = (right.exponent() - exponent).unsigned_abs();
        let divisor = right.significand() * IBig::from(10u8).pow(shift);
        let scale = pow_ten_mod((left.exponent() - exponent).unsigned_abs(), &divisor);
        let remainder = (left.significand() % &divisor) * scale % &divisor;

        Some(self.round(DBig::from_parts(remainder, exponent)))
    }

    /// `base ^ exp` for an integer exponent, by repeated squaring.
    ///
    /// Intermediate products carry extra guard digits; the final result is
    /// rounded to this context. Negative exponents take the reciprocal.
    ///
    /// # Returns
    /// `None` for a zero base with a negative exponent.
    #[must_use]
    pub fn powi(&self, base: &DBig, exp: i64) -> Option<DBig> {
        let magnitude = exp.unsigned_abs();
        let guard = magnitude.checked_ilog10().map_or(1, |digits| digits as usize + 2);
        let working = Self::new(self.precision + guard, self.rounding);

        let mut result = DBig::ONE;
        let mut square = base.clone();
        let mut remaining = magnitude;
        while remaining > 0 {
            if remaining & 1 == 1 {
                result = working.mul(&result, &square);
            }
            remaining >>= 1;
            if remaining > 0 {
                square = working.mul(&square, &square);
            }
        }

        if exp < 0 {
            result = working.div(&DBig::ONE, &result)?;
        }
        Some(self.round(result))
    }

    /// Rounds a value to this context's precision and rounding mode.
    #[must_use]
    pub fn round(&self, value: DBig) -> DBig {
        with_rounding!(self.rounding, round_to(self.precision, value))
    }
}

impl std::fmt::Display for MathContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} digits, {:?}", self.precision, self.rounding)
    }
}

fn apply<R: Round>(precision: usize, op: Op, lhs: &DBig, rhs: &DBig) -> DBig {
    let context = Context::<R>::new(precision);
    let rounded = match op {
        Op::Add | Op::Sub => {
            let (lhs, rhs) = condense(precision, lhs, rhs);
            if matches!(op, Op::Add) {
                context.add(lhs.repr(), rhs.repr())
            } else {
                context.sub(lhs.repr(), rhs.repr())
            }
        },
        Op::Mul => context.mul(lhs.repr(), rhs.repr()),
        Op::Div => context.div(lhs.repr(), rhs.repr()),
    };
    rounded.value().with_rounding::<mode::HalfAway>()
}

fn magnitude(value: &DBig) -> DBig {
    if value < &DBig::ZERO { -value.clone() } else { value.clone() }
}

/// Exponent of the leading digit.
#[allow(clippy::cast_possible_wrap)]
fn leading_exponent(value: &DBig) -> isize {
    value.repr().exponent() + value.repr().digits() as isize - 1
}

/// `10^exp mod modulus` by repeated squaring.
fn pow_ten_mod(exp: usize, modulus: &IBig) -> IBig {
    let mut result = IBig::ONE % modulus;
    let mut square = IBig::from(10u8) % modulus;
    let mut remaining = exp;
    while remaining > 0 {
        if remaining & 1 == 1 {
            result = (&result * &square) % modulus;
        }
        remaining >>= 1;
        if remaining > 0 {
            square = (&square * &square) % modulus;
        }
    }
    result
}

/// Replaces an addend that lies entirely below the rounding digit of the
/// other addend, and below its last digit, with a one-digit stand-in of the
/// same sign.
///
/// The exact sum and the condensed sum fall strictly between the same two
/// neighbours of the coarser grid, so they round alike in every mode, and
/// aligning the operands no longer depends on how far apart they are.
#[allow(clippy::cast_possible_wrap)]
fn condense<'v>(precision: usize, lhs: &'v DBig, rhs: &'v DBig) -> (Cow<'v, DBig>, Cow<'v, DBig>) {
    if lhs.repr().is_zero() || rhs.repr().is_zero() {
        return (Cow::Borrowed(lhs), Cow::Borrowed(rhs));
    }
    let lhs_is_large = leading_exponent(lhs) >= leading_exponent(rhs);
    let (large, small) = if lhs_is_large { (lhs, rhs) } else { (rhs, lhs) };

    let floor = large.repr()
                     .exponent()
                     .min(leading_exponent(large) - precision as isize);
    if leading_exponent(small) + 1 >= floor {
        return (Cow::Borrowed(lhs), Cow::Borrowed(rhs));
    }

    let sign = if small < &DBig::ZERO { IBig::from(-1) } else { IBig::ONE };
    let stand_in = Cow::Owned(DBig::from_parts(sign, floor - 1));
    if lhs_is_large { (Cow::Borrowed(lhs), stand_in) } else { (stand_in, Cow::Borrowed(rhs)) }
}

fn round_to<R: Round>(precision: usize, value: DBig) -> DBig {
    value.with_rounding::<R>()
         .with_precision(precision)
         .value()
         .with_rounding::<mode::HalfAway>()
}
