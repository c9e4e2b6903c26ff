//! Integer round-to-increment over the nine rounding modes.
//!
//! Every rounding operation in the crate expresses its quantity as an integer
//! count of the smallest unit (usually nanoseconds) and calls into this
//! module. No floating point is involved.

use crate::error::{Result, TemporalError};
use crate::options::{RoundingMode, Unit};

/// Largest accepted rounding increment.
const MAX_INCREMENT: u32 = 1_000_000_000;

/// A rounding mode with the sign of the rounded quantity factored out.
///
/// Rounding a magnitude between two bounds only needs to know whether to
/// move toward zero, toward infinity, or to the nearest bound with a given
/// tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnsignedRoundingMode {
    Infinity,
    Zero,
    HalfInfinity,
    HalfZero,
    HalfEven,
}

impl RoundingMode {
    pub(crate) fn unsigned(self, negative: bool) -> UnsignedRoundingMode {
        use UnsignedRoundingMode as U;
        match (self, negative) {
            (RoundingMode::Ceil, false) | (RoundingMode::Floor, true) => U::Infinity,
            (RoundingMode::Ceil, true) | (RoundingMode::Floor, false) => U::Zero,
            (RoundingMode::Expand, _) => U::Infinity,
            (RoundingMode::Trunc, _) => U::Zero,
            (RoundingMode::HalfCeil, false) | (RoundingMode::HalfFloor, true) => U::HalfInfinity,
            (RoundingMode::HalfCeil, true) | (RoundingMode::HalfFloor, false) => U::HalfZero,
            (RoundingMode::HalfExpand, _) => U::HalfInfinity,
            (RoundingMode::HalfTrunc, _) => U::HalfZero,
            (RoundingMode::HalfEven, _) => U::HalfEven,
        }
    }
}

impl UnsignedRoundingMode {
    /// Decides whether a magnitude `numerator / denominator` of the way from
    /// the lower bound to the upper bound resolves to the upper bound.
    ///
    /// `lower_is_even` tells `HalfEven` whether the lower bound is an even
    /// multiple of the increment.
    pub(crate) fn rounds_up(self, numerator: u128, denominator: u128, lower_is_even: bool) -> bool {
        if numerator == 0 {
            return false;
        }
        if numerator >= denominator {
            return true;
        }
        let twice = numerator * 2;
        match self {
            UnsignedRoundingMode::Zero => false,
            UnsignedRoundingMode::Infinity => true,
            _ if twice < denominator => false,
            _ if twice > denominator => true,
            UnsignedRoundingMode::HalfZero => false,
            UnsignedRoundingMode::HalfInfinity => true,
            UnsignedRoundingMode::HalfEven => !lower_is_even,
        }
    }
}

/// Rounds `value` to a multiple of `increment` using `mode`.
///
/// # Errors
///
/// Returns [`TemporalError::Range`] if `increment` is not positive.
///
/// # Examples
///
/// ```
/// use temporal_engine::{round_to_increment, RoundingMode};
///
/// assert_eq!(round_to_increment(12, 5, RoundingMode::Floor).unwrap(), 10);
/// assert_eq!(round_to_increment(12, 5, RoundingMode::Ceil).unwrap(), 15);
/// assert_eq!(round_to_increment(-12, 5, RoundingMode::Expand).unwrap(), -15);
/// ```
pub fn round_to_increment(value: i128, increment: i128, mode: RoundingMode) -> Result<i128> {
    if increment <= 0 {
        return Err(TemporalError::range(format!(
            "rounding increment must be positive, got {}",
            increment
        )));
    }
    Ok(round_unchecked(value, increment, mode))
}

pub(crate) fn round_unchecked(value: i128, increment: i128, mode: RoundingMode) -> i128 {
    debug_assert!(increment > 0);
    let negative = value < 0;
    let magnitude = value.unsigned_abs();
    let step = increment.unsigned_abs();
    let quotient = magnitude / step;
    let remainder = magnitude % step;
    let up = mode
        .unsigned(negative)
        .rounds_up(remainder, step, quotient % 2 == 0);
    let multiple = if up { quotient + 1 } else { quotient };
    let rounded = multiple as i128 * increment;
    if negative {
        -rounded
    } else {
        rounded
    }
}

/// Checks the raw increment option: a whole number in `1..=1e9`.
pub(crate) fn check_increment(increment: u32) -> Result<i128> {
    if increment == 0 || increment > MAX_INCREMENT {
        return Err(TemporalError::range(format!(
            "rounding increment {} is out of range 1..={}",
            increment, MAX_INCREMENT
        )));
    }
    Ok(i128::from(increment))
}

/// Checks that `increment` evenly divides `dividend`.
///
/// When `inclusive` is false the increment must also be strictly smaller
/// than the dividend, so rounding can never wrap a whole larger unit.
pub(crate) fn validate_increment(increment: u32, dividend: u64, inclusive: bool) -> Result<i128> {
    let checked = check_increment(increment)?;
    let maximum = if inclusive { dividend } else { dividend - 1 };
    if u64::from(increment) > maximum {
        return Err(TemporalError::range(format!(
            "rounding increment {} exceeds maximum {}",
            increment, maximum
        )));
    }
    if dividend % u64::from(increment) != 0 {
        return Err(TemporalError::range(format!(
            "rounding increment {} does not divide {}",
            increment, dividend
        )));
    }
    Ok(checked)
}

/// Validates an increment for a sub-day unit against the unit's modulus
/// (60 seconds, 24 hours, ...). Date units accept any increment.
pub(crate) fn validate_increment_for_unit(unit: Unit, increment: u32) -> Result<i128> {
    match unit.modulus() {
        Some(modulus) => validate_increment(increment, u64::from(modulus), false),
        None => check_increment(increment),
    }
}
