//! Fixed-point monetary amounts.
//!
//! All settlement arithmetic runs on integer counts of the smallest currency
//! unit (cents). This keeps the zero-sum invariant exact: splits round at a
//! single, well-defined point and remainders are visible as whole cents.

use core::ops::{Add, AddAssign, Neg, Sub};
use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

/// A signed monetary amount in minor units (cents).
///
/// Positive amounts are owed *by* a user to the group; negative amounts are
/// owed *to* a user. Compared and ordered by value.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub const fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Multiply by a whole factor (e.g. "n owners' shares").
    pub const fn times(self, factor: i64) -> Self {
        Self(self.0 * factor)
    }

    /// Divide by a positive divisor, rounding to the nearest cent
    /// (half away from zero). Widens through i128 so intermediate
    /// doubling cannot overflow.
    pub fn divide_rounded(self, divisor: i64) -> Self {
        debug_assert!(divisor > 0, "divisor must be positive");
        let n = i128::from(self.0);
        let d = i128::from(divisor);
        let q = if n >= 0 {
            (n * 2 + d) / (d * 2)
        } else {
            (n * 2 - d) / (d * 2)
        };
        Self(q as i64)
    }

    /// Sum an iterator of amounts.
    pub fn total<I: IntoIterator<Item = Money>>(amounts: I) -> Money {
        amounts.into_iter().fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl ValueObject for Money {}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}
