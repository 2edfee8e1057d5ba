use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Hundredths of a percent in one whole (100%).
const BASIS_POINTS: i128 = 10_000;

/// Minor units in one tenth of a currency unit.
const TENTH: i128 = 10;

/// Money amount represented as **integer cents**.
///
/// Every price, share and total handled by the engine uses this type, so the
/// allocation never accumulates floating-point drift. Shares are rounded to
/// tenths (multiples of 10 cents) with [`Money::round_tenth`].
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// assert_eq!(amount.round_tenth(), Money::new(12_30));
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects >
/// 2 decimals):
///
/// ```rust
/// use engine::Money;
///
/// assert_eq!("10".parse::<Money>().unwrap().cents(), 1000);
/// assert_eq!("10,5".parse::<Money>().unwrap().cents(), 1050);
/// assert!("12.345".parse::<Money>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Converts a decimal amount in major units (e.g. `12.5`) to the nearest
    /// cent.
    pub fn from_major(value: f64) -> Result<Self, EngineError> {
        if !value.is_finite() {
            return Err(EngineError::InvalidAmount(format!("{value} is not a number")));
        }
        let cents = (value * 100.0).round();
        if cents.abs() >= i64::MAX as f64 {
            return Err(EngineError::InvalidAmount("amount too large".to_string()));
        }
        Ok(Self(cents as i64))
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns the amount in major units, for display and wire formats only.
    #[must_use]
    pub fn to_major(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Returns `true` if the amount is a whole number of tenths.
    #[must_use]
    pub const fn is_tenth(self) -> bool {
        self.0 % TENTH as i64 == 0
    }

    /// Rounds to the nearest tenth of a unit, halves away from zero.
    ///
    /// Within half a tenth of the `i64` bounds the amount is truncated toward
    /// zero instead; use [`Money::checked_round_tenth`] to detect that.
    #[must_use]
    pub fn round_tenth(self) -> Money {
        self.checked_round_tenth()
            .unwrap_or(Money(self.0 / TENTH as i64 * TENTH as i64))
    }

    /// Rounds like [`Money::round_tenth`], returning `None` when the rounded
    /// amount does not fit.
    #[must_use]
    pub fn checked_round_tenth(self) -> Option<Money> {
        Money::from_tenths(div_round(i128::from(self.0), TENTH))
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    pub(crate) fn from_tenths(tenths: i128) -> Option<Money> {
        tenths
            .checked_mul(TENTH)
            .and_then(|cents| i64::try_from(cents).ok())
            .map(Money)
    }
}

/// Integer division rounding half away from zero. `den` must be positive.
pub(crate) fn div_round(num: i128, den: i128) -> i128 {
    let quotient = num / den;
    let remainder = num % den;
    if 2 * remainder.abs() >= den {
        quotient + num.signum()
    } else {
        quotient
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{units}.{cents:02}")
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
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

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`.
    /// Negative amounts are rejected: bills carry no refunds.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidAmount(format!("invalid amount \"{s}\""));
        let overflow = || EngineError::InvalidAmount("amount too large".to_string());

        let trimmed = s.trim();
        if trimmed.starts_with('-') {
            return Err(EngineError::InvalidAmount(format!(
                "negative amount \"{s}\""
            )));
        }
        let rest = trimmed.strip_prefix('+').unwrap_or(trimmed).trim();
        if rest.is_empty() {
            return Err(EngineError::InvalidAmount("empty amount".to_string()));
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let units_str = parts.next().ok_or_else(invalid)?;
        let cents_str = parts.next();

        if parts.next().is_some() {
            return Err(invalid());
        }

        if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let units: i64 = units_str.parse().map_err(|_| overflow())?;

        let cents: i64 = match cents_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                    2 => frac.parse::<i64>().map_err(|_| invalid())?,
                    _ => return Err(EngineError::InvalidAmount("too many decimals".to_string())),
                }
            }
        };

        units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .map(Money)
            .ok_or_else(overflow)
    }
}

/// Tip percentage stored as hundredths of a percent.
///
/// `12.5%` is held as `1250`, so any percentage with up to two decimals is
/// exact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TipRate(i64);

impl TipRate {
    pub const NONE: TipRate = TipRate(0);

    /// Creates a rate from hundredths of a percent.
    #[must_use]
    pub const fn from_basis_points(basis_points: i64) -> Self {
        Self(basis_points)
    }

    /// Creates a rate from a percentage such as `10` or `12.5`.
    pub fn from_percent(percent: f64) -> Result<Self, EngineError> {
        if !percent.is_finite() {
            return Err(EngineError::InvalidTip(format!("{percent} is not a number")));
        }
        if percent < 0.0 {
            return Err(EngineError::InvalidTip(format!("{percent}% is negative")));
        }
        let basis_points = (percent * 100.0).round();
        if basis_points >= i64::MAX as f64 {
            return Err(EngineError::InvalidTip(format!("{percent}% is too large")));
        }
        Ok(Self(basis_points as i64))
    }

    #[must_use]
    pub const fn basis_points(self) -> i64 {
        self.0
    }

    #[must_use]
    pub fn as_percent(self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Tip owed on `amount`, rounded to the nearest tenth.
    ///
    /// Fails with [`EngineError::InvalidAmount`] when the tip does not fit in
    /// [`Money`].
    pub fn tip_on(self, amount: Money) -> Result<Money, EngineError> {
        let raw = i128::from(amount.cents()) * i128::from(self.0);
        Money::from_tenths(div_round(raw, BASIS_POINTS * TENTH))
            .ok_or_else(|| EngineError::InvalidAmount(format!("tip {self} on {amount} too large")))
    }

    /// Applies the tip to `scaled / people` cents and rounds the result to the
    /// nearest tenth.
    pub(crate) fn apply_rounded(self, scaled: i128, people: i128) -> Result<Money, EngineError> {
        scaled
            .checked_mul(BASIS_POINTS + i128::from(self.0))
            .and_then(|with_tip| {
                Money::from_tenths(div_round(with_tip, people * BASIS_POINTS * TENTH))
            })
            .ok_or_else(|| EngineError::InvalidAmount(format!("share with tip {self} too large")))
    }
}

impl fmt::Display for TipRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let frac = (self.0 % 100).abs();
        if frac == 0 {
            write!(f, "{whole}%")
        } else {
            write!(f, "{whole}.{frac:02}%")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_units() {
        assert_eq!(Money::new(0).to_string(), "0.00");
        assert_eq!(Money::new(1).to_string(), "0.01");
        assert_eq!(Money::new(10).to_string(), "0.10");
        assert_eq!(Money::new(1050).to_string(), "10.50");
        assert_eq!(Money::new(-1050).to_string(), "-10.50");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<Money>().unwrap().cents(), 1000);
        assert_eq!("10.5".parse::<Money>().unwrap().cents(), 1050);
        assert_eq!("10,50".parse::<Money>().unwrap().cents(), 1050);
        assert_eq!("+1.00".parse::<Money>().unwrap().cents(), 100);
        assert_eq!("  2.30 ".parse::<Money>().unwrap().cents(), 230);
    }

    #[test]
    fn parse_rejects_negatives_and_extra_decimals() {
        assert!("-0.01".parse::<Money>().is_err());
        assert!("12.345".parse::<Money>().is_err());
        assert!("".parse::<Money>().is_err());
        assert!("1.2.3".parse::<Money>().is_err());
    }

    #[test]
    fn from_major_rounds_to_cents() {
        assert_eq!(Money::from_major(20.0).unwrap(), Money::new(2000));
        assert_eq!(Money::from_major(0.1 + 0.2).unwrap(), Money::new(30));
        assert_eq!(Money::from_major(12.346).unwrap(), Money::new(1235));
        assert!(Money::from_major(f64::NAN).is_err());
        assert!(Money::from_major(f64::INFINITY).is_err());
    }

    #[test]
    fn round_tenth_is_half_away_from_zero() {
        assert_eq!(Money::new(1234).round_tenth(), Money::new(1230));
        assert_eq!(Money::new(1235).round_tenth(), Money::new(1240));
        assert_eq!(Money::new(1236).round_tenth(), Money::new(1240));
        assert_eq!(Money::new(-1235).round_tenth(), Money::new(-1240));
        assert_eq!(Money::new(-1234).round_tenth(), Money::new(-1230));
        assert!(Money::new(1240).is_tenth());
        assert!(!Money::new(1241).is_tenth());
    }

    #[test]
    fn div_round_handles_signs() {
        assert_eq!(div_round(7, 2), 4);
        assert_eq!(div_round(-7, 2), -4);
        assert_eq!(div_round(5, 3), 2);
        assert_eq!(div_round(4, 3), 1);
        assert_eq!(div_round(0, 3), 0);
    }

    #[test]
    fn tip_rate_from_percent() {
        assert_eq!(TipRate::from_percent(10.0).unwrap().basis_points(), 1000);
        assert_eq!(TipRate::from_percent(12.5).unwrap().basis_points(), 1250);
        assert_eq!(TipRate::from_percent(12.5).unwrap().to_string(), "12.50%");
        assert_eq!(TipRate::from_percent(15.0).unwrap().to_string(), "15%");
        assert!(TipRate::from_percent(-1.0).is_err());
        assert!(TipRate::from_percent(f64::NAN).is_err());
    }

    #[test]
    fn tip_on_rounds_to_tenths() {
        let ten = TipRate::from_percent(10.0).unwrap();
        assert_eq!(ten.tip_on(Money::new(2800)).unwrap(), Money::new(280));
        // 12.34 * 10% = 1.234
        assert_eq!(ten.tip_on(Money::new(1234)).unwrap(), Money::new(120));
        // 12.50 * 10% = 1.25
        assert_eq!(ten.tip_on(Money::new(1250)).unwrap(), Money::new(130));
        assert_eq!(TipRate::NONE.tip_on(Money::new(9999)).unwrap(), Money::ZERO);
    }

    #[test]
    fn tip_on_reports_overflow() {
        let huge = TipRate::from_percent(1e15).unwrap();
        assert!(matches!(
            huge.tip_on(Money::new(100_000_000)),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(matches!(
            huge.apply_rounded(i128::from(i64::MAX), 2),
            Err(EngineError::InvalidAmount(_))
        ));
    }

    #[test]
    fn round_tenth_near_bounds_stays_in_range() {
        let max = Money::new(i64::MAX);
        assert_eq!(max.checked_round_tenth(), None);
        assert!(max.round_tenth().is_tenth());
        assert!(max.round_tenth() <= max);
        assert_eq!(Money::new(i64::MAX - 7).checked_round_tenth(), Some(Money::new(i64::MAX - 7)));
    }
}
