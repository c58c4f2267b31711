//! Fraction value type

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::QuizError;

/// An immutable `numerator / denominator` pair.
///
/// The denominator is never zero and neither part is `i64::MIN`, so every
/// magnitude fits in an `i64`. The denominator may be negative until
/// [`Fraction::simplify`] is applied, which always yields a positive
/// denominator and coprime parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawFraction")]
pub struct Fraction {
    numerator: i64,
    denominator: i64,
}

/// Unchecked wire form, validated through [`Fraction::new`]
#[derive(Deserialize)]
struct RawFraction {
    numerator: i64,
    denominator: i64,
}

impl TryFrom<RawFraction> for Fraction {
    type Error = QuizError;

    fn try_from(raw: RawFraction) -> Result<Self, Self::Error> {
        Fraction::new(raw.numerator, raw.denominator)
    }
}

impl Fraction {
    pub fn new(numerator: i64, denominator: i64) -> Result<Self, QuizError> {
        if denominator == 0 {
            return Err(QuizError::ZeroDenominator);
        }
        if numerator == i64::MIN || denominator == i64::MIN {
            return Err(QuizError::InvalidInput(format!(
                "{numerator}/{denominator} is out of range"
            )));
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    pub fn numerator(&self) -> i64 {
        self.numerator
    }

    pub fn denominator(&self) -> i64 {
        self.denominator
    }

    /// Construct from parts known to be in range (non-zero denominator, no `i64::MIN`)
    pub(crate) const fn from_parts(numerator: i64, denominator: i64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Canonical form: denominator > 0 and gcd(|n|, |d|) == 1
    pub fn simplify(&self) -> Self {
        let g = gcd(self.numerator.unsigned_abs(), self.denominator.unsigned_abs()).max(1);
        let negative = (self.numerator < 0) != (self.denominator < 0);
        let n = (self.numerator.unsigned_abs() / g) as i64;
        let d = (self.denominator.unsigned_abs() / g) as i64;
        Self {
            numerator: if negative { -n } else { n },
            denominator: d,
        }
    }

    /// Approximate value (for comparisons in tests and logging)
    pub fn value(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Exact `self < other`, valid for any sign of denominators
    pub fn less_than(&self, other: &Fraction) -> bool {
        let a = self.simplify();
        let b = other.simplify();
        i128::from(a.numerator) * i128::from(b.denominator)
            < i128::from(b.numerator) * i128::from(a.denominator)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Euclid
fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_denominator_rejected() {
        assert_eq!(Fraction::new(3, 0), Err(QuizError::ZeroDenominator));
    }

    #[test]
    fn test_min_parts_rejected() {
        assert!(matches!(Fraction::new(i64::MIN, 1), Err(QuizError::InvalidInput(_))));
        assert!(matches!(Fraction::new(1, i64::MIN), Err(QuizError::InvalidInput(_))));
        // Largest magnitudes still simplify to a positive denominator
        let f = Fraction::new(1, -i64::MAX).unwrap().simplify();
        assert_eq!((f.numerator(), f.denominator()), (-1, i64::MAX));
    }

    #[test]
    fn test_deserialize_validates() {
        let f: Fraction = serde_json::from_str(r#"{"numerator":2,"denominator":4}"#).unwrap();
        assert_eq!(f, Fraction::from_parts(2, 4));
        assert!(serde_json::from_str::<Fraction>(r#"{"numerator":1,"denominator":0}"#).is_err());
    }

    #[test]
    fn test_simplify_reduces() {
        assert_eq!(Fraction::from_parts(6, 8).simplify(), Fraction::from_parts(3, 4));
        assert_eq!(Fraction::from_parts(10, 5).simplify(), Fraction::from_parts(2, 1));
    }

    #[test]
    fn test_simplify_moves_sign_to_numerator() {
        assert_eq!(Fraction::from_parts(3, -6).simplify(), Fraction::from_parts(-1, 2));
        assert_eq!(Fraction::from_parts(-3, -6).simplify(), Fraction::from_parts(1, 2));
    }

    #[test]
    fn test_simplify_zero() {
        assert_eq!(Fraction::from_parts(0, -7).simplify(), Fraction::from_parts(0, 1));
    }

    #[test]
    fn test_less_than() {
        assert!(Fraction::from_parts(1, 3).less_than(&Fraction::from_parts(1, 2)));
        assert!(!Fraction::from_parts(2, 4).less_than(&Fraction::from_parts(1, 2)));
        assert!(Fraction::from_parts(1, -2).less_than(&Fraction::from_parts(0, 1)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Fraction::from_parts(5, 12).to_string(), "5/12");
    }

    proptest! {
        #[test]
        fn prop_simplify_idempotent(n in -10_000i64..10_000, d in -10_000i64..10_000) {
            prop_assume!(d != 0);
            let once = Fraction::from_parts(n, d).simplify();
            prop_assert_eq!(once.simplify(), once);
        }

        #[test]
        fn prop_simplify_canonical(n in -10_000i64..10_000, d in -10_000i64..10_000) {
            prop_assume!(d != 0);
            let s = Fraction::from_parts(n, d).simplify();
            prop_assert!(s.denominator > 0);
            prop_assert_eq!(gcd(s.numerator.unsigned_abs(), s.denominator.unsigned_abs()), 1);
            // Same value
            prop_assert_eq!(
                i128::from(s.numerator) * i128::from(d),
                i128::from(n) * i128::from(s.denominator)
            );
        }
    }
}
