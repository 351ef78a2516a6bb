use std::{
    cmp::Ordering,
    fmt::{self, Display},
    ops::{Add, Sub},
};

use crate::Error;

/// An exact rational number, always stored in lowest terms with a positive
/// denominator.
///
/// Interval endpoints and projected intersection points are kept as
/// fractions so that occlusion comparisons never suffer from rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(try_from = "RawFraction"))]
pub struct Fraction {
    n: i64,
    d: i64,
}

/// Deserialized form, normalized through [`Fraction::try_new`]
#[cfg(feature = "serialize")]
#[derive(serde::Deserialize)]
struct RawFraction {
    n: i64,
    d: i64,
}

#[cfg(feature = "serialize")]
impl TryFrom<RawFraction> for Fraction {
    type Error = Error;

    fn try_from(raw: RawFraction) -> Result<Self, Self::Error> {
        Self::try_new(raw.n, raw.d)
    }
}

/// Greatest common divisor. Always non-negative.
pub fn gcd(x: i64, y: i64) -> i64 {
    let (mut a, mut b) = (x.abs(), y.abs());
    while a != 0 {
        (a, b) = (b % a, a);
    }
    b
}

impl Fraction {
    /// Creates the fraction `n / d`, reduced to lowest terms.
    ///
    /// # Panics
    /// If `d` is zero.
    pub fn new(n: i64, d: i64) -> Self {
        assert!(d != 0, "Invalid denominator");

        let (n, d) = if d < 0 { (-n, -d) } else { (n, d) };
        let gcd = gcd(n, d);

        Self {
            n: n / gcd,
            d: d / gcd,
        }
    }

    /// Like [`Fraction::new`], but fails instead of panicking on a zero
    /// denominator
    pub fn try_new(n: i64, d: i64) -> Result<Self, Error> {
        if d == 0 {
            return Err(Error::ZeroDenominator(n));
        }
        Ok(Self::new(n, d))
    }

    /// Get the fraction's numerator.
    pub fn numer(&self) -> i64 {
        self.n
    }

    /// Get the fraction's denominator.
    pub fn denom(&self) -> i64 {
        self.d
    }

    pub fn is_whole_number(&self) -> bool {
        self.d == 1
    }

    /// Computes `self * multiply / divide` exactly.
    pub fn multiply_divide(&self, multiply: i32, divide: i32) -> Self {
        Self::new(self.n * multiply as i64, self.d * divide as i64)
    }

    pub fn multiply(&self, other: Self) -> Self {
        Self::new(self.n * other.n, self.d * other.d)
    }

    pub fn divide(&self, other: Self) -> Self {
        Self::new(self.n * other.d, self.d * other.n)
    }

    /// Largest integer less than or equal to self.
    pub fn floor(&self) -> i32 {
        self.n.div_euclid(self.d) as i32
    }

    /// Smallest integer greater than or equal to self.
    pub fn ceil(&self) -> i32 {
        -((-self.n).div_euclid(self.d)) as i32
    }

    pub fn to_f32(&self) -> f32 {
        self.n as f32 / self.d as f32
    }
}

impl From<i32> for Fraction {
    fn from(n: i32) -> Self {
        Self { n: n as i64, d: 1 }
    }
}

impl Add<i32> for Fraction {
    type Output = Self;

    fn add(self, rhs: i32) -> Self::Output {
        Self::new(self.n + rhs as i64 * self.d, self.d)
    }
}

impl Sub<i32> for Fraction {
    type Output = Self;

    fn sub(self, rhs: i32) -> Self::Output {
        Self::new(self.n - rhs as i64 * self.d, self.d)
    }
}

impl Add for Fraction {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.n * rhs.d + rhs.n * self.d, self.d * rhs.d)
    }
}

impl Sub for Fraction {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.n * rhs.d - rhs.n * self.d, self.d * rhs.d)
    }
}

// n1/d1 < n2/d2 iff n1*d2 < n2*d1 as both denominators are positive
impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.n * other.d).cmp(&(other.n * self.d))
    }
}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq<i32> for Fraction {
    fn eq(&self, other: &i32) -> bool {
        self.d == 1 && self.n == *other as i64
    }
}

impl PartialOrd<i32> for Fraction {
    fn partial_cmp(&self, other: &i32) -> Option<Ordering> {
        Some(self.n.cmp(&(*other as i64 * self.d)))
    }
}

impl Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.n, self.d)
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;

    #[test]
    fn gcd_signs() {
        assert_eq!(gcd(5, 3), 1);
        assert_eq!(gcd(5, 10), 5);
        assert_eq!(gcd(80, 45), 5);
        assert_eq!(gcd(-5, 3), 1);
        assert_eq!(gcd(5, 0), 5);
        assert_eq!(gcd(6, -4), 2);
        assert_eq!(gcd(-24, -18), 6);
        assert_eq!(gcd(0, 0), 0);
        assert_eq!(gcd(0, -2), 2);
        assert_eq!(gcd(-72, -13), 1);
    }

    #[test]
    fn lowest_terms() {
        let f = Fraction::new(6, -4);
        assert_eq!(f.numer(), -3);
        assert_eq!(f.denom(), 2);

        assert_eq!(Fraction::new(0, -7), Fraction::from(0));
        assert_eq!(Fraction::new(-8, -2), Fraction::from(4));
        assert!(Fraction::new(-8, -2).is_whole_number());
        assert_eq!(Fraction::new(3, 9).to_string(), "1/3");
    }

    #[test]
    #[should_panic(expected = "Invalid denominator")]
    fn zero_denominator() {
        Fraction::new(1, 0);
    }

    #[test]
    fn try_new() {
        assert_eq!(Fraction::try_new(4, -6), Ok(Fraction::new(-2, 3)));
        assert_eq!(Fraction::try_new(1, 0), Err(Error::ZeroDenominator(1)));
    }

    #[test]
    fn floor_and_ceil() {
        let floors = [-2, -2, -2, -1, -1, -1, 0, 0, 0, 1, 1, 1, 2];
        let ceils = [-2, -1, -1, -1, 0, 0, 0, 1, 1, 1, 2, 2, 2];

        for (n, (floor, ceil)) in (-6..=6).zip(floors.iter().zip(ceils.iter())) {
            let f = Fraction::new(n, 3);
            assert_eq!(f.floor(), *floor, "floor of {}", f);
            assert_eq!(f.ceil(), *ceil, "ceil of {}", f);
        }
    }

    #[test]
    fn integer_comparisons() {
        let f = Fraction::new(7, 2);

        assert!(f < 4);
        assert!(f > 3);
        assert!(f <= 4);
        assert!(!(f <= 3));
        assert!(Fraction::from(3) <= 3);
        assert!(Fraction::from(3) == 3);
        assert!(f != 3);
    }

    #[test]
    fn projection_arithmetic() {
        // (x - bx) * (dy + 1) / dy + bx with x = 1, bx = 4, dy = 2
        let p = (Fraction::from(1) - 4).multiply_divide(3, 2) + 4;
        assert_eq!(p, Fraction::new(-1, 2));
        assert_eq!(p.floor(), -1);
        assert_eq!(p.ceil(), 0);

        let sum = Fraction::new(1, 3) + Fraction::new(1, 6);
        assert_eq!(sum, Fraction::new(1, 2));
        assert_eq!(sum - Fraction::new(1, 2), Fraction::from(0));
        assert_eq!(
            Fraction::new(2, 3).multiply(Fraction::new(3, 4)),
            Fraction::new(1, 2)
        );
        assert_eq!(
            Fraction::new(2, 3).divide(Fraction::new(4, 3)),
            Fraction::new(1, 2)
        );
    }

    #[test]
    fn random_arithmetic() {
        let mut rng = StdRng::seed_from_u64(17);

        for _ in 0..1000 {
            let a = Fraction::new(rng.gen_range(-500..500), rng.gen_range(1..60));
            let b = Fraction::new(rng.gen_range(-500..500), -rng.gen_range(1..60));
            let k: i32 = rng.gen_range(-100..100);

            assert_eq!((a + k) - k, a);
            assert_eq!(
                a < b,
                a.numer() * b.denom() < b.numer() * a.denom(),
                "{} < {}",
                a,
                b
            );

            for f in [a, b, a + b, a - b, a.multiply_divide(k.max(1), 7)] {
                assert!(f.denom() > 0);
                assert_eq!(gcd(f.numer(), f.denom()), 1);
            }
        }
    }
}
