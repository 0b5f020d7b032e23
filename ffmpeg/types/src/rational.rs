/*!
    Rational number type for time bases, frame rates and aspect ratios.
*/

use std::fmt;
use std::str::FromStr;

use crate::Error;

/**
    A rational number represented as a numerator and denominator.

    Used for time bases (e.g., 1/90000 for MPEG-TS), frame rates
    (e.g., 24000/1001 for 23.976 fps) and sample aspect ratios.

    A zero numerator means "unset" wherever a stream parameter is optional,
    which is why [`Rational::ZERO`] is a valid, constructible value.
*/
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    pub num: i32,
    pub den: i32,
}

impl Rational {
    /// The unset value, `0/1`.
    pub const ZERO: Self = Self { num: 0, den: 1 };

    /**
        Create a new rational number.

        # Panics

        Panics if `den` is zero.
    */
    #[inline]
    pub const fn new(num: i32, den: i32) -> Self {
        assert!(den != 0, "denominator cannot be zero");
        Self { num, den }
    }

    /**
        Returns true if the numerator is zero.
    */
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.num == 0
    }

    /**
        Convert to f64.
    */
    #[inline]
    pub fn to_f64(self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /**
        Invert the rational (swap numerator and denominator).

        # Panics

        Panics if numerator is zero.
    */
    #[inline]
    pub const fn invert(self) -> Self {
        assert!(self.num != 0, "cannot invert zero");
        Self {
            num: self.den,
            den: self.num,
        }
    }

    /**
        Reduce to lowest terms with a positive denominator.

        Returns `None` if either side does not fit an `i32` after reduction.
    */
    pub fn reduced(num: i64, den: i64) -> Option<Self> {
        if den == 0 {
            return None;
        }
        let divisor = gcd(num.unsigned_abs(), den.unsigned_abs()).max(1) as i64;
        let (mut num, mut den) = (num / divisor, den / divisor);
        if den < 0 {
            num = -num;
            den = -den;
        }
        Some(Self {
            num: i32::try_from(num).ok()?,
            den: i32::try_from(den).ok()?,
        })
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

impl Default for Rational {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

impl From<(i32, i32)> for Rational {
    fn from((num, den): (i32, i32)) -> Self {
        Self::new(num, den)
    }
}

impl From<i32> for Rational {
    fn from(num: i32) -> Self {
        Self::new(num, 1)
    }
}

/**
    Parses `num/den`, `num:den`, a plain integer, or a decimal such as `29.97`.

    The result is always reduced. A zero denominator is rejected.
*/
impl FromStr for Rational {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || Error::invalid_data(format!("invalid rational '{s}'"));

        if let Some((num, den)) = s.split_once(['/', ':']) {
            let num: i64 = num.trim().parse().map_err(|_| invalid())?;
            let den: i64 = den.trim().parse().map_err(|_| invalid())?;
            return Self::reduced(num, den).ok_or_else(invalid);
        }

        if let Ok(whole) = s.parse::<i64>() {
            return Self::reduced(whole, 1).ok_or_else(invalid);
        }

        // Decimal form: scale by a power of ten, then reduce.
        let (whole, frac) = s.split_once('.').ok_or_else(invalid)?;
        if frac.is_empty() || frac.len() > 9 || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let negative = whole.starts_with('-');
        let whole: i64 = match whole {
            "" | "-" | "+" => 0,
            w => w.parse().map_err(|_| invalid())?,
        };
        let scale = 10_i64.pow(frac.len() as u32);
        let frac: i64 = frac.parse().map_err(|_| invalid())?;
        let magnitude = whole
            .unsigned_abs()
            .checked_mul(scale as u64)
            .and_then(|w| w.checked_add(frac as u64))
            .and_then(|m| i64::try_from(m).ok())
            .ok_or_else(invalid)?;
        let num = if negative { -magnitude } else { magnitude };
        Self::reduced(num, scale).ok_or_else(invalid)
    }
}
