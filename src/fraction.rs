//! Fraction arithmetic and display labels
//!
//! Labels are presentation only. Correctness checks always compare the
//! numeric question value, never a re-parsed label.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Values closer than this to an integer (or to zero remainder) render as integers
const INTEGER_EPSILON: f64 = 1e-4;

/// A signed fraction `num / den`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fraction {
    pub num: i64,
    pub den: i64,
}

impl Fraction {
    pub const fn new(num: i64, den: i64) -> Self {
        Self { num, den }
    }

    /// Floating point value (0 for a zero denominator)
    pub fn value(&self) -> f64 {
        if self.den == 0 {
            0.0
        } else {
            self.num as f64 / self.den as f64
        }
    }

    /// Lowest terms with a positive denominator
    pub fn simplified(&self) -> Self {
        simplify_fraction(self.num, self.den)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

fn gcd_unsigned(mut x: u128, mut y: u128) -> u128 {
    while y != 0 {
        let t = x % y;
        x = y;
        y = t;
    }
    x
}

/// Narrow back to i64, saturating the single out-of-range magnitude (2^63)
fn saturate(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}

/// Greatest common divisor of the absolute values (1 when both are zero)
pub fn gcd(a: i64, b: i64) -> i64 {
    let g = gcd_unsigned(a.unsigned_abs() as u128, b.unsigned_abs() as u128);
    if g == 0 { 1 } else { saturate(g as i128) }
}

/// Reduce `num / den` to lowest terms with a positive denominator.
///
/// A zero denominator yields `0/1` instead of failing. Arithmetic is widened
/// so every i64 input works, including `i64::MIN`.
pub fn simplify_fraction(num: i64, den: i64) -> Fraction {
    if den == 0 {
        return Fraction::new(0, 1);
    }
    let (mut n, mut d) = (num as i128, den as i128);
    if d < 0 {
        n = -n;
        d = -d;
    }
    let g = gcd_unsigned(n.unsigned_abs(), d.unsigned_abs()) as i128;
    Fraction::new(saturate(n / g), saturate(d / g))
}

/// Closest `num/den` to `value` over `den` in `dens`.
///
/// The first candidate with a strictly smaller error wins, so ties go to the
/// smallest denominator scanned. Zero numerators are skipped when
/// `skip_zero` is set.
fn best_fit(value: f64, dens: impl Iterator<Item = i64>, skip_zero: bool) -> Option<Fraction> {
    let mut best: Option<(Fraction, f64)> = None;
    for den in dens {
        let num = (value * den as f64).round() as i64;
        if skip_zero && num == 0 {
            continue;
        }
        let err = (value - num as f64 / den as f64).abs();
        if best.is_none_or(|(_, best_err)| err < best_err) {
            best = Some((Fraction::new(num, den), err));
        }
    }
    best.map(|(frac, _)| frac)
}

/// Label `value` as the nearest fraction with denominator up to `max_den`
pub fn to_fraction_label(value: f64, max_den: i64) -> String {
    if !value.is_finite() {
        return "?".to_string();
    }
    let rounded = value.round();
    if (value - rounded).abs() < INTEGER_EPSILON {
        return format!("{}", rounded as i64);
    }

    let Some(fit) = best_fit(value, 1..=max_den.max(1), false) else {
        return format!("{}", rounded as i64);
    };
    fit.simplified().to_string()
}

/// Label `value` as a mixed number (`"1 3/4"`, `"-2 1/3"`).
///
/// Values with no whole part, or with no fractional remainder, fall back to
/// [`to_fraction_label`].
pub fn to_mixed_label(value: f64, max_den: i64) -> String {
    if !value.is_finite() {
        return "?".to_string();
    }
    let negative = value < 0.0;
    let abs = value.abs();
    let mut whole = abs.floor() as i64;
    let frac = abs - whole as f64;
    if whole == 0 || frac < INTEGER_EPSILON {
        return to_fraction_label(value, max_den);
    }

    let prefix = if negative { "-" } else { "" };
    let Some(fit) = best_fit(frac, 2..=max_den, true) else {
        return format!("{prefix}{whole}");
    };

    let simplified = fit.simplified();
    if simplified.num >= simplified.den {
        // Remainder rounded up to a whole unit
        whole += simplified.num / simplified.den;
        let rest = simplified.num % simplified.den;
        if rest == 0 {
            return format!("{prefix}{whole}");
        }
        return format!("{prefix}{whole} {}/{}", rest, simplified.den);
    }
    format!("{prefix}{whole} {}/{}", simplified.num.abs(), simplified.den)
}
