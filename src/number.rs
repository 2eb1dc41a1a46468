//! The numeric representation values carry through quantifier application
//! and formatting.
//!
//! Input values are signed 64-bit integers (§4.I "Numeric semantics").
//! Quantifiers may promote them to fractional results; formatting then
//! preserves the narrowest loss-less representation unless a quantifier
//! explicitly asked for a fixed decimal count.

use std::fmt;

/// A value after (possibly trivial) quantifier application.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Exact integer, rendered without a decimal point.
    Int(i64),
    /// Fractional value, rendered with the minimal number of digits needed.
    Float(f64),
    /// Fractional value from a quantifier that explicitly rounds to 2
    /// decimal places; always rendered with exactly two digits.
    Fixed2(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(v) => v as f64,
            Number::Float(v) | Number::Fixed2(v) => v,
        }
    }

    /// Negate, preserving exactness of `Int`.
    pub fn negate(self) -> Number {
        match self {
            Number::Int(v) => Number::Int(-v),
            Number::Float(v) => Number::Float(-v),
            Number::Fixed2(v) => Number::Fixed2(-v),
        }
    }

    /// Build the narrowest loss-less representation of a division or
    /// multiplication result: integral results stay `Int`.
    pub fn from_f64_narrowest(v: f64) -> Number {
        if v.fract() == 0.0 && v.is_finite() {
            Number::Int(v as i64)
        } else {
            Number::Float(v)
        }
    }

    pub fn round_0dp(self) -> Number {
        Number::Int(self.as_f64().round() as i64)
    }

    pub fn round_2dp(self) -> Number {
        let scaled = (self.as_f64() * 100.0).round() / 100.0;
        Number::Fixed2(scaled)
    }

    pub fn is_negative(self) -> bool {
        match self {
            Number::Int(v) => v < 0,
            Number::Float(v) | Number::Fixed2(v) => v < 0.0,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(v) => write!(f, "{}", v),
            Number::Float(v) => {
                if v.fract() == 0.0 {
                    write!(f, "{}", *v as i64)
                } else {
                    write!(f, "{}", v)
                }
            }
            Number::Fixed2(v) => write!(f, "{:.2}", v),
        }
    }
}

/// Render with an explicit leading sign, for the `%N$+d` placeholder form.
pub fn display_signed(n: Number) -> String {
    if n.is_negative() {
        // the numeric Display already carries the `-`
        format!("{}", n)
    } else {
        format!("+{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_division_renders_as_int() {
        let n = Number::from_f64_narrowest(100.0 / 10.0);
        assert_eq!(n.to_string(), "10");
    }

    #[test]
    fn fractional_division_renders_minimally() {
        let n = Number::from_f64_narrowest(7.0 / 2.0);
        assert_eq!(n.to_string(), "3.5");
    }

    #[test]
    fn fixed2_always_shows_two_decimals() {
        let n = Number::Float(1.5).round_2dp();
        assert_eq!(n.to_string(), "1.50");
    }

    #[test]
    fn signed_form_keeps_negative_sign() {
        assert_eq!(display_signed(Number::Int(-5)), "-5");
        assert_eq!(display_signed(Number::Int(5)), "+5");
        assert_eq!(display_signed(Number::Int(0)), "+0");
    }
}
