//! Component B — the fixed registry of named numeric transforms and the
//! per-variant bindings of transform name to value indices.

use crate::number::Number;
use crate::value::TransformedValue;

/// One entry of the fixed, process-wide quantifier table (§3 "Quantifier
/// binding").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    DecisecondsToSeconds,
    DivideByOneHundred,
    PerMinuteToPerSecond,
    MillisecondsToSeconds,
    Negate,
    DivideByOneHundredAndNegate,
    OldLeechPercent,
    OldLeechPermyriad,
    PerMinuteToPerSecond0dp,
    PerMinuteToPerSecond2dp,
    MillisecondsToSeconds0dp,
    MillisecondsToSeconds2dp,
}

impl Quantifier {
    /// Look up a transform by its file-format name. `None` for anything not
    /// in the registry — the caller decides whether that's a load-time
    /// warning (parser) or a call-time error (query engine).
    pub fn from_name(name: &str) -> Option<Quantifier> {
        use Quantifier::*;
        Some(match name {
            "deciseconds_to_seconds" => DecisecondsToSeconds,
            "divide_by_one_hundred" => DivideByOneHundred,
            "per_minute_to_per_second" => PerMinuteToPerSecond,
            "milliseconds_to_seconds" => MillisecondsToSeconds,
            "negate" => Negate,
            "divide_by_one_hundred_and_negate" => DivideByOneHundredAndNegate,
            "old_leech_percent" => OldLeechPercent,
            "old_leech_permyriad" => OldLeechPermyriad,
            "per_minute_to_per_second_0dp" => PerMinuteToPerSecond0dp,
            "per_minute_to_per_second_2dp" => PerMinuteToPerSecond2dp,
            "milliseconds_to_seconds_0dp" => MillisecondsToSeconds0dp,
            "milliseconds_to_seconds_2dp" => MillisecondsToSeconds2dp,
            _ => return None,
        })
    }

    /// Apply this transform to a single scalar.
    pub fn apply_scalar(&self, n: Number) -> Number {
        use Quantifier::*;
        match self {
            DecisecondsToSeconds => Number::from_f64_narrowest(n.as_f64() * 10.0),
            DivideByOneHundred => Number::from_f64_narrowest(n.as_f64() / 100.0),
            PerMinuteToPerSecond => Number::from_f64_narrowest(n.as_f64() / 60.0),
            MillisecondsToSeconds => Number::from_f64_narrowest(n.as_f64() / 1000.0),
            Negate => n.negate(),
            DivideByOneHundredAndNegate => Number::from_f64_narrowest(-n.as_f64() / 100.0),
            OldLeechPercent => Number::from_f64_narrowest(n.as_f64() / 5.0),
            OldLeechPermyriad => Number::from_f64_narrowest(n.as_f64() / 50.0),
            PerMinuteToPerSecond0dp => Number::from_f64_narrowest(n.as_f64() / 60.0).round_0dp(),
            PerMinuteToPerSecond2dp => Number::from_f64_narrowest(n.as_f64() / 60.0).round_2dp(),
            MillisecondsToSeconds0dp => {
                Number::from_f64_narrowest(n.as_f64() / 1000.0).round_0dp()
            }
            MillisecondsToSeconds2dp => {
                Number::from_f64_narrowest(n.as_f64() / 1000.0).round_2dp()
            }
        }
    }

    /// Apply pointwise: independently on each endpoint of a range value.
    pub fn apply(&self, v: TransformedValue) -> TransformedValue {
        match v {
            TransformedValue::Scalar(n) => TransformedValue::Scalar(self.apply_scalar(n)),
            TransformedValue::Range(lo, hi) => {
                TransformedValue::Range(self.apply_scalar(lo), self.apply_scalar(hi))
            }
        }
    }
}

/// A variant's bindings from transform to the (1-based, as declared in the
/// file) value indices it applies to. Declaration order is preserved for
/// determinism even though, per §8, quantifiers on distinct indices never
/// interact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuantifierBinding {
    bindings: Vec<(Quantifier, Vec<usize>)>,
}

impl QuantifierBinding {
    pub fn new() -> QuantifierBinding {
        QuantifierBinding::default()
    }

    /// `index` is 1-based as read from the file.
    pub fn bind(&mut self, quantifier: Quantifier, index_1based: usize) {
        self.bindings.push((quantifier, vec![index_1based]));
    }

    /// Bind by raw file-format name rather than an already-resolved
    /// [`Quantifier`]. `Parser` never calls this: it downgrades an unknown
    /// name to a `Diagnostic::UnknownQuantifier` warning at load time
    /// (§4.F) instead. This is the call-time check §4.B/§7 describe for a
    /// caller assembling a [`QuantifierBinding`] directly (bypassing the
    /// text parser): an unrecognized name is fatal to that call.
    pub fn try_bind(
        &mut self,
        name: &str,
        index_1based: usize,
    ) -> Result<(), crate::error::TranslateError> {
        match Quantifier::from_name(name) {
            Some(q) => {
                self.bind(q, index_1based);
                Ok(())
            }
            None => Err(crate::error::TranslateError::InvalidQuantifier(
                name.to_string(),
            )),
        }
    }

    /// Apply every binding to the given values (0-based slice). Applied
    /// exactly once per render call (§8 "Quantifier application is
    /// idempotent within a call").
    pub fn apply(&self, values: &mut [TransformedValue]) {
        for (quantifier, indices) in &self.bindings {
            for &idx in indices {
                if idx == 0 || idx > values.len() {
                    continue;
                }
                let slot = idx - 1;
                values[slot] = quantifier.apply(values[slot]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::TransformedValue;

    #[test]
    fn negate_preserves_exact_integer() {
        let q = Quantifier::Negate;
        assert_eq!(q.apply_scalar(Number::Int(-5)).to_string(), "5");
    }

    #[test]
    fn per_minute_0dp_rounds_to_integer() {
        let q = Quantifier::PerMinuteToPerSecond0dp;
        // 150 / 60 = 2.5 -> rounds to 3 (round-half-away-from-zero via f64::round)
        assert_eq!(q.apply_scalar(Number::Int(150)).to_string(), "3");
    }

    #[test]
    fn milliseconds_2dp_keeps_two_decimals() {
        let q = Quantifier::MillisecondsToSeconds2dp;
        assert_eq!(q.apply_scalar(Number::Int(1500)).to_string(), "1.50");
    }

    #[test]
    fn pointwise_on_ranges() {
        let q = Quantifier::Negate;
        let v = TransformedValue::Range(Number::Int(3), Number::Int(7));
        match q.apply(v) {
            TransformedValue::Range(lo, hi) => {
                assert_eq!(lo.to_string(), "-3");
                assert_eq!(hi.to_string(), "-7");
            }
            _ => panic!("expected range"),
        }
    }

    #[test]
    fn unknown_name_is_not_registered() {
        assert!(Quantifier::from_name("not_a_real_quantifier").is_none());
    }

    #[test]
    fn try_bind_rejects_unknown_name_with_invalid_quantifier_error() {
        let mut binding = QuantifierBinding::new();
        let err = binding.try_bind("not_a_real_quantifier", 1).unwrap_err();
        assert!(matches!(
            err,
            crate::error::TranslateError::InvalidQuantifier(name) if name == "not_a_real_quantifier"
        ));
    }

    #[test]
    fn try_bind_accepts_known_name() {
        let mut binding = QuantifierBinding::new();
        assert!(binding.try_bind("negate", 1).is_ok());
        let mut values = vec![TransformedValue::Scalar(Number::Int(5))];
        binding.apply(&mut values);
        assert_eq!(values[0], TransformedValue::Scalar(Number::Int(-5)));
    }

    #[test]
    fn apply_is_pointwise_independent_across_indices() {
        let mut binding = QuantifierBinding::new();
        binding.bind(Quantifier::Negate, 1);
        binding.bind(Quantifier::DivideByOneHundred, 2);
        let mut values = vec![
            TransformedValue::Scalar(Number::Int(5)),
            TransformedValue::Scalar(Number::Int(500)),
        ];
        binding.apply(&mut values);
        assert_eq!(values[0], TransformedValue::Scalar(Number::Int(-5)));
        assert_eq!(values[1], TransformedValue::Scalar(Number::Int(5)));
    }
}
