//! Component C — one phrase template, its per-id ranges, and its
//! quantifier bindings.

use std::collections::BTreeSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::number::{self, Number};
use crate::quantifier::QuantifierBinding;
use crate::range::Range;
use crate::value::{InputValue, TransformedValue};

/// Matches, in priority order: the `%%` escape, the sign-forcing
/// `%N$+d` placeholder, and the plain `%N%` placeholder.
static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"%%|%(\d+)\$\+d|%(\d+)%").unwrap());

/// How a variant renders its matched values into output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Substitute placeholders with their formatted values.
    Literal,
    /// Substitute placeholders with a short letter code; values are still
    /// computed so unused-value detection is unaffected.
    Placeholder,
    /// Produce the transformed values referenced by the template, in index
    /// order, instead of text.
    ValuesOnly,
}

/// The result of formatting one variant against one value tuple.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Text(String),
    Values(Vec<TransformedValue>),
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Text(s) => write!(f, "{}", s),
            Output::Values(vs) => {
                let rendered: Vec<String> = vs.iter().map(|v| format_value(*v, false)).collect();
                write!(f, "{}", rendered.join(", "))
            }
        }
    }
}

fn format_value(v: TransformedValue, signed: bool) -> String {
    match v {
        TransformedValue::Range(lo, hi) => format!("({} to {})", lo, hi),
        TransformedValue::Scalar(n) => {
            if signed {
                number::display_signed(n)
            } else {
                n.to_string()
            }
        }
    }
}

/// A single phrase template guarded by per-id ranges, within one language.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    pub template: String,
    pub ranges: Vec<Range>,
    pub quantifiers: QuantifierBinding,
}

impl Variant {
    pub fn new(template: String, ranges: Vec<Range>, quantifiers: QuantifierBinding) -> Variant {
        Variant {
            template,
            ranges,
            quantifiers,
        }
    }

    pub fn arity(&self) -> usize {
        self.ranges.len()
    }

    /// Sum of per-present-index range scores. Indices absent from
    /// `present_indices` act as wildcards and do not contribute; if any
    /// present index scores zero the whole variant is rejected by the
    /// caller even though this just returns the (zero-containing) sum.
    pub fn match_score(&self, raw_values: &[InputValue], present_indices: &[usize]) -> u32 {
        present_indices
            .iter()
            .filter_map(|&i| self.ranges.get(i).map(|r| raw_values[i].score(r) as u32))
            .sum()
    }

    pub fn rejects(&self, raw_values: &[InputValue], present_indices: &[usize]) -> bool {
        present_indices.iter().any(|&i| match self.ranges.get(i) {
            Some(r) => raw_values[i].score(r) == 0,
            None => true,
        })
    }

    /// Indices (1-based) referenced by a `%N%` or `%N$+d` placeholder
    /// anywhere in the template.
    fn referenced_indices(&self) -> BTreeSet<usize> {
        let mut used = BTreeSet::new();
        for caps in PLACEHOLDER_RE.captures_iter(&self.template) {
            if caps.get(0).unwrap().as_str() == "%%" {
                continue;
            }
            let idx = caps
                .get(1)
                .or_else(|| caps.get(2))
                .unwrap()
                .as_str()
                .parse::<usize>()
                .unwrap_or(0);
            used.insert(idx);
        }
        used
    }

    /// Format `values` (already collected in the translation's id order)
    /// according to `mode`. Returns the rendered output plus the
    /// transformed values that had no corresponding placeholder.
    pub fn format(
        &self,
        values: &[TransformedValue],
        mode: Mode,
    ) -> (Output, Vec<TransformedValue>) {
        let mut transformed = values.to_vec();
        self.quantifiers.apply(&mut transformed);

        let used = self.referenced_indices();
        let unused: Vec<TransformedValue> = (1..=transformed.len())
            .filter(|i| !used.contains(i))
            .map(|i| transformed[i - 1])
            .collect();

        let output = match mode {
            Mode::ValuesOnly => Output::Values(
                used.iter()
                    .filter(|&&i| i >= 1 && i <= transformed.len())
                    .map(|&i| transformed[i - 1])
                    .collect(),
            ),
            Mode::Literal | Mode::Placeholder => {
                let mut out = String::new();
                let mut last = 0;
                for caps in PLACEHOLDER_RE.captures_iter(&self.template) {
                    let m = caps.get(0).unwrap();
                    out.push_str(&self.template[last..m.start()]);
                    last = m.end();

                    if m.as_str() == "%%" {
                        out.push('%');
                        continue;
                    }

                    let (idx, signed) = if let Some(g) = caps.get(1) {
                        (g.as_str().parse::<usize>().unwrap_or(0), true)
                    } else {
                        (
                            caps.get(2).unwrap().as_str().parse::<usize>().unwrap_or(0),
                            false,
                        )
                    };

                    if idx == 0 || idx > transformed.len() {
                        // no matching value slot: leave the placeholder text untouched
                        out.push_str(m.as_str());
                        continue;
                    }

                    let value = transformed[idx - 1];
                    match mode {
                        Mode::Placeholder => out.push(placeholder_letter(idx - 1)),
                        _ => out.push_str(&format_value(value, signed)),
                    }
                }
                out.push_str(&self.template[last..]);
                Output::Text(out)
            }
        };

        (output, unused)
    }
}

/// Deterministic letter assignment for `Mode::Placeholder`: `x`, `y`, `z`,
/// then `a..w` (which never collides with `x`/`y`/`z`). Supports up to 26
/// value slots.
fn placeholder_letter(index0: usize) -> char {
    match index0 {
        0 => 'x',
        1 => 'y',
        2 => 'z',
        n => (b'a' + (n - 3) as u8) as char,
    }
}
