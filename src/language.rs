//! Component D — an ordered collection of variants for one language,
//! belonging to one translation.

use crate::value::{InputValue, TransformedValue};
use crate::variant::{Mode, Output, Variant};

/// All variants for one language of one translation. Every variant shares
/// the parent translation's arity.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageBundle {
    pub name: String,
    pub variants: Vec<Variant>,
}

impl LanguageBundle {
    pub fn new(name: String, variants: Vec<Variant>) -> LanguageBundle {
        LanguageBundle { name, variants }
    }

    pub fn is_english(&self) -> bool {
        self.name == "English"
    }

    /// Select the highest-scoring variant (ties favor earlier declaration)
    /// and delegate formatting to it. `None` if every variant rejects on at
    /// least one present index, or there are no variants at all.
    pub fn render(
        &self,
        raw_values: &[InputValue],
        transformed_values: &[TransformedValue],
        present_indices: &[usize],
        mode: Mode,
    ) -> Option<(Output, Vec<TransformedValue>)> {
        let mut best: Option<(usize, u32)> = None;
        for (i, variant) in self.variants.iter().enumerate() {
            if variant.rejects(raw_values, present_indices) {
                continue;
            }
            let score = variant.match_score(raw_values, present_indices);
            match best {
                Some((_, best_score)) if best_score >= score => {}
                _ => best = Some((i, score)),
            }
        }
        let (idx, _) = best?;
        Some(self.variants[idx].format(transformed_values, mode))
    }
}
