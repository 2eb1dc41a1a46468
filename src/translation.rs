//! Component E — an ordered tuple of stat ids plus its language bundles.

use std::hash::{Hash, Hasher};

use crate::language::LanguageBundle;
use crate::value::{InputValue, TransformedValue};
use crate::variant::{Mode, Output};

/// One stat translation: the ids it covers (order is structural — it
/// determines which value goes to which range slot) and its per-language
/// phrase sets. `English` is mandatory and serves as the fallback language.
#[derive(Debug, Clone)]
pub struct Translation {
    pub ids: Vec<String>,
    pub languages: Vec<LanguageBundle>,
}

impl Translation {
    pub fn new(ids: Vec<String>, languages: Vec<LanguageBundle>) -> Translation {
        Translation { ids, languages }
    }

    pub fn arity(&self) -> usize {
        self.ids.len()
    }

    pub fn english(&self) -> Option<&LanguageBundle> {
        self.languages.iter().find(|l| l.is_english())
    }

    fn language(&self, lang: &str) -> Option<&LanguageBundle> {
        self.languages.iter().find(|l| l.name == lang)
    }

    /// Locate the requested language, falling back to English when absent
    /// or when every one of its variants rejects the supplied values.
    pub fn render(
        &self,
        raw_values: &[InputValue],
        transformed_values: &[TransformedValue],
        present_indices: &[usize],
        lang: &str,
        mode: Mode,
    ) -> Option<(Output, Vec<TransformedValue>)> {
        if let Some(bundle) = self.language(lang) {
            if let Some(result) = bundle.render(raw_values, transformed_values, present_indices, mode) {
                return Some(result);
            }
        }
        self.english()?
            .render(raw_values, transformed_values, present_indices, mode)
    }
}

impl PartialEq for Translation {
    fn eq(&self, other: &Self) -> bool {
        self.ids == other.ids && self.languages == other.languages
    }
}
impl Eq for Translation {}

impl Hash for Translation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ids.hash(state);
        for lang in &self.languages {
            lang.name.hash(state);
            for variant in &lang.variants {
                variant.template.hash(state);
            }
        }
    }
}

/// Same id tuple, regardless of the languages bound to it — used by merge
/// shadowing (§4.G).
pub fn same_ids(a: &Translation, b: &Translation) -> bool {
    a.ids == b.ids
}
