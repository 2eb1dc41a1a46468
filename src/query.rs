//! Component I — the public `translate` entry point orchestrating C–G.

use std::sync::Arc;

use tracing::trace;

use crate::error::{Diagnostic, TranslateError};
use crate::file::File;
use crate::translation::Translation;
use crate::value::{is_sentinel, InputValue, TransformedValue, SENTINEL};
use crate::variant::{Mode, Output};

/// Language and rendering-mode knobs for one `translate` call.
#[derive(Debug, Clone)]
pub struct TranslateOptions {
    pub lang: String,
    pub mode: Mode,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        TranslateOptions {
            lang: "English".to_string(),
            mode: Mode::Literal,
        }
    }
}

/// The full structured result of one `translate` call.
#[derive(Debug, Default)]
pub struct QueryResult {
    pub lines: Vec<Output>,
    pub found: Vec<Arc<Translation>>,
    pub indexes: Vec<Vec<usize>>,
    pub values: Vec<InputValue>,
    pub missing_ids: Vec<String>,
    pub missing_values: Vec<InputValue>,
    pub invalid: Vec<Arc<Translation>>,
    pub unused: Vec<Vec<TransformedValue>>,
    /// Query-time diagnostics (currently just `MissingIdentifier`, one per
    /// id in `missing_ids`) — the same accumulate-don't-raise channel
    /// parsing uses (§7 "Propagation policy").
    pub diagnostics: Vec<Diagnostic>,
}

struct Bucket {
    translation: Arc<Translation>,
    raw_values: Vec<InputValue>,
    present: Vec<usize>,
}

/// `translate(ids[], values[], lang="English", opts) -> Result` (§4.I).
pub fn translate(
    file: &File,
    ids: &[String],
    values: &[InputValue],
    options: &TranslateOptions,
) -> Result<QueryResult, TranslateError> {
    if ids.len() != values.len() {
        return Err(TranslateError::ArgumentMismatch {
            ids: ids.len(),
            values: values.len(),
        });
    }
    trace!(count = ids.len(), lang = %options.lang, "translate");
    if ids.is_empty() {
        return Ok(QueryResult::default());
    }

    // Step 2-3: group supplied values by the translation(s) they belong to,
    // preserving first-encountered order for the stable ordering guarantee
    // of §5.
    let mut buckets: Vec<Bucket> = Vec::new();
    let mut missing_ids = Vec::new();
    let mut missing_values = Vec::new();
    let mut diagnostics = Vec::new();

    for (id, &value) in ids.iter().zip(values.iter()) {
        let candidates = file.lookup(id);
        if candidates.is_empty() {
            missing_ids.push(id.clone());
            missing_values.push(value);
            diagnostics.push(Diagnostic::MissingIdentifier { id: id.clone() });
            continue;
        }
        for t in candidates {
            let p = t
                .ids
                .iter()
                .position(|x| x == id)
                .expect("id came from this translation's own bucket");
            if let Some(bucket) = buckets.iter_mut().find(|b| Arc::ptr_eq(&b.translation, t)) {
                bucket.present.push(p);
                bucket.raw_values[p] = value;
            } else {
                let mut raw_values = vec![InputValue::Scalar(SENTINEL); t.arity()];
                raw_values[p] = value;
                buckets.push(Bucket {
                    translation: t.clone(),
                    raw_values,
                    present: vec![p],
                });
            }
        }
    }

    // Step 4-5: validate and render.
    let mut found = Vec::new();
    let mut indexes = Vec::new();
    let mut invalid = Vec::new();
    let mut lines = Vec::new();
    let mut unused = Vec::new();

    for bucket in buckets {
        if bucket.raw_values.iter().any(|v| is_sentinel(*v)) {
            invalid.push(bucket.translation);
            continue;
        }
        let transformed: Vec<TransformedValue> = bucket
            .raw_values
            .iter()
            .map(|v| v.into_transformed())
            .collect();
        match bucket.translation.render(
            &bucket.raw_values,
            &transformed,
            &bucket.present,
            &options.lang,
            options.mode,
        ) {
            Some((output, unused_values)) => {
                lines.push(output);
                unused.push(unused_values);
                indexes.push(bucket.present);
                found.push(bucket.translation);
            }
            None => invalid.push(bucket.translation),
        }
    }

    trace!(
        found = found.len(),
        invalid = invalid.len(),
        missing = missing_ids.len(),
        "translate done"
    );

    Ok(QueryResult {
        lines,
        found,
        indexes,
        values: values.to_vec(),
        missing_ids,
        missing_values,
        invalid,
        unused,
        diagnostics,
    })
}

#[cfg(feature = "serde")]
impl serde::Serialize for QueryResult {
    /// Hand-written rather than derived: `found`/`invalid` hold `Arc<Translation>`,
    /// and the useful serialized shape is each translation's id tuple, not a
    /// dump of its phrase graph. There is deliberately no `Deserialize`:
    /// reconstructing `found`/`invalid` from serialized ids isn't a real
    /// operation a caller performs.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("QueryResult", 9)?;
        state.serialize_field(
            "lines",
            &self.lines.iter().map(|o| o.to_string()).collect::<Vec<_>>(),
        )?;
        state.serialize_field(
            "found",
            &self.found.iter().map(|t| &t.ids).collect::<Vec<_>>(),
        )?;
        state.serialize_field("indexes", &self.indexes)?;
        state.serialize_field("values", &self.values)?;
        state.serialize_field("missing_ids", &self.missing_ids)?;
        state.serialize_field("missing_values", &self.missing_values)?;
        state.serialize_field(
            "invalid",
            &self.invalid.iter().map(|t| &t.ids).collect::<Vec<_>>(),
        )?;
        state.serialize_field(
            "unused",
            &self
                .unused
                .iter()
                .map(|u| u.iter().map(|v| v.to_string()).collect::<Vec<_>>())
                .collect::<Vec<_>>(),
        )?;
        state.serialize_field(
            "diagnostics",
            &self
                .diagnostics
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>(),
        )?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn load(text: &str) -> File {
        Parser::new().parse(text).unwrap()
    }

    #[test]
    fn empty_ids_returns_empty_result() {
        let file = load("description\n1 a\n    1\n        # \"%1%\"\n");
        let result = file
            .translate(&[], &[], &TranslateOptions::default())
            .unwrap();
        assert!(result.lines.is_empty());
    }

    #[test]
    fn mismatched_lengths_is_an_argument_error() {
        let file = load("description\n1 a\n    1\n        # \"%1%\"\n");
        let err = file
            .translate(
                &["a".to_string()],
                &[],
                &TranslateOptions::default(),
            )
            .unwrap_err();
        assert!(matches!(err, TranslateError::ArgumentMismatch { .. }));
    }

    #[test]
    fn wildcard_scalar_match() {
        let file = load("description\n1 life_regen\n    1\n        # \"%1% life regen\"\n");
        let result = file
            .translate(
                &["life_regen".to_string()],
                &[InputValue::Scalar(5)],
                &TranslateOptions::default(),
            )
            .unwrap();
        assert_eq!(result.lines[0].to_string(), "5 life regen");
        assert!(result.unused[0].is_empty());
    }

    #[test]
    fn range_valued_input() {
        let file = load("description\n1 life_regen\n    1\n        # \"%1% life regen\"\n");
        let result = file
            .translate(
                &["life_regen".to_string()],
                &[InputValue::Range(3, 7)],
                &TranslateOptions::default(),
            )
            .unwrap();
        assert_eq!(result.lines[0].to_string(), "(3 to 7) life regen");
    }

    #[test]
    fn partial_multi_id_query_is_invalid() {
        let file = load("description\n2 a b\n    1\n        # # \"%1% and %2%\"\n");
        let result = file
            .translate(
                &["a".to_string()],
                &[InputValue::Scalar(1)],
                &TranslateOptions::default(),
            )
            .unwrap();
        assert!(result.lines.is_empty());
        assert_eq!(result.invalid.len(), 1);
    }

    #[test]
    fn negate_quantifier() {
        let file = load(
            "description\n1 reduced_damage\n    1\n        # \"%1%% reduced damage\" negate 1\n",
        );
        let result = file
            .translate(
                &["reduced_damage".to_string()],
                &[InputValue::Scalar(-5)],
                &TranslateOptions::default(),
            )
            .unwrap();
        assert_eq!(result.lines[0].to_string(), "5% reduced damage");
    }

    #[test]
    fn missing_id_is_reported_not_raised() {
        let file = load("description\n1 a\n    1\n        # \"%1%\"\n");
        let result = file
            .translate(
                &["unknown_id".to_string()],
                &[InputValue::Scalar(1)],
                &TranslateOptions::default(),
            )
            .unwrap();
        assert_eq!(result.missing_ids, vec!["unknown_id".to_string()]);
        assert!(result.lines.is_empty());
        assert!(result.diagnostics.iter().any(
            |d| matches!(d, Diagnostic::MissingIdentifier { id } if id == "unknown_id")
        ));
    }

    #[test]
    fn lines_order_matches_first_encounter_order() {
        let file = load(concat!(
            "description\n1 b\n    1\n        # \"b-line\"\n",
            "description\n1 a\n    1\n        # \"a-line\"\n",
        ));
        let result = file
            .translate(
                &["a".to_string(), "b".to_string()],
                &[InputValue::Scalar(1), InputValue::Scalar(2)],
                &TranslateOptions::default(),
            )
            .unwrap();
        assert_eq!(result.lines[0].to_string(), "a-line");
        assert_eq!(result.lines[1].to_string(), "b-line");
    }
}
