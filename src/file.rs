//! Component G — an ordered collection of translations plus an id index
//! supporting shadowing and merge.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{Diagnostic, ParseError};
use crate::query::{self, QueryResult, TranslateOptions};
use crate::translation::Translation;
use crate::value::InputValue;
use crate::variant::{Mode, Output};

/// Translations in declaration order, plus a secondary `id -> translations`
/// index. Variants are owned by their language bundle, bundles by their
/// translation; translations are shared (`Arc`) between the ordered list
/// and the index rather than duplicated, so merge never copies phrase
/// text (§5 "Memory").
#[derive(Debug, Default)]
pub struct File {
    translations: Vec<Arc<Translation>>,
    index: HashMap<String, Vec<Arc<Translation>>>,
    diagnostics: Vec<Diagnostic>,
    no_description: HashSet<String>,
    source: Option<PathBuf>,
}

impl File {
    pub fn new() -> File {
        File::default()
    }

    pub fn translations(&self) -> &[Arc<Translation>] {
        &self.translations
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn lookup(&self, id: &str) -> &[Arc<Translation>] {
        self.index.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn record_no_description(&mut self, id: String) {
        self.no_description.insert(id);
    }

    pub(crate) fn extend_diagnostics(&mut self, diagnostics: Vec<Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    /// The path this file was loaded from, if it was loaded from disk
    /// (via [`crate::parser::load_file`] or a [`crate::cache::Cache`]).
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub(crate) fn set_source(&mut self, path: PathBuf) {
        self.source = Some(path);
    }

    /// Re-read this file's backing bytes from disk and replace its
    /// contents in place. A thin convenience over re-parsing, for
    /// long-running consumers that want to pick up edits to a file on
    /// disk without rebuilding their own reload plumbing. Errors if this
    /// file has no known source (it wasn't loaded from disk or a cache).
    pub fn reload(&mut self) -> Result<(), ParseError> {
        let path = self.source.clone().ok_or_else(|| {
            ParseError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "file has no known source path to reload from",
            ))
        })?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let bytes = std::fs::read(&path)?;
        let mut fresh = crate::parser::Parser::with_base_dir(base_dir).parse_bytes(&bytes)?;
        fresh.source = Some(path);
        *self = fresh;
        Ok(())
    }

    /// Ids recorded as deliberately lacking a description that are not
    /// covered by any translation currently in this file.
    pub fn missing_identifiers(&self) -> impl Iterator<Item = &str> {
        self.no_description
            .iter()
            .filter(move |id| !self.index.contains_key(id.as_str()))
            .map(|s| s.as_str())
    }

    /// Insert one translation, applying the shadowing rule (§4.G):
    /// structurally identical survivors are left alone, same-id-tuple
    /// replacements shadow the earlier declaration, and distinct
    /// translations sharing an id are both kept with a recorded
    /// diagnostic.
    pub fn insert(&mut self, t: Translation) {
        self.insert_arc(Arc::new(t));
    }

    fn insert_arc(&mut self, new: Arc<Translation>) {
        if new.ids.is_empty() {
            self.translations.push(new);
            return;
        }
        let first_id = new.ids[0].clone();
        let same_tuple = self
            .index
            .get(&first_id)
            .and_then(|bucket| bucket.iter().find(|existing| existing.ids == new.ids))
            .cloned();

        match same_tuple {
            Some(existing) if *existing == *new => {
                // structurally identical: merge is idempotent here, no-op
            }
            Some(existing) => {
                self.remove(&existing);
                self.push_new(new);
            }
            None => {
                // A distinct id tuple can still collide with an existing
                // translation on any of its ids, not just the first one.
                let shared_ids: Vec<String> = new
                    .ids
                    .iter()
                    .filter(|id| self.index.get(id.as_str()).is_some_and(|b| !b.is_empty()))
                    .cloned()
                    .collect();
                self.push_new(new);
                for id in shared_ids {
                    self.diagnostics.push(Diagnostic::DuplicateIdentifier { id });
                }
            }
        }
    }

    fn push_new(&mut self, t: Arc<Translation>) {
        for id in &t.ids {
            self.index.entry(id.clone()).or_default().push(t.clone());
        }
        self.translations.push(t);
    }

    fn remove(&mut self, target: &Arc<Translation>) {
        self.translations.retain(|t| !Arc::ptr_eq(t, target));
        for id in &target.ids {
            if let Some(bucket) = self.index.get_mut(id) {
                bucket.retain(|t| !Arc::ptr_eq(t, target));
            }
        }
    }

    /// Append every translation of `other`, applying the same shadowing
    /// rule as [`File::insert`] (§4.G `merge`).
    pub fn merge_from(&mut self, other: &File) {
        for t in &other.translations {
            self.insert_arc(t.clone());
        }
        self.diagnostics.extend(other.diagnostics.iter().cloned());
        self.no_description.extend(other.no_description.iter().cloned());
    }

    /// Component I — the public query entry point. See
    /// [`query::translate`] for the full algorithm.
    pub fn translate(
        &self,
        ids: &[String],
        values: &[InputValue],
        options: &TranslateOptions,
    ) -> Result<QueryResult, crate::error::TranslateError> {
        query::translate(self, ids, values, options)
    }

    /// Convenience wrapper returning just the rendered lines, discarding
    /// the rest of the structured result.
    pub fn translate_lines(
        &self,
        ids: &[String],
        values: &[InputValue],
        lang: &str,
        mode: Mode,
    ) -> Result<Vec<Output>, crate::error::TranslateError> {
        let options = TranslateOptions {
            lang: lang.to_string(),
            mode,
        };
        self.translate(ids, values, &options).map(|r| r.lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::LanguageBundle;
    use crate::quantifier::QuantifierBinding;
    use crate::range::Range;
    use crate::variant::Variant;

    fn translation(ids: &[&str], template: &str) -> Translation {
        Translation::new(
            ids.iter().map(|s| s.to_string()).collect(),
            vec![LanguageBundle::new(
                "English".to_string(),
                vec![Variant::new(
                    template.to_string(),
                    ids.iter().map(|_| Range::wildcard()).collect(),
                    QuantifierBinding::new(),
                )],
            )],
        )
    }

    #[test]
    fn later_identical_ids_tuple_shadows_earlier() {
        let mut file = File::new();
        file.insert(translation(&["x"], "old"));
        file.insert(translation(&["x"], "new"));
        assert_eq!(file.translations().len(), 1);
        assert_eq!(file.lookup("x")[0].languages[0].variants[0].template, "new");
    }

    #[test]
    fn structurally_identical_insert_is_a_no_op() {
        let mut file = File::new();
        file.insert(translation(&["x"], "same"));
        file.insert(translation(&["x"], "same"));
        assert_eq!(file.translations().len(), 1);
    }

    #[test]
    fn distinct_tuples_sharing_an_id_both_survive_with_diagnostic() {
        let mut file = File::new();
        file.insert(translation(&["x"], "alone"));
        file.insert(translation(&["x", "y"], "pair"));
        assert_eq!(file.lookup("x").len(), 2);
        assert!(file
            .diagnostics()
            .iter()
            .any(|d| matches!(d, Diagnostic::DuplicateIdentifier { .. })));
    }

    #[test]
    fn distinct_tuples_sharing_a_non_first_id_are_flagged_too() {
        let mut file = File::new();
        file.insert(translation(&["y"], "alone"));
        file.insert(translation(&["x", "y"], "pair"));
        assert_eq!(file.lookup("y").len(), 2);
        assert!(file.diagnostics().iter().any(
            |d| matches!(d, Diagnostic::DuplicateIdentifier { id } if id == "y")
        ));
    }

    #[test]
    fn merge_is_associative_on_disjoint_files() {
        let mut a = File::new();
        a.insert(translation(&["x"], "x-text"));
        let mut b = File::new();
        b.insert(translation(&["y"], "y-text"));

        let mut ab_then_merge = File::new();
        ab_then_merge.merge_from(&a);
        ab_then_merge.merge_from(&b);

        assert_eq!(ab_then_merge.translations().len(), 2);
        assert_eq!(ab_then_merge.lookup("x")[0].languages[0].variants[0].template, "x-text");
        assert_eq!(ab_then_merge.lookup("y")[0].languages[0].variants[0].template, "y-text");
    }

    #[test]
    fn reload_without_a_known_source_errors() {
        let mut file = File::new();
        assert!(file.reload().is_err());
    }

    #[test]
    fn reload_picks_up_changes_written_to_disk() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.txt");
        let write = |text: &str| {
            let mut bytes = Vec::new();
            for unit in text.encode_utf16() {
                bytes.extend_from_slice(&unit.to_le_bytes());
            }
            std::fs::File::create(&path).unwrap().write_all(&bytes).unwrap();
        };

        write("description\n1 x\n    1\n        # \"before\"\n");
        let mut file = crate::parser::load_file(&path).unwrap();
        assert_eq!(file.lookup("x")[0].languages[0].variants[0].template, "before");

        write("description\n1 x\n    1\n        # \"after\"\n");
        file.reload().unwrap();
        assert_eq!(file.lookup("x")[0].languages[0].variants[0].template, "after");
    }
}
