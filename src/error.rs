//! Error and diagnostic types.
//!
//! Two channels, not one: [`ParseError`] and [`TranslateError`] are fatal to
//! the call that produced them. [`Diagnostic`] is collected, never raised —
//! parsing and querying both keep going and report gaps in their return
//! value instead of unwinding.

/// Fatal error aborting the load of the current file.
///
/// Sibling `include`s already merged, or loaded by other callers of a
/// shared [`crate::Cache`], are unaffected.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}: malformed variant line: {message}")]
    MalformedVariant { line: usize, message: String },

    #[error("line {line}: unterminated quoted string")]
    UnterminatedString { line: usize },

    #[error("line {line}: expected an ids line after `description`")]
    MissingIdsLine { line: usize },

    #[error("line {line}: expected a language section")]
    MissingLanguageSection { line: usize },

    #[error("line {line}: invalid range token `{token}`")]
    InvalidRangeToken { line: usize, token: String },

    #[error("line {line}: invalid quantifier index `{token}`")]
    InvalidQuantifierIndex { line: usize, token: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Non-fatal diagnostic, accumulated rather than raised.
///
/// Produced during parsing (recoverable format problems such as a count
/// mismatch or an unresolved include) and during querying (data gaps such
/// as an id absent from the index).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Diagnostic {
    #[error("line {line}: declared id count {declared} does not match {actual} tokens")]
    CountMismatch {
        line: usize,
        declared: usize,
        actual: usize,
    },

    #[error("line {line}: unknown quantifier `{name}`, dropped")]
    UnknownQuantifier { line: usize, name: String },

    #[error("line {line}: unresolved include `{path}`, skipped")]
    UnresolvedInclude { line: usize, path: String },

    #[error("id `{id}` bound to distinct id tuples across merges")]
    DuplicateIdentifier { id: String },

    #[error("id `{id}` not present in any translation")]
    MissingIdentifier { id: String },
}

/// Error raised directly by [`crate::File::translate`].
///
/// Fatal to that one call; it never leaves data-gap outcomes (missing ids,
/// invalid translations, unused values) to this channel — those are part of
/// the returned [`crate::QueryResult`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslateError {
    #[error("ids has {ids} entries but values has {values}")]
    ArgumentMismatch { ids: usize, values: usize },

    #[error("quantifier `{0}` is not registered")]
    InvalidQuantifier(String),
}
