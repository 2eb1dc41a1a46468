//! ![Rust](https://github.com/IMI-eRnD-Be/stat-translations/workflows/Rust/badge.svg)
//! [![Latest Version](https://img.shields.io/crates/v/stat_translations.svg)](https://crates.io/crates/stat_translations)
//! [![Docs.rs](https://docs.rs/stat_translations/badge.svg)](https://docs.rs/stat_translations)
//! [![Dependency Status](https://deps.rs/repo/github/IMI-eRnD-Be/stat-translations/status.svg)](https://deps.rs/repo/github/IMI-eRnD-Be/stat-translations)
//!
//! Parser and query engine for whitespace-delimited, multi-language stat
//! translation files: the format used to turn a raw numeric game stat
//! into a human-readable, localized phrase.
//!
//! # Usage
//!
//! ```no_run
//! use stat_translations::{InputValue, Parser};
//!
//! let file = Parser::new().parse(r#"
//! description
//!     1 life_regen
//!     1
//!         # "%1% Life Regenerated per second"
//! "#).unwrap();
//!
//! let result = file
//!     .translate(
//!         &["life_regen".to_string()],
//!         &[InputValue::Scalar(5)],
//!         &Default::default(),
//!     )
//!     .unwrap();
//!
//! assert_eq!(result.lines[0].to_string(), "5 Life Regenerated per second");
//! ```
//!
//! # File format
//!
//! A translation file is a sequence of `description` blocks, each
//! declaring one or more stat identifiers and, per language, a list of
//! candidate phrase *variants*. Each variant carries one range predicate
//! per identifier; at query time the variant whose ranges most precisely
//! bracket the supplied values is selected (see [`range`] for the scoring
//! rule). `include "path"` pulls in another file's translations;
//! `no_description id` records an identifier that is deliberately left
//! undescribed.
//!
//! # Features
//!
//!  *  `serde`: implements `Serialize` (not `Deserialize`) for
//!     [`QueryResult`], projecting the translations it holds down to
//!     their id tuples.
//!
//! # License
//!
//! This work is dual-licensed under Apache 2.0 and MIT.
//! You can choose between one of them if you use this work.

pub mod cache;
pub mod error;
pub mod file;
pub mod language;
pub mod lexer;
pub mod number;
pub mod parser;
pub mod quantifier;
pub mod query;
pub mod range;
pub mod translation;
pub mod value;
pub mod variant;

pub use cache::{normalize_path, Cache, Overlay};
pub use error::{Diagnostic, ParseError, TranslateError};
pub use file::File;
pub use language::LanguageBundle;
pub use number::Number;
pub use parser::{load_file, Parser};
pub use quantifier::{Quantifier, QuantifierBinding};
pub use query::{QueryResult, TranslateOptions};
pub use range::Range;
pub use translation::Translation;
pub use value::{InputValue, TransformedValue};
pub use variant::{Mode, Output, Variant};
