//! Component F — tokenizes and constructs translations from the text
//! format, including `include` directives.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::cache::Cache;
use crate::error::{Diagnostic, ParseError};
use crate::file::File;
use crate::language::LanguageBundle;
use crate::lexer::{decode_utf16, tokenize_line, Token};
use crate::quantifier::{Quantifier, QuantifierBinding};
use crate::range::Range;
use crate::translation::Translation;
use crate::variant::Variant;

/// Parses one translation-file text body, resolving `include` directives
/// either through a shared [`Cache`] or relative to an explicit base
/// directory (§4.F "include semantics").
pub struct Parser<'a> {
    cache: Option<&'a Cache>,
    base_dir: Option<PathBuf>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    pub fn new() -> Parser<'static> {
        Parser {
            cache: None,
            base_dir: None,
            diagnostics: Vec::new(),
        }
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Parser<'static> {
        Parser {
            cache: None,
            base_dir: Some(base_dir.into()),
            diagnostics: Vec::new(),
        }
    }

    pub fn with_cache(cache: &'a Cache, base_dir: impl Into<PathBuf>) -> Parser<'a> {
        Parser {
            cache: Some(cache),
            base_dir: Some(base_dir.into()),
            diagnostics: Vec::new(),
        }
    }

    /// Parse raw file bytes (UTF-16, optional BOM).
    pub fn parse_bytes(&mut self, bytes: &[u8]) -> Result<File, ParseError> {
        let text = decode_utf16(bytes);
        self.parse(&text)
    }

    /// Parse already-decoded text.
    pub fn parse(&mut self, text: &str) -> Result<File, ParseError> {
        let lines: Vec<(usize, Vec<Token>)> = text
            .lines()
            .enumerate()
            .map(|(i, line)| tokenize_line(line, i + 1).map(|tokens| (i + 1, tokens)))
            .collect::<Result<_, _>>()?;

        let mut file = File::new();
        let mut pos = 0;
        while pos < lines.len() {
            let (line_no, tokens) = &lines[pos];
            if tokens.is_empty() {
                pos += 1;
                continue;
            }
            if is_header_line(tokens) {
                pos += 1;
                continue;
            }
            match tokens[0].as_str() {
                "include" => {
                    let path = tokens
                        .get(1)
                        .map(|t| t.as_str().to_string())
                        .unwrap_or_default();
                    self.handle_include(&path, *line_no, &mut file);
                    pos += 1;
                }
                "no_description" => {
                    if let Some(id) = tokens.get(1) {
                        file.record_no_description(id.as_str().to_string());
                    }
                    pos += 1;
                }
                "description" => {
                    pos += 1;
                    pos = self.parse_description_block(&lines, pos, &mut file)?;
                }
                _ => {
                    // unrecognized top-level token: skip rather than abort,
                    // the parser only aborts on malformed block structure.
                    pos += 1;
                }
            }
        }

        file.extend_diagnostics(std::mem::take(&mut self.diagnostics));

        if file.diagnostics().is_empty() {
            debug!(
                translations = file.translations().len(),
                "parsed translation file"
            );
        } else {
            warn!(
                translations = file.translations().len(),
                diagnostics = file.diagnostics().len(),
                "parsed translation file with diagnostics"
            );
        }

        Ok(file)
    }

    fn handle_include(&mut self, path: &str, line_no: usize, file: &mut File) {
        if let Some(cache) = self.cache {
            match cache.get(path) {
                Ok(included) => file.merge_from(&included),
                Err(_) => self.diagnostics.push(Diagnostic::UnresolvedInclude {
                    line: line_no,
                    path: path.to_string(),
                }),
            }
            return;
        }

        if let Some(dir) = self.base_dir.clone() {
            let full = dir.join(path);
            let resolved = std::fs::read(&full)
                .map_err(ParseError::from)
                .and_then(|bytes| Parser::with_base_dir(dir).parse_bytes(&bytes));
            match resolved {
                Ok(included) => file.merge_from(&included),
                Err(_) => self.diagnostics.push(Diagnostic::UnresolvedInclude {
                    line: line_no,
                    path: path.to_string(),
                }),
            }
            return;
        }

        self.diagnostics.push(Diagnostic::UnresolvedInclude {
            line: line_no,
            path: path.to_string(),
        });
    }

    fn parse_description_block(
        &mut self,
        lines: &[(usize, Vec<Token>)],
        mut pos: usize,
        file: &mut File,
    ) -> Result<usize, ParseError> {
        // skip blank lines before the ids line
        while pos < lines.len() && lines[pos].1.is_empty() {
            pos += 1;
        }
        let (ids_line_no, ids_tokens) = lines
            .get(pos)
            .ok_or(ParseError::MissingIdsLine { line: pos })?;
        let declared: usize = ids_tokens
            .first()
            .and_then(|t| t.as_str().parse().ok())
            .ok_or(ParseError::MissingIdsLine { line: *ids_line_no })?;
        let ids: Vec<String> = ids_tokens[1..].iter().map(|t| t.as_str().to_string()).collect();
        if ids.len() != declared {
            self.diagnostics.push(Diagnostic::CountMismatch {
                line: *ids_line_no,
                declared,
                actual: ids.len(),
            });
        }
        let arity = ids.len();
        pos += 1;

        let mut languages = Vec::new();
        loop {
            while pos < lines.len() && lines[pos].1.is_empty() {
                pos += 1;
            }
            if pos >= lines.len() {
                break;
            }
            let (_, tokens) = &lines[pos];
            if is_top_level_token(tokens) {
                break;
            }

            let (lang_name, count_line_no, count_tokens) = if tokens[0].as_str() == "lang" {
                let name = tokens
                    .get(1)
                    .map(|t| t.as_str().to_string())
                    .unwrap_or_default();
                pos += 1;
                while pos < lines.len() && lines[pos].1.is_empty() {
                    pos += 1;
                }
                let (cl, ctokens) = lines
                    .get(pos)
                    .ok_or(ParseError::MissingLanguageSection { line: *ids_line_no })?;
                (name, *cl, ctokens.clone())
            } else {
                ("English".to_string(), lines[pos].0, tokens.clone())
            };

            let count: usize = count_tokens
                .first()
                .and_then(|t| t.as_str().parse().ok())
                .ok_or(ParseError::MissingLanguageSection {
                    line: count_line_no,
                })?;
            pos += 1;

            let mut variants = Vec::with_capacity(count);
            for _ in 0..count {
                while pos < lines.len() && lines[pos].1.is_empty() {
                    pos += 1;
                }
                let (vline_no, vtokens) =
                    lines.get(pos).ok_or(ParseError::MalformedVariant {
                        line: count_line_no,
                        message: "expected a variant line".to_string(),
                    })?;
                variants.push(self.parse_variant_line(vtokens, *vline_no, arity)?);
                pos += 1;
            }
            languages.push(LanguageBundle::new(lang_name, variants));
        }

        file.insert(Translation::new(ids, languages));
        Ok(pos)
    }

    fn parse_variant_line(
        &mut self,
        tokens: &[Token],
        line_no: usize,
        arity: usize,
    ) -> Result<Variant, ParseError> {
        if tokens.len() < arity + 1 {
            return Err(ParseError::MalformedVariant {
                line: line_no,
                message: format!(
                    "expected {} range tokens followed by a quoted phrase, found {} tokens",
                    arity,
                    tokens.len()
                ),
            });
        }

        let mut ranges = Vec::with_capacity(arity);
        for token in &tokens[..arity] {
            if token.is_quoted() {
                return Err(ParseError::MalformedVariant {
                    line: line_no,
                    message: "too few range tokens before the phrase".to_string(),
                });
            }
            ranges.push(parse_range_token(token.as_str(), line_no)?);
        }

        let phrase = &tokens[arity];
        if !phrase.is_quoted() {
            return Err(ParseError::MalformedVariant {
                line: line_no,
                message: "expected a quoted phrase".to_string(),
            });
        }
        let template = phrase.as_str().to_string();

        let mut quantifiers = QuantifierBinding::new();
        let rest = &tokens[arity + 1..];
        let mut i = 0;
        while i < rest.len() {
            let name = rest[i].as_str();
            let idx_tok = rest.get(i + 1).ok_or_else(|| ParseError::MalformedVariant {
                line: line_no,
                message: format!("quantifier `{}` missing its index", name),
            })?;
            let idx: usize = idx_tok.as_str().parse().map_err(|_| {
                ParseError::InvalidQuantifierIndex {
                    line: line_no,
                    token: idx_tok.as_str().to_string(),
                }
            })?;
            match Quantifier::from_name(name) {
                Some(q) => quantifiers.bind(q, idx),
                None => self.diagnostics.push(Diagnostic::UnknownQuantifier {
                    line: line_no,
                    name: name.to_string(),
                }),
            }
            i += 2;
        }

        Ok(Variant::new(template, ranges, quantifiers))
    }
}

impl Default for Parser<'static> {
    fn default() -> Self {
        Parser::new()
    }
}

fn is_header_line(tokens: &[Token]) -> bool {
    tokens.len() == 1 && tokens[0].is_quoted()
}

fn is_top_level_token(tokens: &[Token]) -> bool {
    is_header_line(tokens)
        || matches!(
            tokens[0].as_str(),
            "description" | "include" | "no_description"
        )
}

/// Range token syntax: `#` (wildcard), an integer `k` (closed `[k,k]`), or
/// `lo|hi` where either side may be `#` (open-ended on that side).
fn parse_range_token(token: &str, line_no: usize) -> Result<Range, ParseError> {
    if token == "#" {
        return Ok(Range::wildcard());
    }
    if let Some(sep) = token.find('|') {
        let lo = parse_range_side(&token[..sep], token, line_no)?;
        let hi = parse_range_side(&token[sep + 1..], token, line_no)?;
        if let (Some(lo_v), Some(hi_v)) = (lo, hi) {
            if lo_v > hi_v {
                return Err(ParseError::InvalidRangeToken {
                    line: line_no,
                    token: token.to_string(),
                });
            }
        }
        return Ok(Range::new(lo, hi));
    }
    token
        .parse::<i64>()
        .map(|k| Range::new(Some(k), Some(k)))
        .map_err(|_| ParseError::InvalidRangeToken {
            line: line_no,
            token: token.to_string(),
        })
}

fn parse_range_side(side: &str, whole: &str, line_no: usize) -> Result<Option<i64>, ParseError> {
    if side == "#" {
        return Ok(None);
    }
    side.parse::<i64>()
        .map(Some)
        .map_err(|_| ParseError::InvalidRangeToken {
            line: line_no,
            token: whole.to_string(),
        })
}

/// Read and parse a translation file directly from disk, resolving
/// `include` relative to the file's own parent directory. No caching.
pub fn load_file(path: impl AsRef<Path>) -> Result<File, ParseError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut file = Parser::with_base_dir(base_dir).parse_bytes(&bytes)?;
    file.set_source(path.to_path_buf());
    debug!(
        path = %path.display(),
        translations = file.translations().len(),
        diagnostics = file.diagnostics().len(),
        "loaded translation file from disk"
    );
    Ok(file)
}
