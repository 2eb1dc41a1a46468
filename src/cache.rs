//! Component H — name -> `File` memoization, resolving `include`
//! references and optional overlay merge.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing::{debug, trace};

use crate::error::ParseError;
use crate::file::File;
use crate::lexer::decode_utf16;
use crate::parser::Parser;

/// The shipped default override file, applied to every file this cache
/// loads when constructed with [`Overlay::Default`].
static DEFAULT_OVERLAY_BYTES: &[u8] = include_bytes!("../assets/default_overlay.txt");

/// The optional extra file merged into every file a [`Cache`] loads,
/// after load (§6 "Configuration").
pub enum Overlay {
    /// No overlay.
    None,
    /// Load the shipped default override file.
    Default,
    /// Use this already-loaded file as the overlay.
    File(File),
}

/// Per-instance `logical path -> File` memoization. Resolves `include`
/// directives for the files it loads and, if configured, merges an
/// overlay file into every load.
pub struct Cache {
    base_dir: PathBuf,
    overlay: Option<Arc<File>>,
    files: Mutex<std::collections::HashMap<String, Arc<File>>>,
}

impl Cache {
    pub fn new(base_dir: impl Into<PathBuf>, overlay: Overlay) -> Result<Cache, ParseError> {
        let overlay = match overlay {
            Overlay::None => None,
            Overlay::Default => {
                let text = decode_utf16(DEFAULT_OVERLAY_BYTES);
                Some(Arc::new(Parser::new().parse(&text)?))
            }
            Overlay::File(f) => Some(Arc::new(f)),
        };
        Ok(Cache {
            base_dir: base_dir.into(),
            overlay,
            files: Mutex::new(std::collections::HashMap::new()),
        })
    }

    /// Return the cached `File` for `path`, loading (and, if configured,
    /// overlaying) it on first access. `path` may omit the conventional
    /// `Metadata/` prefix.
    pub fn get(&self, path: &str) -> Result<Arc<File>, ParseError> {
        let path = normalize_path(path);

        if let Some(file) = self.files.lock().unwrap().get(&path) {
            trace!(%path, "cache hit");
            return Ok(file.clone());
        }

        debug!(%path, "cache miss, loading");
        let full = self.base_dir.join(&path);
        let bytes = std::fs::read(&full)?;
        let mut parser = Parser::with_cache(self, self.base_dir.clone());
        let mut file = parser.parse_bytes(&bytes)?;
        file.set_source(full);
        if let Some(overlay) = &self.overlay {
            file.merge_from(overlay);
        }
        let file = Arc::new(file);

        self.files.lock().unwrap().insert(path, file.clone());
        Ok(file)
    }
}

/// Prepend the conventional `Metadata/` prefix if the caller omitted it.
pub fn normalize_path(path: &str) -> String {
    if path.starts_with("Metadata/") {
        path.to_string()
    } else {
        format!("Metadata/{}", path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_utf16(path: &std::path::Path, text: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut bytes = Vec::new();
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        std::fs::File::create(path).unwrap().write_all(&bytes).unwrap();
    }

    #[test]
    fn get_memoizes_by_normalized_path() {
        let dir = tempfile::tempdir().unwrap();
        write_utf16(
            &dir.path().join("Metadata/stat_descriptions.txt"),
            "description\n1 a\n    1\n        # \"%1%\"\n",
        );
        let cache = Cache::new(dir.path(), Overlay::None).unwrap();
        let a = cache.get("stat_descriptions.txt").unwrap();
        let b = cache.get("Metadata/stat_descriptions.txt").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn include_resolves_through_cache() {
        let dir = tempfile::tempdir().unwrap();
        write_utf16(
            &dir.path().join("Metadata/base.txt"),
            "include \"Metadata/extra.txt\"\ndescription\n1 x\n    1\n        # \"base\"\n",
        );
        write_utf16(
            &dir.path().join("Metadata/extra.txt"),
            "description\n1 x\n    1\n        # \"extra\"\n",
        );
        let cache = Cache::new(dir.path(), Overlay::None).unwrap();
        let file = cache.get("base.txt").unwrap();
        // `base.txt` declares `x` itself after including `extra.txt`'s `x`;
        // the later declaration shadows the included one.
        assert_eq!(file.lookup("x").len(), 1);
        assert_eq!(file.lookup("x")[0].languages[0].variants[0].template, "base");
    }

    #[test]
    fn overlay_merges_after_load() {
        let dir = tempfile::tempdir().unwrap();
        write_utf16(
            &dir.path().join("Metadata/base.txt"),
            "description\n1 x\n    1\n        # \"base\"\n",
        );
        let overlay_text = "description\n1 x\n    1\n        # \"overlay\"\n";
        let overlay_file = Parser::new().parse(overlay_text).unwrap();
        let cache = Cache::new(dir.path(), Overlay::File(overlay_file)).unwrap();
        let file = cache.get("base.txt").unwrap();
        assert_eq!(file.lookup("x")[0].languages[0].variants[0].template, "overlay");
    }
}
