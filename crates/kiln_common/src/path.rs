//! Validated, separator-normalized relative paths.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A non-empty relative path using `/` as its separator.
///
/// Source files are keyed by their path relative to the project's source
/// folder. Backslashes are normalized to `/` on construction, and a leading
/// `./` is dropped, so paths reported by tools on other platforms compare
/// equal to the ones discovered on disk.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RelativePath(String);

/// Error returned when a string cannot be used as a [`RelativePath`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidPathError {
    /// The path was empty.
    #[error("relative path must not be empty")]
    Empty,
    /// The path started at a filesystem root or drive.
    #[error("path '{0}' is rooted; expected a relative path")]
    Rooted(String),
}

impl RelativePath {
    /// Creates a relative path, panicking if `path` is empty or rooted.
    ///
    /// Passing a rooted path here is a caller bug. Use [`RelativePath::parse`]
    /// for untrusted input.
    pub fn new(path: impl AsRef<str>) -> Self {
        match Self::parse(path.as_ref()) {
            Ok(p) => p,
            Err(e) => panic!("{e}"),
        }
    }

    /// Parses and normalizes a relative path.
    pub fn parse(path: &str) -> Result<Self, InvalidPathError> {
        let mut normalized = path.replace('\\', "/");
        while let Some(rest) = normalized.strip_prefix("./") {
            normalized = rest.to_string();
        }
        if normalized.is_empty() {
            return Err(InvalidPathError::Empty);
        }
        if is_rooted(&normalized) {
            return Err(InvalidPathError::Rooted(path.to_string()));
        }
        Ok(Self(normalized))
    }

    /// Creates a relative path from `path` with `base` stripped from its front.
    ///
    /// Returns `None` if `path` is not inside `base`.
    pub fn from_base(base: &Path, path: &Path) -> Option<Self> {
        let rel = path.strip_prefix(base).ok()?;
        Self::parse(&rel.to_string_lossy()).ok()
    }

    /// Returns the path as a `/`-separated string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolves this path against `base` using platform separators.
    pub fn resolve(&self, base: &Path) -> PathBuf {
        let mut out = base.to_path_buf();
        out.extend(self.0.split('/'));
        out
    }

    /// Returns the extension of the final segment, if any.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name();
        let dot = name.rfind('.')?;
        (dot > 0).then(|| &name[dot + 1..])
    }

    /// Returns the final path segment.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Returns a copy with the final segment's extension replaced by `ext`.
    pub fn with_extension(&self, ext: &str) -> Self {
        let name_start = self.0.len() - self.file_name().len();
        let stem_end = match self.extension() {
            Some(old) => self.0.len() - old.len() - 1,
            None => self.0.len(),
        };
        Self(format!("{}.{ext}", &self.0[..stem_end.max(name_start)]))
    }
}

fn is_rooted(path: &str) -> bool {
    if path.starts_with('/') {
        return true;
    }
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

impl TryFrom<String> for RelativePath {
    type Error = InvalidPathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RelativePath> for String {
    fn from(path: RelativePath) -> Self {
        path.0
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_backslashes() {
        let p = RelativePath::new(r"a\b\C.java");
        assert_eq!(p.as_str(), "a/b/C.java");
        assert_eq!(p, RelativePath::new("a/b/C.java"));
    }

    #[test]
    fn strips_leading_dot_slash() {
        assert_eq!(RelativePath::new("./A.java").as_str(), "A.java");
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(RelativePath::parse(""), Err(InvalidPathError::Empty));
        assert_eq!(RelativePath::parse("./"), Err(InvalidPathError::Empty));
    }

    #[test]
    fn rejects_rooted() {
        assert!(matches!(
            RelativePath::parse("/abs/A.java"),
            Err(InvalidPathError::Rooted(_))
        ));
        assert!(matches!(
            RelativePath::parse(r"C:\src\A.java"),
            Err(InvalidPathError::Rooted(_))
        ));
    }

    #[test]
    #[should_panic(expected = "rooted")]
    fn new_panics_on_rooted() {
        RelativePath::new("/A.java");
    }

    #[test]
    fn from_base_strips_prefix() {
        let base = Path::new("/project/sources");
        let file = Path::new("/project/sources/a/B.java");
        assert_eq!(
            RelativePath::from_base(base, file),
            Some(RelativePath::new("a/B.java"))
        );
        assert_eq!(RelativePath::from_base(base, Path::new("/other/B.java")), None);
    }

    #[test]
    fn resolve_joins_segments() {
        let p = RelativePath::new("a/B.java");
        assert_eq!(
            p.resolve(Path::new("/out")),
            Path::new("/out").join("a").join("B.java")
        );
    }

    #[test]
    fn extension_handling() {
        let p = RelativePath::new("a.b/C.java");
        assert_eq!(p.extension(), Some("java"));
        assert_eq!(p.with_extension("class").as_str(), "a.b/C.class");
        let bare = RelativePath::new("dir.x/Makefile");
        assert_eq!(bare.extension(), None);
        assert_eq!(bare.with_extension("class").as_str(), "dir.x/Makefile.class");
        assert_eq!(RelativePath::new(".hidden").extension(), None);
    }

    #[test]
    fn serde_validates() {
        let p: RelativePath = serde_json::from_str("\"a\\\\B.java\"").unwrap();
        assert_eq!(p.as_str(), "a/B.java");
        assert!(serde_json::from_str::<RelativePath>("\"/abs\"").is_err());
        assert_eq!(serde_json::to_string(&p).unwrap(), "\"a/B.java\"");
    }
}
