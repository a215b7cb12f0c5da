use std::{fmt, sync::Arc};

use regex::Regex;
use thiserror::Error;

use crate::{params::Params, server::Handler};

pub type SharedHandler = Arc<dyn Handler + Send + Sync>;

#[derive(Error, Debug)]
#[error("invalid route pattern `{pattern}`: {source}")]
pub struct InvalidPattern {
    pattern: String,
    source: regex::Error,
}

/// A compiled route pattern and the handler it dispatches to.
pub struct PatternBinding {
    pattern: Regex,
    handler: SharedHandler,
}

impl PatternBinding {
    pub fn try_new(pattern: &str, handler: SharedHandler) -> Result<Self, InvalidPattern> {
        let pattern = Regex::new(pattern).map_err(|source| InvalidPattern {
            pattern: pattern.to_owned(),
            source,
        })?;
        Ok(Self { pattern, handler })
    }

    /// Panics if `pattern` is not a valid regular expression.
    #[track_caller]
    pub fn new(pattern: &str, handler: SharedHandler) -> Self {
        match Self::try_new(pattern, handler) {
            Ok(binding) => binding,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn handler(&self) -> &(dyn Handler + Send + Sync) {
        self.handler.as_ref()
    }

    /// Matches `path` against the pattern as written; no anchors are added.
    ///
    /// Named groups end up in the returned params as `:<name>`. A named group
    /// that did not take part in the match yields an empty string.
    pub fn try_match(&self, path: &str) -> Option<Params> {
        let captures = self.pattern.captures(path)?;
        let mut params = Params::new_empty();
        for (i, name) in self.pattern.capture_names().enumerate() {
            let Some(name) = name else { continue };
            let value = captures.get(i).map_or("", |m| m.as_str());
            params.add_path_param(name, value);
        }
        Some(params)
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.pattern.is_match(path)
    }
}

impl fmt::Debug for PatternBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternBinding")
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{params::Params, server::noop_handler};

    use super::PatternBinding;

    fn binding(pattern: &str) -> PatternBinding {
        PatternBinding::new(pattern, Arc::new(noop_handler()))
    }

    #[test]
    fn test_root_match() {
        let b = binding("^/$");
        assert!(b.try_match("/").unwrap().is_empty());
        assert!(b.try_match("/wrong_url").is_none());
    }

    #[test]
    fn test_named_group() {
        let b = binding("^/foo/(?P<name>[^/#?]+)$");
        let params = b.try_match("/foo/bar").unwrap();

        let mut want = Params::new_empty();
        want.add(":name", "bar");
        assert_eq!(params, want);
    }

    #[test]
    fn test_unnamed_groups_ignored() {
        let b = binding("^/(\\d+)/(?P<slug>[a-z]+)/([a-z]+)$");
        let params = b.try_match("/42/post/edit").unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params.get(":slug"), Some("post"));
    }

    #[test]
    fn test_optional_named_group() {
        let b = binding("^/files(?:/(?P<file>[^/]+))?$");
        assert_eq!(b.try_match("/files").unwrap().get(":file"), Some(""));
        assert_eq!(b.try_match("/files/a.txt").unwrap().get(":file"), Some("a.txt"));
    }

    #[test]
    fn test_no_implicit_anchors() {
        let b = binding("/foo");
        assert!(b.is_match("/foo"));
        assert!(b.is_match("/x/foo/y"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = PatternBinding::try_new("^/(?P<name>$", Arc::new(noop_handler())).unwrap_err();
        assert!(err.to_string().starts_with("invalid route pattern `^/(?P<name>$`"));
    }

    #[test]
    #[should_panic(expected = "invalid route pattern")]
    fn test_invalid_pattern_panics() {
        binding("^/foo/(");
    }
}
