use crate::compile;
use crate::error::PatternError;
use crate::name_matcher::NameMatcher;

/// A compiled gitignore-style path pattern.
///
/// Built once from a pattern string, then shared read-only for the lifetime
/// of the owning repository. Matching never fails; only [`PathGlob::compile`]
/// reports errors.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PathGlob {
    pattern: String,
    matchers: Vec<NameMatcher>,
}

impl PathGlob {
    /// Compiles `pattern` into its matcher sequence.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let matchers = compile::compile(pattern)?;
        Ok(Self {
            pattern: pattern.to_string(),
            matchers,
        })
    }

    /// Returns the original pattern text.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the compiled matcher sequence.
    ///
    /// Consumers that can evaluate Subversion masks themselves may forward
    /// the matchers whose [`NameMatcher::svn_mask`] is present and fall back
    /// to in-process evaluation for the rest.
    #[must_use]
    pub fn matchers(&self) -> &[NameMatcher] {
        &self.matchers
    }

    /// Determines whether `path` is selected.
    ///
    /// The path is split on `/` with empty segments ignored, so `"/docs/a"`
    /// and `"docs/a"` name the same entry and the empty string names the
    /// repository root. `is_dir` reports whether the final segment is a
    /// directory; interior segments are directories by construction.
    #[must_use]
    pub fn matches(&self, path: &str, is_dir: bool) -> bool {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        self.matches_segments(&segments, is_dir)
    }

    /// Segment-level entry point for callers that already hold a split path.
    #[must_use]
    pub fn matches_segments(&self, segments: &[&str], is_dir: bool) -> bool {
        // When the last non-recursive matcher is directory-only the final
        // position must be a directory, even if a recursive step is what
        // consumes it. This is the constraint that keeps "**/x/" and the
        // "*/"-before-"**/" rewrite equivalent.
        if !is_dir && self.requires_directory() {
            return false;
        }
        matches_at(&self.matchers, segments, is_dir)
    }

    fn requires_directory(&self) -> bool {
        self.matchers
            .iter()
            .rev()
            .find(|matcher| !matcher.is_recursive())
            .is_some_and(NameMatcher::is_dir_only)
    }
}

fn matches_at(matchers: &[NameMatcher], segments: &[&str], is_dir: bool) -> bool {
    let Some((head, rest)) = matchers.split_first() else {
        return segments.is_empty();
    };
    if head.is_recursive() {
        // Zero or more segments. Normalization has collapsed adjacent
        // recursive steps, so one level of lookahead per step is enough.
        (0..=segments.len()).any(|skip| matches_at(rest, &segments[skip..], is_dir))
    } else {
        let Some((segment, tail)) = segments.split_first() else {
            return false;
        };
        let segment_is_dir = !tail.is_empty() || is_dir;
        head.matches(segment, segment_is_dir) && matches_at(rest, tail, is_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::PathGlob;

    fn glob(pattern: &str) -> PathGlob {
        PathGlob::compile(pattern).expect("pattern compiles")
    }

    #[test]
    fn root_pattern_accepts_only_the_root() {
        let root = glob("/");
        assert!(root.matches("", true));
        assert!(!root.matches("a", true));
        assert!(!root.matches("a/b", false));
    }

    #[test]
    fn interior_segments_are_directories() {
        // "docs" sits in an interior position, so a dir-only matcher
        // accepts it even though the leaf is a file.
        let pattern = glob("/docs/readme.txt");
        assert!(pattern.matches("docs/readme.txt", false));
    }

    #[test]
    fn leading_and_duplicate_separators_are_ignored() {
        let pattern = glob("/docs/readme.txt");
        assert!(pattern.matches("/docs/readme.txt", false));
        assert!(pattern.matches("docs//readme.txt", false));
    }

    #[test]
    fn recursive_consumes_zero_segments() {
        let pattern = glob("**/foo");
        assert!(pattern.matches("foo", false));
        assert!(pattern.matches("a/b/foo", false));
        assert!(!pattern.matches("a/b/bar", false));
    }

    #[test]
    fn recursive_tail_requires_nothing_further() {
        // "a/**" collapses to "a/": the directory itself is selected.
        let pattern = glob("a/**");
        assert!(pattern.matches("a", true));
        assert!(!pattern.matches("a", false));
    }

    #[test]
    fn pattern_text_is_preserved() {
        assert_eq!(glob("**/build/").pattern(), "**/build/");
    }

    #[test]
    fn trailing_recursive_still_honours_dir_only() {
        // "x/**/" keeps its trailing recursive step; the directory-only
        // requirement applies to the final position regardless of which
        // matcher consumed it.
        let pattern = glob("x/**/");
        assert!(pattern.matches("x", true));
        assert!(pattern.matches("x/y", true));
        assert!(!pattern.matches("x/y", false));
    }
}
