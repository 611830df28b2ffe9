use crate::glob::SegmentGlob;

/// A matcher for a single path segment.
///
/// The set is closed: the compiler lowers every pattern token to one of the
/// four variants. `Equals` and `Simple` can be expressed in Subversion's own
/// wildcard grammar and expose that form through [`NameMatcher::svn_mask`];
/// `Complex` and `Recursive` must be evaluated in-process.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NameMatcher {
    /// Literal segment equality.
    Equals {
        /// Segment text that must match exactly.
        name: String,
        /// Restricts the match to directory positions.
        dir_only: bool,
    },
    /// `prefix` + a single `*` + `suffix`, all within one segment.
    Simple {
        /// Required leading text.
        prefix: String,
        /// Required trailing text.
        suffix: String,
        /// Restricts the match to directory positions.
        dir_only: bool,
    },
    /// An arbitrary single-segment wildcard.
    Complex {
        /// Compiled segment glob.
        glob: SegmentGlob,
        /// Restricts the match to directory positions.
        dir_only: bool,
        /// Whether the mask avoids `[`, `]` and `\`. Informational: the
        /// matcher is still evaluated in-process.
        svn_compatible: bool,
    },
    /// The `**/` step: accepts any segment, at any depth, zero or more
    /// times.
    Recursive,
}

impl NameMatcher {
    /// Reports whether the matcher accepts `segment` at a position with the
    /// given directory flag.
    #[must_use]
    pub fn matches(&self, segment: &str, is_dir: bool) -> bool {
        match self {
            Self::Equals { name, dir_only } => (!dir_only || is_dir) && segment == name,
            Self::Simple {
                prefix,
                suffix,
                dir_only,
            } => {
                // The length guard keeps prefix and suffix from overlapping
                // on short segments.
                (!dir_only || is_dir)
                    && segment.len() >= prefix.len() + suffix.len()
                    && segment.starts_with(prefix.as_str())
                    && segment.ends_with(suffix.as_str())
            }
            Self::Complex { glob, dir_only, .. } => (!dir_only || is_dir) && glob.matches(segment),
            Self::Recursive => true,
        }
    }

    /// True only for the any-depth variant.
    #[must_use]
    pub const fn is_recursive(&self) -> bool {
        matches!(self, Self::Recursive)
    }

    /// Reports whether the matcher only accepts directory positions.
    #[must_use]
    pub fn is_dir_only(&self) -> bool {
        match self {
            Self::Equals { dir_only, .. }
            | Self::Simple { dir_only, .. }
            | Self::Complex { dir_only, .. } => *dir_only,
            Self::Recursive => false,
        }
    }

    /// Returns an equivalent mask in Subversion's own pattern language when
    /// one exists (a literal, or a single asterisk between literals).
    #[must_use]
    pub fn svn_mask(&self) -> Option<String> {
        match self {
            Self::Equals { name, .. } => Some(name.clone()),
            Self::Simple { prefix, suffix, .. } => Some(format!("{prefix}*{suffix}")),
            Self::Complex { .. } | Self::Recursive => None,
        }
    }
}
