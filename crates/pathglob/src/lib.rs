#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `pathglob` decides whether a repository path is selected by a
//! gitignore-style wildcard pattern. It is the matching engine behind the
//! gitsvn bridge's per-path authorization and its "which entries are visible
//! at which depth" decisions. Patterns honour anchored matches (leading `/`),
//! directory-only rules (trailing `/`), single-segment wildcards (`*`, `?`,
//! character classes, backslash escapes), and the `**/` step that crosses any
//! number of intermediate directories.
//!
//! # Design
//!
//! - [`PathGlob`] is the compiled form of a pattern: an ordered sequence of
//!   [`NameMatcher`] primitives, built once at configuration load and shared
//!   freely afterwards.
//! - [`NameMatcher`] is a closed set of four segment matchers. Three of them
//!   (`Equals`, `Simple`, `Complex`) consume exactly one path segment; the
//!   fourth (`Recursive`, the `**/` step) consumes zero or more.
//! - [`SegmentGlob`] evaluates an arbitrary single-segment wildcard. Its `*`
//!   never crosses a path separator because the input is always one segment.
//! - Compilation normalizes the token list before lowering it to primitives:
//!   patterns are rooted, bare file names gain an implicit `**/` prefix, and
//!   redundant recursive steps are collapsed. The normalizer is a bounded
//!   rewrite; two patterns accepting the same set may still compile to
//!   structurally different matcher sequences.
//!
//! # Invariants
//!
//! - Compiled patterns are immutable and safe to share across threads.
//! - Matching is total: for every compiled pattern and every path it
//!   terminates and returns a boolean. Only compilation can fail.
//! - A compiled sequence never contains two adjacent recursive matchers.
//!
//! # Errors
//!
//! [`PathGlob::compile`] reports [`PatternError`] for an empty pattern, an
//! unterminated character class, or an escape at the end of a mask. The error
//! carries the offending pattern and a [`PatternErrorKind`] classification.
//!
//! # Examples
//!
//! ```
//! use pathglob::PathGlob;
//!
//! let docs = PathGlob::compile("docs/**/*.md").expect("pattern compiles");
//! assert!(docs.matches("docs/guide/intro.md", false));
//! assert!(docs.matches("docs/readme.md", false));
//! assert!(!docs.matches("src/lib.rs", false));
//!
//! // A trailing slash restricts the match to directories, at any depth.
//! let build = PathGlob::compile("build/").expect("pattern compiles");
//! assert!(build.matches("target/build", true));
//! assert!(!build.matches("target/build", false));
//! ```
//!
//! # See also
//!
//! - The `access` crate, which compiles ACL path rules through [`PathGlob`]
//!   and forwards [`NameMatcher::svn_mask`] masks to clients that can match
//!   them on their own.

mod compile;
mod error;
mod glob;
mod name_matcher;
mod path_glob;

pub use error::{PatternError, PatternErrorKind};
pub use glob::SegmentGlob;
pub use name_matcher::NameMatcher;
pub use path_glob::PathGlob;
