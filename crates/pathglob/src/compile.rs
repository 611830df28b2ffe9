use crate::error::{PatternError, PatternErrorKind};
use crate::glob::SegmentGlob;
use crate::name_matcher::NameMatcher;

/// Compiles a pattern into its matcher sequence.
pub(crate) fn compile(pattern: &str) -> Result<Vec<NameMatcher>, PatternError> {
    if pattern.is_empty() {
        return Err(PatternError::new(pattern, PatternErrorKind::Empty));
    }
    let tokens = normalize_tokens(split_pattern(pattern));
    let mut matchers = Vec::with_capacity(tokens.len());
    for token in &tokens {
        if let Some(matcher) = lower_token(token, pattern)? {
            matchers.push(matcher);
        }
    }
    Ok(matchers)
}

/// Splits a pattern on `/` while keeping the separator on each token.
///
/// The trailing `/` is what distinguishes a directory-only token from a
/// file-name token, so it must survive the split.
pub(crate) fn split_pattern(pattern: &str) -> Vec<String> {
    let mut tokens = Vec::with_capacity(pattern.matches('/').count() + 1);
    let mut start = 0;
    while let Some(separator) = pattern[start..].find('/') {
        let end = start + separator + 1;
        tokens.push(pattern[start..end].to_string());
        start = end;
    }
    if start < pattern.len() {
        tokens.push(pattern[start..].to_string());
    }
    tokens
}

/// Removes redundant tokens and rewrites the list into its canonical shape.
///
/// The walk is index-based over a growable buffer. Termination: every arm
/// either removes a token, advances the index, or rewrites a `**`-headed
/// token into a pair whose head collapses on the next iteration; each
/// original token can be split at most once.
pub(crate) fn normalize_tokens(mut tokens: Vec<String>) -> Vec<String> {
    // A pattern with no inner slash applies at any depth.
    if tokens.len() == 1 && tokens[0] != "/" {
        tokens.insert(0, "**/".to_string());
    }
    // Root the pattern relative to the repository.
    if tokens.first().map(String::as_str) != Some("/") {
        tokens.insert(0, "/".to_string());
    }

    let mut index = 1;
    while index < tokens.len() {
        debug_assert_eq!(tokens[0], "/");
        let token = tokens[index].as_str();
        if tokens[index - 1] == "**/" {
            if token == "*/" {
                // Push the unconstrained step as late as possible; the
                // accepted set is unchanged.
                tokens.swap(index - 1, index);
                index += 1;
                continue;
            }
            if token == "*" || token == "**" {
                // Two consecutive "any" steps collapse to one. The current
                // token shifts down and is re-examined against its new
                // predecessor.
                debug_assert!(index >= 2);
                tokens.remove(index - 1);
                index -= 1;
                continue;
            }
            if token == "**/" {
                tokens.remove(index);
                continue;
            }
        }
        if token == "**" {
            tokens.remove(index);
            continue;
        }
        if token.starts_with("**") && token != "**/" {
            // "**.log" is "**/" followed by "*.log".
            let tail = token[1..].to_string();
            tokens[index] = "**/".to_string();
            tokens.insert(index + 1, tail);
            continue;
        }
        index += 1;
    }
    tokens
}

fn lower_token(token: &str, pattern: &str) -> Result<Option<NameMatcher>, PatternError> {
    if token == "/" {
        // Pure root marker; it shapes normalization but matches nothing.
        return Ok(None);
    }
    if token == "**/" {
        return Ok(Some(NameMatcher::Recursive));
    }

    let dir_only = token.ends_with('/');
    let mask = token.strip_suffix('/').unwrap_or(token);
    if mask.contains(['[', ']', '\\']) {
        return Ok(Some(NameMatcher::Complex {
            glob: segment_glob(mask, pattern)?,
            dir_only,
            svn_compatible: false,
        }));
    }
    if mask.contains('?') {
        return Ok(Some(NameMatcher::Complex {
            glob: segment_glob(mask, pattern)?,
            dir_only,
            svn_compatible: true,
        }));
    }

    let mut stars = mask.match_indices('*');
    let matcher = match (stars.next(), stars.next()) {
        (None, _) => NameMatcher::Equals {
            name: mask.to_string(),
            dir_only,
        },
        (Some((asterisk, _)), None) => NameMatcher::Simple {
            prefix: mask[..asterisk].to_string(),
            suffix: mask[asterisk + 1..].to_string(),
            dir_only,
        },
        (Some(_), Some(_)) => NameMatcher::Complex {
            glob: segment_glob(mask, pattern)?,
            dir_only,
            svn_compatible: true,
        },
    };
    Ok(Some(matcher))
}

fn segment_glob(mask: &str, pattern: &str) -> Result<SegmentGlob, PatternError> {
    SegmentGlob::parse(mask).map_err(|error| PatternError::new(pattern, error.kind()))
}
