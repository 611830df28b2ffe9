use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::{PatternError, PatternErrorKind};

/// A single-segment wildcard compiled to a token sequence.
///
/// Supports `*` (any run of characters, possibly empty), `?` (any single
/// character), `[...]` character classes with `!`/`^` negation and `-`
/// ranges, and `\` escapes. The asterisk never crosses a path separator
/// because the input is always one segment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SegmentGlob {
    mask: String,
    tokens: Vec<GlobToken>,
}

impl SegmentGlob {
    /// Compiles a segment mask.
    ///
    /// Fails when a character class is never closed or an escape has
    /// nothing left to consume.
    pub fn parse(mask: &str) -> Result<Self, PatternError> {
        let mut tokens = Vec::new();
        let mut chars = mask.char_indices().peekable();
        while let Some((at, ch)) = chars.next() {
            match ch {
                '\\' => match chars.next() {
                    Some((_, escaped)) => tokens.push(GlobToken::Literal(escaped)),
                    None => {
                        return Err(PatternError::new(
                            mask,
                            PatternErrorKind::DanglingEscape { position: at },
                        ));
                    }
                },
                '?' => tokens.push(GlobToken::AnyChar),
                '*' => {
                    // Consecutive asterisks match the same inputs as one.
                    if !matches!(tokens.last(), Some(GlobToken::AnyRun)) {
                        tokens.push(GlobToken::AnyRun);
                    }
                }
                '[' => tokens.push(parse_class(mask, at, &mut chars)?),
                other => tokens.push(GlobToken::Literal(other)),
            }
        }
        Ok(Self {
            mask: mask.to_string(),
            tokens,
        })
    }

    /// Returns the source mask.
    #[must_use]
    pub fn mask(&self) -> &str {
        &self.mask
    }

    /// Reports whether the glob accepts `segment`.
    #[must_use]
    pub fn matches(&self, segment: &str) -> bool {
        let chars: Vec<char> = segment.chars().collect();
        match_tokens(&self.tokens, &chars)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum GlobToken {
    Literal(char),
    AnyChar,
    AnyRun,
    Class { negated: bool, items: Vec<ClassItem> },
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum ClassItem {
    Single(char),
    Range(char, char),
}

fn parse_class(
    mask: &str,
    open: usize,
    chars: &mut Peekable<CharIndices<'_>>,
) -> Result<GlobToken, PatternError> {
    let negated = matches!(chars.peek(), Some((_, '!' | '^')));
    if negated {
        chars.next();
    }

    let mut items = Vec::new();
    let mut pending: Option<char> = None;
    let mut dash = false;
    let mut first = true;
    loop {
        let Some((at, raw)) = chars.next() else {
            return Err(PatternError::new(
                mask,
                PatternErrorKind::UnterminatedClass { position: open },
            ));
        };
        // `]` terminates the class unless it is the first member.
        if raw == ']' && !first {
            if let Some(single) = pending.take() {
                items.push(ClassItem::Single(single));
            }
            if dash {
                items.push(ClassItem::Single('-'));
            }
            return Ok(GlobToken::Class { negated, items });
        }
        first = false;

        if raw == '-' && pending.is_some() && !dash {
            dash = true;
            continue;
        }

        let member = if raw == '\\' {
            match chars.next() {
                Some((_, escaped)) => escaped,
                None => {
                    return Err(PatternError::new(
                        mask,
                        PatternErrorKind::DanglingEscape { position: at },
                    ));
                }
            }
        } else {
            raw
        };

        if dash {
            dash = false;
            let low = pending.take().unwrap_or(member);
            items.push(ClassItem::Range(low, member));
        } else {
            if let Some(single) = pending.take() {
                items.push(ClassItem::Single(single));
            }
            pending = Some(member);
        }
    }
}

/// Classic star-backtracking wildcard walk: every non-`*` token consumes
/// exactly one character, `*` records a resume point and retries from it on
/// mismatch.
fn match_tokens(tokens: &[GlobToken], chars: &[char]) -> bool {
    let mut token = 0;
    let mut at = 0;
    let mut resume: Option<(usize, usize)> = None;
    while at < chars.len() {
        match tokens.get(token) {
            Some(GlobToken::AnyRun) => {
                resume = Some((token, at));
                token += 1;
            }
            Some(single) if matches_char(single, chars[at]) => {
                token += 1;
                at += 1;
            }
            _ => match resume {
                Some((star, start)) => {
                    token = star + 1;
                    at = start + 1;
                    resume = Some((star, start + 1));
                }
                None => return false,
            },
        }
    }
    tokens[token..]
        .iter()
        .all(|rest| matches!(rest, GlobToken::AnyRun))
}

fn matches_char(token: &GlobToken, ch: char) -> bool {
    match token {
        GlobToken::Literal(literal) => *literal == ch,
        GlobToken::AnyChar | GlobToken::AnyRun => true,
        GlobToken::Class { negated, items } => {
            let inside = items.iter().any(|item| match item {
                ClassItem::Single(single) => *single == ch,
                ClassItem::Range(low, high) => (*low..=*high).contains(&ch),
            });
            inside != *negated
        }
    }
}
