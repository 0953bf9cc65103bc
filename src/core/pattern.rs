use std::collections::HashSet;

use regex::{RegexSet, RegexSetBuilder};

use crate::error::FilterSpecError;

/// Pre-compiled glob patterns matched against base names.
/// Patterns without wildcards go through an exact-match set; the rest are
/// compiled into a single regex set.
#[derive(Clone, Debug, Default)]
pub struct CompiledPatterns {
    /// Patterns without wildcards - use fast exact matching
    exact_matches: HashSet<String>,
    /// Compiled regex set for glob patterns with wildcards
    regex_set: Option<RegexSet>,
}

impl CompiledPatterns {
    /// Compile a list of glob patterns. An empty list matches nothing.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, FilterSpecError> {
        Self::build(patterns, false)
    }

    /// Compile patterns that ignore ASCII and Unicode case.
    pub fn case_insensitive<S: AsRef<str>>(patterns: &[S]) -> Result<Self, FilterSpecError> {
        Self::build(patterns, true)
    }

    fn build<S: AsRef<str>>(patterns: &[S], ignore_case: bool) -> Result<Self, FilterSpecError> {
        let mut exact_matches = HashSet::new();
        let mut regex_patterns = Vec::new();

        for pattern in patterns {
            let p = pattern.as_ref();
            if !ignore_case && !is_glob(p) {
                exact_matches.insert(p.to_owned());
            } else {
                regex_patterns.push(glob_to_regex(p));
            }
        }

        let regex_set = if regex_patterns.is_empty() {
            None
        } else {
            let set = RegexSetBuilder::new(&regex_patterns)
                .case_insensitive(ignore_case)
                .dot_matches_new_line(true)
                .build()
                .map_err(|err| FilterSpecError::InvalidPattern {
                    pattern: patterns
                        .iter()
                        .map(|p| p.as_ref())
                        .collect::<Vec<_>>()
                        .join(", "),
                    reason: err.to_string(),
                })?;
            Some(set)
        };

        Ok(Self {
            exact_matches,
            regex_set,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.exact_matches.is_empty() && self.regex_set.is_none()
    }

    /// Check if a name matches any of the compiled patterns.
    #[inline]
    pub fn matches(&self, name: &str) -> bool {
        if self.exact_matches.contains(name) {
            return true;
        }

        if let Some(ref regex_set) = self.regex_set {
            return regex_set.is_match(name);
        }

        false
    }
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Convert a shell glob into an anchored regex.
/// Supports `*`, `?` and `[...]` classes (negated with `!` or `^`).
/// A `[` without a closing `]` is taken literally.
fn glob_to_regex(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut regex_pattern = String::with_capacity(pattern.len() * 2 + 2);
    regex_pattern.push('^');

    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => regex_pattern.push_str(".*"),
            '?' => regex_pattern.push('.'),
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    push_class(&mut regex_pattern, &chars[i + 1..end]);
                    i = end;
                }
                None => regex_pattern.push_str(r"\["),
            },
            c => regex_pattern.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
        i += 1;
    }

    regex_pattern.push('$');
    regex_pattern
}

/// Index of the `]` closing the class opened at `start`. A `]` directly
/// after the opening bracket (or its negation) is a member, not the end.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start + 1;
    if matches!(chars.get(j), Some('!' | '^')) {
        j += 1;
    }
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    chars[j.min(chars.len())..]
        .iter()
        .position(|&c| c == ']')
        .map(|offset| j + offset)
}

fn push_class(out: &mut String, body: &[char]) {
    out.push('[');
    let mut members = body;
    if let Some(('!' | '^', rest)) = body.split_first() {
        out.push('^');
        members = rest;
    }
    for &c in members {
        // Characters with meaning inside a regex class, other than ranges.
        if matches!(c, '\\' | '[' | ']' | '^' | '&' | '~') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push(']');
}
