//! Wildcard pattern compilation
//!
//! Operators write domain globs such as `*.example.com`. A pattern is turned
//! into a regular expression by:
//!
//! 1. appending the root label dot (`*.example.com` -> `*.example.com.`)
//! 2. escaping every `.` so it only matches a literal dot
//! 3. replacing every `*` with `.*` (any sequence, including none and dots)
//! 4. anchoring the expression at the end of the input
//!
//! Matching is a search, not a whole-string match: only the end is anchored,
//! so a pattern without `*` still matches as a suffix. `example.com` matches
//! both `example.com.` and `foo.example.com.`.

use std::fmt;

use regex::Regex;

use crate::dns::errors::ParseError;

/// A compiled, suffix-anchored wildcard pattern
#[derive(Clone, Debug)]
pub struct WildcardPattern {
    source: String,
    regex: Regex,
}

impl WildcardPattern {
    /// Compile an operator pattern. Characters other than `.` and `*` are
    /// passed to the regex engine untouched; the error is returned when the
    /// result is not a valid expression.
    pub fn compile(pattern: &str) -> Result<WildcardPattern, ParseError> {
        let expression = Self::to_expression(pattern);

        let regex = Regex::new(&expression).map_err(|source| ParseError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(WildcardPattern {
            source: pattern.to_string(),
            regex,
        })
    }

    /// The regular expression text for a pattern
    pub fn to_expression(pattern: &str) -> String {
        let mut expression = format!("{}.", pattern);
        expression = expression.replace('.', "\\.");
        expression = expression.replace('*', ".*");
        expression.push('$');
        expression
    }

    /// Search `query` for a match ending at the end of the name
    pub fn is_match(&self, query: &str) -> bool {
        self.regex.is_match(query)
    }

    /// The pattern as written in the zones file
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for WildcardPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}
