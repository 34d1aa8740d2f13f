// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Boundary-aware matching of class identifiers in arbitrary text.
//!
//! A class identifier must only be recognized as a complete token:
//! renaming `btn` must leave `btn-large` alone. Which characters glue a
//! token to its neighbours is policy, not hardcoded: `-` joins
//! hyphenated class parts, `&;:` appear in HTML entities and CSS
//! pseudo-selectors, `_` in snake_case identifiers.

use regex::Regex;
use serde::Deserialize;

use crate::error::Error;

/// Characters that bind a class identifier to surrounding text.
///
/// A candidate occurrence is rejected when the character immediately
/// before it is in `leading`, or the character immediately after it is
/// in `trailing`. Start and end of input always count as boundaries.
/// The trailing set additionally holds `.` and `/` so that property
/// access and path segments in JS never match.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BoundaryPolicy {
    /// Characters that bind an identifier to the text before it.
    pub leading: String,
    /// Characters that bind an identifier to the text after it.
    pub trailing: String,
}

impl Default for BoundaryPolicy {
    fn default() -> Self {
        Self { leading: "-&;:_".to_string(), trailing: "-&;:_./".to_string() }
    }
}

impl BoundaryPolicy {
    /// True when `c` glues a candidate match to the preceding text.
    pub fn binds_before(&self, c: char) -> bool {
        self.leading.contains(c)
    }

    /// True when `c` glues a candidate match to the following text.
    pub fn binds_after(&self, c: char) -> bool {
        self.trailing.contains(c)
    }

    /// Build the regex source recognizing `identifier` as a whole token.
    ///
    /// The identifier is escaped so regex metacharacters in class names
    /// (`.`, `+`, ...) match literally. The leading and trailing
    /// boundary characters are captured as groups 1 and 3 so a
    /// replacement can reinsert them unchanged around group 2.
    pub fn pattern_for(&self, identifier: &str) -> Result<String, Error> {
        if identifier.is_empty() {
            return Err(Error::config("cannot match an empty class identifier"));
        }
        Ok(format!(
            "{lead}({id}){trail}",
            lead = negated_class(&self.leading, "^"),
            id = regex::escape(identifier),
            trail = negated_class(&self.trailing, "$"),
        ))
    }
}

/// `(anchor|[^chars])`, one boundary character or the input edge.
/// An empty character set degrades to "any character at all".
fn negated_class(chars: &str, anchor: &str) -> String {
    if chars.is_empty() {
        return format!("({anchor}|(?s:.))");
    }
    let mut escaped = String::with_capacity(chars.len() * 2);
    for c in chars.chars() {
        if matches!(c, '\\' | ']' | '^' | '-' | '&' | '~') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!("({anchor}|[^{escaped}])")
}

/// A compiled matcher for one identifier, reusable across many target
/// strings.
///
/// This is the single-identifier surface of the matcher; the rewrite
/// pass itself goes through [`crate::rewrite::RenameEngine`], which
/// applies a whole map in one sweep under the same policy.
#[derive(Debug)]
pub struct ClassPattern {
    regex: Regex,
}

impl ClassPattern {
    pub fn compile(policy: &BoundaryPolicy, identifier: &str) -> Result<Self, Error> {
        let source = policy.pattern_for(identifier)?;
        let regex = Regex::new(&source)
            .map_err(|e| Error::config(format!("boundary pattern failed to compile: {e}")))?;
        Ok(Self { regex })
    }

    /// True when `text` contains the identifier as a complete token.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Replace every occurrence with `renamed`, preserving the captured
    /// boundary characters.
    pub fn replace_all(&self, text: &str, renamed: &str) -> String {
        self.regex
            .replace_all(text, |caps: &regex::Captures| {
                format!("{}{}{}", &caps[1], renamed, &caps[3])
            })
            .into_owned()
    }
}

#[cfg(test)]
#[path = "pattern_tests.rs"]
mod tests;
