//! Case-insensitive substring match against the stored keyword list.
use aho_corasick::AhoCorasick;
use thiserror::Error;

use crate::domain::SpamKeyword;
use crate::error::StoreError;

#[derive(Error, Debug)]
pub enum KeywordCheckError {
    #[error("keyword lookup failed: {0}")]
    Store(#[from] StoreError),
    #[error("keyword matcher build failed: {0}")]
    Matcher(#[from] aho_corasick::BuildError),
}

/// True when any keyword occurs in `text`, ignoring case.
///
/// An empty stored word is a substring of every text and always matches.
pub fn contains_keyword(
    text: &str,
    keywords: &[SpamKeyword],
) -> Result<bool, aho_corasick::BuildError> {
    let patterns: Vec<String> = keywords
        .iter()
        .map(|keyword| keyword.word.to_lowercase())
        .collect();
    if patterns.is_empty() {
        return Ok(false);
    }
    let matcher = AhoCorasick::new(&patterns)?;
    Ok(matcher.is_match(&text.to_lowercase()))
}
