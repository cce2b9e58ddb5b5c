//! Text normalization shared by all matchers.
//!
//! Normalized text is lowercase, keeps only alphanumerics and word-internal
//! apostrophes, and has every other character replaced by a single space. Two inputs that
//! differ only in case, punctuation or whitespace normalize to the same string.

use crate::error::AppError;
use regex::Regex;

/// Lowercases, folds typographic apostrophes, strips punctuation and collapses whitespace.
///
/// An apostrophe survives only between two alphanumerics ("can't"); quote
/// marks around a word are treated as punctuation.
pub fn normalize(text: &str) -> String {
    let chars: Vec<char> = text
        .chars()
        .map(|c| match c {
            '\u{2019}' | '\u{2018}' | '`' => '\'',
            other => other,
        })
        .collect();

    let mut cleaned = String::with_capacity(text.len());
    for (i, &c) in chars.iter().enumerate() {
        if c.is_alphanumeric() {
            cleaned.extend(c.to_lowercase());
        } else if c == '\'' && is_word_internal(&chars, i) {
            cleaned.push('\'');
        } else {
            cleaned.push(' ');
        }
    }
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_word_internal(chars: &[char], i: usize) -> bool {
    i > 0
        && chars[i - 1].is_alphanumeric()
        && chars.get(i + 1).is_some_and(|c| c.is_alphanumeric())
}

/// Splits normalized text into words.
pub fn tokens(normalized: &str) -> Vec<&str> {
    normalized.split(' ').filter(|t| !t.is_empty()).collect()
}

/// Compiles a lexicon term into a whole-word matcher over normalized text.
///
/// Multi-word terms match across any run of whitespace; a trailing plural
/// `s`/`es` is accepted so "headaches" still counts as "headache".
pub fn term_matcher(term: &str) -> Result<Regex, AppError> {
    let normalized = normalize(term);
    if normalized.is_empty() {
        return Err(AppError::Config(format!("Empty lexicon term: {:?}", term)));
    }
    let body = tokens(&normalized)
        .into_iter()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    Ok(Regex::new(&format!(r"\b{}(?:s|es)?\b", body))?)
}

/// Compiles a raw emergency pattern fragment into a whole-word matcher.
pub fn phrase_matcher(pattern: &str) -> Result<Regex, AppError> {
    Ok(Regex::new(&format!(r"\b(?:{})\b", pattern))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_case_and_whitespace() {
        assert_eq!(normalize("  I  Have\tCHEST   pain!! "), "i have chest pain");
        assert_eq!(normalize("i have chest pain"), normalize("I HAVE CHEST PAIN"));
    }

    #[test]
    fn test_normalize_keeps_apostrophes() {
        assert_eq!(normalize("I can’t breathe."), "i can't breathe");
    }

    #[test]
    fn test_normalize_drops_quote_marks() {
        assert_eq!(normalize("I feel 'awful'"), "i feel awful");
        assert_eq!(normalize("‘not’ good, 'cause"), "not good cause");
        assert_eq!(tokens(&normalize("I feel 'awful'")), vec!["i", "feel", "awful"]);
    }

    #[test]
    fn test_normalize_splits_hyphens() {
        assert_eq!(normalize("self-harm"), "self harm");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize("  ...  "), "");
        assert!(tokens("").is_empty());
    }

    #[test]
    fn test_term_matcher_word_boundaries() {
        let ill = term_matcher("ill").unwrap();
        assert!(ill.is_match("i feel ill today"));
        assert!(!ill.is_match("i will go"));

        let headache = term_matcher("headache").unwrap();
        assert!(headache.is_match("frequent headaches lately"));
    }

    #[test]
    fn test_term_matcher_multi_word() {
        let sob = term_matcher("shortness of breath").unwrap();
        assert!(sob.is_match(&normalize("Shortness  of breath, since Monday")));
        assert!(!sob.is_match("shortness and breath"));
    }

    #[test]
    fn test_phrase_matcher() {
        let m = phrase_matcher(r"can'?t\s+breathe").unwrap();
        assert!(m.is_match("i cant breathe"));
        assert!(m.is_match("i can't breathe"));
        assert!(phrase_matcher("(").is_err());
    }
}
