//! Sentence tokenizer for the word index.
//!
//! Splits on whitespace and ASCII punctuation, lower-cases, and keeps each
//! word once. Single-character tokens and a handful of English words too
//! common to be useful ("the", "of", ...) are dropped. The number of words
//! returned is the sentence length the word index is keyed by, so the
//! rules here must never change for an existing database.

use rustc_hash::FxHashSet;

/// Characters that separate words.
pub const WORD_SEPARATORS: &[char] = &[
    ' ', '\t', '\r', '\n', '\\', '~', '`', '!', '@', '#', '$', '%', '^', '&', '*', '(', ')',
    '-', '_', '=', '+', '|', '[', ']', '{', '}', ';', ':', '\'', '"', '<', '>', ',', '.', '/',
    '?',
];

/// Words never indexed.
pub const STOP_WORDS: &[&str] = &["a", "an", "have", "of", "the", "will"];

/// Tokenize `sentence` into the ordered, duplicate-free word list.
pub fn tokenize(sentence: &str) -> Vec<String> {
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut words = Vec::new();

    for token in sentence.split(WORD_SEPARATORS) {
        if token.is_empty() {
            continue;
        }
        let word = token.to_lowercase();
        if word.chars().count() == 1 {
            continue;
        }
        if STOP_WORDS.contains(&word.as_str()) {
            continue;
        }
        if !seen.insert(word.clone()) {
            continue;
        }
        words.push(word);
    }

    words
}

/// Sentence length as used by the word index.
pub fn sentence_length(sentence: &str) -> usize {
    tokenize(sentence).len()
}
