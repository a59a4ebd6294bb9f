//! Greedy fuzzy search over a word index.
//!
//! The search never looks at sentence text, only at posting lists keyed by
//! `(word, sentence length)`. The first tier that produces a non-empty
//! intersection wins and the search stops there, even if a different
//! combination at the same tier would have found more entries. Quality only
//! degrades along the tier order, so the first hit is the best this search
//! can report.

use std::convert::Infallible;

use rustc_hash::FxHashMap;

use crate::combinations::Combinations;
use crate::intersect::intersect_sorted;
use crate::score::FuzzyParams;
use crate::tokenizer::tokenize;
use crate::types::EntryId;

/// Read access to posting lists.
///
/// `Ok(None)` means no entry of that length contains the word. Returned
/// lists must be sorted ascending.
pub trait PostingSource {
    type Error;

    fn postings(&self, word: &str, sentence_len: u32) -> Result<Option<Vec<EntryId>>, Self::Error>;
}

/// A successful fuzzy hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyMatch {
    pub omits: u32,
    pub delta: u32,
    pub score: u32,
    /// Matching entries, ascending.
    pub ids: Vec<EntryId>,
}

/// Run the tiered search for the tokenized query `words`.
///
/// Returns `Ok(None)` when no tier within `params` matches. Bounds above
/// [`MAX_FUZZINESS`](crate::MAX_FUZZINESS) are clamped.
pub fn fuzzy_search<S: PostingSource>(
    words: &[String],
    params: &FuzzyParams,
    source: &S,
) -> Result<Option<FuzzyMatch>, S::Error> {
    let params = params.clamped();
    for (omits, delta) in params.tiers() {
        if let Some(ids) = search_tier(words, omits, delta, source)? {
            let score = params.score(omits, delta);
            log::debug!(
                "fuzzy hit at omits={omits} delta={delta}: {} entries, score {score}",
                ids.len()
            );
            return Ok(Some(FuzzyMatch {
                omits,
                delta,
                score,
                ids,
            }));
        }
    }
    Ok(None)
}

/// Look for entries `delta` words longer than the query that contain all
/// but exactly `omits` of its words.
fn search_tier<S: PostingSource>(
    words: &[String],
    omits: u32,
    delta: u32,
    source: &S,
) -> Result<Option<Vec<EntryId>>, S::Error> {
    let n = words.len();
    let omits = omits as usize;
    // Omitting every word would match all entries of the target length.
    if n == 0 || omits >= n {
        return Ok(None);
    }

    let Some(target_len) = u32::try_from(n).ok().and_then(|n| n.checked_add(delta)) else {
        return Ok(None);
    };
    let mut lists = Vec::with_capacity(n);
    for word in words {
        if let Some(list) = source.postings(word, target_len)? {
            lists.push(list);
        }
    }

    // Words without a posting list at this length are already "omitted".
    let missing = n - lists.len();
    if missing > omits || missing >= n {
        return Ok(None);
    }
    let effective_n = lists.len();
    let effective_omits = omits - missing;

    let mut mask = vec![true; effective_n];
    for omitted in Combinations::new(effective_n, effective_omits) {
        mask.fill(true);
        for &i in &omitted {
            mask[i] = false;
        }
        let ids = intersect_sorted(&lists, &mask);
        if !ids.is_empty() {
            return Ok(Some(ids));
        }
    }

    Ok(None)
}

/// In-memory word index with the same keying as the persistent one.
///
/// Useful for tests and for sizing the search in benchmarks.
#[derive(Debug, Default, Clone)]
pub struct MemoryIndex {
    postings: FxHashMap<(String, u32), Vec<EntryId>>,
    next_id: EntryId,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self {
            postings: FxHashMap::default(),
            next_id: 1,
        }
    }

    /// Index `sentence` under the next ID and return that ID.
    pub fn insert(&mut self, sentence: &str) -> EntryId {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        let words = tokenize(sentence);
        let len = words.len() as u32;
        for word in words {
            self.postings.entry((word, len)).or_default().push(id);
        }
        id
    }

    /// Number of distinct `(word, length)` keys.
    pub fn key_count(&self) -> usize {
        self.postings.len()
    }
}

impl PostingSource for MemoryIndex {
    type Error = Infallible;

    fn postings(&self, word: &str, sentence_len: u32) -> Result<Option<Vec<EntryId>>, Infallible> {
        Ok(self.postings.get(&(word.to_owned(), sentence_len)).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn search(index: &MemoryIndex, query: &str, params: FuzzyParams) -> Option<FuzzyMatch> {
        let words = tokenize(query);
        match fuzzy_search(&words, &params, index) {
            Ok(hit) => hit,
            Err(never) => match never {},
        }
    }

    #[test]
    fn test_same_words_same_length() {
        let mut index = MemoryIndex::new();
        let id = index.insert("The quick brown fox");

        let hit = search(&index, "quick brown fox", FuzzyParams::default()).unwrap();
        assert_eq!(hit.ids, vec![id]);
        assert_eq!((hit.omits, hit.delta), (0, 0));
        assert_eq!(hit.score, 88);
    }

    #[test]
    fn test_longer_entry_matches_with_delta() {
        let mut index = MemoryIndex::new();
        let id = index.insert("alpha beta gamma");

        let hit = search(&index, "alpha beta", FuzzyParams::default()).unwrap();
        assert_eq!(hit.ids, vec![id]);
        assert_eq!((hit.omits, hit.delta), (0, 1));
        assert_eq!(hit.score, 77);
    }

    #[test]
    fn test_omitted_word_matches() {
        let mut index = MemoryIndex::new();
        let id = index.insert("open the file now");

        // "close" is unknown, so it counts as omitted.
        let hit = search(&index, "close file now", FuzzyParams::default()).unwrap();
        assert_eq!(hit.ids, vec![id]);
        assert_eq!(hit.omits, 1);
        assert!(hit.score > 0 && hit.score < 100);
    }

    #[test]
    fn test_no_shared_words() {
        let mut index = MemoryIndex::new();
        index.insert("open the file now");
        assert!(search(&index, "completely unrelated text", FuzzyParams::default()).is_none());
    }

    #[test]
    fn test_empty_index_and_empty_query() {
        let index = MemoryIndex::new();
        assert!(search(&index, "anything at all", FuzzyParams::default()).is_none());

        let mut index = MemoryIndex::new();
        index.insert("hello world");
        assert!(search(&index, "", FuzzyParams::default()).is_none());
        assert!(search(&index, "a b c", FuzzyParams::default()).is_none());
    }

    #[test]
    fn test_exact_only_params_disable_fuzzy() {
        let mut index = MemoryIndex::new();
        index.insert("alpha beta gamma");
        assert!(search(&index, "alpha beta", FuzzyParams::exact_only()).is_none());
        // Same words and length is still tier (0, 0).
        assert!(search(&index, "gamma beta alpha", FuzzyParams::exact_only()).is_some());
    }

    #[test]
    fn test_results_in_id_order() {
        let mut index = MemoryIndex::new();
        let a = index.insert("save the document");
        index.insert("print the page");
        let b = index.insert("Save document!");

        let hit = search(&index, "document save", FuzzyParams::default()).unwrap();
        assert_eq!(hit.ids, vec![a, b]);
    }

    #[test]
    fn test_greedy_first_combination_wins() {
        let mut index = MemoryIndex::new();
        // Both entries match "red green blue" with one word omitted, at
        // different omitted positions. Omitting word 0 comes first.
        let first = index.insert("green blue yellow");
        let _second = index.insert("red green purple");

        let hit = search(&index, "red green blue", FuzzyParams::new(1, 0)).unwrap();
        assert_eq!(hit.omits, 1);
        assert_eq!(hit.ids, vec![first]);
    }

    #[test]
    fn test_too_many_missing_words() {
        let mut index = MemoryIndex::new();
        index.insert("alpha beta gamma delta");
        // Two unknown words with max_omits = 1 cannot match at any tier.
        assert!(search(&index, "alpha beta zeta theta", FuzzyParams::new(1, 2)).is_none());
        // Allowing two omits finds it.
        let hit = search(&index, "alpha beta zeta theta", FuzzyParams::new(2, 2)).unwrap();
        assert_eq!(hit.omits, 2);
    }

    #[test]
    fn test_unbounded_delta_is_clamped() {
        let mut index = MemoryIndex::new();
        let id = index.insert("The quick brown fox");
        let params = FuzzyParams {
            max_omits: 0,
            max_delta: u32::MAX,
        };

        let hit = search(&index, "quick brown fox", params).unwrap();
        assert_eq!(hit.ids, vec![id]);
        assert_eq!(hit.score, params.clamped().score(0, 0));
        assert!(search(&index, "quick red fox", params).is_none());
    }

    /// Records every posting request to check the tier order.
    struct Recording<'a> {
        inner: &'a MemoryIndex,
        calls: RefCell<Vec<u32>>,
    }

    impl PostingSource for Recording<'_> {
        type Error = Infallible;

        fn postings(&self, word: &str, len: u32) -> Result<Option<Vec<EntryId>>, Infallible> {
            self.calls.borrow_mut().push(len);
            self.inner.postings(word, len)
        }
    }

    #[test]
    fn test_tiers_walk_delta_inside_omits() {
        let index = MemoryIndex::new();
        let source = Recording {
            inner: &index,
            calls: RefCell::new(Vec::new()),
        };
        let words = tokenize("one two three");
        let hit = fuzzy_search(&words, &FuzzyParams::new(1, 1), &source).unwrap();
        assert!(hit.is_none());

        let lengths: Vec<u32> = source.calls.borrow().chunks(3).map(|c| c[0]).collect();
        assert_eq!(lengths, vec![3, 4, 3, 4]);
    }

    /// A source that fails, to check error propagation.
    struct Failing;

    impl PostingSource for Failing {
        type Error = String;

        fn postings(&self, _word: &str, _len: u32) -> Result<Option<Vec<EntryId>>, String> {
            Err("disk on fire".to_owned())
        }
    }

    #[test]
    fn test_source_error_propagates() {
        let words = tokenize("some words here");
        let err = fuzzy_search(&words, &FuzzyParams::default(), &Failing).unwrap_err();
        assert_eq!(err, "disk on fire");
    }
}
