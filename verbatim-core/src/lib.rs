//! # verbatim-core — Translation-memory matching algorithms
//!
//! Pure, I/O-free building blocks of the translation memory. The storage
//! crate feeds these with posting lists read from disk; tests and benches
//! feed them from the in-memory [`search::MemoryIndex`].
//!
//! ## Architecture
//!
//! ```text
//!  query ──► tokenize ──► words[n]
//!                            │
//!                            ▼
//!            for omits in 0..=max_omits
//!              for delta in 0..=max_delta      (best tier first)
//!                            │
//!                            ▼
//!        PostingSource::postings(word, n + delta)
//!                            │
//!                            ▼
//!        Combinations(effective_n, effective_omits)
//!                            │
//!                            ▼
//!        intersect_sorted(lists, mask) ──► first non-empty wins
//! ```
//!
//! ## Modules
//!
//! - [`tokenizer`] — sentence → deduplicated, stop-word-filtered words
//! - [`intersect`] — multi-way intersection of sorted ID lists
//! - [`combinations`] — lexicographic k-subset enumeration
//! - [`score`] — fuzziness parameters and tier scoring
//! - [`search`] — the greedy fuzzy search driver
//! - [`types`] — entry IDs, translation sets, lookup results

pub mod combinations;
pub mod intersect;
pub mod score;
pub mod search;
pub mod tokenizer;
pub mod types;

// Re-exports for convenience
pub use combinations::Combinations;
pub use intersect::intersect_sorted;
pub use score::{FuzzyParams, EXACT_SCORE, MAX_FUZZINESS, NO_MATCH_SCORE};
pub use search::{fuzzy_search, FuzzyMatch, MemoryIndex, PostingSource};
pub use tokenizer::tokenize;
pub use types::{EntryId, Suggestions, TranslationSet};
