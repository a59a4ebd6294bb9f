//! Persistent tables of one language directory.
//!
//! ```text
//! ┌───────────────────┐   store()   ┌────────────────────────────────────┐
//! │ TranslationMemory │ ──────────► │ TableStore (RocksDB)               │
//! └─────────┬─────────┘  one batch  │ CF "originals"    text → id        │
//!           │                       │ CF "translations" id → [text]      │
//!           │ lookup()              │ CF "words"        (len,word) → ids │
//!           ▼                       └────────────────────────────────────┘
//! ┌───────────────────┐  postings(word, len)          ▲
//! │ fuzzy_search      │ ──────────────────────────────┘
//! └───────────────────┘
//! ```

pub mod codec;
pub mod rocks;

pub use rocks::{StoreBatch, StoreConfig, TableStore, CF_ORIGINALS, CF_TRANSLATIONS, CF_WORDS};
