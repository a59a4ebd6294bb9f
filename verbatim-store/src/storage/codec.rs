//! Byte layouts of the three tables.
//!
//! ```text
//!   originals     key: UTF-8 original         value: id (4 bytes BE)
//!   translations  key: id (4 bytes BE)        value: bincode Vec<String>
//!   words         key: len (4 bytes BE) word  value: id id id ... (4 bytes BE each)
//! ```
//!
//! Big-endian IDs keep the translations table in ID order, which is what
//! sequence recovery relies on.

use rocksdb::MergeOperands;
use verbatim_core::{EntryId, TranslationSet};

use crate::error::{Result, TmError};

pub const ID_LEN: usize = 4;

pub fn encode_id(id: EntryId) -> [u8; ID_LEN] {
    id.to_be_bytes()
}

pub fn decode_id(table: &'static str, bytes: &[u8]) -> Result<EntryId> {
    let buf: [u8; ID_LEN] = bytes
        .try_into()
        .map_err(|_| TmError::corrupt(table, format!("id of {} bytes", bytes.len())))?;
    Ok(EntryId::from_be_bytes(buf))
}

/// Word-index key for `word` in sentences of `sentence_len` words.
pub fn word_key(word: &str, sentence_len: u32) -> Vec<u8> {
    let mut key = Vec::with_capacity(ID_LEN + word.len());
    key.extend_from_slice(&sentence_len.to_be_bytes());
    key.extend_from_slice(word.as_bytes());
    key
}

/// Decode a concatenated posting list.
pub fn decode_postings(bytes: &[u8]) -> Result<Vec<EntryId>> {
    if bytes.len() % ID_LEN != 0 {
        return Err(TmError::corrupt(
            "words",
            format!("posting list of {} bytes", bytes.len()),
        ));
    }
    Ok(bytes
        .chunks_exact(ID_LEN)
        .map(|c| EntryId::from_be_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Associative merge for the word index: append operands to the existing list.
pub fn concat_merge(
    _key: &[u8],
    existing: Option<&[u8]>,
    operands: &MergeOperands,
) -> Option<Vec<u8>> {
    let mut merged = existing.map(<[u8]>::to_vec).unwrap_or_default();
    for op in operands.iter() {
        merged.extend_from_slice(op);
    }
    Some(merged)
}

pub fn encode_translations(set: &TranslationSet) -> Result<Vec<u8>> {
    bincode::serde::encode_to_vec(set, bincode::config::standard())
        .map_err(|e| TmError::Serialization(e.to_string()))
}

pub fn decode_translations(bytes: &[u8]) -> Result<TranslationSet> {
    let (set, _) = bincode::serde::decode_from_slice(bytes, bincode::config::standard())
        .map_err(|e| TmError::corrupt("translations", e.to_string()))?;
    Ok(set)
}
