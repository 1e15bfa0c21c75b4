//! BLAKE3 helpers for chunk identifiers and cache keys.

use blake3::Hasher;

/// Full 32-byte BLAKE3 digest of `text`; used as the embedding cache key.
#[inline]
pub fn hash_text(text: &str) -> [u8; 32] {
    *blake3::hash(text.as_bytes()).as_bytes()
}

/// Computes a 64-bit hash of the input data using BLAKE3, truncated from 256 bits.
///
/// The truncated value is only used for identifiers scoped to a single in-process
/// index. With 64 bits the birthday bound sits around four billion items, far beyond
/// the chunk counts one process holds.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(bytes)
}

/// Derives the stable chunk identifier for `(document_id, chunk_index)`.
///
/// The separator byte keeps `("ab", 1)` and `("a", b1)`-style inputs apart.
#[inline]
pub fn chunk_id(document_id: &str, chunk_index: usize) -> String {
    let mut hasher = Hasher::new();
    hasher.update(document_id.as_bytes());
    hasher.update(b"|");
    hasher.update(&(chunk_index as u64).to_le_bytes());

    let hash = hasher.finalize();
    format!("{}:{}", document_id, &hash.to_hex()[..16])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_hash_text_determinism() {
        let text = "The sky on planet Zorg is green.";
        assert_eq!(hash_text(text), hash_text(text));
    }

    #[test]
    fn test_hash_text_is_case_sensitive() {
        assert_ne!(hash_text("Zorg"), hash_text("zorg"));
    }

    #[test]
    fn test_hash_to_u64_matches_digest_prefix() {
        let data = b"recital";
        let full = blake3::hash(data);
        let expected = u64::from_le_bytes(full.as_bytes()[0..8].try_into().unwrap());
        assert_eq!(hash_to_u64(data), expected);
    }

    #[test]
    fn test_chunk_id_is_prefixed_with_document() {
        let id = chunk_id("doc-1", 0);
        assert!(id.starts_with("doc-1:"));
        assert_eq!(id.len(), "doc-1:".len() + 16);
    }

    #[test]
    fn test_chunk_id_uniqueness() {
        let ids: HashSet<String> = (0..500).map(|i| chunk_id("doc", i)).collect();
        assert_eq!(ids.len(), 500);
        assert_ne!(chunk_id("doc-a", 1), chunk_id("doc-b", 1));
    }
}
