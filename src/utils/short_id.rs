//! Short ID generation and validation.
//!
//! IDs are drawn from a 56-symbol alphabet that leaves out characters that are
//! easy to confuse when read or typed (`0 O o 1 I l`). Matching is
//! case-sensitive: `abc` and `ABC` are different IDs.

use crate::error::AppError;
use serde_json::json;

/// Symbols a short ID may contain.
pub const ALPHABET: &[u8] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnpqrstuvwxyz";

/// Default length of generated IDs.
pub const DEFAULT_LENGTH: usize = 7;

/// Default number of insert attempts before giving up on a create.
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Longest ID accepted on lookup.
pub const MAX_LENGTH: usize = 32;

/// Largest multiple of the alphabet size that fits in a byte. Bytes at or above
/// it are discarded so every symbol is equally likely.
const REJECTION_BOUND: u8 = (256 / ALPHABET.len() * ALPHABET.len()) as u8;

/// Produces candidate short IDs.
///
/// Candidates are not guaranteed unique; the store rejects duplicates on insert
/// and the caller asks for another candidate.
pub trait ShortIdGenerator: Send + Sync {
    /// Returns a candidate ID for `original_url`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the randomness source fails.
    fn generate(&self, original_url: &str) -> Result<String, AppError>;
}

/// Generator backed by the operating system CSPRNG.
///
/// The URL does not influence the output, so IDs cannot be derived from a
/// known target and existing IDs cannot be enumerated.
#[derive(Debug, Clone)]
pub struct RandomShortIdGenerator {
    length: usize,
}

impl RandomShortIdGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomShortIdGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_LENGTH)
    }
}

impl ShortIdGenerator for RandomShortIdGenerator {
    fn generate(&self, _original_url: &str) -> Result<String, AppError> {
        let mut id = String::with_capacity(self.length);
        // Twice the length covers the expected rejections (~12.5%) in one draw.
        let mut buffer = vec![0u8; self.length * 2];

        while id.len() < self.length {
            getrandom::fill(&mut buffer).map_err(|e| {
                AppError::internal(
                    "Random number generator failure",
                    json!({ "reason": e.to_string() }),
                )
            })?;

            for &byte in &buffer {
                if byte >= REJECTION_BOUND {
                    continue;
                }
                id.push(ALPHABET[(byte as usize) % ALPHABET.len()] as char);
                if id.len() == self.length {
                    break;
                }
            }
        }

        Ok(id)
    }
}

/// Returns true if `candidate` could have been produced by a generator.
///
/// Lookups use this to answer "not found" for malformed IDs without touching
/// storage.
pub fn is_valid_short_id(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate.len() <= MAX_LENGTH
        && candidate.bytes().all(|b| ALPHABET.contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_alphabet_excludes_ambiguous_characters() {
        assert_eq!(ALPHABET.len(), 56);
        for ambiguous in [b'0', b'O', b'o', b'1', b'I', b'l'] {
            assert!(!ALPHABET.contains(&ambiguous));
        }
    }

    #[test]
    fn test_alphabet_has_no_duplicates() {
        let unique: HashSet<_> = ALPHABET.iter().collect();
        assert_eq!(unique.len(), ALPHABET.len());
    }

    #[test]
    fn test_generate_has_configured_length() {
        for length in [6, 7, 12] {
            let id = RandomShortIdGenerator::new(length)
                .generate("https://example.com")
                .unwrap();
            assert_eq!(id.len(), length);
        }
    }

    #[test]
    fn test_generate_uses_alphabet_only() {
        let generator = RandomShortIdGenerator::default();
        for _ in 0..200 {
            let id = generator.generate("https://example.com").unwrap();
            assert!(is_valid_short_id(&id), "unexpected id {id}");
        }
    }

    #[test]
    fn test_generate_ignores_url() {
        let generator = RandomShortIdGenerator::default();
        let mut ids = HashSet::new();
        for _ in 0..1000 {
            ids.insert(generator.generate("https://same.example").unwrap());
        }
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_valid_short_id_is_case_sensitive_alphabet() {
        assert!(is_valid_short_id("aB3xY9k"));
        assert!(is_valid_short_id("ABCDEFG"));
        assert!(!is_valid_short_id("abc0def"));
        assert!(!is_valid_short_id("Oops"));
        assert!(!is_valid_short_id("with-dash"));
    }

    #[test]
    fn test_valid_short_id_length_bounds() {
        assert!(!is_valid_short_id(""));
        assert!(is_valid_short_id(&"a".repeat(MAX_LENGTH)));
        assert!(!is_valid_short_id(&"a".repeat(MAX_LENGTH + 1)));
    }

    #[test]
    fn test_rejection_bound() {
        assert_eq!(REJECTION_BOUND, 224);
    }
}
