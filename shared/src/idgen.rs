//! Display-id generation for inventory listings
//!
//! Listings carry short human-readable ids (`H4F2A1`, `TC09B3`, ...) built
//! from a category prefix and a random alphanumeric suffix. Generation is
//! pure: the caller supplies the collision predicate and owns persistence.
//! The database keeps a unique index on the column, so the caller must
//! treat generate + insert as one unit and re-run on an insert conflict.

use thiserror::Error;
use uuid::Uuid;

/// Retry budget before giving up on finding a free id
pub const MAX_ATTEMPTS: usize = 10;

/// Length of the alphanumeric suffix after the category prefix
pub const SUFFIX_LEN: usize = 6;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdGenError {
    #[error("exhausted {0} attempts generating a unique id")]
    GenerationExhausted(usize),
}

/// Generate a unique display id of the form `prefix + suffix`.
///
/// `is_taken` reports whether a candidate already exists in the target
/// collection. Fails with [`IdGenError::GenerationExhausted`] once the
/// retry budget is spent.
pub fn generate_id<F>(prefix: &str, is_taken: F) -> Result<String, IdGenError>
where
    F: Fn(&str) -> bool,
{
    for _ in 0..MAX_ATTEMPTS {
        let candidate = format!("{}{}", prefix, random_suffix());
        if !is_taken(&candidate) {
            return Ok(candidate);
        }
    }
    Err(IdGenError::GenerationExhausted(MAX_ATTEMPTS))
}

fn random_suffix() -> String {
    // v4 uuids are random; the first hex chars are as good a token as any
    let hex = Uuid::new_v4().simple().to_string();
    hex[..SUFFIX_LEN].to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_id_keeps_prefix_and_length() {
        let id = generate_id("H", |_| false).unwrap();
        assert!(id.starts_with('H'));
        assert_eq!(id.len(), 1 + SUFFIX_LEN);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn two_char_prefix_is_preserved() {
        let id = generate_id("TC", |_| false).unwrap();
        assert!(id.starts_with("TC"));
        assert_eq!(id.len(), 2 + SUFFIX_LEN);
    }

    #[test]
    fn ids_are_unique_against_growing_collection() {
        let mut existing: HashSet<String> = HashSet::new();
        for _ in 0..500 {
            let id = generate_id("SH", |candidate| existing.contains(candidate)).unwrap();
            assert!(existing.insert(id));
        }
    }

    #[test]
    fn exhaustion_after_bounded_retries() {
        let result = generate_id("V", |_| true);
        assert_eq!(result, Err(IdGenError::GenerationExhausted(MAX_ATTEMPTS)));
    }
}
