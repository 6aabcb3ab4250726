//! Deterministic row id derivation.

use sha2::{Digest, Sha256};

/// Number of hex characters kept from the digest.
const ID_LEN: usize = 32;

/// Derive the stable row id for a URL.
///
/// The id is the first 32 hex characters of `SHA-256(url)`. The same URL
/// always maps to the same id, across runs and processes, which is what lets
/// the upsert preserve `id` and `created_at` on re-crawls.
#[must_use]
pub fn content_id(url: &str) -> String {
    use std::fmt::Write;

    let digest = Sha256::digest(url.as_bytes());
    let mut id = String::with_capacity(ID_LEN);
    for byte in digest.iter().take(ID_LEN / 2) {
        // Writing to a String cannot fail.
        let _ = write!(id, "{byte:02x}");
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_url_same_id() {
        assert_eq!(content_id("http://x/1"), content_id("http://x/1"));
    }

    #[test]
    fn different_urls_different_ids() {
        assert_ne!(content_id("http://x/1"), content_id("http://x/2"));
    }

    #[test]
    fn id_is_32_lowercase_hex_chars() {
        let id = content_id("https://example.com/some/article?p=1");
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn known_digest_prefix() {
        // SHA-256("abc") starts with ba7816bf8f01cfea414140de5dae2223.
        assert_eq!(content_id("abc"), "ba7816bf8f01cfea414140de5dae2223");
    }
}
