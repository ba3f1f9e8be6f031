//! Deterministic document identity.
//!
//! A book's engine identifier is derived from its title, so re-ingesting the
//! same book overwrites the existing document instead of inserting a
//! duplicate. The flip side is documented in the project notes: two distinct
//! books sharing a title collide and overwrite each other.

use sha2::{Digest, Sha256};

/// Number of hex characters kept from the title digest.
const ID_LEN: usize = 12;

/// Derive the stable engine identifier for a title.
///
/// Pure and deterministic: the same title always yields the same id. The
/// result is lowercase hex, safe as an engine document key. Callers must
/// reject empty titles before calling this.
pub fn book_id(title: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)[..ID_LEN].to_string()
}
