//! Canonicalización JSON y hashing estable (blake3) para huellas de grafos.

pub mod canonical_json;
pub mod hash;

pub use canonical_json::to_canonical_json;
pub use hash::{hash_str, hash_value};
