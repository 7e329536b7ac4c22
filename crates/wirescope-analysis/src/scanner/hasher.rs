//! Content hashing (xxh3-64).

use xxhash_rust::xxh3::xxh3_64;

pub fn hash_content(content: &[u8]) -> u64 {
    xxh3_64(content)
}

/// Hex form used in logs and reports.
pub fn hash_hex(content: &[u8]) -> String {
    format!("{:016x}", hash_content(content))
}
