//! Deterministic hashing and ID builders for canonical artifacts.
//!
//! - Canonical JSON hashing: UTF-8, **sorted object keys**, array order
//!   preserved. Hex digests are lowercase.
//! - Use `sha256_canonical(..)` for JSON values/structs (goes through
//!   canonical_json); `sha256_hex(..)` for raw bytes.

use serde::Serialize;
use serde_json::{self as sj, Value};
use sha2::{Digest, Sha256};

use crate::canonical_json::to_canonical_json_bytes;
use crate::IoError;

/// SHA-256 over raw bytes, lowercase hex.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// SHA-256 over **canonical JSON bytes** of any serializable value.
pub fn sha256_canonical<T: Serialize>(value: &T) -> Result<String, IoError> {
    let v = sj::to_value(value)?;
    Ok(sha256_canonical_value(&v))
}

/// SHA-256 over a canonical JSON `Value` (already parsed).
pub fn sha256_canonical_value(v: &Value) -> String {
    sha256_hex(&to_canonical_json_bytes(v))
}

/// `RES:<hex>` — ID for a result document derived from canonical bytes.
pub fn res_id_from_canonical<T: Serialize>(value: &T) -> Result<String, IoError> {
    Ok(format!("RES:{}", sha256_canonical(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hex_encoding_is_lowercase() {
        let h = sha256_hex(b"abc");
        assert_eq!(h, "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
    }

    #[test]
    fn canonical_hashing_ignores_field_order() {
        #[derive(serde::Serialize)]
        struct T {
            b: u32,
            a: u32,
        }
        let h1 = sha256_canonical(&T { b: 2, a: 1 }).unwrap();
        let h2 = sha256_canonical_value(&json!({"b": 2, "a": 1}));
        assert_eq!(h1, h2);
    }

    #[test]
    fn res_id_prefix() {
        let id = res_id_from_canonical(&json!({"x": 1})).unwrap();
        assert!(id.starts_with("RES:"));
        assert_eq!(id.len(), 4 + 64);
    }
}
