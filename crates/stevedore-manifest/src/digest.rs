//! SHA-256 digests of rendered manifests.

use sha2::{Digest, Sha256};
use stevedore_common::types::Sha256Hash;

/// Computes the SHA-256 digest of `text`.
#[must_use]
pub fn digest_text(text: &str) -> Sha256Hash {
    let mut bytes = [0_u8; 32];
    bytes.copy_from_slice(&Sha256::digest(text.as_bytes()));
    let hash = Sha256Hash::from_bytes(bytes);
    tracing::debug!(digest = %hash, "computed manifest digest");
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_of_empty_text_is_well_known() {
        assert_eq!(
            digest_text("").as_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn digest_changes_with_content() {
        assert_ne!(digest_text("FROM a\n"), digest_text("FROM b\n"));
    }
}
