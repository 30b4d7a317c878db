use sha2::{Digest, Sha256};

/// Content fingerprint of a serialized document, in `ETag` form: the
/// lower-case hex SHA-256 of the bytes, wrapped in double quotes.
pub fn fingerprint(bytes: &[u8]) -> String {
    let hash = Sha256::digest(bytes);
    format!("\"{:x}\"", hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_quoted_sha256() {
        assert_eq!(
            fingerprint(b""),
            "\"e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855\""
        );
    }

    #[test]
    fn fingerprint_tracks_content() {
        assert_eq!(fingerprint(b"{\"f\":{}}"), fingerprint(b"{\"f\":{}}"));
        assert_ne!(fingerprint(b"{\"f\":{}}"), fingerprint(b"{\"f\": {}}"));
    }
}
