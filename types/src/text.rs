//! Display helpers for digests and identifiers.

const SHORT_SHA_LEN: usize = 12;

/// Shorten a content digest to its first 12 hex characters.
///
/// The algorithm prefix (`sha256:`) is dropped.
#[must_use]
pub fn truncate_sha(digest: &str) -> &str {
    let hex = digest.split_once(':').map_or(digest, |(_, hex)| hex);
    hex.char_indices()
        .nth(SHORT_SHA_LEN)
        .map_or(hex, |(idx, _)| &hex[..idx])
}

/// Label text for a digest: full when `long`, shortened otherwise.
#[must_use]
pub fn sha_label(digest: &str, long: bool) -> &str {
    if long { digest } else { truncate_sha(digest) }
}
