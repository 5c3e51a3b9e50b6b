//! Resource version identifiers
//!
//! A version is the first bytes of a resource's canonical hash rendered as
//! lowercase hex, optionally prefixed with the tag of the image it deploys.

use crate::image::ImageReference;

/// Number of digest bytes kept in a version identifier
pub const VERSION_HASH_BYTES: usize = 3;

/// Render the version core from a digest
pub fn hash_version(hash: &[u8]) -> String {
    hash.iter()
        .take(VERSION_HASH_BYTES)
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Render a version for a resource that deploys `image`
///
/// `<tag>-<hex>` for tagged images, `latest-<hex>` for bare names and the
/// hex alone when the image does not parse or is pinned by digest only.
pub fn image_version(image: &str, hash: &[u8]) -> String {
    let version = hash_version(hash);
    match ImageReference::parse(image).as_ref().and_then(ImageReference::effective_tag) {
        Some(tag) => format!("{}-{}", tag, version),
        None => version,
    }
}
