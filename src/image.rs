//! Container image reference parsing
//!
//! Follows the distribution reference grammar closely enough to decide
//! whether an image carries a tag. References that do not parse are
//! reported as `None` rather than as errors.

use regex::Regex;
use std::sync::LazyLock;

const NAME_TOTAL_LENGTH_MAX: usize = 255;

static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    let domain_component = r"(?:[a-zA-Z0-9]|[a-zA-Z0-9][a-zA-Z0-9-]*[a-zA-Z0-9])";
    let domain = format!(r"{domain_component}(?:\.{domain_component})*(?::[0-9]+)?");
    let path_component = r"[a-z0-9]+(?:(?:[._]|__|[-]*)[a-z0-9]+)*";
    let name = format!(r"(?:{domain}/)?{path_component}(?:/{path_component})*");
    let tag = r"[A-Za-z0-9_][A-Za-z0-9_.-]{0,127}";
    let digest = r"[A-Za-z][A-Za-z0-9]*(?:[-_+.][A-Za-z][A-Za-z0-9]*)*:[0-9a-fA-F]{32,}";
    Regex::new(&format!(r"^({name})(?::({tag}))?(?:@({digest}))?$"))
        .expect("image reference pattern is valid")
});

/// Default tag assumed for references without tag or digest
pub const DEFAULT_TAG: &str = "latest";

/// A parsed image reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    pub name: String,
    pub tag: Option<String>,
    pub digest: Option<String>,
}

impl ImageReference {
    /// Parse a reference such as `registry:5000/team/image:1.2@sha256:...`
    pub fn parse(reference: &str) -> Option<Self> {
        let captures = REFERENCE.captures(reference)?;
        let name = captures.get(1)?.as_str();
        if name.len() > NAME_TOTAL_LENGTH_MAX {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            tag: captures.get(2).map(|m| m.as_str().to_string()),
            digest: captures.get(3).map(|m| m.as_str().to_string()),
        })
    }

    /// The effective tag: the explicit one, `latest` for a bare name, or
    /// `None` for a digest-only reference.
    pub fn effective_tag(&self) -> Option<&str> {
        match (&self.tag, &self.digest) {
            (Some(tag), _) => Some(tag),
            (None, None) => Some(DEFAULT_TAG),
            (None, Some(_)) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_reference() {
        let image = ImageReference::parse("image:42").unwrap();
        assert_eq!(image.name, "image");
        assert_eq!(image.effective_tag(), Some("42"));
    }

    #[test]
    fn test_registry_with_port() {
        let image = ImageReference::parse("registry.example.com:5000/team/image:v1.2").unwrap();
        assert_eq!(image.name, "registry.example.com:5000/team/image");
        assert_eq!(image.tag.as_deref(), Some("v1.2"));
    }

    #[test]
    fn test_bare_name_defaults_to_latest() {
        let image = ImageReference::parse("image").unwrap();
        assert_eq!(image.tag, None);
        assert_eq!(image.effective_tag(), Some("latest"));
    }

    #[test]
    fn test_digest_only_has_no_tag() {
        let digest = format!("image@sha256:{}", "a".repeat(64));
        let image = ImageReference::parse(&digest).unwrap();
        assert_eq!(image.effective_tag(), None);
    }

    #[test]
    fn test_malformed_references() {
        assert!(ImageReference::parse(":").is_none());
        assert!(ImageReference::parse("").is_none());
        assert!(ImageReference::parse("Image:1").is_none());
        assert!(ImageReference::parse("image:").is_none());
        assert!(ImageReference::parse("image:é1").is_none());
        assert!(ImageReference::parse("image:1.ü").is_none());
        assert!(ImageReference::parse(&"a".repeat(300)).is_none());
    }
}
