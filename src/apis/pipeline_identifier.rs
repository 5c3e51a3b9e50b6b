//! Compact `name[:version]` pipeline references

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A pipeline name with an optional version
///
/// The first `:` of the text form separates name from version, so names
/// never contain `:`. A name built with one is read back split at it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PipelineIdentifier {
    pub name: String,
    pub version: String,
}

impl PipelineIdentifier {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Parse `name` or `name:version`; never fails
    pub fn parse(s: &str) -> Self {
        match s.split_once(':') {
            Some((name, version)) => Self::new(name, version),
            None => Self::new(s, ""),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.version.is_empty()
    }
}

impl fmt::Display for PipelineIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}:{}", self.name, self.version)
        }
    }
}

impl FromStr for PipelineIdentifier {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl Serialize for PipelineIdentifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PipelineIdentifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_and_parse() {
        let with_version = PipelineIdentifier::new("pipeline", "abc123");
        assert_eq!(with_version.to_string(), "pipeline:abc123");
        assert_eq!(PipelineIdentifier::parse("pipeline:abc123"), with_version);

        let without_version = PipelineIdentifier::new("pipeline", "");
        assert_eq!(without_version.to_string(), "pipeline");
        assert_eq!(PipelineIdentifier::parse("pipeline"), without_version);
    }

    #[test]
    fn test_version_may_contain_separator() {
        let id = PipelineIdentifier::new("pipeline", "42-abc:def");
        assert_eq!(PipelineIdentifier::parse(&id.to_string()), id);

        let colon_in_name = PipelineIdentifier::new("a:b", "");
        let read_back = PipelineIdentifier::parse(&colon_in_name.to_string());
        assert_eq!(read_back, PipelineIdentifier::new("a", "b"));
        assert_eq!(PipelineIdentifier::parse(&read_back.to_string()), read_back);
    }

    #[test]
    fn test_json_is_a_plain_string() {
        let id = PipelineIdentifier::new("pipeline", "1");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""pipeline:1""#);
        let parsed: PipelineIdentifier = serde_json::from_str(r#""pipeline""#).unwrap();
        assert_eq!(parsed, PipelineIdentifier::new("pipeline", ""));
    }
}
