//! Resource schemas
//!
//! Shared value types live here; each schema version has its own module.
//! `v1` is the hub that every other version converts through.

#[macro_use]
mod macros {
    /// Implements the metadata accessors of [`Resource`](super::Resource) for a `metadata` field
    macro_rules! resource_metadata {
        () => {
            fn metadata(&self) -> &$crate::apis::ObjectMeta {
                &self.metadata
            }

            fn metadata_mut(&mut self) -> &mut $crate::apis::ObjectMeta {
                &mut self.metadata
            }
        };
    }
}

pub mod fields;
pub mod framework;
pub mod named_value;
pub mod pipeline_identifier;

pub mod v1;
pub mod v1alpha5;
pub mod v1alpha6;
pub mod v1beta1;

pub use named_value::NamedValue;
pub use pipeline_identifier::PipelineIdentifier;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ConversionError;

/// API group shared by all resource kinds
pub const GROUP: &str = "pipelines.kubeflow.org";

/// The resource kinds managed by the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Kind {
    Pipeline,
    Experiment,
    Run,
    RunConfiguration,
    RunSchedule,
    Provider,
}

impl Kind {
    pub const ALL: [Kind; 6] = [
        Kind::Pipeline,
        Kind::Experiment,
        Kind::Run,
        Kind::RunConfiguration,
        Kind::RunSchedule,
        Kind::Provider,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Pipeline => "Pipeline",
            Kind::Experiment => "Experiment",
            Kind::Run => "Run",
            Kind::RunConfiguration => "RunConfiguration",
            Kind::RunSchedule => "RunSchedule",
            Kind::Provider => "Provider",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ConversionError::InvalidObject(format!("unknown kind {s:?}")))
    }
}

/// Full `apiVersion` string for a schema version, e.g. `pipelines.kubeflow.org/v1`
pub fn api_version(version: &str) -> String {
    format!("{}/{}", GROUP, version)
}

/// Split an `apiVersion` string into its schema version, checking the group
pub fn parse_api_version(api_version: &str) -> Result<&str, ConversionError> {
    match api_version.split_once('/') {
        Some((group, version)) if group == GROUP && !version.is_empty() => Ok(version),
        _ => Err(ConversionError::UnsupportedVersion(api_version.to_string())),
    }
}

/// Object metadata common to every resource
///
/// Fields the conversions do not read (`uid`, `resourceVersion`,
/// `ownerReferences` and the like) are kept in `extra` and written back as
/// they came.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub generation: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ObjectMeta {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.as_ref()?.get(key).map(String::as_str)
    }
}

/// A reference to a namespaced object
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NamespacedName {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
}

impl NamespacedName {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.namespace.is_empty()
    }
}

impl fmt::Display for NamespacedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}/{}", self.namespace, self.name)
        }
    }
}

/// Observed synchronization state of a resource with its provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SynchronizationState {
    #[default]
    #[serde(rename = "")]
    Unknown,
    Creating,
    Succeeded,
    Updating,
    Deleting,
    Deleted,
    Failed,
}

impl SynchronizationState {
    pub fn is_unknown(&self) -> bool {
        *self == SynchronizationState::Unknown
    }
}

/// Final state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompletionState {
    Succeeded,
    Failed,
}

/// What changes trigger a run configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OnChangeType {
    Pipeline,
    RunSpec,
}

impl OnChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OnChangeType::Pipeline => "pipeline",
            OnChangeType::RunSpec => "runSpec",
        }
    }
}

/// A status condition tracking the generation it was observed at
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub type_: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub observed_generation: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<DateTime<Utc>>,
}

/// A cron schedule with optional bounds
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    #[serde(default)]
    pub cron_expression: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

impl Schedule {
    pub fn cron(expression: impl Into<String>) -> Self {
        Self {
            cron_expression: expression.into(),
            ..Self::default()
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start_time.is_none() && self.end_time.is_none()
    }
}

/// Reference to an output artifact of another run configuration's latest run
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfigurationRef {
    pub name: String,
    pub output_artifact: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueFrom {
    pub run_configuration_ref: RunConfigurationRef,
}

/// A runtime parameter given either literally or by reference
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeParameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_from: Option<ValueFrom>,
}

impl RuntimeParameter {
    pub fn literal(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            value_from: None,
        }
    }
}

/// An artifact exposed by a run
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutputArtifact {
    pub name: String,
    pub path: String,
}

/// An artifact produced by a completed run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    pub location: String,
}

/// The latest run triggered by a run configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReference {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub provider_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<Artifact>,
}

impl RunReference {
    pub fn is_empty(&self) -> bool {
        self.provider_id.is_empty() && self.artifacts.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestRuns {
    #[serde(default, skip_serializing_if = "RunReference::is_empty")]
    pub succeeded: RunReference,
}

impl LatestRuns {
    pub fn is_empty(&self) -> bool {
        self.succeeded.is_empty()
    }
}

/// Capabilities shared by every resource at every version
pub trait Resource {
    /// Kind of the resource
    const KIND: Kind;
    /// Schema version the type belongs to, e.g. `v1alpha6`
    const VERSION: &'static str;

    fn metadata(&self) -> &ObjectMeta;

    fn metadata_mut(&mut self) -> &mut ObjectMeta;

    /// Digest of the resource's semantic fields
    fn compute_hash(&self) -> Vec<u8>;

    /// Short identifier derived from [`Resource::compute_hash`]
    fn compute_version(&self) -> String {
        crate::version::hash_version(&self.compute_hash())
    }
}

pub(crate) fn is_zero(value: &i64) -> bool {
    *value == 0
}
