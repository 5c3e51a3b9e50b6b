use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Status;
use crate::apis::fields::write_run_fields;
use crate::apis::{
    CompletionState, Kind, NamespacedName, ObjectMeta, OutputArtifact, PipelineIdentifier, Resource,
    RuntimeParameter,
};
use crate::hash::ObjectHasher;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: RunSpec,
    #[serde(default)]
    pub status: RunStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSpec {
    #[serde(default, skip_serializing_if = "NamespacedName::is_empty")]
    pub provider: NamespacedName,
    #[serde(default)]
    pub pipeline: PipelineIdentifier,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub experiment_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub runtime_parameters: Vec<RuntimeParameter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<OutputArtifact>,
}

impl RunSpec {
    pub(crate) fn write_fields(&self, oh: &mut ObjectHasher) {
        write_run_fields(
            oh,
            &self.pipeline,
            &self.experiment_name,
            &self.runtime_parameters,
            &self.artifacts,
        );
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStatus {
    #[serde(flatten)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub observed_pipeline_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_state: Option<CompletionState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marked_completed_at: Option<DateTime<Utc>>,
}

impl Resource for Run {
    const KIND: Kind = Kind::Run;
    const VERSION: &'static str = super::VERSION;

    resource_metadata!();

    fn compute_hash(&self) -> Vec<u8> {
        let mut oh = ObjectHasher::new();
        self.spec.write_fields(&mut oh);
        oh.sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_flattens_on_the_wire() {
        let run = Run {
            status: RunStatus {
                status: Status {
                    version: "abc123".into(),
                    ..Status::default()
                },
                observed_pipeline_version: "1".into(),
                completion_state: Some(CompletionState::Succeeded),
                marked_completed_at: None,
            },
            ..Run::default()
        };
        let value = serde_json::to_value(&run).unwrap();
        assert_eq!(value["status"]["version"], "abc123");
        assert_eq!(value["status"]["completionState"], "Succeeded");

        let parsed: Run = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, run);
    }
}
