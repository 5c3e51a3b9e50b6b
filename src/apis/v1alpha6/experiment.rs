use serde::{Deserialize, Serialize};

use super::Status;
use crate::apis::fields::write_experiment_fields;
use crate::apis::{Kind, ObjectMeta, Resource};
use crate::hash::ObjectHasher;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experiment {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: ExperimentSpec,
    #[serde(default)]
    pub status: Status,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentSpec {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl Resource for Experiment {
    const KIND: Kind = Kind::Experiment;
    const VERSION: &'static str = super::VERSION;

    resource_metadata!();

    fn compute_hash(&self) -> Vec<u8> {
        let mut oh = ObjectHasher::new();
        write_experiment_fields(&mut oh, &self.spec.description);
        oh.sum()
    }
}
