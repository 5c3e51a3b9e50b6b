use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::Status;
use crate::apis::fields::{write_provider_fields, ProviderFields};
use crate::apis::{Kind, NamedValue, ObjectMeta, Resource};
use crate::hash::ObjectHasher;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: ProviderSpec,
    #[serde(default)]
    pub status: Status,
}

/// Provider settings; `image` is the hub's `serviceImage`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSpec {
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub execution_mode: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub service_account: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pipeline_root_storage: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub default_beam_args: Vec<NamedValue>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, Value>,
}

impl Resource for Provider {
    const KIND: Kind = Kind::Provider;
    const VERSION: &'static str = super::VERSION;

    resource_metadata!();

    fn compute_hash(&self) -> Vec<u8> {
        let mut oh = ObjectHasher::new();
        write_provider_fields(
            &mut oh,
            &ProviderFields {
                service_image: &self.spec.image,
                execution_mode: &self.spec.execution_mode,
                service_account: &self.spec.service_account,
                pipeline_root_storage: &self.spec.pipeline_root_storage,
                default_beam_args: &self.spec.default_beam_args,
                parameters: &self.spec.parameters,
                frameworks: &[],
                allowed_namespaces: &[],
            },
        );
        oh.sum()
    }
}
