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

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSpec {
    #[serde(default)]
    pub service_image: String,
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
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub frameworks: Vec<Framework>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_namespaces: Vec<String>,
}

/// A pipeline framework a provider can compile, and the image doing it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Framework {
    pub name: String,
    pub image: String,
}

impl Resource for Provider {
    const KIND: Kind = Kind::Provider;
    const VERSION: &'static str = super::VERSION;

    resource_metadata!();

    fn compute_hash(&self) -> Vec<u8> {
        let frameworks: Vec<(String, String)> = self
            .spec
            .frameworks
            .iter()
            .map(|f| (f.name.clone(), f.image.clone()))
            .collect();
        let mut oh = ObjectHasher::new();
        write_provider_fields(
            &mut oh,
            &ProviderFields {
                service_image: &self.spec.service_image,
                execution_mode: &self.spec.execution_mode,
                service_account: &self.spec.service_account,
                pipeline_root_storage: &self.spec.pipeline_root_storage,
                default_beam_args: &self.spec.default_beam_args,
                parameters: &self.spec.parameters,
                frameworks: &frameworks,
                allowed_namespaces: &self.spec.allowed_namespaces,
            },
        );
        oh.sum()
    }
}
