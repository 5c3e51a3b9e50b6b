use serde::{Deserialize, Serialize};

use super::{
    Experiment, ExperimentSpec, Pipeline, PipelineFramework, PipelineSpec, Provider, ProviderAndId, ProviderSpec, Run,
    RunConfiguration, RunConfigurationSpec, RunConfigurationStatus, RunSchedule, RunScheduleSpec, RunSpec, RunStatus,
    Status,
};
use crate::apis::{v1 as hub, ObjectMeta};
use crate::conversion::{ConversionContext, Convertible};
use crate::error::Result;
use crate::remainder::{self, Remainder};

/// Provider namespaces lost by referring to providers by bare name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceConversionRemainder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_provider_namespace: Option<String>,
}

impl Remainder for ResourceConversionRemainder {
    const VERSION: &'static str = super::VERSION;

    fn is_empty(&self) -> bool {
        self.provider_namespace.is_none() && self.status_provider_namespace.is_none()
    }
}

/// Provider settings `v1beta1` has no field for
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConversionRemainder {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub frameworks: Vec<hub::Framework>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_namespaces: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_provider_namespace: Option<String>,
}

impl Remainder for ProviderConversionRemainder {
    const VERSION: &'static str = super::VERSION;

    fn is_empty(&self) -> bool {
        self.frameworks.is_empty() && self.allowed_namespaces.is_empty() && self.status_provider_namespace.is_none()
    }
}

impl Status {
    fn to_hub(&self, ctx: &ConversionContext, stored_namespace: Option<String>) -> hub::Status {
        hub::Status {
            provider: hub::ProviderAndId {
                name: ctx.qualify(&self.provider.name, stored_namespace),
                id: self.provider.id.clone(),
            },
            synchronization_state: self.synchronization_state,
            version: self.version.clone(),
            observed_generation: self.observed_generation,
            conditions: self.conditions.clone(),
        }
    }

    /// The spoke status and the namespace to store for its provider
    fn from_hub(status: &hub::Status, ctx: &ConversionContext) -> (Self, Option<String>) {
        let converted = Self {
            provider: ProviderAndId {
                name: status.provider.name.name.clone(),
                id: status.provider.id.clone(),
            },
            synchronization_state: status.synchronization_state,
            version: status.version.clone(),
            observed_generation: status.observed_generation,
            conditions: status.conditions.clone(),
        };
        (converted, ctx.namespace_to_store(&status.provider.name))
    }
}

/// Take the remainder and qualify both provider names
fn unpack(
    metadata: &ObjectMeta,
    provider: &str,
    status: &Status,
    ctx: &ConversionContext,
) -> Result<(ObjectMeta, crate::apis::NamespacedName, hub::Status)> {
    let (metadata, remainder): (_, ResourceConversionRemainder) = remainder::take(metadata)?;
    let provider = ctx.qualify(provider, remainder.provider_namespace);
    let status = status.to_hub(ctx, remainder.status_provider_namespace);
    Ok((metadata, provider, status))
}

/// Reduce both provider names and attach what that loses
fn pack(
    metadata: &ObjectMeta,
    provider: &crate::apis::NamespacedName,
    status: &hub::Status,
    ctx: &ConversionContext,
) -> Result<(ObjectMeta, String, Status)> {
    let (status, status_provider_namespace) = Status::from_hub(status, ctx);
    let remainder = ResourceConversionRemainder {
        provider_namespace: ctx.namespace_to_store(provider),
        status_provider_namespace,
    };
    Ok((remainder::attach(metadata, &remainder)?, provider.name.clone(), status))
}

impl Convertible for Pipeline {
    type Hub = hub::Pipeline;

    fn convert_to(&self, ctx: &ConversionContext) -> Result<hub::Pipeline> {
        let (metadata, provider, status) = unpack(&self.metadata, &self.spec.provider, &self.status, ctx)?;
        Ok(hub::Pipeline {
            metadata,
            spec: hub::PipelineSpec {
                provider,
                image: self.spec.image.clone(),
                env: self.spec.env.clone(),
                framework: hub::PipelineFramework {
                    name: self.spec.framework.type_.clone(),
                    parameters: self.spec.framework.parameters.clone(),
                },
            },
            status,
        })
    }

    fn convert_from(hub: &hub::Pipeline, ctx: &ConversionContext) -> Result<Self> {
        let (metadata, provider, status) = pack(&hub.metadata, &hub.spec.provider, &hub.status, ctx)?;
        Ok(Self {
            metadata,
            spec: PipelineSpec {
                provider,
                image: hub.spec.image.clone(),
                env: hub.spec.env.clone(),
                framework: PipelineFramework {
                    type_: hub.spec.framework.name.clone(),
                    parameters: hub.spec.framework.parameters.clone(),
                },
            },
            status,
        })
    }
}

impl Convertible for Experiment {
    type Hub = hub::Experiment;

    fn convert_to(&self, ctx: &ConversionContext) -> Result<hub::Experiment> {
        let (metadata, provider, status) = unpack(&self.metadata, &self.spec.provider, &self.status, ctx)?;
        Ok(hub::Experiment {
            metadata,
            spec: hub::ExperimentSpec {
                provider,
                description: self.spec.description.clone(),
            },
            status,
        })
    }

    fn convert_from(hub: &hub::Experiment, ctx: &ConversionContext) -> Result<Self> {
        let (metadata, provider, status) = pack(&hub.metadata, &hub.spec.provider, &hub.status, ctx)?;
        Ok(Self {
            metadata,
            spec: ExperimentSpec {
                provider,
                description: hub.spec.description.clone(),
            },
            status,
        })
    }
}

impl RunSpec {
    fn to_hub(&self, provider: crate::apis::NamespacedName) -> hub::RunSpec {
        hub::RunSpec {
            provider,
            pipeline: self.pipeline.clone(),
            experiment_name: self.experiment_name.clone(),
            runtime_parameters: self.runtime_parameters.clone(),
            artifacts: self.artifacts.clone(),
        }
    }

    fn from_hub(spec: &hub::RunSpec, provider: String) -> Self {
        Self {
            provider,
            pipeline: spec.pipeline.clone(),
            experiment_name: spec.experiment_name.clone(),
            runtime_parameters: spec.runtime_parameters.clone(),
            artifacts: spec.artifacts.clone(),
        }
    }
}

impl Convertible for Run {
    type Hub = hub::Run;

    fn convert_to(&self, ctx: &ConversionContext) -> Result<hub::Run> {
        let (metadata, provider, status) = unpack(&self.metadata, &self.spec.provider, &self.status.status, ctx)?;
        Ok(hub::Run {
            metadata,
            spec: self.spec.to_hub(provider),
            status: hub::RunStatus {
                status,
                observed_pipeline_version: self.status.observed_pipeline_version.clone(),
                completion_state: self.status.completion_state,
                marked_completed_at: self.status.marked_completed_at,
            },
        })
    }

    fn convert_from(hub: &hub::Run, ctx: &ConversionContext) -> Result<Self> {
        let (metadata, provider, status) = pack(&hub.metadata, &hub.spec.provider, &hub.status.status, ctx)?;
        Ok(Self {
            metadata,
            spec: RunSpec::from_hub(&hub.spec, provider),
            status: RunStatus {
                status,
                observed_pipeline_version: hub.status.observed_pipeline_version.clone(),
                completion_state: hub.status.completion_state,
                marked_completed_at: hub.status.marked_completed_at,
            },
        })
    }
}

impl Convertible for RunConfiguration {
    type Hub = hub::RunConfiguration;

    fn convert_to(&self, ctx: &ConversionContext) -> Result<hub::RunConfiguration> {
        let (metadata, provider, status) =
            unpack(&self.metadata, &self.spec.run.provider, &self.status.status, ctx)?;
        Ok(hub::RunConfiguration {
            metadata,
            spec: hub::RunConfigurationSpec {
                run: self.spec.run.to_hub(provider),
                triggers: self.spec.triggers.clone(),
            },
            status: hub::RunConfigurationStatus {
                status,
                triggered_pipeline_version: self.status.triggered_pipeline_version.clone(),
                latest_runs: self.status.latest_runs.clone(),
            },
        })
    }

    fn convert_from(hub: &hub::RunConfiguration, ctx: &ConversionContext) -> Result<Self> {
        let (metadata, provider, status) = pack(&hub.metadata, &hub.spec.run.provider, &hub.status.status, ctx)?;
        Ok(Self {
            metadata,
            spec: RunConfigurationSpec {
                run: RunSpec::from_hub(&hub.spec.run, provider),
                triggers: hub.spec.triggers.clone(),
            },
            status: RunConfigurationStatus {
                status,
                triggered_pipeline_version: hub.status.triggered_pipeline_version.clone(),
                latest_runs: hub.status.latest_runs.clone(),
            },
        })
    }
}

impl Convertible for RunSchedule {
    type Hub = hub::RunSchedule;

    fn convert_to(&self, ctx: &ConversionContext) -> Result<hub::RunSchedule> {
        let (metadata, provider, status) = unpack(&self.metadata, &self.spec.provider, &self.status, ctx)?;
        Ok(hub::RunSchedule {
            metadata,
            spec: hub::RunScheduleSpec {
                provider,
                pipeline: self.spec.pipeline.clone(),
                experiment_name: self.spec.experiment_name.clone(),
                runtime_parameters: self.spec.runtime_parameters.clone(),
                artifacts: self.spec.artifacts.clone(),
                schedule: self.spec.schedule.clone(),
            },
            status,
        })
    }

    fn convert_from(hub: &hub::RunSchedule, ctx: &ConversionContext) -> Result<Self> {
        let (metadata, provider, status) = pack(&hub.metadata, &hub.spec.provider, &hub.status, ctx)?;
        Ok(Self {
            metadata,
            spec: RunScheduleSpec {
                provider,
                pipeline: hub.spec.pipeline.clone(),
                experiment_name: hub.spec.experiment_name.clone(),
                runtime_parameters: hub.spec.runtime_parameters.clone(),
                artifacts: hub.spec.artifacts.clone(),
                schedule: hub.spec.schedule.clone(),
            },
            status,
        })
    }
}

impl Convertible for Provider {
    type Hub = hub::Provider;

    fn convert_to(&self, ctx: &ConversionContext) -> Result<hub::Provider> {
        let (metadata, remainder): (_, ProviderConversionRemainder) = remainder::take(&self.metadata)?;
        Ok(hub::Provider {
            metadata,
            spec: hub::ProviderSpec {
                service_image: self.spec.image.clone(),
                execution_mode: self.spec.execution_mode.clone(),
                service_account: self.spec.service_account.clone(),
                pipeline_root_storage: self.spec.pipeline_root_storage.clone(),
                default_beam_args: self.spec.default_beam_args.clone(),
                parameters: self.spec.parameters.clone(),
                frameworks: remainder.frameworks,
                allowed_namespaces: remainder.allowed_namespaces,
            },
            status: self.status.to_hub(ctx, remainder.status_provider_namespace),
        })
    }

    fn convert_from(hub: &hub::Provider, ctx: &ConversionContext) -> Result<Self> {
        let (status, status_provider_namespace) = Status::from_hub(&hub.status, ctx);
        let remainder = ProviderConversionRemainder {
            frameworks: hub.spec.frameworks.clone(),
            allowed_namespaces: hub.spec.allowed_namespaces.clone(),
            status_provider_namespace,
        };
        Ok(Self {
            metadata: remainder::attach(&hub.metadata, &remainder)?,
            spec: ProviderSpec {
                image: hub.spec.service_image.clone(),
                execution_mode: hub.spec.execution_mode.clone(),
                service_account: hub.spec.service_account.clone(),
                pipeline_root_storage: hub.spec.pipeline_root_storage.clone(),
                default_beam_args: hub.spec.default_beam_args.clone(),
                parameters: hub.spec.parameters.clone(),
            },
            status,
        })
    }
}
