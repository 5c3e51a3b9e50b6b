//! The `tfx` pipeline framework and its legacy field pair
//!
//! Versions before `v1beta1` describe every pipeline with two dedicated
//! fields, `tfxComponents` and `beamArgs`. Newer versions carry a named
//! framework with open-ended JSON parameters; the legacy pair maps onto the
//! `components` and `beamArgs` parameters of the `tfx` framework.

use serde_json::Value;
use std::collections::BTreeMap;

use super::v1::PipelineFramework;
use super::NamedValue;
use crate::error::{ConversionError, Result};

/// Framework synthesized for versions without a framework field
pub const DEFAULT_FRAMEWORK: &str = "tfx";

pub const COMPONENTS_PARAMETER: &str = "components";
pub const BEAM_ARGS_PARAMETER: &str = "beamArgs";

/// The legacy view of a `tfx` framework's parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TfxParameters {
    pub components: String,
    pub beam_args: Vec<NamedValue>,
    /// Parameters other than `components` and `beamArgs`
    pub others: BTreeMap<String, Value>,
}

impl TfxParameters {
    /// Read the legacy fields out of a framework's parameters
    ///
    /// A missing `components` parameter reads as empty; parameters of the
    /// wrong JSON shape are errors.
    pub fn extract(parameters: &BTreeMap<String, Value>) -> Result<Self> {
        let mut others = parameters.clone();

        let components = match others.remove(COMPONENTS_PARAMETER) {
            None => String::new(),
            Some(Value::String(components)) => components,
            Some(other) => {
                return Err(ConversionError::InvalidParameter {
                    field: format!("spec.framework.parameters.{}", COMPONENTS_PARAMETER),
                    reason: format!("expected a string, got {}", other),
                })
            }
        };

        let beam_args = match others.remove(BEAM_ARGS_PARAMETER) {
            None => Vec::new(),
            Some(value) => serde_json::from_value(value).map_err(|err| ConversionError::InvalidParameter {
                field: format!("spec.framework.parameters.{}", BEAM_ARGS_PARAMETER),
                reason: err.to_string(),
            })?,
        };

        Ok(Self {
            components,
            beam_args,
            others,
        })
    }

    /// Build framework parameters from the legacy fields
    pub fn into_parameters(self) -> Result<BTreeMap<String, Value>> {
        let mut parameters = self.others;
        parameters.insert(COMPONENTS_PARAMETER.to_string(), Value::String(self.components));
        if !self.beam_args.is_empty() {
            parameters.insert(BEAM_ARGS_PARAMETER.to_string(), serde_json::to_value(self.beam_args)?);
        }
        Ok(parameters)
    }
}

/// A framework reduced to the legacy field pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyFramework {
    pub components: String,
    pub beam_args: Vec<NamedValue>,
    /// The full framework, when the pair alone would not restore it
    pub stored: Option<PipelineFramework>,
}

impl LegacyFramework {
    /// Reduce a hub framework to the legacy pair
    ///
    /// Frameworks other than `tfx` reduce to an empty pair and are stored
    /// whole; a malformed `tfx` framework is an error.
    pub fn reduce(framework: &PipelineFramework) -> Result<Self> {
        if framework.name != DEFAULT_FRAMEWORK {
            return Ok(Self {
                components: String::new(),
                beam_args: Vec::new(),
                stored: Some(framework.clone()),
            });
        }

        let tfx = TfxParameters::extract(&framework.parameters)?;
        let synthesized = synthesize(&tfx.components, &tfx.beam_args)?;
        let lossless = synthesized == *framework && !tfx.components.is_empty();
        Ok(Self {
            components: tfx.components,
            beam_args: tfx.beam_args,
            stored: (!lossless).then(|| framework.clone()),
        })
    }

    /// Restore the hub framework, preferring the stored one while it still
    /// reduces to the current pair
    pub fn restore(self) -> Result<PipelineFramework> {
        if let Some(stored) = self.stored {
            let still_matches = Self::reduce(&stored)
                .map(|reduced| reduced.components == self.components && reduced.beam_args == self.beam_args)
                .unwrap_or(false);
            if still_matches {
                return Ok(stored);
            }
        }
        if self.components.is_empty() {
            return Err(ConversionError::MissingField("spec.tfxComponents".to_string()));
        }
        synthesize(&self.components, &self.beam_args)
    }
}

/// The `tfx` framework described by the legacy pair
pub fn synthesize(components: &str, beam_args: &[NamedValue]) -> Result<PipelineFramework> {
    let parameters = TfxParameters {
        components: components.to_string(),
        beam_args: beam_args.to_vec(),
        others: BTreeMap::new(),
    }
    .into_parameters()?;
    Ok(PipelineFramework {
        name: DEFAULT_FRAMEWORK.to_string(),
        parameters,
    })
}
