//! Conversion scheme
//!
//! Knows which versions exist, which kinds each serves and how they connect.
//! Objects arrive as JSON tagged with `apiVersion` and `kind`; the scheme
//! decodes them into the matching typed resource, converts through the hub
//! and encodes the result at the requested version.

use petgraph::algo::astar;
use petgraph::graph::{NodeIndex, UnGraph};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::apis::v1::HubObject;
use crate::apis::{api_version, parse_api_version, v1, v1alpha5, v1alpha6, v1beta1, Kind, Resource};
use crate::conversion::{ConversionContext, Convertible};
use crate::error::{ConversionError, Result};

/// Served versions, oldest first
pub const VERSIONS: [&str; 4] = [v1alpha5::VERSION, v1alpha6::VERSION, v1beta1::VERSION, v1::VERSION];

/// The version every other version converts through
pub const HUB: &str = v1::VERSION;

const ALL_KINDS: &[Kind] = &Kind::ALL;

const LEGACY_KINDS: &[Kind] = &[
    Kind::Pipeline,
    Kind::Experiment,
    Kind::Run,
    Kind::RunConfiguration,
    Kind::RunSchedule,
];

/// Kinds served at `version`
pub fn served_kinds(version: &str) -> &'static [Kind] {
    match version {
        v1alpha5::VERSION | v1alpha6::VERSION => LEGACY_KINDS,
        v1beta1::VERSION | v1::VERSION => ALL_KINDS,
        _ => &[],
    }
}

fn unsupported_kind(kind: Kind, version: &str) -> ConversionError {
    ConversionError::UnsupportedKind {
        kind: kind.to_string(),
        version: version.to_string(),
    }
}

fn decode<T: DeserializeOwned>(object: Value) -> Result<T> {
    serde_json::from_value(object).map_err(|e| ConversionError::InvalidObject(e.to_string()))
}

/// Decode an object as `T`, checking its `apiVersion` and `kind`
pub fn decode_as<T: Resource + DeserializeOwned>(object: Value) -> Result<T> {
    let (version, kind) = type_meta(&object)?;
    if version != T::VERSION || kind != T::KIND {
        return Err(ConversionError::KindMismatch {
            expected: format!("{} {}", api_version(T::VERSION), T::KIND),
            actual: format!("{} {}", api_version(&version), kind),
        });
    }
    decode(object)
}

/// Serialize a resource with its `apiVersion` and `kind`
pub fn encode<T: Resource + Serialize>(resource: &T) -> Result<Value> {
    let mut value = serde_json::to_value(resource)?;
    if let Value::Object(map) = &mut value {
        map.insert("apiVersion".to_string(), Value::String(api_version(T::VERSION)));
        map.insert("kind".to_string(), Value::String(T::KIND.to_string()));
    }
    Ok(value)
}

/// Read `apiVersion` and `kind` off an object
pub fn type_meta(object: &Value) -> Result<(String, Kind)> {
    let field = |name: &str| {
        object
            .get(name)
            .and_then(Value::as_str)
            .ok_or_else(|| ConversionError::InvalidObject(format!("missing {name}")))
    };
    let version = parse_api_version(field("apiVersion")?)?.to_string();
    let kind = field("kind")?.parse()?;
    Ok((version, kind))
}

/// Decode a spoke object of each listed kind and convert it to the hub
macro_rules! to_hub {
    ($version:ident, $kind:expr, $object:expr, $ctx:expr, [$($k:ident),+]) => {
        match $kind {
            $(Kind::$k => HubObject::$k(decode_as::<$version::$k>($object)?.convert_to($ctx)?),)+
            #[allow(unreachable_patterns)]
            other => return Err(unsupported_kind(other, $version::VERSION)),
        }
    };
}

/// Convert a hub object of each listed kind to a spoke and encode it
macro_rules! from_hub {
    ($version:ident, $hub:expr, $ctx:expr, [$($k:ident),+]) => {
        match $hub {
            $(HubObject::$k(hub) => encode(&$version::$k::convert_from(hub, $ctx)?)?,)+
            #[allow(unreachable_patterns)]
            other => return Err(unsupported_kind(other.kind(), $version::VERSION)),
        }
    };
}

/// Decode an object of each listed kind and compute its version identifier
macro_rules! version_of {
    ($version:ident, $kind:expr, $object:expr, [$($k:ident),+]) => {
        match $kind {
            $(Kind::$k => decode_as::<$version::$k>($object)?.compute_version(),)+
            #[allow(unreachable_patterns)]
            other => return Err(unsupported_kind(other, $version::VERSION)),
        }
    };
}

/// Version graph plus the context conversions run with
#[derive(Debug, Clone)]
pub struct ConversionScheme {
    graph: UnGraph<&'static str, ()>,
    nodes: BTreeMap<&'static str, NodeIndex>,
    ctx: ConversionContext,
}

impl ConversionScheme {
    /// The served versions, every spoke connected to the hub
    pub fn new(ctx: ConversionContext) -> Result<Self> {
        let edges: Vec<(&'static str, &'static str)> = VERSIONS
            .iter()
            .filter(|v| **v != HUB)
            .map(|spoke| (*spoke, HUB))
            .collect();
        Self::from_edges(&edges, ctx)
    }

    /// Build a scheme from explicit conversion edges, checking its shape
    pub fn from_edges(edges: &[(&'static str, &'static str)], ctx: ConversionContext) -> Result<Self> {
        let mut graph = UnGraph::new_undirected();
        let mut nodes = BTreeMap::new();
        for version in VERSIONS {
            nodes.insert(version, graph.add_node(version));
        }
        for &(from, to) in edges {
            let index = |version: &str| {
                nodes
                    .get(version)
                    .copied()
                    .ok_or_else(|| ConversionError::InvalidScheme(format!("unknown version {version}")))
            };
            graph.add_edge(index(from)?, index(to)?, ());
        }

        let scheme = Self { graph, nodes, ctx };
        scheme.validate()?;
        Ok(scheme)
    }

    /// Every spoke must have exactly one edge, leading to the hub
    fn validate(&self) -> Result<()> {
        let hub = self.nodes[HUB];
        for (version, index) in &self.nodes {
            if *index == hub {
                continue;
            }
            let neighbors: Vec<NodeIndex> = self.graph.neighbors(*index).collect();
            if neighbors != [hub] {
                return Err(ConversionError::InvalidScheme(format!(
                    "{version} must convert to and from {HUB} only"
                )));
            }
        }
        Ok(())
    }

    fn node(&self, version: &str) -> Result<NodeIndex> {
        self.nodes
            .get(version)
            .copied()
            .ok_or_else(|| ConversionError::UnsupportedVersion(api_version(version)))
    }

    /// Versions visited converting from `from` to `to`, both included
    pub fn path(&self, from: &str, to: &str) -> Result<Vec<&'static str>> {
        let (start, goal) = (self.node(from)?, self.node(to)?);
        let (_, nodes) = astar(&self.graph, start, |n| n == goal, |_| 1, |_| 0)
            .ok_or_else(|| ConversionError::InvalidScheme(format!("no conversion path from {from} to {to}")))?;
        Ok(nodes.into_iter().map(|n| self.graph[n]).collect())
    }

    fn check_served(&self, version: &str, kind: Kind) -> Result<()> {
        self.node(version)?;
        if served_kinds(version).contains(&kind) {
            Ok(())
        } else {
            Err(unsupported_kind(kind, version))
        }
    }

    /// Decode any served object and convert it to the hub
    pub fn to_hub(&self, object: Value) -> Result<HubObject> {
        let (version, kind) = type_meta(&object)?;
        self.check_served(&version, kind)?;
        let ctx = &self.ctx;
        Ok(match version.as_str() {
            v1::VERSION => match kind {
                Kind::Pipeline => HubObject::Pipeline(decode_as(object)?),
                Kind::Experiment => HubObject::Experiment(decode_as(object)?),
                Kind::Run => HubObject::Run(decode_as(object)?),
                Kind::RunConfiguration => HubObject::RunConfiguration(decode_as(object)?),
                Kind::RunSchedule => HubObject::RunSchedule(decode_as(object)?),
                Kind::Provider => HubObject::Provider(decode_as(object)?),
            },
            v1beta1::VERSION => to_hub!(
                v1beta1,
                kind,
                object,
                ctx,
                [Pipeline, Experiment, Run, RunConfiguration, RunSchedule, Provider]
            ),
            v1alpha6::VERSION => to_hub!(
                v1alpha6,
                kind,
                object,
                ctx,
                [Pipeline, Experiment, Run, RunConfiguration, RunSchedule]
            ),
            v1alpha5::VERSION => to_hub!(
                v1alpha5,
                kind,
                object,
                ctx,
                [Pipeline, Experiment, Run, RunConfiguration, RunSchedule]
            ),
            other => return Err(ConversionError::UnsupportedVersion(api_version(other))),
        })
    }

    /// Convert a hub object to `version` and encode it
    pub fn from_hub(&self, hub: &HubObject, version: &str) -> Result<Value> {
        self.check_served(version, hub.kind())?;
        let ctx = &self.ctx;
        Ok(match version {
            v1::VERSION => match hub {
                HubObject::Pipeline(r) => encode(r)?,
                HubObject::Experiment(r) => encode(r)?,
                HubObject::Run(r) => encode(r)?,
                HubObject::RunConfiguration(r) => encode(r)?,
                HubObject::RunSchedule(r) => encode(r)?,
                HubObject::Provider(r) => encode(r)?,
            },
            v1beta1::VERSION => from_hub!(
                v1beta1,
                hub,
                ctx,
                [Pipeline, Experiment, Run, RunConfiguration, RunSchedule, Provider]
            ),
            v1alpha6::VERSION => from_hub!(
                v1alpha6,
                hub,
                ctx,
                [Pipeline, Experiment, Run, RunConfiguration, RunSchedule]
            ),
            v1alpha5::VERSION => from_hub!(
                v1alpha5,
                hub,
                ctx,
                [Pipeline, Experiment, Run, RunConfiguration, RunSchedule]
            ),
            other => return Err(ConversionError::UnsupportedVersion(api_version(other))),
        })
    }

    /// Convert an object to `desired_api_version`
    ///
    /// Follows the scheme's path from the object's version to the target;
    /// each hop decodes at its own version and encodes at the next. Objects
    /// already at the desired version are returned unchanged.
    pub fn convert(&self, object: Value, desired_api_version: &str) -> Result<Value> {
        let target = parse_api_version(desired_api_version)?;
        let (source, kind) = type_meta(&object)?;
        self.check_served(&source, kind)?;
        self.check_served(target, kind)?;
        self.path(&source, target)?
            .windows(2)
            .try_fold(object, |object, hop| self.from_hub(&self.to_hub(object)?, hop[1]))
    }

    /// Version identifier of any served object, computed at its own version
    pub fn compute_version(&self, object: Value) -> Result<String> {
        let (version, kind) = type_meta(&object)?;
        self.check_served(&version, kind)?;
        Ok(match version.as_str() {
            v1::VERSION => version_of!(v1, kind, object, [Pipeline, Experiment, Run, RunConfiguration, RunSchedule, Provider]),
            v1beta1::VERSION => version_of!(
                v1beta1,
                kind,
                object,
                [Pipeline, Experiment, Run, RunConfiguration, RunSchedule, Provider]
            ),
            v1alpha6::VERSION => version_of!(v1alpha6, kind, object, [Pipeline, Experiment, Run, RunConfiguration, RunSchedule]),
            v1alpha5::VERSION => version_of!(v1alpha5, kind, object, [Pipeline, Experiment, Run, RunConfiguration, RunSchedule]),
            other => return Err(ConversionError::UnsupportedVersion(api_version(other))),
        })
    }
}
