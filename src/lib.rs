//! Pipeline Resource APIs
//!
//! Versioned resource schemas for a pipeline-orchestration operator, the
//! hub-and-spoke conversions between them and the content-derived version
//! identifiers that tell whether a resource changed.
//!
//! ## Features
//!
//! - **Hub-and-Spoke Conversion**: every version converts through `v1` only
//! - **Lossless Round Trips**: fields a version cannot hold travel in a remainder annotation
//! - **Content Versions**: SHA-256 over a canonical field sequence shared by all versions
//! - **Conversion Webhook**: conversion reviews answered through the same scheme
//!
//! ## Architecture
//!
//! ```text
//! v1alpha5 ─┐
//! v1alpha6 ─┼── v1 (hub)
//! v1beta1 ──┘
//! ```

pub mod apis;
pub mod config;
pub mod conversion;
pub mod error;
pub mod hash;
pub mod image;
pub mod remainder;
pub mod scheme;
pub mod version;
pub mod webhook;

pub use apis::{Kind, NamedValue, NamespacedName, ObjectMeta, PipelineIdentifier, Resource};
pub use config::OperatorConfig;
pub use conversion::{ConversionContext, Convertible};
pub use error::{ConversionError, Result};
pub use hash::ObjectHasher;
pub use scheme::ConversionScheme;
pub use webhook::{ConversionReview, ConversionWebhook};
