//! Conversion webhook
//!
//! Answers conversion reviews: every object of a request is converted to the
//! desired version, and the first failure fails the whole review. A review
//! carries objects of a single kind, the kind of its first object.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::apis::{api_version, Kind};
use crate::error::{ConversionError, Result};
use crate::scheme::{type_meta, ConversionScheme};

pub const REVIEW_API_VERSION: &str = "apiextensions.k8s.io/v1";
pub const REVIEW_KIND: &str = "ConversionReview";

pub const STATUS_SUCCESS: &str = "Success";
pub const STATUS_FAILURE: &str = "Failure";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionReview {
    #[serde(default = "default_review_api_version")]
    pub api_version: String,
    #[serde(default = "default_review_kind")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<ConversionRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ConversionResponse>,
}

fn default_review_api_version() -> String {
    REVIEW_API_VERSION.to_string()
}

fn default_review_kind() -> String {
    REVIEW_KIND.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRequest {
    #[serde(default)]
    pub uid: String,
    #[serde(rename = "desiredAPIVersion")]
    pub desired_api_version: String,
    #[serde(default)]
    pub objects: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResponse {
    pub uid: String,
    #[serde(default)]
    pub converted_objects: Vec<Value>,
    pub result: ReviewResult,
}

/// Outcome of a review, in the shape of a Kubernetes `Status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResult {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
}

impl ReviewResult {
    pub fn success() -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            message: None,
            code: None,
        }
    }

    /// A failure classified as a bad request (400) or a conversion error (500)
    pub fn failure(error: &ConversionError) -> Self {
        Self {
            status: STATUS_FAILURE.to_string(),
            message: Some(error.to_string()),
            code: Some(if error.is_bad_request() { 400 } else { 500 }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

impl ConversionReview {
    /// A review asking for `objects` to be converted to `desired_api_version`
    pub fn request(uid: impl Into<String>, desired_api_version: impl Into<String>, objects: Vec<Value>) -> Self {
        Self {
            api_version: default_review_api_version(),
            kind: default_review_kind(),
            request: Some(ConversionRequest {
                uid: uid.into(),
                desired_api_version: desired_api_version.into(),
                objects,
            }),
            response: None,
        }
    }
}

/// Serves conversion reviews through a [`ConversionScheme`]
#[derive(Debug, Clone)]
pub struct ConversionWebhook {
    scheme: ConversionScheme,
}

impl ConversionWebhook {
    pub fn new(scheme: ConversionScheme) -> Self {
        Self { scheme }
    }

    pub fn scheme(&self) -> &ConversionScheme {
        &self.scheme
    }

    /// Answer a review; the request is echoed back without its objects
    pub fn review(&self, review: ConversionReview) -> ConversionReview {
        let response = match review.request {
            Some(request) => self.convert(request),
            None => {
                let error = ConversionError::InvalidObject("conversion review has no request".to_string());
                tracing::warn!(error = %error, "rejecting conversion review");
                ConversionResponse {
                    uid: String::new(),
                    converted_objects: Vec::new(),
                    result: ReviewResult::failure(&error),
                }
            }
        };
        ConversionReview {
            api_version: review.api_version,
            kind: review.kind,
            request: None,
            response: Some(response),
        }
    }

    fn convert(&self, request: ConversionRequest) -> ConversionResponse {
        tracing::info!(
            uid = %request.uid,
            objects = request.objects.len(),
            desired_api_version = %request.desired_api_version,
            "converting objects"
        );

        match self.convert_objects(request.objects, &request.desired_api_version) {
            Ok(converted_objects) => {
                tracing::debug!(uid = %request.uid, "conversion succeeded");
                ConversionResponse {
                    uid: request.uid,
                    converted_objects,
                    result: ReviewResult::success(),
                }
            }
            Err(error) => {
                tracing::warn!(
                    uid = %request.uid,
                    bad_request = error.is_bad_request(),
                    error = %error,
                    "conversion failed"
                );
                ConversionResponse {
                    uid: request.uid,
                    converted_objects: Vec::new(),
                    result: ReviewResult::failure(&error),
                }
            }
        }
    }

    fn convert_objects(&self, objects: Vec<Value>, desired_api_version: &str) -> Result<Vec<Value>> {
        let mut review_kind: Option<Kind> = None;
        objects
            .into_iter()
            .map(|object| {
                let (version, kind) = type_meta(&object)?;
                match review_kind {
                    Some(expected) if expected != kind => {
                        return Err(ConversionError::KindMismatch {
                            expected: expected.to_string(),
                            actual: format!("{} {}", api_version(&version), kind),
                        });
                    }
                    _ => review_kind = Some(kind),
                }
                self.scheme.convert(object, desired_api_version)
            })
            .collect()
    }

    /// Version identifier of any served object
    pub fn compute_version(&self, object: Value) -> Result<String> {
        let version = self.scheme.compute_version(object)?;
        tracing::debug!(version = %version, "computed resource version");
        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::ConversionContext;
    use serde_json::json;

    fn webhook() -> ConversionWebhook {
        ConversionWebhook::new(ConversionScheme::new(ConversionContext::default()).unwrap())
    }

    fn experiment(version: &str) -> Value {
        json!({
            "apiVersion": format!("pipelines.kubeflow.org/{version}"),
            "kind": "Experiment",
            "metadata": {"name": "experiment", "namespace": "ns"},
            "spec": {"description": "a description"}
        })
    }

    #[test]
    fn test_successful_review() {
        let review = ConversionReview::request("uid-1", "pipelines.kubeflow.org/v1alpha5", vec![experiment("v1")]);
        let answered = webhook().review(review);
        let response = answered.response.unwrap();
        assert_eq!(response.uid, "uid-1");
        assert!(response.result.is_success());
        assert_eq!(response.converted_objects.len(), 1);
        assert_eq!(response.converted_objects[0]["apiVersion"], "pipelines.kubeflow.org/v1alpha5");
        assert!(answered.request.is_none());
    }

    #[test]
    fn test_unknown_version_is_bad_request() {
        let review = ConversionReview::request("uid-2", "pipelines.kubeflow.org/v2", vec![experiment("v1")]);
        let result = webhook().review(review).response.unwrap().result;
        assert!(!result.is_success());
        assert_eq!(result.code, Some(400));
    }

    #[test]
    fn test_conversion_failure_is_internal_error() {
        let pipeline = json!({
            "apiVersion": "pipelines.kubeflow.org/v1alpha6",
            "kind": "Pipeline",
            "metadata": {"name": "pipeline"},
            "spec": {"image": "image:1"}
        });
        let review = ConversionReview::request("uid-3", "pipelines.kubeflow.org/v1", vec![pipeline]);
        let response = webhook().review(review).response.unwrap();
        assert_eq!(response.result.code, Some(500));
        assert!(response.converted_objects.is_empty());
    }

    #[test]
    fn test_mixed_kinds_are_a_bad_request() {
        let run = json!({
            "apiVersion": "pipelines.kubeflow.org/v1",
            "kind": "Run",
            "metadata": {"name": "run"},
            "spec": {"pipeline": "pipeline:1"}
        });
        let review = ConversionReview::request("uid-4", "pipelines.kubeflow.org/v1beta1", vec![experiment("v1"), run]);
        let result = webhook().review(review).response.unwrap().result;
        assert_eq!(result.code, Some(400));
        assert!(result.message.unwrap().contains("expected Experiment"));
    }

    #[test]
    fn test_review_without_request() {
        let review = ConversionReview {
            api_version: REVIEW_API_VERSION.to_string(),
            kind: REVIEW_KIND.to_string(),
            request: None,
            response: None,
        };
        let result = webhook().review(review).response.unwrap().result;
        assert_eq!(result.code, Some(400));
    }

    #[test]
    fn test_wire_format() {
        let review: ConversionReview = serde_json::from_value(json!({
            "apiVersion": "apiextensions.k8s.io/v1",
            "kind": "ConversionReview",
            "request": {
                "uid": "705ab4f5",
                "desiredAPIVersion": "pipelines.kubeflow.org/v1beta1",
                "objects": [experiment("v1alpha6")]
            }
        }))
        .unwrap();
        let value = serde_json::to_value(webhook().review(review)).unwrap();
        assert_eq!(value["response"]["uid"], "705ab4f5");
        assert_eq!(value["response"]["result"]["status"], "Success");
        assert_eq!(value["response"]["convertedObjects"][0]["spec"]["provider"], "default");
    }
}
