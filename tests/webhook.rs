//! End-to-end conversion reviews over JSON.

use serde_json::{json, Value};

use pipelines_apis::apis::NamespacedName;
use pipelines_apis::webhook::STATUS_FAILURE;
use pipelines_apis::{ConversionContext, ConversionReview, ConversionScheme, ConversionWebhook};

fn webhook() -> ConversionWebhook {
    ConversionWebhook::new(ConversionScheme::new(ConversionContext::default()).unwrap())
}

fn review(desired: &str, objects: Vec<Value>) -> Value {
    json!({
        "apiVersion": "apiextensions.k8s.io/v1",
        "kind": "ConversionReview",
        "request": {
            "uid": "0ab1c2d3",
            "desiredAPIVersion": desired,
            "objects": objects
        }
    })
}

fn answer(webhook: &ConversionWebhook, review: Value) -> Value {
    let review: ConversionReview = serde_json::from_value(review).unwrap();
    serde_json::to_value(webhook.review(review)).unwrap()
}

fn run_configuration_v1() -> Value {
    json!({
        "apiVersion": "pipelines.kubeflow.org/v1",
        "kind": "RunConfiguration",
        "metadata": {"name": "rc", "namespace": "team"},
        "spec": {
            "run": {
                "provider": {"name": "vertex", "namespace": "providers"},
                "pipeline": "pipeline:1.0",
                "runtimeParameters": [
                    {"name": "b", "value": "2"},
                    {"name": "a", "valueFrom": {"runConfigurationRef": {"name": "upstream", "outputArtifact": "model"}}}
                ],
                "artifacts": [{"name": "model", "path": "Trainer:model"}]
            },
            "triggers": {
                "schedules": [{"cronExpression": "0 * * * *", "startTime": "2024-01-01T00:00:00Z"}],
                "onChange": ["pipeline"],
                "runConfigurations": ["upstream"]
            }
        },
        "status": {
            "provider": {"name": {"name": "vertex", "namespace": "providers"}, "id": "rc-1"},
            "synchronizationState": "Succeeded",
            "triggeredPipelineVersion": "1.0",
            "latestRuns": {"succeeded": {"providerId": "run-7"}}
        }
    })
}

#[test]
fn test_review_round_trips_through_every_version() {
    let webhook = webhook();
    let original = run_configuration_v1();

    let mut current = original.clone();
    for version in ["v1alpha5", "v1alpha6", "v1beta1", "v1"] {
        let answered = answer(&webhook, review(&format!("pipelines.kubeflow.org/{version}"), vec![current]));
        let response = &answered["response"];
        assert_eq!(response["uid"], "0ab1c2d3");
        assert_eq!(response["result"]["status"], "Success", "converting to {version}: {answered}");
        current = response["convertedObjects"][0].clone();
        assert_eq!(current["apiVersion"], format!("pipelines.kubeflow.org/{version}"));
    }

    assert_eq!(current, original);
}

#[test]
fn test_legacy_shape_of_run_configuration() {
    let answered = answer(
        &webhook(),
        review("pipelines.kubeflow.org/v1alpha5", vec![run_configuration_v1()]),
    );
    let converted = &answered["response"]["convertedObjects"][0];

    assert_eq!(converted["spec"]["schedule"], "0 * * * *");
    assert_eq!(converted["spec"]["pipeline"], "pipeline:1.0");
    assert_eq!(converted["status"]["kfpId"], "rc-1");
    assert_eq!(converted["status"]["observedPipelineVersion"], "1.0");
    assert!(converted["metadata"]["annotations"]["v1alpha5.pipelines.kubeflow.org/conversions.remainder"].is_string());
}

#[test]
fn test_all_objects_share_the_outcome() {
    let valid = json!({
        "apiVersion": "pipelines.kubeflow.org/v1alpha6",
        "kind": "Pipeline",
        "metadata": {"name": "valid"},
        "spec": {"image": "image:1", "tfxComponents": "pipeline.create_components"}
    });
    let broken = json!({
        "apiVersion": "pipelines.kubeflow.org/v1alpha6",
        "kind": "Pipeline",
        "metadata": {"name": "pipeline"},
        "spec": {"image": "image:1"}
    });

    let answered = answer(&webhook(), review("pipelines.kubeflow.org/v1", vec![valid, broken]));
    let response = &answered["response"];
    assert_eq!(response["result"]["status"], STATUS_FAILURE);
    assert_eq!(response["result"]["code"], 500);
    assert!(response["result"]["message"].as_str().unwrap().contains("spec.tfxComponents"));
    assert!(response.get("convertedObjects").map_or(true, |o| o.as_array().unwrap().is_empty()));
}

#[test]
fn test_objects_of_another_kind_are_a_bad_request() {
    let pipeline = json!({
        "apiVersion": "pipelines.kubeflow.org/v1",
        "kind": "Pipeline",
        "metadata": {"name": "pipeline"},
        "spec": {"image": "image:1"}
    });
    let answered = answer(
        &webhook(),
        review("pipelines.kubeflow.org/v1beta1", vec![run_configuration_v1(), pipeline]),
    );
    let result = &answered["response"]["result"];
    assert_eq!(result["code"], 400);
    assert!(result["message"].as_str().unwrap().contains("Kind mismatch"));
}

#[test]
fn test_object_metadata_survives_conversion() {
    let experiment = json!({
        "apiVersion": "pipelines.kubeflow.org/v1",
        "kind": "Experiment",
        "metadata": {
            "name": "e",
            "namespace": "ns",
            "uid": "3f0c9a52-1d44-4c1e-9a57-2b9f3c1d7e10",
            "resourceVersion": "81234",
            "generation": 3,
            "creationTimestamp": "2024-03-01T12:00:00Z",
            "labels": {"app.kubernetes.io/part-of": "pipelines"},
            "finalizers": ["pipelines.kubeflow.org/finalizer"],
            "ownerReferences": [{"apiVersion": "v1", "kind": "Namespace", "name": "ns", "uid": "1"}]
        },
        "spec": {
            "description": "d",
            "provider": {"name": "vertex", "namespace": "providers"}
        },
        "status": {
            "provider": {"name": {"name": "vertex", "namespace": "providers"}, "id": "e-1"},
            "synchronizationState": "Succeeded"
        }
    });
    let webhook = webhook();

    let down = answer(&webhook, review("pipelines.kubeflow.org/v1alpha6", vec![experiment.clone()]));
    let converted = down["response"]["convertedObjects"][0].clone();
    for field in ["uid", "resourceVersion", "generation", "creationTimestamp", "labels", "finalizers", "ownerReferences"] {
        assert_eq!(converted["metadata"][field], experiment["metadata"][field], "{field}");
    }

    let up = answer(&webhook, review("pipelines.kubeflow.org/v1", vec![converted]));
    assert_eq!(up["response"]["convertedObjects"][0], experiment);
}

#[test]
fn test_unsupported_kind_is_a_bad_request() {
    let provider = json!({
        "apiVersion": "pipelines.kubeflow.org/v1",
        "kind": "Provider",
        "metadata": {"name": "vertex"},
        "spec": {"serviceImage": "service:1"}
    });
    let answered = answer(&webhook(), review("pipelines.kubeflow.org/v1alpha5", vec![provider]));
    assert_eq!(answered["response"]["result"]["code"], 400);
}

#[test]
fn test_malformed_object_is_a_bad_request() {
    let answered = answer(
        &webhook(),
        review("pipelines.kubeflow.org/v1", vec![json!({"kind": "Pipeline"})]),
    );
    assert_eq!(answered["response"]["result"]["code"], 400);
}

#[test]
fn test_configured_default_provider_is_used() {
    let ctx = ConversionContext::new(NamespacedName::new("providers", "kfp"));
    let webhook = ConversionWebhook::new(ConversionScheme::new(ctx).unwrap());
    let experiment = json!({
        "apiVersion": "pipelines.kubeflow.org/v1alpha5",
        "kind": "Experiment",
        "metadata": {"name": "experiment", "namespace": "team"},
        "spec": {"description": "d"}
    });

    let answered = answer(&webhook, review("pipelines.kubeflow.org/v1", vec![experiment]));
    let converted = &answered["response"]["convertedObjects"][0];
    assert_eq!(converted["spec"]["provider"], json!({"name": "kfp", "namespace": "providers"}));
}

#[test]
fn test_empty_review_succeeds() {
    let answered = answer(&webhook(), review("pipelines.kubeflow.org/v1beta1", Vec::new()));
    assert_eq!(answered["response"]["result"]["status"], "Success");
}
