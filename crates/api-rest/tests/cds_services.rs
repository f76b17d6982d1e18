mod support;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use support::*;

fn order_select(procedure: &str, indications: &[&str]) -> Value {
    json!({
        "hook": "order-select",
        "hookInstance": "d1577c69-dfbe-44ad-ba6d-3e05e953b2ea",
        "context": {
            "patientId": "MRI-59879846",
            "draftOrders": {
                "resourceType": "Bundle",
                "entry": [{
                    "resource": {
                        "resourceType": "ServiceRequest",
                        "id": "example-MRI-59879846",
                        "status": "draft",
                        "code": {
                            "coding": [{
                                "system": "http://www.ama-assn.org/go/cpt",
                                "code": procedure
                            }]
                        },
                        "reasonCode": indications.iter().map(|code| json!({
                            "coding": [{ "system": "http://snomed.info/sct", "code": code }]
                        })).collect::<Vec<_>>()
                    }
                }]
            },
            "selections": ["ServiceRequest/example-MRI-59879846"]
        }
    })
}

#[tokio::test]
async fn health_reports_alive() -> anyhow::Result<()> {
    let (status, body) = request_json(Method::GET, "/health", None).await?;
    assert_status(status, StatusCode::OK, "health");
    assert_eq!(body, json!({ "ok": true, "message": "PAMA is alive" }));
    Ok(())
}

#[tokio::test]
async fn discovery_lists_pama_imaging() -> anyhow::Result<()> {
    let (status, body) = request_json(Method::GET, "/cds-services", None).await?;
    assert_status(status, StatusCode::OK, "discovery");
    assert_eq!(body["services"][0]["id"], "pama-imaging");
    assert_eq!(body["services"][0]["hook"], "order-select");
    Ok(())
}

#[tokio::test]
async fn not_appropriate_order_gets_rating_action() -> anyhow::Result<()> {
    let (status, body) = request_json(
        Method::POST,
        "/cds-services/pama-imaging",
        Some(order_select("72133", &["279039007"])),
    )
    .await?;
    assert_status(status, StatusCode::OK, "pama-imaging");
    assert_eq!(body["cards"], json!([]));

    let action = &body["extension"]["systemActions"][0];
    assert_eq!(action["type"], "update");
    assert_eq!(action["resource"]["id"], "example-MRI-59879846");
    assert_eq!(action["resource"]["status"], "draft");

    let rating = &action["resource"]["extension"][0];
    assert_eq!(rating["url"], "http://fhir.org/argonaut/Extension/pama-rating");
    assert_eq!(
        rating["valueCodeableConcept"]["coding"][0]["code"],
        "not-appropriate"
    );
    Ok(())
}

#[tokio::test]
async fn congenital_heart_disease_cta_gets_card() -> anyhow::Result<()> {
    let (status, body) = request_json(
        Method::POST,
        "/cds-services/pama-imaging",
        Some(order_select("71275", &["13213009"])),
    )
    .await?;
    assert_status(status, StatusCode::OK, "pama-imaging");

    let card = &body["cards"][0];
    assert_eq!(card["summary"], "ACC recommends cardiac MRI");
    assert_eq!(card["indicator"], "info");
    assert_eq!(card["links"][0]["type"], "smart");
    assert!(card["uuid"].is_string());

    let suggested = &card["suggestions"][0]["actions"][0]["resource"];
    assert_eq!(suggested["code"]["coding"][0]["code"], "75561");
    assert_eq!(suggested["id"], "example-MRI-59879846");
    Ok(())
}

#[tokio::test]
async fn unrated_order_omits_extension() -> anyhow::Result<()> {
    let (status, body) = request_json(
        Method::POST,
        "/cds-services/pama-imaging",
        Some(order_select("99999", &["25064002"])),
    )
    .await?;
    assert_status(status, StatusCode::OK, "pama-imaging");
    assert_eq!(body, json!({ "cards": [] }));
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_rejected() -> anyhow::Result<()> {
    let (status, text) = request(
        Method::POST,
        "/cds-services/pama-imaging",
        Some("{ not json".into()),
    )
    .await?;
    assert_status(status, StatusCode::BAD_REQUEST, "malformed body");
    assert!(text.contains("invalid JSON"), "{text}");
    Ok(())
}

#[tokio::test]
async fn schema_mismatch_is_rejected() -> anyhow::Result<()> {
    let body = json!({ "hook": "order-select", "context": { "selections": "not-a-list" } });
    let (status, text) = request(
        Method::POST,
        "/cds-services/pama-imaging",
        Some(body.to_string()),
    )
    .await?;
    assert_status(status, StatusCode::BAD_REQUEST, "schema mismatch");
    assert!(text.contains("schema mismatch"), "{text}");
    assert!(text.contains("expected a sequence"), "{text}");
    Ok(())
}
