use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use pama_core::{CoreConfig, PamaImagingService};
use std::sync::Arc;
use tower::ServiceExt;

pub fn test_app() -> Router {
    let service =
        PamaImagingService::new(Arc::new(CoreConfig::default())).expect("builtin rules load");
    api_rest::router(service)
}

/// Send one request through a fresh router and collect the response body as text.
pub async fn request(
    method: Method,
    uri: &str,
    body: Option<String>,
) -> anyhow::Result<(StatusCode, String)> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body))?,
        None => builder.body(Body::empty())?,
    };

    let response = test_app().oneshot(request).await?;
    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();
    Ok((status, String::from_utf8(bytes.to_vec())?))
}

pub async fn request_json(
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> anyhow::Result<(StatusCode, serde_json::Value)> {
    let (status, text) = request(method, uri, body.map(|b| b.to_string())).await?;
    let json = if text.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_str(&text)?
    };
    Ok((status, json))
}

pub fn assert_status(actual: StatusCode, expected: StatusCode, what: &str) {
    assert_eq!(actual, expected, "unexpected status for {what}");
}
