//! `HttpLookupService` against a stub backend.

use crate::common::StubBackend;
use anyhow::Result;
use consignment_grid::config::BackendConfig;
use consignment_grid::core::GridError;
use consignment_grid::lookup::{HttpLookupService, LookupRequest, LookupService, MessageType};
use consignment_grid::models::DgField;
use serde_json::json;

#[tokio::test]
async fn test_posts_camel_case_json() -> Result<()> {
    let backend = StubBackend::master_data(
        vec![("UN Code Init", Some("P1"), json!([{ "id": "U9", "name": "Hazmat" }]))],
        Vec::new(),
    )
    .await?;
    let service = HttpLookupService::new(backend.url());

    let request = LookupRequest::options(DgField::UnCode, Some("P1")).with_page(0, 50);
    let envelope = service.lookup(&request).await?;
    let options = envelope.option_page(MessageType::UnCodeInit)?.options;
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].value, "U9 || Hazmat");

    let sent = backend.requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0],
        json!({
            "messageType": "UN Code Init",
            "offset": 0,
            "limit": 50,
            "additionalFilter": [{ "FilterName": "Product", "FilterValue": "P1" }]
        })
    );
    Ok(())
}

#[tokio::test]
async fn test_wrong_endpoint_path_is_404() -> Result<()> {
    let backend = StubBackend::master_data(Vec::new(), Vec::new()).await?;
    let service = HttpLookupService::new(backend.url().replace("/lookup", "/lookups"));

    let err = service.lookup(&LookupRequest::options(DgField::Product, None)).await.unwrap_err();
    assert!(matches!(err, GridError::LookupStatus { status: 404, .. }));
    assert!(backend.requests().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_http_error_status() -> Result<()> {
    let backend = StubBackend::start(|_| (503, "{}".to_string())).await?;
    let service = HttpLookupService::new(backend.url());

    let err = service.lookup(&LookupRequest::options(DgField::Product, None)).await.unwrap_err();
    assert!(matches!(err, GridError::LookupStatus { status: 503, .. }));
    Ok(())
}

#[tokio::test]
async fn test_non_json_body_is_decode_error() -> Result<()> {
    let backend = StubBackend::start(|_| (200, "<html>oops</html>".to_string())).await?;
    let service = HttpLookupService::new(backend.url());

    let err = service.lookup(&LookupRequest::options(DgField::Product, None)).await.unwrap_err();
    assert!(matches!(err, GridError::LookupDecode { .. }));
    Ok(())
}

#[tokio::test]
async fn test_unreachable_endpoint_is_transport_error() -> Result<()> {
    // Bind then drop to get a port nobody listens on
    let port = std::net::TcpListener::bind("127.0.0.1:0")?.local_addr()?.port();
    let service = HttpLookupService::from_config(&BackendConfig {
        endpoint: format!("http://127.0.0.1:{port}/lookup"),
        timeout_secs: Some(2),
    })?;

    let err = service.lookup(&LookupRequest::options(DgField::Product, None)).await.unwrap_err();
    assert!(matches!(err, GridError::LookupTransport { .. }));
    Ok(())
}

#[tokio::test]
async fn test_detail_payload_decoded() -> Result<()> {
    let backend = StubBackend::master_data(
        Vec::new(),
        vec![("P1", json!({ "UNCode": "U9", "DGClass": "D1", "ContainsHazardousGoods": "Yes" }))],
    )
    .await?;
    let service = HttpLookupService::new(backend.url());

    let request = LookupRequest::on_select(DgField::Product, "P1", "Widget").unwrap();
    let envelope = service.lookup(&request).await?;
    let detail = envelope.detail(MessageType::ProductOnSelect).unwrap();
    assert_eq!(detail.un_code.as_deref(), Some("U9"));
    assert_eq!(backend.requests()[0]["searchCriteria"], json!({ "id": "P1", "name": "Widget" }));
    Ok(())
}
