use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::json;

use scanledger_api::app::{build_app, services};
use scanledger_infra::catalog::InMemoryCatalog;
use scanledger_infra::ledger_store::InMemoryLedgerStore;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(known_barcodes: &[&str]) -> Self {
        // Same router as prod, bound to an ephemeral port.
        let catalog = Arc::new(InMemoryCatalog::with_barcodes(known_barcodes.iter().copied()));
        let store = Arc::new(InMemoryLedgerStore::new());
        let app = build_app(services::build_with(catalog, store));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn append(
    client: &reqwest::Client,
    base_url: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let res = client.post(base_url).json(&body).send().await.unwrap();
    let status = res.status();
    let body = res.json().await.unwrap();
    (status, body)
}

#[tokio::test]
async fn first_scan_records_then_repeat_is_duplicate() {
    let srv = TestServer::spawn(&["123"]).await;
    let client = reqwest::Client::new();

    let (status, body) = append(
        &client,
        &srv.base_url,
        json!({ "barcode": "123", "mode": "in", "distributor": null }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) = append(
        &client,
        &srv.base_url,
        json!({ "barcode": "123", "mode": "in", "distributor": null }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["duplicate"], true);
    assert!(body.get("notFound").is_none());
}

#[tokio::test]
async fn unknown_barcode_answers_not_found() {
    let srv = TestServer::spawn(&["123"]).await;
    let client = reqwest::Client::new();

    let (status, body) = append(
        &client,
        &srv.base_url,
        json!({ "barcode": "999", "mode": "in", "distributor": null }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["notFound"], true);
    assert_eq!(body["message"], "barcode not recognized");
}

#[tokio::test]
async fn outbound_without_distributor_is_a_validation_error() {
    let srv = TestServer::spawn(&["123"]).await;
    let client = reqwest::Client::new();

    let (status, body) = append(
        &client,
        &srv.base_url,
        json!({ "barcode": "123", "mode": "out", "distributor": null }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn empty_barcode_is_a_validation_error() {
    let srv = TestServer::spawn(&["123"]).await;
    let client = reqwest::Client::new();

    let (status, body) = append(
        &client,
        &srv.base_url,
        json!({ "barcode": "   ", "mode": "in", "distributor": null }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn outbound_with_distributor_is_recorded() {
    let srv = TestServer::spawn(&["123"]).await;
    let client = reqwest::Client::new();

    let (status, body) = append(
        &client,
        &srv.base_url,
        json!({
            "barcode": "123",
            "mode": "out",
            "distributor": { "name": "Acme Foods" },
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn bare_get_is_a_reachability_probe() {
    let srv = TestServer::spawn(&[]).await;
    let client = reqwest::Client::new();

    let res = client.get(&srv.base_url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn health_endpoint_answers_ok() {
    let srv = TestServer::spawn(&[]).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn unknown_action_is_rejected() {
    let srv = TestServer::spawn(&[]).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/?action=dropEverything", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn remove_duplicates_action_runs_and_is_idempotent() {
    let srv = TestServer::spawn(&["123"]).await;
    let client = reqwest::Client::new();

    // in -> out -> in -> out builds a ledger whose second "in" duplicates
    // the first while a later "out" remains the barcode's head.
    for (mode, distributor) in [
        ("in", json!(null)),
        ("out", json!({ "name": "Acme Foods" })),
        ("in", json!(null)),
        ("out", json!({ "name": "Acme Foods" })),
    ] {
        let (status, body) = append(
            &client,
            &srv.base_url,
            json!({ "barcode": "123", "mode": mode, "distributor": distributor }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }

    let res = client
        .get(format!("{}/?action=removeDuplicates", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("removed 1 duplicate row"));

    // Second pass finds nothing left to remove.
    let res = client
        .get(format!("{}/?action=removeDuplicates", srv.base_url))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("removed 0 duplicate row"));
}
