//! RestClient and RestResource against the in-memory backend over real HTTP

#![cfg(feature = "in-memory")]

use bizlist::client::{RestClient, RestResource};
use bizlist::config::{ClientConfig, ResourceConfig, UpdateMethod};
use bizlist::core::session::TENANT_KEY;
use bizlist::core::{
    ClientError, ClientMetrics, ErrorKind, InMemorySessionStore, QueryParams, ResourceService,
    SessionStore,
};
use bizlist::entities::{Lead, LeadDraft, Onboarding};
use bizlist::storage::InMemoryBackend;
use serde_json::json;
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};

struct Harness {
    backend: InMemoryBackend,
    client: Arc<RestClient>,
    session: Arc<InMemorySessionStore>,
    metrics: Arc<ClientMetrics>,
}

async fn harness(backend: InMemoryBackend) -> Harness {
    bizlist::logging::init_tracing("bizlist=debug");

    let addr = backend.spawn().await.unwrap();
    let config = ClientConfig::new(format!("http://{addr}"));
    let session = Arc::new(InMemorySessionStore::new());
    let metrics = ClientMetrics::init();
    let client = RestClient::new(&config.api, session.clone(), metrics.clone()).unwrap();

    Harness {
        backend,
        client: Arc::new(client),
        session,
        metrics,
    }
}

fn seed_leads(backend: &InMemoryBackend) {
    backend.seed(
        "leads",
        vec![
            json!({"id": "1", "name": "Acme Inc", "status": "new", "createdAt": "2024-01-02"}),
            json!({"id": "2", "name": "Beta Co", "status": "qualified"}),
        ],
    );
}

#[tokio::test]
async fn test_list_decodes_bare_array() {
    let h = harness(InMemoryBackend::new()).await;
    seed_leads(&h.backend);

    let leads = RestResource::<Lead>::new(h.client.clone());
    let items = assert_ok!(leads.list(&QueryParams::new()).await);

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].name, "Acme Inc");
    assert!(items[0].created_at.is_some());
}

#[tokio::test]
async fn test_list_unwraps_configured_envelope_and_sends_params() {
    let h = harness(InMemoryBackend::new().with_envelope("leads", "records")).await;
    seed_leads(&h.backend);

    let mut config = ResourceConfig::named("lead");
    config.envelope = Some("records".to_string());
    let leads = RestResource::<Lead>::from_config(h.client.clone(), config);

    let items = assert_ok!(leads.list(&QueryParams::new().with("status", "qualified")).await);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "2");
}

#[tokio::test]
async fn test_create_update_delete_roundtrip() {
    let h = harness(InMemoryBackend::new().with_envelope("leads", "leads")).await;
    let leads = RestResource::<Lead>::new(h.client.clone());

    let created = assert_ok!(
        leads
            .create(&LeadDraft::new("Gamma LLC").email("hi@gamma.test"))
            .await
    )
    .unwrap();
    assert_eq!(created.name, "Gamma LLC");
    assert_eq!(created.status, "new");

    let mut draft = LeadDraft::from(&created);
    draft.status = Some("qualified".to_string());
    let updated = assert_ok!(leads.update(&created.id, &draft).await).unwrap();
    assert_eq!(updated.status, "qualified");
    assert_eq!(updated.email.as_deref(), Some("hi@gamma.test"));

    assert_ok!(leads.delete(&created.id).await);
    assert!(h.backend.items("leads").is_empty());
}

#[tokio::test]
async fn test_no_content_write_is_success_without_record() {
    let h = harness(InMemoryBackend::new().with_bodyless_writes("leads")).await;
    seed_leads(&h.backend);
    let leads = RestResource::<Lead>::new(h.client.clone());

    let updated = assert_ok!(leads.update("1", &LeadDraft::new("Acme Holdings")).await);
    assert!(updated.is_none());
    assert_eq!(h.backend.items("leads")[0]["name"], "Acme Holdings");

    let created = assert_ok!(leads.create(&LeadDraft::new("Gamma LLC")).await);
    assert!(created.is_none());
    assert_eq!(h.backend.items("leads").len(), 3);
    assert_eq!(h.metrics.snapshot().failures, 0);
}

#[tokio::test]
async fn test_ids_are_sent_as_one_path_segment() {
    let h = harness(InMemoryBackend::new()).await;
    h.backend.seed(
        "leads",
        vec![
            json!({"id": "a/b?c#d", "name": "Slashed"}),
            json!({"id": "a", "name": "Plain"}),
        ],
    );
    let leads = RestResource::<Lead>::new(h.client.clone());

    let updated = assert_ok!(leads.update("a/b?c#d", &LeadDraft::new("Renamed")).await).unwrap();
    assert_eq!(updated.id, "a/b?c#d");
    assert_eq!(updated.name, "Renamed");

    assert_ok!(leads.delete("a/b?c#d").await);
    let remaining = h.backend.items("leads");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["name"], "Plain");
}

#[tokio::test]
async fn test_put_updates_replace_the_record() {
    let h = harness(InMemoryBackend::new()).await;
    seed_leads(&h.backend);

    let mut config = ResourceConfig::named("lead");
    config.update_method = UpdateMethod::Put;
    let leads = RestResource::<Lead>::from_config(h.client.clone(), config);

    let updated = assert_ok!(leads.update("1", &LeadDraft::new("Acme Holdings")).await).unwrap();
    assert_eq!(updated.name, "Acme Holdings");
    assert_eq!(h.backend.items("leads")[0].get("status"), None);
}

#[tokio::test]
async fn test_bearer_token_and_tenant_are_sent() {
    let h = harness(InMemoryBackend::new().require_token("s3cret")).await;
    seed_leads(&h.backend);
    let leads = RestResource::<Lead>::new(h.client.clone());

    let err = assert_err!(leads.list(&QueryParams::new()).await);
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.kind(), ErrorKind::Rejected);
    assert_eq!(err.user_message(), "Unauthorized");

    h.session.set("token", "s3cret");
    h.session.set(TENANT_KEY, "tenant-a");
    assert_ok!(leads.list(&QueryParams::new()).await);
}

#[tokio::test]
async fn test_server_message_is_surfaced() {
    let h = harness(InMemoryBackend::new()).await;
    seed_leads(&h.backend);
    let leads = RestResource::<Lead>::new(h.client.clone());

    h.backend.fail_next(500, "Database unavailable");
    let err = assert_err!(leads.delete("1").await);
    assert_eq!(err.kind(), ErrorKind::ServerFailure);
    assert_eq!(err.user_message(), "Database unavailable");

    let err = assert_err!(leads.delete("missing").await);
    assert_eq!(err.status(), Some(404));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_invalid_draft_never_reaches_the_server() {
    let h = harness(InMemoryBackend::new()).await;
    let leads = RestResource::<Lead>::new(h.client.clone());

    let err = assert_err!(leads.create(&LeadDraft::new("")).await);
    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(h.metrics.snapshot().requests, 0);
    assert!(h.backend.items("leads").is_empty());
}

#[tokio::test]
async fn test_malformed_payload_is_decode_error() {
    let h = harness(InMemoryBackend::new()).await;
    h.backend.seed("leads", vec![json!({"id": "1", "name": 42})]);
    let leads = RestResource::<Lead>::new(h.client.clone());

    let err = assert_err!(leads.list(&QueryParams::new()).await);
    assert_eq!(err.kind(), ErrorKind::Decode);
    assert!(err.to_string().contains("item 0"));
}

#[tokio::test]
async fn test_onboarding_checklists_normalize_over_the_wire() {
    let h = harness(InMemoryBackend::new()).await;
    h.backend.seed(
        "onboardings",
        vec![json!({
            "id": "o1",
            "clientName": "Acme Inc",
            "checklist": ["Sign contract", {"task": "Kickoff", "done": true}],
        })],
    );

    let onboardings = RestResource::<Onboarding>::new(h.client.clone());
    let items = assert_ok!(onboardings.list(&QueryParams::new()).await);
    assert_eq!(items[0].progress(), 50);
    assert_eq!(items[0].checklist[1].title, "Kickoff");
}

#[tokio::test]
async fn test_metrics_count_requests_and_reset() {
    let h = harness(InMemoryBackend::new()).await;
    seed_leads(&h.backend);
    let leads = RestResource::<Lead>::new(h.client.clone());

    assert_ok!(leads.list(&QueryParams::new()).await);
    assert_err!(leads.delete("missing").await);

    let snapshot = h.metrics.snapshot();
    assert_eq!(snapshot.requests, 2);
    assert_eq!(snapshot.successes, 1);
    assert_eq!(snapshot.failures, 1);
    assert!(snapshot.average_latency().is_some());

    h.metrics.reset();
    assert_eq!(h.metrics.snapshot().requests, 0);
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let config = ClientConfig::new("http://127.0.0.1:9");
    let client = RestClient::new(
        &config.api,
        Arc::new(InMemorySessionStore::new()),
        ClientMetrics::init(),
    )
    .unwrap();
    let leads = RestResource::<Lead>::new(Arc::new(client));

    let err = assert_err!(leads.list(&QueryParams::new()).await);
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(!err.user_message().is_empty());
}

#[test]
fn test_rejects_non_http_base_url() {
    let config = ClientConfig::new("ftp://files.example.com");
    let result = RestClient::new(
        &config.api,
        Arc::new(InMemorySessionStore::new()),
        ClientMetrics::init(),
    );
    assert!(matches!(result, Err(ClientError::Config(_))));
}
