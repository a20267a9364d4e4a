//! Digest upserts against a local PostgREST stand-in.

use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use chrono::NaiveDate;
use cockpit_db::{DigestOutcome, DigestRepository, SupabaseClient};
use secrecy::SecretString;
use serde_json::{json, Value};

#[derive(Debug, Clone)]
struct Recorded {
    method: Method,
    path: String,
    query: String,
    body: String,
}

#[derive(Clone)]
struct Backend {
    /// Rows returned for every GET.
    rows: Value,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

async fn postgrest(State(backend): State<Backend>, method: Method, uri: Uri, body: String) -> Response {
    backend.requests.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: uri.path().to_string(),
        query: uri.query().unwrap_or_default().to_string(),
        body,
    });
    match method {
        Method::GET => axum::Json(backend.rows.clone()).into_response(),
        Method::POST => (StatusCode::CREATED, axum::Json(json!([{ "id": "d-new" }]))).into_response(),
        Method::PATCH => StatusCode::NO_CONTENT.into_response(),
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

async fn serve(rows: Value) -> (SupabaseClient, Arc<Mutex<Vec<Recorded>>>) {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new().fallback(postgrest).with_state(Backend {
        rows,
        requests: requests.clone(),
    });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = SupabaseClient::new(format!("http://{addr}"), SecretString::from("service".to_string())).unwrap();
    (client, requests)
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 7).unwrap()
}

#[tokio::test]
async fn test_upsert_creates_digest_when_day_is_empty() {
    let (client, requests) = serve(json!([])).await;
    let repo = DigestRepository::new(client);

    let outcome = repo
        .upsert_daily("u1", day(), "# Digest", &["a1".to_string(), "a2".to_string()], &[])
        .await
        .unwrap();
    assert_eq!(outcome, DigestOutcome::Created);

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 2);

    let lookup = &requests[0];
    assert_eq!(lookup.method, Method::GET);
    assert_eq!(lookup.path, "/rest/v1/tech_watch_digests");
    assert!(lookup.query.contains("user_id=eq.u1"));

    let insert = &requests[1];
    assert_eq!(insert.method, Method::POST);
    assert_eq!(insert.path, "/rest/v1/tech_watch_digests");
    let rows: Value = serde_json::from_str(&insert.body).unwrap();
    assert_eq!(rows[0]["user_id"], "u1");
    assert_eq!(rows[0]["period_start"], "2025-03-07T00:00:00Z");
    assert_eq!(rows[0]["period_end"], "2025-03-07T23:59:59Z");
    assert_eq!(rows[0]["summary"], "# Digest");
    assert_eq!(rows[0]["article_ids"], json!(["a1", "a2"]));
}

#[tokio::test]
async fn test_upsert_merges_ids_into_existing_digest() {
    let (client, requests) = serve(json!([{ "id": "d-1", "article_ids": ["a1", "a2"] }])).await;
    let repo = DigestRepository::new(client);

    let outcome = repo
        .upsert_daily("u1", day(), "# Later run", &["a2".to_string(), "a3".to_string()], &[])
        .await
        .unwrap();
    assert_eq!(outcome, DigestOutcome::Updated);

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, Method::GET);

    let update = &requests[1];
    assert_eq!(update.method, Method::PATCH);
    assert_eq!(update.query, "id=eq.d-1");
    let patch: Value = serde_json::from_str(&update.body).unwrap();
    assert_eq!(patch["article_ids"], json!(["a1", "a2", "a3"]));
    assert_eq!(patch["summary"], "# Later run");
}

#[tokio::test]
async fn test_existing_digest_with_null_ids_takes_new_ids() {
    let (client, requests) = serve(json!([{ "id": "d-1", "article_ids": null }])).await;
    let repo = DigestRepository::new(client);

    let outcome = repo
        .upsert_daily("u1", day(), "# Digest", &["a1".to_string()], &[])
        .await
        .unwrap();
    assert_eq!(outcome, DigestOutcome::Updated);

    let requests = requests.lock().unwrap();
    let patch: Value = serde_json::from_str(&requests[1].body).unwrap();
    assert_eq!(patch["article_ids"], json!(["a1"]));
}

#[tokio::test]
async fn test_latest_reads_digest_rows() {
    let (client, requests) = serve(json!([{
        "id": "d-1",
        "user_id": "u1",
        "period_start": "2025-03-07T00:00:00Z",
        "period_end": "2025-03-07T23:59:59Z",
        "summary": "# Digest",
        "article_ids": ["a1"],
        "key_topics": null
    }]))
    .await;

    let digests = DigestRepository::new(client).latest(3).await.unwrap();
    assert_eq!(digests.len(), 1);
    assert_eq!(digests[0].id, "d-1");
    assert_eq!(digests[0].article_ids, vec!["a1"]);
    assert!(digests[0].key_topics.is_empty());

    let query = requests.lock().unwrap()[0].query.clone();
    assert!(query.contains("order=period_start.desc"));
    assert!(query.contains("limit=3"));
}
