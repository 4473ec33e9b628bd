use super::*;
use std::{collections::HashMap, sync::Arc};

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use shared::domain::DocenteFields;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Debug, Clone)]
struct CapturedRequest {
    method: &'static str,
    query: HashMap<String, String>,
    api_key: Option<String>,
    authorization: Option<String>,
    prefer: Option<String>,
    body: Option<Value>,
}

#[derive(Clone, Default)]
struct MockState {
    rows: Arc<Mutex<Vec<Value>>>,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    reject_with: Option<StatusCode>,
}

impl MockState {
    async fn capture(
        &self,
        method: &'static str,
        query: HashMap<String, String>,
        headers: &HeaderMap,
        body: Option<Value>,
    ) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };
        self.requests.lock().await.push(CapturedRequest {
            method,
            query,
            api_key: header("apikey"),
            authorization: header("authorization"),
            prefer: header("prefer"),
            body,
        });
    }

    fn rejection(&self) -> Option<Response> {
        self.reject_with.map(|status| {
            (
                status,
                Json(json!({"code": "42501", "message": "permission denied for table Docentes"})),
            )
                .into_response()
        })
    }
}

async fn handle_list(
    State(state): State<MockState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    state.capture("GET", query, &headers, None).await;
    if let Some(rejection) = state.rejection() {
        return rejection;
    }
    Json(Value::Array(state.rows.lock().await.clone())).into_response()
}

async fn handle_insert(
    State(state): State<MockState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.capture("POST", query, &headers, Some(body)).await;
    state
        .rejection()
        .unwrap_or_else(|| StatusCode::CREATED.into_response())
}

async fn handle_update(
    State(state): State<MockState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.capture("PATCH", query, &headers, Some(body)).await;
    state
        .rejection()
        .unwrap_or_else(|| StatusCode::NO_CONTENT.into_response())
}

async fn spawn_rest_server(state: MockState) -> Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .route(
            "/rest/v1/Docentes",
            get(handle_list).post(handle_insert).patch(handle_update),
        )
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

fn fields(name: &str, regime: i64, order: i64) -> DocenteFields {
    DocenteFields {
        name: name.to_string(),
        regime,
        order,
    }
}

#[test]
fn table_url_appends_rest_prefix_and_table() {
    let store = RestRecordStore::new("https://abc.supabase.co", "key", "Docentes").expect("url");
    assert_eq!(
        store.table_url().as_str(),
        "https://abc.supabase.co/rest/v1/Docentes"
    );

    let store = RestRecordStore::new("http://localhost:54321/", "key", "Docentes").expect("url");
    assert_eq!(
        store.table_url().as_str(),
        "http://localhost:54321/rest/v1/Docentes"
    );

    let store = RestRecordStore::new("http://gateway/project", "key", "Docentes").expect("url");
    assert_eq!(
        store.table_url().as_str(),
        "http://gateway/project/rest/v1/Docentes"
    );
}

#[test]
fn rejects_unparseable_project_url() {
    let err = RestRecordStore::new("not a url", "key", "Docentes")
        .err()
        .expect("must fail");
    assert!(matches!(err, StoreError::InvalidUrl(_)));
}

#[tokio::test]
async fn list_requests_active_rows_in_identifier_order() {
    let state = MockState::default();
    state.rows.lock().await.extend([
        json!({
            "ID_Docente": 1, "Nome": "Ana", "Regime": 40, "Ordem": 1,
            "created_at": "2024-10-01T12:00:00+00:00",
            "updated_at": "2024-10-01T12:00:00+00:00",
            "is_deleted": false
        }),
        json!({
            "ID_Docente": 4, "Nome": "Juliana", "Regime": 20, "Ordem": 2,
            "created_at": "2024-10-01T12:00:00+00:00",
            "updated_at": "2024-10-03T09:15:00.5+00:00",
            "is_deleted": false
        }),
    ]);
    let server_url = spawn_rest_server(state.clone()).await.expect("spawn server");
    let store = RestRecordStore::new(&server_url, "anon-key", "Docentes").expect("store");

    let rows = store.list_active().await.expect("list");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, DocenteId(1));
    assert_eq!(rows[1].name, "Juliana");
    assert_eq!(rows[1].regime, 20);

    let requests = state.requests.lock().await;
    let request = &requests[0];
    assert_eq!(request.method, "GET");
    assert_eq!(request.query.get("select").map(String::as_str), Some("*"));
    assert_eq!(
        request.query.get("is_deleted").map(String::as_str),
        Some("neq.true")
    );
    assert_eq!(
        request.query.get("order").map(String::as_str),
        Some("ID_Docente.asc")
    );
    assert_eq!(request.api_key.as_deref(), Some("anon-key"));
    assert_eq!(request.authorization.as_deref(), Some("Bearer anon-key"));
}

#[tokio::test]
async fn insert_posts_single_row_with_deleted_false() {
    let state = MockState::default();
    let server_url = spawn_rest_server(state.clone()).await.expect("spawn server");
    let store = RestRecordStore::new(&server_url, "anon-key", "Docentes").expect("store");

    store
        .insert(&NewDocente::from(fields("Maria", 40, 1)))
        .await
        .expect("insert");

    let requests = state.requests.lock().await;
    let request = &requests[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.prefer.as_deref(), Some("return=minimal"));
    assert_eq!(
        request.body,
        Some(json!([{"Nome": "Maria", "Regime": 40, "Ordem": 1, "is_deleted": false}]))
    );
}

#[tokio::test]
async fn update_patches_only_the_matched_identifier() {
    let state = MockState::default();
    let server_url = spawn_rest_server(state.clone()).await.expect("spawn server");
    let store = RestRecordStore::new(&server_url, "anon-key", "Docentes").expect("store");

    store
        .update(DocenteId(9), &DocentePatch::soft_delete())
        .await
        .expect("soft delete");
    store
        .update(
            DocenteId(9),
            &DocentePatch::fields(fields("Maria Silva", 40, 1)),
        )
        .await
        .expect("update");

    let requests = state.requests.lock().await;
    assert_eq!(requests.len(), 2);
    for request in requests.iter() {
        assert_eq!(request.method, "PATCH");
        assert_eq!(
            request.query.get("ID_Docente").map(String::as_str),
            Some("eq.9")
        );
    }
    assert_eq!(requests[0].body, Some(json!({"is_deleted": true})));
    assert_eq!(
        requests[1].body,
        Some(json!({"Nome": "Maria Silva", "Regime": 40, "Ordem": 1}))
    );
}

#[tokio::test]
async fn non_success_status_becomes_rejection() {
    let state = MockState {
        reject_with: Some(StatusCode::FORBIDDEN),
        ..MockState::default()
    };
    let server_url = spawn_rest_server(state).await.expect("spawn server");
    let store = RestRecordStore::new(&server_url, "anon-key", "Docentes").expect("store");

    let err = store.list_active().await.expect_err("must fail");
    match err {
        StoreError::Rejected { status, body } => {
            assert_eq!(status, 403);
            assert!(body.contains("permission denied"), "unexpected body: {body}");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let err = store
        .update(DocenteId(1), &DocentePatch::soft_delete())
        .await
        .expect_err("must fail");
    assert!(matches!(err, StoreError::Rejected { status: 403, .. }));
}

#[tokio::test]
async fn unreachable_store_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");

    let store = RestRecordStore::new(&format!("http://{addr}"), "anon-key", "Docentes")
        .expect("store");
    let err = store.list_active().await.expect_err("must fail");
    assert!(matches!(err, StoreError::Transport(_)));
}
