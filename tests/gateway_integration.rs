//! End-to-end tests for the HTTP surface.
//!
//! The remote TESS API is replaced by a small axum app bound to an
//! ephemeral port that records every request it receives.

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use axum_test::TestServer;
use serde_json::{Value, json};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tess_connector::AppState;
use tess_connector::backend::BackendClient;
use tess_connector::config::BackendConfig;
use tess_connector::server::build_app;
use tess_connector::tools::{CapabilityRouter, ToolName};

// =============================================================================
// Mock backend
// =============================================================================

#[derive(Debug, Clone)]
struct Recorded {
    method: Method,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    body: Bytes,
}

impl Recorded {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }

    fn query_pairs(&self) -> Vec<(String, String)> {
        self.query
            .as_deref()
            .unwrap_or_default()
            .split('&')
            .filter(|s| !s.is_empty())
            .filter_map(|pair| pair.split_once('='))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

#[derive(Clone)]
struct MockBackend {
    requests: Arc<Mutex<Vec<Recorded>>>,
    status: StatusCode,
    body: Arc<String>,
}

async fn record(
    State(mock): State<MockBackend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    mock.requests.lock().unwrap().push(Recorded {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body,
    });
    (
        mock.status,
        [(header::CONTENT_TYPE, "application/json")],
        mock.body.as_str().to_owned(),
    )
        .into_response()
}

struct Harness {
    server: TestServer,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl Harness {
    async fn new(status: StatusCode, body: &str) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let mock = MockBackend {
            requests: Arc::clone(&requests),
            status,
            body: Arc::new(body.to_string()),
        };

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().fallback(record).with_state(mock);
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let base_url = format!("http://{addr}/api");
        let backend = BackendConfig {
            base_url,
            api_key: "test-token".to_string(),
        };
        let client = BackendClient::from_config(&backend).unwrap();
        let state = AppState {
            router: Arc::new(CapabilityRouter::new(Arc::new(client))),
        };

        Self {
            server: TestServer::new(build_app(state)).unwrap(),
            requests,
        }
    }

    async fn ok() -> Self {
        Self::new(StatusCode::OK, r#"{"data":[{"id":1}],"total":1}"#).await
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

/// Smallest valid parameters for `tool`, plus the request it must produce.
fn minimal_call(tool: ToolName, upload: &Path) -> (Value, Method, &'static str) {
    match tool {
        ToolName::ListAgents => (json!({}), Method::GET, "/api/agents"),
        ToolName::GetAgent => (json!({"agent_id": "a1"}), Method::GET, "/api/agents/a1"),
        ToolName::ExecuteAgent => (
            json!({"agent_id": "a1", "messages": [{"role": "user", "content": "Olá"}]}),
            Method::POST,
            "/api/agents/a1/execute",
        ),
        ToolName::ListAgentFiles => (json!({"agent_id": "a1"}), Method::GET, "/api/agents/a1/files"),
        ToolName::LinkAgentFile => (
            json!({"agent_id": "a1", "file_id": 5}),
            Method::POST,
            "/api/agents/a1/files",
        ),
        ToolName::UnlinkAgentFile => (
            json!({"agent_id": "a1", "file_id": 5}),
            Method::DELETE,
            "/api/agents/a1/files/5",
        ),
        ToolName::ListFiles => (json!({}), Method::GET, "/api/files"),
        ToolName::GetFile => (json!({"file_id": 5}), Method::GET, "/api/files/5"),
        ToolName::UploadFile => (json!({"file_path": upload}), Method::POST, "/api/files"),
        ToolName::DeleteFile => (json!({"file_id": 5}), Method::DELETE, "/api/files/5"),
    }
}

fn upload_source(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("notes.txt");
    std::fs::write(&path, "conteúdo de teste").unwrap();
    path
}

// =============================================================================
// Surface
// =============================================================================

#[tokio::test]
async fn health_returns_ok() {
    let harness = Harness::ok().await;

    let response = harness.server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!({"status": "ok"}));
}

#[tokio::test]
async fn capabilities_lists_catalog_without_backend_call() {
    let harness = Harness::ok().await;

    let response = harness.server.get("/capabilities").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["name"], "TessAIConnector");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    let tools = body["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 10);
    assert_eq!(tools[0]["name"], "listar_agentes_tess");
    assert_eq!(tools[0]["parameters"]["page"]["type"], "number");
    assert!(harness.requests().is_empty());
}

#[tokio::test]
async fn every_tool_succeeds_with_minimal_payload() {
    let harness = Harness::ok().await;
    let dir = tempfile::tempdir().unwrap();
    let upload = upload_source(dir.path());

    for tool in ToolName::ALL {
        let (params, method, path) = minimal_call(tool, &upload);

        let response = harness
            .server
            .post(&format!("/tools/{tool}"))
            .json(&params)
            .await;

        assert_eq!(response.status_code(), StatusCode::OK, "{tool}");
        let body = response.json::<Value>();
        let content = body["content"].as_array().unwrap();
        assert_eq!(content.len(), 1, "{tool}");
        assert_eq!(content[0]["type"], "text");
        let text: Value = serde_json::from_str(content[0]["text"].as_str().unwrap()).unwrap();
        assert_eq!(text, json!({"data": [{"id": 1}], "total": 1}), "{tool}");

        let last = harness.requests().pop().unwrap();
        assert_eq!(last.method, method, "{tool}");
        assert_eq!(last.path, path, "{tool}");
    }

    assert_eq!(harness.requests().len(), ToolName::ALL.len());
}

#[tokio::test]
async fn unknown_tool_is_404_and_never_reaches_backend() {
    let harness = Harness::ok().await;

    let response = harness
        .server
        .post("/tools/does_not_exist")
        .json(&json!({"agent_id": "a1"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body = response.json::<Value>();
    assert_eq!(body["error"], "Ferramenta \"does_not_exist\" não encontrada");
    assert!(harness.requests().is_empty());
}

#[tokio::test]
async fn malformed_json_is_rejected_before_dispatch() {
    let harness = Harness::ok().await;

    let response = harness
        .server
        .post("/tools/listar_agentes_tess")
        .bytes(Bytes::from_static(b"{oops"))
        .content_type("application/json")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(harness.requests().is_empty());
}

#[tokio::test]
async fn empty_body_uses_defaults() {
    let harness = Harness::ok().await;

    let response = harness.server.post("/tools/listar_arquivos_tess").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let sent = harness.requests().pop().unwrap();
    assert_eq!(sent.path, "/api/files");
    assert!(sent.query_pairs().contains(&("page".to_string(), "1".to_string())));
}

// =============================================================================
// Outbound request shape
// =============================================================================

#[tokio::test]
async fn listing_tools_default_pagination() {
    let harness = Harness::ok().await;
    let expected = vec![
        ("page".to_string(), "1".to_string()),
        ("per_page".to_string(), "15".to_string()),
    ];

    for (tool, params) in [
        ("listar_agentes_tess", json!({})),
        ("listar_arquivos_tess", json!({})),
        ("listar_arquivos_agente_tess", json!({"agent_id": "a1"})),
    ] {
        harness.server.post(&format!("/tools/{tool}")).json(&params).await;
        let sent = harness.requests().pop().unwrap();
        assert_eq!(sent.query_pairs(), expected, "{tool}");
    }
}

#[tokio::test]
async fn listing_tools_forward_explicit_pagination() {
    let harness = Harness::ok().await;

    harness
        .server
        .post("/tools/listar_agentes_tess")
        .json(&json!({"page": 4, "per_page": 100}))
        .await;

    let sent = harness.requests().pop().unwrap();
    assert_eq!(
        sent.query_pairs(),
        vec![
            ("page".to_string(), "4".to_string()),
            ("per_page".to_string(), "100".to_string()),
        ]
    );
}

#[tokio::test]
async fn execute_agent_sends_full_payload_with_defaults() {
    let harness = Harness::ok().await;

    harness
        .server
        .post("/tools/executar_agente_tess")
        .json(&json!({
            "agent_id": "42",
            "messages": [{"role": "user", "content": "Resuma o contrato"}]
        }))
        .await;

    let sent = harness.requests().pop().unwrap();
    assert_eq!(sent.path, "/api/agents/42/execute");
    assert_eq!(
        sent.json(),
        json!({
            "temperature": "0.5",
            "model": "tess-ai-light",
            "messages": [{"role": "user", "content": "Resuma o contrato"}],
            "tools": "no-tools",
            "waitExecution": false,
            "file_ids": []
        })
    );
}

#[tokio::test]
async fn execute_agent_forwards_caller_overrides() {
    let harness = Harness::ok().await;

    harness
        .server
        .post("/tools/executar_agente_tess")
        .json(&json!({
            "agent_id": "42",
            "messages": [],
            "temperature": "0.9",
            "model": "tess-ai-pro",
            "tools": "internet",
            "file_ids": [7, 8],
            "waitExecution": true
        }))
        .await;

    let payload = harness.requests().pop().unwrap().json();
    assert_eq!(payload["temperature"], "0.9");
    assert_eq!(payload["model"], "tess-ai-pro");
    assert_eq!(payload["tools"], "internet");
    assert_eq!(payload["file_ids"], json!([7, 8]));
    assert_eq!(payload["waitExecution"], true);
}

#[tokio::test]
async fn link_file_posts_file_id() {
    let harness = Harness::ok().await;

    harness
        .server
        .post("/tools/vincular_arquivo_agente_tess")
        .json(&json!({"agent_id": "a1", "file_id": 5}))
        .await;

    let sent = harness.requests().pop().unwrap();
    assert_eq!(sent.json(), json!({"file_id": 5}));
}

#[tokio::test]
async fn every_request_carries_bearer_token() {
    let harness = Harness::ok().await;

    harness.server.post("/tools/obter_arquivo_tess").json(&json!({"file_id": 1})).await;

    let sent = harness.requests().pop().unwrap();
    assert_eq!(sent.headers[header::AUTHORIZATION], "Bearer test-token");
    assert_eq!(sent.headers[header::CONTENT_TYPE], "application/json");
}

#[tokio::test]
async fn upload_sends_multipart_form() {
    let harness = Harness::ok().await;
    let dir = tempfile::tempdir().unwrap();
    let upload = upload_source(dir.path());

    let response = harness
        .server
        .post("/tools/enviar_arquivo_tess")
        .json(&json!({"file_path": upload}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let sent = harness.requests().pop().unwrap();
    let content_type = sent.headers[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data; boundary="));
    assert_eq!(sent.headers[header::AUTHORIZATION], "Bearer test-token");

    let body = String::from_utf8_lossy(&sent.body);
    assert!(body.contains(r#"name="file"; filename="notes.txt""#));
    assert!(body.contains("conteúdo de teste"));
    assert!(body.contains(r#"name="purpose""#));
    assert!(body.contains("assistants"));
}

#[tokio::test]
async fn upload_of_missing_file_never_calls_backend() {
    let harness = Harness::ok().await;
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.pdf");

    let response = harness
        .server
        .post("/tools/enviar_arquivo_tess")
        .json(&json!({"file_path": missing}))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json::<Value>();
    assert_eq!(body["error"], "Falha ao executar ferramenta enviar_arquivo_tess");
    assert!(
        body["details"]
            .as_str()
            .unwrap()
            .contains(&missing.display().to_string())
    );
    assert!(harness.requests().is_empty());
}

#[tokio::test]
async fn repeated_reads_hit_backend_each_time() {
    let harness = Harness::ok().await;

    for (tool, params) in [
        ("obter_agente_tess", json!({"agent_id": "a1"})),
        ("obter_arquivo_tess", json!({"file_id": 3})),
        ("listar_agentes_tess", json!({"page": 2})),
        ("listar_arquivos_tess", json!({})),
    ] {
        let before = harness.requests().len();
        harness.server.post(&format!("/tools/{tool}")).json(&params).await;
        harness.server.post(&format!("/tools/{tool}")).json(&params).await;

        let requests = harness.requests();
        assert_eq!(requests.len(), before + 2, "{tool}");
        let (first, second) = (&requests[before], &requests[before + 1]);
        assert_eq!(first.method, second.method);
        assert_eq!(first.path, second.path);
        assert_eq!(first.query, second.query);
        assert_eq!(first.body, second.body);
    }
}

#[tokio::test]
async fn identifiers_cannot_escape_their_path_segment() {
    let harness = Harness::ok().await;

    let response = harness
        .server
        .post("/tools/remover_arquivo_agente_tess")
        .json(&json!({"agent_id": "x/../..", "file_id": 5}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let sent = harness.requests().pop().unwrap();
    assert_eq!(sent.method, Method::DELETE);
    assert_eq!(sent.path, "/api/agents/x%2F..%2F../files/5");

    harness
        .server
        .post("/tools/obter_agente_tess")
        .json(&json!({"agent_id": "a?b#c"}))
        .await;
    let sent = harness.requests().pop().unwrap();
    assert_eq!(sent.path, "/api/agents/a%3Fb%23c");
    assert_eq!(sent.query, None);
}

#[tokio::test]
async fn dot_segment_identifier_never_calls_backend() {
    let harness = Harness::ok().await;

    let response = harness
        .server
        .post("/tools/remover_arquivo_agente_tess")
        .json(&json!({"agent_id": "..", "file_id": 5}))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json::<Value>();
    assert!(body["details"].as_str().unwrap().contains("Identificador inválido"));
    assert!(harness.requests().is_empty());
}

#[tokio::test]
async fn missing_required_parameter_never_calls_backend() {
    let harness = Harness::ok().await;

    let response = harness
        .server
        .post("/tools/remover_arquivo_agente_tess")
        .json(&json!({"agent_id": "a1"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json::<Value>();
    assert!(body["details"].as_str().unwrap().contains("file_id"));
    assert!(harness.requests().is_empty());
}

// =============================================================================
// Backend responses
// =============================================================================

#[tokio::test]
async fn backend_failure_becomes_500_envelope_for_every_tool() {
    let harness = Harness::new(
        StatusCode::UNPROCESSABLE_ENTITY,
        r#"{"message":"Invalid agent"}"#,
    )
    .await;
    let dir = tempfile::tempdir().unwrap();
    let upload = upload_source(dir.path());

    for tool in ToolName::ALL {
        let (params, _, _) = minimal_call(tool, &upload);

        let response = harness
            .server
            .post(&format!("/tools/{tool}"))
            .json(&params)
            .await;

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR, "{tool}");
        let body = response.json::<Value>();
        assert!(body["error"].as_str().unwrap().contains(tool.as_str()));
        let details = body["details"].as_str().unwrap();
        assert!(details.contains("Request failed with status code 422"), "{details}");
        assert!(details.contains("Invalid agent"), "{details}");
    }
}

#[tokio::test]
async fn failure_details_name_the_target() {
    let harness = Harness::new(StatusCode::NOT_FOUND, r#"{"message":"not found"}"#).await;

    let response = harness
        .server
        .post("/tools/obter_agente_tess")
        .json(&json!({"agent_id": "999"}))
        .await;

    let body = response.json::<Value>();
    assert!(
        body["details"]
            .as_str()
            .unwrap()
            .starts_with("Falha ao obter agente 999: Request failed with status code 404")
    );
}

#[tokio::test]
async fn non_json_success_body_is_wrapped_as_string() {
    let harness = Harness::new(StatusCode::OK, "deleted").await;

    let response = harness
        .server
        .post("/tools/excluir_arquivo_tess")
        .json(&json!({"file_id": 5}))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["content"][0]["text"], "\"deleted\"");
}

#[tokio::test]
async fn success_text_is_backend_body_unchanged() {
    let raw = r#"{"zeta":1,"alpha":{"y":2,"b":3},"id":10}"#;
    let harness = Harness::new(StatusCode::OK, raw).await;

    let response = harness
        .server
        .post("/tools/obter_agente_tess")
        .json(&json!({"agent_id": "a1"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["content"][0]["text"], raw);
}

#[tokio::test]
async fn unreachable_backend_is_500_envelope() {
    // Port 9 (discard) is not expected to accept connections.
    let client = BackendClient::new("http://127.0.0.1:9/api", "k").unwrap();
    let router = CapabilityRouter::new(Arc::new(client));

    let err = router
        .dispatch("listar_agentes_tess", json!({}))
        .await
        .unwrap_err();

    let response = axum::response::IntoResponse::into_response(err);
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
