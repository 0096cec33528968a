//! End-to-end: real HTTP server, sqlite session store, webhook receiver.

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use weekly_budget::adapters::http::{AppState, HttpServer};
use weekly_budget::adapters::integrations::WebhookNotifier;
use weekly_budget::adapters::persistence::open_store;
use weekly_budget::usecases::{BudgetAgent, LedgerService};

struct TestServer {
    base: String,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    async fn start(store_url: &str) -> Self {
        let store = open_store(store_url).await.expect("open store");
        let ledger = Arc::new(LedgerService::new(store, Duration::from_secs(3600)));
        let notifier = Arc::new(WebhookNotifier::new(Duration::from_secs(5)).unwrap());
        let agent = Arc::new(BudgetAgent::new(ledger, notifier));

        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let server = HttpServer::bind(addr, AppState { agent }).await.unwrap();
        let local = server.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            server
                .run(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .unwrap();
        });

        Self {
            base: format!("http://{}", local),
            shutdown_tx: Some(shutdown_tx),
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

type Push = (Option<String>, Value);

async fn receive(
    State(tx): State<mpsc::UnboundedSender<Push>>,
    headers: HeaderMap,
    body: String,
) -> StatusCode {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let _ = tx.send((auth, serde_json::from_str(&body).unwrap_or(Value::Null)));
    StatusCode::NO_CONTENT
}

async fn start_webhook_receiver() -> (String, mpsc::UnboundedReceiver<Push>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let app = Router::new().route("/push", axum::routing::post(receive)).with_state(tx);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}/push", addr), rx)
}

fn send_body(id: u64, user: &str, texts: &[&str], push: Option<Value>) -> Value {
    let parts: Vec<Value> = texts
        .iter()
        .map(|t| json!({"kind": "text", "text": t}))
        .collect();
    let mut body = json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "message/send",
        "params": {
            "message": {
                "kind": "message",
                "role": "user",
                "parts": parts,
                "metadata": {"sender": {"id": user}}
            }
        }
    });
    if let Some(push) = push {
        body["params"]["configuration"] = json!({ "pushNotificationConfig": push });
    }
    body
}

async fn post(client: &reqwest::Client, base: &str, body: &Value) -> Value {
    let res = client
        .post(format!("{}/a2a/budget", base))
        .json(body)
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success(), "status {}", res.status());
    res.json().await.unwrap()
}

fn reply(v: &Value) -> String {
    v["result"]["status"]["message"]["parts"][0]["text"]
        .as_str()
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn test_budget_flow_over_http_with_sqlite_store() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("budget.db").display());
    let server = TestServer::start(&url).await;
    let client = reqwest::Client::new();

    let health: Value = client
        .get(format!("{}/health", server.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health, json!({"status": "healthy", "agent": "weekly_budget"}));

    let v = post(
        &client,
        &server.base,
        &send_body(
            1,
            "alice",
            &[
                "Add expense 50 for groceries",
                "add expense ??? for taxi",
                "Add income 200 for salary",
            ],
            None,
        ),
    )
    .await;
    let text = reply(&v);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "🧾 Added expense of ₦50 for groceries");
    assert!(lines[1].starts_with("Could not detect amount"));
    assert_eq!(lines[2], "💰 Added income of ₦200 for salary");

    let v = post(&client, &server.base, &send_body(2, "alice", &["Show summary"], None)).await;
    assert_eq!(
        reply(&v),
        "📅 Weekly Summary → Income ₦200, Expenses ₦50, Balance ₦150 💪"
    );

    // another sender has an empty week
    let v = post(&client, &server.base, &send_body(3, "bob", &["summary"], None)).await;
    assert_eq!(reply(&v), "No transactions recorded this week yet.");
}

#[tokio::test]
async fn test_push_notification_reaches_webhook() {
    let server = TestServer::start("memory://").await;
    let (hook_url, mut pushes) = start_webhook_receiver().await;
    let client = reqwest::Client::new();

    let push = json!({
        "url": hook_url,
        "authentication": {"schemes": ["Bearer"], "credentials": "s3cret"}
    });
    let v = post(
        &client,
        &server.base,
        &send_body(7, "carol", &["add expense 15 for coffee"], Some(push)),
    )
    .await;

    let (auth, body) = tokio::time::timeout(Duration::from_secs(5), pushes.recv())
        .await
        .expect("push not received")
        .unwrap();
    assert_eq!(auth.as_deref(), Some("Bearer s3cret"));
    assert_eq!(body, v["result"]);
}

#[tokio::test]
async fn test_unreachable_webhook_is_internal_error() {
    let server = TestServer::start("memory://").await;
    let dead = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_addr = dead.local_addr().unwrap();
    drop(dead);

    let body = send_body(
        9,
        "dave",
        &["add income 1"],
        Some(json!({"url": format!("http://{}/push", dead_addr)})),
    );
    let res = reqwest::Client::new()
        .post(format!("{}/a2a/budget", server.base))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    let v: Value = res.json().await.unwrap();
    assert_eq!(v["error"]["code"], -32603);
    assert_eq!(v["id"], 9);
}
