//! Integration tests for the HTTP tool server and the `Tool` extension trait.
//!
//! These start real servers on free ports and call them with reqwest:
//! built-in tools, custom Rust tools, error mapping, and the remote tool
//! catalog proxy between two servers.

use anyhow::Result;
use async_trait::async_trait;
use prospector::config::Config;
use prospector::server::run_server_with_extensions;
use prospector::traits::{Tool, ToolContext, ToolRegistry};
use serde_json::{json, Value};
use std::path::Path;
use tempfile::TempDir;

const CONTACTS_CSV: &str = "\
Apollo Contact Id,First Name,Last Name,Email,Email Status,Title,Seniority,Country,Company Name,Industry,Keywords,Technologies,# Employees,Stage,Email Sent,Replied
c1,Ana,Rojas,ana@pagos.co,Verified,CEO,c_suite,Colombia,Pagos SA,Fintech,\"fintech, payments\",Salesforce,120,Cold,,
c2,Luis,Gomez,luis@pagos.co,Unverified,Analyst,entry,Colombia,Pagos SA,Fintech,fintech,,40,Cold,true,
c3,Maria,Diaz,,,CFO,,Mexico,Viajes MX,Travel,travel,,15,Interested,,
c4,Pedro,Ruiz,pedro@saasly.io,Verified,VP Sales,vp,Mexico,Saasly,Software,saas,,300,Cold,,true
";

// ─── Test Tool ──────────────────────────────────────────────────────

/// Counts executives through `ToolContext`.
struct CountExecutivesTool;

#[async_trait]
impl Tool for CountExecutivesTool {
    fn name(&self) -> &str {
        "count_executives"
    }

    fn description(&self) -> &str {
        "Count executive contacts, optionally in one country"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "country": { "type": "string" }
            }
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let country = params["country"].as_str();
        let contacts = ctx.contacts().await?;
        let count = contacts
            .iter()
            .filter(|c| c.is_executive)
            .filter(|c| country.map_or(true, |want| c.country.as_deref() == Some(want)))
            .count();
        Ok(json!({ "executives": count }))
    }
}

// ─── Helpers ────────────────────────────────────────────────────────

fn test_config(data_path: &Path, port: u16, remote_port: Option<u16>) -> Config {
    let mut config_content = format!(
        r#"
[data]
path = "{}"

[server]
bind = "127.0.0.1:{}"
cors_origins = ["*"]

[retrieval]
default_limit = 3
"#,
        data_path.display(),
        port
    );
    if let Some(remote) = remote_port {
        config_content.push_str(&format!(
            "\n[remote_tools]\nurl = \"http://127.0.0.1:{}\"\ntimeout_secs = 5\n",
            remote
        ));
    }
    toml::from_str(&config_content).unwrap()
}

fn write_contacts(tmp: &TempDir) -> std::path::PathBuf {
    let path = tmp.path().join("contacts.csv");
    std::fs::write(&path, CONTACTS_CSV).unwrap();
    path
}

fn find_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

async fn wait_for_server(port: u16) {
    let client = reqwest::Client::new();
    let url = format!("http://127.0.0.1:{}/health", port);
    for _ in 0..50 {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        if let Ok(resp) = client.get(&url).send().await {
            if resp.status().is_success() {
                return;
            }
        }
    }
    panic!("Server did not become ready within 5 seconds");
}

async fn start_server(cfg: Config, tools: ToolRegistry) -> tokio::task::JoinHandle<()> {
    let port: u16 = cfg
        .server
        .bind
        .rsplit(':')
        .next()
        .and_then(|p| p.parse().ok())
        .unwrap();
    let handle = tokio::spawn(async move {
        run_server_with_extensions(&cfg, tools).await.ok();
    });
    wait_for_server(port).await;
    handle
}

async fn call_tool(port: u16, name: &str, params: Value) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .post(format!("http://127.0.0.1:{}/tools/{}", port, name))
        .json(&params)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

fn tool_names(body: &Value) -> Vec<&str> {
    body["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect()
}

// ─── Tests ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_health_and_builtin_tools() {
    let tmp = TempDir::new().unwrap();
    let port = find_free_port();
    let cfg = test_config(&write_contacts(&tmp), port, None);
    let server = start_server(cfg, ToolRegistry::new()).await;
    let client = reqwest::Client::new();

    for path in ["/", "/health"] {
        let body: Value = client
            .get(format!("http://127.0.0.1:{}{}", port, path))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "prospector-api");
        assert!(body["version"].is_string());
    }

    let body: Value = client
        .get(format!("http://127.0.0.1:{}/tools/list", port))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        tool_names(&body),
        vec!["query_contacts", "get_contact_stats", "vector_search_contacts"]
    );
    assert!(body["tools"]
        .as_array()
        .unwrap()
        .iter()
        .all(|t| t["builtin"] == true && t.get("remote").is_none()));

    let (status, body) = call_tool(port, "query_contacts", json!({ "is_executive": true })).await;
    assert_eq!(status, 200);
    assert_eq!(body["result"]["total"], 2);
    assert_eq!(body["result"]["contacts"][0]["id"], "c1");
    assert_eq!(body["result"]["contacts"][1]["id"], "c3");

    // Default limit comes from [retrieval].
    let (_, body) = call_tool(port, "query_contacts", json!({})).await;
    assert_eq!(body["result"]["total"], 4);
    assert_eq!(body["result"]["returned"], 3);

    let (status, body) = call_tool(
        port,
        "query_contacts",
        json!({
            "where_clauses": [
                { "field": "industry", "operator": "equals", "value": "Fintech" },
                { "field": "contactState", "operator": "equals", "value": "SENT" }
            ]
        }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["result"]["contacts"][0]["id"], "c2");
    assert_eq!(body["result"]["total"], 1);

    let (status, body) =
        call_tool(port, "get_contact_stats", json!({ "group_by": "country" })).await;
    assert_eq!(status, 200);
    assert_eq!(body["result"]["total"], 4);
    assert_eq!(body["result"]["breakdown"]["Colombia"], 2);
    assert_eq!(body["result"]["breakdown"]["Mexico"], 2);

    let (status, body) = call_tool(
        port,
        "vector_search_contacts",
        json!({ "query": "saas founders", "top_k": 5 }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["result"]["contacts"][0]["id"], "c4");
    assert_eq!(body["result"]["extractedKeywords"], json!(["saas"]));

    server.abort();
}

#[tokio::test]
async fn test_stats_accepts_empty_body() {
    let tmp = TempDir::new().unwrap();
    let port = find_free_port();
    let cfg = test_config(&write_contacts(&tmp), port, None);
    let server = start_server(cfg, ToolRegistry::new()).await;

    let resp = reqwest::Client::new()
        .post(format!("http://127.0.0.1:{}/tools/get_contact_stats", port))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["result"]["total"], 4);
    assert!(body["result"]["breakdown"].is_null());

    server.abort();
}

#[tokio::test]
async fn test_error_contract() {
    let tmp = TempDir::new().unwrap();
    let port = find_free_port();
    let cfg = test_config(&write_contacts(&tmp), port, None);
    let server = start_server(cfg, ToolRegistry::new()).await;

    let (status, body) = call_tool(port, "vector_search_contacts", json!({})).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "bad_request");


    let (status, body) = call_tool(port, "query_contacts", json!({ "limit": "ten" })).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "bad_request");

    let (status, body) = call_tool(port, "query_contacts", json!({ "contact_state": "WARM" })).await;
    assert_eq!(status, 400);
    assert!(body["error"]["message"].as_str().unwrap().contains("contact_state"));

    let (status, body) = call_tool(port, "chat", json!({})).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], "not_found");

    let resp = reqwest::Client::new()
        .post(format!("http://127.0.0.1:{}/remote/refresh", port))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    server.abort();
}

#[tokio::test]
async fn test_blank_search_query_is_empty_result() {
    let tmp = TempDir::new().unwrap();
    let port = find_free_port();
    let cfg = test_config(&write_contacts(&tmp), port, None);
    let server = start_server(cfg, ToolRegistry::new()).await;

    for query in ["", "   "] {
        let (status, body) = call_tool(port, "vector_search_contacts", json!({ "query": query })).await;
        assert_eq!(status, 200, "query {:?}: {}", query, body);
        assert!(body["result"]["contacts"].as_array().unwrap().is_empty());
        assert!(body["result"]["extractedKeywords"].as_array().unwrap().is_empty());
        assert_eq!(body["result"]["totalMatched"], 0);
        assert_eq!(body["result"]["searchQuery"], query);
    }

    server.abort();
}

#[tokio::test]
async fn test_missing_and_unreadable_store() {
    let tmp = TempDir::new().unwrap();

    let missing_port = find_free_port();
    let cfg = test_config(&tmp.path().join("absent.csv"), missing_port, None);
    let missing = start_server(cfg, ToolRegistry::new()).await;

    let (status, body) = call_tool(missing_port, "query_contacts", json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(body["result"]["total"], 0);
    assert!(body["result"]["contacts"].as_array().unwrap().is_empty());

    // A directory exists but cannot be read as a file.
    let broken_port = find_free_port();
    let cfg = test_config(tmp.path(), broken_port, None);
    let broken = start_server(cfg, ToolRegistry::new()).await;

    let (status, body) = call_tool(broken_port, "get_contact_stats", json!({})).await;
    assert_eq!(status, 503);
    assert_eq!(body["error"]["code"], "source_unavailable");

    missing.abort();
    broken.abort();
}

/// A custom tool is listed after the built-ins and reads contacts through
/// `ToolContext`.
#[tokio::test]
async fn test_custom_tool_via_http_server() {
    let tmp = TempDir::new().unwrap();
    let port = find_free_port();
    let cfg = test_config(&write_contacts(&tmp), port, None);

    let mut tools = ToolRegistry::new();
    tools.register(Box::new(CountExecutivesTool));
    let server = start_server(cfg, tools).await;

    let body: Value = reqwest::Client::new()
        .get(format!("http://127.0.0.1:{}/tools/list", port))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let names = tool_names(&body);
    assert_eq!(names.len(), 4);
    assert_eq!(names[3], "count_executives");
    assert_eq!(body["tools"][3]["builtin"], false);

    let (status, body) = call_tool(port, "count_executives", json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(body["result"]["executives"], 2);

    let (_, body) = call_tool(port, "count_executives", json!({ "country": "Mexico" })).await;
    assert_eq!(body["result"]["executives"], 1);

    let (status, _) = call_tool(port, "count_executives", json!({ "country": 7 })).await;
    assert_eq!(status, 400);

    server.abort();
}

/// A second server proxies tools it does not have to the first one.
#[tokio::test]
async fn test_remote_tool_catalog_proxy() {
    let tmp = TempDir::new().unwrap();
    let data = write_contacts(&tmp);

    let upstream_port = find_free_port();
    let mut upstream_tools = ToolRegistry::new();
    upstream_tools.register(Box::new(CountExecutivesTool));
    let upstream = start_server(test_config(&data, upstream_port, None), upstream_tools).await;

    let front_port = find_free_port();
    let front = start_server(
        test_config(&tmp.path().join("empty.csv"), front_port, Some(upstream_port)),
        ToolRegistry::new(),
    )
    .await;

    let client = reqwest::Client::new();
    let body: Value = client
        .get(format!("http://127.0.0.1:{}/tools/list", front_port))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        tool_names(&body),
        vec![
            "query_contacts",
            "get_contact_stats",
            "vector_search_contacts",
            "count_executives"
        ]
    );
    assert_eq!(body["tools"][3]["remote"], true);

    // Proxied to the upstream, which has data.
    let (status, body) = call_tool(front_port, "count_executives", json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(body["result"]["executives"], 2);

    // Built-ins stay local and see the front server's (missing) data.
    let (_, body) = call_tool(front_port, "query_contacts", json!({})).await;
    assert_eq!(body["result"]["total"], 0);

    // Upstream validation errors surface as remote errors.
    let (status, body) = call_tool(front_port, "count_executives", json!({ "country": 7 })).await;
    assert_eq!(status, 502);
    assert_eq!(body["error"]["code"], "remote_error");

    let body: Value = client
        .post(format!("http://127.0.0.1:{}/remote/refresh", front_port))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["remote_tools"], 4);

    front.abort();
    upstream.abort();
}

/// An unreachable remote server leaves the local tools working.
#[tokio::test]
async fn test_unreachable_remote_is_ignored() {
    let tmp = TempDir::new().unwrap();
    let port = find_free_port();
    let dead_port = find_free_port();
    let cfg = test_config(&write_contacts(&tmp), port, Some(dead_port));
    let server = start_server(cfg, ToolRegistry::new()).await;

    let body: Value = reqwest::Client::new()
        .get(format!("http://127.0.0.1:{}/tools/list", port))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(tool_names(&body).len(), 3);

    let (status, _) = call_tool(port, "count_executives", json!({})).await;
    assert_eq!(status, 404);

    server.abort();
}
