//! HTTP tool server.
//!
//! Exposes the contact tools as a JSON API for the assistant layer and any
//! other HTTP client. Built-in tools and custom Rust [`Tool`]s share one
//! [`ToolRegistry`] and are dispatched through the same `POST /tools/{name}`
//! handler. When `[remote_tools]` is configured, tools advertised by that
//! server are listed after the local ones and proxied on call.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/`, `/health` | Health check (service name and version) |
//! | `GET`  | `/tools/list` | Local tools, then remote tools, with schemas |
//! | `POST` | `/tools/{name}` | Call a tool by name |
//! | `POST` | `/remote/refresh` | Re-fetch the remote tool catalog |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "missing required parameter: query" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `tool_error` (500),
//! `remote_error` (502), `source_unavailable` (503).
//!
//! [`Tool`]: crate::traits::Tool

use anyhow::Context;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use prospector_core::error::SourceError;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::Config;
use crate::remote::RemoteToolCatalog;
use crate::traits::{validate_params, ToolContext, ToolInfo, ToolRegistry};

const SERVICE_NAME: &str = "prospector-api";

#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    tools: Arc<ToolRegistry>,
    remote: Option<Arc<RemoteToolCatalog>>,
}

/// Starts the tool server with the built-in tools.
///
/// Binds to `[server].bind` and runs until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    run_server_with_extensions(config, ToolRegistry::new()).await
}

/// Starts the tool server with custom Rust tools served next to the
/// built-ins.
///
/// A custom tool whose name collides with a built-in is ignored.
///
/// # Example
///
/// ```rust,no_run
/// use prospector::server::run_server_with_extensions;
/// use prospector::traits::ToolRegistry;
///
/// # async fn example(config: &prospector::config::Config) -> anyhow::Result<()> {
/// let mut tools = ToolRegistry::new();
/// // tools.register(Box::new(MyTool::new()));
/// run_server_with_extensions(config, tools).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_server_with_extensions(
    config: &Config,
    extra_tools: ToolRegistry,
) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let app = build_router(config, extra_tools)?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    tracing::info!(addr = %bind_addr, data = %config.data.path.display(), "tool server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the router without binding a listener.
pub fn build_router(config: &Config, extra_tools: ToolRegistry) -> anyhow::Result<Router> {
    let mut registry = ToolRegistry::with_builtins();
    let builtin_count = registry.len();
    registry.extend(extra_tools);

    for t in registry.tools().iter().skip(builtin_count) {
        tracing::info!(tool = t.name(), "registered custom tool");
    }

    let remote = match &config.remote_tools {
        Some(rc) => {
            let catalog = RemoteToolCatalog::new(rc)?;
            tracing::info!(url = catalog.base_url(), "remote tools enabled");
            Some(Arc::new(catalog))
        }
        None => None,
    };

    let state = AppState {
        config: Arc::new(config.clone()),
        tools: Arc::new(registry),
        remote,
    };

    Ok(Router::new()
        .route("/", get(handle_health))
        .route("/health", get(handle_health))
        .route("/tools/list", get(handle_list_tools))
        .route("/tools/{name}", post(handle_tool_call))
        .route("/remote/refresh", post(handle_refresh_remote))
        .layer(cors_layer(&config.server.cors_origins))
        .with_state(state))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let values: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(values))
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl AppError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(code = self.code, message = %self.message, "request failed");
        }
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError::new(StatusCode::BAD_REQUEST, "bad_request", message)
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError::new(StatusCode::NOT_FOUND, "not_found", message)
}

fn remote_error(message: impl Into<String>) -> AppError {
    AppError::new(StatusCode::BAD_GATEWAY, "remote_error", message)
}

/// Map a tool failure to a status. Data source failures are 503; parameter
/// problems signalled by message are 400; anything else is 500.
fn classify_tool_error(tool_name: &str, err: anyhow::Error) -> AppError {
    if let Some(source_err) = err.downcast_ref::<SourceError>() {
        return AppError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "source_unavailable",
            format!("{}: {}", tool_name, source_err),
        );
    }

    let msg = err.to_string();
    if msg.contains("invalid parameters") {
        bad_request(format!("{}: {}", tool_name, msg))
    } else if msg.contains("not found") {
        not_found(format!("{}: {}", tool_name, msg))
    } else {
        AppError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "tool_error",
            format!("{}: {:#}", tool_name, err),
        )
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============ GET /tools/list ============

#[derive(Serialize)]
struct ToolListResponse {
    tools: Vec<ToolInfo>,
}

/// Local tools first, then remote tools not shadowed by a local name.
async fn handle_list_tools(State(state): State<AppState>) -> Json<ToolListResponse> {
    let mut tools = state.tools.infos();

    if let Some(remote) = &state.remote {
        for t in remote.tools().await {
            if state.tools.find(&t.name).is_some() {
                continue;
            }
            tools.push(ToolInfo {
                name: t.name,
                description: t.description,
                builtin: false,
                remote: true,
                parameters: t.parameters,
            });
        }
    }

    Json(ToolListResponse { tools })
}

// ============ POST /tools/{name} ============

/// Unified tool dispatch: local registry first, then the remote catalog.
///
/// An empty body is treated as `{}`.
async fn handle_tool_call(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let started = Instant::now();

    let params: Value = if body.iter().all(u8::is_ascii_whitespace) {
        json!({})
    } else {
        serde_json::from_slice(&body).map_err(|e| bad_request(format!("invalid JSON body: {}", e)))?
    };

    let result = match state.tools.find(&name) {
        Some(tool) => {
            let validated = validate_params(&tool.parameters_schema(), &params)
                .map_err(|e| bad_request(e.to_string()))?;
            let ctx = ToolContext::new(state.config.clone());
            tool.execute(validated, &ctx)
                .await
                .map_err(|e| classify_tool_error(&name, e))?
        }
        None => {
            let remote = match &state.remote {
                Some(remote) => remote,
                None => return Err(not_found(format!("no tool registered with name: {}", name))),
            };
            if remote.find(&name).await.is_none() {
                return Err(not_found(format!("no tool registered with name: {}", name)));
            }
            remote
                .call(&name, &params)
                .await
                .map_err(|e| remote_error(format!("{:#}", e)))?
        }
    };

    tracing::info!(
        tool = %name,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "tool call"
    );

    Ok(Json(json!({ "result": result })))
}

// ============ POST /remote/refresh ============

async fn handle_refresh_remote(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let remote = state
        .remote
        .as_ref()
        .ok_or_else(|| not_found("remote tools are not configured"))?;
    let tools = remote.refresh().await;
    Ok(Json(json!({ "remote_tools": tools.len() })))
}
