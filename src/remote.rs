//! Remote tool catalog.
//!
//! Another tool server (same `/tools/list` + `/tools/{name}` contract) can
//! be attached via `[remote_tools]`. Its tool list is fetched lazily, cached
//! for the life of the process, and re-fetched only on [`refresh`].
//!
//! The catalog is an explicit object owned by the server state and shared
//! by `Arc`; there is no global cache.
//!
//! [`refresh`]: RemoteToolCatalog::refresh

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::config::RemoteToolsConfig;

/// A tool advertised by the remote server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteTool {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: Value,
}

#[derive(Deserialize)]
struct ToolListBody {
    tools: Vec<RemoteTool>,
}

pub struct RemoteToolCatalog {
    base_url: String,
    client: reqwest::Client,
    cached: RwLock<Option<Vec<RemoteTool>>>,
}

impl RemoteToolCatalog {
    pub fn new(config: &RemoteToolsConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client for remote tools")?;
        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            client,
            cached: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Cached tool list, fetching it on first use.
    ///
    /// A failed fetch logs a warning and yields an empty list. Failures are
    /// not cached, so the next call tries again. No lock is held while the
    /// request is in flight; the first successful fetch to land wins.
    pub async fn tools(&self) -> Vec<RemoteTool> {
        if let Some(tools) = self.cached.read().await.as_ref() {
            return tools.clone();
        }

        let fetched = match self.fetch().await {
            Ok(tools) => tools,
            Err(e) => {
                tracing::warn!(url = %self.base_url, error = %e, "remote tools unavailable, continuing without them");
                return Vec::new();
            }
        };

        let mut guard = self.cached.write().await;
        if let Some(tools) = guard.as_ref() {
            return tools.clone();
        }
        tracing::info!(url = %self.base_url, count = fetched.len(), "loaded remote tools");
        *guard = Some(fetched.clone());
        fetched
    }

    /// Drop the cached list and fetch it again.
    pub async fn refresh(&self) -> Vec<RemoteTool> {
        self.cached.write().await.take();
        self.tools().await
    }

    pub async fn find(&self, name: &str) -> Option<RemoteTool> {
        self.tools().await.into_iter().find(|t| t.name == name)
    }

    /// Forward a tool call and unwrap the remote `{ "result": ... }` envelope.
    pub async fn call(&self, name: &str, params: &Value) -> Result<Value> {
        let url = format!("{}/tools/{}", self.base_url, name);
        let resp = self
            .client
            .post(&url)
            .json(params)
            .send()
            .await
            .with_context(|| format!("remote tool call to {} failed", url))?;

        let status = resp.status();
        let body: Value = resp
            .json()
            .await
            .with_context(|| format!("remote tool {} returned invalid JSON", name))?;

        if !status.is_success() {
            let message = body["error"]["message"]
                .as_str()
                .unwrap_or("remote tool failed")
                .to_string();
            bail!("remote tool {} returned {}: {}", name, status, message);
        }

        Ok(body.get("result").cloned().unwrap_or(body))
    }

    async fn fetch(&self) -> Result<Vec<RemoteTool>> {
        let url = format!("{}/tools/list", self.base_url);
        let body: ToolListBody = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(body.tools)
    }
}
