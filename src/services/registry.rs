//! Remote world registry clients
//!
//! The simulation is synchronous; the HTTP client owns a small tokio
//! runtime and blocks on each request at this boundary.

use reqwest::Client;
use tokio::runtime::Runtime;

use super::{WorldInfo, WorldRegistry};
use crate::core::error::{Result, SimError};

/// Registry reached over HTTP, returning a JSON array of worlds
pub struct HttpWorldRegistry {
    runtime: Runtime,
    client: Client,
    url: String,
}

impl HttpWorldRegistry {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(5))
            .build()
            .map_err(|e| SimError::RegistryUnavailable(e.to_string()))?;
        Ok(Self {
            runtime,
            client,
            url: url.into(),
        })
    }

    /// Create a client from the `WORLD_REGISTRY_URL` environment variable
    pub fn from_env() -> Result<Self> {
        let url = std::env::var("WORLD_REGISTRY_URL")
            .map_err(|_| SimError::Config("WORLD_REGISTRY_URL not set".into()))?;
        Self::new(url)
    }

    async fn fetch(&self) -> Result<Vec<WorldInfo>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| SimError::RegistryUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SimError::RegistryUnavailable(format!(
                "registry returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| SimError::RegistryUnavailable(e.to_string()))
    }
}

impl WorldRegistry for HttpWorldRegistry {
    fn get_worlds(&self) -> Result<Vec<WorldInfo>> {
        self.runtime.block_on(self.fetch())
    }
}

/// Fixed list, for offline runs and tests
#[derive(Debug, Clone, Default)]
pub struct StaticWorldRegistry {
    pub worlds: Vec<WorldInfo>,
}

impl StaticWorldRegistry {
    pub fn new(worlds: Vec<WorldInfo>) -> Self {
        Self { worlds }
    }
}

impl WorldRegistry for StaticWorldRegistry {
    fn get_worlds(&self) -> Result<Vec<WorldInfo>> {
        Ok(self.worlds.clone())
    }
}
