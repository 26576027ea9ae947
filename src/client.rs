use std::sync::Arc;

use reqwest::{Client, ClientBuilder, Method, RequestBuilder};
use url::Url;

use crate::error::OroNpmAccessError;

/// Client for a registry's access-control endpoints. Cheap to clone; the
/// underlying HTTP client and connection pool are shared between clones.
///
/// Auth tokens, proxies, and other transport concerns belong to whoever
/// configures the registry and are not inspected here.
#[derive(Clone, Debug)]
pub struct AccessClient {
    pub(crate) registry: Arc<Url>,
    pub(crate) client: Client,
}

impl AccessClient {
    pub fn new(registry: Url) -> Self {
        Self {
            registry: Arc::new(registry),
            client: ClientBuilder::new()
                .user_agent("oro-npm-access")
                .pool_max_idle_per_host(20)
                .build()
                .expect("Failed to build HTTP client."),
        }
    }

    pub fn with_registry(&self, registry: Url) -> Self {
        Self {
            registry: Arc::new(registry),
            client: self.client.clone(),
        }
    }

    /// Starts a request against a registry-relative path, tracing it on the
    /// way out.
    pub(crate) fn request(
        &self,
        method: Method,
        path: &str,
    ) -> Result<RequestBuilder, OroNpmAccessError> {
        let url = self.registry.join(path)?;
        tracing::debug!("{} {}", method, url);
        Ok(self.client.request(method, url))
    }
}

impl Default for AccessClient {
    fn default() -> Self {
        Self::new(Url::parse("https://registry.npmjs.org").unwrap())
    }
}
