// src/utils/http.rs

//! HTTP transport with bounded retry.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Proxy, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::error::Category;

use crate::error::{AppError, Result};
use crate::models::HttpConfig;

/// Owned query string pairs.
pub type Query = [(String, String)];

/// Performs a GET and yields the body of a 200 response.
///
/// Implementations report failures as `AppError::Status` (no 200 seen) or
/// `AppError::Transport` (no response at all) and never panic.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, query: &Query) -> Result<String>;
}

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &HttpConfig) -> Result<Client> {
    let mut builder = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs));

    if let Some(proxy_url) = config.proxy_url() {
        builder = builder.proxy(Proxy::all(&proxy_url)?);
    }

    Ok(builder.build()?)
}

/// reqwest-backed transport.
///
/// Retries non-200 statuses up to `max_attempts` times. Network errors are
/// returned on the spot without retrying.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    max_attempts: u32,
}

impl HttpTransport {
    /// Build a transport (and its client) from HTTP settings.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        Ok(Self::with_client(
            create_async_client(config)?,
            config.max_attempts,
        ))
    }

    /// Wrap an existing client.
    pub fn with_client(client: Client, max_attempts: u32) -> Self {
        Self {
            client,
            max_attempts: max_attempts.max(1),
        }
    }
}

#[async_trait]
impl Fetcher for HttpTransport {
    async fn fetch(&self, url: &str, query: &Query) -> Result<String> {
        let mut last_status = None;

        for _ in 0..self.max_attempts {
            let response = self
                .client
                .get(url)
                .query(query)
                .send()
                .await
                .map_err(|e| AppError::transport(url, e))?;

            let status = response.status();
            if status == StatusCode::OK {
                return response.text().await.map_err(|e| AppError::transport(url, e));
            }
            last_status = Some(status);
        }

        // max_attempts >= 1, so a status has always been observed here
        let status = last_status.map_or(0, |s| s.as_u16());
        Err(AppError::status(url, status))
    }
}

/// Fetch a document and decode it as JSON.
///
/// Bodies that are not JSON at all fail with `AppError::Decode`. Well-formed
/// JSON that does not match `T` is a data contract violation attributed to
/// `context`.
pub async fn fetch_json<T: DeserializeOwned>(
    fetcher: &dyn Fetcher,
    url: &str,
    query: &Query,
    context: &str,
) -> Result<T> {
    let body = fetcher.fetch(url, query).await.inspect_err(|e| {
        log::debug!("GET {} failed: {}", url, e);
    })?;
    log::debug!("GET {} -> {} bytes", url, body.len());

    serde_json::from_str(&body).map_err(|e| match e.classify() {
        Category::Data => AppError::contract(context, e),
        Category::Syntax | Category::Eof | Category::Io => AppError::decode(url, e),
    })
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted in-memory fetcher.

    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    use super::*;

    /// Replays canned responses keyed by URL (query excluded).
    ///
    /// The last response queued for a URL is repeated once the queue drains.
    /// Unknown URLs answer with a 404 status failure.
    #[derive(Default)]
    pub struct ScriptedFetcher {
        routes: Mutex<HashMap<String, VecDeque<Result<String>>>>,
        calls: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl ScriptedFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, url: &str, body: impl Into<String>) -> Self {
            self.push(url, Ok(body.into()))
        }

        pub fn fail_status(self, url: &str, status: u16) -> Self {
            self.push(url, Err(AppError::status(url, status)))
        }

        pub fn fail_transport(self, url: &str, message: &str) -> Self {
            self.push(url, Err(AppError::transport(url, message)))
        }

        fn push(self, url: &str, response: Result<String>) -> Self {
            self.routes
                .lock()
                .unwrap()
                .entry(url.to_string())
                .or_default()
                .push_back(response);
            self
        }

        /// Every request made so far, in order.
        pub fn calls(&self) -> Vec<(String, Vec<(String, String)>)> {
            self.calls.lock().unwrap().clone()
        }

        /// Number of requests made to `url`.
        pub fn call_count(&self, url: &str) -> usize {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|(u, _)| u == url)
                .count()
        }

        fn replay(response: &Result<String>) -> Result<String> {
            match response {
                Ok(body) => Ok(body.clone()),
                Err(AppError::Status { url, status }) => Err(AppError::status(url.clone(), *status)),
                Err(AppError::Transport { url, message }) => {
                    Err(AppError::transport(url.clone(), message))
                }
                Err(e) => Err(AppError::contract("scripted", e)),
            }
        }
    }

    #[async_trait]
    impl Fetcher for ScriptedFetcher {
        async fn fetch(&self, url: &str, query: &Query) -> Result<String> {
            self.calls
                .lock()
                .unwrap()
                .push((url.to_string(), query.to_vec()));

            let mut routes = self.routes.lock().unwrap();
            let Some(queue) = routes.get_mut(url) else {
                return Err(AppError::status(url, 404));
            };
            if queue.len() > 1 {
                queue.pop_front().unwrap_or_else(|| Err(AppError::status(url, 404)))
            } else {
                queue
                    .front()
                    .map(Self::replay)
                    .unwrap_or_else(|| Err(AppError::status(url, 404)))
            }
        }
    }
}
