//! Thin JSON-over-HTTP client shared by every resource

use crate::config::ApiConfig;
use crate::core::error::{ClientError, ClientResult};
use crate::core::metrics::{ClientMetrics, RequestOutcome};
use crate::core::query::QueryParams;
use crate::core::session::{SessionStore, TENANT_KEY, TOKEN_KEY};
use reqwest::{Method, RequestBuilder, Url};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Header carrying the active tenant
pub const TENANT_HEADER: &str = "X-Tenant-ID";

/// REST client bound to one API base URL.
///
/// Attaches the bearer token (and tenant, when set) from the session store to
/// every request, turns non-2xx answers into [`ClientError::Server`] with the
/// server's message, and records every call in the injected metrics.
/// There is no retry: one attempt per user action.
pub struct RestClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<dyn SessionStore>,
    metrics: Arc<ClientMetrics>,
}

impl RestClient {
    pub fn new(
        config: &ApiConfig,
        session: Arc<dyn SessionStore>,
        metrics: Arc<ClientMetrics>,
    ) -> ClientResult<Self> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| ClientError::Config(format!("invalid base URL '{}': {e}", config.base_url)))?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ClientError::Config(format!(
                "unsupported URL scheme '{}'",
                base_url.scheme()
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            session,
            metrics,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn metrics(&self) -> &Arc<ClientMetrics> {
        &self.metrics
    }

    /// Absolute URL for a path relative to the base URL
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Percent-encode `segment` so it stays one path segment
    pub fn path_segment(&self, segment: &str) -> String {
        let mut url = self.base_url.clone();
        match url.path_segments_mut() {
            Ok(mut segments) => {
                segments.clear().push(segment);
            }
            // http(s) URLs always have a path
            Err(()) => return segment.to_string(),
        }
        url.path().trim_start_matches('/').to_string()
    }

    pub async fn get(&self, path: &str, params: &QueryParams) -> ClientResult<Value> {
        let mut request = self.http.get(self.url(path));
        if !params.is_empty() {
            request = request.query(params);
        }
        self.execute(Method::GET, path, request).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<Value> {
        let request = self.http.post(self.url(path)).json(body);
        self.execute(Method::POST, path, request).await
    }

    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<Value> {
        let request = self.http.patch(self.url(path)).json(body);
        self.execute(Method::PATCH, path, request).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<Value> {
        let request = self.http.put(self.url(path)).json(body);
        self.execute(Method::PUT, path, request).await
    }

    pub async fn delete(&self, path: &str) -> ClientResult<Value> {
        let request = self.http.delete(self.url(path));
        self.execute(Method::DELETE, path, request).await
    }

    async fn execute(&self, method: Method, path: &str, request: RequestBuilder) -> ClientResult<Value> {
        let request = self.authorize(request);
        let mut in_flight = InFlight::start(&self.metrics);

        tracing::debug!(%method, path, "sending request");
        let result = self.send(path, request).await;

        match &result {
            Ok(_) => {
                in_flight.finish(RequestOutcome::Success);
                tracing::debug!(%method, path, "request succeeded");
            }
            Err(err) => {
                in_flight.finish(RequestOutcome::Failure);
                tracing::warn!(%method, path, status = ?err.status(), error = %err, "request failed");
            }
        }

        result
    }

    fn authorize(&self, mut request: RequestBuilder) -> RequestBuilder {
        if let Some(token) = self.session.get(TOKEN_KEY).filter(|t| !t.is_empty()) {
            request = request.bearer_auth(token);
        }
        if let Some(tenant) = self.session.get(TENANT_KEY).filter(|t| !t.is_empty()) {
            request = request.header(TENANT_HEADER, tenant);
        }
        request
    }

    async fn send(&self, path: &str, request: RequestBuilder) -> ClientResult<Value> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::from_response(status.as_u16(), &body));
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| ClientError::decode(path, e))
    }
}

/// Records a request in the metrics exactly once.
///
/// If the request future is dropped before finishing (the owning screen
/// cancelled it), the drop records a cancellation.
struct InFlight<'a> {
    metrics: &'a ClientMetrics,
    started: Instant,
    finished: bool,
}

impl<'a> InFlight<'a> {
    fn start(metrics: &'a ClientMetrics) -> Self {
        Self {
            metrics,
            started: Instant::now(),
            finished: false,
        }
    }

    fn finish(&mut self, outcome: RequestOutcome) {
        self.metrics.record(outcome, self.started.elapsed());
        self.finished = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.metrics
                .record(RequestOutcome::Cancelled, self.started.elapsed());
        }
    }
}
