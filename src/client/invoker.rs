//! Typed client calls.
//!
//! # Responsibilities
//! - Encode the request value before anything touches the network
//! - Join the route path onto the configured base URL
//! - Attach `Authorization` or the credentials marker
//! - Decode a success body or reconstruct the remote error
//!
//! # Design Decisions
//! - No retries: a failed call surfaces immediately
//! - A decode failure on a success status is a transport error, since the
//!   remote claimed success
//! - Dropping the returned future cancels the network call

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use crate::client::error::{ClientError, InvokeError, TransportError};
use crate::config::{validation::validate_client_config, ClientConfig, ConfigError};
use crate::observability::metrics;
use crate::routing;
use crate::wire::{codec, WireError};

/// Header sent on calls that are not token-scoped.
pub const CREDENTIALS_HEADER: &str = "credentials";
pub const CREDENTIALS_INCLUDE: &str = "include";

/// Decode a response: the body on 200, a stamped WireError on any other status.
pub async fn decode_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, InvokeError> {
    let status = response.status();
    let body = response.bytes().await.map_err(TransportError::Body)?;

    if status != StatusCode::OK {
        let mut wire = codec::decode_wire_error(&body, status.as_u16());
        wire.code = status.as_u16();
        return Err(InvokeError::Remote(wire));
    }

    codec::decode(&body).map_err(|e| InvokeError::Transport(TransportError::Decode(e)))
}

/// Client for services built on this crate.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base: Url,
    config: Arc<ClientConfig>,
}

impl Client {
    /// Build a client from a validated configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ClientError::Build)?;
        Self::with_http_client(config, http)
    }

    /// Build a client around an existing reqwest client.
    pub fn with_http_client(config: ClientConfig, http: reqwest::Client) -> Result<Self, ClientError> {
        validate_client_config(&config).map_err(ConfigError::Validation)?;
        let base = Url::parse(&config.base_url).map_err(|e| {
            ConfigError::Validation(vec![crate::config::ValidationError {
                field: "base_url".to_string(),
                reason: e.to_string(),
            }])
        })?;
        Ok(Self {
            http,
            base,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Absolute URL of a route.
    pub fn url_for(&self, path: &str) -> Url {
        let mut url = self.base.clone();
        url.set_path(&routing::join(self.base.path(), path));
        url
    }

    /// Start building a call to `path`.
    pub fn call(&self, path: &str) -> Call<'_> {
        Call {
            client: self,
            path: path.to_string(),
            method: Method::POST,
            token: None,
            query: Vec::new(),
            timeout: None,
        }
    }

    /// POST `request` to `path` and decode the response.
    pub async fn glance<Req, Res>(&self, path: &str, request: &Req) -> Result<Res, InvokeError>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        self.call(path).send(request).await
    }

    /// Like [`Client::glance`], reconstructing remote errors into `E`.
    pub async fn glance_as<Req, Res, E>(&self, path: &str, request: &Req) -> Result<Res, InvokeError<E>>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
        E: From<WireError>,
    {
        self.call(path).send_as(request).await
    }
}

/// A single call being configured.
pub struct Call<'a> {
    client: &'a Client,
    path: String,
    method: Method,
    token: Option<String>,
    query: Vec<(String, String)>,
    timeout: Option<Duration>,
}

impl<'a> Call<'a> {
    /// Use GET instead of POST.
    pub fn get(mut self) -> Self {
        self.method = Method::GET;
        self
    }

    /// Scope this call to a token, overriding the configured one.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Deadline for this call, overriding the configured timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Send with a JSON body and decode the response.
    pub async fn send<Req, Res>(self, request: &Req) -> Result<Res, InvokeError>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let body = codec::encode(request).map_err(TransportError::Encode)?;
        self.execute(Some(body.to_vec())).await
    }

    /// Send without a body (GET with query parameters).
    pub async fn send_empty<Res: DeserializeOwned>(self) -> Result<Res, InvokeError> {
        self.execute(None).await
    }

    /// Send with a JSON body, reconstructing remote errors into `E`.
    pub async fn send_as<Req, Res, E>(self, request: &Req) -> Result<Res, InvokeError<E>>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
        E: From<WireError>,
    {
        match self.send(request).await {
            Ok(value) => Ok(value),
            Err(InvokeError::Remote(wire)) => Err(InvokeError::Remote(E::from(wire))),
            Err(InvokeError::Transport(e)) => Err(InvokeError::Transport(e)),
        }
    }

    async fn execute<Res: DeserializeOwned>(self, body: Option<Vec<u8>>) -> Result<Res, InvokeError> {
        let url = self.client.url_for(&self.path);
        let mut builder = self.client.http.request(self.method.clone(), url.clone());

        if !self.query.is_empty() {
            builder = builder.query(&self.query);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let token = self
            .token
            .as_deref()
            .or(self.client.config.auth_token.as_deref())
            .filter(|t| !t.is_empty());
        builder = match token {
            Some(token) => builder.header(AUTHORIZATION, HeaderValue::from_str(token).map_err(TransportError::InvalidToken)?),
            None => builder.header(
                HeaderName::from_static(CREDENTIALS_HEADER),
                HeaderValue::from_static(CREDENTIALS_INCLUDE),
            ),
        };

        if let Some(body) = body {
            builder = builder
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(body);
        }

        tracing::debug!(method = %self.method, url = %url, "Calling route");

        let result = match builder.send().await {
            Ok(response) => decode_response(response).await,
            Err(e) => Err(InvokeError::Transport(TransportError::Request(e))),
        };

        match &result {
            Ok(_) => metrics::record_client_call(&self.path, "ok"),
            Err(InvokeError::Remote(wire)) => {
                tracing::debug!(url = %url, code = wire.code, message = %wire.message, "Remote returned an error");
                metrics::record_client_call(&self.path, "remote");
            }
            Err(InvokeError::Transport(e)) => {
                tracing::warn!(url = %url, error = %e, "Call failed");
                metrics::record_client_call(&self.path, "transport");
            }
        }
        result
    }
}
