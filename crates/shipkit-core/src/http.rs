use std::collections::BTreeMap;

use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder};
use tracing::debug;

use crate::adapter::Transport;
use crate::config::TransportConfig;
use crate::error::{Result, TransportError};
use crate::outcome::{HttpMethod, Request, Response};

/// [`Transport`] over a blocking reqwest client. One attempt per request.
pub struct HttpTransport {
    http: Client,
    config: TransportConfig,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("timeout", &self.config.timeout)
            .field("user_agent", &self.config.user_agent)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    pub fn new(config: TransportConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { http, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(TransportConfig::from_env())
    }

    #[must_use]
    pub const fn config(&self) -> &TransportConfig {
        &self.config
    }

    fn build(&self, request: &Request) -> RequestBuilder {
        let method = match request.http_method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        };
        let mut builder = self.http.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }
        builder
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &Request) -> std::result::Result<Response, TransportError> {
        let reply = self.build(request).send().map_err(classify)?;
        let status = reply.status().as_u16();
        let headers = reply
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect::<BTreeMap<_, _>>();
        let body = reply.text().map_err(classify)?;
        debug!(status, bytes = body.len(), "http exchange finished");

        let response = Response {
            status,
            body,
            headers,
        };
        if response.is_success() {
            Ok(response)
        } else {
            Err(TransportError::Http { response })
        }
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if err.is_connect() {
        TransportError::Connection(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}
