use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::header::HeaderValue;
use tracing::debug;
use tracing::trace;

use crate::error::TransportFailure;
use crate::request::RequestSpec;
use crate::response::RawResponse;

/// Performs a single HTTP exchange. The harness never speaks HTTP itself.
pub trait Transport {
    fn send(
        &self,
        request: &RequestSpec,
    ) -> impl Future<Output = Result<RawResponse, TransportFailure>> + Send;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportFailure> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TransportFailure::Client)?;

        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: &RequestSpec) -> Result<RawResponse, TransportFailure> {
        let url = request.full_url();
        let url_str = url.to_string();

        let mut headers = request.headers.clone();
        if let Some(content_type) = &request.content_type {
            let value = HeaderValue::from_str(content_type).map_err(|e| {
                TransportFailure::InvalidRequest {
                    url: url_str.clone(),
                    reason: format!("invalid content type `{content_type}`: {e}"),
                }
            })?;
            headers.insert(CONTENT_TYPE, value);
        }

        let builder = self
            .client
            .request(request.method.clone(), url)
            .headers(headers);

        let builder = match request.body_bytes()? {
            Some(bytes) => {
                trace!(body = %String::from_utf8_lossy(&bytes), "request body");
                builder.body(bytes)
            }
            None => builder,
        };

        debug!(method = %request.method, url = %url_str, "sending request");

        let response = builder
            .send()
            .await
            .map_err(|e| TransportFailure::from_reqwest(&url_str, e))?;

        let status = response.status();
        let headers = response.headers().clone();

        // Consume the body exactly once
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportFailure::from_reqwest(&url_str, e))?
            .to_vec();

        debug!(status = status.as_u16(), bytes = body.len(), "received response");

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
