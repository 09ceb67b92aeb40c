use anyhow::Result;
use log::{debug, warn};
use reqwest::{Client, RequestBuilder};
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::error::TransportError;
use crate::models::ResponseInfo;

/// Thin wrapper over a reqwest client targeting one tRPC-style API base.
/// Procedures are addressed as `<base>/api/trpc/<namespace>.<method>`.
pub struct HttpClient {
    client: Client,
    base_url: String,
    timeout_secs: u64,
}

impl HttpClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .danger_accept_invalid_certs(false)
            .build()?;

        let base_url = base_url.trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn post_json(
        &self,
        procedure: &str,
        payload: &serde_json::Value,
        extra_headers: Option<&HashMap<String, String>>,
    ) -> Result<ResponseInfo, TransportError> {
        let mut request = self
            .client
            .post(self.procedure_url(procedure))
            .header("Accept", "application/json")
            .json(payload);

        if let Some(headers) = extra_headers {
            for (key, value) in headers {
                request = request.header(key, value);
            }
        }

        self.execute(procedure, request).await
    }

    pub async fn get(
        &self,
        procedure: &str,
        extra_headers: Option<&HashMap<String, String>>,
    ) -> Result<ResponseInfo, TransportError> {
        let mut request = self
            .client
            .get(self.procedure_url(procedure))
            .header("Accept", "application/json");

        if let Some(headers) = extra_headers {
            for (key, value) in headers {
                request = request.header(key, value);
            }
        }

        self.execute(procedure, request).await
    }

    async fn execute(
        &self,
        procedure: &str,
        request: RequestBuilder,
    ) -> Result<ResponseInfo, TransportError> {
        let start = Instant::now();

        match request.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                let headers: HashMap<String, String> = response
                    .headers()
                    .iter()
                    .map(|(k, v)| {
                        (
                            k.as_str().to_ascii_lowercase(),
                            v.to_str().unwrap_or("").to_string(),
                        )
                    })
                    .collect();

                let text = response.text().await.unwrap_or_default();
                let duration_ms = start.elapsed().as_millis() as u64;
                debug!("{}: {} in {}ms", procedure, status, duration_ms);

                Ok(ResponseInfo::new(status, text, headers, duration_ms))
            }
            Err(e) => {
                warn!("{}: transport failure: {}", procedure, e);
                if e.is_timeout() {
                    Err(TransportError::Timeout(self.timeout_secs))
                } else {
                    Err(TransportError::Network(e.to_string()))
                }
            }
        }
    }

    fn procedure_url(&self, procedure: &str) -> String {
        format!("{}/api/trpc/{}", self.base_url, procedure)
    }
}
