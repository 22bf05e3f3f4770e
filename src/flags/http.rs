use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::{EvaluationRequest, EvaluationResponse, EvaluationTransport, FlagError};

/// Talks to the toggle service's REST evaluate endpoint.
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, namespace: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        let endpoint = format!(
            "{}/api/v1/namespaces/{}/evaluate",
            base_url.trim_end_matches('/'),
            namespace
        );

        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl EvaluationTransport for HttpTransport {
    async fn evaluate(
        &self,
        request: &EvaluationRequest,
    ) -> Result<EvaluationResponse, FlagError> {
        let unavailable = |reason: String| FlagError::Unavailable {
            key: request.flag_key.clone(),
            reason,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| unavailable(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FlagError::Rejected {
                key: request.flag_key.clone(),
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<EvaluationResponse>()
            .await
            .map_err(|e| unavailable(format!("unreadable response: {e}")))
    }
}
