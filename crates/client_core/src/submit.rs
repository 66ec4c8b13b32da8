use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart::Form, Client};
use shared::{error::FinderError, protocol::SubmissionForm};
use tracing::warn;
use url::Url;

pub const SUBMISSION_PATH: &str = "/submission";

/// Destination for a finished puzzle answer. Returns the page to show next.
#[async_trait]
pub trait AnswerSubmitter: Send + Sync {
    async fn submit(&self, form: &SubmissionForm) -> Result<String, FinderError>;
}

/// Posts the answer as a multipart form to `{server_url}/submission`.
pub struct HttpAnswerSubmitter {
    http: Client,
    endpoint: Url,
}

impl HttpAnswerSubmitter {
    pub fn new(server_url: &str, timeout: Duration) -> Result<Self, FinderError> {
        let endpoint = Url::parse(server_url)
            .and_then(|base| base.join(SUBMISSION_PATH))
            .map_err(|err| FinderError::Submission(format!("invalid server url '{server_url}': {err}")))?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| FinderError::Submission(format!("failed to build http client: {err}")))?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl AnswerSubmitter for HttpAnswerSubmitter {
    async fn submit(&self, form: &SubmissionForm) -> Result<String, FinderError> {
        let body = form
            .fields()
            .into_iter()
            .fold(Form::new(), |body, (name, value)| body.text(name, value.to_string()));

        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(body)
            .send()
            .await
            .map_err(|err| FinderError::Submission(err.to_string()))?;

        // The server renders its own error pages; any body replaces the document.
        let status = response.status();
        if !status.is_success() {
            warn!(%status, endpoint = %self.endpoint, "submission answered with non-success status");
        }

        response
            .text()
            .await
            .map_err(|err| FinderError::Submission(err.to_string()))
    }
}

#[cfg(test)]
#[path = "tests/submit_tests.rs"]
mod tests;
