//! reqwest implementation of the portal API.

use reqwest::{Client, Response};
use url::Url;

use crate::assessment::Assessment;
use crate::attempt::{AnswerUpsert, Attempt, AttemptCreate, AttemptResult};
use crate::config::ApiConfig;
use crate::error::ApiError;

use super::AttemptApi;

/// HTTP client for the portal API, bound to one base URL.
#[derive(Debug, Clone)]
pub struct PortalClient {
    http: Client,
    base_url: Url,
}

impl PortalClient {
    /// Build a client against `base_url` (e.g. `https://portal.example/api`).
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_client(Client::new(), base_url)
    }

    /// Build a client from configuration, honoring the request timeout.
    pub fn from_config(cfg: &ApiConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Self::with_client(http, &cfg.base_url)
    }

    fn with_client(http: Client, base_url: &str) -> Result<Self, ApiError> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl(e.to_string()))?;
        // Url::join drops the last path segment unless the base ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidBaseUrl(e.to_string()))
    }
}

fn check_status(url: &Url, resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(ApiError::Status {
            endpoint: url.path().to_string(),
            status: status.as_u16(),
        })
    }
}

impl AttemptApi for PortalClient {
    async fn fetch_shared_assessment(&self, share_token: &str) -> Result<Assessment, ApiError> {
        let url = self.endpoint(&format!("assessments/share/{share_token}"))?;
        let resp = self.http.get(url.clone()).send().await?;
        Ok(check_status(&url, resp)?.json().await?)
    }

    async fn create_attempt(
        &self,
        assessment_id: i64,
        req: &AttemptCreate,
    ) -> Result<Attempt, ApiError> {
        let url = self.endpoint(&format!("assessments/{assessment_id}/attempts"))?;
        let resp = self.http.post(url.clone()).json(req).send().await?;
        Ok(check_status(&url, resp)?.json().await?)
    }

    async fn upsert_answer(&self, attempt_id: i64, req: &AnswerUpsert) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("assessments/attempts/{attempt_id}/answers"))?;
        let resp = self.http.post(url.clone()).json(req).send().await?;
        check_status(&url, resp)?;
        Ok(())
    }

    async fn complete_attempt(&self, attempt_id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("assessments/attempts/{attempt_id}/complete"))?;
        let resp = self.http.post(url.clone()).send().await?;
        check_status(&url, resp)?;
        Ok(())
    }

    async fn fetch_attempt(&self, attempt_id: i64) -> Result<AttemptResult, ApiError> {
        let url = self.endpoint(&format!("assessments/attempts/{attempt_id}"))?;
        let resp = self.http.get(url.clone()).send().await?;
        Ok(check_status(&url, resp)?.json().await?)
    }
}
