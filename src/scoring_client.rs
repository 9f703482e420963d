use crate::errors::AppError;
use crate::models::{
    ApplicantId, ApplicantProfile, ApplicantRequest, DistributionRequest, DistributionResponse,
    Feature, PredictResponse,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const PREDICT_ENDPOINT: &str = "/predict";
pub const INFO_ENDPOINT: &str = "/info";
pub const DISTRIBUTION_ENDPOINT: &str = "/distribution";

/// Client for the remote scoring API.
///
/// Each call is a single POST with a JSON body. There is no retry and no
/// request timeout.
#[derive(Clone)]
pub struct ScoringClient {
    client: reqwest::Client,
    base_url: String,
}

impl ScoringClient {
    /// Creates a new `ScoringClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the scoring API, without trailing slash.
    pub fn new(base_url: String) -> Result<Self, AppError> {
        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the default probability of an applicant.
    ///
    /// # Returns
    ///
    /// * `Result<PredictResponse, AppError>` - The probability in percent.
    pub async fn predict(&self, id: ApplicantId) -> Result<PredictResponse, AppError> {
        self.post(PREDICT_ENDPOINT, &ApplicantRequest { sk_id_curr: id })
            .await
    }

    /// Fetches the personal attributes of an applicant.
    pub async fn info(&self, id: ApplicantId) -> Result<ApplicantProfile, AppError> {
        self.post(INFO_ENDPOINT, &ApplicantRequest { sk_id_curr: id })
            .await
    }

    /// Fetches the applicant's value and the population sample for `feature`.
    pub async fn distribution(
        &self,
        id: ApplicantId,
        feature: Feature,
    ) -> Result<DistributionResponse, AppError> {
        self.post(
            DISTRIBUTION_ENDPOINT,
            &DistributionRequest {
                sk_id_curr: id,
                feature,
            },
        )
        .await
    }

    async fn post<B, T>(&self, endpoint: &'static str, body: &B) -> Result<T, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::info!("Calling scoring API: POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("{} request failed: {}", endpoint, e)))?;

        // Only 200 counts as success.
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            tracing::warn!("Scoring API {} returned status {}", endpoint, status);
            return Err(AppError::UpstreamStatus {
                endpoint,
                status: status.as_u16(),
            });
        }

        let data = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse {} response: {}", endpoint, e);
            AppError::Decode(format!("Failed to parse {} response: {}", endpoint, e))
        })?;

        Ok(data)
    }
}
