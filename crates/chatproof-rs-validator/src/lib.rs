//! HTTP client for the remote validation authority.
//!
//! Every call is a single JSON POST. Failures are surfaced as
//! [`AuthorityError`] without retrying.

use async_trait::async_trait;
use chatproof_rs_config::ProofConfig;
use chatproof_rs_protocol::{
    AuthorityError, SubmissionHistory, SubmissionPayload, SubmitDataResult, ValidationAuthority,
    VerificationRequest, VerifyTokenResult,
};
use log::{debug, warn};
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const VERIFY_TOKEN_PATH: &str = "api/verifications/verify-token";
pub const HISTORICAL_CHATS_PATH: &str = "api/submissions/historical-chats";
pub const SUBMIT_DATA_PATH: &str = "api/submissions/submit-data";

/// reqwest-backed [`ValidationAuthority`].
#[derive(Debug, Clone)]
pub struct HttpValidationAuthority {
    client: Client,
    base_url: String,
}

impl HttpValidationAuthority {
    /// Create a client for `base_url` (http or https) with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AuthorityError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(AuthorityError::InvalidConfig(format!(
                "base url must be http(s): {base_url}"
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AuthorityError::InvalidConfig(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    pub fn from_config(config: &ProofConfig) -> Result<Self, AuthorityError> {
        Self::new(&config.validator_base_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn post<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, AuthorityError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = self.endpoint(path);
        debug!("calling validation authority (path={path})");
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|err| AuthorityError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                "validation authority returned an error (path={path}, status={})",
                status.as_u16()
            );
            return Err(AuthorityError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| AuthorityError::Transport(err.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|err| AuthorityError::Decode(err.to_string()))
    }
}

#[async_trait]
impl ValidationAuthority for HttpValidationAuthority {
    async fn verify_token(
        &self,
        request: &VerificationRequest,
    ) -> Result<VerifyTokenResult, AuthorityError> {
        self.post(VERIFY_TOKEN_PATH, request).await
    }

    async fn historical_chats(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionHistory, AuthorityError> {
        self.post(HISTORICAL_CHATS_PATH, payload).await
    }

    async fn submit_data(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<SubmitDataResult, AuthorityError> {
        self.post(SUBMIT_DATA_PATH, payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rejects_non_http_base_url() {
        let err = HttpValidationAuthority::new("ftp://host", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, AuthorityError::InvalidConfig(_)));
    }

    #[test]
    fn trims_trailing_slash() {
        let authority =
            HttpValidationAuthority::new(" https://host/base/ ", Duration::from_secs(1))
                .expect("authority");
        assert_eq!(authority.base_url(), "https://host/base");
        assert_eq!(
            authority.endpoint(SUBMIT_DATA_PATH),
            "https://host/base/api/submissions/submit-data"
        );
    }
}
