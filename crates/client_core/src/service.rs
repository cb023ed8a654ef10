//! The remote league service: the trait the controllers depend on and its
//! HTTP implementation.

use std::{future::Future, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::{LeagueId, LeagueSnapshot, OddsEntry, ScenarioReport, TeamId},
    error::ErrorBody,
    protocol::{decode_odds, LeaguePayload, OddsPayload, ScenarioPayload},
};
use tracing::debug;
use url::Url;

use crate::error::ServiceError;

const USER_AGENT: &str = concat!("playoff-dashboard/", env!("CARGO_PKG_VERSION"));

#[async_trait]
pub trait LeagueService: Send + Sync {
    async fn get_snapshot(&self, league_id: &LeagueId) -> Result<LeagueSnapshot, ServiceError>;
    async fn get_odds(&self, league_id: &LeagueId) -> Result<Vec<OddsEntry>, ServiceError>;
    async fn get_scenarios(
        &self,
        league_id: &LeagueId,
        team_id: &TeamId,
    ) -> Result<ScenarioReport, ServiceError>;
}

/// Bounds any service call, whatever the implementation does internally.
pub(crate) async fn with_deadline<T, F>(deadline: Duration, call: F) -> Result<T, ServiceError>
where
    F: Future<Output = Result<T, ServiceError>>,
{
    match tokio::time::timeout(deadline, call).await {
        Ok(result) => result,
        Err(_) => Err(ServiceError::Timeout(deadline)),
    }
}

#[derive(Debug, Clone)]
pub struct HttpLeagueService {
    http: Client,
    base_url: Url,
    timeout: Duration,
}

impl HttpLeagueService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let base_url =
            Url::parse(base_url).map_err(|_| ServiceError::InvalidUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ServiceError::InvalidUrl(base_url.to_string()));
        }
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            base_url,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends percent-encoded path segments to the base url.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ServiceError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ServiceError> {
        debug!(%url, "league service request");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.detail)
                .unwrap_or_else(|_| status.to_string());
            return Err(if status == StatusCode::NOT_FOUND {
                ServiceError::NotFound(detail)
            } else {
                ServiceError::Status {
                    status: status.as_u16(),
                    detail,
                }
            });
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                ServiceError::Timeout(self.timeout)
            } else {
                ServiceError::Malformed(e.to_string())
            }
        })
    }

    fn map_transport(&self, error: reqwest::Error) -> ServiceError {
        if error.is_timeout() {
            ServiceError::Timeout(self.timeout)
        } else {
            ServiceError::Transport(error.to_string())
        }
    }
}

#[async_trait]
impl LeagueService for HttpLeagueService {
    async fn get_snapshot(&self, league_id: &LeagueId) -> Result<LeagueSnapshot, ServiceError> {
        let url = self.endpoint(&["api", "league", league_id.as_str()])?;
        let payload: LeaguePayload = self.get_json(url).await?;
        Ok(payload.into_snapshot()?)
    }

    async fn get_odds(&self, league_id: &LeagueId) -> Result<Vec<OddsEntry>, ServiceError> {
        let url = self.endpoint(&["api", "league", league_id.as_str(), "odds"])?;
        let payload: Vec<OddsPayload> = self.get_json(url).await?;
        Ok(decode_odds(payload)?)
    }

    async fn get_scenarios(
        &self,
        league_id: &LeagueId,
        team_id: &TeamId,
    ) -> Result<ScenarioReport, ServiceError> {
        let url = self.endpoint(&[
            "api",
            "league",
            league_id.as_str(),
            "scenarios",
            team_id.as_str(),
        ])?;
        let payload: ScenarioPayload = self.get_json(url).await?;
        Ok(payload.into_report(league_id, team_id)?)
    }
}

#[cfg(test)]
#[path = "tests/service_tests.rs"]
mod tests;
