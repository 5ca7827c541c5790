//! REST collaborators consumed by the controller.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Club, ClubId, Player, Session, Team, TeamId},
    error::ApiError,
    protocol::{
        CreateClubRequest, CreatePlayerRequest, CreateTeamRequest, LoginRequest, PlayerPayload,
        SignupRequest, TeamPayload,
    },
};
use tracing::debug;

use crate::error::ControllerError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub type ApiResult<T> = Result<T, ControllerError>;

/// Auth, club, team and player services. One trait so tests can stub the
/// whole backend with a single value.
#[async_trait]
pub trait ClubApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> ApiResult<Session>;
    async fn signup(&self, request: &SignupRequest) -> ApiResult<Session>;
    async fn create_club(&self, request: &CreateClubRequest) -> ApiResult<Club>;
    async fn find_club_by_code(&self, club_code: &str) -> ApiResult<Club>;
    async fn create_team(&self, request: &CreateTeamRequest) -> ApiResult<Team>;
    async fn list_teams(&self, club_id: ClubId) -> ApiResult<Vec<Team>>;
    async fn create_player(&self, request: &CreatePlayerRequest) -> ApiResult<Player>;
    async fn list_players(&self, team_id: TeamId) -> ApiResult<Vec<Player>>;
}

pub struct HttpClubApi {
    http: Client,
    base_url: String,
}

impl HttpClubApi {
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Turns a non-2xx response into `Rejected`, preferring the `{ error }` body
/// and falling back to the status text.
async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiError>(&body)
        .map(|err| err.error)
        .ok()
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
        });
    debug!(status = status.as_u16(), %message, "backend rejected request");
    Err(ControllerError::Rejected {
        status: status.as_u16(),
        message,
    })
}

fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[async_trait]
impl ClubApi for HttpClubApi {
    async fn login(&self, request: &LoginRequest) -> ApiResult<Session> {
        let response = self
            .http
            .post(self.endpoint("auth/login"))
            .json(request)
            .send()
            .await?;
        decode(response).await
    }

    async fn signup(&self, request: &SignupRequest) -> ApiResult<Session> {
        let response = self
            .http
            .post(self.endpoint("auth/signup"))
            .json(request)
            .send()
            .await?;
        decode(response).await
    }

    async fn create_club(&self, request: &CreateClubRequest) -> ApiResult<Club> {
        let response = self
            .http
            .post(self.endpoint("clubs"))
            .json(request)
            .send()
            .await?;
        decode(response).await
    }

    async fn find_club_by_code(&self, club_code: &str) -> ApiResult<Club> {
        let response = self
            .http
            .get(self.endpoint(&format!("clubs/code/{}", encode_segment(club_code))))
            .send()
            .await?;
        decode(response).await
    }

    async fn create_team(&self, request: &CreateTeamRequest) -> ApiResult<Team> {
        let response = self
            .http
            .post(self.endpoint("teams"))
            .json(request)
            .send()
            .await?;
        let payload: TeamPayload = decode(response).await?;
        Ok(payload.into_team(request.club_id))
    }

    async fn list_teams(&self, club_id: ClubId) -> ApiResult<Vec<Team>> {
        let response = self
            .http
            .get(self.endpoint(&format!("teams/club/{}", club_id.0)))
            .send()
            .await?;
        let payloads: Vec<TeamPayload> = decode(response).await?;
        Ok(payloads
            .into_iter()
            .map(|payload| payload.into_team(club_id))
            .collect())
    }

    async fn create_player(&self, request: &CreatePlayerRequest) -> ApiResult<Player> {
        let response = self
            .http
            .post(self.endpoint("players"))
            .json(request)
            .send()
            .await?;
        let payload: PlayerPayload = decode(response).await?;
        Ok(payload.into_player(request.team_id))
    }

    async fn list_players(&self, team_id: TeamId) -> ApiResult<Vec<Player>> {
        let response = self
            .http
            .get(self.endpoint(&format!("players/team/{}", team_id.0)))
            .send()
            .await?;
        let payloads: Vec<PlayerPayload> = decode(response).await?;
        Ok(payloads
            .into_iter()
            .map(|payload| payload.into_player(team_id))
            .collect())
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
