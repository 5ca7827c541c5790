use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use shared::{
    domain::{Club, ClubId, Session, TeamId},
    error::{ApiError, ApiException},
    protocol::{
        CreateClubRequest, CreatePlayerRequest, CreateTeamRequest, LoginRequest, PlayerPayload,
        SignupRequest, TeamPayload,
    },
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;

use app_state::AppState;
use config::load_settings;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = load_settings()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .init();

    let app = build_router(Arc::new(AppState::default()));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "dev backend listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/auth/login", post(login))
        .route("/api/auth/signup", post(signup))
        .route("/api/clubs", get(list_clubs).post(create_club))
        .route("/api/clubs/code/:code", get(find_club_by_code))
        .route("/api/teams", post(create_team))
        .route("/api/teams/club/:club_id", get(list_teams))
        .route("/api/teams/code/:code", get(find_team_by_code))
        .route("/api/players", post(create_player))
        .route("/api/players/team/:team_id", get(list_players))
        .with_state(state)
}

fn rejected(err: ApiException) -> (StatusCode, Json<ApiError>) {
    (StatusCode::BAD_REQUEST, Json(err.into()))
}

async fn healthz() -> &'static str {
    "ok"
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Session> {
    let session = state.directory.login(req).await.map_err(rejected)?;
    info!(user_id = session.user_id.0, "login");
    Ok(Json(session))
}

async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<Session> {
    let session = state.directory.signup(req).await.map_err(rejected)?;
    info!(
        user_id = session.user_id.0,
        role = session.role.as_str(),
        "signup"
    );
    Ok(Json(session))
}

async fn list_clubs(State(state): State<Arc<AppState>>) -> Json<Vec<Club>> {
    Json(state.directory.list_clubs().await)
}

async fn create_club(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateClubRequest>,
) -> ApiResult<Club> {
    let club = state.directory.create_club(req).await.map_err(rejected)?;
    info!(club_id = club.id.0, club_code = %club.club_code, "club created");
    Ok(Json(club))
}

async fn find_club_by_code(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> ApiResult<Club> {
    let club = state
        .directory
        .find_club_by_code(&code)
        .await
        .map_err(rejected)?;
    Ok(Json(club))
}

async fn create_team(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTeamRequest>,
) -> ApiResult<TeamPayload> {
    let team = state.directory.create_team(req).await.map_err(rejected)?;
    info!(team_id = team.id.0, team_code = %team.team_code, "team created");
    Ok(Json(team))
}

async fn list_teams(
    State(state): State<Arc<AppState>>,
    Path(club_id): Path<i64>,
) -> ApiResult<Vec<TeamPayload>> {
    let teams = state
        .directory
        .list_teams(ClubId(club_id))
        .await
        .map_err(rejected)?;
    Ok(Json(teams))
}

async fn find_team_by_code(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> ApiResult<TeamPayload> {
    let team = state
        .directory
        .find_team_by_code(&code)
        .await
        .map_err(rejected)?;
    Ok(Json(team))
}

async fn create_player(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreatePlayerRequest>,
) -> ApiResult<PlayerPayload> {
    let player = state.directory.create_player(req).await.map_err(rejected)?;
    info!(player_id = player.id.0, "player added");
    Ok(Json(player))
}

async fn list_players(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<i64>,
) -> ApiResult<Vec<PlayerPayload>> {
    let players = state
        .directory
        .list_players(TeamId(team_id))
        .await
        .map_err(rejected)?;
    Ok(Json(players))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
