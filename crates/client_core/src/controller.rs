//! Session/navigation controller: owns the [`NavState`], calls the backend,
//! and folds results back in through the reducer.

use std::{
    collections::HashSet,
    fmt,
    sync::{Arc, Mutex as StdMutex},
};

use serde::{de::DeserializeOwned, Serialize};
use shared::domain::{Club, Player, Session, Team, TeamId};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::{
    api::ClubApi,
    error::{ControllerError, ErrorCategory},
    forms::{normalize_club_code, ClubForm, LoginForm, PlayerForm, SignupForm, TeamForm},
    state::{Action, NavState, Screen, TransitionError},
    store::{SessionStore, CLUB_KEY, SESSION_KEY},
};

/// Entity kinds with at most one mutating request in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mutation {
    Auth,
    Club,
    Team,
    Player,
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mutation::Auth => "sign-in",
            Mutation::Club => "club",
            Mutation::Team => "team",
            Mutation::Player => "player",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub enum ControllerEvent {
    StateChanged(Screen),
    Notice(String),
    Error {
        category: ErrorCategory,
        message: String,
    },
}

struct InflightGuard<'a> {
    set: &'a StdMutex<HashSet<Mutation>>,
    mutation: Mutation,
}

impl Drop for InflightGuard<'_> {
    fn drop(&mut self) {
        let mut set = self.set.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        set.remove(&self.mutation);
    }
}

pub struct SessionController {
    api: Arc<dyn ClubApi>,
    store: Arc<dyn SessionStore>,
    state: Mutex<NavState>,
    inflight: StdMutex<HashSet<Mutation>>,
    events: broadcast::Sender<ControllerEvent>,
}

impl SessionController {
    pub fn new(api: Arc<dyn ClubApi>, store: Arc<dyn SessionStore>) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            api,
            store,
            state: Mutex::new(NavState::default()),
            inflight: StdMutex::new(HashSet::new()),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> NavState {
        self.state.lock().await.clone()
    }

    pub async fn screen(&self) -> Screen {
        self.state.lock().await.screen()
    }

    /// Rebuilds state from the session store. Entries that no longer parse
    /// are dropped from the store rather than failing the restore.
    pub async fn restore(&self) -> Result<Screen, ControllerError> {
        let result = self.restore_inner().await;
        self.report(result)
    }

    pub async fn login(&self, form: LoginForm) -> Result<Session, ControllerError> {
        let result = self.login_inner(form).await;
        self.report(result)
    }

    pub async fn signup(&self, form: SignupForm) -> Result<Session, ControllerError> {
        let result = self.signup_inner(form).await;
        self.report(result)
    }

    pub async fn create_club(&self, form: ClubForm) -> Result<Club, ControllerError> {
        let result = self.create_club_inner(form).await;
        self.report(result)
    }

    pub async fn join_club(&self, club_code: &str) -> Result<Club, ControllerError> {
        let result = self.join_club_inner(club_code).await;
        self.report(result)
    }

    pub async fn go_to_dashboard(&self) -> Result<(), ControllerError> {
        let result = self.commit(Action::ShowDashboard).await.map(|_| ());
        self.report(result.map_err(ControllerError::from))
    }

    /// Switches to the team list, then refreshes it. A failed refresh keeps
    /// the previous list and is returned as the error.
    pub async fn go_to_teams(&self) -> Result<Vec<Team>, ControllerError> {
        let result = match self.commit(Action::ShowTeams).await {
            Ok(_) => self.refresh_teams().await,
            Err(err) => Err(err.into()),
        };
        self.report(result)
    }

    /// Opens a team from the team list. The player list is fetched first
    /// and the selection is only committed once it arrives.
    pub async fn open_team(&self, team_id: TeamId) -> Result<Vec<Player>, ControllerError> {
        let result = self.open_team_inner(team_id).await;
        self.report(result)
    }

    pub async fn create_team(&self, form: TeamForm) -> Result<Team, ControllerError> {
        let result = self.create_team_inner(form).await;
        self.report(result)
    }

    pub async fn add_player(&self, form: PlayerForm) -> Result<Player, ControllerError> {
        let result = self.add_player_inner(form).await;
        self.report(result)
    }

    pub async fn refresh_teams(&self) -> Result<Vec<Team>, ControllerError> {
        let club_id = {
            let guard = self.state.lock().await;
            guard.club().map(|club| club.id).ok_or(TransitionError::NoClub)?
        };

        let teams = self.api.list_teams(club_id).await?;
        match self
            .commit(Action::TeamsLoaded {
                club_id,
                teams: teams.clone(),
            })
            .await
        {
            Ok(_) => {}
            Err(
                TransitionError::Stale(_)
                | TransitionError::NoClub
                | TransitionError::NotAuthenticated,
            ) => {
                debug!(club_id = club_id.0, "dropping team list for deselected club");
            }
            Err(err) => return Err(err.into()),
        }
        Ok(teams)
    }

    /// Clears identity, club and team selection plus the persisted entries.
    /// Safe to call repeatedly.
    pub async fn logout(&self) {
        let was_signed_in = self.state.lock().await.identity().is_some();
        if let Err(err) = self.commit(Action::SignedOut).await {
            debug!(error = %err, "sign-out transition rejected");
        }
        self.forget(SESSION_KEY).await;
        self.forget(CLUB_KEY).await;
        if was_signed_in {
            info!("signed out");
        }
    }

    async fn restore_inner(&self) -> Result<Screen, ControllerError> {
        let Some(session) = self.load_persisted::<Session>(SESSION_KEY).await? else {
            // A club without a session is meaningless.
            self.forget(CLUB_KEY).await;
            return Ok(self.screen().await);
        };
        // Both entries are read before anything is committed.
        let club = self.load_persisted::<Club>(CLUB_KEY).await?;

        self.commit(Action::SignedIn(session.clone())).await?;
        info!(user_id = session.user_id.0, role = session.role.as_str(), "restored session");

        if let Some(club) = club {
            info!(club_id = club.id.0, club_code = %club.club_code, "restored club");
            self.commit(Action::ClubSelected(club)).await?;
            if let Err(err) = self.refresh_teams().await {
                warn!(error = %err, "failed to refresh teams for restored club");
            }
        }

        Ok(self.screen().await)
    }

    async fn login_inner(&self, form: LoginForm) -> Result<Session, ControllerError> {
        let request = form.into_request()?;
        let _guard = self.begin(Mutation::Auth)?;
        let session = self.api.login(&request).await?;
        self.sign_in(session).await
    }

    async fn signup_inner(&self, form: SignupForm) -> Result<Session, ControllerError> {
        let request = form.into_request()?;
        let _guard = self.begin(Mutation::Auth)?;
        let session = self.api.signup(&request).await?;
        self.sign_in(session).await
    }

    async fn sign_in(&self, session: Session) -> Result<Session, ControllerError> {
        let next = self.commit(Action::SignedIn(session.clone())).await?;
        self.persist(SESSION_KEY, &session).await;
        if next.club().is_none() {
            self.forget(CLUB_KEY).await;
        }
        info!(user_id = session.user_id.0, role = session.role.as_str(), "signed in");
        Ok(session)
    }

    async fn create_club_inner(&self, form: ClubForm) -> Result<Club, ControllerError> {
        let session = self.require_manager("create a club").await?;
        let request = form.into_request(session.user_id)?;
        let _guard = self.begin(Mutation::Club)?;

        let club = self.api.create_club(&request).await?;
        self.select_club(club.clone()).await?;
        info!(club_id = club.id.0, club_code = %club.club_code, "created club");
        self.notice(format!("Club created! Club code: {}", club.club_code));
        Ok(club)
    }

    async fn join_club_inner(&self, club_code: &str) -> Result<Club, ControllerError> {
        self.require_identity().await?;
        let club_code = normalize_club_code(club_code)?;
        let _guard = self.begin(Mutation::Club)?;

        let club = self.api.find_club_by_code(&club_code).await?;
        self.select_club(club.clone()).await?;
        info!(club_id = club.id.0, club_code = %club.club_code, "joined club");
        self.notice(format!("Joined {}!", club.name));
        Ok(club)
    }

    async fn select_club(&self, club: Club) -> Result<(), ControllerError> {
        self.commit(Action::ClubSelected(club.clone())).await?;
        self.persist(CLUB_KEY, &club).await;
        if let Err(err) = self.refresh_teams().await {
            warn!(club_id = club.id.0, error = %err, "failed to load teams for new club");
            self.emit_error(&err);
        }
        Ok(())
    }

    async fn open_team_inner(&self, team_id: TeamId) -> Result<Vec<Player>, ControllerError> {
        // Validate against the current state before touching the network.
        self.state.lock().await.apply(Action::TeamOpened(team_id))?;

        let players = self.api.list_players(team_id).await?;

        let next = {
            let mut guard = self.state.lock().await;
            let next = guard
                .apply(Action::TeamOpened(team_id))?
                .apply(Action::PlayersLoaded {
                    team_id,
                    players: players.clone(),
                })?;
            *guard = next.clone();
            next
        };
        let _ = self.events.send(ControllerEvent::StateChanged(next.screen()));
        info!(team_id = team_id.0, players = players.len(), "opened team");
        Ok(players)
    }

    async fn create_team_inner(&self, form: TeamForm) -> Result<Team, ControllerError> {
        let session = self.require_manager("create a team").await?;
        let club_id = {
            let guard = self.state.lock().await;
            guard.club().map(|club| club.id).ok_or(TransitionError::NoClub)?
        };
        let request = form.into_request(club_id, session.user_id)?;
        let _guard = self.begin(Mutation::Team)?;

        let team = self.api.create_team(&request).await?;
        info!(team_id = team.id.0, team_code = %team.team_code, "created team");

        if let Err(err) = self.refresh_teams().await {
            warn!(error = %err, "failed to refresh teams after create; appending locally");
            let mut teams = self.snapshot().await.teams().to_vec();
            if !teams.iter().any(|existing| existing.id == team.id) {
                teams.push(team.clone());
            }
            if let Err(err) = self.commit(Action::TeamsLoaded { club_id, teams }).await {
                debug!(error = %err, "dropping created team for deselected club");
            }
        }
        self.notice(format!("Team created! Team code: {}", team.team_code));
        Ok(team)
    }

    async fn add_player_inner(&self, form: PlayerForm) -> Result<Player, ControllerError> {
        self.require_manager("add a player").await?;
        let team_id = {
            let guard = self.state.lock().await;
            guard
                .selected_team()
                .map(|team| team.id)
                .ok_or(TransitionError::NoTeam)?
        };
        let request = form.into_request(team_id)?;
        let _guard = self.begin(Mutation::Player)?;

        let player = self.api.create_player(&request).await?;
        info!(player_id = player.id.0, team_id = team_id.0, "added player");

        let players = match self.api.list_players(team_id).await {
            Ok(players) => players,
            Err(err) => {
                warn!(error = %err, "failed to refresh players after add; appending locally");
                let mut players = self.snapshot().await.players().to_vec();
                if !players.iter().any(|existing| existing.id == player.id) {
                    players.push(player.clone());
                }
                players
            }
        };
        if let Err(err) = self
            .commit(Action::PlayersLoaded { team_id, players })
            .await
        {
            debug!(error = %err, "dropping player list for deselected team");
        }
        Ok(player)
    }

    async fn commit(&self, action: Action) -> Result<NavState, TransitionError> {
        let name = action.name();
        let next = {
            let mut guard = self.state.lock().await;
            let next = guard.apply(action)?;
            *guard = next.clone();
            next
        };
        debug!(action = name, screen = next.screen().name(), "state committed");
        let _ = self.events.send(ControllerEvent::StateChanged(next.screen()));
        Ok(next)
    }

    fn begin(&self, mutation: Mutation) -> Result<InflightGuard<'_>, ControllerError> {
        let mut set = self
            .inflight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !set.insert(mutation) {
            return Err(ControllerError::Busy(mutation));
        }
        Ok(InflightGuard {
            set: &self.inflight,
            mutation,
        })
    }

    async fn require_identity(&self) -> Result<Session, ControllerError> {
        let guard = self.state.lock().await;
        guard
            .identity()
            .cloned()
            .ok_or_else(|| TransitionError::NotAuthenticated.into())
    }

    async fn require_manager(&self, what: &str) -> Result<Session, ControllerError> {
        let session = self.require_identity().await?;
        if !session.role.can_manage() {
            return Err(ControllerError::Forbidden(what.to_string()));
        }
        Ok(session)
    }

    async fn load_persisted<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<T>, ControllerError> {
        let Some(raw) = self
            .store
            .load(key)
            .await
            .map_err(ControllerError::Storage)?
        else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn!(key, error = %err, "discarding unreadable persisted entry");
                self.forget(key).await;
                Ok(None)
            }
        }
    }

    async fn persist<T: Serialize>(&self, key: &str, value: &T) {
        let encoded = match serde_json::to_string(value) {
            Ok(encoded) => encoded,
            Err(err) => {
                warn!(key, error = %err, "failed to encode entry for persistence");
                return;
            }
        };
        if let Err(err) = self.store.save(key, &encoded).await {
            warn!(key, error = %err, "failed to persist entry");
        }
    }

    async fn forget(&self, key: &str) {
        if let Err(err) = self.store.remove(key).await {
            warn!(key, error = %err, "failed to remove persisted entry");
        }
    }

    fn notice(&self, message: String) {
        let _ = self.events.send(ControllerEvent::Notice(message));
    }

    fn emit_error(&self, err: &ControllerError) {
        let _ = self.events.send(ControllerEvent::Error {
            category: err.category(),
            message: err.user_message(),
        });
    }

    fn report<T>(&self, result: Result<T, ControllerError>) -> Result<T, ControllerError> {
        if let Err(err) = &result {
            self.emit_error(err);
        }
        result
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
