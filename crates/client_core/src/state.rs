//! Navigation state and its reducer.
//!
//! The visible screen is never stored. It is derived from which of
//! `identity`, `club` and `selected_team` are present plus the main tab.

use shared::domain::{Club, ClubId, Player, Session, Team, TeamId};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Dashboard,
    Teams,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Auth,
    ClubSelection,
    Dashboard,
    Teams,
    Players(Team),
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Auth => "auth",
            Screen::ClubSelection => "club_selection",
            Screen::Dashboard => "dashboard",
            Screen::Teams => "teams",
            Screen::Players(_) => "players",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    SignedIn(Session),
    ClubSelected(Club),
    ShowDashboard,
    ShowTeams,
    TeamOpened(TeamId),
    TeamsLoaded { club_id: ClubId, teams: Vec<Team> },
    PlayersLoaded { team_id: TeamId, players: Vec<Player> },
    SignedOut,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::SignedIn(_) => "signed_in",
            Action::ClubSelected(_) => "club_selected",
            Action::ShowDashboard => "show_dashboard",
            Action::ShowTeams => "show_teams",
            Action::TeamOpened(_) => "team_opened",
            Action::TeamsLoaded { .. } => "teams_loaded",
            Action::PlayersLoaded { .. } => "players_loaded",
            Action::SignedOut => "signed_out",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("not signed in")]
    NotAuthenticated,
    #[error("no club selected")]
    NoClub,
    #[error("no team selected")]
    NoTeam,
    #[error("team {team_id} is not part of the selected club")]
    UnknownTeam { team_id: TeamId },
    #[error("teams can only be opened from the team list")]
    NotOnTeamList,
    #[error("stale result for {0}; selection changed while it was loading")]
    Stale(&'static str),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavState {
    identity: Option<Session>,
    club: Option<Club>,
    tab: Tab,
    selected_team: Option<Team>,
    teams: Vec<Team>,
    players: Vec<Player>,
}

impl NavState {
    pub fn identity(&self) -> Option<&Session> {
        self.identity.as_ref()
    }

    pub fn club(&self) -> Option<&Club> {
        self.club.as_ref()
    }

    pub fn selected_team(&self) -> Option<&Team> {
        self.selected_team.as_ref()
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn screen(&self) -> Screen {
        if self.identity.is_none() {
            return Screen::Auth;
        }
        if self.club.is_none() {
            return Screen::ClubSelection;
        }
        if let Some(team) = &self.selected_team {
            return Screen::Players(team.clone());
        }
        match self.tab {
            Tab::Dashboard => Screen::Dashboard,
            Tab::Teams => Screen::Teams,
        }
    }

    /// Applies `action` to a copy of the state. On error `self` is untouched.
    pub fn apply(&self, action: Action) -> Result<NavState, TransitionError> {
        let mut next = self.clone();
        match action {
            Action::SignedIn(session) => {
                // A different account never inherits the previous selection.
                if next.identity.as_ref().map(|s| s.user_id) != Some(session.user_id) {
                    next = NavState::default();
                }
                next.identity = Some(session);
            }
            Action::ClubSelected(club) => {
                if next.identity.is_none() {
                    return Err(TransitionError::NotAuthenticated);
                }
                if next.club.as_ref().map(|c| c.id) != Some(club.id) {
                    next.teams.clear();
                }
                next.club = Some(club);
                next.tab = Tab::Dashboard;
                next.selected_team = None;
                next.players.clear();
            }
            Action::ShowDashboard => {
                next.require_club()?;
                next.tab = Tab::Dashboard;
                next.selected_team = None;
                next.players.clear();
            }
            Action::ShowTeams => {
                next.require_club()?;
                next.tab = Tab::Teams;
                next.selected_team = None;
                next.players.clear();
            }
            Action::TeamOpened(team_id) => {
                next.require_club()?;
                if next.tab != Tab::Teams || next.selected_team.is_some() {
                    return Err(TransitionError::NotOnTeamList);
                }
                let team = next
                    .teams
                    .iter()
                    .find(|team| team.id == team_id)
                    .cloned()
                    .ok_or(TransitionError::UnknownTeam { team_id })?;
                next.tab = Tab::Teams;
                next.selected_team = Some(team);
                next.players.clear();
            }
            Action::TeamsLoaded { club_id, teams } => {
                let club = next.require_club()?;
                if club.id != club_id {
                    return Err(TransitionError::Stale("teams"));
                }
                let teams: Vec<Team> = teams
                    .into_iter()
                    .filter(|team| team.club_id == club_id)
                    .collect();
                let team_count = u32::try_from(teams.len()).unwrap_or(u32::MAX);
                if let Some(club) = next.club.as_mut() {
                    club.team_count = team_count;
                }
                if let Some(selected_id) = next.selected_team.as_ref().map(|team| team.id) {
                    match teams.iter().find(|team| team.id == selected_id) {
                        Some(fresh) => next.selected_team = Some(fresh.clone()),
                        None => {
                            // The open team is gone from its club.
                            next.selected_team = None;
                            next.players.clear();
                        }
                    }
                }
                next.teams = teams;
            }
            Action::PlayersLoaded { team_id, players } => {
                let selected = next
                    .selected_team
                    .as_ref()
                    .ok_or(TransitionError::NoTeam)?;
                if selected.id != team_id {
                    return Err(TransitionError::Stale("players"));
                }
                let player_count = u32::try_from(players.len()).unwrap_or(u32::MAX);
                if let Some(selected) = next.selected_team.as_mut() {
                    selected.player_count = player_count;
                }
                if let Some(listed) = next.teams.iter_mut().find(|team| team.id == team_id) {
                    listed.player_count = player_count;
                }
                next.players = players
                    .into_iter()
                    .filter(|player| player.team_id == team_id)
                    .collect();
            }
            Action::SignedOut => {
                next = NavState::default();
            }
        }
        Ok(next)
    }

    fn require_club(&self) -> Result<&Club, TransitionError> {
        if self.identity.is_none() {
            return Err(TransitionError::NotAuthenticated);
        }
        self.club.as_ref().ok_or(TransitionError::NoClub)
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
