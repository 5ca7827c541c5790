//! In-memory club directory backing the development REST surface.
//!
//! Every operation returns [`ApiException`] for domain failures; the router
//! maps those onto `400 {"error": ...}` responses.

use std::collections::{HashMap, HashSet};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::{seq::SliceRandom, Rng};
use sha2::{Digest, Sha256};
use shared::{
    domain::{Club, ClubId, Player, PlayerId, Session, Team, TeamId, UserId},
    error::ApiException,
    protocol::{
        CreateClubRequest, CreatePlayerRequest, CreateTeamRequest, EntityRef, LoginRequest,
        PlayerPayload, SignupRequest, TeamPayload,
    },
};
use tokio::sync::RwLock;

pub const CLUB_CODE_WORDS: [&str; 10] = [
    "EAGLES",
    "LIONS",
    "TIGERS",
    "BEARS",
    "WOLVES",
    "HAWKS",
    "STORM",
    "FIRE",
    "THUNDER",
    "LIGHTNING",
];

pub const TEAM_CODE_WORDS: [&str; 10] = [
    "SQUAD", "TEAM", "LIONS", "TIGERS", "EAGLES", "HAWKS", "STORM", "FIRE", "STARS", "UNITED",
];

/// Draws `WORD` + four digits until `taken` reports the code as free.
pub fn generate_code<R: Rng>(words: &[&str], rng: &mut R, taken: impl Fn(&str) -> bool) -> String {
    loop {
        let word = words.choose(rng).copied().unwrap_or("CLUB");
        let code = format!("{word}{}", rng.gen_range(1000..10000));
        if !taken(&code) {
            return code;
        }
    }
}

fn password_digest(username: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(username.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    STANDARD.encode(hasher.finalize())
}

fn required(field: &str, value: &str) -> Result<String, ApiException> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiException::new(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

struct UserRecord {
    session: Session,
    password_digest: String,
}

struct ClubRecord {
    club: Club,
    members: HashSet<UserId>,
}

struct TeamRecord {
    team: Team,
    manager_id: UserId,
}

#[derive(Default)]
struct Records {
    users: HashMap<UserId, UserRecord>,
    clubs: HashMap<ClubId, ClubRecord>,
    teams: HashMap<TeamId, TeamRecord>,
    players: Vec<Player>,
    last_id: i64,
}

impl Records {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn user_named(&self, username: &str) -> Option<&UserRecord> {
        self.users
            .values()
            .find(|user| user.session.username == username)
    }

    fn user(&self, user_id: UserId) -> Result<&UserRecord, ApiException> {
        self.users
            .get(&user_id)
            .ok_or_else(|| ApiException::new("User not found"))
    }

    fn club(&self, club_id: ClubId) -> Result<&ClubRecord, ApiException> {
        self.clubs
            .get(&club_id)
            .ok_or_else(|| ApiException::new("Club not found"))
    }

    fn team(&self, team_id: TeamId) -> Result<&TeamRecord, ApiException> {
        self.teams
            .get(&team_id)
            .ok_or_else(|| ApiException::new("Team not found"))
    }

    fn club_view(&self, record: &ClubRecord) -> Club {
        let mut club = record.club.clone();
        club.member_count = record.members.len() as u32;
        club.team_count = self
            .teams
            .values()
            .filter(|team| team.team.club_id == club.id)
            .count() as u32;
        club
    }

    fn team_view(&self, record: &TeamRecord, nest_club: bool) -> TeamPayload {
        let team = &record.team;
        let player_count = self
            .players
            .iter()
            .filter(|player| player.team_id == team.id)
            .count() as u32;
        let club = nest_club.then(|| EntityRef {
            id: team.club_id.0,
            name: self.clubs.get(&team.club_id).map(|c| c.club.name.clone()),
            full_name: None,
        });
        let manager = self.users.get(&record.manager_id).map(|user| EntityRef {
            id: user.session.user_id.0,
            name: None,
            full_name: Some(user.session.full_name.clone()),
        });
        TeamPayload {
            id: team.id,
            name: team.name.clone(),
            team_code: team.team_code.clone(),
            age_group: team.age_group.clone(),
            description: team.description.clone(),
            club_id: None,
            club,
            manager,
            player_count,
            member_count: team.member_count,
        }
    }
}

fn player_view(player: &Player) -> PlayerPayload {
    PlayerPayload {
        id: player.id,
        name: player.name.clone(),
        position: player.position.clone(),
        jersey_number: player.jersey_number,
        team_id: Some(player.team_id),
        team: None,
        goals: player.goals,
        assists: player.assists,
        matches_played: player.matches_played,
        yellow_cards: player.yellow_cards,
        red_cards: player.red_cards,
    }
}

#[derive(Default)]
pub struct Directory {
    records: RwLock<Records>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn signup(&self, req: SignupRequest) -> Result<Session, ApiException> {
        let username = required("Username", &req.username)?;
        if req.password.is_empty() {
            return Err(ApiException::new("Password is required"));
        }
        let email = optional(Some(req.email));

        let mut records = self.records.write().await;
        if records.user_named(&username).is_some() {
            return Err(ApiException::new("Username already exists"));
        }
        if let Some(email) = &email {
            let taken = records
                .users
                .values()
                .any(|user| user.session.email.as_deref() == Some(email.as_str()));
            if taken {
                return Err(ApiException::new("Email already exists"));
            }
        }

        let user_id = UserId(records.next_id());
        let session = Session {
            user_id,
            full_name: req.full_name.trim().to_string(),
            username: username.clone(),
            email,
            role: req.role,
        };
        records.users.insert(
            user_id,
            UserRecord {
                password_digest: password_digest(&username, &req.password),
                session: session.clone(),
            },
        );
        Ok(session)
    }

    pub async fn login(&self, req: LoginRequest) -> Result<Session, ApiException> {
        let records = self.records.read().await;
        let user = records
            .user_named(req.username.trim())
            .filter(|user| {
                user.password_digest == password_digest(&user.session.username, &req.password)
            })
            .ok_or_else(|| ApiException::new("Invalid username or password"))?;
        Ok(user.session.clone())
    }

    pub async fn create_club(&self, req: CreateClubRequest) -> Result<Club, ApiException> {
        let name = required("Club name", &req.name)?;
        let mut records = self.records.write().await;
        records.user(req.owner_id)?;

        let club_code = generate_code(&CLUB_CODE_WORDS, &mut rand::thread_rng(), |code| {
            records.clubs.values().any(|c| c.club.club_code == code)
        });
        let club_id = ClubId(records.next_id());
        let record = ClubRecord {
            club: Club {
                id: club_id,
                name,
                club_code,
                description: optional(req.description),
                location: optional(req.location),
                member_count: 0,
                team_count: 0,
            },
            members: HashSet::from([req.owner_id]),
        };
        let club = records.club_view(&record);
        records.clubs.insert(club_id, record);
        Ok(club)
    }

    pub async fn list_clubs(&self) -> Vec<Club> {
        let records = self.records.read().await;
        let mut clubs: Vec<Club> = records
            .clubs
            .values()
            .map(|record| records.club_view(record))
            .collect();
        clubs.sort_by_key(|club| club.id.0);
        clubs
    }

    pub async fn find_club_by_code(&self, code: &str) -> Result<Club, ApiException> {
        let code = code.trim().to_ascii_uppercase();
        let records = self.records.read().await;
        records
            .clubs
            .values()
            .find(|record| record.club.club_code == code)
            .map(|record| records.club_view(record))
            .ok_or_else(|| ApiException::new("Club not found"))
    }

    pub async fn create_team(&self, req: CreateTeamRequest) -> Result<TeamPayload, ApiException> {
        let name = required("Team name", &req.name)?;
        let mut records = self.records.write().await;
        records.club(req.club_id)?;
        records.user(req.manager_id)?;

        let team_code = generate_code(&TEAM_CODE_WORDS, &mut rand::thread_rng(), |code| {
            records.teams.values().any(|t| t.team.team_code == code)
        });
        let team_id = TeamId(records.next_id());
        let record = TeamRecord {
            team: Team {
                id: team_id,
                club_id: req.club_id,
                name,
                age_group: optional(req.age_group),
                description: optional(req.description),
                team_code,
                player_count: 0,
                member_count: 0,
            },
            manager_id: req.manager_id,
        };
        let payload = records.team_view(&record, true);
        records.teams.insert(team_id, record);
        Ok(payload)
    }

    /// Teams of a club, oldest first. List entries carry no club reference.
    pub async fn list_teams(&self, club_id: ClubId) -> Result<Vec<TeamPayload>, ApiException> {
        let records = self.records.read().await;
        records.club(club_id)?;
        let mut teams: Vec<&TeamRecord> = records
            .teams
            .values()
            .filter(|record| record.team.club_id == club_id)
            .collect();
        teams.sort_by_key(|record| record.team.id.0);
        Ok(teams
            .into_iter()
            .map(|record| records.team_view(record, false))
            .collect())
    }

    pub async fn find_team_by_code(&self, code: &str) -> Result<TeamPayload, ApiException> {
        let code = code.trim().to_ascii_uppercase();
        let records = self.records.read().await;
        records
            .teams
            .values()
            .find(|record| record.team.team_code == code)
            .map(|record| records.team_view(record, true))
            .ok_or_else(|| ApiException::new("Team not found"))
    }

    pub async fn create_player(
        &self,
        req: CreatePlayerRequest,
    ) -> Result<PlayerPayload, ApiException> {
        let name = required("Player name", &req.name)?;
        let mut records = self.records.write().await;
        records.team(req.team_id)?;

        let player = Player {
            id: PlayerId(records.next_id()),
            team_id: req.team_id,
            name,
            position: optional(req.position),
            jersey_number: req.jersey_number,
            goals: 0,
            assists: 0,
            matches_played: 0,
            yellow_cards: 0,
            red_cards: 0,
        };
        let payload = player_view(&player);
        records.players.push(player);
        Ok(payload)
    }

    pub async fn list_players(&self, team_id: TeamId) -> Result<Vec<PlayerPayload>, ApiException> {
        let records = self.records.read().await;
        records.team(team_id)?;
        Ok(records
            .players
            .iter()
            .filter(|player| player.team_id == team_id)
            .map(player_view)
            .collect())
    }
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
