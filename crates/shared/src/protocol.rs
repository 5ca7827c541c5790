use serde::{Deserialize, Serialize};

use crate::domain::{
    empty_as_none, ClubId, Player, PlayerId, Role, Team, TeamId, UserId,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClubRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub owner_id: UserId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequest {
    pub name: String,
    #[serde(default)]
    pub age_group: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub club_id: ClubId,
    pub manager_id: UserId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlayerRequest {
    pub name: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub jersey_number: Option<u32>,
    pub team_id: TeamId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRef {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// Team as it appears on the wire. List responses omit `clubId`; create and
/// code-lookup responses nest it as `club.id` instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPayload {
    pub id: TeamId,
    pub name: String,
    pub team_code: String,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub age_group: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club_id: Option<ClubId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club: Option<EntityRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<EntityRef>,
    #[serde(default)]
    pub player_count: u32,
    #[serde(default)]
    pub member_count: u32,
}

impl TeamPayload {
    pub fn owning_club(&self) -> Option<ClubId> {
        self.club_id
            .or_else(|| self.club.as_ref().map(|club| ClubId(club.id)))
    }

    pub fn into_team(self, queried_club: ClubId) -> Team {
        Team {
            club_id: self.owning_club().unwrap_or(queried_club),
            id: self.id,
            name: self.name,
            age_group: self.age_group,
            description: self.description,
            team_code: self.team_code,
            player_count: self.player_count,
            member_count: self.member_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPayload {
    pub id: PlayerId,
    pub name: String,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jersey_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<TeamId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<EntityRef>,
    #[serde(default)]
    pub goals: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub matches_played: u32,
    #[serde(default)]
    pub yellow_cards: u32,
    #[serde(default)]
    pub red_cards: u32,
}

impl PlayerPayload {
    pub fn into_player(self, queried_team: TeamId) -> Player {
        let team_id = self
            .team_id
            .or_else(|| self.team.as_ref().map(|team| TeamId(team.id)))
            .unwrap_or(queried_team);
        Player {
            id: self.id,
            team_id,
            name: self.name,
            position: self.position,
            jersey_number: self.jersey_number,
            goals: self.goals,
            assists: self.assists,
            matches_played: self.matches_played,
            yellow_cards: self.yellow_cards,
            red_cards: self.red_cards,
        }
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
