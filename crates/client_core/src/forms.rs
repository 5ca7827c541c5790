//! User-entered forms and the client-side checks that run before any request.

use shared::{
    domain::{ClubId, Role, TeamId, UserId},
    protocol::{
        CreateClubRequest, CreatePlayerRequest, CreateTeamRequest, LoginRequest, SignupRequest,
    },
};

use crate::error::ControllerError;

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: Role,
}

#[derive(Debug, Clone, Default)]
pub struct ClubForm {
    pub name: String,
    pub description: String,
    pub location: String,
}

#[derive(Debug, Clone, Default)]
pub struct TeamForm {
    pub name: String,
    pub age_group: String,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct PlayerForm {
    pub name: String,
    pub position: String,
    /// Raw text as typed; blank means no jersey number.
    pub jersey_number: String,
}

fn required(field: &str, value: &str) -> Result<String, ControllerError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ControllerError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Club codes are matched case-insensitively by upper-casing what was typed.
pub fn normalize_club_code(code: &str) -> Result<String, ControllerError> {
    Ok(required("club code", code)?.to_ascii_uppercase())
}

impl LoginForm {
    pub fn into_request(self) -> Result<LoginRequest, ControllerError> {
        let username = required("username", &self.username)?;
        if self.password.is_empty() {
            return Err(ControllerError::Validation("password is required".into()));
        }
        Ok(LoginRequest {
            username,
            password: self.password,
        })
    }
}

impl SignupForm {
    pub fn into_request(self) -> Result<SignupRequest, ControllerError> {
        let username = required("username", &self.username)?;
        let full_name = required("full name", &self.full_name)?;
        if self.password.is_empty() {
            return Err(ControllerError::Validation("password is required".into()));
        }
        Ok(SignupRequest {
            username,
            email: self.email.trim().to_string(),
            password: self.password,
            full_name,
            role: self.role,
        })
    }
}

impl ClubForm {
    pub fn into_request(self, owner_id: UserId) -> Result<CreateClubRequest, ControllerError> {
        Ok(CreateClubRequest {
            name: required("club name", &self.name)?,
            description: optional(&self.description),
            location: optional(&self.location),
            owner_id,
        })
    }
}

impl TeamForm {
    pub fn into_request(
        self,
        club_id: ClubId,
        manager_id: UserId,
    ) -> Result<CreateTeamRequest, ControllerError> {
        Ok(CreateTeamRequest {
            name: required("team name", &self.name)?,
            age_group: optional(&self.age_group),
            description: optional(&self.description),
            club_id,
            manager_id,
        })
    }
}

impl PlayerForm {
    pub fn into_request(self, team_id: TeamId) -> Result<CreatePlayerRequest, ControllerError> {
        let name = required("player name", &self.name)?;
        let jersey_number = match optional(&self.jersey_number) {
            None => None,
            Some(raw) => Some(raw.parse::<u32>().map_err(|_| {
                ControllerError::Validation(format!(
                    "jersey number must be a non-negative whole number, got '{raw}'"
                ))
            })?),
        };
        Ok(CreatePlayerRequest {
            name,
            position: optional(&self.position),
            jersey_number,
            team_id,
        })
    }
}

#[cfg(test)]
#[path = "tests/forms_tests.rs"]
mod tests;
