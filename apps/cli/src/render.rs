use std::fmt::Write as _;

use client_core::{NavState, Screen};
use shared::domain::{Player, Team};

pub fn status(state: &NavState) -> String {
    let mut out = String::new();
    match state.identity() {
        Some(session) => {
            let _ = writeln!(
                out,
                "Signed in as {} ({}, {})",
                session.full_name,
                session.username,
                session.role.as_str()
            );
        }
        None => out.push_str("Not signed in\n"),
    }
    if let Some(club) = state.club() {
        let _ = writeln!(
            out,
            "Club: {} [{}] with {} team(s), {} member(s)",
            club.name, club.club_code, club.team_count, club.member_count
        );
        if let Some(location) = &club.location {
            let _ = writeln!(out, "Location: {location}");
        }
    }
    let _ = write!(out, "Screen: {}", screen_label(&state.screen()));
    out
}

pub fn screen_label(screen: &Screen) -> String {
    match screen {
        Screen::Players(team) => format!("{} ({})", screen.name(), team.name),
        other => other.name().to_string(),
    }
}

pub fn teams(teams: &[Team]) -> String {
    if teams.is_empty() {
        return "No teams yet.".to_string();
    }
    let mut out = String::new();
    for team in teams {
        let _ = write!(out, "#{} {} [{}]", team.id, team.name, team.team_code);
        if let Some(age_group) = &team.age_group {
            let _ = write!(out, " {age_group}");
        }
        let _ = writeln!(out, " - {} player(s)", team.player_count);
    }
    out.truncate(out.trim_end().len());
    out
}

pub fn players(players: &[Player]) -> String {
    if players.is_empty() {
        return "No players yet.".to_string();
    }
    let mut out = String::new();
    for player in players {
        let jersey = player
            .jersey_number
            .map(|n| format!("#{n}"))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{jersey:>4} {} ({}) G {} A {} MP {} ({:.2} g/m)",
            player.name,
            player.position.as_deref().unwrap_or("no position"),
            player.goals,
            player.assists,
            player.matches_played,
            player.goals_per_match()
        );
    }
    out.truncate(out.trim_end().len());
    out
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
