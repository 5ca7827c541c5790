use super::*;
use rand::{rngs::StdRng, SeedableRng};
use shared::domain::Role;
use std::cell::Cell;

fn signup_request(username: &str, email: &str, role: Role) -> SignupRequest {
    SignupRequest {
        username: username.into(),
        email: email.into(),
        password: "secret".into(),
        full_name: format!("{username} Full"),
        role,
    }
}

async fn setup() -> (Directory, Session, Club) {
    let directory = Directory::new();
    let manager = directory
        .signup(signup_request("coach1", "coach@club.io", Role::Manager))
        .await
        .expect("signup");
    let club = directory
        .create_club(CreateClubRequest {
            name: "Eagles".into(),
            description: Some("  ".into()),
            location: Some("Leeds".into()),
            owner_id: manager.user_id,
        })
        .await
        .expect("club");
    (directory, manager, club)
}

async fn add_team(directory: &Directory, club: &Club, manager: &Session, name: &str) -> TeamPayload {
    directory
        .create_team(CreateTeamRequest {
            name: name.into(),
            age_group: None,
            description: None,
            club_id: club.id,
            manager_id: manager.user_id,
        })
        .await
        .expect("team")
}

#[test]
fn generated_codes_use_word_and_four_digits() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let code = generate_code(&CLUB_CODE_WORDS, &mut rng, |_| false);
        let word = CLUB_CODE_WORDS
            .iter()
            .find(|word| code.starts_with(*word))
            .expect("known word");
        let digits: u32 = code[word.len()..].parse().expect("digits");
        assert!((1000..10000).contains(&digits), "{code}");
    }
}

#[test]
fn colliding_codes_are_regenerated() {
    let mut rng = StdRng::seed_from_u64(1);
    let attempts = Cell::new(0);
    let code = generate_code(&TEAM_CODE_WORDS, &mut rng, |_| {
        attempts.set(attempts.get() + 1);
        attempts.get() < 3
    });
    assert_eq!(attempts.get(), 3);
    assert!(TEAM_CODE_WORDS.iter().any(|word| code.starts_with(word)));
}

#[tokio::test]
async fn duplicate_username_and_email_are_rejected() {
    let (directory, _, _) = setup().await;
    let err = directory
        .signup(signup_request("coach1", "other@club.io", Role::Player))
        .await
        .expect_err("duplicate username");
    assert_eq!(err.to_string(), "Username already exists");

    let err = directory
        .signup(signup_request("coach2", "coach@club.io", Role::Player))
        .await
        .expect_err("duplicate email");
    assert_eq!(err.to_string(), "Email already exists");

    directory
        .signup(signup_request("coach3", "", Role::Player))
        .await
        .expect("blank email is not a duplicate");
    directory
        .signup(signup_request("coach4", "", Role::Player))
        .await
        .expect("blank email is not a duplicate");
}

#[tokio::test]
async fn login_checks_password() {
    let (directory, manager, _) = setup().await;
    let session = directory
        .login(LoginRequest {
            username: "coach1".into(),
            password: "secret".into(),
        })
        .await
        .expect("login");
    assert_eq!(session, manager);
    assert_eq!(session.role, Role::Manager);

    let err = directory
        .login(LoginRequest {
            username: "coach1".into(),
            password: "wrong".into(),
        })
        .await
        .expect_err("bad password");
    assert_eq!(err.to_string(), "Invalid username or password");

    let err = directory
        .login(LoginRequest {
            username: "nobody".into(),
            password: "secret".into(),
        })
        .await
        .expect_err("unknown user");
    assert_eq!(err.to_string(), "Invalid username or password");
}

#[tokio::test]
async fn club_owner_is_first_member() {
    let (directory, _, club) = setup().await;
    assert_eq!(club.member_count, 1);
    assert_eq!(club.team_count, 0);
    assert_eq!(club.description, None);
    assert_eq!(club.location.as_deref(), Some("Leeds"));

    let found = directory
        .find_club_by_code(&club.club_code.to_lowercase())
        .await
        .expect("lookup");
    assert_eq!(found.id, club.id);

    let err = directory
        .find_club_by_code("BOGUS0000")
        .await
        .expect_err("unknown code");
    assert_eq!(err.to_string(), "Club not found");
}

#[tokio::test]
async fn club_requires_existing_owner() {
    let directory = Directory::new();
    let err = directory
        .create_club(CreateClubRequest {
            name: "Eagles".into(),
            description: None,
            location: None,
            owner_id: UserId(99),
        })
        .await
        .expect_err("unknown owner");
    assert_eq!(err.to_string(), "User not found");
}

#[tokio::test]
async fn team_lists_omit_club_and_count_players() {
    let (directory, manager, club) = setup().await;
    let created = add_team(&directory, &club, &manager, "U18s").await;
    assert_eq!(created.owning_club(), Some(club.id));
    assert_eq!(
        created.manager.as_ref().and_then(|m| m.full_name.as_deref()),
        Some("coach1 Full")
    );
    add_team(&directory, &club, &manager, "U21s").await;

    directory
        .create_player(CreatePlayerRequest {
            name: "Sam".into(),
            position: Some("Forward".into()),
            jersey_number: Some(9),
            team_id: created.id,
        })
        .await
        .expect("player");

    let teams = directory.list_teams(club.id).await.expect("teams");
    assert_eq!(
        teams.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
        vec!["U18s", "U21s"]
    );
    assert!(teams.iter().all(|team| team.owning_club().is_none()));
    assert_eq!(teams[0].player_count, 1);
    assert_eq!(teams[1].player_count, 0);

    let club = directory
        .find_club_by_code(&club.club_code)
        .await
        .expect("lookup");
    assert_eq!(club.team_count, 2);
}

#[tokio::test]
async fn team_endpoints_reject_unknown_club() {
    let (directory, manager, _) = setup().await;
    let err = directory
        .list_teams(ClubId(404))
        .await
        .expect_err("unknown club");
    assert_eq!(err.to_string(), "Club not found");

    let err = directory
        .create_team(CreateTeamRequest {
            name: "U18s".into(),
            age_group: None,
            description: None,
            club_id: ClubId(404),
            manager_id: manager.user_id,
        })
        .await
        .expect_err("unknown club");
    assert_eq!(err.to_string(), "Club not found");
}

#[tokio::test]
async fn team_lookup_by_code_nests_club() {
    let (directory, manager, club) = setup().await;
    let team = add_team(&directory, &club, &manager, "U18s").await;
    let found = directory
        .find_team_by_code(&team.team_code)
        .await
        .expect("lookup");
    assert_eq!(found.id, team.id);
    assert_eq!(found.owning_club(), Some(club.id));

    let err = directory
        .find_team_by_code("SQUAD0000")
        .await
        .expect_err("unknown code");
    assert_eq!(err.to_string(), "Team not found");
}

#[tokio::test]
async fn new_players_start_with_zero_stats() {
    let (directory, manager, club) = setup().await;
    let team = add_team(&directory, &club, &manager, "U18s").await;

    let err = directory
        .create_player(CreatePlayerRequest {
            name: " ".into(),
            position: None,
            jersey_number: None,
            team_id: team.id,
        })
        .await
        .expect_err("blank name");
    assert_eq!(err.to_string(), "Player name is required");

    directory
        .create_player(CreatePlayerRequest {
            name: "Sam".into(),
            position: Some("Forward".into()),
            jersey_number: None,
            team_id: team.id,
        })
        .await
        .expect("player");

    let players = directory.list_players(team.id).await.expect("players");
    assert_eq!(players.len(), 1);
    let sam = players[0].clone().into_player(team.id);
    assert_eq!((sam.goals, sam.assists, sam.matches_played), (0, 0, 0));
    assert_eq!(sam.position.as_deref(), Some("Forward"));

    let err = directory
        .list_players(TeamId(404))
        .await
        .expect_err("unknown team");
    assert_eq!(err.to_string(), "Team not found");
}
