use super::*;

#[test]
fn team_list_entry_takes_queried_club() {
    let payload: TeamPayload = serde_json::from_str(
        r#"{"id":4,"name":"U18s","teamCode":"SQUAD1001","ageGroup":"","description":"",
            "manager":{"id":7,"fullName":"Coach One"},"playerCount":0,"memberCount":0}"#,
    )
    .expect("team");
    let team = payload.into_team(ClubId(9));
    assert_eq!(team.club_id, ClubId(9));
    assert_eq!(team.age_group, None);
    assert_eq!(team.player_count, 0);
}

#[test]
fn team_create_response_prefers_nested_club() {
    let payload: TeamPayload = serde_json::from_str(
        r#"{"id":4,"name":"U18s","teamCode":"SQUAD1001","ageGroup":"Under-18",
            "club":{"id":2,"name":"Eagles"}}"#,
    )
    .expect("team");
    assert_eq!(payload.owning_club(), Some(ClubId(2)));
    let team = payload.into_team(ClubId(9));
    assert_eq!(team.club_id, ClubId(2));
    assert_eq!(team.age_group.as_deref(), Some("Under-18"));
}

#[test]
fn create_player_request_uses_camel_case_keys() {
    let request = CreatePlayerRequest {
        name: "Sam".into(),
        position: Some("Forward".into()),
        jersey_number: Some(9),
        team_id: TeamId(4),
    };
    let value = serde_json::to_value(&request).expect("encode");
    assert_eq!(value["teamId"], 4);
    assert_eq!(value["jerseyNumber"], 9);
}

#[test]
fn player_payload_falls_back_to_queried_team() {
    let payload: PlayerPayload =
        serde_json::from_str(r#"{"id":1,"name":"Sam"}"#).expect("player");
    let player = payload.into_player(TeamId(4));
    assert_eq!(player.team_id, TeamId(4));
    assert_eq!((player.goals, player.assists, player.matches_played), (0, 0, 0));
}
