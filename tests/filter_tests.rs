use chrono::NaiveDate;

use savage_schedule_lambda_rust::filter::{build_scope_filter, Clause, RecordKind};
use savage_schedule_lambda_rust::model::scope::{Resolution, ScheduleScope};
use savage_schedule_lambda_rust::query::Query;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 10).unwrap()
}

fn is_name_or_sport(clause: &Clause) -> bool {
    matches!(clause, Clause::FieldEquals { field: "teamName" | "sport", .. })
}

#[test]
fn team_id_takes_precedence_over_name_and_sport() {
    let scope = ScheduleScope {
        team_id: Some("team-savages".to_string()),
        team_name: Some("Savages".to_string()),
        sport: Some("baseball".to_string()),
    };
    assert_eq!(scope.resolution(), Resolution::Team("team-savages"));

    for kind in [RecordKind::Practice, RecordKind::Tournament, RecordKind::Game] {
        let composed = build_scope_filter(&scope, today(), kind);
        assert!(!composed.filter.clauses.iter().any(is_name_or_sport), "{:?}: {}", kind, composed.filter);
        assert!(!composed.params.contains_key("teamName"));
        assert!(!composed.params.contains_key("sport"));
        assert_eq!(composed.params.get("teamId").map(String::as_str), Some("team-savages"));
        if let Some(games) = &composed.games {
            assert!(!games.clauses.iter().any(is_name_or_sport));
        }
    }
}

#[test]
fn team_id_uses_relation_or_single_reference() {
    let scope = ScheduleScope::team("t1");
    let practice = build_scope_filter(&scope, today(), RecordKind::Practice);
    assert!(practice.filter.contains(&Clause::ParamInRefs { param: "teamId", relation: "teams" }));

    let game = build_scope_filter(&scope, today(), RecordKind::Game);
    assert!(game.filter.contains(&Clause::RefEquals { reference: "team", param: "teamId" }));

    let tournament = build_scope_filter(&scope, today(), RecordKind::Tournament);
    let games = tournament.games.expect("nested games filter");
    assert!(games.contains(&Clause::RefEquals { reference: "team", param: "teamId" }));
    assert!(games.contains(&Clause::ReferencesParent));
}

#[test]
fn empty_scope_only_applies_the_cutoff() {
    let scope = ScheduleScope::all();
    assert_eq!(scope.resolution(), Resolution::All);

    let practice = build_scope_filter(&scope, today(), RecordKind::Practice);
    assert_eq!(
        practice.filter.clauses,
        vec![Clause::TypeIs(RecordKind::Practice), Clause::OnOrAfter { field: "startTime", param: "since" }]
    );
    // One day of slack for UTC-marked start times; the local cutoff runs after the fetch.
    assert_eq!(practice.params.len(), 1);
    assert_eq!(practice.params.get("since").map(String::as_str), Some("2025-04-09"));

    let tournament = build_scope_filter(&scope, today(), RecordKind::Tournament);
    assert_eq!(
        tournament.filter.clauses,
        vec![
            Clause::TypeIs(RecordKind::Tournament),
            Clause::UndefinedOrOnOrAfter { field: "endDate", param: "today" },
        ]
    );
}

#[test]
fn name_and_sport_apply_independently() {
    let name_only = build_scope_filter(&ScheduleScope::named(Some("Savages"), None), today(), RecordKind::Practice);
    assert!(name_only.filter.contains(&Clause::FieldEquals { field: "teamName", param: "teamName" }));
    assert!(!name_only.filter.contains(&Clause::FieldEquals { field: "sport", param: "sport" }));
    assert!(!name_only.params.contains_key("sport"));

    let both = build_scope_filter(
        &ScheduleScope::named(Some("Savages"), Some("baseball")),
        today(),
        RecordKind::Game,
    );
    assert!(both.filter.contains(&Clause::FieldEquals { field: "teamName", param: "teamName" }));
    assert!(both.filter.contains(&Clause::FieldEquals { field: "sport", param: "sport" }));
    assert!(both.filter.contains(&Clause::Undefined { field: "tournament" }));
    assert_eq!(both.params.get("sport").map(String::as_str), Some("baseball"));
}

#[test]
fn blank_scope_fields_are_unset() {
    let scope = ScheduleScope {
        team_id: Some("  ".to_string()),
        team_name: Some(String::new()),
        sport: Some("softball".to_string()),
    };
    assert_eq!(scope.resolution(), Resolution::Named { team_name: None, sport: Some("softball") });
}

#[test]
fn renders_groq_with_bound_parameters_only() {
    let scope = ScheduleScope::named(Some("Robert'); drop"), Some("baseball"));
    let query = Query::practices(&scope, today());
    let groq = query.to_groq();

    assert!(groq.starts_with(
        "*[_type == \"practice\" && teamName == $teamName && sport == $sport && startTime >= $since] | order(startTime asc)"
    ));
    assert!(groq.contains("location-> { name, address, mapUrl, parkingInfo, notes }"));
    assert!(!groq.contains("Robert"), "values must not be interpolated: {}", groq);
    assert_eq!(query.params.get("teamName").map(String::as_str), Some("Robert'); drop"));
}

#[test]
fn renders_tournament_query_with_nested_games() {
    let query = Query::tournaments(&ScheduleScope::team("t1"), today());
    let groq = query.to_groq();

    assert!(groq.starts_with("{ \"tournaments\": *[_type == \"tournament\" && $teamId in teams[]._ref"));
    assert!(groq.contains("(!defined(endDate) || endDate >= $today)"));
    assert!(groq.contains(
        "\"games\": *[_type == \"game\" && references(^._id) && date >= $today && team._ref == $teamId] | order(date asc)"
    ));
    assert!(groq.contains(
        "\"standaloneGames\": *[_type == \"game\" && team._ref == $teamId && date >= $today && !defined(tournament)]"
    ));
    assert_eq!(query.params.len(), 2);
}

#[test]
fn renders_team_lookup_as_first_match() {
    let groq = Query::team_by_name("Savages", "baseball").to_groq();
    assert_eq!(
        groq,
        "*[_type == \"team\" && name == $teamName && sport == $sport][0] { _id, name, sport, image { asset-> { url } } }"
    );
}
