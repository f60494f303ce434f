use chrono::NaiveDate;

use savage_schedule_lambda_rust::gateway::QueryGateway;
use savage_schedule_lambda_rust::memory::MemoryStore;
use savage_schedule_lambda_rust::model::game::Game;
use savage_schedule_lambda_rust::model::scope::ScheduleScope;
use savage_schedule_lambda_rust::model::team::Team;
use savage_schedule_lambda_rust::model::tournament::{Tournament, TournamentDocument};
use savage_schedule_lambda_rust::model::Reference;
use savage_schedule_lambda_rust::query::Query;
use savage_schedule_lambda_rust::schedule::{
    find_team, load_practices, load_teams, load_tournaments, sort_teams, TournamentSchedule,
};
use savage_schedule_lambda_rust::temporal::LocalFrame;

fn store() -> MemoryStore {
    MemoryStore::from_json(include_str!("sample_documents.json")).expect("fixture parses")
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 10).unwrap()
}

fn savages() -> ScheduleScope {
    ScheduleScope::named(Some("Savages"), Some("baseball"))
}

fn tournament(id: &str, start: &str, end: Option<&str>) -> Tournament {
    serde_json::from_value(serde_json::json!({
        "_id": id,
        "title": id,
        "startDate": start,
        "endDate": end,
    }))
    .unwrap()
}

fn game(id: &str, start: &str, tournament: Option<&str>) -> Game {
    Game {
        id: id.to_string(),
        opponent: Some(id.to_string()),
        date: Some(start[..10].to_string()),
        start_time: Some(start.to_string()),
        field_number: None,
        location: None,
        tournament: tournament.map(|t| Reference { id: t.to_string() }),
    }
}

#[test]
fn tournaments_stay_listed_through_their_last_day() {
    // Scope by name and sport, cutoff 2025-04-10.
    let schedule = load_tournaments(&store(), &savages(), today(), &LocalFrame::default()).expect("load");
    let ids: Vec<&str> = schedule.tournaments().map(|t| t.id.as_str()).collect();

    assert!(!ids.contains(&"t-past"), "ended 2025-04-09: {:?}", ids);
    assert!(ids.contains(&"t-today"), "ends 2025-04-10: {:?}", ids);
    assert_eq!(ids, vec!["t-today", "t-may1", "t-may15"]);
}

#[test]
fn first_tournament_is_featured() {
    let doc = TournamentDocument {
        tournaments: vec![tournament("may15", "2025-05-15", None), tournament("may1", "2025-05-01", None)],
        standalone_games: Vec::new(),
    };
    let schedule = TournamentSchedule::from_document(doc, &LocalFrame::default());

    assert_eq!(schedule.featured.as_ref().map(|t| t.id.as_str()), Some("may1"));
    let upcoming: Vec<&str> = schedule.upcoming.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(upcoming, vec!["may15"]);
}

#[test]
fn attached_games_are_filtered_and_ordered() {
    let schedule = load_tournaments(&store(), &savages(), today(), &LocalFrame::default()).expect("load");

    let kickoff = schedule.featured.as_ref().expect("featured");
    assert_eq!(kickoff.id, "t-today");
    assert!(kickoff.games.is_empty(), "past game should be excluded: {:?}", kickoff.games);

    let classic = schedule.upcoming.iter().find(|t| t.id == "t-may1").expect("classic");
    let games: Vec<&str> = classic.games.iter().map(|g| g.id.as_str()).collect();
    assert_eq!(games, vec!["g-classic-early", "g-classic-late"]);
    assert_eq!(classic.games[1].field_number, Some(3));
    assert_eq!(
        classic.location.as_ref().and_then(|l| l.address.as_deref()),
        Some("100 Main St, Springfield")
    );

    let standalone: Vec<&str> = schedule.standalone_games.iter().map(|g| g.id.as_str()).collect();
    assert_eq!(standalone, vec!["g-standalone"]);
}

#[test]
fn team_id_scope_matches_relations() {
    let scope = ScheduleScope::team("team-lioness");
    let schedule = load_tournaments(&store(), &scope, today(), &LocalFrame::default()).expect("load");
    let ids: Vec<&str> = schedule.tournaments().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["t-lioness"]);
    assert_eq!(schedule.standalone_games.len(), 1);
    assert_eq!(schedule.standalone_games[0].id, "g-lioness");
}

#[test]
fn partitions_games_by_tournament_reference() {
    let doc = TournamentDocument {
        tournaments: vec![tournament("cup", "2025-05-01", None)],
        standalone_games: vec![
            game("late", "2025-05-03T15:00:00", None),
            game("attached", "2025-05-01T09:00:00", Some("cup")),
            game("early", "2025-05-02T09:00:00", None),
            game("orphan", "2025-05-02T10:00:00", Some("elsewhere")),
        ],
    };
    let schedule = TournamentSchedule::from_document(doc, &LocalFrame::default());

    let standalone: Vec<&str> = schedule.standalone_games.iter().map(|g| g.id.as_str()).collect();
    assert_eq!(standalone, vec!["early", "late"]);
    let cup = schedule.featured.expect("cup");
    assert_eq!(cup.games.len(), 1);
    assert_eq!(cup.games[0].id, "attached");
}

#[test]
fn practices_order_by_local_start() {
    let practices = load_practices(&store(), &savages(), today(), &LocalFrame::default()).expect("load");
    let ids: Vec<&str> = practices.iter().map(|p| p.id.as_str()).collect();

    // 01:30Z on the 12th is 18:30 on the 11th in Los Angeles.
    assert_eq!(ids, vec!["p-afternoon", "p-evening-utc", "p-late"]);
    assert_eq!(
        practices[1].location.as_ref().and_then(|l| l.name.as_deref()),
        Some("Central Park Field")
    );
}

#[test]
fn practice_cutoff_uses_the_local_day() {
    let store = MemoryStore::from_json(
        r#"[
            { "_id": "p-yesterday-local", "_type": "practice", "title": "Evening",
              "startTime": "2025-04-11T01:00:00Z", "endTime": "2025-04-11T03:00:00Z" },
            { "_id": "p-early-local", "_type": "practice", "title": "Dawn",
              "startTime": "2025-04-11T08:00:00Z", "endTime": "2025-04-11T09:00:00Z" },
            { "_id": "p-naive", "_type": "practice", "title": "Naive",
              "startTime": "2025-04-11T00:30:00" }
        ]"#,
    )
    .expect("documents parse");
    let today = NaiveDate::from_ymd_opt(2025, 4, 11).unwrap();

    // 01:00Z on the 11th is 18:00 on the 10th in Los Angeles.
    let practices = load_practices(&store, &ScheduleScope::all(), today, &LocalFrame::default()).expect("load");
    let ids: Vec<&str> = practices.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p-naive", "p-early-local"]);

    // The same instant is on the 11th in UTC.
    let utc = LocalFrame::new(chrono_tz::UTC);
    let practices = load_practices(&store, &ScheduleScope::all(), today, &utc).expect("load");
    assert_eq!(practices.len(), 3);
}

#[test]
fn empty_result_is_not_an_error() {
    let scope = ScheduleScope::named(Some("Nobody"), None);
    let practices = load_practices(&store(), &scope, today(), &LocalFrame::default()).expect("load");
    assert!(practices.is_empty());

    let schedule = load_tournaments(&MemoryStore::default(), &scope, today(), &LocalFrame::default()).expect("load");
    assert!(schedule.is_empty());
}

#[test]
fn gateway_failures_surface_as_one_message() {
    struct Failing;
    impl QueryGateway for Failing {
        fn execute(&self, _query: &Query) -> Result<serde_json::Value, String> {
            Err("Request failed: connection refused".to_string())
        }
    }

    let err = load_tournaments(&Failing, &savages(), today(), &LocalFrame::default()).unwrap_err();
    assert_eq!(err, "Request failed: connection refused");
}

#[test]
fn null_attributes_from_the_store_read_as_absent() {
    // GROQ projections emit null for every undefined attribute.
    struct Fixed;
    impl QueryGateway for Fixed {
        fn execute(&self, query: &Query) -> Result<serde_json::Value, String> {
            Ok(match query.name {
                "teams" => serde_json::json!([
                    { "_id": "x", "name": null, "sport": null, "image": null }
                ]),
                _ => serde_json::json!({
                    "tournaments": [{
                        "_id": "t1", "title": null, "startDate": "2025-05-01", "endDate": null,
                        "locationTbd": null, "status": null, "notes": null, "website": null,
                        "location": null, "games": null
                    }],
                    "standaloneGames": null
                }),
            })
        }
    }

    let schedule = load_tournaments(&Fixed, &savages(), today(), &LocalFrame::default()).expect("load");
    let t1 = schedule.featured.expect("featured");
    assert_eq!(t1.title, "");
    assert!(!t1.location_tbd);
    assert!(t1.games.is_empty());
    assert!(schedule.standalone_games.is_empty());

    let teams = load_teams(&Fixed).expect("load");
    assert_eq!(teams.len(), 1);
    assert_eq!(teams[0].name, "");
    assert_eq!(teams[0].image_url(), None);
}

#[test]
fn teams_sort_baseball_first_then_by_name() {
    let teams = load_teams(&store()).expect("load");
    let names: Vec<&str> = teams.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["aces", "Savages", "Lioness"]);
    assert_eq!(teams[1].image_url(), Some("https://cdn.example.invalid/savages.jpg"));

    let mut mixed: Vec<Team> = ["Zebras", "bears", "Ants"]
        .iter()
        .map(|n| Team { id: n.to_string(), name: n.to_string(), sport: Some("soccer".to_string()), image: None })
        .collect();
    sort_teams(&mut mixed);
    let names: Vec<&str> = mixed.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Ants", "bears", "Zebras"]);

    let mut cased: Vec<Team> = ["savages", "Savages", "Émeraude"]
        .iter()
        .map(|n| Team { id: n.to_string(), name: n.to_string(), sport: None, image: None })
        .collect();
    sort_teams(&mut cased);
    let names: Vec<&str> = cased.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Savages", "savages", "Émeraude"]);
}

#[test]
fn finds_team_by_name_and_sport() {
    let team = find_team(&store(), "Savages", "baseball").expect("query").expect("team");
    assert_eq!(team.id, "team-savages");
    assert!(find_team(&store(), "Savages", "softball").expect("query").is_none());
}
