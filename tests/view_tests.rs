use chrono::NaiveDate;

use savage_schedule_lambda_rust::model::scope::ScheduleScope;
use savage_schedule_lambda_rust::view::{ScopeKey, ScopedView, ViewState};

fn key(team: &str) -> ScopeKey {
    ScopeKey {
        view: "tournaments",
        scope: ScheduleScope::team(team),
        today: NaiveDate::from_ymd_opt(2025, 4, 10).unwrap(),
    }
}

#[test]
fn results_map_to_exclusive_states() {
    let loaded: ViewState<Vec<u32>> = ViewState::from_result(Ok(vec![1]), Vec::is_empty);
    assert_eq!(loaded, ViewState::Loaded(vec![1]));
    let empty: ViewState<Vec<u32>> = ViewState::from_result(Ok(vec![]), Vec::is_empty);
    assert_eq!(empty, ViewState::Empty);
    let failed: ViewState<Vec<u32>> = ViewState::from_result(Err("boom".to_string()), Vec::is_empty);
    assert_eq!(failed, ViewState::Error("boom".to_string()));
    assert_eq!(loaded.map(|v| v.len()), ViewState::Loaded(1));
}

#[test]
fn stale_results_are_discarded() {
    let mut view: ScopedView<Vec<&str>> = ScopedView::new();
    assert_eq!(view.state(), &ViewState::Loading);

    let savages = view.begin(key("savages")).expect("first ticket");
    // Navigate to another team before the first response arrives.
    let lioness = view.begin(key("lioness")).expect("second ticket");

    assert!(!view.resolve(savages, Ok(vec!["Savages Cup"]), Vec::is_empty));
    assert_eq!(view.state(), &ViewState::Loading);

    assert!(view.resolve(lioness, Ok(vec!["Softball Showcase"]), Vec::is_empty));
    assert_eq!(view.state(), &ViewState::Loaded(vec!["Softball Showcase"]));
    assert_eq!(view.current(), Some(&key("lioness")));
}

#[test]
fn one_outstanding_query_per_key() {
    let mut view: ScopedView<Vec<&str>> = ScopedView::new();
    let ticket = view.begin(key("savages")).expect("ticket");
    assert_eq!(ticket.key(), &key("savages"));
    assert!(view.begin(key("savages")).is_none(), "already loading");

    assert!(view.resolve(ticket, Err("offline".to_string()), Vec::is_empty));
    // A failed key may be retried.
    let retry = view.begin(key("savages")).expect("retry after error");
    assert!(view.resolve(retry, Ok(vec![]), Vec::is_empty));
    assert_eq!(view.into_state(), ViewState::Empty);
}
