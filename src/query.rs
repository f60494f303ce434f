use chrono::NaiveDate;

use crate::filter::{build_scope_filter, Clause, Filter, Params, RecordKind, PARAM_SPORT, PARAM_TEAM_NAME};
use crate::model::scope::ScheduleScope;

/// One projected attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Plain(&'static str),
    /// Embedded object, projected further.
    Object(&'static str, &'static [Field]),
    /// Reference followed to its target document (`name->`).
    Deref(&'static str, &'static [Field]),
}

const LOCATION: &[Field] = &[
    Field::Plain("name"),
    Field::Plain("address"),
    Field::Plain("mapUrl"),
    Field::Plain("parkingInfo"),
    Field::Plain("notes"),
];

pub const PRACTICE_FIELDS: &[Field] = &[
    Field::Plain("_id"),
    Field::Plain("title"),
    Field::Plain("startTime"),
    Field::Plain("endTime"),
    Field::Deref("location", LOCATION),
    Field::Plain("notes"),
    Field::Plain("status"),
];

pub const TOURNAMENT_FIELDS: &[Field] = &[
    Field::Plain("_id"),
    Field::Plain("title"),
    Field::Plain("startDate"),
    Field::Plain("endDate"),
    Field::Plain("locationTbd"),
    Field::Plain("status"),
    Field::Plain("notes"),
    Field::Plain("website"),
    Field::Deref("location", LOCATION),
];

pub const GAME_FIELDS: &[Field] = &[
    Field::Plain("_id"),
    Field::Plain("opponent"),
    Field::Plain("date"),
    Field::Plain("startTime"),
    Field::Plain("fieldNumber"),
    Field::Deref("location", LOCATION),
    Field::Plain("tournament"),
];

pub const TEAM_FIELDS: &[Field] = &[
    Field::Plain("_id"),
    Field::Plain("name"),
    Field::Plain("sport"),
    Field::Object("image", &[Field::Deref("asset", &[Field::Plain("url")])]),
];

/// A filtered, ordered, projected read over one document type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub filter: Filter,
    /// Ascending sort key.
    pub order: Option<&'static str>,
    pub projection: &'static [Field],
    /// Sub-selection evaluated per result and stored under the given key.
    pub nested: Option<(&'static str, Box<Selection>)>,
    /// Only the first match, or null.
    pub first: bool,
}

impl Selection {
    fn list(filter: Filter, order: Option<&'static str>, projection: &'static [Field]) -> Self {
        Self { filter, order, projection, nested: None, first: false }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    List(Selection),
    /// Several named selections returned as one JSON object.
    Object(Vec<(&'static str, Selection)>),
}

/// A complete read request for the Query Gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Short label for logs.
    pub name: &'static str,
    pub shape: Shape,
    pub params: Params,
}

impl Query {
    pub fn practices(scope: &ScheduleScope, today: NaiveDate) -> Self {
        let composed = build_scope_filter(scope, today, RecordKind::Practice);
        Self {
            name: "practices",
            shape: Shape::List(Selection::list(composed.filter, Some("startTime"), PRACTICE_FIELDS)),
            params: composed.params,
        }
    }

    /// Tournaments (with their remaining games) plus standalone games.
    pub fn tournaments(scope: &ScheduleScope, today: NaiveDate) -> Self {
        let tournaments = build_scope_filter(scope, today, RecordKind::Tournament);
        let standalone = build_scope_filter(scope, today, RecordKind::Game);

        let mut tournament_sel = Selection::list(tournaments.filter, Some("startDate"), TOURNAMENT_FIELDS);
        if let Some(games) = tournaments.games {
            tournament_sel.nested = Some(("games", Box::new(Selection::list(games, Some("date"), GAME_FIELDS))));
        }

        let mut params = tournaments.params;
        params.extend(standalone.params);

        Self {
            name: "tournaments",
            shape: Shape::Object(vec![
                ("tournaments", tournament_sel),
                ("standaloneGames", Selection::list(standalone.filter, Some("date"), GAME_FIELDS)),
            ]),
            params,
        }
    }

    pub fn teams() -> Self {
        Self {
            name: "teams",
            shape: Shape::List(Selection::list(Filter::of(RecordKind::Team), None, TEAM_FIELDS)),
            params: Params::new(),
        }
    }

    pub fn team_by_name(team_name: &str, sport: &str) -> Self {
        let filter = Filter::of(RecordKind::Team)
            .and(Clause::FieldEquals { field: "name", param: PARAM_TEAM_NAME })
            .and(Clause::FieldEquals { field: "sport", param: PARAM_SPORT });
        let mut params = Params::new();
        params.insert(PARAM_TEAM_NAME.to_string(), team_name.to_string());
        params.insert(PARAM_SPORT.to_string(), sport.to_string());
        Self {
            name: "team_by_name",
            shape: Shape::List(Selection { first: true, ..Selection::list(filter, None, TEAM_FIELDS) }),
            params,
        }
    }

    /// Render as GROQ text. Parameter values stay out of the text and are
    /// sent separately as `$name` bindings.
    pub fn to_groq(&self) -> String {
        match &self.shape {
            Shape::List(sel) => render_selection(sel),
            Shape::Object(entries) => {
                let body = entries
                    .iter()
                    .map(|(key, sel)| format!("\"{}\": {}", key, render_selection(sel)))
                    .collect::<Vec<String>>()
                    .join(", ");
                format!("{{ {} }}", body)
            }
        }
    }
}

fn render_selection(sel: &Selection) -> String {
    let mut out = format!("*[{}]", sel.filter);
    if let Some(order) = sel.order {
        out.push_str(&format!(" | order({} asc)", order));
    }
    if sel.first {
        out.push_str("[0]");
    }
    let mut fields: Vec<String> = sel.projection.iter().map(render_field).collect();
    if let Some((key, nested)) = &sel.nested {
        fields.push(format!("\"{}\": {}", key, render_selection(nested)));
    }
    out.push_str(&format!(" {{ {} }}", fields.join(", ")));
    out
}

fn render_field(field: &Field) -> String {
    match field {
        Field::Plain(name) => name.to_string(),
        Field::Object(name, inner) => format!("{} {{ {} }}", name, render_fields(inner)),
        Field::Deref(name, inner) => format!("{}-> {{ {} }}", name, render_fields(inner)),
    }
}

fn render_fields(fields: &[Field]) -> String {
    fields.iter().map(render_field).collect::<Vec<String>>().join(", ")
}
