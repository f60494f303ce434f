use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::filter::{Clause, Params};
use crate::gateway::QueryGateway;
use crate::query::{Field, Query, Selection, Shape};

/// In-memory content store over raw JSON documents (no network).
///
/// Evaluates the same typed queries the HTTP client renders to GROQ, which
/// makes it suitable for snapshots and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: Vec<Value>,
}

impl MemoryStore {
    pub fn new(documents: Vec<Value>) -> Self {
        Self { documents }
    }

    /// Build from a JSON array of documents.
    pub fn from_json(body: &str) -> Result<Self, String> {
        match serde_json::from_str::<Vec<Value>>(body) {
            Ok(documents) => Ok(Self::new(documents)),
            Err(e) => Err(format!("Failed to deserialize documents: {}", e)),
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn by_id(&self, id: &str) -> Option<&Value> {
        self.documents.iter().find(|d| d.get("_id").and_then(Value::as_str) == Some(id))
    }

    fn select(&self, sel: &Selection, params: &Params, parent: Option<&Value>) -> Value {
        let mut matched: Vec<&Value> = self
            .documents
            .iter()
            .filter(|doc| sel.filter.clauses.iter().all(|c| matches(doc, c, params, parent)))
            .collect();

        if let Some(order) = sel.order {
            // Missing keys sort last; the sort is stable for ties.
            matched.sort_by(|a, b| {
                let ka = a.get(order).and_then(Value::as_str);
                let kb = b.get(order).and_then(Value::as_str);
                match (ka, kb) {
                    (Some(x), Some(y)) => x.cmp(y),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                }
            });
        }

        let project = |doc: &Value| {
            let mut out = self.project(doc, sel.projection);
            if let (Some((key, nested)), Value::Object(map)) = (&sel.nested, &mut out) {
                map.insert(key.to_string(), self.select(nested, params, Some(doc)));
            }
            out
        };

        if sel.first {
            return matched.first().copied().map(&project).unwrap_or(Value::Null);
        }
        Value::Array(matched.into_iter().map(&project).collect())
    }

    fn project(&self, doc: &Value, fields: &[Field]) -> Value {
        let mut out = Map::new();
        for field in fields {
            match field {
                Field::Plain(name) => {
                    if let Some(v) = doc.get(*name).filter(|v| !v.is_null()) {
                        out.insert(name.to_string(), v.clone());
                    }
                }
                Field::Object(name, inner) => {
                    if let Some(v) = doc.get(*name).filter(|v| v.is_object()) {
                        out.insert(name.to_string(), self.project(v, inner));
                    }
                }
                Field::Deref(name, inner) => {
                    let target = match doc.get(*name) {
                        Some(v) => match v.get("_ref").and_then(Value::as_str) {
                            Some(id) => self.by_id(id),
                            None => Some(v).filter(|v| v.is_object()),
                        },
                        None => None,
                    };
                    if let Some(target) = target {
                        out.insert(name.to_string(), self.project(target, inner));
                    }
                }
            }
        }
        Value::Object(out)
    }
}

impl QueryGateway for MemoryStore {
    #[instrument(level = "debug", skip(self, query), fields(query = query.name))]
    fn execute(&self, query: &Query) -> Result<Value, String> {
        let result = match &query.shape {
            Shape::List(sel) => self.select(sel, &query.params, None),
            Shape::Object(entries) => {
                let mut map = Map::new();
                for (key, sel) in entries {
                    map.insert(key.to_string(), self.select(sel, &query.params, None));
                }
                Value::Object(map)
            }
        };
        debug!(documents = self.documents.len(), "Evaluated query in memory");
        Ok(result)
    }
}

fn matches(doc: &Value, clause: &Clause, params: &Params, parent: Option<&Value>) -> bool {
    let field_str = |field: &'static str| str_at(doc, field);
    let param = |name: &'static str| params.get(name).map(String::as_str);

    match clause {
        Clause::TypeIs(kind) => field_str("_type") == Some(kind.type_name()),
        Clause::ParamInRefs { param: p, relation } => match (param(*p), doc.get(*relation).and_then(Value::as_array)) {
            (Some(id), Some(refs)) => refs.iter().any(|r| r.get("_ref").and_then(Value::as_str) == Some(id)),
            _ => false,
        },
        Clause::RefEquals { reference, param: p } => {
            let target = doc.get(*reference).and_then(|r| r.get("_ref")).and_then(Value::as_str);
            target.is_some() && target == param(*p)
        }
        Clause::FieldEquals { field, param: p } => {
            let value = field_str(*field);
            value.is_some() && value == param(*p)
        }
        Clause::OnOrAfter { field, param: p } => match (field_str(*field), param(*p)) {
            (Some(v), Some(cutoff)) => v >= cutoff,
            _ => false,
        },
        Clause::UndefinedOrOnOrAfter { field, param: p } => match doc.get(*field).filter(|v| !v.is_null()) {
            None => true,
            Some(v) => match (v.as_str(), param(*p)) {
                (Some(v), Some(cutoff)) => v >= cutoff,
                _ => false,
            },
        },
        Clause::Undefined { field } => doc.get(*field).is_none_or(Value::is_null),
        Clause::ReferencesParent => match parent.and_then(|p| p.get("_id")).and_then(Value::as_str) {
            Some(id) => references(doc, id),
            None => false,
        },
    }
}

fn str_at<'a>(doc: &'a Value, field: &str) -> Option<&'a str> {
    doc.get(field).and_then(Value::as_str)
}

fn references(value: &Value, id: &str) -> bool {
    match value {
        Value::Object(map) => {
            map.get("_ref").and_then(Value::as_str) == Some(id) || map.values().any(|v| references(v, id))
        }
        Value::Array(items) => items.iter().any(|v| references(v, id)),
        _ => false,
    }
}
