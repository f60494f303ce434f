use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::error;

use crate::query::Query;

/// Read-only access to the content store: query in, JSON records out.
///
/// An absent result is `Ok(Value::Null)`; any failure is a single message.
pub trait QueryGateway: Send + Sync {
    fn execute(&self, query: &Query) -> Result<serde_json::Value, String>;
}

impl<G: QueryGateway + ?Sized> QueryGateway for Arc<G> {
    fn execute(&self, query: &Query) -> Result<serde_json::Value, String> {
        (**self).execute(query)
    }
}

/// Execute and deserialize. A null result becomes `None`.
pub fn fetch<T: DeserializeOwned>(gateway: &dyn QueryGateway, query: &Query) -> Result<Option<T>, String> {
    let value = gateway.execute(query)?;
    if value.is_null() {
        return Ok(None);
    }
    serde_json::from_value::<T>(value).map(Some).map_err(|e| {
        error!(query = query.name, error = %e, "Failed to deserialize query result");
        format!("Failed to deserialize {} result: {}", query.name, e)
    })
}
