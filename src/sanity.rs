use serde::Deserialize;
use tracing::{error, info, info_span, instrument};

use crate::config::SanityConfig;
use crate::gateway::QueryGateway;
use crate::query::Query;

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: serde_json::Value,
}

/// HTTP client for the content store's query endpoint.
///
/// Constructed explicitly and handed to whatever needs it.
#[derive(Clone)]
pub struct SanityClient {
    config: SanityConfig,
    agent: ureq::Agent,
}

impl SanityClient {
    pub fn new(config: SanityConfig) -> Self {
        Self { config, agent: ureq::Agent::new_with_defaults() }
    }

    pub fn config(&self) -> &SanityConfig {
        &self.config
    }

    /// Query-string pairs for a request: the GROQ text plus one JSON-encoded
    /// `$name` entry per binding.
    pub fn query_pairs(query: &Query) -> Result<Vec<(String, String)>, String> {
        let mut pairs = vec![("query".to_string(), query.to_groq())];
        for (name, value) in &query.params {
            let encoded = serde_json::to_string(value).map_err(|e| format!("Failed to encode ${}: {}", name, e))?;
            pairs.push((format!("${}", name), encoded));
        }
        Ok(pairs)
    }

    fn parse_body(body: &str) -> Result<serde_json::Value, String> {
        serde_json::from_str::<QueryResponse>(body)
            .map(|r| r.result)
            .map_err(|e| format!("Failed to parse query response: {}", e))
    }
}

impl QueryGateway for SanityClient {
    #[instrument(level = "info", skip(self, query), fields(query = query.name))]
    fn execute(&self, query: &Query) -> Result<serde_json::Value, String> {
        let url = self.config.query_url();
        let pairs = Self::query_pairs(query)?;

        let response_result = {
            let _span = info_span!("sanity_fetch", url = %url).entered();
            let mut request = self.agent.get(&url);
            for (key, value) in &pairs {
                request = request.query(key, value);
            }
            request.call()
        };

        match response_result {
            Ok(response) => {
                let mut body_reader = response.into_body();
                match body_reader.read_to_string() {
                    Ok(body) => {
                        let result = Self::parse_body(&body)?;
                        info!(bytes = body.len(), null_result = result.is_null(), "Fetched query result");
                        Ok(result)
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to read query response body");
                        Err(format!("Failed to read response body: {}", e))
                    }
                }
            }
            Err(e) => {
                error!(error = %e, url = %url, "Query request failed");
                Err(format!("Request failed: {}", e))
            }
        }
    }
}
