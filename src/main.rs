use std::sync::Arc;

use lambda_runtime::{service_fn, Error, LambdaEvent};
use tracing::info;
use tracing_subscriber::EnvFilter;

use savage_schedule_lambda_rust::config::Config;
use savage_schedule_lambda_rust::handler::{handler, Backend, Request};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize structured logging with tracing
    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_current_span(false)
        .with_target(false)
        .with_ansi(false)
        .without_time()
        .try_init();

    let config = Config::from_env();
    info!(
        project_id = %config.sanity.project_id,
        dataset = %config.sanity.dataset,
        timezone = %config.frame.timezone(),
        "Starting schedule service"
    );
    let backend = Arc::new(Backend::from_config(&config));

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Request>| {
        let backend = backend.clone();
        async move { handler(event, backend).await }
    }))
    .await
}
