use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use content_localizer::capability::Capabilities;
use content_localizer::config::Config;
use content_localizer::pipeline::{Pipeline, PipelineShape};
use content_localizer::server::{router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("content_localizer=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .init();

    info!("Starting content localizer");

    let config = Config::from_env()?;
    let capabilities = Capabilities::from_config(&config)?;

    let pipeline = |shape: PipelineShape| -> Result<Arc<Pipeline>> {
        Ok(Arc::new(Pipeline::new(shape, &config, capabilities.clone())?))
    };
    let state = AppState {
        event: pipeline(PipelineShape::event())?,
        report: pipeline(PipelineShape::report())?,
        organisation: pipeline(PipelineShape::organisation())?,
        faq: pipeline(PipelineShape::faq())?,
        api_key: config.api_key.as_deref().map(Arc::from),
    };

    for pipeline in [&state.event, &state.report, &state.organisation, &state.faq] {
        if pipeline.moderates() {
            info!(
                "{} pipeline ready, moderating {} renderings",
                pipeline.shape().name,
                config.moderation_locale
            );
        } else {
            info!("{} pipeline ready", pipeline.shape().name);
        }
    }

    info!(
        "Locales: {}",
        config
            .locales
            .iter()
            .map(|locale| locale.code())
            .collect::<Vec<_>>()
            .join(", ")
    );
    if config.api_key.is_none() {
        info!("No API_KEY configured, endpoints are unauthenticated");
    }

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, router(state))
        .await
        .context("Server error")?;

    Ok(())
}
