use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use jobboard::clock::SystemClock;
use jobboard::config::Config;
use jobboard::routes;
use jobboard::sources::http::HttpJobSource;
use jobboard::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("jobboard=info,tower_http=info")),
        )
        .init();

    let config = Config::parse();

    let source = HttpJobSource::new(
        &config.backend_url,
        config.per_page(),
        Duration::from_secs(config.request_timeout),
    )?;
    tracing::info!("Fetching jobs from {}", source.jobs_url());

    let view_ttl = Duration::from_secs(config.view_ttl);
    let state = AppState::new(Arc::new(source), Arc::new(SystemClock), view_ttl);
    state.views.spawn_sweeper(view_ttl.min(Duration::from_secs(60)));
    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    tracing::info!("Listening on {}", config.listen_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
