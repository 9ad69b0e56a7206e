use chrono::Local;
use crier::{router, AppState, Config, Tracker};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    let tracker = if config.sample_data {
        Tracker::with_sample_data(Local::now().date_naive())
    } else {
        Tracker::new()
    };
    info!(
        "starting with {} goal(s) and {} habit(s)",
        tracker.goals().len(),
        tracker.habits().len()
    );

    let app = router(AppState::new(tracker));
    let addr = config.addr();

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
