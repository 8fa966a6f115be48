use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use tower_http::trace::TraceLayer;

use recipe_box::{
    config::AppConfig,
    db::connection,
    logging::init_tracing,
    mail::LogMailer,
    middleware::catch_panic_layer,
    routes::router,
    state::AppState,
};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!("server failed: {err:?}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env()?;
    init_tracing(&cfg.logging);

    let db = connection::connect(&cfg.database).await?;
    let state = AppState::new(cfg, db, Arc::new(LogMailer));

    let app = Router::new()
        .merge(router(Arc::clone(&state)))
        .layer(catch_panic_layer())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", state.config.general.host, state.config.general.port)
        .parse()
        .map_err(|err| anyhow::anyhow!("invalid host/port: {err}"))?;
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
