use std::env;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

use lecture_chat::core::config::{
    apply_port_override, resolve_api_key, AppPaths, ConfigService, API_KEY_ENV, PORT_ENV,
};
use lecture_chat::core::logging;
use lecture_chat::server;
use lecture_chat::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let api_key = resolve_api_key(env::var(API_KEY_ENV).ok(), env::args().skip(1))?;

    let paths = Arc::new(AppPaths::new());
    logging::init(&paths);

    let config_service = ConfigService::new(paths.clone());
    let mut config = config_service
        .load_config()
        .context("Failed to load configuration")?;
    apply_port_override(&mut config, env::var(PORT_ENV).ok().as_deref())?;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::initialize(&config_service, config, api_key)?;

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    let addr = listener.local_addr()?;

    println!("LECTURE_CHAT_ADDR=http://{}", addr);
    tracing::info!("Listening on {}", addr);

    let app: Router = server::router::router(state);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
