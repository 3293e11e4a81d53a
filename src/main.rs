mod config;
mod credential;
mod db;
mod error;
mod handler;
mod middleware;
mod model;
mod route;
mod schema;
mod todo_store;
mod token;
mod view;

use std::sync::Arc;

use axum::Server;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::{
    config::Config, credential::CredentialStore, db::Database, error::AppError,
    route::create_router, todo_store::TodoStore, token::TokenService, view::Views,
};

// Struct representing the application state
pub struct AppState {
    pub credentials: CredentialStore,
    pub todos: TodoStore,
    pub tokens: TokenService,
    pub views: Views,
}

// Entry point of the application
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        error!("{}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let config = Config::from_env()?;

    let db = Database::connect(
        &config.database_url,
        config.max_connections,
        config.query_timeout,
    )
    .await?;

    // Create an Arc-wrapped instance of the application state
    let app_state = Arc::new(AppState {
        credentials: CredentialStore::new(db.clone()),
        todos: TodoStore::new(db),
        tokens: TokenService::new(&config.secret),
        views: Views::new()?,
    });

    let app = create_router(app_state, &config.static_dir);

    info!("server is up and listening on {}", config.listen_addr);

    Server::try_bind(&config.listen_addr)
        .map_err(|e| AppError::Config(format!("cannot bind {}: {}", config.listen_addr, e)))?
        .serve(app.into_make_service())
        .await
        .map_err(|e| AppError::Internal(format!("server error: {}", e)))
}
