use std::{path::Path, sync::Arc};

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{handler::*, middleware::mw_require_auth, AppState};

pub fn create_router(app_state: Arc<AppState>, static_dir: &Path) -> Router {
    let app = Router::new()
        .route("/", get(index_page))
        .route("/todo/add", post(add_todo))
        .route("/todo/del/:id", delete(delete_todo))
        .route_layer(from_fn_with_state(app_state.clone(), mw_require_auth))
        .route("/register", get(register_page).post(register))
        .route("/login", get(login_page).post(login))
        .route("/health", get(health_checker_handler))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http());
    app
}
