use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Extension, Form, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::json;
use tracing::info;

use crate::{
    error::{AppError, Result},
    middleware::TOKEN_COOKIE,
    model::{CurrentUser, Todo},
    schema::{CreateTodoSchema, LoginSchema, RegisterSchema},
    AppState,
};

const MAX_TITLE_CHARS: usize = 100;
const MAX_DESCRIPTION_CHARS: usize = 255;

// Handler for the health checker route
pub async fn health_checker_handler() -> impl IntoResponse {
    const MESSAGE: &str = "Multi-user todo list with Rust, SQLX, SQLite, and Axum";

    Json(json!({
        "status": "success",
        "message": MESSAGE
    }))
}

// Handler for the index page listing the caller's todos
pub async fn index_page(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Html<String>> {
    let todos = data.todos.list_todos(&user.username).await?;
    Ok(Html(data.views.index(&user.username, &todos)?))
}

// Handler for creating a new Todo; responds with the rendered todo
pub async fn add_todo(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Form(body): Form<CreateTodoSchema>,
) -> Result<Html<String>> {
    check_todo_inputs(&body.title, &body.description)?;

    // Friendly message for the common case; the unique index covers the race
    let existing = data.todos.list_todos(&user.username).await?;
    if existing.iter().any(|todo| todo.title == body.title) {
        return Err(AppError::Duplicate(format!(
            "todo with title {} already exists",
            body.title
        )));
    }

    let id = data
        .todos
        .add_todo(&user.username, &body.title, &body.description)
        .await?;

    let todo = Todo {
        id,
        title: body.title,
        description: body.description,
    };
    Ok(Html(data.views.todo(&todo)?))
}

// Handler for deleting one of the caller's todos
pub async fn delete_todo(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = parse_todo_id(&id)?;
    data.todos.remove_todo(&user.username, id).await?;
    Ok(StatusCode::OK)
}

pub async fn register_page(State(data): State<Arc<AppState>>) -> Result<Html<String>> {
    Ok(Html(data.views.register()?))
}

pub async fn register(
    State(data): State<Arc<AppState>>,
    Form(body): Form<RegisterSchema>,
) -> Result<impl IntoResponse> {
    data.credentials
        .register(&body.username, &body.password, &body.password_repeated)
        .await?;

    Ok([("HX-Redirect", "/login")])
}

pub async fn login_page(State(data): State<Arc<AppState>>) -> Result<Html<String>> {
    Ok(Html(data.views.login()?))
}

pub async fn login(
    State(data): State<Arc<AppState>>,
    jar: CookieJar,
    Form(body): Form<LoginSchema>,
) -> Result<impl IntoResponse> {
    let user = data.credentials.verify(&body.username, &body.password).await?;
    let issued = data.tokens.issue(&user)?;
    info!("{} logged in, token valid until {}", user.username, issued.expires_at);

    let cookie = Cookie::build(TOKEN_COOKIE, issued.token.clone())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish();

    Ok((
        jar.add(cookie),
        [
            ("jwt-token", issued.token),
            ("jwt-exp", issued.expires_in_ms.to_string()),
            ("HX-Redirect", "/".to_string()),
        ],
    ))
}

fn check_todo_inputs(title: &str, description: &str) -> Result<()> {
    if title.trim().is_empty() || description.trim().is_empty() {
        return Err(AppError::Validation(
            "title and description are required".to_string(),
        ));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(AppError::Validation("title too long".to_string()));
    }
    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(AppError::Validation("description too long".to_string()));
    }
    Ok(())
}

/// Todo ids in paths are plain decimal digits.
fn parse_todo_id(raw: &str) -> Result<i64> {
    let not_found = || AppError::NotFound(format!("Todo with ID: {} not found", raw));

    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(not_found());
    }
    raw.parse().map_err(|_| not_found())
}
