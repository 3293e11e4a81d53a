use std::sync::Arc;

use axum::{
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use crate::{
    error::{AuthFailure, Result},
    AppState,
};

/// Cookie carrying the signed session token.
pub const TOKEN_COOKIE: &str = "jwt_token";

/// Gate for protected routes: resolves the session cookie to a `CurrentUser`
/// extension, or short-circuits with a redirect to the login page.
pub async fn mw_require_auth<B>(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request<B>,
    next: Next<B>,
) -> Result<Response> {
    let token = jar
        .get(TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(AuthFailure::MissingCookie)?;

    let user = state.tokens.validate(&token).map_err(AuthFailure::from)?;
    debug!("authenticated {}", user.username);

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
