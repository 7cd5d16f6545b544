//! Session authentication for protected routes

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::{AppState, error::AppResult, models::User, session::SessionManager};

/// The user behind the current request's session
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub session_token: String,
}

/// Resolve the session cookie to an active user
pub async fn current_user(state: &AppState, jar: &CookieJar) -> AppResult<Option<CurrentUser>> {
    let Some(token) = SessionManager::token_from(jar) else {
        return Ok(None);
    };

    let Some(session) = state.session_manager.get_session(&token).await? else {
        return Ok(None);
    };

    let user = state
        .user_repository
        .find_by_id(session.user_id)
        .await?
        .filter(|user| user.is_active);

    Ok(user.map(|user| CurrentUser {
        user,
        session_token: session.token,
    }))
}

/// Let the request through only with a live session; otherwise send the
/// client to the login page
pub async fn require_login(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    match current_user(&state, &jar).await {
        Ok(Some(current)) => {
            req.extensions_mut().insert(current);
            next.run(req).await
        }
        Ok(None) => Redirect::to("/login").into_response(),
        Err(e) => e.into_response(),
    }
}
