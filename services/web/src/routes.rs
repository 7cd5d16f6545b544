//! Web service routes

use axum::{
    Extension, Form, Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::{
    AppState,
    error::AppResult,
    forms::{FieldErrors, LoginForm, ProfileForm, RatingForm, RegistrationForm, UserForm, Validate},
    middleware::{CurrentUser, current_user, require_login},
    models::RATING_CHOICES,
    registration::RegistrationOutcome,
    session::SessionManager,
};

pub const INVALID_LOGIN: &str = "invalid login details supplied.Maybe you havent registered.";
pub const INACTIVE_ACCOUNT: &str = "ACCOUNT NOT ACTIVE";

/// Room left in a registration body for the non-file fields
const FORM_FIELDS_ALLOWANCE: usize = 64 * 1024;

/// Create the router for the web service
pub fn create_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes + FORM_FIELDS_ALLOWANCE;

    let protected_routes = Router::new()
        .route("/logout", get(logout))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_login));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/login", get(login_page).post(login))
        .route(
            "/register",
            get(register_page)
                .post(register)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/journey/start", get(journey_start))
        .route("/journey/rate", get(rate_page).post(rate))
        .route("/journey/after", get(journey_after))
        .nest_service("/media", ServeDir::new(state.media.root()))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match common::database::health_check(&state.db_pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": "vsafe-web"
            })),
        ),
        Err(e) => {
            error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unavailable",
                    "service": "vsafe-web"
                })),
            )
        }
    }
}

#[derive(Serialize)]
struct LandingUser {
    username: String,
    display_name: String,
    profile_pic: Option<String>,
}

#[derive(Serialize)]
struct LandingPage {
    user: Option<LandingUser>,
}

/// Landing page
pub async fn index(State(state): State<AppState>, jar: CookieJar) -> AppResult<Html<String>> {
    let user = match current_user(&state, &jar).await? {
        Some(current) => {
            let profile = state
                .profile_repository
                .find_by_user_id(current.user.id)
                .await?;

            Some(LandingUser {
                display_name: current.user.display_name(),
                username: current.user.username,
                profile_pic: profile.and_then(|profile| profile.profile_pic),
            })
        }
        None => None,
    };

    state.templates.render("landing.html", &LandingPage { user })
}

/// Login form
pub async fn login_page(State(state): State<AppState>) -> AppResult<Html<String>> {
    state.templates.render_plain("login.html")
}

/// Credential check
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let username = form.username.trim();

    let user = match state.user_repository.find_by_username(username).await? {
        Some(user) if state.user_repository.verify_password(&user, &form.password)? => user,
        _ => {
            warn!("Failed login attempt for username: {}", username);
            return Ok(INVALID_LOGIN.into_response());
        }
    };

    if !user.is_active {
        return Ok(INACTIVE_ACCOUNT.into_response());
    }

    if let Some(previous) = SessionManager::token_from(&jar) {
        state.session_manager.delete_session(&previous).await?;
    }

    let session = state.session_manager.create_session(user.id).await?;
    state.user_repository.record_login(user.id, Utc::now()).await?;
    info!("User logged in: {}", user.username);

    let jar = jar.add(state.session_manager.session_cookie(&session));
    Ok((jar, Redirect::to("/")).into_response())
}

/// Destroy the session and return to the login page
pub async fn logout(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    state
        .session_manager
        .delete_session(&current.session_token)
        .await?;
    info!("User logged out: {}", current.user.username);

    let jar = jar.remove(state.session_manager.removal_cookie());
    Ok((jar, Redirect::to("/login")))
}

#[derive(Serialize)]
struct RegistrationPage<'a> {
    registered: bool,
    user_form: &'a UserForm,
    profile_form: &'a ProfileForm,
    user_errors: FieldErrors,
    profile_errors: FieldErrors,
}

/// Empty registration form
pub async fn register_page(State(state): State<AppState>) -> AppResult<Html<String>> {
    let form = RegistrationForm::default();

    state.templates.render(
        "registration.html",
        &RegistrationPage {
            registered: false,
            user_form: &form.user,
            profile_form: &form.profile,
            user_errors: FieldErrors::new(),
            profile_errors: FieldErrors::new(),
        },
    )
}

/// Account creation
pub async fn register(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Html<String>> {
    let form = RegistrationForm::from_multipart(multipart).await?;

    let page = match state.registration.register(&form).await? {
        RegistrationOutcome::Registered { .. } => RegistrationPage {
            registered: true,
            user_form: &form.user,
            profile_form: &form.profile,
            user_errors: FieldErrors::new(),
            profile_errors: FieldErrors::new(),
        },
        RegistrationOutcome::Invalid {
            user_errors,
            profile_errors,
        } => RegistrationPage {
            registered: false,
            user_form: &form.user,
            profile_form: &form.profile,
            user_errors,
            profile_errors,
        },
    };

    state.templates.render("registration.html", &page)
}

/// Journey start page
pub async fn journey_start(State(state): State<AppState>) -> AppResult<Html<String>> {
    state.templates.render_plain("before.html")
}

/// Post-journey page without a form
pub async fn journey_after(State(state): State<AppState>) -> AppResult<Html<String>> {
    state.templates.render_plain("after.html")
}

#[derive(Serialize)]
struct RatingPage {
    show_form: bool,
    saved: bool,
    rating: RatingForm,
    errors: FieldErrors,
    choices: Vec<String>,
}

impl RatingPage {
    fn new(rating: RatingForm, saved: bool, errors: FieldErrors) -> Self {
        Self {
            show_form: true,
            saved,
            rating,
            errors,
            choices: RATING_CHOICES.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Empty rating form
pub async fn rate_page(State(state): State<AppState>) -> AppResult<Html<String>> {
    let page = RatingPage::new(RatingForm::default(), false, FieldErrors::new());
    state.templates.render("after.html", &page)
}

/// Rating submission
pub async fn rate(
    State(state): State<AppState>,
    Form(form): Form<RatingForm>,
) -> AppResult<Html<String>> {
    let page = match form.validate() {
        Ok(new_rating) => {
            state.area_rating_repository.create(&new_rating).await?;
            RatingPage::new(form, true, FieldErrors::new())
        }
        Err(errors) => RatingPage::new(form, false, errors),
    };

    state.templates.render("after.html", &page)
}
