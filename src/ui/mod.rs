// Server-rendered pages and form posts (Askama templates)

mod destinations;
mod templates;

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;

use crate::api::activities::SearchParams;
use crate::api::error::ApiError;
use crate::api::validation::validate_new_activity;
use crate::auth::{self, session, LoginRequest, MaybeUser, SignupRequest};
use crate::db::{self, NewActivity, SeasonalMonths, SessionUser, StoreError};
use crate::AppState;

pub use templates::*;

// Helper to render templates and handle errors
fn render_template<T: Template>(template: T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Template error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

fn error_page(status: StatusCode, title: &str, message: &str, user: Option<SessionUser>) -> Response {
    let mut response = render_template(ErrorTemplate {
        title: title.to_string(),
        page: "error",
        user,
        message: message.to_string(),
    });
    *response.status_mut() = status;
    response
}

/// Log the cause and render the generic 500 page
fn store_failure_page(err: StoreError, what: &str, user: Option<SessionUser>) -> Response {
    error!("Failed to load {}: {}", what, err);
    error_page(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Error",
        &format!("Failed to load {}. Please try again later.", what),
        user,
    )
}

/// `path?key=value` with the value form-encoded
fn redirect_with(path: &str, key: &str, value: &str) -> Redirect {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair(key, value)
        .finish();
    Redirect::to(&format!("{}?{}", path, query))
}

/// Client-facing text for a failed form post; 5xx causes are logged by
/// the `ApiError` conversion and replaced with a generic message.
fn form_error_message(err: impl Into<ApiError>) -> String {
    err.into().message().to_string()
}

pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(home))
        .route("/destinations", get(destinations_page))
        .route("/destinations/:id", get(destination_detail))
        .route("/activities", get(activities_page))
        .route("/admin", get(admin_page))
        .route("/admin/activities", post(admin_create_activity))
        .route("/admin/activities/:id/delete", post(admin_delete_activity))
        .route("/login", get(login_page).post(login_submit))
        .route("/signup", get(signup_page).post(signup_submit))
        .route("/logout", get(logout))
}

/// Fallback for unknown paths
pub async fn not_found(MaybeUser(user): MaybeUser) -> Response {
    error_page(
        StatusCode::NOT_FOUND,
        "404 - Page Not Found",
        "The page you are looking for does not exist.",
        user,
    )
}

#[derive(Debug, Default, Deserialize)]
pub struct FlashParams {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub error: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DestinationQuery {
    #[serde(default)]
    pub q: String,
}

async fn home(MaybeUser(user): MaybeUser) -> Response {
    render_template(HomeTemplate {
        title: "Exploreo - Seasonal Travel Planner".to_string(),
        page: "home",
        user,
    })
}

async fn destinations_page(
    MaybeUser(user): MaybeUser,
    Query(query): Query<DestinationQuery>,
) -> Response {
    render_template(DestinationsTemplate {
        title: "Exploreo - Destinations".to_string(),
        page: "destinations",
        user,
        destinations: destinations::search(&query.q),
        query: query.q,
    })
}

async fn destination_detail(MaybeUser(user): MaybeUser, Path(id): Path<String>) -> Response {
    match destinations::find(&id) {
        Some(destination) => render_template(DestinationTemplate {
            title: format!("Exploreo - {}", destination.name),
            page: "destinations",
            user,
            destination,
        }),
        None => error_page(
            StatusCode::NOT_FOUND,
            "404 - Page Not Found",
            "Destination not found.",
            user,
        ),
    }
}

/// Search form plus results; the full listing when no criteria are given
async fn activities_page(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    Query(params): Query<SearchParams>,
) -> Response {
    let filter = params.filter();
    let search_performed = !filter.is_empty();

    let activities = match db::activities::search(&state.db, &filter).await {
        Ok(activities) => activities,
        Err(e) => return store_failure_page(e, "activities", user),
    };

    let location = filter.location().unwrap_or_default().to_string();
    let month = filter.month().unwrap_or_default().to_string();

    render_template(ActivitiesTemplate {
        title: "Exploreo - Activity Search".to_string(),
        page: "activities",
        user,
        no_results: search_performed && activities.is_empty(),
        activities: activity_views(activities),
        months: month_options(&month),
        location,
        month,
        search_performed,
    })
}

/// Admin session or a redirect to the login page
fn require_admin(user: Option<SessionUser>) -> Result<SessionUser, Response> {
    match user {
        Some(user) if user.is_admin() => Ok(user),
        Some(_) => Err(redirect_with("/login", "error", "Admin access required").into_response()),
        None => Err(
            redirect_with("/login", "error", "Please log in as an administrator").into_response(),
        ),
    }
}

async fn admin_page(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    Query(flash): Query<FlashParams>,
) -> Response {
    let admin = match require_admin(user) {
        Ok(admin) => admin,
        Err(redirect) => return redirect,
    };

    let activities = match db::activities::list(&state.db).await {
        Ok(activities) => activities,
        Err(e) => return store_failure_page(e, "admin panel", Some(admin)),
    };

    render_template(AdminTemplate {
        title: "Exploreo - Admin Panel".to_string(),
        page: "admin",
        user: Some(admin),
        activities: activity_views(activities),
        message: flash.message,
        error: flash.error,
    })
}

/// Admin create form. Months arrive comma-separated, price as text.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ActivityForm {
    pub name: String,
    pub description: String,
    pub location: String,
    pub category: String,
    pub seasonal_months: String,
    pub price: String,
}

impl ActivityForm {
    pub fn into_new_activity(self) -> Result<NewActivity, String> {
        let price = match self.price.trim() {
            "" => None,
            raw => Some(
                raw.parse::<f64>()
                    .map_err(|_| "Price must be a number".to_string())?,
            ),
        };

        Ok(NewActivity {
            name: self.name,
            description: self.description,
            location: self.location,
            category: self.category,
            seasonal_months: Some(SeasonalMonths::Csv(self.seasonal_months)),
            price,
        })
    }
}

async fn admin_create_activity(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    Form(form): Form<ActivityForm>,
) -> Response {
    if let Err(redirect) = require_admin(user) {
        return redirect;
    }

    let new = match form.into_new_activity() {
        Ok(new) => new,
        Err(message) => return redirect_with("/admin", "error", &message).into_response(),
    };
    if let Err(e) = validate_new_activity(&new) {
        return redirect_with("/admin", "error", e.message()).into_response();
    }

    match db::activities::create(&state.db, &new).await {
        Ok(_) => redirect_with("/admin", "message", "Activity created successfully").into_response(),
        Err(e) => redirect_with("/admin", "error", &form_error_message(e)).into_response(),
    }
}

async fn admin_delete_activity(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<String>,
) -> Response {
    if let Err(redirect) = require_admin(user) {
        return redirect;
    }

    match db::activities::delete(&state.db, &id).await {
        Ok(()) => redirect_with("/admin", "message", "Activity deleted successfully").into_response(),
        Err(StoreError::NotFound) => {
            redirect_with("/admin", "error", "Activity not found").into_response()
        }
        Err(e) => redirect_with("/admin", "error", &form_error_message(e)).into_response(),
    }
}

async fn login_page(MaybeUser(user): MaybeUser, Query(flash): Query<FlashParams>) -> Response {
    render_template(LoginTemplate {
        title: "Exploreo - Login".to_string(),
        page: "login",
        user,
        message: flash.message,
        error: flash.error,
    })
}

async fn login_submit(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginRequest>,
) -> Response {
    match auth::login(&state.db, &state.config.auth, &form).await {
        Ok(issued) => {
            let jar = jar.add(session::session_cookie(
                issued.token,
                state.config.auth.secure_cookies,
            ));
            let target = if issued.user.is_admin() { "/admin" } else { "/activities" };
            (jar, Redirect::to(target)).into_response()
        }
        Err(e) => redirect_with("/login", "error", &form_error_message(e)).into_response(),
    }
}

async fn signup_page(MaybeUser(user): MaybeUser, Query(flash): Query<FlashParams>) -> Response {
    render_template(SignupTemplate {
        title: "Exploreo - Sign Up".to_string(),
        page: "signup",
        user,
        error: flash.error,
    })
}

async fn signup_submit(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<SignupRequest>,
) -> Response {
    match auth::signup(&state.db, &state.config.auth, &form).await {
        Ok(issued) => {
            let jar = jar.add(session::session_cookie(
                issued.token,
                state.config.auth.secure_cookies,
            ));
            (jar, Redirect::to("/activities")).into_response()
        }
        Err(e) => redirect_with("/signup", "error", &form_error_message(e)).into_response(),
    }
}

async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let token = session::token_from_jar(&jar);
    if let Err(e) = auth::logout(&state.db, &state.config.auth, token.as_deref()).await {
        // The cookie is cleared regardless
        error!("Failed to delete session: {}", e);
    }

    let jar = jar.remove(session::removal_cookie());
    (jar, redirect_with("/login", "message", "You have been logged out")).into_response()
}
