pub mod activities;
pub mod error;
mod users;
pub mod validation;

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::ui;
use crate::AppState;

/// Full application router: JSON API, HTML pages, static files and the 404 page.
pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Activities
        .route("/activities/search", get(activities::search_activities))
        .route("/activities/all", get(activities::list_activities))
        .route("/activities", post(activities::create_activity))
        .route(
            "/activities/:id",
            get(activities::get_activity)
                .put(activities::update_activity)
                .delete(activities::delete_activity),
        )
        .route("/locations", get(activities::list_locations))
        // Accounts
        .route("/me", get(users::me))
        .route("/users", get(users::list_users));

    let static_dir = state.config.server.static_dir.clone();

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .merge(ui::create_router())
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(ui::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
