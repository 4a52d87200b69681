use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::db::{self, query::ActivityFilter, Activity, ActivityPatch, NewActivity, StoreError};
use crate::AppState;

use super::error::ApiError;
use super::validation::{validate_activity_patch, validate_new_activity};

/// `?location=&month=`; empty values count as absent
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub location: Option<String>,
    pub month: Option<String>,
}

impl SearchParams {
    pub fn filter(&self) -> ActivityFilter {
        ActivityFilter::new(self.location.as_deref(), self.month.as_deref())
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub count: usize,
    pub location: String,
    pub month: String,
    pub data: Vec<Activity>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub success: bool,
    pub message: String,
    pub modified_count: u64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

fn activity_not_found(err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound => ApiError::not_found("Activity not found"),
        other => other.into(),
    }
}

fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

/// Search by location substring and/or month
pub async fn search_activities(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let filter = params.filter();
    let activities = db::activities::search(&state.db, &filter).await?;

    Ok(Json(SearchResponse {
        success: true,
        count: activities.len(),
        location: filter.location().unwrap_or("All").to_string(),
        month: filter.month().unwrap_or("All").to_string(),
        data: activities,
    }))
}

pub async fn list_activities(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ListResponse<Activity>>, ApiError> {
    let activities = db::activities::list(&state.db).await?;
    Ok(Json(ListResponse::new(activities)))
}

pub async fn get_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<Activity>>, ApiError> {
    let activity = db::activities::get(&state.db, &id)
        .await
        .map_err(activity_not_found)?;

    Ok(Json(DataResponse {
        success: true,
        message: None,
        data: activity,
    }))
}

pub async fn create_activity(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewActivity>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<Activity>>), ApiError> {
    let new = parse_body(payload)?;
    validate_new_activity(&new)?;

    let activity = db::activities::create(&state.db, &new).await?;
    info!(activity_id = %activity.id, "Activity created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            success: true,
            message: Some("Activity created successfully".to_string()),
            data: activity,
        }),
    ))
}

pub async fn update_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<ActivityPatch>, JsonRejection>,
) -> Result<Json<UpdateResponse>, ApiError> {
    let patch = parse_body(payload)?;
    validate_activity_patch(&patch)?;

    let modified_count = db::activities::update(&state.db, &id, &patch)
        .await
        .map_err(activity_not_found)?;

    Ok(Json(UpdateResponse {
        success: true,
        message: "Activity updated successfully".to_string(),
        modified_count,
    }))
}

pub async fn delete_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    db::activities::delete(&state.db, &id)
        .await
        .map_err(activity_not_found)?;
    info!(activity_id = %id, "Activity deleted");

    Ok(Json(MessageResponse {
        success: true,
        message: "Activity deleted successfully".to_string(),
    }))
}

/// Distinct activity locations, sorted
pub async fn list_locations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ListResponse<String>>, ApiError> {
    let locations = db::activities::distinct_locations(&state.db).await?;
    Ok(Json(ListResponse::new(locations)))
}
