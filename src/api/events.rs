use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

use crate::api::response::ApiError;
use crate::models::{CreateEvent, Event, UpdateEvent};
use crate::services::EventService;

use super::AppState;

pub async fn get_event_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let service = EventService::new(&state.db);

    match service.lookup_by_slug(&slug).await {
        Ok(Some(event)) => Ok((
            StatusCode::OK,
            Json(json!({
                "message": "Event fetched successfully",
                "event": event_json(&event, state.settings.legacy_array_encoding)?,
            })),
        )),
        Ok(None) => Err(ApiError::bad_request(format!(
            "Event with slug {} not found",
            slug.trim().to_lowercase()
        ))),
        Err(e) => Err(ApiError::from_service(e, "Error while fetching event by slug")),
    }
}

pub async fn create_event(
    State(state): State<AppState>,
    payload: Result<Json<CreateEvent>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let service = EventService::new(&state.db);

    let event = service
        .create_event(payload)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to create event"))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({"message": "Event created successfully", "event": event})),
    ))
}

pub async fn update_event(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    payload: Result<Json<UpdateEvent>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let service = EventService::new(&state.db);

    match service.update_event(&slug, payload).await {
        Ok(Some(event)) => Ok((
            StatusCode::OK,
            Json(json!({"message": "Event updated successfully", "event": event})),
        )),
        Ok(None) => Err(ApiError::bad_request(format!(
            "Event with slug {} not found",
            slug.trim().to_lowercase()
        ))),
        Err(e) => Err(ApiError::from_service(e, "Failed to update event")),
    }
}

/// Serializes an event for the lookup endpoint. In legacy mode `agenda` and
/// `tags` become a one-element array holding the JSON-encoded list.
pub fn event_json(event: &Event, legacy_arrays: bool) -> Result<Value, serde_json::Error> {
    let mut value = serde_json::to_value(event)?;

    if legacy_arrays {
        if let Value::Object(ref mut map) = value {
            map.insert(
                "agenda".to_string(),
                json!([serde_json::to_string(&event.agenda)?]),
            );
            map.insert(
                "tags".to_string(),
                json!([serde_json::to_string(&event.tags)?]),
            );
        }
    }

    Ok(value)
}
