use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use crate::api::response::ApiError;
use crate::models::CreateBooking;
use crate::services::BookingService;

use super::AppState;

#[derive(Debug, Serialize)]
pub struct BookingOutcome {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub async fn create_booking(
    State(state): State<AppState>,
    payload: Result<Json<CreateBooking>, JsonRejection>,
) -> impl IntoResponse {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => return failure(rejection.into()),
    };

    let event_id = match payload.parse_event_id() {
        Ok(id) => id,
        Err(e) => return failure(ApiError::from_service(e.into(), "Failed to create booking")),
    };

    let service = BookingService::new(&state.db);
    match service.create_booking(event_id, &payload.email).await {
        Ok(_) => (
            StatusCode::CREATED,
            Json(BookingOutcome {
                success: true,
                message: None,
            }),
        ),
        Err(e) => failure(ApiError::from_service(e, "Failed to create booking")),
    }
}

fn failure(err: ApiError) -> (StatusCode, Json<BookingOutcome>) {
    (
        err.status,
        Json(BookingOutcome {
            success: false,
            message: Some(err.message),
        }),
    )
}
