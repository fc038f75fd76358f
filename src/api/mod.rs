pub mod bookings;
pub mod events;
pub mod health;
pub mod response;
pub mod ui;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::config::Settings;
use crate::db::ConnectionManager;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<ConnectionManager>,
    pub settings: Arc<Settings>,
}

pub fn build_router(db: Arc<ConnectionManager>, settings: Settings) -> Router {
    let state = AppState {
        db,
        settings: Arc::new(settings),
    };

    Router::new()
        .route("/health", get(health::health_check))
        .route("/events", post(events::create_event))
        .route(
            "/events/{slug}",
            get(events::get_event_by_slug).patch(events::update_event),
        )
        .route("/events/{slug}/view", get(ui::event_page))
        .route("/bookings", post(bookings::create_booking))
        .with_state(state)
}
