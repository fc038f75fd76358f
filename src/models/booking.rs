use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::normalize::normalize_email;
use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub event_id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Booking request as sent by the event page. A `slug` field, if present, is
/// ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateBooking {
    #[serde(alias = "event_id")]
    pub event_id: String,
    pub email: String,
}

impl Booking {
    pub fn new(event_id: Uuid, email: &str) -> Result<Self, ValidationError> {
        let email = normalize_email(email)?;
        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4(),
            event_id,
            email,
            created_at: now,
            updated_at: now,
        })
    }
}

impl CreateBooking {
    pub fn parse_event_id(&self) -> Result<Uuid, ValidationError> {
        Uuid::parse_str(self.event_id.trim())
            .map_err(|_| ValidationError::single("eventId", "invalid event id"))
    }
}
