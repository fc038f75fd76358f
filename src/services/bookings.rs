use sqlx::PgPool;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::db::ConnectionManager;
use crate::error::{Error, Result, ValidationError};
use crate::models::Booking;
use crate::repositories::{is_foreign_key_violation, BookingRepository, EventRepository};

const EVENT_MISSING: &str = "event does not exist";

pub struct BookingService<'a> {
    db: &'a ConnectionManager,
}

impl<'a> BookingService<'a> {
    pub fn new(db: &'a ConnectionManager) -> Self {
        Self { db }
    }

    /// Records a booking for an existing event. Email rules run first, then
    /// the event reference is verified before anything is written.
    pub async fn create_booking(&self, event_id: Uuid, email: &str) -> Result<Booking> {
        let result = self.try_create(event_id, email).await;

        match &result {
            Ok(booking) => info!("Created booking {} for event {}", booking.id, event_id),
            Err(e) if e.is_validation() => warn!("Rejected booking for event {}: {}", event_id, e),
            Err(e) => error!("Create booking failed for event {}: {:#}", event_id, e),
        }

        result
    }

    async fn try_create(&self, event_id: Uuid, email: &str) -> Result<Booking> {
        let booking = Booking::new(event_id, email)?;
        let pool = self.db.connect().await?;

        verify_event_reference(&pool, event_id).await?;

        if let Err(e) = BookingRepository::new(&pool).create(&booking).await {
            if is_foreign_key_violation(&e) {
                return Err(ValidationError::single("eventId", EVENT_MISSING).into());
            }
            return Err(Error::Internal(e));
        }

        Ok(booking)
    }

    pub async fn bookings_for_event(&self, event_id: Uuid) -> Result<Vec<Booking>> {
        let pool = self.db.connect().await?;
        Ok(BookingRepository::new(&pool).list_by_event(event_id).await?)
    }

    pub async fn count_for_event(&self, event_id: Uuid) -> Result<i64> {
        let pool = self.db.connect().await?;
        Ok(BookingRepository::new(&pool).count_by_event(event_id).await?)
    }
}

async fn verify_event_reference(pool: &PgPool, event_id: Uuid) -> Result<()> {
    match EventRepository::new(pool).exists(event_id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(ValidationError::single("eventId", EVENT_MISSING).into()),
        Err(e) => Err(Error::ReferenceCheck(e)),
    }
}
