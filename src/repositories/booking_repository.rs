use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Booking;

pub struct BookingRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BookingRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, booking: &Booking) -> Result<()> {
        sqlx::query(
            "INSERT INTO bookings (id, event_id, email, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(booking.id)
        .bind(booking.event_id)
        .bind(&booking.email)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    pub async fn list_by_event(&self, event_id: Uuid) -> Result<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE event_id = $1 ORDER BY created_at DESC",
        )
        .bind(event_id)
        .fetch_all(self.pool)
        .await?;

        Ok(bookings)
    }

    pub async fn count_by_event(&self, event_id: Uuid) -> Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM bookings WHERE event_id = $1")
                .bind(event_id)
                .fetch_one(self.pool)
                .await?;

        Ok(count)
    }
}
