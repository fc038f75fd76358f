use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Event;

pub struct EventRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> EventRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, event: &Event) -> Result<()> {
        sqlx::query(
            "INSERT INTO events (id, title, slug, description, overview, image, venue, location, date, time, mode, audience, agenda, organizer, tags, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)"
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.slug)
        .bind(&event.description)
        .bind(&event.overview)
        .bind(&event.image)
        .bind(&event.venue)
        .bind(&event.location)
        .bind(&event.date)
        .bind(&event.time)
        .bind(event.mode)
        .bind(&event.audience)
        .bind(serde_json::to_value(&event.agenda)?)
        .bind(&event.organizer)
        .bind(serde_json::to_value(&event.tags)?)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE slug = $1")
            .bind(slug)
            .fetch_optional(self.pool)
            .await?;

        Ok(event)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(event)
    }

    /// Identity-only existence check; does not load the row.
    pub async fn exists(&self, id: Uuid) -> Result<bool> {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM events WHERE id = $1)")
            .bind(id)
            .fetch_one(self.pool)
            .await?;

        Ok(exists)
    }

    pub async fn update(&self, event: &Event) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE events SET title = $1, slug = $2, description = $3, overview = $4, image = $5, venue = $6, location = $7, date = $8, time = $9, mode = $10, audience = $11, agenda = $12, organizer = $13, tags = $14, updated_at = $15 WHERE id = $16"
        )
        .bind(&event.title)
        .bind(&event.slug)
        .bind(&event.description)
        .bind(&event.overview)
        .bind(&event.image)
        .bind(&event.venue)
        .bind(&event.location)
        .bind(&event.date)
        .bind(&event.time)
        .bind(event.mode)
        .bind(&event.audience)
        .bind(serde_json::to_value(&event.agenda)?)
        .bind(&event.organizer)
        .bind(serde_json::to_value(&event.tags)?)
        .bind(event.updated_at)
        .bind(event.id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
