use tracing::{debug, error, info};

use crate::db::ConnectionManager;
use crate::error::{Error, Result, ValidationError};
use crate::models::{CreateEvent, Event, UpdateEvent};
use crate::repositories::{is_unique_violation, EventRepository};

const SLUG_TAKEN: &str = "an event with this slug already exists";

pub struct EventService<'a> {
    db: &'a ConnectionManager,
}

impl<'a> EventService<'a> {
    pub fn new(db: &'a ConnectionManager) -> Self {
        Self { db }
    }

    /// Finds an event by slug after trimming and lowercasing it. A missing
    /// event is `Ok(None)`.
    pub async fn lookup_by_slug(&self, raw_slug: &str) -> Result<Option<Event>> {
        let slug = sanitize_slug(raw_slug)?;
        let pool = self.db.connect().await?;

        let event = EventRepository::new(&pool)
            .find_by_slug(&slug)
            .await
            .map_err(|e| {
                error!("Failed to fetch event by slug '{}': {:#}", slug, e);
                Error::Internal(e)
            })?;

        debug!("Lookup for slug '{}' found: {}", slug, event.is_some());
        Ok(event)
    }

    pub async fn create_event(&self, payload: CreateEvent) -> Result<Event> {
        let event = Event::prepare(payload)?;
        let pool = self.db.connect().await?;

        if let Err(e) = EventRepository::new(&pool).create(&event).await {
            if is_unique_violation(&e) {
                return Err(ValidationError::single("slug", SLUG_TAKEN).into());
            }
            error!("Failed to save event: {:#}", e);
            return Err(Error::Internal(e));
        }

        info!("Created event {} ({})", event.id, event.slug);
        Ok(event)
    }

    /// Applies a partial update to the event behind `raw_slug`. Returns
    /// `Ok(None)` when no such event exists.
    pub async fn update_event(&self, raw_slug: &str, payload: UpdateEvent) -> Result<Option<Event>> {
        let slug = sanitize_slug(raw_slug)?;
        let pool = self.db.connect().await?;
        let repo = EventRepository::new(&pool);

        let mut event = match repo.find_by_slug(&slug).await {
            Ok(Some(event)) => event,
            Ok(None) => return Ok(None),
            Err(e) => {
                error!("Failed to fetch event '{}' for update: {:#}", slug, e);
                return Err(Error::Internal(e));
            }
        };

        let changes = event.apply(payload)?;

        match repo.update(&event).await {
            Ok(true) => {}
            Ok(false) => return Ok(None),
            Err(e) if is_unique_violation(&e) => {
                return Err(ValidationError::single("slug", SLUG_TAKEN).into());
            }
            Err(e) => {
                error!("Failed to update event {}: {:#}", event.id, e);
                return Err(Error::Internal(e));
            }
        }

        info!("Updated event {} ({}) {:?}", event.id, event.slug, changes);
        Ok(Some(event))
    }
}

fn sanitize_slug(raw: &str) -> Result<String, ValidationError> {
    let slug = raw.trim().to_lowercase();
    if slug.is_empty() {
        return Err(ValidationError::single(
            "slug",
            "Invalid or missing slug parameter",
        ));
    }
    Ok(slug)
}
