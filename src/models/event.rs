use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::normalize::{generate_slug, normalize_date, normalize_time};
use crate::error::ValidationError;

const TITLE_MAX_CHARS: usize = 100;
const DESCRIPTION_MIN_CHARS: usize = 1000;
const OVERVIEW_MIN_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,

    /// `YYYY-MM-DD`
    pub date: String,

    /// 24-hour `HH:MM`
    pub time: String,

    pub mode: EventMode,
    pub audience: String,

    #[sqlx(json)]
    pub agenda: Vec<String>,

    pub organizer: String,

    #[sqlx(json)]
    pub tags: Vec<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "event_mode")]
pub enum EventMode {
    Online,
    Offline,
    Hybrid,
}

impl EventMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "Online" => Some(EventMode::Online),
            "Offline" => Some(EventMode::Offline),
            "Hybrid" => Some(EventMode::Hybrid),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventMode::Online => "Online",
            EventMode::Offline => "Offline",
            EventMode::Hybrid => "Hybrid",
        }
    }
}

/// Absent keys deserialize as empty so presence is reported by validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateEvent {
    pub title: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub mode: String,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub overview: Option<String>,
    pub image: Option<String>,
    pub venue: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub mode: Option<String>,
    pub audience: Option<String>,
    pub agenda: Option<Vec<String>>,
    pub organizer: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Which normalized fields a save has to recompute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Changes {
    pub title: bool,
    pub date: bool,
    pub time: bool,
}

impl Event {
    /// Validates a new event and fills in its slug and normalized date/time.
    pub fn prepare(create: CreateEvent) -> Result<Self, ValidationError> {
        let now = Utc::now();
        let mode = EventMode::parse(&create.mode);

        let mut event = Self {
            id: Uuid::new_v4(),
            title: create.title.trim().to_string(),
            slug: String::new(),
            description: create.description.trim().to_string(),
            overview: create.overview.trim().to_string(),
            image: create.image.trim().to_string(),
            venue: create.venue.trim().to_string(),
            location: create.location.trim().to_string(),
            date: create.date.trim().to_string(),
            time: create.time.trim().to_string(),
            mode: mode.unwrap_or(EventMode::Offline),
            audience: create.audience.trim().to_string(),
            agenda: clean_list(create.agenda),
            organizer: create.organizer.trim().to_string(),
            tags: clean_list(create.tags),
            created_at: now,
            updated_at: now,
        };

        let mut errors = event.validate();
        if mode.is_none() {
            errors.push("mode", MODE_MESSAGE);
        }
        errors.into_result()?;

        event.normalize(Changes {
            title: true,
            date: true,
            time: true,
        })?;

        Ok(event)
    }

    /// Merges `update` into this event, re-validates and renormalizes only the
    /// fields whose raw value changed. Leaves `self` untouched on error.
    pub fn apply(&mut self, update: UpdateEvent) -> Result<Changes, ValidationError> {
        let mut next = self.clone();
        let mut changes = Changes::default();
        let mut errors = ValidationError::new();

        if let Some(title) = update.title {
            let title = title.trim().to_string();
            changes.title = title != next.title;
            next.title = title;
        }
        if let Some(date) = update.date {
            let date = date.trim().to_string();
            changes.date = date != next.date;
            next.date = date;
        }
        if let Some(time) = update.time {
            let time = time.trim().to_string();
            changes.time = time != next.time;
            next.time = time;
        }
        if let Some(mode) = update.mode {
            match EventMode::parse(&mode) {
                Some(mode) => next.mode = mode,
                None => errors.push("mode", MODE_MESSAGE),
            }
        }

        set_trimmed(&mut next.description, update.description);
        set_trimmed(&mut next.overview, update.overview);
        set_trimmed(&mut next.image, update.image);
        set_trimmed(&mut next.venue, update.venue);
        set_trimmed(&mut next.location, update.location);
        set_trimmed(&mut next.audience, update.audience);
        set_trimmed(&mut next.organizer, update.organizer);
        if let Some(agenda) = update.agenda {
            next.agenda = clean_list(agenda);
        }
        if let Some(tags) = update.tags {
            next.tags = clean_list(tags);
        }

        errors.merge(next.validate());
        errors.into_result()?;

        next.normalize(changes)?;

        if next != *self {
            next.updated_at = Utc::now();
        }
        *self = next;

        Ok(changes)
    }

    fn validate(&self) -> ValidationError {
        let mut errors = ValidationError::new();

        if self.title.is_empty() {
            errors.push("title", "Title is required");
        } else if self.title.chars().count() > TITLE_MAX_CHARS {
            errors.push("title", "Title cannot exceed 100 characters");
        }

        if self.description.is_empty() {
            errors.push("description", "Description is required");
        } else if self.description.chars().count() < DESCRIPTION_MIN_CHARS {
            errors.push(
                "description",
                "Description must be at least 1000 characters long",
            );
        }

        if self.overview.is_empty() {
            errors.push("overview", "Overview is required");
        } else if self.overview.chars().count() < OVERVIEW_MIN_CHARS {
            errors.push("overview", "Overview must be at least 500 characters long");
        }

        require(&mut errors, "image", &self.image, "Image url is required");
        require(&mut errors, "venue", &self.venue, "Venue is required");
        require(&mut errors, "location", &self.location, "Location is required");
        require(&mut errors, "date", &self.date, "Date is required");
        require(&mut errors, "time", &self.time, "Time is required");
        require(&mut errors, "audience", &self.audience, "Audience is required");
        require(&mut errors, "organizer", &self.organizer, "Organizer is required");

        if self.agenda.is_empty() {
            errors.push("agenda", "Agenda must have at least one item");
        }
        if self.tags.is_empty() {
            errors.push("tags", "There must be at least one tag");
        }

        errors
    }

    fn normalize(&mut self, changes: Changes) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();

        if changes.title {
            let slug = generate_slug(&self.title);
            if slug.is_empty() {
                errors.push("slug", "title must contain at least one letter or digit");
            }
            self.slug = slug;
        }

        if changes.date {
            match normalize_date(&self.date) {
                Ok(date) => self.date = date,
                Err(err) => errors.merge(err),
            }
        }

        if changes.time {
            match normalize_time(&self.time) {
                Ok(time) => self.time = time,
                Err(err) => errors.merge(err),
            }
        }

        errors.into_result()
    }
}

const MODE_MESSAGE: &str = "Mode must be either Online, Offline, or Hybrid";

fn require(errors: &mut ValidationError, field: &'static str, value: &str, message: &str) {
    if value.is_empty() {
        errors.push(field, message);
    }
}

fn set_trimmed(target: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *target = value.trim().to_string();
    }
}

/// Trims entries, drops blanks and expands the legacy shape where the whole
/// list arrives JSON-encoded in a single element.
pub fn clean_list(items: Vec<String>) -> Vec<String> {
    let expanded = match items.as_slice() {
        [only] if only.trim_start().starts_with('[') => {
            serde_json::from_str::<Vec<String>>(only).ok()
        }
        _ => None,
    };
    let items = expanded.unwrap_or(items);

    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
