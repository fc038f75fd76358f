#![allow(dead_code)]

use eventhub::db::ConnectionManager;
use eventhub::models::{CreateEvent, Event};
use eventhub::services::EventService;

pub fn sample_event(title: &str) -> CreateEvent {
    CreateEvent {
        title: title.to_string(),
        description: "A full day of talks and workshops. ".repeat(30),
        overview: "Hands-on sessions for builders. ".repeat(20),
        image: "/images/event1.png".to_string(),
        venue: "Javits Center".to_string(),
        location: "New York, NY".to_string(),
        date: "September 15, 2024".to_string(),
        time: "10:00 AM".to_string(),
        mode: "Offline".to_string(),
        audience: "Developers".to_string(),
        agenda: vec!["Opening keynote".to_string(), "Hacking".to_string()],
        organizer: "Hack NYC".to_string(),
        tags: vec!["hackathon".to_string(), "web".to_string()],
    }
}

pub async fn seed_event(db: &ConnectionManager, title: &str) -> Event {
    EventService::new(db)
        .create_event(sample_event(title))
        .await
        .unwrap()
}
