use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::{error, warn};

use crate::error::Error;
use crate::models::Event;
use crate::services::{BookingService, EventService};

use super::AppState;

const PAGE_STYLE: &str = r#"
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Helvetica Neue', Arial, sans-serif;
            background: #f5f7fa;
            color: #1a202c;
            padding: 24px;
        }
        #event { max-width: 1100px; margin: 0 auto; }
        .header { margin-bottom: 24px; }
        h1 { font-size: 28px; font-weight: 600; letter-spacing: -0.025em; }
        h2 { font-size: 18px; font-weight: 600; margin-bottom: 8px; }
        .details { display: flex; gap: 32px; align-items: flex-start; }
        .content { flex: 2; display: flex; flex-direction: column; gap: 24px; }
        .banner { width: 100%; border-radius: 8px; }
        .detail-item { color: #4a5568; font-size: 14px; }
        .agenda ul { padding-left: 20px; }
        .tags { display: flex; flex-wrap: wrap; gap: 6px; }
        .pill { background: #edf2f7; border-radius: 999px; padding: 4px 12px; font-size: 13px; }
        .booking {
            flex: 1;
            background: white;
            border: 1px solid #e2e8f0;
            border-radius: 8px;
            padding: 24px;
        }
        .booking form { display: flex; flex-direction: column; gap: 12px; margin-top: 12px; }
        .booking input, .booking button { padding: 8px 12px; border-radius: 6px; font-size: 14px; }
        .booking input { border: 1px solid #cbd5e0; }
        .booking button { border: none; background: #2d3748; color: white; cursor: pointer; }
"#;

const BOOKING_SCRIPT: &str = r#"
        document.getElementById('book-event').addEventListener('submit', async (e) => {
            e.preventDefault();
            const form = e.target;
            const status = document.getElementById('booking-status');
            const res = await fetch('/bookings', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({ eventId: form.dataset.eventId, email: form.email.value })
            });
            const body = await res.json();
            status.textContent = body.success ? 'Thank you for booking your spot!' : (body.message || 'Booking failed');
        });
"#;

pub async fn event_page(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let event = match EventService::new(&state.db).lookup_by_slug(&slug).await {
        Ok(Some(event)) => event,
        Ok(None) | Err(Error::Validation(_)) => {
            return (StatusCode::NOT_FOUND, Html(not_found_page())).into_response();
        }
        Err(e) => {
            error!("Failed to render event page for '{}': {:#}", slug, e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(message_page("Something went wrong", "Please try again later.")),
            )
                .into_response();
        }
    };

    let bookings = match BookingService::new(&state.db).count_for_event(event.id).await {
        Ok(count) => count,
        Err(e) => {
            warn!("Failed to count bookings for event {}: {:#}", event.id, e);
            0
        }
    };

    Html(render_event_page(&event, bookings, &state.settings.base_url)).into_response()
}

pub fn render_event_page(event: &Event, bookings: i64, base_url: &str) -> String {
    let canonical = format!("{}/events/{}/view", base_url, event.slug);
    let image = absolute_url(&event.image, base_url);

    let agenda: String = event
        .agenda
        .iter()
        .map(|item| format!("<li>{}</li>", escape_html(item)))
        .collect();
    let tags: String = event
        .tags
        .iter()
        .map(|tag| format!(r#"<div class="pill">{}</div>"#, escape_html(tag)))
        .collect();

    let booked = match bookings {
        0 => "Be the first to book your spot!".to_string(),
        1 => "Join 1 person who has already booked their spot!".to_string(),
        n => format!("Join {} people who have already booked their spot!", n),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="canonical" href="{canonical}">
    <style>{style}</style>
</head>
<body>
<section id="event">
    <div class="header">
        <h1>{title}</h1>
        <p>{description}</p>
    </div>
    <div class="details">
        <div class="content">
            <img src="{image}" alt="Event Banner" class="banner">
            <section>
                <h2>Overview</h2>
                <p>{overview}</p>
            </section>
            <section>
                <h2>Event Details</h2>
                <p class="detail-item">Date: {date}</p>
                <p class="detail-item">Time: {time}</p>
                <p class="detail-item">Venue: {venue}, {location}</p>
                <p class="detail-item">Mode: {mode}</p>
                <p class="detail-item">Audience: {audience}</p>
            </section>
            <div class="agenda">
                <h2>Agenda</h2>
                <ul>{agenda}</ul>
            </div>
            <section>
                <h2>About the Organizer</h2>
                <p>{organizer}</p>
            </section>
            <div class="tags">{tags}</div>
        </div>
        <aside class="booking">
            <h2>Book Event</h2>
            <p>{booked}</p>
            <form id="book-event" data-event-id="{id}">
                <input type="email" name="email" placeholder="Enter your email address" required>
                <button type="submit">Submit</button>
            </form>
            <p id="booking-status"></p>
        </aside>
    </div>
</section>
<script>{script}</script>
</body>
</html>"#,
        title = escape_html(&event.title),
        canonical = escape_html(&canonical),
        style = PAGE_STYLE,
        description = escape_html(&event.description),
        image = escape_html(&image),
        overview = escape_html(&event.overview),
        date = escape_html(&event.date),
        time = escape_html(&event.time),
        venue = escape_html(&event.venue),
        location = escape_html(&event.location),
        mode = event.mode.as_str(),
        audience = escape_html(&event.audience),
        agenda = agenda,
        organizer = escape_html(&event.organizer),
        tags = tags,
        booked = booked,
        id = event.id,
        script = BOOKING_SCRIPT,
    )
}

fn not_found_page() -> String {
    message_page("Event not found", "The event you are looking for does not exist.")
}

fn message_page(heading: &str, detail: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{heading}</title>
    <style>{style}</style>
</head>
<body>
<section id="event">
    <div class="header">
        <h1>{heading}</h1>
        <p>{detail}</p>
    </div>
</section>
</body>
</html>"#,
        heading = escape_html(heading),
        detail = escape_html(detail),
        style = PAGE_STYLE,
    )
}

/// Site-relative paths are resolved against the public base URL.
fn absolute_url(path: &str, base_url: &str) -> String {
    if path.starts_with('/') && !path.starts_with("//") {
        format!("{}{}", base_url, path)
    } else {
        path.to_string()
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
