pub mod booking_repository;
pub mod event_repository;

pub use booking_repository::BookingRepository;
pub use event_repository::EventRepository;

/// True when `err` wraps a Postgres unique-constraint violation.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|e| e.is_unique_violation())
}

/// True when `err` wraps a Postgres foreign-key violation.
pub fn is_foreign_key_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|e| e.is_foreign_key_violation())
}
