pub mod bookings;
pub mod events;

pub use bookings::BookingService;
pub use events::EventService;
