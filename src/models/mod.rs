pub mod booking;
pub mod event;
pub mod normalize;

pub use booking::{Booking, CreateBooking};
pub use event::{CreateEvent, Event, EventMode, UpdateEvent};
