mod booking_queries;
mod booking_service;
mod errors;
mod item_availability;

pub use booking_queries::{
    ListBookings, build_predicate, list_booker_bookings, list_item_bookings, list_owner_bookings,
};
pub use booking_service::{ServiceDependencies, create_booking, decide_booking, get_booking};
pub use errors::{BookingApplicationError, ErrorKind, Result};
pub use item_availability::{ItemAvailabilityView, is_user_booked_item, item_availability};
