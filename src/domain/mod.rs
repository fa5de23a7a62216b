pub mod booking;
pub mod commands;
pub mod errors;
pub mod state_filter;
pub mod value_objects;

pub use errors::*;
pub use state_filter::*;
pub use value_objects::*;
