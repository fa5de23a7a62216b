pub mod booking_store;
pub mod clock;
pub mod item_directory;
pub mod user_directory;

pub use booking_store::{
    BookingClause, BookingPredicate, BookingSort, BookingStore, BookingStoreError,
    BookingSubject, InvalidPage, PageRequest,
};
pub use clock::{Clock, SystemClock};
pub use item_directory::{Item, ItemDirectory};
pub use user_directory::{User, UserDirectory};
