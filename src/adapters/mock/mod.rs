pub mod clock;
pub mod item_directory;
pub mod user_directory;

pub use clock::Clock as FixedClock;
pub use item_directory::ItemDirectory;
pub use user_directory::UserDirectory;
