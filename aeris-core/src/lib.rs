pub mod credentials;
pub mod models;
pub mod ranking;
pub mod retry;

pub use models::{Flight, Itinerary, Reservation, User};
pub use retry::RetryPolicy;
