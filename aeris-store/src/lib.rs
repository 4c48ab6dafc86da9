pub mod app_config;
pub mod database;
pub mod error;
pub mod flights;
pub mod reservations;
pub mod users;

pub use database::StoreClient;
pub use error::StoreError;
