pub mod database;
pub mod providers;

pub use database::Database;
