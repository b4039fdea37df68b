//! Showtime generation for the movies currently in theaters.

mod generator;
mod job;
mod models;
mod store;

pub use generator::{ShowtimeGenerator, CLEANING_MINUTES, DEFAULT_RUNTIME_MINUTES, TIME_SLOTS};
pub use job::ShowtimeJob;
pub use models::*;
pub use store::SqliteShowtimeStore;
