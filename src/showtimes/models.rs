use chrono::{NaiveDate, NaiveDateTime};

pub const DEFAULT_PRICE: u32 = 12_000;
pub const PREMIUM_PRICE: u32 = 15_000;
pub const TOTAL_SEATS: u32 = 240;

/// A screen together with the theater it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub id: i64,
    pub theater_id: i64,
    pub name: String,
    pub screen_type: String,
    pub theater_name: String,
}

impl Screen {
    /// Ticket price for this screen's format.
    pub fn price(&self) -> u32 {
        match self.screen_type.as_str() {
            "IMAX" | "4DX" | "DOLBY" | "SUPER PLEX" | "MX" => PREMIUM_PRICE,
            _ => DEFAULT_PRICE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Showtime {
    /// `tmdb_<id>`
    pub movie_id: String,
    pub screen_id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub price: u32,
    pub available_seats: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenUsage {
    pub theater_name: String,
    pub screen_name: String,
    pub showtimes: usize,
}

/// Read-back of the showtime table after a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowtimeSummary {
    pub total: usize,
    /// Most scheduled first.
    pub per_movie: Vec<(String, usize)>,
    pub per_date: Vec<(NaiveDate, usize)>,
    /// Busiest screens, at most ten.
    pub top_screens: Vec<ScreenUsage>,
}
