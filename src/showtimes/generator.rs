//! Random weekly timetable for the movies currently showing.

use super::models::{Screen, Showtime, TOTAL_SEATS};
use crate::document_store::NowPlayingMovie;
use chrono::{Duration, NaiveDate, NaiveTime};
use rand::seq::IndexedRandom;
use rand::Rng;

/// Start times offered every day.
pub const TIME_SLOTS: [(u32, u32); 10] = [
    (9, 0),
    (10, 30),
    (12, 0),
    (13, 30),
    (15, 0),
    (16, 30),
    (18, 0),
    (19, 30),
    (21, 0),
    (22, 30),
];

/// Used when a movie has no runtime on record.
pub const DEFAULT_RUNTIME_MINUTES: u32 = 120;
/// Time between two showings for cleaning.
pub const CLEANING_MINUTES: u32 = 30;

const SCREENS_PER_MOVIE: std::ops::RangeInclusive<usize> = 3..=8;
const SLOTS_PER_DAY: std::ops::RangeInclusive<usize> = 2..=4;

pub struct ShowtimeGenerator {
    start_date: NaiveDate,
    days: u32,
}

impl ShowtimeGenerator {
    pub fn new(start_date: NaiveDate, days: u32) -> Self {
        Self { start_date, days }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Last day that gets showtimes.
    pub fn end_date(&self) -> NaiveDate {
        self.start_date + Duration::days(i64::from(self.days.saturating_sub(1)))
    }

    /// Spread every movie over a random set of screens for each day.
    ///
    /// Each movie gets 3 to 8 distinct screens (fewer if fewer exist), and each
    /// of those screens gets 2 to 4 distinct slots per day.
    pub fn generate<R: Rng>(
        &self,
        movies: &[NowPlayingMovie],
        screens: &[Screen],
        rng: &mut R,
    ) -> Vec<Showtime> {
        let mut showtimes = Vec::new();
        if screens.is_empty() {
            return showtimes;
        }

        for movie in movies {
            let movie_id = format!("tmdb_{}", movie.id);
            let runtime = match movie.runtime {
                Some(minutes) if minutes > 0 => minutes,
                _ => DEFAULT_RUNTIME_MINUTES,
            };
            let length = Duration::minutes(i64::from(runtime + CLEANING_MINUTES));

            let screen_count = rng.random_range(SCREENS_PER_MOVIE).min(screens.len());
            for screen in screens.choose_multiple(rng, screen_count) {
                let price = screen.price();

                for day in 0..self.days {
                    let date = self.start_date + Duration::days(i64::from(day));
                    let slot_count = rng.random_range(SLOTS_PER_DAY);

                    for &(hour, minute) in TIME_SLOTS.choose_multiple(rng, slot_count) {
                        let Some(time) = NaiveTime::from_hms_opt(hour, minute, 0) else {
                            continue;
                        };
                        let start_time = date.and_time(time);
                        showtimes.push(Showtime {
                            movie_id: movie_id.clone(),
                            screen_id: screen.id,
                            start_time,
                            end_time: start_time + length,
                            price,
                            available_seats: TOTAL_SEATS,
                        });
                    }
                }
            }
        }

        showtimes
    }
}
