//! # Slot Search
//!
//! The core matching routine for after-hours meetings: given a teacher's
//! recurring weekly availability and the set of already-booked meeting
//! starts, find the next open slot at or after a requested instant.
//!
//! ## Algorithm
//!
//! 1. Convert the requested instant into the teacher's timezone; window
//!    boundaries are wall-clock times in that zone, so all comparisons
//!    happen there.
//! 2. Convert every booked UTC start into the teacher's zone and truncate
//!    to the minute. These local minutes are the taken slots.
//! 3. Walk day offsets `0..=search_days`. For each candidate local date,
//!    collect the weekly windows matching that date's weekday, ordered by
//!    start time ascending.
//! 4. Each window contributes one candidate: its start time on that date.
//!    A candidate is rejected if it lies strictly before the requested
//!    local instant (a candidate exactly at it is accepted), or if its
//!    minute coincides with a taken slot.
//! 5. The first surviving candidate, in day-then-window order, wins.
//!
//! Exhausting the horizon is a normal outcome (`None`), not an error.
//! Window ends never generate candidates, so a request at closing time
//! rolls over to the window's next weekly occurrence.

use std::collections::HashSet;

use chrono::{DateTime, Datelike, Duration, LocalResult, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::models::teacher::{TeacherAvailability, WeeklyWindow};

/// How many days ahead the search looks before reporting no availability.
pub const DEFAULT_SEARCH_DAYS: u32 = 14;

pub fn next_open_slot(
    availability: &TeacherAvailability,
    booked_utc: &[DateTime<Utc>],
    from: DateTime<Utc>,
    search_days: u32,
) -> Option<DateTime<Tz>> {
    if availability.weekly_windows.is_empty() {
        return None;
    }

    let tz = availability.timezone;
    let now_local = from.with_timezone(&tz);

    // Booked starts must be compared in the teacher's zone, not UTC:
    // window boundaries are defined in local wall-clock time.
    let taken: HashSet<DateTime<Tz>> = booked_utc
        .iter()
        .map(|start| truncate_to_minute(start.with_timezone(&tz)))
        .collect();

    for day_offset in 0..=i64::from(search_days) {
        let day_local = now_local + Duration::days(day_offset);
        let weekday = day_local.weekday().num_days_from_monday() as u8;

        let mut windows: Vec<&WeeklyWindow> = availability
            .weekly_windows
            .iter()
            .filter(|window| window.weekday == weekday)
            .collect();
        windows.sort_by_key(|window| window.start);

        for window in windows {
            let wall_clock = day_local.date_naive().and_time(window.start);
            let candidate = match tz.from_local_datetime(&wall_clock) {
                LocalResult::Single(dt) => dt,
                // Fall-back ambiguity resolves to the earlier offset.
                LocalResult::Ambiguous(earliest, _) => earliest,
                // The wall-clock start does not exist on this date (DST gap).
                LocalResult::None => continue,
            };

            // No scheduling into the past; a start exactly at the
            // requested instant is an acceptable match.
            if candidate < now_local {
                continue;
            }
            if taken.contains(&truncate_to_minute(candidate)) {
                continue;
            }
            return Some(candidate);
        }
    }

    None
}

fn truncate_to_minute(dt: DateTime<Tz>) -> DateTime<Tz> {
    dt.with_second(0)
        .and_then(|dt| dt.with_nanosecond(0))
        .unwrap_or(dt)
}
