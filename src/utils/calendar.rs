use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt::Debug;

pub const DAYS_PER_WEEK: usize = 7;

/// Something that can be placed on the calendar.
pub trait CalendarEvent {
    type Key: PartialEq + Debug + Serialize;

    fn key(&self) -> Self::Key;

    /// `None` when the start cannot be read; such events land on no day.
    fn starts_at(&self) -> Option<NaiveDateTime>;
}

/// One week row, Sunday first. `None` cells pad the month on either side.
pub type Week = [Option<NaiveDate>; DAYS_PER_WEEK];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<Week>,
}

impl MonthGrid {
    pub fn leading_blanks(&self) -> usize {
        self.weeks
            .first()
            .map(|week| week.iter().take_while(|cell| cell.is_none()).count())
            .unwrap_or(0)
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.weeks.iter().flatten().filter_map(|cell| *cell)
    }
}

pub fn first_of_month(reference: NaiveDate) -> NaiveDate {
    reference - Days::new(u64::from(reference.day0()))
}

pub fn days_in_month(reference: NaiveDate) -> usize {
    let first = first_of_month(reference);
    first
        .iter_days()
        .take_while(|day| day.month() == first.month())
        .count()
}

/// Parses a `YYYY-MM` month into its first day.
pub fn parse_month(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d").ok()
}

/// Lays out the month containing `reference` as Sunday-first weeks.
pub fn month_grid(reference: NaiveDate) -> MonthGrid {
    let first = first_of_month(reference);
    let mut column = first.weekday().num_days_from_sunday() as usize;

    let mut weeks = Vec::new();
    let mut week: Week = [None; DAYS_PER_WEEK];
    for day in first.iter_days().take(days_in_month(first)) {
        week[column] = Some(day);
        column += 1;
        if column == DAYS_PER_WEEK {
            weeks.push(week);
            week = [None; DAYS_PER_WEEK];
            column = 0;
        }
    }
    if column > 0 {
        weeks.push(week);
    }

    MonthGrid {
        year: first.year(),
        month: first.month(),
        weeks,
    }
}

/// An event placed in a day cell, addressed by its key.
#[derive(Debug, Serialize)]
pub struct CalendarEntry<'a, E: CalendarEvent> {
    pub key: E::Key,
    pub starts_at: NaiveDateTime,
    pub event: &'a E,
}

/// Entries for the events starting on `day`, in input order.
pub fn entries_on<E: CalendarEvent>(events: &[E], day: NaiveDate) -> Vec<CalendarEntry<'_, E>> {
    events
        .iter()
        .filter_map(|event| {
            let starts_at = event.starts_at().filter(|start| start.date() == day)?;
            Some(CalendarEntry {
                key: event.key(),
                starts_at,
                event,
            })
        })
        .collect()
}

/// Events starting on `day`, in input order.
pub fn events_on<E: CalendarEvent>(events: &[E], day: NaiveDate) -> Vec<&E> {
    entries_on(events, day)
        .into_iter()
        .map(|entry| entry.event)
        .collect()
}

#[derive(Debug, Serialize)]
pub struct CalendarDay<'a, E: CalendarEvent> {
    pub date: NaiveDate,
    pub events: Vec<CalendarEntry<'a, E>>,
}

#[derive(Debug, Serialize)]
pub struct CalendarMonth<'a, E: CalendarEvent> {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<Vec<Option<CalendarDay<'a, E>>>>,
}

/// The grid for `reference`'s month with every event bucketed into its day.
pub fn project<E: CalendarEvent>(reference: NaiveDate, events: &[E]) -> CalendarMonth<'_, E> {
    let grid = month_grid(reference);
    let weeks = grid
        .weeks
        .iter()
        .map(|week| {
            week.iter()
                .map(|cell| {
                    cell.map(|date| CalendarDay {
                        date,
                        events: entries_on(events, date),
                    })
                })
                .collect()
        })
        .collect();

    CalendarMonth {
        year: grid.year,
        month: grid.month,
        weeks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::parse_timestamp;

    struct Shift {
        id: i64,
        start: &'static str,
    }

    impl CalendarEvent for Shift {
        type Key = i64;

        fn key(&self) -> i64 {
            self.id
        }

        fn starts_at(&self) -> Option<NaiveDateTime> {
            parse_timestamp(self.start)
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn sunday_first_month_has_no_leading_blanks() {
        // June 2025 starts on a Sunday.
        let grid = month_grid(date(2025, 6, 18));
        assert_eq!(grid.leading_blanks(), 0);
        assert_eq!(grid.weeks[0][0], Some(date(2025, 6, 1)));
        assert_eq!(grid.weeks.len(), 5);
    }

    #[test]
    fn week_count_follows_offset_and_length() {
        for (reference, offset, length) in [
            (date(2025, 2, 1), 6, 28),
            (date(2026, 2, 1), 0, 28),
            (date(2024, 2, 1), 4, 29),
            (date(2025, 3, 1), 6, 31),
            (date(2025, 12, 31), 1, 31),
        ] {
            let grid = month_grid(reference);
            assert_eq!(grid.leading_blanks(), offset);
            assert_eq!(grid.days().count(), length);
            assert_eq!(grid.weeks.len(), (offset + length).div_ceil(DAYS_PER_WEEK));
        }
    }

    #[test]
    fn last_week_is_padded_with_blanks() {
        let grid = month_grid(date(2025, 2, 14));
        let last = grid.weeks.last().unwrap();
        assert_eq!(last[0], Some(date(2025, 2, 23)));
        assert_eq!(last[6], None);
        assert_eq!(grid.days().last(), Some(date(2025, 2, 28)));
    }

    #[test]
    fn event_lands_on_its_start_day_only() {
        let events = [Shift { id: 7, start: "2025-02-10T09:00:00" }];
        let calendar = project(date(2025, 2, 1), &events);

        let placed: Vec<NaiveDate> = calendar
            .weeks
            .iter()
            .flatten()
            .flatten()
            .filter(|day| !day.events.is_empty())
            .map(|day| day.date)
            .collect();
        assert_eq!(placed, vec![date(2025, 2, 10)]);
    }

    #[test]
    fn same_day_events_keep_input_order() {
        let events = [
            Shift { id: 3, start: "2025-02-10T15:00" },
            Shift { id: 1, start: "2025-02-11T08:00" },
            Shift { id: 2, start: "2025-02-10T08:00" },
        ];
        let keys: Vec<i64> = events_on(&events, date(2025, 2, 10)).iter().map(|e| e.key()).collect();
        assert_eq!(keys, vec![3, 2]);
    }

    #[test]
    fn day_cells_address_events_by_key() {
        let events = [
            Shift { id: 4, start: "2025-02-10T09:00" },
            Shift { id: 9, start: "2025-02-10T13:30" },
        ];
        let calendar = project(date(2025, 2, 1), &events);
        let day = calendar
            .weeks
            .iter()
            .flatten()
            .flatten()
            .find(|day| day.date == date(2025, 2, 10))
            .unwrap();

        let keys: Vec<i64> = day.events.iter().map(|entry| entry.key).collect();
        assert_eq!(keys, vec![4, 9]);
        assert_eq!(day.events[1].starts_at, parse_timestamp("2025-02-10T13:30").unwrap());
    }

    #[test]
    fn events_from_other_months_and_bad_starts_are_dropped() {
        let events = [
            Shift { id: 1, start: "2025-03-10T09:00" },
            Shift { id: 2, start: "garbage" },
        ];
        let calendar = project(date(2025, 2, 1), &events);
        assert!(calendar.weeks.iter().flatten().flatten().all(|day| day.events.is_empty()));
    }

    #[test]
    fn parses_year_month() {
        assert_eq!(parse_month("2025-02"), Some(date(2025, 2, 1)));
        assert_eq!(parse_month("2025-13"), None);
    }
}
