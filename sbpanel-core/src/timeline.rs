//! Absolute timestamps from time-of-day log stamps.
//!
//! Log lines only print `HH:MM:SS`. The date is known once, from the start
//! marker, and every later line is placed on the timeline by assuming the
//! file is in order: if a time-of-day lands before the last resolved
//! instant, midnight has passed and the date moves forward a day.
//!
//! A gap of a full day or more between two consecutive lines cannot be
//! detected this way.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    date: Option<NaiveDate>,
    last: Option<NaiveDateTime>,
}

impl Timeline {
    /// Current date cursor, `None` until a start marker has been seen.
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Last resolved instant.
    pub fn last(&self) -> Option<NaiveDateTime> {
        self.last
    }

    /// Re-anchor on a start marker. Returns the launch instant.
    pub fn start(&mut self, date: NaiveDate, time: NaiveTime) -> NaiveDateTime {
        let launch = date.and_time(time);
        self.date = Some(date);
        self.last = Some(launch);
        launch
    }

    /// Place a time-of-day on the timeline.
    ///
    /// Returns `None` when no start marker has anchored the date yet.
    pub fn resolve(&mut self, time: NaiveTime) -> Option<NaiveDateTime> {
        let mut date = self.date?;
        let mut candidate = date.and_time(time);

        if let Some(last) = self.last {
            while candidate < last {
                date = date.succ_opt()?;
                candidate = date.and_time(time);
            }
        }

        if Some(date) != self.date {
            tracing::debug!(%date, "day rollover");
        }

        self.date = Some(date);
        self.last = Some(candidate);
        Some(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn hms(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn unanchored_timeline_rejects_times() {
        let mut timeline = Timeline::default();

        assert_eq!(timeline.resolve(hms(12, 0, 0)), None);
        assert_eq!(timeline.date(), None);
    }

    #[test]
    fn start_sets_cursor_and_launch() {
        let mut timeline = Timeline::default();

        let launch = timeline.start(day(1), hms(23, 59, 0));

        assert_eq!(launch, day(1).and_time(hms(23, 59, 0)));
        assert_eq!(timeline.date(), Some(day(1)));
        assert_eq!(timeline.last(), Some(launch));
    }

    #[test]
    fn same_day_times_stay_on_the_cursor_date() {
        let mut timeline = Timeline::default();
        timeline.start(day(1), hms(8, 0, 0));

        let a = timeline.resolve(hms(8, 0, 0)).unwrap();
        let b = timeline.resolve(hms(9, 30, 0)).unwrap();

        assert_eq!(a, day(1).and_time(hms(8, 0, 0)));
        assert_eq!(b, day(1).and_time(hms(9, 30, 0)));
    }

    #[test]
    fn backwards_time_rolls_over_to_next_day() {
        let mut timeline = Timeline::default();
        timeline.start(day(1), hms(23, 0, 0));

        let before = timeline.resolve(hms(23, 59, 50)).unwrap();
        let after = timeline.resolve(hms(0, 0, 10)).unwrap();

        assert_eq!(after, day(2).and_time(hms(0, 0, 10)));
        assert!(after > before);
        assert_eq!(timeline.date(), Some(day(2)));
    }

    #[test]
    fn line_before_launch_time_rolls_over() {
        let mut timeline = Timeline::default();
        timeline.start(day(1), hms(23, 59, 0));

        let resolved = timeline.resolve(hms(0, 0, 5)).unwrap();

        assert_eq!(resolved, day(2).and_time(hms(0, 0, 5)));
    }

    #[test]
    fn date_cursor_never_moves_backwards_while_resolving() {
        let mut timeline = Timeline::default();
        timeline.start(day(1), hms(22, 0, 0));

        let mut previous = timeline.date().unwrap();
        for t in [hms(23, 0, 0), hms(1, 0, 0), hms(2, 0, 0), hms(0, 30, 0)] {
            timeline.resolve(t).unwrap();
            let current = timeline.date().unwrap();
            assert!(current >= previous);
            previous = current;
        }

        assert_eq!(timeline.date(), Some(day(3)));
    }

    #[test]
    fn new_start_marker_re_anchors() {
        let mut timeline = Timeline::default();
        timeline.start(day(1), hms(10, 0, 0));
        timeline.resolve(hms(9, 0, 0)).unwrap();

        timeline.start(day(5), hms(6, 0, 0));
        let resolved = timeline.resolve(hms(6, 0, 1)).unwrap();

        assert_eq!(resolved, day(5).and_time(hms(6, 0, 1)));
    }
}
