mod view_tests;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

pub(crate) fn at(d: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, d)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

pub(crate) fn hms(h: u32, m: u32, s: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(h, m, s)
}
