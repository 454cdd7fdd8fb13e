use chrono::{NaiveDateTime, TimeDelta};

/// Rough, human-sized description of how long ago `then` was.
///
/// ```
/// use chrono::NaiveDate;
/// use sbpanel_core::state::time_ago;
///
/// let now = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(12, 0, 0).unwrap();
/// let then = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(9, 0, 0).unwrap();
/// assert_eq!(time_ago(then, now), "3 hours");
/// ```
pub fn time_ago(then: NaiveDateTime, now: NaiveDateTime) -> String {
    describe(now - then)
}

fn describe(elapsed: TimeDelta) -> String {
    let secs = elapsed.num_seconds().max(0);

    if secs < 60 {
        "less than a minute".to_string()
    } else if secs < 3_600 {
        plural(secs / 60, "minute")
    } else if secs < 86_400 {
        plural(secs / 3_600, "hour")
    } else {
        plural(secs / 86_400, "day")
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}
