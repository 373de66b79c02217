//! UTC timestamps for export documents.
//!
//! Uses web-time so the same code reads the clock on native and WASM.

/// A broken-down UTC instant with millisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub year: u32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millis: u32,
}

impl Timestamp {
    /// Read the current clock.
    pub fn now() -> Self {
        let since_epoch = web_time::SystemTime::now()
            .duration_since(web_time::SystemTime::UNIX_EPOCH)
            .unwrap_or_default();
        Self::from_unix_millis(since_epoch.as_millis() as u64)
    }

    /// Build from milliseconds since 1970-01-01T00:00:00Z.
    pub fn from_unix_millis(millis: u64) -> Self {
        let secs = millis / 1000;
        let days_since_epoch = secs / 86400;
        let secs_today = secs % 86400;
        let (year, month, day) = days_to_ymd(days_since_epoch);

        Self {
            year,
            month,
            day,
            hour: (secs_today / 3600) as u32,
            minute: ((secs_today % 3600) / 60) as u32,
            second: (secs_today % 60) as u32,
            millis: (millis % 1000) as u32,
        }
    }

    /// Format as `YYYY-MM-DDTHH:MM:SS.sssZ`.
    pub fn to_iso8601(&self) -> String {
        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
            self.year, self.month, self.day, self.hour, self.minute, self.second, self.millis
        )
    }
}

/// Convert days since Unix epoch to year/month/day.
fn days_to_ymd(days: u64) -> (u32, u32, u32) {
    let mut remaining_days = days as i64;
    let mut year = 1970i32;

    loop {
        let days_in_year = if is_leap_year(year) { 366 } else { 365 };
        if remaining_days < days_in_year {
            break;
        }
        remaining_days -= days_in_year;
        year += 1;
    }

    let days_in_months: [i64; 12] = if is_leap_year(year) {
        [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    } else {
        [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    };

    let mut month = 1u32;
    for &days_in_month in &days_in_months {
        if remaining_days < days_in_month {
            break;
        }
        remaining_days -= days_in_month;
        month += 1;
    }

    (year as u32, month, remaining_days as u32 + 1)
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}
