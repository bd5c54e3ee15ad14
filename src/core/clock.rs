use chrono::{DateTime, TimeZone};

/// Dashboard clock line, e.g. `🕒 14:03:09 Saturday 17 Oct 2026`.
pub fn clock_line<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("🕒 %H:%M:%S %A %d %b %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_clock_line_format() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 9, 5, 3).unwrap();
        assert_eq!(clock_line(&now), "🕒 09:05:03 Saturday 17 Oct 2026");
    }
}
