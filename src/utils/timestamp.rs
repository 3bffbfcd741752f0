use chrono::{DateTime, Utc};

const TIMESTAMP_FORMAT: &str = "%d_%b_%Y_%H_%M_%S-UTC";

/// Current time as a UTC timestamp string, e.g. `18_Oct_2026_04_00_12-UTC`.
pub fn current_datetime_str() -> String {
    format_datetime(Utc::now())
}

pub fn format_datetime(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_datetime() {
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(format_datetime(at), "07_Mar_2024_09_05_01-UTC");
    }
}
