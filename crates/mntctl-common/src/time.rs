use std::time::Duration;

use chrono::{DateTime, Utc};

const UNIT_SECONDS: [u64; 6] = [31_557_600, 2_630_016, 86_400, 3_600, 60, 1];

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Renders `dt` relative to `now`, truncated to its most significant unit.
pub fn naturaltime(dt: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(*dt);
    let seconds = delta.num_seconds().unsigned_abs();
    if seconds == 0 {
        return "now".to_string();
    }

    let coarse = humantime::format_duration(Duration::from_secs(truncate_to_unit(seconds)));
    if delta.num_seconds() > 0 {
        format!("{coarse} ago")
    } else {
        format!("in {coarse}")
    }
}

/// Absolute timestamp followed by the relative suffix, e.g. `2024-01-01 10:00:00 UTC (2h ago)`.
pub fn format_with_relative(dt: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    format!("{} ({})", format_timestamp(dt), naturaltime(dt, now))
}

fn truncate_to_unit(seconds: u64) -> u64 {
    UNIT_SECONDS
        .iter()
        .find(|unit| seconds >= **unit)
        .map(|unit| seconds - seconds % unit)
        .unwrap_or(seconds)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::{format_timestamp, format_with_relative, naturaltime};

    #[test]
    fn past_and_future_are_distinguished() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        assert_eq!(naturaltime(&(now - Duration::hours(2)), &now), "2h ago");
        assert_eq!(naturaltime(&(now + Duration::days(3)), &now), "in 3days");
        assert_eq!(naturaltime(&now, &now), "now");
    }

    #[test]
    fn keeps_only_most_significant_unit() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let then = now - Duration::hours(5) - Duration::minutes(42) - Duration::seconds(7);

        assert_eq!(naturaltime(&then, &now), "5h ago");
    }

    #[test]
    fn relative_suffix_follows_timestamp() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let then = now - Duration::minutes(10);

        assert_eq!(format_timestamp(&then), "2024-03-01 11:50:00 UTC");
        assert_eq!(
            format_with_relative(&then, &now),
            "2024-03-01 11:50:00 UTC (10m ago)"
        );
    }
}
