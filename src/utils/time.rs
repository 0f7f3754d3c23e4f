use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// How long a story stays visible after it is posted.
pub const STORY_TTL_HOURS: i64 = 24;

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// `2026-01-01T00:00:00.000Z`
pub fn to_iso(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Inverse of [`to_iso`]; accepts any RFC 3339 offset and normalizes to UTC.
pub fn parse_iso(s: &str) -> anyhow::Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc))
}

pub fn story_expiry(created_at: DateTime<Utc>) -> DateTime<Utc> {
    created_at + Duration::hours(STORY_TTL_HOURS)
}
