//! Date and time helpers.
//!
//! Export files carry epoch seconds; session files carry RFC 3339 strings
//! with an explicit `+00:00` offset. Everything in memory is `DateTime<Utc>`.

use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// Convert epoch seconds (possibly fractional) into a UTC instant.
///
/// Returns `None` for values chrono cannot represent or that are not finite.
#[must_use]
pub fn from_epoch_seconds(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.floor();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let nanos = ((seconds - whole) * 1_000_000_000.0).round() as u32;
    #[allow(clippy::cast_possible_truncation)]
    let secs = whole as i64;
    DateTime::from_timestamp(secs, nanos.min(999_999_999))
}

/// Format an instant as RFC 3339 with a `+00:00` offset.
///
/// Sub-second digits are kept only when present, so a value written and
/// read back compares equal.
#[must_use]
pub fn to_rfc3339(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

/// Parse an RFC 3339 timestamp with any offset, normalized to UTC.
#[must_use]
pub fn parse_rfc3339(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Short human-readable age, e.g. `3d ago`, `5m ago`, `just now`.
#[must_use]
pub fn format_age(now: DateTime<Utc>, then: DateTime<Utc>) -> String {
    let elapsed = now - then;
    if elapsed < Duration::seconds(10) {
        return "just now".to_string();
    }
    if elapsed < Duration::minutes(1) {
        return format!("{}s ago", elapsed.num_seconds());
    }
    if elapsed < Duration::hours(1) {
        return format!("{}m ago", elapsed.num_minutes());
    }
    if elapsed < Duration::days(1) {
        return format!("{}h ago", elapsed.num_hours());
    }
    if elapsed < Duration::days(365) {
        return format!("{}d ago", elapsed.num_days());
    }
    format!("{}y ago", elapsed.num_days() / 365)
}

/// Serde adapter for required RFC 3339 timestamps.
pub mod rfc3339 {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    /// Serialize as RFC 3339.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_rfc3339(dt))
    }

    /// Deserialize from an RFC 3339 string.
    ///
    /// # Errors
    ///
    /// Fails if the value is not a string or not a valid timestamp.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_rfc3339(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw:?}")))
    }
}

/// Serde adapter for optional RFC 3339 timestamps.
///
/// `None` is written as an explicit `null`. An empty string is rejected
/// rather than read as `None`.
pub mod rfc3339_option {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    /// Serialize as RFC 3339 or `null`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        dt: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match dt {
            Some(dt) => serializer.serialize_str(&super::to_rfc3339(dt)),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize from an RFC 3339 string or `null`.
    ///
    /// # Errors
    ///
    /// Fails if the value is neither `null` nor a valid timestamp string.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|s| {
            super::parse_rfc3339(&s)
                .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {s:?}")))
        })
        .transpose()
    }
}
