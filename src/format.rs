//! Display copy shared by the list views: relative times, dates and
//! notification delivery descriptions.

use chrono::{DateTime, Utc};

use crate::models::Notification;

/// Characters of an id kept by [`short_id`].
pub const SHORT_ID_LEN: usize = 8;

/// Copy for a notification without a delivery date.
pub const IMMEDIATE_DELIVERY: &str = "sends immediately";

/// Pluralises `unit` for `count`.
fn ago(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

/// Describes how long ago `then` was, relative to `now`.
///
/// Months are 30 days and years 365 days. Future instants read as
/// "just now".
#[must_use]
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "just now".to_owned()
    } else if minutes < 60 {
        ago(minutes, "minute")
    } else if hours < 24 {
        ago(hours, "hour")
    } else if days < 30 {
        ago(days, "day")
    } else if days.div_euclid(30) < 12 {
        ago(days.div_euclid(30), "month")
    } else {
        ago(days.div_euclid(365), "year")
    }
}

/// Formats a timestamp as `YYYY-MM-DD HH:MM` (UTC).
#[inline]
#[must_use]
pub fn date_time(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M").to_string()
}

/// Formats a timestamp as `YYYY-MM-DD` (UTC).
#[inline]
#[must_use]
pub fn date(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d").to_string()
}

/// Abbreviates an id to its first [`SHORT_ID_LEN`] characters.
#[must_use]
pub fn short_id(id: &str) -> String {
    if id.chars().count() <= SHORT_ID_LEN {
        id.to_owned()
    } else {
        let mut short: String = id.chars().take(SHORT_ID_LEN).collect();
        short.push_str("...");
        short
    }
}

/// Describes when a notification is delivered.
///
/// No delivery date means immediate delivery; a future date is scheduled;
/// a past date has been sent.
#[must_use]
pub fn delivery_copy(delivery_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    match delivery_date {
        None => IMMEDIATE_DELIVERY.to_owned(),
        Some(when) if when > now => format!("Scheduled for {}", date_time(when)),
        Some(when) => format!("Sent {}", relative_time(when, now)),
    }
}

/// Describes a notification's audience.
#[inline]
#[must_use]
pub fn recipient_copy(notification: &Notification) -> &'static str {
    if notification.is_broadcast() {
        "All users"
    } else {
        "Specific user"
    }
}
