//! Push notification models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use super::{NotificationId, NotificationStatus, UserId};

/// A push notification managed from the back office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique identifier.
    pub id: NotificationId,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub body: String,
    /// Opaque payload delivered with the notification.
    #[serde(default)]
    pub data: serde_json::Map<String, serde_json::Value>,
    /// Target user when sent to a single recipient.
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Audience: `"All"` or a single-user marker.
    #[serde(default)]
    pub destination: Option<String>,
    /// Scheduled delivery date; `None` means immediate delivery.
    #[serde(default)]
    pub delivery_date: Option<DateTime<Utc>>,
    /// Delivery status.
    pub status: NotificationStatus,
    /// Background job identifier.
    #[serde(default)]
    pub job_id: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Notification {
    /// Returns `true` if the notification targets every user.
    #[inline]
    #[must_use]
    pub fn is_broadcast(&self) -> bool {
        self.user_id.as_ref().is_none_or(|id| id.as_inner().is_empty())
    }
}

/// Audience of a new notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Every user on the platform.
    All,
    /// A single user.
    User(UserId),
}

impl Destination {
    /// Recipient id, or `None` for a broadcast. A blank id counts as broadcast.
    #[inline]
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        match *self {
            Self::User(ref id) if !id.as_inner().trim().is_empty() => Some(id.as_inner()),
            Self::User(_) | Self::All => None,
        }
    }

    /// Wire value: `"All"` or `"Individual"`.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        if self.user_id().is_some() {
            "Individual"
        } else {
            "All"
        }
    }
}

impl Serialize for Destination {
    #[inline]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Request body for creating a notification.
///
/// Serialization follows the backend contract: `destination` is `"All"` or
/// `"Individual"`, `userId` is sent only for a single recipient, an empty
/// user id counts as broadcast, and `deliveryDate` is always present (`null`
/// for immediate delivery).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub body: String,
    /// Audience.
    pub destination: Destination,
    /// Scheduled delivery date.
    pub delivery_date: Option<DateTime<Utc>>,
    /// Opaque payload.
    pub data: serde_json::Map<String, serde_json::Value>,
}

/// Borrowed wire form of [`NewNotification`].
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NotificationPayload<'a> {
    /// Title.
    title: &'a str,
    /// Body.
    body: &'a str,
    /// Audience.
    destination: &'a Destination,
    /// Recipient.
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<&'a str>,
    /// Delivery date or `null`.
    delivery_date: Option<DateTime<Utc>>,
    /// Payload.
    #[serde(skip_serializing_if = "serde_json::Map::is_empty")]
    data: &'a serde_json::Map<String, serde_json::Value>,
}

impl Serialize for NewNotification {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        NotificationPayload {
            title: &self.title,
            body: &self.body,
            destination: &self.destination,
            user_id: self.destination.user_id(),
            delivery_date: self.delivery_date,
            data: &self.data,
        }
        .serialize(serializer)
    }
}
