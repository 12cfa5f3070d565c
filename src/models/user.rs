//! Platform user and subscription models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BusinessId, SubscriptionId, UserId, UserRole};

/// A platform user (client, partner or administrator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier issued by the identity provider.
    pub id: UserId,
    /// Full display name.
    pub full_name: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Platform role.
    pub role: UserRole,
    /// Payment provider customer identifier.
    #[serde(default)]
    pub customer_id: Option<String>,
    /// Subscriptions to businesses.
    #[serde(default)]
    pub subscriptions: Vec<UserSubscription>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Returns the number of active subscriptions.
    #[inline]
    #[must_use]
    pub fn active_subscriptions(&self) -> usize {
        self.subscriptions.iter().filter(|s| s.active).count()
    }

    /// Returns the sum of credits across all subscriptions.
    #[inline]
    #[must_use]
    pub fn total_credits(&self) -> f64 {
        self.subscriptions.iter().map(UserSubscription::credits_value).sum()
    }
}

/// A user's subscription to a business loyalty programme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSubscription {
    /// Unique identifier.
    pub id: SubscriptionId,
    /// Accumulated credits as a decimal string.
    pub credits: String,
    /// Whether the subscription is active.
    pub active: bool,
    /// Subscribed user.
    pub user_id: UserId,
    /// Business the subscription belongs to.
    pub business_id: BusinessId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl UserSubscription {
    /// Parses the credits string, treating malformed values as zero.
    #[inline]
    #[must_use]
    pub fn credits_value(&self) -> f64 {
        self.credits.trim().parse().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_JSON: &str = r#"{
        "id": "user_1",
        "fullName": "Ana Gómez",
        "email": "ana@example.com",
        "phone": null,
        "role": "Client",
        "customerId": "cus_123",
        "subscriptions": [
            {
                "id": "s-1",
                "credits": "12.5",
                "active": true,
                "userId": "user_1",
                "businessId": "b-1",
                "createdAt": "2025-01-10T12:00:00Z",
                "updatedAt": "2025-01-10T12:00:00Z",
                "deletedAt": null
            },
            {
                "id": "s-2",
                "credits": "oops",
                "active": false,
                "userId": "user_1",
                "businessId": "b-2",
                "createdAt": "2025-01-10T12:00:00Z",
                "updatedAt": "2025-01-10T12:00:00Z"
            }
        ],
        "createdAt": "2025-01-10T12:00:00Z",
        "updatedAt": "2025-01-10T12:00:00Z",
        "deletedAt": null
    }"#;

    #[test]
    fn deserialize_user() {
        let user: User = serde_json::from_str(USER_JSON).unwrap();
        assert_eq!(user.full_name, "Ana Gómez");
        assert_eq!(user.role, UserRole::Client);
        assert!(user.phone.is_none());
        assert_eq!(user.subscriptions.len(), 2);
    }

    #[test]
    fn subscription_aggregates() {
        let user: User = serde_json::from_str(USER_JSON).unwrap();
        assert_eq!(user.active_subscriptions(), 1);
        assert!((user.total_credits() - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn user_without_subscriptions() {
        let json = r#"{
            "id": "user_2",
            "fullName": "Admin",
            "email": "admin@example.com",
            "role": "Admin",
            "createdAt": "2025-01-10T12:00:00Z",
            "updatedAt": "2025-01-10T12:00:00Z"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert!(user.subscriptions.is_empty());
        assert!(user.customer_id.is_none());
    }
}
