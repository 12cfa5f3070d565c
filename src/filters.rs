//! Search predicates, filters and summary statistics for entity lists.
//!
//! Every filter returns the matching records in source order; ordering is
//! applied separately by [`crate::table`].

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{
    Business, BusinessStatus, Category, CategoryKind, Notification, NotificationStatus,
    ParseEnumError, User, UserRole,
};

/// Window within which a category counts as recently created.
pub const RECENT_CATEGORY_WINDOW: TimeDelta = TimeDelta::days(30);

/// Opening-state filter for the business list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpenFilter {
    /// Only businesses currently open.
    Open,
    /// Only businesses currently closed.
    Closed,
}

impl OpenFilter {
    /// Returns the query-string spelling.
    #[inline]
    #[must_use]
    pub const fn as_query(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }

    /// Returns `true` if a business with the given opening state passes.
    #[inline]
    #[must_use]
    pub const fn matches(self, open: bool) -> bool {
        match self {
            Self::Open => open,
            Self::Closed => !open,
        }
    }
}

impl fmt::Display for OpenFilter {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

impl FromStr for OpenFilter {
    type Err = ParseEnumError;

    /// Accepts `open`/`closed` as well as `true`/`false`.
    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" | "true" => Ok(Self::Open),
            "closed" | "false" => Ok(Self::Closed),
            _ => Err(ParseEnumError::new("open filter", s)),
        }
    }
}

/// Case-insensitive substring check against an already lowercased needle.
fn contains_lower(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Filters businesses by search text, status and opening state.
///
/// The search matches name, description or address case-insensitively; an
/// empty search matches everything.
#[must_use]
pub fn filter_businesses(
    businesses: &[Business],
    search: &str,
    status: Option<BusinessStatus>,
    open: Option<OpenFilter>,
) -> Vec<Business> {
    let needle = search.to_lowercase();
    businesses
        .iter()
        .filter(|business| {
            let matches_search = needle.is_empty()
                || contains_lower(&business.name, &needle)
                || contains_lower(&business.description, &needle)
                || business
                    .address
                    .as_deref()
                    .is_some_and(|address| contains_lower(address, &needle));
            let matches_status = status.is_none_or(|wanted| business.status == wanted);
            let matches_open = open.is_none_or(|wanted| wanted.matches(business.open));
            matches_search && matches_status && matches_open
        })
        .cloned()
        .collect()
}

/// Filters users by full name, email or phone.
#[must_use]
pub fn filter_users(users: &[User], search: &str) -> Vec<User> {
    let needle = search.to_lowercase();
    users
        .iter()
        .filter(|user| {
            needle.is_empty()
                || contains_lower(&user.full_name, &needle)
                || contains_lower(&user.email, &needle)
                || user
                    .phone
                    .as_deref()
                    .is_some_and(|phone| phone.contains(search))
        })
        .cloned()
        .collect()
}

/// Broad user search that also covers id, customer id and role.
#[must_use]
pub fn search_users(users: &[User], query: &str) -> Vec<User> {
    let needle = query.to_lowercase();
    users
        .iter()
        .filter(|user| {
            contains_lower(&user.full_name, &needle)
                || contains_lower(&user.email, &needle)
                || contains_lower(user.id.as_inner(), &needle)
                || user.phone.as_deref().is_some_and(|phone| phone.contains(query))
                || user
                    .customer_id
                    .as_deref()
                    .is_some_and(|customer| contains_lower(customer, &needle))
                || contains_lower(user.role.as_wire(), &needle)
        })
        .cloned()
        .collect()
}

/// Filters categories by trimmed query over name and id.
#[must_use]
pub fn filter_categories<K: CategoryKind>(
    categories: &[Category<K>],
    query: &str,
) -> Vec<Category<K>> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return categories.to_vec();
    }
    categories
        .iter()
        .filter(|category| {
            contains_lower(&category.name, &needle) || contains_lower(category.id.as_inner(), &needle)
        })
        .cloned()
        .collect()
}

/// Business counts per status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BusinessStats {
    /// All businesses.
    pub total: usize,
    /// Approved businesses.
    pub accepted: usize,
    /// Businesses awaiting review.
    pub pending: usize,
    /// Rejected businesses.
    pub rejected: usize,
    /// Suspended businesses.
    pub suspended: usize,
    /// Businesses currently open.
    pub open: usize,
}

impl BusinessStats {
    /// Counts the given businesses.
    #[must_use]
    pub fn from_businesses(businesses: &[Business]) -> Self {
        businesses.iter().fold(
            Self {
                total: businesses.len(),
                ..Self::default()
            },
            |mut stats, business| {
                match business.status {
                    BusinessStatus::Accepted => stats.accepted += 1,
                    BusinessStatus::Pending => stats.pending += 1,
                    BusinessStatus::Rejected => stats.rejected += 1,
                    BusinessStatus::Suspended => stats.suspended += 1,
                }
                if business.open {
                    stats.open += 1;
                }
                stats
            },
        )
    }
}

/// Role and subscription statistics over a user list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserStats {
    /// All users.
    pub total: usize,
    /// Users with the client role.
    pub clients: usize,
    /// Users with the admin role.
    pub admins: usize,
    /// Users with the partner role.
    pub partners: usize,
    /// Users with at least one subscription.
    pub with_subscriptions: usize,
    /// Users with at least one active subscription.
    pub with_active_subscriptions: usize,
    /// Users with at least one subscription holding credits.
    pub with_credits: usize,
    /// Subscriptions holding credits, across all users.
    pub subscriptions_with_credits: usize,
    /// Subscriptions across all users.
    pub total_subscriptions: usize,
}

impl UserStats {
    /// Aggregates the given users.
    #[must_use]
    pub fn from_users(users: &[User]) -> Self {
        let mut stats = Self {
            total: users.len(),
            ..Self::default()
        };
        for user in users {
            match user.role {
                UserRole::Client => stats.clients += 1,
                UserRole::Admin => stats.admins += 1,
                UserRole::Partner => stats.partners += 1,
            }
            let credited = user
                .subscriptions
                .iter()
                .filter(|sub| sub.credits_value() > 0.0)
                .count();
            if !user.subscriptions.is_empty() {
                stats.with_subscriptions += 1;
            }
            if user.active_subscriptions() > 0 {
                stats.with_active_subscriptions += 1;
            }
            if credited > 0 {
                stats.with_credits += 1;
            }
            stats.subscriptions_with_credits += credited;
            stats.total_subscriptions += user.subscriptions.len();
        }
        stats
    }

    /// Average number of subscriptions per user, `0` for an empty list.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        reason = "admin-facing user counts stay far below f64 precision"
    )]
    pub fn average_subscriptions_per_user(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.total_subscriptions as f64 / self.total as f64
        }
    }
}

/// Category counts for the category list header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategoryStats {
    /// All categories.
    pub total: usize,
    /// Categories not soft-deleted.
    pub active: usize,
    /// Active categories created within [`RECENT_CATEGORY_WINDOW`].
    pub recent: usize,
}

impl CategoryStats {
    /// Counts the given categories relative to `now`.
    #[must_use]
    pub fn from_categories<K: CategoryKind>(categories: &[Category<K>], now: DateTime<Utc>) -> Self {
        let cutoff = now - RECENT_CATEGORY_WINDOW;
        let active = categories.iter().filter(|category| category.is_active());
        Self {
            total: categories.len(),
            active: active.clone().count(),
            recent: active.filter(|category| category.created_at >= cutoff).count(),
        }
    }
}

/// Notification counts per delivery status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NotificationStats {
    /// All notifications.
    pub total: usize,
    /// Delivered notifications.
    pub sent: usize,
    /// Notifications waiting for their delivery date.
    pub scheduled: usize,
    /// Unsent drafts.
    pub draft: usize,
    /// Failed deliveries.
    pub failed: usize,
}

impl NotificationStats {
    /// Counts the given notifications.
    #[must_use]
    pub fn from_notifications(notifications: &[Notification]) -> Self {
        let mut stats = Self {
            total: notifications.len(),
            ..Self::default()
        };
        for notification in notifications {
            match notification.status {
                NotificationStatus::Sent => stats.sent += 1,
                NotificationStatus::Scheduled => stats.scheduled += 1,
                NotificationStatus::Draft => stats.draft += 1,
                NotificationStatus::Failed => stats.failed += 1,
            }
        }
        stats
    }
}
