//! Builders for test data shared across module tests.

use chrono::{DateTime, TimeZone, Utc};

use super::{
    Business, BusinessId, BusinessStatus, Category, CategoryKind, Notification, NotificationId,
    NotificationStatus, User, UserId, UserRole,
};

pub(crate) fn timestamp(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, day, 12, 0, 0).unwrap()
}

pub(crate) fn business(id: &str, name: &str, status: BusinessStatus, open: bool) -> Business {
    Business {
        id: BusinessId::from(id),
        name: name.to_owned(),
        description: format!("{name} description"),
        logo: None,
        banner: None,
        phone: None,
        address: Some(format!("{name} street 1")),
        longitude: None,
        latitude: None,
        status,
        open,
        working_time: None,
        rating: None,
        avg_preparation_time: None,
        recent_order_count: None,
        user_id: UserId::from("owner"),
        category_id: None,
        created_at: timestamp(1),
        updated_at: timestamp(1),
        deleted_at: None,
    }
}

pub(crate) fn user(id: &str, full_name: &str, email: &str, role: UserRole) -> User {
    User {
        id: UserId::from(id),
        full_name: full_name.to_owned(),
        email: email.to_owned(),
        phone: None,
        role,
        customer_id: None,
        subscriptions: Vec::new(),
        created_at: timestamp(1),
        updated_at: timestamp(1),
        deleted_at: None,
    }
}

pub(crate) fn category<K: CategoryKind>(id: &str, name: &str) -> Category<K> {
    Category {
        id: id.into(),
        name: name.to_owned(),
        image: None,
        created_at: timestamp(1),
        updated_at: timestamp(1),
        deleted_at: None,
    }
}

pub(crate) fn notification(
    id: &str,
    status: NotificationStatus,
    delivery_date: Option<DateTime<Utc>>,
) -> Notification {
    Notification {
        id: NotificationId::from(id),
        title: format!("Title {id}"),
        body: "Body".to_owned(),
        data: serde_json::Map::new(),
        user_id: None,
        destination: Some("All".to_owned()),
        delivery_date,
        status,
        job_id: None,
        created_at: timestamp(1),
        updated_at: timestamp(1),
    }
}
