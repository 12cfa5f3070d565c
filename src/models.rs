//! Data models for marketplace API entities.
//!
//! This module contains strongly-typed representations of the entities the
//! back office manages, the response envelopes the API wraps them in,
//! newtype ID wrappers, and enumeration types for constrained values.

mod business;
mod category;
mod envelope;
mod enums;
#[cfg(test)]
pub(crate) mod fixtures;
mod ids;
mod notification;
mod points;
mod user;

pub use business::{Business, BusinessDocument};
pub use category::{
    BusinessCategory, BusinessKind, Category, CategoryForm, CategoryId, CategoryImage,
    CategoryKind, ProductCategory, ProductKind,
};
pub use envelope::{
    ApiResponse, BusinessDocumentList, BusinessList, CategoryList, DocumentStatusUpdate,
    NotificationList, StatusUpdate,
};
pub use enums::{
    BusinessStatus, DocumentKind, DocumentReview, NotificationStatus, ParseEnumError,
    ResponseStatus, StatusAction, UserRole,
};
pub use ids::{BusinessId, DocumentId, NotificationId, SubscriptionId, UserId};
pub use notification::{Destination, NewNotification, Notification};
pub use points::{CREDITS_COST, PointsConfig};
pub use user::{User, UserSubscription};
