//! Response envelopes and small request bodies.

use serde::{Deserialize, Serialize};

use super::{
    Business, BusinessDocument, BusinessStatus, Category, CategoryKind, DocumentReview,
    Notification, ResponseStatus,
};

/// Envelope wrapping every JSON response from the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Outcome flag.
    pub status: ResponseStatus,
    /// Response payload.
    pub data: T,
    /// Optional human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Payload of `GET /businesses`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BusinessList {
    /// Businesses.
    #[serde(default)]
    pub businesses: Vec<Business>,
}

/// Payload of `GET /business/documents`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessDocumentList {
    /// Documents.
    #[serde(default)]
    pub business_docs: Vec<BusinessDocument>,
}

/// Payload of the category collection endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct CategoryList<K: CategoryKind> {
    /// Categories.
    #[serde(default)]
    pub categories: Vec<Category<K>>,
}

/// Payload of `GET /notifications`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NotificationList {
    /// Notifications.
    #[serde(default)]
    pub notifications: Vec<Notification>,
}

/// Body of `PUT /business/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// Target status.
    pub status: BusinessStatus,
    /// Reason shown to the owner; required for rejection and suspension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Body of `PUT /business/document/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStatusUpdate {
    /// Review verdict.
    pub status: DocumentReview,
}
