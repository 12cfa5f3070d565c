//! Business and business document models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BusinessId, BusinessKind, BusinessStatus, CategoryId, DocumentId, DocumentKind, UserId};

/// A business (merchant storefront) registered on the marketplace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    /// Unique identifier.
    pub id: BusinessId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Logo image URL.
    #[serde(default)]
    pub logo: Option<String>,
    /// Banner image URL.
    #[serde(default)]
    pub banner: Option<String>,
    /// Contact phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Street address.
    #[serde(default)]
    pub address: Option<String>,
    /// Longitude of the storefront.
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Latitude of the storefront.
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Review status.
    pub status: BusinessStatus,
    /// Whether the business is currently open for orders.
    #[serde(default)]
    pub open: bool,
    /// Opening hours, kept as the backend sends them.
    #[serde(default)]
    pub working_time: Option<serde_json::Value>,
    /// Average customer rating.
    #[serde(default)]
    pub rating: Option<f64>,
    /// Average order preparation time in minutes.
    #[serde(default)]
    pub avg_preparation_time: Option<f64>,
    /// Number of recent orders.
    #[serde(default)]
    pub recent_order_count: Option<u64>,
    /// Owner (partner) user identifier.
    pub user_id: UserId,
    /// Business category identifier.
    #[serde(default)]
    pub category_id: Option<CategoryId<BusinessKind>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Business {
    /// Returns `true` if the backend has soft-deleted this business.
    #[inline]
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// A legal document uploaded by a business during onboarding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessDocument {
    /// Unique identifier.
    pub id: DocumentId,
    /// Document type.
    pub name: DocumentKind,
    /// Download URL.
    pub url: String,
    /// Owning business.
    pub business_id: BusinessId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_business() {
        let json = r#"{
            "id": "b-1",
            "name": "Café Central",
            "description": "Coffee and pastries",
            "logo": "https://cdn.example.com/logo.png",
            "banner": null,
            "phone": "+57 300 000 0000",
            "address": "Calle 10 # 5-20",
            "longitude": -74.08,
            "latitude": 4.6,
            "status": "Acepted",
            "open": true,
            "rating": null,
            "avgPreparationTime": 15,
            "recentOrderCount": null,
            "userId": "user_1",
            "categoryId": "cat-1",
            "createdAt": "2025-01-10T12:00:00Z",
            "updatedAt": "2025-01-11T12:00:00Z",
            "deletedAt": null
        }"#;
        let business: Business = serde_json::from_str(json).unwrap();
        assert_eq!(business.id, BusinessId::new("b-1".to_owned()));
        assert_eq!(business.status, BusinessStatus::Accepted);
        assert!(business.open);
        assert!(business.rating.is_none());
        assert_eq!(business.avg_preparation_time, Some(15.0));
        assert_eq!(
            business.category_id.as_ref().map(CategoryId::as_inner),
            Some("cat-1")
        );
        assert!(!business.is_deleted());
    }

    #[test]
    fn deserialize_business_with_missing_optionals() {
        let json = r#"{
            "id": "b-2",
            "name": "Minimal",
            "status": "Pending",
            "userId": "user_2",
            "createdAt": "2025-01-10T12:00:00Z",
            "updatedAt": "2025-01-10T12:00:00Z",
            "deletedAt": "2025-02-01T00:00:00Z"
        }"#;
        let business: Business = serde_json::from_str(json).unwrap();
        assert_eq!(business.description, "");
        assert!(!business.open);
        assert!(business.category_id.is_none());
        assert!(business.is_deleted());
    }

    #[test]
    fn deserialize_document() {
        let json = r#"{
            "id": "d-1",
            "name": "constitutiveAct",
            "url": "https://cdn.example.com/act.pdf",
            "businessId": "b-1",
            "createdAt": "2025-01-10T12:00:00Z",
            "updatedAt": "2025-01-10T12:00:00Z",
            "deletedAt": null
        }"#;
        let doc: BusinessDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.name, DocumentKind::ConstitutiveAct);
        assert_eq!(doc.business_id.as_inner(), "b-1");
    }
}
