//! Business and product categories.
//!
//! Both category families share one shape and one CRUD surface; a kind
//! marker type keeps them apart at compile time and supplies the endpoint
//! paths and cache key for each family.

use core::fmt;
use core::marker::PhantomData;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Marker trait implemented by the category family tags.
pub trait CategoryKind:
    fmt::Debug + Clone + Copy + PartialEq + Eq + core::hash::Hash + Send + Sync + 'static
{
    /// Path segment naming the family (`business` or `product`).
    const SLUG: &'static str;
    /// Human-readable family name.
    const LABEL: &'static str;
    /// Collection endpoint.
    const LIST_PATH: &'static str;
    /// Single-item endpoint used for create, update and delete.
    const ITEM_PATH: &'static str;
    /// Cache key of the collection query.
    const CACHE_KEY: &'static str;
}

/// Tag for categories that classify businesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BusinessKind;

impl CategoryKind for BusinessKind {
    const SLUG: &'static str = "business";
    const LABEL: &'static str = "Business category";
    const LIST_PATH: &'static str = "/business/categories";
    const ITEM_PATH: &'static str = "/business/category";
    const CACHE_KEY: &'static str = "business-categories";
}

/// Tag for categories that classify products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ProductKind;

impl CategoryKind for ProductKind {
    const SLUG: &'static str = "product";
    const LABEL: &'static str = "Product category";
    const LIST_PATH: &'static str = "/product/categories";
    const ITEM_PATH: &'static str = "/product/category";
    const CACHE_KEY: &'static str = "product-categories";
}

/// Identifier of a category of kind `K`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent, bound = "")]
pub struct CategoryId<K: CategoryKind> {
    /// Raw identifier.
    value: String,
    /// Kind tag.
    #[serde(skip)]
    kind: PhantomData<K>,
}

impl<K: CategoryKind> CategoryId<K> {
    /// Creates a new identifier from the given string.
    #[inline]
    #[must_use]
    pub const fn new(value: String) -> Self {
        Self {
            value,
            kind: PhantomData,
        }
    }

    /// Returns a reference to the inner string.
    #[inline]
    #[must_use]
    pub fn as_inner(&self) -> &str {
        &self.value
    }

    /// Consumes the wrapper and returns the inner string.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.value
    }
}

impl<K: CategoryKind> fmt::Display for CategoryId<K> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

impl<K: CategoryKind> From<&str> for CategoryId<K> {
    #[inline]
    fn from(value: &str) -> Self {
        Self::new(value.to_owned())
    }
}

impl<K: CategoryKind> From<String> for CategoryId<K> {
    #[inline]
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// A category of kind `K`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound = "")]
pub struct Category<K: CategoryKind> {
    /// Unique identifier.
    pub id: CategoryId<K>,
    /// Display name.
    pub name: String,
    /// Image URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl<K: CategoryKind> Category<K> {
    /// Returns `true` unless the backend has soft-deleted the category.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// Business category alias.
pub type BusinessCategory = Category<BusinessKind>;

/// Product category alias.
pub type ProductCategory = Category<ProductKind>;

/// Image attached to a category create or update request.
#[derive(Clone, PartialEq, Eq)]
pub struct CategoryImage {
    /// Original file name.
    pub file_name: String,
    /// MIME type, e.g. `image/png`.
    pub mime_type: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl fmt::Debug for CategoryImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CategoryImage")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl CategoryImage {
    /// Guesses the MIME type from a file extension.
    ///
    /// Returns `None` for extensions that are not accepted image formats.
    #[must_use]
    pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
        match extension.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some("image/jpeg"),
            "png" => Some("image/png"),
            "gif" => Some("image/gif"),
            "webp" => Some("image/webp"),
            _ => None,
        }
    }

    /// Returns the size of the image in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the image has no contents.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Form data for creating or updating a category.
///
/// The image is optional on update; omitting it keeps the current one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryForm {
    /// Category name.
    pub name: String,
    /// New image, if any.
    pub image: Option<CategoryImage>,
}
