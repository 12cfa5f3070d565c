//! Client-side form validation.
//!
//! Every check runs before a request is built; failures are reported per
//! field and never reach the server.

use core::fmt;

use crate::models::{CategoryForm, CategoryImage, NewNotification, StatusAction};

/// Minimum category name length after trimming.
pub const MIN_CATEGORY_NAME_LEN: usize = 2;

/// Maximum accepted image size (5 MiB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// MIME types accepted for category images.
pub const ALLOWED_IMAGE_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// A single failed field check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Form field name.
    pub field: &'static str,
    /// User-facing message.
    pub message: &'static str,
}

/// The failed checks of one form submission, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    /// Creates an empty error set.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Records a failure for `field`.
    #[inline]
    pub fn push(&mut self, field: &'static str, message: &'static str) {
        self.0.push(FieldError { field, message });
    }

    /// Records the outcome of a single-field check.
    #[inline]
    pub fn check(&mut self, field: &'static str, result: Result<(), &'static str>) {
        if let Err(message) = result {
            self.push(field, message);
        }
    }

    /// Returns the message recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message)
    }

    /// Returns `true` if no check failed.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of failed checks.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the failed checks.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    /// Converts the set into a `Result`, `Ok` when empty.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one check failed.
    #[inline]
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = core::slice::Iter<'a, FieldError>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ── Single-field checks ─────────────────────────────────────────────────

/// Validate that a free-text field is not blank.
///
/// # Errors
///
/// Returns a message when `value` is empty after trimming.
#[inline]
pub fn validate_required(value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err("This field is required");
    }
    Ok(())
}

/// Validate a category name (required, at least two characters).
///
/// # Errors
///
/// Returns a message when the trimmed name is empty or too short.
pub fn validate_category_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name is required");
    }
    if trimmed.chars().count() < MIN_CATEGORY_NAME_LEN {
        return Err("Name must be at least 2 characters");
    }
    Ok(())
}

/// Validate a category image's type and size.
///
/// # Errors
///
/// Returns a message when the image is missing but required, has a MIME
/// type outside [`ALLOWED_IMAGE_TYPES`], or exceeds [`MAX_IMAGE_BYTES`].
pub fn validate_category_image(
    image: Option<&CategoryImage>,
    required: bool,
) -> Result<(), &'static str> {
    let Some(image) = image else {
        return if required {
            Err("Image is required")
        } else {
            Ok(())
        };
    };
    let mime = image.mime_type.to_ascii_lowercase();
    if !ALLOWED_IMAGE_TYPES.contains(&mime.as_str()) {
        return Err("Image must be JPEG, PNG, GIF or WebP");
    }
    if image.len() > MAX_IMAGE_BYTES {
        return Err("Image must not exceed 5 MB");
    }
    Ok(())
}

/// Parse the pesos-per-point value entered in the points form.
///
/// # Errors
///
/// Returns a message when the value is not a finite number greater than zero.
pub fn parse_points_value(value: &str) -> Result<f64, &'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("Value is required");
    }
    match trimmed.parse::<f64>() {
        Ok(rate) if rate.is_finite() && rate > 0.0 => Ok(rate),
        Ok(_) => Err("Value must be greater than 0"),
        Err(_) => Err("Value must be a number"),
    }
}

// ── Form checks ─────────────────────────────────────────────────────────

/// Validate a category form; the image is mandatory only when creating.
///
/// # Errors
///
/// Returns every failed field check.
pub fn validate_category_form(form: &CategoryForm, creating: bool) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    errors.check("name", validate_category_name(&form.name));
    errors.check(
        "image",
        validate_category_image(form.image.as_ref(), creating),
    );
    errors.into_result()
}

/// Validate a new notification (title and body required).
///
/// # Errors
///
/// Returns every failed field check.
pub fn validate_notification(notification: &NewNotification) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    errors.check("title", validate_required(&notification.title));
    errors.check("body", validate_required(&notification.body));
    errors.into_result()
}

/// Validate the reason attached to a business status change.
///
/// # Errors
///
/// Returns a `reason` error when the action needs one and none was given.
pub fn validate_status_reason(
    action: StatusAction,
    reason: Option<&str>,
) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if action.requires_reason() {
        errors.check("reason", validate_required(reason.unwrap_or_default()));
    }
    errors.into_result()
}

/// Validate the points form, returning the parsed rate.
///
/// # Errors
///
/// Returns a `value` error when the rate is not a positive number.
pub fn validate_points_form(value: &str) -> Result<f64, FieldErrors> {
    parse_points_value(value).map_err(|message| {
        let mut errors = FieldErrors::new();
        errors.push("value", message);
        errors
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Destination;

    fn image(mime: &str, len: usize) -> CategoryImage {
        CategoryImage {
            file_name: "image".to_owned(),
            mime_type: mime.to_owned(),
            bytes: vec![0; len],
        }
    }

    #[test]
    fn category_name_rules() {
        assert!(validate_category_name("").is_err());
        assert!(validate_category_name("   ").is_err());
        assert!(validate_category_name(" a ").is_err());
        assert!(validate_category_name("ab").is_ok());
        assert!(validate_category_name("  Bakery ").is_ok());
    }

    #[test]
    fn image_rules() {
        assert_eq!(validate_category_image(None, true), Err("Image is required"));
        assert!(validate_category_image(None, false).is_ok());
        assert!(validate_category_image(Some(&image("image/png", 10)), true).is_ok());
        assert!(validate_category_image(Some(&image("image/JPG", 10)), true).is_ok());
        assert!(validate_category_image(Some(&image("image/svg+xml", 10)), true).is_err());
        assert!(validate_category_image(Some(&image("image/webp", MAX_IMAGE_BYTES)), true).is_ok());
        assert_eq!(
            validate_category_image(Some(&image("image/webp", MAX_IMAGE_BYTES + 1)), true),
            Err("Image must not exceed 5 MB")
        );
    }

    #[test]
    fn category_form_collects_all_errors() {
        let form = CategoryForm {
            name: "x".to_owned(),
            image: None,
        };
        let errors = validate_category_form(&form, true).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.get("name").is_some());
        assert_eq!(errors.get("image"), Some("Image is required"));

        assert!(validate_category_form(
            &CategoryForm {
                name: "Drinks".to_owned(),
                image: None,
            },
            false
        )
        .is_ok());
    }

    #[test]
    fn notification_requires_title_and_body() {
        let notification = NewNotification {
            title: " ".to_owned(),
            body: String::new(),
            destination: Destination::All,
            delivery_date: None,
            data: serde_json::Map::new(),
        };
        let errors = validate_notification(&notification).unwrap_err();
        assert!(errors.get("title").is_some());
        assert!(errors.get("body").is_some());
        assert_eq!(
            errors.to_string(),
            "title: This field is required; body: This field is required"
        );
    }

    #[test]
    fn reason_required_only_for_reject_and_suspend() {
        assert!(validate_status_reason(StatusAction::Approve, None).is_ok());
        assert!(validate_status_reason(StatusAction::Reactivate, None).is_ok());
        assert!(validate_status_reason(StatusAction::Reject, None).is_err());
        assert!(validate_status_reason(StatusAction::Suspend, Some("  ")).is_err());
        assert!(validate_status_reason(StatusAction::Suspend, Some("Fraud report")).is_ok());
    }

    #[test]
    fn points_value_must_be_positive_number() {
        assert_eq!(parse_points_value("100"), Ok(100.0));
        assert_eq!(parse_points_value(" 2.5 "), Ok(2.5));
        assert_eq!(parse_points_value("0"), Err("Value must be greater than 0"));
        assert_eq!(parse_points_value("-1"), Err("Value must be greater than 0"));
        assert_eq!(parse_points_value("ten"), Err("Value must be a number"));
        assert!(validate_points_form("").is_err());
    }
}
