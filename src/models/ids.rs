//! Newtype wrappers for entity identifiers.
//!
//! The backend uses opaque string identifiers for every entity; wrapping
//! them keeps a business id from being passed where a user id is expected.

use serde::{Deserialize, Serialize};

/// Macro to define a newtype ID wrapping a `String` inner type.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier from the given string.
            #[inline]
            #[must_use]
            pub const fn new(value: String) -> Self {
                Self(value)
            }

            /// Returns a reference to the inner string.
            #[inline]
            #[must_use]
            pub fn as_inner(&self) -> &str {
                &self.0
            }

            /// Consumes the wrapper and returns the inner string.
            #[inline]
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<String> for $name {
            #[inline]
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            #[inline]
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }
    };
}

define_string_id! {
    /// Unique identifier for a business (merchant storefront).
    BusinessId
}

define_string_id! {
    /// Unique identifier for a business legal document.
    DocumentId
}

define_string_id! {
    /// Unique identifier for a platform user.
    UserId
}

define_string_id! {
    /// Unique identifier for a user's subscription to a business.
    SubscriptionId
}

define_string_id! {
    /// Unique identifier for a push notification.
    NotificationId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_id_serde_roundtrip() {
        let id = BusinessId::new("b7f1c2d4-0000-0000-0000-000000000001".to_owned());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""b7f1c2d4-0000-0000-0000-000000000001""#);
        let deserialized: BusinessId = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, id);
    }

    #[test]
    fn id_display() {
        let id = UserId::new("user_2abc".to_owned());
        assert_eq!(id.to_string(), "user_2abc");
    }

    #[test]
    fn id_from_str_and_into_inner() {
        let id: NotificationId = "n-1".into();
        assert_eq!(id.as_inner(), "n-1");
        assert_eq!(id.into_inner(), "n-1");
    }
}
