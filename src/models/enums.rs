//! Enumeration types for constrained API values.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing one of the enums below from user input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct ParseEnumError {
    /// Name of the enum being parsed.
    kind: &'static str,
    /// The rejected input.
    value: String,
}

impl ParseEnumError {
    /// Creates a parse error for the given enum name and input.
    #[inline]
    #[must_use]
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// Review state of a business on the platform.
///
/// The backend spells the accepted state `"Acepted"`; the wire value is
/// kept exactly as the API sends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BusinessStatus {
    /// Waiting for an admin decision.
    Pending,
    /// Approved and visible to clients.
    #[serde(rename = "Acepted")]
    Accepted,
    /// Rejected by an admin.
    Rejected,
    /// Temporarily suspended by an admin.
    Suspended,
}

impl BusinessStatus {
    /// All statuses in display order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Accepted,
        Self::Rejected,
        Self::Suspended,
    ];

    /// Returns the exact value used on the wire and in query strings.
    #[inline]
    #[must_use]
    pub const fn as_wire(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Accepted => "Acepted",
            Self::Rejected => "Rejected",
            Self::Suspended => "Suspended",
        }
    }

    /// Returns a human-readable label.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
            Self::Suspended => "Suspended",
        }
    }

    /// Returns the admin actions available from this status.
    #[inline]
    #[must_use]
    pub const fn actions(self) -> &'static [StatusAction] {
        match self {
            Self::Pending => &[StatusAction::Approve, StatusAction::Reject],
            Self::Accepted => &[StatusAction::Suspend],
            Self::Suspended => &[StatusAction::Reactivate],
            Self::Rejected => &[],
        }
    }

    /// Returns `true` if `action` may be applied to a business in this status.
    #[inline]
    #[must_use]
    pub fn allows(self, action: StatusAction) -> bool {
        self.actions().contains(&action)
    }
}

impl fmt::Display for BusinessStatus {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BusinessStatus {
    type Err = ParseEnumError;

    /// Accepts the wire value (`Acepted`) as well as the corrected spelling.
    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "acepted" | "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            "suspended" => Ok(Self::Suspended),
            _ => Err(ParseEnumError::new("business status", s)),
        }
    }
}

/// Status change an admin can apply to a business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusAction {
    /// Pending → accepted.
    Approve,
    /// Pending → rejected; requires a reason.
    Reject,
    /// Accepted → suspended; requires a reason.
    Suspend,
    /// Suspended → accepted.
    Reactivate,
}

impl StatusAction {
    /// Returns the status the business ends up in.
    #[inline]
    #[must_use]
    pub const fn target(self) -> BusinessStatus {
        match self {
            Self::Approve | Self::Reactivate => BusinessStatus::Accepted,
            Self::Reject => BusinessStatus::Rejected,
            Self::Suspend => BusinessStatus::Suspended,
        }
    }

    /// Returns `true` if the action must carry a reason.
    #[inline]
    #[must_use]
    pub const fn requires_reason(self) -> bool {
        matches!(self, Self::Reject | Self::Suspend)
    }

    /// Returns the verb used in confirmation and toast copy.
    #[inline]
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Approve => "approved",
            Self::Reject => "rejected",
            Self::Suspend => "suspended",
            Self::Reactivate => "reactivated",
        }
    }
}

/// Kind of legal document a business uploads during onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentKind {
    /// Bank account certificate.
    BankingCertified,
    /// National identity document of the owner.
    Dni,
    /// Incorporation act.
    ConstitutiveAct,
    /// Power of attorney.
    AttorneyPower,
}

impl DocumentKind {
    /// Returns a human-readable label.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BankingCertified => "Banking certificate",
            Self::Dni => "Identity document",
            Self::ConstitutiveAct => "Incorporation act",
            Self::AttorneyPower => "Power of attorney",
        }
    }
}

/// Review verdict for a business document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentReview {
    /// The document is valid.
    Approved,
    /// The document was rejected.
    Rejected,
}

impl FromStr for DocumentReview {
    type Err = ParseEnumError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "approved" | "approve" => Ok(Self::Approved),
            "rejected" | "reject" => Ok(Self::Rejected),
            _ => Err(ParseEnumError::new("document review", s)),
        }
    }
}

/// Role of a platform user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UserRole {
    /// End customer.
    Client,
    /// Back office administrator.
    Admin,
    /// Business owner.
    Partner,
}

impl UserRole {
    /// Returns a human-readable label.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Client => "Client",
            Self::Admin => "Administrator",
            Self::Partner => "Owner",
        }
    }

    /// Returns the value as sent by the API.
    #[inline]
    #[must_use]
    pub const fn as_wire(self) -> &'static str {
        match self {
            Self::Client => "Client",
            Self::Admin => "Admin",
            Self::Partner => "Partner",
        }
    }
}

impl FromStr for UserRole {
    type Err = ParseEnumError;

    /// Accepts the capitalised and the lowercase spelling only.
    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Client" | "client" => Ok(Self::Client),
            "Admin" | "admin" => Ok(Self::Admin),
            "Partner" | "partner" => Ok(Self::Partner),
            _ => Err(ParseEnumError::new("user role", s)),
        }
    }
}

/// Delivery status of a push notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationStatus {
    /// Saved but not queued.
    Draft,
    /// Queued for a future delivery date.
    Scheduled,
    /// Delivered.
    Sent,
    /// Delivery failed.
    Failed,
}

impl NotificationStatus {
    /// Returns a human-readable label.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Scheduled => "Scheduled",
            Self::Sent => "Sent",
            Self::Failed => "Failed",
        }
    }
}

/// Outcome flag carried by every API envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// The request succeeded.
    Success,
    /// The request failed; `message` explains why.
    Error,
}
