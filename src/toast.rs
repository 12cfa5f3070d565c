//! Toast centre for transient user feedback.
//!
//! A [`ToastCenter`] is created once by the application root and passed by
//! reference to whatever reports results. Toasts expire after their
//! duration and are pruned lazily.

use core::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

/// Lifetime of a toast unless overridden.
pub const DEFAULT_DURATION: TimeDelta = TimeDelta::seconds(5);

/// Lifetime of toasts created by [`ToastCenter::error`].
pub const ERROR_DURATION: TimeDelta = TimeDelta::seconds(7);

/// Unique toast identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastId(Uuid);

impl fmt::Display for ToastId {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastKind {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Error,
    /// Something needs attention.
    Warning,
    /// Neutral information.
    Info,
}

impl ToastKind {
    /// Returns a short label.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

/// A toast before it is added to the centre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewToast {
    /// Severity.
    pub kind: ToastKind,
    /// Headline.
    pub title: String,
    /// Optional detail text.
    pub message: Option<String>,
    /// Lifetime; [`DEFAULT_DURATION`] when `None`.
    pub duration: Option<TimeDelta>,
}

impl NewToast {
    /// Creates a toast with the default duration and no message.
    #[inline]
    #[must_use]
    pub fn new<T: Into<String>>(kind: ToastKind, title: T) -> Self {
        Self {
            kind,
            title: title.into(),
            message: None,
            duration: None,
        }
    }

    /// Adds detail text.
    #[inline]
    #[must_use]
    pub fn message<T: Into<String>>(mut self, message: T) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Overrides the lifetime.
    #[inline]
    #[must_use]
    pub const fn duration(mut self, duration: TimeDelta) -> Self {
        self.duration = Some(duration);
        self
    }
}

/// A live toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Identifier.
    pub id: ToastId,
    /// Severity.
    pub kind: ToastKind,
    /// Headline.
    pub title: String,
    /// Optional detail text.
    pub message: Option<String>,
    /// Lifetime.
    pub duration: TimeDelta,
    /// When the toast was added.
    pub created_at: DateTime<Utc>,
}

impl Toast {
    /// Returns `true` once the toast's lifetime has elapsed at `now`.
    #[inline]
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.created_at + self.duration
    }
}

/// Ordered collection of live toasts.
#[derive(Debug, Clone, Default)]
pub struct ToastCenter {
    /// Toasts in insertion order.
    toasts: Vec<Toast>,
}

impl ToastCenter {
    /// Creates an empty centre.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { toasts: Vec::new() }
    }

    /// Adds a toast created now.
    #[inline]
    pub fn add(&mut self, toast: NewToast) -> ToastId {
        self.add_at(toast, Utc::now())
    }

    /// Adds a toast created at `now`.
    pub fn add_at(&mut self, toast: NewToast, now: DateTime<Utc>) -> ToastId {
        let id = ToastId(Uuid::new_v4());
        tracing::trace!(%id, kind = toast.kind.label(), "toast added");
        self.toasts.push(Toast {
            id,
            kind: toast.kind,
            title: toast.title,
            message: toast.message,
            duration: toast.duration.unwrap_or(DEFAULT_DURATION),
            created_at: now,
        });
        id
    }

    /// Adds a success toast.
    #[inline]
    pub fn success<T: Into<String>>(&mut self, title: T, message: Option<String>) -> ToastId {
        self.add(with_message(NewToast::new(ToastKind::Success, title), message))
    }

    /// Adds an error toast that stays for [`ERROR_DURATION`].
    #[inline]
    pub fn error<T: Into<String>>(&mut self, title: T, message: Option<String>) -> ToastId {
        self.add(
            with_message(NewToast::new(ToastKind::Error, title), message).duration(ERROR_DURATION),
        )
    }

    /// Adds a warning toast.
    #[inline]
    pub fn warning<T: Into<String>>(&mut self, title: T, message: Option<String>) -> ToastId {
        self.add(with_message(NewToast::new(ToastKind::Warning, title), message))
    }

    /// Adds an informational toast.
    #[inline]
    pub fn info<T: Into<String>>(&mut self, title: T, message: Option<String>) -> ToastId {
        self.add(with_message(NewToast::new(ToastKind::Info, title), message))
    }

    /// Removes a toast; returns `false` if it was already gone.
    #[inline]
    pub fn remove(&mut self, id: ToastId) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.id != id);
        self.toasts.len() != before
    }

    /// Removes every toast.
    #[inline]
    pub fn clear_all(&mut self) {
        self.toasts.clear();
    }

    /// Drops toasts expired at `now`; returns how many were removed.
    #[inline]
    pub fn prune_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.toasts.len();
        self.toasts.retain(|toast| !toast.is_expired(now));
        before - self.toasts.len()
    }

    /// Live toasts at `now`, in insertion order.
    #[inline]
    pub fn visible(&self, now: DateTime<Utc>) -> impl Iterator<Item = &Toast> {
        self.toasts.iter().filter(move |toast| !toast.is_expired(now))
    }

    /// Removes and returns every toast, in insertion order.
    #[inline]
    pub fn drain(&mut self) -> Vec<Toast> {
        core::mem::take(&mut self.toasts)
    }

    /// Number of stored toasts, expired or not.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    /// Returns `true` if no toasts are stored.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

/// Attaches an optional message.
fn with_message(toast: NewToast, message: Option<String>) -> NewToast {
    match message {
        Some(text) => toast.message(text),
        None => toast,
    }
}
