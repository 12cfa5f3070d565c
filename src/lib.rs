//! Typed admin client and console building blocks for the marketplace back
//! office API.
//!
//! The crate is layered the same way the admin screens are:
//!
//! - [`client`] talks to the REST API (async and blocking variants),
//! - [`cache`] keeps list results fresh for a staleness window,
//! - [`admin`] combines both into cached queries and invalidating mutations,
//! - [`filters`], [`table`], [`columns`] and [`view_state`] turn entity
//!   lists into sorted, paginated, filterable views,
//! - [`toast`], [`auth`], [`validation`] and [`format`] cover feedback,
//!   access control, form checks and display copy.

#[cfg(any(feature = "async", feature = "blocking"))]
pub mod admin;
pub mod auth;
pub mod cache;
#[cfg(any(feature = "async", feature = "blocking"))]
pub mod client;
pub mod columns;
pub mod config;
pub mod error;
pub mod filters;
pub mod format;
pub mod models;
pub mod table;
pub mod toast;
pub mod validation;
pub mod view_state;
