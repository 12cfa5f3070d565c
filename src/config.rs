//! Environment-driven configuration.
//!
//! Values come from the process environment. The console binary loads a
//! `.env` file into the environment before calling [`Config::from_env`].

use core::fmt;
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::{AdminError, Result};

/// API base URL variable.
pub const API_URL_ENV: &str = "MPADMIN_API_URL";

/// Session token variable.
pub const TOKEN_ENV: &str = "MPADMIN_TOKEN";

/// Identity-provider publishable key variable.
pub const PUBLISHABLE_KEY_ENV: &str = "MPADMIN_PUBLISHABLE_KEY";

/// Cache directory override variable.
pub const CACHE_DIR_ENV: &str = "MPADMIN_CACHE_DIR";

/// API base URL used when [`API_URL_ENV`] is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:3001";

/// Identity-provider instance a publishable key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instance {
    /// `pk_test_` keys.
    Development,
    /// `pk_live_` keys.
    Production,
}

impl Instance {
    /// Classifies a publishable key by its prefix.
    #[inline]
    #[must_use]
    pub fn from_publishable_key(key: &str) -> Option<Self> {
        if key.starts_with("pk_test_") {
            Some(Self::Development)
        } else if key.starts_with("pk_live_") {
            Some(Self::Production)
        } else {
            None
        }
    }

    /// Lowercase instance name.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for Instance {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Console configuration.
#[derive(Debug)]
pub struct Config {
    /// API base URL, without a trailing slash.
    api_url: String,
    /// Session token, if one was supplied.
    token: Option<SecretString>,
    /// Publishable key and the instance it selects.
    publishable_key: Option<(String, Instance)>,
    /// Cache directory override.
    cache_dir: Option<PathBuf>,
}

impl Config {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// See [`Config::from_lookup`].
    #[inline]
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`. Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Config`] if the API URL is not an absolute
    /// http(s) URL or the publishable key has an unknown prefix.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self> {
        let read = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_owned())
                .filter(|trimmed| !trimmed.is_empty())
        };

        let api_url = match read(API_URL_ENV) {
            Some(raw) => parse_api_url(&raw)?,
            None => DEFAULT_API_URL.to_owned(),
        };

        let publishable_key = read(PUBLISHABLE_KEY_ENV)
            .map(|key| match Instance::from_publishable_key(&key) {
                Some(instance) => Ok((key, instance)),
                None => Err(AdminError::Config(format!(
                    "{PUBLISHABLE_KEY_ENV} must start with pk_test_ or pk_live_"
                ))),
            })
            .transpose()?;

        let config = Self {
            api_url,
            token: read(TOKEN_ENV).map(SecretString::from),
            publishable_key,
            cache_dir: read(CACHE_DIR_ENV).map(PathBuf::from),
        };
        tracing::debug!(
            api_url = %config.api_url,
            has_token = config.token.is_some(),
            instance = config.instance().map_or("unknown", Instance::as_str),
            "loaded configuration"
        );
        Ok(config)
    }

    /// API base URL.
    #[inline]
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Session token, if one was supplied.
    #[inline]
    #[must_use]
    pub const fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    /// Session token as plain text.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::MissingToken`] if none was supplied.
    #[inline]
    pub fn require_token(&self) -> Result<&str> {
        self.token
            .as_ref()
            .map(ExposeSecret::expose_secret)
            .ok_or(AdminError::MissingToken)
    }

    /// Publishable key, if one was supplied.
    #[inline]
    #[must_use]
    pub fn publishable_key(&self) -> Option<&str> {
        self.publishable_key.as_ref().map(|&(ref key, _)| key.as_str())
    }

    /// Instance selected by the publishable key.
    #[inline]
    #[must_use]
    pub fn instance(&self) -> Option<Instance> {
        self.publishable_key.as_ref().map(|&(_, instance)| instance)
    }

    /// Cache directory override.
    #[inline]
    #[must_use]
    pub const fn cache_dir(&self) -> Option<&PathBuf> {
        self.cache_dir.as_ref()
    }
}

/// Validates an API base URL and strips trailing slashes.
fn parse_api_url(raw: &str) -> Result<String> {
    let parsed = Url::parse(raw)
        .map_err(|err| AdminError::Config(format!("{API_URL_ENV} is not a valid URL: {err}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AdminError::Config(format!(
            "{API_URL_ENV} must use http or https"
        )));
    }
    Ok(raw.trim_end_matches('/').to_owned())
}
