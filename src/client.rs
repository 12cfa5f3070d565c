//! HTTP client for the marketplace admin API.
//!
//! Provides both async and blocking client variants behind feature flags.
//! Both variants are generated from one macro so they expose the same
//! endpoints with the same error mapping.

use serde::Deserialize;

use crate::error::{AdminError, Result};

/// Default API base URL for local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

/// Business collection endpoint.
const BUSINESSES_PATH: &str = "/businesses";

/// Single business endpoint.
const BUSINESS_PATH: &str = "/business";

/// Business status endpoint.
const BUSINESS_STATUS_PATH: &str = "/business/status";

/// Business documents collection endpoint.
const BUSINESS_DOCUMENTS_PATH: &str = "/business/documents";

/// Business document status endpoint.
const DOCUMENT_STATUS_PATH: &str = "/business/document/status";

/// Client users endpoint.
const CLIENTS_PATH: &str = "/users/clients";

/// Notification collection endpoint.
const NOTIFICATIONS_PATH: &str = "/notifications";

/// Single notification endpoint.
const NOTIFICATION_PATH: &str = "/notification";

/// Admin configuration endpoint.
const CONFIGURATION_PATH: &str = "/admin/configuration";

/// Multipart field carrying the category name.
const CATEGORY_NAME_FIELD: &str = "name";

/// Multipart field carrying the category image.
const CATEGORY_IMAGE_FIELD: &str = "categoryImage";

/// Phrases the backend uses when a list lookup finds nothing.
pub const NOT_FOUND_MARKERS: [&str; 5] = [
    "no se encontraron",
    "not found",
    "no encontrado",
    "sin resultados",
    "no results",
];

/// Error body fields inspected by [`recover_not_found`] and [`api_error`].
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    /// `error` text, if present.
    #[serde(default)]
    error: Option<serde_json::Value>,
    /// `message` text, if present.
    #[serde(default)]
    message: Option<serde_json::Value>,
    /// `status` text, if present.
    #[serde(default)]
    status: Option<serde_json::Value>,
}

impl ErrorBody {
    /// First non-empty text among `error`, `message` and `status`.
    fn lookup_text(&self) -> Option<&str> {
        first_text([self.error.as_ref(), self.message.as_ref(), self.status.as_ref()])
    }

    /// First non-empty text among `error` and `message`.
    fn display_text(&self) -> Option<&str> {
        first_text([self.error.as_ref(), self.message.as_ref()])
    }
}

/// Returns the first field holding a non-empty string.
fn first_text<const N: usize>(fields: [Option<&serde_json::Value>; N]) -> Option<&str> {
    fields
        .into_iter()
        .flatten()
        .filter_map(serde_json::Value::as_str)
        .find(|text| !text.is_empty())
}

/// Maps a failed list response to `empty` when it only signals "no data".
///
/// The backend reports some empty collections as HTTP 400 (or 404) with a
/// "not found" phrase in the body instead of an empty list. For those two
/// statuses a body that is not JSON, or whose first non-empty `error`,
/// `message` or `status` text (in that order) contains one of
/// [`NOT_FOUND_MARKERS`] (case-insensitive), yields `empty`. Everything else
/// becomes [`AdminError::Api`].
///
/// # Errors
///
/// Returns [`AdminError::Api`] for any status other than 400/404 and for
/// 400/404 bodies that describe a real failure.
pub fn recover_not_found<T>(status: u16, body: &str, empty: T) -> Result<T> {
    if status != 400 && status != 404 {
        return Err(api_error(status, body));
    }
    let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) else {
        tracing::debug!(status, "unparsable error body treated as empty result");
        return Ok(empty);
    };
    let is_not_found = parsed.lookup_text().is_some_and(|text| {
        let lower = text.to_lowercase();
        NOT_FOUND_MARKERS.iter().any(|marker| lower.contains(marker))
    });
    if is_not_found {
        tracing::debug!(status, "not-found response treated as empty result");
        Ok(empty)
    } else {
        Err(api_error(status, body))
    }
}

/// Builds an [`AdminError::Api`], preferring the body's `error` or `message`.
#[must_use]
pub fn api_error(status: u16, body: &str) -> AdminError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.display_text().map(str::to_owned))
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                "unknown error".to_owned()
            } else {
                body.to_owned()
            }
        });
    AdminError::Api { status, message }
}

/// Joins the base URL, a path and an optional `id` query parameter.
fn endpoint(base_url: &str, path: &str, id: Option<&str>) -> String {
    let base = base_url.trim_end_matches('/');
    match id {
        Some(id) => {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .append_pair("id", id)
                .finish();
            format!("{base}{path}?{query}")
        }
        None => format!("{base}{path}"),
    }
}

/// Generates an admin API client (async or blocking) with builder, methods,
/// and tests.
macro_rules! define_client {
    (
        client_name: $client:ident,
        builder_name: $builder:ident,
        http_type: $http_type:ty,
        request_type: $req_type:ty,
        form_type: $form_type:ty,
        part_type: $part_type:ty,
        client_doc: $client_doc:expr,
        builder_doc: $builder_doc:expr,
        $(async_kw: $async_kw:tt,)?
        $(await_kw: $await_ext:tt,)?
        $(send_bound: $send_bound:tt,)?
    ) => {
        #[doc = $builder_doc]
        #[derive(Debug)]
        pub struct $builder {
            /// Session token for API authentication.
            token: Option<SecretString>,
            /// Base URL override.
            base_url: Option<String>,
        }

        impl $builder {
            /// Sets the session token sent as a bearer credential.
            #[inline]
            #[must_use]
            pub fn token<T: Into<String>>(mut self, token: T) -> Self {
                self.token = Some(SecretString::from(token.into()));
                self
            }

            /// Overrides the base URL (useful for testing with a mock server).
            #[inline]
            #[must_use]
            pub fn base_url<T: Into<String>>(mut self, url: T) -> Self {
                self.base_url = Some(url.into());
                self
            }

            /// Builds the client.
            ///
            /// # Errors
            ///
            /// Returns [`AdminError::MissingToken`] if no token was provided.
            /// Returns [`AdminError::Http`] if the HTTP client fails to build.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub fn build(self) -> Result<$client> {
                let token = self.token.ok_or(AdminError::MissingToken)?;
                let base_url = self
                    .base_url
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
                tracing::debug!(base_url = %base_url, "building client");
                let http = <$http_type>::builder().build()?;

                Ok($client {
                    http,
                    token,
                    base_url,
                })
            }
        }

        #[doc = $client_doc]
        #[derive(Debug)]
        pub struct $client {
            /// Underlying HTTP client.
            http: $http_type,
            /// Bearer session token.
            token: SecretString,
            /// API base URL.
            base_url: String,
        }

        impl $client {
            /// Creates a new builder for configuring the client.
            #[inline]
            #[must_use]
            pub const fn builder() -> $builder {
                $builder {
                    token: None,
                    base_url: None,
                }
            }

            /// Returns the configured base URL.
            #[inline]
            #[must_use]
            pub fn base_url(&self) -> &str {
                &self.base_url
            }

            // ── Businesses ──────────────────────────────────────────

            /// Lists all businesses via `GET /businesses`.
            ///
            /// A "not found" answer is reported as an empty list.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn businesses(&self) -> Result<Vec<Business>> {
                let request = self.http.get(self.url(BUSINESSES_PATH, None));
                let response: Option<ApiResponse<BusinessList>> =
                    self.execute_or_empty(request) $( .$await_ext )? ?;
                Ok(response.map(|r| r.data.businesses).unwrap_or_default())
            }

            /// Lists all business documents via `GET /business/documents`.
            ///
            /// A "not found" answer is reported as an empty list.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn business_documents(&self) -> Result<Vec<BusinessDocument>> {
                let request = self.http.get(self.url(BUSINESS_DOCUMENTS_PATH, None));
                let response: Option<ApiResponse<BusinessDocumentList>> =
                    self.execute_or_empty(request) $( .$await_ext )? ?;
                Ok(response.map(|r| r.data.business_docs).unwrap_or_default())
            }

            /// Fetches one business via `GET /business?id=`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(id = %id))]
            pub $($async_kw)? fn business(&self, id: &BusinessId) -> Result<Business> {
                let request = self.http.get(self.url(BUSINESS_PATH, Some(id.as_inner())));
                let response: ApiResponse<Business> =
                    self.execute(request) $( .$await_ext )? ?;
                Ok(response.data)
            }

            /// Changes a business status via `PUT /business/status?id=`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails or the server returns
            /// a non-success status.
            #[inline]
            #[tracing::instrument(skip_all, fields(id = %id, status = update.status.as_wire()))]
            pub $($async_kw)? fn update_business_status(
                &self,
                id: &BusinessId,
                update: &StatusUpdate,
            ) -> Result<()> {
                let request = self
                    .http
                    .put(self.url(BUSINESS_STATUS_PATH, Some(id.as_inner())))
                    .json(update);
                self.execute_empty(request) $( .$await_ext )?
            }

            /// Records a document review via `PUT /business/document/status?id=`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails or the server returns
            /// a non-success status.
            #[inline]
            #[tracing::instrument(skip_all, fields(id = %id))]
            pub $($async_kw)? fn update_document_status(
                &self,
                id: &DocumentId,
                review: DocumentReview,
            ) -> Result<()> {
                let request = self
                    .http
                    .put(self.url(DOCUMENT_STATUS_PATH, Some(id.as_inner())))
                    .json(&DocumentStatusUpdate { status: review });
                self.execute_empty(request) $( .$await_ext )?
            }

            /// Deletes a business via `DELETE /business?id=`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails or the server returns
            /// a non-success status.
            #[inline]
            #[tracing::instrument(skip_all, fields(id = %id))]
            pub $($async_kw)? fn delete_business(&self, id: &BusinessId) -> Result<()> {
                let request = self.http.delete(self.url(BUSINESS_PATH, Some(id.as_inner())));
                self.execute_empty(request) $( .$await_ext )?
            }

            // ── Categories ──────────────────────────────────────────

            /// Lists the categories of kind `K`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(kind = K::SLUG))]
            pub $($async_kw)? fn categories<K: CategoryKind>(&self) -> Result<Vec<Category<K>>> {
                let request = self.http.get(self.url(K::LIST_PATH, None));
                let response: ApiResponse<CategoryList<K>> =
                    self.execute(request) $( .$await_ext )? ?;
                Ok(response.data.categories)
            }

            /// Creates a category of kind `K` from a multipart form.
            ///
            /// # Errors
            ///
            /// Returns an error if the image MIME type is malformed, the HTTP
            /// request fails, or the server returns a non-success status.
            #[inline]
            #[tracing::instrument(skip_all, fields(kind = K::SLUG))]
            pub $($async_kw)? fn create_category<K: CategoryKind>(
                &self,
                form: &CategoryForm,
            ) -> Result<()> {
                let request = self
                    .http
                    .post(self.url(K::ITEM_PATH, None))
                    .multipart(Self::category_multipart(form)?);
                self.execute_empty(request) $( .$await_ext )?
            }

            /// Updates a category of kind `K`; the image part is sent only when
            /// a new image is supplied.
            ///
            /// # Errors
            ///
            /// Returns an error if the image MIME type is malformed, the HTTP
            /// request fails, or the server returns a non-success status.
            #[inline]
            #[tracing::instrument(skip_all, fields(kind = K::SLUG, id = %id))]
            pub $($async_kw)? fn update_category<K: CategoryKind>(
                &self,
                id: &CategoryId<K>,
                form: &CategoryForm,
            ) -> Result<()> {
                let request = self
                    .http
                    .put(self.url(K::ITEM_PATH, Some(id.as_inner())))
                    .multipart(Self::category_multipart(form)?);
                self.execute_empty(request) $( .$await_ext )?
            }

            /// Deletes a category of kind `K`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails or the server returns
            /// a non-success status.
            #[inline]
            #[tracing::instrument(skip_all, fields(kind = K::SLUG, id = %id))]
            pub $($async_kw)? fn delete_category<K: CategoryKind>(
                &self,
                id: &CategoryId<K>,
            ) -> Result<()> {
                let request = self.http.delete(self.url(K::ITEM_PATH, Some(id.as_inner())));
                self.execute_empty(request) $( .$await_ext )?
            }

            // ── Users ───────────────────────────────────────────────

            /// Lists client users via `GET /users/clients`.
            ///
            /// A "not found" answer is reported as an empty list.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn clients(&self) -> Result<Vec<User>> {
                let request = self.http.get(self.url(CLIENTS_PATH, None));
                let response: Option<ApiResponse<Vec<User>>> =
                    self.execute_or_empty(request) $( .$await_ext )? ?;
                Ok(response.map(|r| r.data).unwrap_or_default())
            }

            // ── Notifications ───────────────────────────────────────

            /// Lists notifications via `GET /notifications`.
            ///
            /// A "not found" answer is reported as an empty list.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn notifications(&self) -> Result<Vec<Notification>> {
                let request = self.http.get(self.url(NOTIFICATIONS_PATH, None));
                let response: Option<ApiResponse<NotificationList>> =
                    self.execute_or_empty(request) $( .$await_ext )? ?;
                Ok(response.map(|r| r.data.notifications).unwrap_or_default())
            }

            /// Creates a notification via `POST /notification`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails or the server returns
            /// a non-success status.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn create_notification(
                &self,
                notification: &NewNotification,
            ) -> Result<()> {
                let request = self
                    .http
                    .post(self.url(NOTIFICATION_PATH, None))
                    .json(notification);
                self.execute_empty(request) $( .$await_ext )?
            }

            /// Deletes a notification via `DELETE /notification?id=`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails or the server returns
            /// a non-success status.
            #[inline]
            #[tracing::instrument(skip_all, fields(id = %id))]
            pub $($async_kw)? fn delete_notification(&self, id: &NotificationId) -> Result<()> {
                let request = self
                    .http
                    .delete(self.url(NOTIFICATION_PATH, Some(id.as_inner())));
                self.execute_empty(request) $( .$await_ext )?
            }

            // ── Points ──────────────────────────────────────────────

            /// Fetches the pesos-per-point rate.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn points_config(&self) -> Result<PointsConfig> {
                let request = self
                    .http
                    .get(self.url(CONFIGURATION_PATH, Some(CREDITS_COST)));
                let response: ApiResponse<PointsConfig> =
                    self.execute(request) $( .$await_ext )? ?;
                Ok(response.data)
            }

            /// Stores a new pesos-per-point rate.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails or the server returns
            /// a non-success status.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn update_points_config(&self, config: &PointsConfig) -> Result<()> {
                let request = self
                    .http
                    .put(self.url(CONFIGURATION_PATH, Some(CREDITS_COST)))
                    .json(config);
                self.execute_empty(request) $( .$await_ext )?
            }

            // ── Transport helpers ───────────────────────────────────

            /// Builds an endpoint URL on this client's base URL.
            fn url(&self, path: &str, id: Option<&str>) -> String {
                endpoint(&self.base_url, path, id)
            }

            /// Builds the multipart body for a category form.
            fn category_multipart(form: &CategoryForm) -> Result<$form_type> {
                let multipart =
                    <$form_type>::new().text(CATEGORY_NAME_FIELD, form.name.trim().to_owned());
                match form.image.as_ref() {
                    Some(image) => {
                        let part = <$part_type>::bytes(image.bytes.clone())
                            .file_name(image.file_name.clone())
                            .mime_str(&image.mime_type)?;
                        Ok(multipart.part(CATEGORY_IMAGE_FIELD, part))
                    }
                    None => Ok(multipart),
                }
            }

            /// Attaches the bearer token, sends the request and reads the
            /// status and body.
            #[tracing::instrument(skip_all)]
            $($async_kw)? fn send(&self, request: $req_type) -> Result<(u16, String)> {
                let response = request
                    .bearer_auth(self.token.expose_secret())
                    .send()
                    $( .$await_ext )?
                    ?;
                let status = response.status();
                tracing::debug!(status = %status, url = %response.url(), "received response");
                let body = response.text() $( .$await_ext )? ?;
                tracing::trace!(body_len = body.len(), "read response body");
                Ok((status.as_u16(), body))
            }

            /// Sends the request and deserializes a successful JSON body.
            $($async_kw)? fn execute<Resp: DeserializeOwned $(+ $send_bound)?>(
                &self,
                request: $req_type,
            ) -> Result<Resp> {
                let (status, body) = self.send(request) $( .$await_ext )? ?;
                if (200..300).contains(&status) {
                    serde_json::from_str(&body).map_err(AdminError::from)
                } else {
                    tracing::debug!(status, "API error");
                    Err(api_error(status, &body))
                }
            }

            /// Like `execute`, but maps "not found" failures to `None`.
            $($async_kw)? fn execute_or_empty<Resp: DeserializeOwned $(+ $send_bound)?>(
                &self,
                request: $req_type,
            ) -> Result<Option<Resp>> {
                let (status, body) = self.send(request) $( .$await_ext )? ?;
                if (200..300).contains(&status) {
                    serde_json::from_str(&body).map(Some).map_err(AdminError::from)
                } else {
                    recover_not_found(status, &body, None)
                }
            }

            /// Sends the request and discards a successful body.
            $($async_kw)? fn execute_empty(&self, request: $req_type) -> Result<()> {
                let (status, body) = self.send(request) $( .$await_ext )? ?;
                if (200..300).contains(&status) {
                    Ok(())
                } else {
                    tracing::debug!(status, "API error");
                    Err(api_error(status, &body))
                }
            }
        }

        #[cfg(test)]
        mod builder_tests {
            use super::*;

            #[test]
            fn builder_requires_token() {
                let result = $client::builder().build();
                assert!(matches!(result, Err(AdminError::MissingToken)));
            }

            #[test]
            fn builder_with_token_uses_default_url() {
                let client = $client::builder()
                    .token("test-token")
                    .build()
                    .unwrap();
                assert_eq!(client.base_url(), DEFAULT_BASE_URL);
            }

            #[test]
            fn builder_custom_base_url() {
                let client = $client::builder()
                    .token("test-token")
                    .base_url("http://localhost:8080")
                    .build()
                    .unwrap();
                assert_eq!(client.base_url(), "http://localhost:8080");
            }

            #[test]
            fn debug_does_not_leak_token() {
                let client = $client::builder()
                    .token("super-secret-token")
                    .build()
                    .unwrap();
                assert!(!format!("{client:?}").contains("super-secret-token"));
            }
        }
    };
}

#[cfg(feature = "async")]
mod async_client {
    //! Async HTTP client for the marketplace admin API.

    use secrecy::{ExposeSecret as _, SecretString};
    use serde::de::DeserializeOwned;

    use super::{
        BUSINESS_DOCUMENTS_PATH, BUSINESS_PATH, BUSINESS_STATUS_PATH, BUSINESSES_PATH,
        CATEGORY_IMAGE_FIELD, CATEGORY_NAME_FIELD, CLIENTS_PATH, CONFIGURATION_PATH,
        DEFAULT_BASE_URL, DOCUMENT_STATUS_PATH, NOTIFICATION_PATH, NOTIFICATIONS_PATH, api_error,
        endpoint, recover_not_found,
    };
    use crate::error::{AdminError, Result};
    use crate::models::{
        ApiResponse, Business, BusinessDocument, BusinessDocumentList, BusinessId, BusinessList,
        CREDITS_COST, Category, CategoryForm, CategoryId, CategoryKind, CategoryList, DocumentId,
        DocumentReview, DocumentStatusUpdate, NewNotification, Notification, NotificationId,
        NotificationList, PointsConfig, StatusUpdate, User,
    };

    define_client! {
        client_name: AdminClient,
        builder_name: AdminClientBuilder,
        http_type: reqwest::Client,
        request_type: reqwest::RequestBuilder,
        form_type: reqwest::multipart::Form,
        part_type: reqwest::multipart::Part,
        client_doc: "Async client for the marketplace admin API.\n\nUse [`AdminClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing an [`AdminClient`].",
        async_kw: async,
        await_kw: await,
        send_bound: Send,
    }
}

#[cfg(feature = "blocking")]
mod blocking_client {
    //! Blocking (synchronous) HTTP client for the marketplace admin API.

    use secrecy::{ExposeSecret as _, SecretString};
    use serde::de::DeserializeOwned;

    use super::{
        BUSINESS_DOCUMENTS_PATH, BUSINESS_PATH, BUSINESS_STATUS_PATH, BUSINESSES_PATH,
        CATEGORY_IMAGE_FIELD, CATEGORY_NAME_FIELD, CLIENTS_PATH, CONFIGURATION_PATH,
        DEFAULT_BASE_URL, DOCUMENT_STATUS_PATH, NOTIFICATION_PATH, NOTIFICATIONS_PATH, api_error,
        endpoint, recover_not_found,
    };
    use crate::error::{AdminError, Result};
    use crate::models::{
        ApiResponse, Business, BusinessDocument, BusinessDocumentList, BusinessId, BusinessList,
        CREDITS_COST, Category, CategoryForm, CategoryId, CategoryKind, CategoryList, DocumentId,
        DocumentReview, DocumentStatusUpdate, NewNotification, Notification, NotificationId,
        NotificationList, PointsConfig, StatusUpdate, User,
    };

    define_client! {
        client_name: AdminBlockingClient,
        builder_name: AdminBlockingClientBuilder,
        http_type: reqwest::blocking::Client,
        request_type: reqwest::blocking::RequestBuilder,
        form_type: reqwest::blocking::multipart::Form,
        part_type: reqwest::blocking::multipart::Part,
        client_doc: "Blocking (synchronous) client for the marketplace admin API.\n\nUse [`AdminBlockingClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing an [`AdminBlockingClient`].",
    }
}

#[cfg(feature = "async")]
pub use async_client::{AdminClient, AdminClientBuilder};
#[cfg(feature = "blocking")]
pub use blocking_client::{AdminBlockingClient, AdminBlockingClientBuilder};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_phrase_on_400_yields_empty() {
        let body = r#"{"status":"error","message":"No se encontraron negocios"}"#;
        let result: Vec<u8> = recover_not_found(400, body, Vec::new()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn unrelated_400_message_is_an_error() {
        let body = r#"{"status":"error","message":"Invalid filter"}"#;
        let err = recover_not_found(400, body, Vec::<u8>::new()).unwrap_err();
        assert!(matches!(
            err,
            AdminError::Api { status: 400, ref message } if message == "Invalid filter"
        ));
    }

    #[test]
    fn markers_are_case_insensitive_and_checked_in_error_field() {
        let body = r#"{"error":"Resource NOT FOUND"}"#;
        assert_eq!(recover_not_found(404, body, 7).unwrap(), 7);
        let body = r#"{"status":"Sin resultados"}"#;
        assert_eq!(recover_not_found(400, body, 7).unwrap(), 7);
    }

    #[test]
    fn only_first_non_empty_field_is_checked() {
        let body = r#"{"error":"boom","message":"not found"}"#;
        let err = recover_not_found(400, body, 0).unwrap_err();
        assert!(matches!(err, AdminError::Api { status: 400, ref message } if message == "boom"));
        let body = r#"{"error":"","message":"Not found"}"#;
        assert_eq!(recover_not_found(400, body, 3).unwrap(), 3);
    }

    #[test]
    fn unparsable_body_on_404_yields_empty() {
        assert_eq!(recover_not_found(404, "<html>Not Found</html>", 0).unwrap(), 0);
        assert_eq!(recover_not_found(400, "", 0).unwrap(), 0);
    }

    #[test]
    fn other_statuses_are_errors_even_with_marker() {
        let body = r#"{"message":"not found"}"#;
        let err = recover_not_found(500, body, 0).unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn api_error_prefers_message_field() {
        let err = api_error(422, r#"{"status":"error","message":"Name taken"}"#);
        assert!(matches!(err, AdminError::Api { status: 422, ref message } if message == "Name taken"));
        let err = api_error(502, "Bad Gateway");
        assert!(matches!(err, AdminError::Api { ref message, .. } if message == "Bad Gateway"));
        let err = api_error(503, "  ");
        assert!(matches!(err, AdminError::Api { ref message, .. } if message == "unknown error"));
    }

    #[test]
    fn endpoint_encodes_id() {
        assert_eq!(
            endpoint("http://api/", "/business", Some("a b&c")),
            "http://api/business?id=a+b%26c"
        );
        assert_eq!(endpoint("http://api", "/businesses", None), "http://api/businesses");
    }
}

#[cfg(all(test, feature = "async"))]
mod async_tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::models::{
        BusinessId, BusinessKind, BusinessStatus, CategoryForm, CategoryImage, Destination,
        DocumentId, DocumentReview, NewNotification, NotificationId, PointsConfig, ProductKind,
        StatusUpdate,
    };

    fn business_json(id: &str, status: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": format!("Business {id}"),
            "status": status,
            "open": true,
            "userId": "owner",
            "createdAt": "2025-01-10T12:00:00Z",
            "updatedAt": "2025-01-10T12:00:00Z",
            "deletedAt": null
        })
    }

    async fn client(server: &MockServer) -> AdminClient {
        AdminClient::builder()
            .token("session-token")
            .base_url(server.uri())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn businesses_sends_bearer_and_parses_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/businesses"))
            .and(header("authorization", "Bearer session-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": {"businesses": [business_json("b-1", "Acepted"), business_json("b-2", "Pending")]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let businesses = client(&server).await.businesses().await.unwrap();
        assert_eq!(businesses.len(), 2);
        assert_eq!(businesses[0].status, BusinessStatus::Accepted);
    }

    #[tokio::test]
    async fn businesses_not_found_400_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/businesses"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "status": "error",
                "message": "No se encontraron negocios"
            })))
            .mount(&server)
            .await;

        let businesses = client(&server).await.businesses().await.unwrap();
        assert!(businesses.is_empty());
    }

    #[tokio::test]
    async fn businesses_real_400_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/businesses"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "status": "error",
                "message": "Database unavailable"
            })))
            .mount(&server)
            .await;

        let err = client(&server).await.businesses().await.unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert!(err.to_string().contains("Database unavailable"));
    }

    #[tokio::test]
    async fn business_by_id_uses_query_parameter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/business"))
            .and(query_param("id", "b-9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": business_json("b-9", "Suspended")
            })))
            .mount(&server)
            .await;

        let business = client(&server)
            .await
            .business(&BusinessId::from("b-9"))
            .await
            .unwrap();
        assert_eq!(business.status, BusinessStatus::Suspended);
    }

    #[tokio::test]
    async fn business_by_id_404_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/business"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "not found"})))
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .business(&BusinessId::from("missing"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn update_business_status_sends_status_and_reason() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/business/status"))
            .and(query_param("id", "b-1"))
            .and(body_json(json!({"status": "Rejected", "reason": "Blurry documents"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success", "data": null})))
            .expect(1)
            .mount(&server)
            .await;

        let update = StatusUpdate {
            status: BusinessStatus::Rejected,
            reason: Some("Blurry documents".to_owned()),
        };
        client(&server)
            .await
            .update_business_status(&BusinessId::from("b-1"), &update)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_document_status_sends_review() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/business/document/status"))
            .and(query_param("id", "d-1"))
            .and(body_json(json!({"status": "approved"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .await
            .update_document_status(&DocumentId::from("d-1"), DocumentReview::Approved)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn delete_business_propagates_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/business"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .delete_business(&BusinessId::from("b-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::Api { status: 500, ref message } if message == "boom"));
    }

    #[tokio::test]
    async fn categories_use_kind_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/product/categories"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": {"categories": [{
                    "id": "c-1",
                    "name": "Drinks",
                    "image": null,
                    "createdAt": "2025-01-10T12:00:00Z",
                    "updatedAt": "2025-01-10T12:00:00Z",
                    "deletedAt": null
                }]}
            })))
            .mount(&server)
            .await;

        let categories = client(&server).await.categories::<ProductKind>().await.unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Drinks");
    }

    #[tokio::test]
    async fn create_category_posts_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/business/category"))
            .and(body_string_contains("name=\"name\""))
            .and(body_string_contains("Bakery"))
            .and(body_string_contains("name=\"categoryImage\""))
            .and(body_string_contains("filename=\"bakery.png\""))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"status": "success", "data": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let form = CategoryForm {
            name: "  Bakery ".to_owned(),
            image: Some(CategoryImage {
                file_name: "bakery.png".to_owned(),
                mime_type: "image/png".to_owned(),
                bytes: vec![0x89, b'P', b'N', b'G'],
            }),
        };
        client(&server)
            .await
            .create_category::<BusinessKind>(&form)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_and_delete_category_target_item_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/product/category"))
            .and(query_param("id", "c-2"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/product/category"))
            .and(query_param("id", "c-2"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let api = client(&server).await;
        let form = CategoryForm {
            name: "Snacks".to_owned(),
            image: None,
        };
        api.update_category::<ProductKind>(&"c-2".into(), &form)
            .await
            .unwrap();
        api.delete_category::<ProductKind>(&"c-2".into())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn clients_parse_bare_array_and_recover_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/clients"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "status": "error",
                "message": "Users not found"
            })))
            .mount(&server)
            .await;

        let users = client(&server).await.clients().await.unwrap();
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn clients_parse_bare_array() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/clients"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": [{
                    "id": "user_1",
                    "fullName": "Ana",
                    "email": "ana@example.com",
                    "role": "Client",
                    "subscriptions": [],
                    "createdAt": "2025-01-10T12:00:00Z",
                    "updatedAt": "2025-01-10T12:00:00Z"
                }]
            })))
            .mount(&server)
            .await;

        let users = client(&server).await.clients().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].full_name, "Ana");
    }

    #[tokio::test]
    async fn notifications_create_and_delete() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/notifications"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": {"notifications": []}
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/notification"))
            .and(body_json(json!({
                "title": "Hi",
                "body": "There",
                "destination": "All",
                "deliveryDate": null
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/notification"))
            .and(query_param("id", "n-1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let api = client(&server).await;
        assert!(api.notifications().await.unwrap().is_empty());
        let new = NewNotification {
            title: "Hi".to_owned(),
            body: "There".to_owned(),
            destination: Destination::All,
            delivery_date: None,
            data: serde_json::Map::new(),
        };
        api.create_notification(&new).await.unwrap();
        api.delete_notification(&NotificationId::from("n-1"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn points_config_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/configuration"))
            .and(query_param("id", "CREDITS_COST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": {"id": "CREDITS_COST", "value": "100"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/admin/configuration"))
            .and(query_param("id", "CREDITS_COST"))
            .and(body_json(json!({"id": "CREDITS_COST", "value": "150"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let api = client(&server).await;
        let config = api.points_config().await.unwrap();
        assert_eq!(config.pesos_per_point(), Some(100.0));
        api.update_points_config(&PointsConfig::credits_cost("150"))
            .await
            .unwrap();
    }
}

#[cfg(all(test, feature = "blocking"))]
mod blocking_tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn blocking_client_lists_notifications() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/notifications"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "status": "error",
                "message": "No results"
            })))
            .mount(&server)
            .await;

        let uri = server.uri();
        let notifications = tokio::task::spawn_blocking(move || {
            AdminBlockingClient::builder()
                .token("t")
                .base_url(uri)
                .build()
                .unwrap()
                .notifications()
        })
        .await
        .unwrap()
        .unwrap();
        assert!(notifications.is_empty());
    }
}
