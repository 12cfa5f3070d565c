//! High-level admin client with an integrated query cache.
//!
//! Combines the low-level HTTP client with a [`CacheStore`] backend: list
//! queries are served from the cache while fresh, and every successful
//! mutation invalidates the keys whose data it changed so the next read
//! refetches. Failed mutations leave the cache untouched.
//!
//! Form input is validated before any request is built.

use crate::cache::{BUSINESS, BUSINESSES, NOTIFICATION_STATS, NOTIFICATIONS, QueryKey};
use crate::error::{AdminError, Result};
use crate::models::{Business, BusinessId, CategoryKind, StatusAction, StatusUpdate};
use crate::validation::{FieldErrors, validate_status_reason};

/// How cached queries treat existing entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPolicy {
    /// Serve fresh cache entries; fetch when stale or missing.
    #[default]
    CacheFirst,
    /// Always fetch and overwrite the cache entry.
    NetworkOnly,
}

/// Key of the single-business query.
#[inline]
#[must_use]
pub fn business_key(id: &BusinessId) -> QueryKey {
    QueryKey::root(BUSINESS).with(id.as_inner())
}

/// Key of the category list query for kind `K`.
#[inline]
#[must_use]
pub fn categories_key<K: CategoryKind>() -> QueryKey {
    QueryKey::root(K::CACHE_KEY)
}

/// Keys invalidated by a business status change or deletion.
fn business_mutation_keys(id: &BusinessId) -> [QueryKey; 2] {
    [QueryKey::root(BUSINESSES), business_key(id)]
}

/// Keys invalidated by a notification create or delete.
fn notification_mutation_keys() -> [QueryKey; 2] {
    [
        QueryKey::root(NOTIFICATIONS),
        QueryKey::root(NOTIFICATION_STATS),
    ]
}

/// Checks that `action` applies to `business` and builds the request body.
fn status_update(
    business: &Business,
    action: StatusAction,
    reason: Option<&str>,
) -> Result<StatusUpdate> {
    if !business.status.allows(action) {
        let mut errors = FieldErrors::new();
        errors.push("status", "Action not allowed for the current status");
        return Err(AdminError::Validation(errors));
    }
    validate_status_reason(action, reason)?;
    Ok(StatusUpdate {
        status: action.target(),
        reason: reason
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_owned),
    })
}

/// Serves a query from the cache while fresh, otherwise evaluates `$fetch`
/// and stores its result.
macro_rules! cached_query {
    ($self:ident, $key:expr, $fetch:expr) => {{
        let key = $key;
        if $self.policy == FetchPolicy::CacheFirst {
            if let Some(hit) = cache::read_fresh(&$self.cache, &key, Utc::now())? {
                return Ok(hit);
            }
        }
        let fresh = $fetch?;
        cache::write(&$self.cache, key, &fresh, Utc::now())?;
        Ok(fresh)
    }};
}

/// Generates a high-level admin client (async or blocking) with builder
/// and methods.
macro_rules! define_admin {
    (
        client_name: $client:ident,
        builder_name: $builder:ident,
        http_client: $http_client:ty,
        client_doc: $client_doc:expr,
        builder_doc: $builder_doc:expr,
        $(async_kw: $async_kw:tt,)?
        $(await_kw: $await_ext:tt,)?
    ) => {
        #[doc = $builder_doc]
        #[derive(Debug)]
        pub struct $builder<C: CacheStore> {
            /// Session token.
            token: Option<String>,
            /// Base URL override.
            base_url: Option<String>,
            /// Cache backend.
            cache: Option<C>,
            /// Cache policy for queries.
            policy: FetchPolicy,
        }

        impl<C: CacheStore> $builder<C> {
            /// Sets the session token sent as a bearer credential.
            #[inline]
            #[must_use]
            pub fn token<T: Into<String>>(mut self, token: T) -> Self {
                self.token = Some(token.into());
                self
            }

            /// Overrides the base URL.
            #[inline]
            #[must_use]
            pub fn base_url<T: Into<String>>(mut self, url: T) -> Self {
                self.base_url = Some(url.into());
                self
            }

            /// Sets the cache backend.
            #[inline]
            #[must_use]
            pub fn cache(mut self, cache: C) -> Self {
                self.cache = Some(cache);
                self
            }

            /// Sets the cache policy for queries.
            #[inline]
            #[must_use]
            pub const fn policy(mut self, policy: FetchPolicy) -> Self {
                self.policy = policy;
                self
            }

            /// Builds the high-level client.
            ///
            /// # Errors
            ///
            /// Returns [`AdminError::MissingToken`] if no token was provided.
            /// Returns [`AdminError::Cache`] if no cache was provided.
            /// Returns [`AdminError::Http`] if the HTTP client fails to build.
            #[inline]
            pub fn build(self) -> Result<$client<C>> {
                let cache = self
                    .cache
                    .ok_or_else(|| AdminError::Cache("cache backend is required".into()))?;

                let mut http_builder =
                    <$http_client>::builder().token(self.token.ok_or(AdminError::MissingToken)?);
                if let Some(url) = self.base_url {
                    http_builder = http_builder.base_url(url);
                }
                let client = http_builder.build()?;

                Ok($client {
                    client,
                    cache,
                    policy: self.policy,
                })
            }
        }

        #[doc = $client_doc]
        #[derive(Debug)]
        pub struct $client<C: CacheStore> {
            /// Low-level HTTP client.
            client: $http_client,
            /// Query cache.
            cache: C,
            /// Cache policy for queries.
            policy: FetchPolicy,
        }

        impl<C: CacheStore> $client<C> {
            /// Creates a new builder for configuring the client.
            #[inline]
            #[must_use]
            pub const fn builder() -> $builder<C> {
                $builder {
                    token: None,
                    base_url: None,
                    cache: None,
                    policy: FetchPolicy::CacheFirst,
                }
            }

            // ── Queries ─────────────────────────────────────────────

            /// Returns all businesses.
            ///
            /// # Errors
            ///
            /// Returns an error if the cache or the HTTP request fails.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn businesses(&self) -> Result<Vec<Business>> {
                cached_query!(self, QueryKey::root(BUSINESSES),
                    self.client.businesses() $( .$await_ext )?)
            }

            /// Returns all business documents.
            ///
            /// # Errors
            ///
            /// Returns an error if the cache or the HTTP request fails.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn business_documents(&self) -> Result<Vec<BusinessDocument>> {
                cached_query!(self, QueryKey::root(BUSINESS_DOCUMENTS),
                    self.client.business_documents() $( .$await_ext )?)
            }

            /// Returns one business.
            ///
            /// # Errors
            ///
            /// Returns an error if the cache or the HTTP request fails.
            #[tracing::instrument(skip_all, fields(id = %id))]
            pub $($async_kw)? fn business(&self, id: &BusinessId) -> Result<Business> {
                cached_query!(self, business_key(id),
                    self.client.business(id) $( .$await_ext )?)
            }

            /// Returns the documents uploaded by one business.
            ///
            /// # Errors
            ///
            /// Returns an error if the cache or the HTTP request fails.
            #[inline]
            pub $($async_kw)? fn documents_of(&self, id: &BusinessId) -> Result<Vec<BusinessDocument>> {
                let documents = self.business_documents() $( .$await_ext )? ?;
                Ok(documents
                    .into_iter()
                    .filter(|doc| &doc.business_id == id)
                    .collect())
            }

            /// Returns the categories of kind `K`.
            ///
            /// # Errors
            ///
            /// Returns an error if the cache or the HTTP request fails.
            #[tracing::instrument(skip_all, fields(kind = K::SLUG))]
            pub $($async_kw)? fn categories<K: CategoryKind>(&self) -> Result<Vec<Category<K>>> {
                cached_query!(self, categories_key::<K>(),
                    self.client.categories::<K>() $( .$await_ext )?)
            }

            /// Returns all client users.
            ///
            /// # Errors
            ///
            /// Returns an error if the cache or the HTTP request fails.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn clients(&self) -> Result<Vec<User>> {
                cached_query!(self, QueryKey::root(CLIENTS),
                    self.client.clients() $( .$await_ext )?)
            }

            /// Returns all notifications.
            ///
            /// # Errors
            ///
            /// Returns an error if the cache or the HTTP request fails.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn notifications(&self) -> Result<Vec<Notification>> {
                cached_query!(self, QueryKey::root(NOTIFICATIONS),
                    self.client.notifications() $( .$await_ext )?)
            }

            /// Returns notification statistics computed from the list.
            ///
            /// # Errors
            ///
            /// Returns an error if the cache or the HTTP request fails.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn notification_stats(&self) -> Result<NotificationStats> {
                cached_query!(self, QueryKey::root(NOTIFICATION_STATS),
                    self.notifications() $( .$await_ext )?
                        .map(|list| NotificationStats::from_notifications(&list)))
            }

            /// Returns the points configuration.
            ///
            /// # Errors
            ///
            /// Returns an error if the cache or the HTTP request fails.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn points_config(&self) -> Result<PointsConfig> {
                cached_query!(self, QueryKey::root(POINTS_CONFIG),
                    self.client.points_config() $( .$await_ext )?)
            }

            // ── Mutations ───────────────────────────────────────────

            /// Applies an admin status action to a business.
            ///
            /// # Errors
            ///
            /// Returns [`AdminError::Validation`] if the action does not apply
            /// to the business's current status or a required reason is
            /// missing, or an error if the HTTP request fails.
            #[tracing::instrument(skip_all, fields(id = %business.id, action = action.verb()))]
            pub $($async_kw)? fn update_business_status(
                &self,
                business: &Business,
                action: StatusAction,
                reason: Option<&str>,
            ) -> Result<()> {
                let update = status_update(business, action, reason)?;
                self.client
                    .update_business_status(&business.id, &update)
                    $( .$await_ext )? ?;
                self.invalidate_all(&business_mutation_keys(&business.id))
            }

            /// Records a review verdict for a business document.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails.
            #[tracing::instrument(skip_all, fields(id = %id))]
            pub $($async_kw)? fn update_document_status(
                &self,
                id: &DocumentId,
                review: DocumentReview,
            ) -> Result<()> {
                self.client.update_document_status(id, review) $( .$await_ext )? ?;
                self.invalidate_all(&[QueryKey::root(BUSINESS_DOCUMENTS)])
            }

            /// Deletes a business.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails.
            #[tracing::instrument(skip_all, fields(id = %id))]
            pub $($async_kw)? fn delete_business(&self, id: &BusinessId) -> Result<()> {
                self.client.delete_business(id) $( .$await_ext )? ?;
                self.invalidate_all(&business_mutation_keys(id))
            }

            /// Creates a category of kind `K`.
            ///
            /// # Errors
            ///
            /// Returns [`AdminError::Validation`] if the form is invalid, or an
            /// error if the HTTP request fails.
            #[tracing::instrument(skip_all, fields(kind = K::SLUG))]
            pub $($async_kw)? fn create_category<K: CategoryKind>(&self, form: &CategoryForm) -> Result<()> {
                validate_category_form(form, true)?;
                self.client.create_category::<K>(form) $( .$await_ext )? ?;
                self.invalidate_all(&[categories_key::<K>()])
            }

            /// Updates a category of kind `K`.
            ///
            /// # Errors
            ///
            /// Returns [`AdminError::Validation`] if the form is invalid, or an
            /// error if the HTTP request fails.
            #[tracing::instrument(skip_all, fields(kind = K::SLUG, id = %id))]
            pub $($async_kw)? fn update_category<K: CategoryKind>(
                &self,
                id: &CategoryId<K>,
                form: &CategoryForm,
            ) -> Result<()> {
                validate_category_form(form, false)?;
                self.client.update_category::<K>(id, form) $( .$await_ext )? ?;
                self.invalidate_all(&[categories_key::<K>()])
            }

            /// Deletes a category of kind `K`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails.
            #[tracing::instrument(skip_all, fields(kind = K::SLUG, id = %id))]
            pub $($async_kw)? fn delete_category<K: CategoryKind>(&self, id: &CategoryId<K>) -> Result<()> {
                self.client.delete_category::<K>(id) $( .$await_ext )? ?;
                self.invalidate_all(&[categories_key::<K>()])
            }

            /// Creates a notification.
            ///
            /// # Errors
            ///
            /// Returns [`AdminError::Validation`] if the title or body is
            /// blank, or an error if the HTTP request fails.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn create_notification(&self, notification: &NewNotification) -> Result<()> {
                validate_notification(notification)?;
                self.client.create_notification(notification) $( .$await_ext )? ?;
                self.invalidate_all(&notification_mutation_keys())
            }

            /// Deletes a notification.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails.
            #[tracing::instrument(skip_all, fields(id = %id))]
            pub $($async_kw)? fn delete_notification(&self, id: &NotificationId) -> Result<()> {
                self.client.delete_notification(id) $( .$await_ext )? ?;
                self.invalidate_all(&notification_mutation_keys())
            }

            /// Stores a new pesos-per-point rate entered as text.
            ///
            /// # Errors
            ///
            /// Returns [`AdminError::Validation`] if the value is not a
            /// positive number, or an error if the HTTP request fails.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn update_points_config(&self, value: &str) -> Result<PointsConfig> {
                let _rate = validate_points_form(value)?;
                let config = PointsConfig::credits_cost(value.trim());
                self.client.update_points_config(&config) $( .$await_ext )? ?;
                self.invalidate_all(&[QueryKey::root(POINTS_CONFIG)])?;
                Ok(config)
            }

            // ── Cache control ───────────────────────────────────────

            /// Invalidates every entry under `prefix`.
            ///
            /// # Errors
            ///
            /// Returns an error if the cache backend fails to write.
            #[inline]
            pub fn invalidate(&self, prefix: &QueryKey) -> Result<usize> {
                self.cache.invalidate(prefix)
            }

            /// Discards all cached session data.
            ///
            /// # Errors
            ///
            /// Returns an error if the cache backend fails to write.
            #[inline]
            pub fn sign_out(&self) -> Result<()> {
                tracing::info!("discarding session cache");
                self.cache.clear()
            }

            /// Returns a reference to the underlying HTTP client.
            #[inline]
            #[must_use]
            pub const fn inner_client(&self) -> &$http_client {
                &self.client
            }

            /// Returns a reference to the cache backend.
            #[inline]
            #[must_use]
            pub const fn cache(&self) -> &C {
                &self.cache
            }

            /// Invalidates each key after a successful mutation.
            fn invalidate_all(&self, keys: &[QueryKey]) -> Result<()> {
                for key in keys {
                    let removed = self.cache.invalidate(key)?;
                    tracing::debug!(key = %key, removed, "invalidated cache key");
                }
                Ok(())
            }
        }
    };
}

// ── Async variant ───────────────────────────────────────────────────────

#[cfg(feature = "async")]
mod async_admin {
    //! Async high-level admin client.

    use chrono::Utc;

    use super::{FetchPolicy, business_key, business_mutation_keys, categories_key,
        notification_mutation_keys, status_update};
    use crate::cache::{
        self, BUSINESS_DOCUMENTS, BUSINESSES, CLIENTS, CacheStore, NOTIFICATION_STATS,
        NOTIFICATIONS, POINTS_CONFIG, QueryKey,
    };
    use crate::client::AdminClient;
    use crate::error::{AdminError, Result};
    use crate::filters::NotificationStats;
    use crate::models::{
        Business, BusinessDocument, BusinessId, Category, CategoryForm, CategoryId, CategoryKind,
        DocumentId, DocumentReview, NewNotification, Notification, NotificationId, PointsConfig,
        StatusAction, User,
    };
    use crate::validation::{validate_category_form, validate_notification, validate_points_form};

    define_admin! {
        client_name: Admin,
        builder_name: AdminBuilder,
        http_client: AdminClient,
        client_doc: "High-level async admin client with an integrated query cache.\n\nUse [`Admin::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing an [`Admin`] client.",
        async_kw: async,
        await_kw: await,
    }
}

// ── Blocking variant ────────────────────────────────────────────────────

#[cfg(feature = "blocking")]
mod blocking_admin {
    //! Blocking high-level admin client.

    use chrono::Utc;

    use super::{FetchPolicy, business_key, business_mutation_keys, categories_key,
        notification_mutation_keys, status_update};
    use crate::cache::{
        self, BUSINESS_DOCUMENTS, BUSINESSES, CLIENTS, CacheStore, NOTIFICATION_STATS,
        NOTIFICATIONS, POINTS_CONFIG, QueryKey,
    };
    use crate::client::AdminBlockingClient;
    use crate::error::{AdminError, Result};
    use crate::filters::NotificationStats;
    use crate::models::{
        Business, BusinessDocument, BusinessId, Category, CategoryForm, CategoryId, CategoryKind,
        DocumentId, DocumentReview, NewNotification, Notification, NotificationId, PointsConfig,
        StatusAction, User,
    };
    use crate::validation::{validate_category_form, validate_notification, validate_points_form};

    define_admin! {
        client_name: AdminBlocking,
        builder_name: AdminBlockingBuilder,
        http_client: AdminBlockingClient,
        client_doc: "High-level blocking admin client with an integrated query cache.\n\nUse [`AdminBlocking::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing an [`AdminBlocking`] client.",
    }
}

#[cfg(feature = "async")]
pub use async_admin::{Admin, AdminBuilder};
#[cfg(feature = "blocking")]
pub use blocking_admin::{AdminBlocking, AdminBlockingBuilder};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BusinessStatus;
    use crate::models::fixtures;

    #[test]
    fn status_update_checks_transition() {
        let pending = fixtures::business("b-1", "Shop", BusinessStatus::Pending, true);
        let update = status_update(&pending, StatusAction::Approve, None).unwrap();
        assert_eq!(update.status, BusinessStatus::Accepted);
        assert!(update.reason.is_none());

        let err = status_update(&pending, StatusAction::Suspend, Some("x")).unwrap_err();
        match err {
            AdminError::Validation(errors) => assert!(errors.get("status").is_some()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn status_update_requires_and_trims_reason() {
        let accepted = fixtures::business("b-1", "Shop", BusinessStatus::Accepted, true);
        assert!(matches!(
            status_update(&accepted, StatusAction::Suspend, None),
            Err(AdminError::Validation(_))
        ));
        let update = status_update(&accepted, StatusAction::Suspend, Some("  Fraud  ")).unwrap();
        assert_eq!(update.status, BusinessStatus::Suspended);
        assert_eq!(update.reason.as_deref(), Some("Fraud"));
    }

    #[test]
    fn mutation_keys() {
        let id = BusinessId::from("b-1");
        let [list, item] = business_mutation_keys(&id);
        assert_eq!(list, QueryKey::root(BUSINESSES));
        assert_eq!(item.segments(), ["business", "b-1"]);
        assert_eq!(
            categories_key::<crate::models::ProductKind>(),
            QueryKey::root("product-categories")
        );
    }
}

#[cfg(all(test, feature = "async"))]
mod async_tests {
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::cache::InMemoryCache;
    use crate::models::{BusinessKind, BusinessStatus, CategoryForm, Destination, NewNotification};

    fn business_json(id: &str, status: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": format!("Business {id}"),
            "status": status,
            "userId": "owner",
            "createdAt": "2025-01-10T12:00:00Z",
            "updatedAt": "2025-01-10T12:00:00Z"
        })
    }

    fn admin(server: &MockServer) -> Admin<InMemoryCache> {
        Admin::builder()
            .token("session-token")
            .base_url(server.uri())
            .cache(InMemoryCache::new())
            .build()
            .unwrap()
    }

    async fn mount_businesses(server: &MockServer, expected_calls: u64) {
        Mock::given(method("GET"))
            .and(path("/businesses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": {"businesses": [business_json("b-1", "Pending")]}
            })))
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn builder_requires_cache() {
        let result = Admin::<InMemoryCache>::builder().token("t").build();
        assert!(matches!(result, Err(AdminError::Cache(_))));
    }

    #[tokio::test]
    async fn fresh_cache_entry_skips_network() {
        let server = MockServer::start().await;
        mount_businesses(&server, 1).await;

        let api = admin(&server);
        assert_eq!(api.businesses().await.unwrap().len(), 1);
        assert_eq!(api.businesses().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn network_only_policy_always_fetches() {
        let server = MockServer::start().await;
        mount_businesses(&server, 2).await;

        let api = Admin::builder()
            .token("t")
            .base_url(server.uri())
            .cache(InMemoryCache::new())
            .policy(FetchPolicy::NetworkOnly)
            .build()
            .unwrap();
        let _first = api.businesses().await.unwrap();
        let _second = api.businesses().await.unwrap();
    }

    #[tokio::test]
    async fn successful_mutation_invalidates_list() {
        let server = MockServer::start().await;
        mount_businesses(&server, 2).await;
        Mock::given(method("PUT"))
            .and(path("/business/status"))
            .and(query_param("id", "b-1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let api = admin(&server);
        let businesses = api.businesses().await.unwrap();
        api.update_business_status(&businesses[0], StatusAction::Approve, None)
            .await
            .unwrap();
        let _refetched = api.businesses().await.unwrap();
    }

    #[tokio::test]
    async fn failed_mutation_keeps_cache() {
        let server = MockServer::start().await;
        mount_businesses(&server, 1).await;
        Mock::given(method("DELETE"))
            .and(path("/business"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
            .mount(&server)
            .await;

        let api = admin(&server);
        let _cached = api.businesses().await.unwrap();
        let err = api.delete_business(&BusinessId::from("b-1")).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(api.businesses().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn invalid_status_action_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let api = admin(&server);
        let rejected = crate::models::fixtures::business("b-1", "x", BusinessStatus::Rejected, false);
        let err = api
            .update_business_status(&rejected, StatusAction::Approve, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::Validation(_)));
    }

    #[tokio::test]
    async fn invalid_category_form_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let form = CategoryForm {
            name: "A".to_owned(),
            image: None,
        };
        let err = admin(&server)
            .create_category::<BusinessKind>(&form)
            .await
            .unwrap_err();
        let AdminError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.len(), 2);
    }

    #[tokio::test]
    async fn notification_mutation_invalidates_list_and_stats() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/notifications"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": {"notifications": [{
                    "id": "n-1",
                    "title": "Hi",
                    "body": "There",
                    "status": "SENT",
                    "createdAt": "2025-01-10T12:00:00Z",
                    "updatedAt": "2025-01-10T12:00:00Z"
                }]}
            })))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/notification"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let api = admin(&server);
        let stats = api.notification_stats().await.unwrap();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.sent, 1);
        let _from_cache = api.notification_stats().await.unwrap();

        api.create_notification(&NewNotification {
            title: "New".to_owned(),
            body: "Body".to_owned(),
            destination: Destination::All,
            delivery_date: None,
            data: serde_json::Map::new(),
        })
        .await
        .unwrap();
        let _refetched = api.notification_stats().await.unwrap();
    }

    #[tokio::test]
    async fn points_update_validates_and_invalidates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/configuration"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": {"id": "CREDITS_COST", "value": "100"}
            })))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/admin/configuration"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let api = admin(&server);
        let _initial = api.points_config().await.unwrap();
        assert!(matches!(
            api.update_points_config("0").await,
            Err(AdminError::Validation(_))
        ));
        let saved = api.update_points_config(" 120 ").await.unwrap();
        assert_eq!(saved.value, "120");
        let _refetched = api.points_config().await.unwrap();
    }

    #[tokio::test]
    async fn sign_out_clears_cache() {
        let server = MockServer::start().await;
        mount_businesses(&server, 2).await;

        let api = admin(&server);
        let _first = api.businesses().await.unwrap();
        api.sign_out().unwrap();
        assert_eq!(api.cache().len().unwrap(), 0);
        let _second = api.businesses().await.unwrap();
    }
}
