//! Shortening lifecycle and redirect service.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio_retry::RetryIf;
use tracing::{debug, warn};

use crate::domain::entities::{Link, LinkFilter, Metadata, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::identifier::{generate, random_seed, validate_custom_identifier};
use crate::utils::url_normalizer::{normalize_url, short_url};

/// Attempts made with freshly generated identifiers before a collision is
/// surfaced to the caller.
pub const MAX_CREATE_ATTEMPTS: usize = 3;

/// Service for creating, editing and resolving shortened links.
pub struct LinkService {
    links: Arc<dyn LinkRepository>,
    base_url: String,
}

impl LinkService {
    pub fn new(links: Arc<dyn LinkRepository>, base_url: impl Into<String>) -> Self {
        Self {
            links,
            base_url: base_url.into(),
        }
    }

    /// Creates a shortening for `original_url`.
    ///
    /// # Identifier selection
    ///
    /// - A caller-chosen identifier is validated and inserted once; if it is
    ///   taken the collision is returned as is.
    /// - Otherwise an identifier is generated from a random seed, and a
    ///   collision triggers regeneration, up to [`MAX_CREATE_ATTEMPTS`] tries.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a bad URL or identifier and
    /// [`AppError::IdentifierCollision`] once retries are exhausted.
    pub async fn create(
        &self,
        original_url: &str,
        custom_identifier: Option<String>,
        owner_user_id: Option<i64>,
    ) -> Result<Link, AppError> {
        let original_url = normalize_url(original_url)?;

        if let Some(identifier) = custom_identifier {
            validate_custom_identifier(&identifier)?;
            return self
                .links
                .create(NewLink {
                    identifier,
                    original_url,
                    owner_user_id,
                })
                .await;
        }

        let action = || {
            let links = self.links.clone();
            let new_link = NewLink {
                identifier: generate(random_seed()),
                original_url: original_url.clone(),
                owner_user_id,
            };

            async move {
                let result = links.create(new_link).await;
                if let Err(AppError::IdentifierCollision { details, .. }) = &result {
                    metrics::counter!("link_identifier_collisions_total").increment(1);
                    warn!(?details, "Generated identifier collided, regenerating");
                }
                result
            }
        };

        RetryIf::start(
            std::iter::repeat(Duration::ZERO).take(MAX_CREATE_ATTEMPTS - 1),
            action,
            |e: &AppError| matches!(e, AppError::IdentifierCollision { .. }),
        )
        .await
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the identifier does not exist.
    pub async fn get(&self, identifier: &str) -> Result<Link, AppError> {
        self.links.get(identifier).await
    }

    /// Replaces the original URL of a shortening.
    ///
    /// When `expected_version` is given it must match the stored version; the
    /// store re-checks the version read here, so a writer that slips in between
    /// still produces [`AppError::EditConflict`].
    pub async fn update(
        &self,
        identifier: &str,
        original_url: Option<String>,
        expected_version: Option<i32>,
    ) -> Result<Link, AppError> {
        let mut link = self.links.get(identifier).await?;

        if let Some(expected) = expected_version
            && expected != link.version
        {
            return Err(AppError::edit_conflict(json!({
                "identifier": identifier,
                "expected_version": expected,
                "current_version": link.version,
            })));
        }

        if let Some(url) = original_url {
            link.original_url = normalize_url(&url)?;
        }

        self.links.update(&link).await
    }

    pub async fn delete(&self, identifier: &str) -> Result<(), AppError> {
        self.links.delete(identifier).await
    }

    /// Resolves an identifier for a redirect, counting the visit.
    pub async fn resolve(&self, identifier: &str) -> Result<String, AppError> {
        let original_url = self.links.resolve_and_count(identifier).await?;
        metrics::counter!("link_redirects_total").increment(1);
        debug!(identifier, "Resolved shortening");
        Ok(original_url)
    }

    /// Lists a page of shortenings with pagination metadata.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for out-of-range paging.
    pub async fn list(&self, filter: LinkFilter) -> Result<(Vec<Link>, Metadata), AppError> {
        filter.validate()?;

        let (links, total) = self.links.list(&filter).await?;
        let metadata = Metadata::calculate(total, filter.page, filter.page_size);

        Ok((links, metadata))
    }

    pub async fn list_for_owner(&self, user_id: i64) -> Result<Vec<Link>, AppError> {
        self.links.list_for_owner(user_id).await
    }

    /// Public URL for an identifier, rooted at the configured base URL.
    pub fn short_url(&self, identifier: &str) -> Result<String, AppError> {
        short_url(&self.base_url, identifier).map_err(|e| {
            AppError::internal("Invalid base URL", json!({ "reason": e.to_string() }))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Sort;
    use crate::domain::repositories::MockLinkRepository;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_link(identifier: &str, url: &str, version: i32) -> Link {
        Link::new(
            identifier.to_string(),
            url.to_string(),
            Some(1),
            0,
            version,
            Utc::now(),
        )
    }

    fn service(repo: MockLinkRepository) -> LinkService {
        LinkService::new(Arc::new(repo), "http://localhost:3000")
    }

    #[tokio::test]
    async fn test_create_normalizes_url_and_sets_owner() {
        let mut repo = MockLinkRepository::new();
        repo.expect_create()
            .withf(|l| l.original_url == "https://example.com/path" && l.owner_user_id == Some(7))
            .times(1)
            .returning(|l| {
                Ok(Link::new(l.identifier, l.original_url, l.owner_user_id, 0, 1, Utc::now()))
            });

        let link = service(repo)
            .create("HTTPS://EXAMPLE.COM:443/path#frag", None, Some(7))
            .await
            .unwrap();

        assert_eq!(link.original_url, "https://example.com/path");
        assert_eq!(link.version, 1);
        assert!(!link.identifier.is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_url_without_storage() {
        let mut repo = MockLinkRepository::new();
        repo.expect_create().times(0);

        let result = service(repo).create("javascript:alert(1)", None, None).await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_retries_generated_identifier_on_collision() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let mut repo = MockLinkRepository::new();
        repo.expect_create().times(2).returning(move |l| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(AppError::identifier_collision(json!({ "identifier": l.identifier })))
            } else {
                Ok(Link::new(l.identifier, l.original_url, None, 0, 1, Utc::now()))
            }
        });

        let result = service(repo).create("https://example.com", None, None).await;

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_create_gives_up_after_three_collisions() {
        let mut repo = MockLinkRepository::new();
        repo.expect_create()
            .times(MAX_CREATE_ATTEMPTS)
            .returning(|l| Err(AppError::identifier_collision(json!({ "identifier": l.identifier }))));

        let result = service(repo).create("https://example.com", None, None).await;

        assert!(matches!(result, Err(AppError::IdentifierCollision { .. })));
    }

    #[tokio::test]
    async fn test_create_does_not_retry_other_errors() {
        let mut repo = MockLinkRepository::new();
        repo.expect_create()
            .times(1)
            .returning(|_| Err(AppError::transient("timeout", json!({}))));

        let result = service(repo).create("https://example.com", None, None).await;

        assert!(matches!(result, Err(AppError::Transient { .. })));
    }

    #[tokio::test]
    async fn test_custom_identifier_collision_is_not_retried() {
        let mut repo = MockLinkRepository::new();
        repo.expect_create()
            .withf(|l| l.identifier == "promo2025")
            .times(1)
            .returning(|l| Err(AppError::identifier_collision(json!({ "identifier": l.identifier }))));

        let result = service(repo)
            .create("https://example.com", Some("promo2025".to_string()), None)
            .await;

        assert!(matches!(result, Err(AppError::IdentifierCollision { .. })));
    }

    #[tokio::test]
    async fn test_invalid_custom_identifier_is_rejected() {
        let mut repo = MockLinkRepository::new();
        repo.expect_create().times(0);

        let result = service(repo)
            .create("https://example.com", Some("a/b".to_string()), None)
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_update_with_stale_version_conflicts_before_writing() {
        let mut repo = MockLinkRepository::new();
        repo.expect_get()
            .returning(|id| Ok(test_link(id, "https://example.com/", 2)));
        repo.expect_update().times(0);

        let result = service(repo)
            .update("abcd", Some("https://new.example.com".to_string()), Some(1))
            .await;

        assert!(matches!(result, Err(AppError::EditConflict { .. })));
    }

    #[tokio::test]
    async fn test_update_passes_read_version_to_store() {
        let mut repo = MockLinkRepository::new();
        repo.expect_get()
            .returning(|id| Ok(test_link(id, "https://example.com/", 3)));
        repo.expect_update()
            .withf(|l| l.version == 3 && l.original_url == "https://new.example.com/")
            .times(1)
            .returning(|l| {
                let mut updated = l.clone();
                updated.version += 1;
                Ok(updated)
            });

        let link = service(repo)
            .update("abcd", Some("https://NEW.example.com".to_string()), None)
            .await
            .unwrap();

        assert_eq!(link.version, 4);
    }

    #[tokio::test]
    async fn test_update_surfaces_store_conflict() {
        let mut repo = MockLinkRepository::new();
        repo.expect_get()
            .returning(|id| Ok(test_link(id, "https://example.com/", 1)));
        repo.expect_update()
            .returning(|_| Err(AppError::edit_conflict(json!({}))));

        let result = service(repo)
            .update("abcd", Some("https://example.org".to_string()), Some(1))
            .await;

        assert!(matches!(result, Err(AppError::EditConflict { .. })));
    }

    #[tokio::test]
    async fn test_update_missing_link_is_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_get()
            .returning(|id| Err(AppError::not_found("Shortening not found", json!({ "identifier": id }))));

        let result = service(repo).update("nope", None, None).await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_resolve_returns_original_url() {
        let mut repo = MockLinkRepository::new();
        repo.expect_resolve_and_count()
            .withf(|id| id == "nAJf")
            .times(1)
            .returning(|_| Ok("https://example.com/".to_string()));

        let url = service(repo).resolve("nAJf").await.unwrap();

        assert_eq!(url, "https://example.com/");
    }

    #[tokio::test]
    async fn test_list_builds_metadata() {
        let mut repo = MockLinkRepository::new();
        repo.expect_list()
            .withf(|f| f.sort.column() == "visits" && f.sort.descending && f.offset() == 10)
            .returning(|_| {
                Ok((
                    vec![test_link("abcd", "https://example.com/", 1)],
                    11,
                ))
            });

        let filter = LinkFilter {
            sort: Sort::parse("-visits").unwrap(),
            page: 2,
            page_size: 10,
            ..LinkFilter::default()
        };
        let (links, metadata) = service(repo).list(filter).await.unwrap();

        assert_eq!(links.len(), 1);
        assert_eq!(metadata.last_page, 2);
        assert_eq!(metadata.total_records, 11);
    }

    #[tokio::test]
    async fn test_list_rejects_bad_paging_without_storage() {
        let mut repo = MockLinkRepository::new();
        repo.expect_list().times(0);

        let filter = LinkFilter {
            page_size: 0,
            ..LinkFilter::default()
        };

        assert!(service(repo).list(filter).await.is_err());
    }

    #[test]
    fn test_short_url_uses_base_url() {
        let service = service(MockLinkRepository::new());
        assert_eq!(service.short_url("nAJf").unwrap(), "http://localhost:3000/nAJf");
    }
}
