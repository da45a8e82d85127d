// src/robots/cache.rs
// =============================================================================
// A robots.txt cache shared by every worker of a check run.
//
// How it works:
// 1. Split the target URL into domain (host[:port]) and path
// 2. Look the domain up under a read lock
// 3. On a miss, fetch and parse robots.txt with NO lock held
// 4. Store the policy under a write lock; it is never expired
//
// Two workers that meet a new domain at the same time may both fetch its
// robots.txt. Both produce the same policy, and whichever writes last wins.
//
// Rust concepts:
// - tokio::sync::RwLock: Many readers or one writer, and safe to use in async
// - Arc: Policies are shared by reference count instead of cloned
// =============================================================================

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use reqwest::{Client, StatusCode};
use tokio::sync::RwLock;
use tracing::debug;
use url::{Position, Url};

use super::policy::RobotsPolicy;
use crate::config::RobotsFailMode;
use crate::models::ProbeError;

pub struct RobotsCache {
    client: Client,
    fail_mode: RobotsFailMode,
    policies: RwLock<HashMap<String, Arc<RobotsPolicy>>>,
}

impl RobotsCache {
    pub fn new(client: Client, fail_mode: RobotsFailMode) -> Self {
        RobotsCache {
            client,
            fail_mode,
            policies: RwLock::new(HashMap::new()),
        }
    }

    // Checks whether robots.txt lets us request `target_url`
    //
    // Returns:
    //   Ok(true)  = allowed (also when robots.txt is missing or unreachable
    //               and the fail mode is Open)
    //   Ok(false) = a disallow rule matches the path
    //   Err       = the URL could not be parsed
    pub async fn is_allowed(&self, target_url: &str) -> Result<bool, ProbeError> {
        let url = Url::parse(target_url).map_err(|e| ProbeError::InvalidUrl {
            detail: format!("{}: {}", target_url, e),
        })?;
        self.is_allowed_url(&url).await
    }

    /// Same as [`RobotsCache::is_allowed`] for an already parsed URL.
    pub async fn is_allowed_url(&self, url: &Url) -> Result<bool, ProbeError> {
        let domain = domain_of(url).ok_or_else(|| ProbeError::InvalidUrl {
            detail: format!("{}: URL has no host", url),
        })?;
        let path = match url.path() {
            "" => "/",
            path => path,
        };

        let policy = match self.policy(&domain).await {
            Some(policy) => policy,
            None => {
                debug!(domain = domain.as_str(), "robots.txt cache miss");
                let policy = Arc::new(self.fetch_policy(url.scheme(), &domain).await);
                self.policies
                    .write()
                    .await
                    .insert(domain, Arc::clone(&policy));
                policy
            }
        };

        Ok(policy.allows(path))
    }

    /// The cached policy for `domain`, if robots.txt was already looked up.
    pub async fn policy(&self, domain: &str) -> Option<Arc<RobotsPolicy>> {
        self.policies.read().await.get(domain).cloned()
    }

    /// Number of domains with a cached policy.
    pub async fn len(&self) -> usize {
        self.policies.read().await.len()
    }

    // Fetches and parses robots.txt, never failing
    //
    // 404 means "no rules"; anything else that isn't a 200 (or a network
    // error) means robots.txt is unavailable and the fail mode decides.
    async fn fetch_policy(&self, scheme: &str, domain: &str) -> RobotsPolicy {
        let robots_url = format!("{}://{}/robots.txt", scheme, domain);

        match self.fetch_robots_txt(&robots_url).await {
            Ok(Some(body)) => RobotsPolicy::parse(&body),
            Ok(None) => RobotsPolicy::not_found(),
            Err(e) => {
                debug!(%robots_url, error = %e, mode = ?self.fail_mode, "robots.txt unavailable");
                RobotsPolicy::unavailable(self.fail_mode)
            }
        }
    }

    // Returns Ok(None) for 404, Ok(Some(body)) for 200, Err otherwise
    async fn fetch_robots_txt(&self, robots_url: &str) -> Result<Option<String>> {
        let response = self.client.get(robots_url).send().await?;

        match response.status() {
            StatusCode::OK => Ok(Some(response.text().await?)),
            StatusCode::NOT_FOUND => Ok(None),
            other => Err(anyhow!("HTTP {}", other)),
        }
    }
}

// The cache key: host plus an explicit port, without scheme or userinfo
//
// Examples:
//   http://example.com/a       -> "example.com"
//   http://user@127.0.0.1:8080 -> "127.0.0.1:8080"
fn domain_of(url: &Url) -> Option<String> {
    url.host_str()?;
    Some(url[Position::BeforeHost..Position::AfterPort].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{build_client, CheckerConfig};
    use crate::test_support::{robots_route, spawn_server, status_route, unreachable_base, Hits};
    use axum::http::StatusCode as AxumStatus;
    use axum::Router;

    fn cache(mode: RobotsFailMode) -> RobotsCache {
        let client = build_client(&CheckerConfig::default()).unwrap();
        RobotsCache::new(client, mode)
    }

    #[test]
    fn test_domain_of() {
        let url = Url::parse("http://example.com/a/b").unwrap();
        assert_eq!(domain_of(&url).as_deref(), Some("example.com"));

        let url = Url::parse("http://user:pw@127.0.0.1:8080/x").unwrap();
        assert_eq!(domain_of(&url).as_deref(), Some("127.0.0.1:8080"));

        let url = Url::parse("mailto:someone@example.com").unwrap();
        assert_eq!(domain_of(&url), None);
    }

    #[tokio::test]
    async fn test_disallow_rule_is_enforced() {
        let hits = Hits::default();
        let router = robots_route(Router::new(), "User-agent: *\nDisallow: /private\n", hits.clone());
        let base = spawn_server(router).await;
        let cache = cache(RobotsFailMode::Open);

        let private = cache.is_allowed(&format!("{}/private/x", base)).await;
        let public = cache.is_allowed(&format!("{}/public", base)).await;

        assert_eq!(private, Ok(false));
        assert_eq!(public, Ok(true));
        assert_eq!(hits.get(), 1, "robots.txt must be fetched once per domain");
    }

    #[tokio::test]
    async fn test_not_found_is_cached_as_allowed() {
        let hits = Hits::default();
        let router = status_route(Router::new(), "/robots.txt", AxumStatus::NOT_FOUND, hits.clone());
        let base = spawn_server(router).await;
        let cache = cache(RobotsFailMode::Open);

        assert_eq!(cache.is_allowed(&format!("{}/a", base)).await, Ok(true));
        assert_eq!(cache.is_allowed(&format!("{}/b", base)).await, Ok(true));
        assert_eq!(hits.get(), 1);

        let domain = base.trim_start_matches("http://");
        let policy = cache.policy(domain).await.unwrap();
        assert!(policy.fetched);
        assert!(policy.disallowed_prefixes.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_fails_open_and_is_cached() {
        let hits = Hits::default();
        let router = status_route(
            Router::new(),
            "/robots.txt",
            AxumStatus::INTERNAL_SERVER_ERROR,
            hits.clone(),
        );
        let base = spawn_server(router).await;
        let cache = cache(RobotsFailMode::Open);

        assert_eq!(cache.is_allowed(&format!("{}/a", base)).await, Ok(true));
        assert_eq!(cache.is_allowed(&format!("{}/a", base)).await, Ok(true));
        assert_eq!(hits.get(), 1);

        let domain = base.trim_start_matches("http://");
        assert!(!cache.policy(domain).await.unwrap().fetched);
    }

    #[tokio::test]
    async fn test_unreachable_fails_open_and_is_cached() {
        let base = unreachable_base();
        let cache = cache(RobotsFailMode::Open);

        assert_eq!(cache.is_allowed(&format!("{}/x", base)).await, Ok(true));
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.is_allowed(&format!("{}/y", base)).await, Ok(true));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_unreachable_fails_closed_in_strict_mode() {
        let base = unreachable_base();
        let cache = cache(RobotsFailMode::Closed);

        assert_eq!(cache.is_allowed(&format!("{}/x", base)).await, Ok(false));
        assert_eq!(cache.is_allowed(&base).await, Ok(false));
    }

    #[tokio::test]
    async fn test_invalid_url_is_an_error() {
        let cache = cache(RobotsFailMode::Open);
        let result = cache.is_allowed("not a url").await;
        assert!(matches!(result, Err(ProbeError::InvalidUrl { .. })));
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_concurrent_first_checks_agree() {
        let hits = Hits::default();
        let router = robots_route(Router::new(), "User-agent: *\nDisallow: /no\n", hits.clone());
        let base = spawn_server(router).await;
        let cache = Arc::new(cache(RobotsFailMode::Open));

        let mut handles = Vec::new();
        for i in 0..8 {
            let cache = Arc::clone(&cache);
            let url = format!("{}/no/{}", base, i);
            handles.push(tokio::spawn(async move { cache.is_allowed(&url).await }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap(), Ok(false));
        }

        assert_eq!(cache.len().await, 1);
        assert!(hits.get() >= 1);
    }
}
