// src/services/promotions.rs

//! Promotion resolver.
//!
//! A promotion banner links to `/promotions/<slug>`. The static document
//! `<slug>-v3.json` names the promotion id and the search shard serving it;
//! the sharded search then lists the products.

use std::sync::Arc;

use serde::Deserialize;

use crate::error::Result;
use crate::models::{BannerDescriptor, Config, Identifier, ProductLink, PromotionKey};
use crate::services::catalog::fetch_product_links;
use crate::utils::url::{join, last_segment, strip_query};
use crate::utils::{Fetcher, fetch_json};

/// Suffix of the per-promotion static document.
const STATIC_SUFFIX: &str = "-v3.json";

#[derive(Debug, Deserialize)]
struct PromotionDocument {
    promo: PromotionInfo,
}

#[derive(Debug, Deserialize)]
struct PromotionInfo {
    id: Identifier,
    #[serde(rename = "shardKey")]
    shard_key: String,
}

/// Resolves promotion banners to product links.
pub struct PromotionResolver {
    config: Arc<Config>,
    fetcher: Arc<dyn Fetcher>,
}

impl PromotionResolver {
    pub fn new(config: Arc<Config>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { config, fetcher }
    }

    /// Static document URL for a banner link.
    pub fn static_url(&self, banner: &BannerDescriptor) -> String {
        format!(
            "{}{}",
            join(
                &self.config.endpoints.promotion_static_base,
                strip_query(&banner.link_path)
            ),
            STATIC_SUFFIX
        )
    }

    /// Stage 1: read the promotion id and shard key from the static document.
    pub async fn resolve_key(&self, banner: &BannerDescriptor) -> Result<PromotionKey> {
        let url = self.static_url(banner);
        let document: PromotionDocument =
            fetch_json(self.fetcher.as_ref(), &url, &[], "promotion document").await?;

        Ok(PromotionKey {
            promotion_id: document.promo.id.to_string(),
            shard_key: last_segment(&document.promo.shard_key).to_string(),
        })
    }

    /// Search URL and query for a promotion key.
    pub fn search_request(&self, key: &PromotionKey) -> (String, Vec<(String, String)>) {
        let url = format!(
            "{}/catalog",
            join(&self.config.endpoints.promotion_search_base, &key.shard_key)
        );
        let mut query = vec![
            ("preset".to_string(), key.promotion_id.clone()),
            ("regions".to_string(), self.config.catalog.regions_param()),
        ];
        query.extend(self.config.catalog.query());
        (url, query)
    }

    /// Stage 2: list the promotion's products.
    pub async fn fetch_products(&self, key: &PromotionKey) -> Result<Vec<ProductLink>> {
        let (url, query) = self.search_request(key);
        fetch_product_links(
            self.fetcher.as_ref(),
            &self.config.endpoints,
            &url,
            &query,
            "promotion search",
        )
        .await
    }

    /// Both stages; the first failure short-circuits.
    pub async fn resolve(&self, banner: &BannerDescriptor) -> Result<Vec<ProductLink>> {
        let key = self.resolve_key(banner).await?;
        log::debug!(
            "Banner {} -> promotion {} on shard {}",
            banner.id,
            key.promotion_id,
            key.shard_key
        );
        self.fetch_products(&key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::http::testing::ScriptedFetcher;

    const DOC: &str = "https://static-basket-01.wb.ru/vol0/data/promotions/sale-v3.json";
    const SEARCH: &str = "https://search.wb.ru/promo/shardA/catalog";

    fn banner() -> BannerDescriptor {
        BannerDescriptor {
            id: "7".to_string(),
            display_name: "Sale".to_string(),
            link_path: "/promotions/sale?bid=abc".to_string(),
        }
    }

    fn resolver(fetcher: ScriptedFetcher) -> (Arc<ScriptedFetcher>, PromotionResolver) {
        let fetcher = Arc::new(fetcher);
        let resolver = PromotionResolver::new(Arc::new(Config::default()), fetcher.clone());
        (fetcher, resolver)
    }

    #[test]
    fn test_static_url_strips_query() {
        let (_, resolver) = resolver(ScriptedFetcher::new());
        assert_eq!(resolver.static_url(&banner()), DOC);
    }

    #[tokio::test]
    async fn test_resolve_key() {
        let (_, resolver) = resolver(ScriptedFetcher::new().respond(
            DOC,
            r#"{"promo": {"id": "P1", "shardKey": "presets/bucket_3/shardA", "name": "x"}}"#,
        ));
        let key = resolver.resolve_key(&banner()).await.unwrap();
        assert_eq!(
            key,
            PromotionKey {
                promotion_id: "P1".to_string(),
                shard_key: "shardA".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_resolve_key_numeric_id() {
        let (_, resolver) = resolver(
            ScriptedFetcher::new()
                .respond(DOC, r#"{"promo": {"id": 1234, "shardKey": "shardB"}}"#),
        );
        let key = resolver.resolve_key(&banner()).await.unwrap();
        assert_eq!(key.promotion_id, "1234");
        assert_eq!(key.shard_key, "shardB");
    }

    #[tokio::test]
    async fn test_resolve_key_missing_shard() {
        let (_, resolver) =
            resolver(ScriptedFetcher::new().respond(DOC, r#"{"promo": {"id": "P1"}}"#));
        assert!(resolver.resolve_key(&banner()).await.unwrap_err().is_contract());
    }

    #[test]
    fn test_search_request_round_trip() {
        let (_, resolver) = resolver(ScriptedFetcher::new());
        let key = PromotionKey {
            promotion_id: "P1".to_string(),
            shard_key: "shardA".to_string(),
        };
        let (url, query) = resolver.search_request(&key);

        let full = url::Url::parse_with_params(&url, &query).unwrap();
        let segments: Vec<_> = full.path_segments().unwrap().collect();
        assert_eq!(segments, vec!["promo", "shardA", "catalog"]);

        let preset = full
            .query_pairs()
            .find(|(k, _)| k == "preset")
            .map(|(_, v)| v.into_owned());
        assert_eq!(preset.as_deref(), Some("P1"));

        let regions = full
            .query_pairs()
            .find(|(k, _)| k == "regions")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        assert!(regions.starts_with("80,38,83"));
        assert!(full.query_pairs().any(|(k, v)| k == "curr" && v == "rub"));
    }

    #[tokio::test]
    async fn test_resolve_both_stages() {
        let (fetcher, resolver) = resolver(
            ScriptedFetcher::new()
                .respond(DOC, r#"{"promo": {"id": "P1", "shardKey": "a/shardA"}}"#)
                .respond(SEARCH, r#"{"data": {"products": [{"id": 5}]}}"#),
        );
        let links = resolver.resolve(&banner()).await.unwrap();
        assert_eq!(links, vec!["https://www.wildberries.ru/catalog/5/detail.aspx"]);
        assert_eq!(fetcher.call_count(SEARCH), 1);
    }

    #[tokio::test]
    async fn test_stage_one_failure_short_circuits() {
        let (fetcher, resolver) = resolver(
            ScriptedFetcher::new()
                .fail_status(DOC, 404)
                .respond(SEARCH, r#"{"data": {"products": [{"id": 5}]}}"#),
        );
        let err = resolver.resolve(&banner()).await.unwrap_err();
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(fetcher.call_count(SEARCH), 0);
    }
}
