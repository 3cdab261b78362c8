// src/services/brands.rs

//! Brand resolver.
//!
//! A brand banner links to `/brands/<token>`, optionally narrowed to one
//! supplier with an `fsupplier` parameter. The brand's static document maps
//! the token to a catalog brand id.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{BannerDescriptor, BrandKey, Config, Identifier, ProductLink};
use crate::services::catalog::fetch_product_links;
use crate::utils::url::{join, segment, strip_query};
use crate::utils::{Fetcher, fetch_json};

const SUPPLIER_MARKER: &str = "fsupplier";

#[derive(Debug, Deserialize)]
struct BrandDocument {
    id: Identifier,
}

/// Brand token: third raw `/` segment of the link, without a query.
pub fn brand_token(link_path: &str) -> Option<&str> {
    segment(link_path, 2)
        .map(strip_query)
        .filter(|token| !token.is_empty())
}

/// Supplier qualifier following `fsupplier` up to the next `/` or `&`.
///
/// The `=` between marker and value is not part of the qualifier.
pub fn supplier_qualifier(link_path: &str) -> Option<String> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    let pattern = PATTERN
        .get_or_init(|| Regex::new(&format!("{SUPPLIER_MARKER}=?([^/&]*)")).ok())
        .as_ref()?;

    pattern
        .captures(link_path)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|value| !value.is_empty())
}

/// Resolves brand banners to product links.
pub struct BrandResolver {
    config: Arc<Config>,
    fetcher: Arc<dyn Fetcher>,
}

impl BrandResolver {
    pub fn new(config: Arc<Config>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { config, fetcher }
    }

    /// Stage 1: map the link's brand token to a brand id.
    pub async fn resolve_key(&self, banner: &BannerDescriptor) -> Result<BrandKey> {
        let token = brand_token(&banner.link_path).ok_or_else(|| {
            AppError::contract(
                "brand link",
                format!("no brand token in {:?}", banner.link_path),
            )
        })?;

        let url = join(
            &self.config.endpoints.brand_static_base,
            &format!("{token}.json"),
        );
        let document: BrandDocument =
            fetch_json(self.fetcher.as_ref(), &url, &[], "brand document").await?;

        Ok(BrandKey {
            brand_id: document.id.to_string(),
            supplier: supplier_qualifier(&banner.link_path),
        })
    }

    /// Catalog query for a brand key. The supplier pair is added only when
    /// the link carried one.
    pub fn catalog_query(&self, key: &BrandKey) -> Vec<(String, String)> {
        let mut query = vec![("brand".to_string(), key.brand_id.clone())];
        if let Some(supplier) = &key.supplier {
            query.push((SUPPLIER_MARKER.to_string(), supplier.clone()));
        }
        query.extend(self.config.catalog.query());
        query
    }

    /// Stage 2: list the brand's products.
    pub async fn fetch_products(&self, key: &BrandKey) -> Result<Vec<ProductLink>> {
        fetch_product_links(
            self.fetcher.as_ref(),
            &self.config.endpoints,
            &self.config.endpoints.brand_catalog_url,
            &self.catalog_query(key),
            "brand catalog",
        )
        .await
    }

    /// Both stages; the first failure short-circuits.
    pub async fn resolve(&self, banner: &BannerDescriptor) -> Result<Vec<ProductLink>> {
        let key = self.resolve_key(banner).await?;
        log::debug!(
            "Banner {} -> brand {} (supplier {:?})",
            banner.id,
            key.brand_id,
            key.supplier
        );
        self.fetch_products(&key).await
    }
}
