// src/pipeline/run.rs

//! Banner pipeline driver.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};

use crate::error::Result;
use crate::models::{
    BannerDescriptor, BannerResult, ClassifiedBanner, Config, LinkKind, ResultSet,
};
use crate::services::{BannerLister, BrandResolver, PromotionResolver, assemble};
use crate::utils::{Fetcher, HttpTransport};

/// Lists banners and resolves each one to its products.
pub struct BannerPipeline {
    config: Arc<Config>,
    address: Option<String>,
    lister: BannerLister,
    promotions: PromotionResolver,
    brands: BrandResolver,
}

impl BannerPipeline {
    /// Create a pipeline over any fetcher.
    ///
    /// `address` picks feed coordinates from the configured address table;
    /// unknown names and `None` use the default location.
    pub fn new(config: Arc<Config>, fetcher: Arc<dyn Fetcher>, address: Option<String>) -> Self {
        let coordinates = config.location.resolve(address.as_deref());
        Self {
            lister: BannerLister::new(Arc::clone(&config), Arc::clone(&fetcher), coordinates),
            promotions: PromotionResolver::new(Arc::clone(&config), Arc::clone(&fetcher)),
            brands: BrandResolver::new(Arc::clone(&config), fetcher),
            config,
            address,
        }
    }

    /// Create a pipeline backed by the reqwest transport, proxy included.
    pub fn from_config(config: Arc<Config>, address: Option<String>) -> Result<Self> {
        let transport = HttpTransport::new(&config.http)?;
        Ok(Self::new(config, Arc::new(transport), address))
    }

    /// Run once.
    ///
    /// Never fails: when every listing attempt fails the result is empty,
    /// which callers cannot tell apart from a feed with nothing to resolve.
    pub async fn run(&self) -> ResultSet {
        match self.list_with_retry().await {
            Some(banners) => self.process(banners).await,
            None => ResultSet::default(),
        }
    }

    /// Fetch the feed until one attempt yields banners.
    ///
    /// Every attempt is a full re-fetch. Transport failures, non-JSON bodies
    /// and empty feeds consume an attempt; a feed of the wrong shape ends the
    /// loop.
    async fn list_with_retry(&self) -> Option<Vec<BannerDescriptor>> {
        let max_attempts = self.config.pipeline.max_listing_attempts;
        let delay = Duration::from_millis(self.config.pipeline.listing_retry_delay_ms);

        for attempt in 1..=max_attempts {
            match self.lister.list().await {
                Ok(banners) if !banners.is_empty() => {
                    log::info!(
                        "Listed {} banners (attempt {}/{})",
                        banners.len(),
                        attempt,
                        max_attempts
                    );
                    return Some(banners);
                }
                Ok(_) => {
                    log::warn!("Banner feed empty (attempt {}/{})", attempt, max_attempts);
                }
                Err(e) if e.is_contract() => {
                    log::error!("Banner feed rejected: {}", e);
                    return None;
                }
                Err(e) => {
                    log::warn!(
                        "Banner feed failed (attempt {}/{}): {}",
                        attempt,
                        max_attempts,
                        e
                    );
                }
            }

            if attempt < max_attempts && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        log::error!("Banner feed unavailable after {} attempts", max_attempts);
        None
    }

    /// Resolve every banner of one listing, keeping listing order.
    async fn process(&self, banners: Vec<BannerDescriptor>) -> ResultSet {
        let total = banners.len();
        let concurrency = self.config.pipeline.max_concurrent.max(1);

        let resolved: Vec<Option<BannerResult>> =
            stream::iter(banners.into_iter().map(ClassifiedBanner::from))
                .map(|banner| self.resolve_banner(banner))
                .buffered(concurrency)
                .collect()
                .await;

        let results: Vec<BannerResult> = resolved.into_iter().flatten().collect();
        log::info!("Resolved {} of {} banners", results.len(), total);
        ResultSet::new(results)
    }

    /// Resolve one banner; `None` drops it from the output.
    async fn resolve_banner(&self, classified: ClassifiedBanner) -> Option<BannerResult> {
        let ClassifiedBanner { banner, kind } = classified;

        let products = match kind {
            LinkKind::Promotion => self.promotions.resolve(&banner).await,
            LinkKind::Brand => self.brands.resolve(&banner).await,
            LinkKind::Unsupported => {
                log::debug!("Skipping banner {} ({})", banner.id, banner.link_path);
                return None;
            }
        };

        match products {
            Ok(products) if !products.is_empty() => Some(assemble(
                &self.config.endpoints,
                &banner,
                products,
                self.address.as_deref(),
            )),
            Ok(_) => {
                log::info!("Banner {} has no products, skipping", banner.id);
                None
            }
            Err(e) => {
                log::warn!("Banner {} ({}) failed: {}", banner.id, banner.link_path, e);
                None
            }
        }
    }
}
