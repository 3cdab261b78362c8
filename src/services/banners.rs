// src/services/banners.rs

//! Banner feed lister.

use std::sync::Arc;

use crate::error::Result;
use crate::models::{BannerDescriptor, Config, Coordinates, RawBanner};
use crate::utils::{Fetcher, fetch_json};

/// Fetches the home page banner feed for one location.
pub struct BannerLister {
    config: Arc<Config>,
    fetcher: Arc<dyn Fetcher>,
    coordinates: Coordinates,
}

impl BannerLister {
    pub fn new(config: Arc<Config>, fetcher: Arc<dyn Fetcher>, coordinates: Coordinates) -> Self {
        Self {
            config,
            fetcher,
            coordinates,
        }
    }

    /// Query sent to the feed: coordinates first, then the fixed params.
    pub fn query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("longitude".to_string(), self.coordinates.longitude.to_string()),
            ("latitude".to_string(), self.coordinates.latitude.to_string()),
        ];
        query.extend(
            self.config
                .feed
                .params
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        query
    }

    /// Fetch the feed once and project every entry to a descriptor.
    ///
    /// An entry missing `UID`, `Alt` or `Href` fails the whole listing.
    pub async fn list(&self) -> Result<Vec<BannerDescriptor>> {
        let raw: Vec<RawBanner> = fetch_json(
            self.fetcher.as_ref(),
            &self.config.endpoints.banners_url,
            &self.query(),
            "banner feed",
        )
        .await?;

        Ok(raw.into_iter().map(BannerDescriptor::from).collect())
    }
}
