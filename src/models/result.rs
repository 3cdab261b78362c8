//! Pipeline output records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::ProductLink;

pub const PLATFORM: &str = "Wildberries";
pub const PRODUCT_CATEGORY: &str = "Banner";
pub const PLACEMENT: &str = "Home page";

/// One resolved banner with its product links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerResult {
    pub platform: String,
    pub banner_id: String,
    pub product_category: String,
    pub placement: String,

    /// Product detail URLs in upstream order, never empty
    pub products: Vec<ProductLink>,

    pub shop: String,
    pub brand_name: String,
    pub banner_link: String,

    /// Named address the feed was requested for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Output of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet(Vec<BannerResult>);

impl ResultSet {
    pub fn new(results: Vec<BannerResult>) -> Self {
        Self(results)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BannerResult> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<BannerResult> {
        self.0
    }
}

impl IntoIterator for ResultSet {
    type Item = BannerResult;
    type IntoIter = std::vec::IntoIter<BannerResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Timestamped envelope written by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannerSnapshot {
    /// ISO 8601 timestamp of the run
    pub generated_at: DateTime<Utc>,
    pub address: Option<String>,
    pub count: usize,
    pub banners: ResultSet,
}

impl BannerSnapshot {
    pub fn new(banners: ResultSet, address: Option<String>) -> Self {
        Self {
            generated_at: Utc::now(),
            address,
            count: banners.len(),
            banners,
        }
    }
}
