// src/models/banner.rs

//! Banner feed entries and the lookup keys derived from them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier that upstream documents emit either as a string or a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Number(u64),
    Text(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Number(n) => write!(f, "{n}"),
            Identifier::Text(s) => f.write_str(s),
        }
    }
}

/// A banner entry exactly as the feed returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBanner {
    #[serde(rename = "UID")]
    pub uid: Identifier,

    #[serde(rename = "Alt")]
    pub alt: String,

    #[serde(rename = "Href")]
    pub href: String,
}

/// Minimal banner description used by the rest of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BannerDescriptor {
    /// Feed UID
    pub id: String,

    /// Banner caption, usually the brand or campaign name
    pub display_name: String,

    /// Relative link, e.g. `/promotions/...` or `/brands/...`
    pub link_path: String,
}

impl From<RawBanner> for BannerDescriptor {
    fn from(raw: RawBanner) -> Self {
        Self {
            id: raw.uid.to_string(),
            display_name: raw.alt,
            link_path: raw.href,
        }
    }
}

/// How a banner's link gets resolved to products.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Promotion,
    Brand,
    Unsupported,
}

/// A banner tagged with its resolution strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedBanner {
    pub banner: BannerDescriptor,
    pub kind: LinkKind,
}

/// Identifiers needed to query the sharded promotion search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionKey {
    pub promotion_id: String,
    pub shard_key: String,
}

/// Identifiers needed to query the brand catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandKey {
    pub brand_id: String,
    pub supplier: Option<String>,
}

/// Fully qualified product detail page URL.
pub type ProductLink = String;
