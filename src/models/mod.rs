// src/models/mod.rs

//! Domain models for the banner pipeline.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod banner;
mod config;
mod result;

// Re-export all public types
pub use banner::{
    BannerDescriptor, BrandKey, ClassifiedBanner, Identifier, LinkKind, ProductLink,
    PromotionKey, RawBanner,
};
pub use config::{
    CatalogConfig, Config, Coordinates, EndpointConfig, FeedConfig, HttpConfig, LocationConfig,
    LoggingConfig, PipelineConfig,
};
pub use result::{BannerResult, BannerSnapshot, PLACEMENT, PLATFORM, PRODUCT_CATEGORY, ResultSet};
