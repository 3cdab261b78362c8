//! Service layer for the banner pipeline.
//!
//! This module contains the business logic for:
//! - Banner feed listing (`BannerLister`)
//! - Link classification (`classify`)
//! - Promotion resolution (`PromotionResolver`)
//! - Brand resolution (`BrandResolver`)
//! - Output assembly (`assemble`)

mod assemble;
mod banners;
mod brands;
mod catalog;
mod classify;
mod promotions;

pub use assemble::assemble;
pub use banners::BannerLister;
pub use brands::{BrandResolver, brand_token, supplier_qualifier};
pub use classify::classify;
pub use promotions::PromotionResolver;
