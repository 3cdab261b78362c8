//! Link classifier.

use crate::models::{BannerDescriptor, ClassifiedBanner, LinkKind};
use crate::utils::url::first_segment;

/// Pick the resolution strategy from the first path segment of the link.
pub fn classify(banner: &BannerDescriptor) -> LinkKind {
    match first_segment(&banner.link_path) {
        Some("promotions") => LinkKind::Promotion,
        Some("brands") => LinkKind::Brand,
        _ => LinkKind::Unsupported,
    }
}

impl From<BannerDescriptor> for ClassifiedBanner {
    fn from(banner: BannerDescriptor) -> Self {
        let kind = classify(&banner);
        Self { banner, kind }
    }
}
