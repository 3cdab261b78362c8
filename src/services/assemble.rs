//! Response assembler.

use crate::models::{
    BannerDescriptor, BannerResult, EndpointConfig, PLACEMENT, PLATFORM, PRODUCT_CATEGORY,
    ProductLink,
};

/// Join a banner with its resolved products.
///
/// Callers drop banners without products before getting here.
pub fn assemble(
    endpoints: &EndpointConfig,
    banner: &BannerDescriptor,
    products: Vec<ProductLink>,
    address: Option<&str>,
) -> BannerResult {
    BannerResult {
        platform: PLATFORM.to_string(),
        banner_id: banner.id.clone(),
        product_category: PRODUCT_CATEGORY.to_string(),
        placement: PLACEMENT.to_string(),
        products,
        shop: endpoints.shop_url.clone(),
        brand_name: banner.display_name.clone(),
        banner_link: format!("{}{}", endpoints.site_host, banner.link_path),
        address: address.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble() {
        let banner = BannerDescriptor {
            id: "1".to_string(),
            display_name: "BrandX".to_string(),
            link_path: "/brands/123-abc".to_string(),
        };
        let products = vec!["https://www.wildberries.ru/catalog/111/detail.aspx".to_string()];

        let result = assemble(
            &EndpointConfig::default(),
            &banner,
            products.clone(),
            Some("Пресненская наб., 10 стр2"),
        );

        assert_eq!(result.platform, "Wildberries");
        assert_eq!(result.banner_id, "1");
        assert_eq!(result.product_category, "Banner");
        assert_eq!(result.placement, "Home page");
        assert_eq!(result.products, products);
        assert_eq!(result.shop, "https://www.wildberries.ru");
        assert_eq!(result.brand_name, "BrandX");
        assert_eq!(result.banner_link, "www.wildberries.ru/brands/123-abc");
        assert_eq!(result.address.as_deref(), Some("Пресненская наб., 10 стр2"));
    }
}
