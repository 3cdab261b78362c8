//! Catalog search responses shared by both resolvers.

use serde::Deserialize;

use crate::error::Result;
use crate::models::{EndpointConfig, Identifier, ProductLink};
use crate::utils::{Fetcher, Query, fetch_json};

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    data: CatalogData,
}

#[derive(Debug, Deserialize)]
struct CatalogData {
    products: Vec<CatalogProduct>,
}

#[derive(Debug, Deserialize)]
struct CatalogProduct {
    id: Identifier,
}

/// Run a catalog query and map every returned product to its detail page,
/// keeping upstream order.
pub(crate) async fn fetch_product_links(
    fetcher: &dyn Fetcher,
    endpoints: &EndpointConfig,
    url: &str,
    query: &Query,
    context: &str,
) -> Result<Vec<ProductLink>> {
    let response: CatalogResponse = fetch_json(fetcher, url, query, context).await?;

    Ok(response
        .data
        .products
        .iter()
        .map(|product| endpoints.product_link(&product.id.to_string()))
        .collect())
}
