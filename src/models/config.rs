//! Application configuration structures.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client behavior
    #[serde(default)]
    pub http: HttpConfig,

    /// Listing retries and banner concurrency
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Upstream base URLs
    #[serde(default)]
    pub endpoints: EndpointConfig,

    /// Fixed query parameters of the banner feed
    #[serde(default)]
    pub feed: FeedConfig,

    /// Parameters shared by every catalog query
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Geolocation used for the banner feed
    #[serde(default)]
    pub location: LocationConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.http.max_attempts == 0 {
            return Err(AppError::validation("http.max_attempts must be > 0"));
        }
        if self.http.proxy_host.is_some() != self.http.proxy_port.is_some() {
            return Err(AppError::validation(
                "http.proxy_host and http.proxy_port must be set together",
            ));
        }
        if self.pipeline.max_listing_attempts == 0 {
            return Err(AppError::validation(
                "pipeline.max_listing_attempts must be > 0",
            ));
        }
        if self.pipeline.max_concurrent == 0 {
            return Err(AppError::validation("pipeline.max_concurrent must be > 0"));
        }
        for (name, value) in self.endpoints.urls() {
            Url::parse(value).map_err(|e| {
                AppError::validation(format!("endpoints.{name} is not a valid URL: {e}"))
            })?;
        }
        if self.catalog.regions.is_empty() {
            return Err(AppError::validation("catalog.regions is empty"));
        }
        self.location.default.validate("location.default")?;
        for (name, coordinates) in &self.location.addresses {
            coordinates.validate(&format!("location.addresses.{name}"))?;
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Attempts per request until a 200 is seen
    #[serde(default = "defaults::max_attempts")]
    pub max_attempts: u32,

    /// Optional HTTP proxy host
    #[serde(default)]
    pub proxy_host: Option<String>,

    /// Optional HTTP proxy port
    #[serde(default)]
    pub proxy_port: Option<u16>,
}

impl HttpConfig {
    /// Proxy URL when both host and port are configured.
    pub fn proxy_url(&self) -> Option<String> {
        match (&self.proxy_host, self.proxy_port) {
            (Some(host), Some(port)) if !host.trim().is_empty() => {
                Some(format!("http://{}:{}", host.trim(), port))
            }
            _ => None,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_attempts: defaults::max_attempts(),
            proxy_host: None,
            proxy_port: None,
        }
    }
}

/// Pipeline driver settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Banner feed fetches before giving up with an empty result
    #[serde(default = "defaults::max_listing_attempts")]
    pub max_listing_attempts: u32,

    /// Banners resolved at the same time (1 = strictly sequential)
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Pause between failed listing attempts in milliseconds
    #[serde(default)]
    pub listing_retry_delay_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_listing_attempts: defaults::max_listing_attempts(),
            max_concurrent: defaults::max_concurrent(),
            listing_retry_delay_ms: 0,
        }
    }
}

/// Upstream endpoint base URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "defaults::banners_url")]
    pub banners_url: String,

    /// Prefix of the per-promotion static documents
    #[serde(default = "defaults::promotion_static_base")]
    pub promotion_static_base: String,

    /// Prefix of the sharded promotion search
    #[serde(default = "defaults::promotion_search_base")]
    pub promotion_search_base: String,

    /// Prefix of the per-brand static documents
    #[serde(default = "defaults::brand_static_base")]
    pub brand_static_base: String,

    #[serde(default = "defaults::brand_catalog_url")]
    pub brand_catalog_url: String,

    /// Prefix of product detail pages
    #[serde(default = "defaults::product_base")]
    pub product_base: String,

    /// Storefront root reported in results
    #[serde(default = "defaults::shop_url")]
    pub shop_url: String,

    /// Host prepended to banner link paths in results
    #[serde(default = "defaults::site_host")]
    pub site_host: String,
}

impl EndpointConfig {
    /// Named endpoint URLs that must parse as absolute URLs.
    fn urls(&self) -> [(&'static str, &str); 7] {
        [
            ("banners_url", self.banners_url.as_str()),
            ("promotion_static_base", self.promotion_static_base.as_str()),
            ("promotion_search_base", self.promotion_search_base.as_str()),
            ("brand_static_base", self.brand_static_base.as_str()),
            ("brand_catalog_url", self.brand_catalog_url.as_str()),
            ("product_base", self.product_base.as_str()),
            ("shop_url", self.shop_url.as_str()),
        ]
    }

    /// Product detail page URL for a catalog identifier.
    pub fn product_link(&self, product_id: &str) -> String {
        format!(
            "{}/{}/detail.aspx",
            self.product_base.trim_end_matches('/'),
            product_id
        )
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            banners_url: defaults::banners_url(),
            promotion_static_base: defaults::promotion_static_base(),
            promotion_search_base: defaults::promotion_search_base(),
            brand_static_base: defaults::brand_static_base(),
            brand_catalog_url: defaults::brand_catalog_url(),
            product_base: defaults::product_base(),
            shop_url: defaults::shop_url(),
            site_host: defaults::site_host(),
        }
    }
}

/// Banner feed query parameters (besides the coordinates).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "defaults::feed_params")]
    pub params: BTreeMap<String, String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            params: defaults::feed_params(),
        }
    }
}

/// Catalog query parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Currency, pagination, sort and destination
    #[serde(default = "defaults::static_params")]
    pub static_params: BTreeMap<String, String>,

    /// Geographic regions passed to the promotion search
    #[serde(default = "defaults::regions")]
    pub regions: Vec<u32>,
}

impl CatalogConfig {
    /// Static params as owned query pairs.
    pub fn query(&self) -> Vec<(String, String)> {
        self.static_params
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Regions joined the way the search endpoint expects them.
    pub fn regions_param(&self) -> String {
        self.regions
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            static_params: defaults::static_params(),
            regions: defaults::regions(),
        }
    }
}

/// Longitude/latitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinates {
    fn validate(&self, field: &str) -> Result<()> {
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(AppError::validation(format!(
                "{field}.longitude out of range: {}",
                self.longitude
            )));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(AppError::validation(format!(
                "{field}.latitude out of range: {}",
                self.latitude
            )));
        }
        Ok(())
    }
}

/// Named delivery addresses and the fallback location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default = "defaults::default_coordinates")]
    pub default: Coordinates,

    #[serde(default = "defaults::addresses")]
    pub addresses: BTreeMap<String, Coordinates>,
}

impl LocationConfig {
    /// Coordinates for a named address, falling back to the default.
    pub fn resolve(&self, address: Option<&str>) -> Coordinates {
        match address {
            Some(name) => self.addresses.get(name).copied().unwrap_or_else(|| {
                log::warn!("Unknown address {:?}, using default location", name);
                self.default
            }),
            None => self.default,
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            default: defaults::default_coordinates(),
            addresses: defaults::addresses(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    use std::collections::BTreeMap;

    use super::Coordinates;

    fn pairs(items: &[(&str, &str)]) -> BTreeMap<String, String> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; wb-banners/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn max_attempts() -> u32 {
        3
    }

    // Pipeline defaults
    pub fn max_listing_attempts() -> u32 {
        10
    }
    pub fn max_concurrent() -> usize {
        1
    }

    // Endpoint defaults
    pub fn banners_url() -> String {
        "https://banners-website.wildberries.ru/public/v1/banners".into()
    }
    pub fn promotion_static_base() -> String {
        "https://static-basket-01.wb.ru/vol0/data".into()
    }
    pub fn promotion_search_base() -> String {
        "https://search.wb.ru/promo".into()
    }
    pub fn brand_static_base() -> String {
        "https://static.wbstatic.net/data/brands".into()
    }
    pub fn brand_catalog_url() -> String {
        "https://catalog.wb.ru/brands/p/catalog".into()
    }
    pub fn product_base() -> String {
        "https://www.wildberries.ru/catalog".into()
    }
    pub fn shop_url() -> String {
        "https://www.wildberries.ru".into()
    }
    pub fn site_host() -> String {
        "www.wildberries.ru".into()
    }

    // Query defaults
    pub fn feed_params() -> BTreeMap<String, String> {
        pairs(&[
            ("urltype", "1024"),
            ("apptype", "1"),
            ("displaytype", "3"),
            ("country", "1"),
            ("culture", "ru"),
        ])
    }
    pub fn static_params() -> BTreeMap<String, String> {
        pairs(&[
            ("appType", "1"),
            ("curr", "rub"),
            ("dest", "-1257786"),
            ("page", "1"),
            ("sort", "popular"),
            ("spp", "31"),
        ])
    }
    pub fn regions() -> Vec<u32> {
        vec![
            80, 38, 83, 4, 64, 33, 68, 70, 30, 40, 86, 75, 69, 1, 31, 66, 110, 48, 22, 71, 114,
        ]
    }

    // Location defaults
    pub fn default_coordinates() -> Coordinates {
        Coordinates {
            longitude: 37.6201,
            latitude: 55.753737,
        }
    }
    pub fn addresses() -> BTreeMap<String, Coordinates> {
        BTreeMap::from([
            (
                "Космодамианская наб., 52с5".to_string(),
                Coordinates {
                    longitude: 37.643938,
                    latitude: 55.732950,
                },
            ),
            (
                "Пресненская наб., 10 стр2".to_string(),
                Coordinates {
                    longitude: 37.535071,
                    latitude: 55.747622,
                },
            ),
        ])
    }

    pub fn log_level() -> String {
        "info".into()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.http.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_attempts() {
        let mut config = Config::default();
        config.http.max_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.pipeline.max_listing_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_half_proxy() {
        let mut config = Config::default();
        config.http.proxy_host = Some("10.0.0.1".to_string());
        assert!(config.validate().is_err());

        config.http.proxy_port = Some(3128);
        assert!(config.validate().is_ok());
        assert_eq!(
            config.http.proxy_url(),
            Some("http://10.0.0.1:3128".to_string())
        );
    }

    #[test]
    fn validate_rejects_bad_endpoint() {
        let mut config = Config::default();
        config.endpoints.brand_catalog_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_coordinates() {
        let mut config = Config::default();
        config.location.default.latitude = 91.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn resolve_known_and_unknown_address() {
        let location = LocationConfig::default();
        let known = location.resolve(Some("Пресненская наб., 10 стр2"));
        assert_eq!(known.longitude, 37.535071);
        assert_eq!(location.resolve(Some("nowhere")), location.default);
        assert_eq!(location.resolve(None), location.default);
    }

    #[test]
    fn catalog_regions_param() {
        let catalog = CatalogConfig {
            static_params: BTreeMap::new(),
            regions: vec![80, 38, 4],
        };
        assert_eq!(catalog.regions_param(), "80,38,4");
    }

    #[test]
    fn product_link_format() {
        let endpoints = EndpointConfig::default();
        assert_eq!(
            endpoints.product_link("111"),
            "https://www.wildberries.ru/catalog/111/detail.aspx"
        );
    }

    #[test]
    fn load_partial_toml_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[http]\ntimeout_secs = 5\n\n[pipeline]\nmax_concurrent = 4\n"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(config.http.max_attempts, 3);
        assert_eq!(config.pipeline.max_concurrent, 4);
        assert_eq!(config.pipeline.max_listing_attempts, 10);
        assert_eq!(config.catalog.static_params["curr"], "rub");
    }

    #[test]
    fn shipped_config_is_valid() {
        let config = Config::load(concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml")).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.location.addresses.len(), 2);
        assert_eq!(config.catalog.regions, defaults::regions());
    }

    #[test]
    fn load_or_default_on_missing_file() {
        let config = Config::load_or_default("/definitely/not/here.toml");
        assert_eq!(config.http.max_attempts, 3);
    }
}
