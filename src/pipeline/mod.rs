//! Pipeline entry points.
//!
//! - `BannerPipeline`: list banners, resolve each to products
//! - `run_pipeline`: one run over the reqwest transport

pub mod run;

use std::sync::Arc;

pub use run::BannerPipeline;

use crate::error::Result;
use crate::models::{Config, ResultSet};

/// Run the pipeline once over HTTP.
///
/// Only client construction can fail; upstream failures yield an empty or
/// partial result instead.
pub async fn run_pipeline(config: Arc<Config>, address: Option<String>) -> Result<ResultSet> {
    let pipeline = BannerPipeline::from_config(config, address)?;
    Ok(pipeline.run().await)
}
