//! Product catalog access through the instrumented client.

use anyhow::{Context, Result};
use serde::Deserialize;
use shared::client::MetricsClient;
use std::time::Duration;

/// Default upstream store.
pub const DEFAULT_STORE_URL: &str = "https://fakestoreapi.com";

/// Route label for the product list.
pub const LIST_ROUTE: &str = "/products";

/// Route label for a single product.
pub const DETAIL_ROUTE: &str = "/products/:id";

/// Customer rating of a product.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Rating {
    /// Average score.
    pub rate: f64,
    /// Number of ratings.
    pub count: u64,
}

/// A product as served by the store API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    /// Product id.
    pub id: u64,
    /// Display name.
    pub title: String,
    /// Price in dollars.
    pub price: f64,
    /// Long description.
    #[serde(default)]
    pub description: String,
    /// Category name.
    #[serde(default)]
    pub category: String,
    /// Image URL.
    #[serde(default)]
    pub image: String,
    /// Customer rating, if the store reports one.
    #[serde(default)]
    pub rating: Option<Rating>,
}

/// Client for the upstream product API.
///
/// Every call is timed and recorded on the supplied [`MetricsClient`],
/// whether it succeeds or not.
#[derive(Debug, Clone)]
pub struct Catalog {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl Catalog {
    /// Creates a catalog client for the given store.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Fetches every product.
    pub async fn products(&self, metrics: &MetricsClient) -> Result<Vec<Product>> {
        let request = self.http.get(self.url("/products")).timeout(self.timeout);
        let response = metrics
            .instrument("GET", LIST_ROUTE, request)
            .await
            .context("failed to reach the product API")?
            .error_for_status()
            .context("product API returned an error")?;

        response
            .json()
            .await
            .context("failed to decode product list")
    }

    /// Fetches one product by id.
    pub async fn product(&self, metrics: &MetricsClient, id: u64) -> Result<Product> {
        let request = self
            .http
            .get(self.url(&format!("/products/{id}")))
            .timeout(self.timeout);
        let response = metrics
            .instrument("GET", DETAIL_ROUTE, request)
            .await
            .context("failed to reach the product API")?
            .error_for_status()
            .with_context(|| format!("product {id} could not be loaded"))?;

        response
            .json()
            .await
            .with_context(|| format!("failed to decode product {id}"))
    }
}

/// Renders products as a fixed-width table.
#[must_use]
pub fn format_product_table(products: &[Product]) -> String {
    let mut out = format!("{:>4}  {:>9}  {}\n", "ID", "PRICE", "TITLE");
    for p in products {
        out.push_str(&format!("{:>4}  {:>9.2}  {}\n", p.id, p.price, p.title));
    }
    out
}

/// Renders one product with all of its fields.
#[must_use]
pub fn format_product_detail(product: &Product) -> String {
    let mut out = format!(
        "{}\n  id:       {}\n  price:    ${:.2}\n  category: {}\n",
        product.title, product.id, product.price, product.category
    );
    if let Some(rating) = &product.rating {
        out.push_str(&format!(
            "  rating:   {:.1} ({} reviews)\n",
            rating.rate, rating.count
        ));
    }
    out.push_str(&format!("  image:    {}\n\n{}\n", product.image, product.description));
    out
}
