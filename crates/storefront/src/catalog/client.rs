//! REST client for the catalog API.
//!
//! Uses `reqwest` for HTTP and caches product details using `moka`.

use std::sync::Arc;

use moka::future::Cache;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use rocketshoes_core::{Product, ProductId, StockRecord};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{Catalog, CatalogError};
use crate::config::ApiConfig;

/// Upper bound on cached product details.
const PRODUCT_CACHE_CAPACITY: u64 = 1000;

/// Longest slice of an error body copied into logs and errors.
const ERROR_BODY_PREVIEW: usize = 200;

/// Body of `GET stock/{id}`; the ID is taken from the request.
#[derive(Debug, Deserialize)]
struct StockBody {
    amount: u32,
}

/// Client for the catalog API.
///
/// Cheaply cloneable; clones share the HTTP connection pool and the
/// product cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    products: Cache<ProductId, Product>,
}

impl ApiClient {
    /// Create a new catalog API client.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, CatalogError> {
        let mut headers = HeaderMap::new();

        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        let products = Cache::builder()
            .max_capacity(PRODUCT_CACHE_CAPACITY)
            .time_to_live(config.product_cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                products,
            }),
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Drop all cached product details.
    pub fn invalidate_products(&self) {
        self.inner.products.invalidate_all();
    }

    /// GET a path below the base URL and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = self.inner.base_url.join(path)?;

        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(path.to_string()));
        }

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            let preview = body.chars().take(ERROR_BODY_PREVIEW).collect::<String>();
            tracing::error!(
                status = %status,
                path,
                body = %preview,
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: preview,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                path,
                body = %body.chars().take(ERROR_BODY_PREVIEW).collect::<String>(),
                "Failed to parse catalog API response"
            );
            CatalogError::Parse(e.to_string())
        })
    }
}

impl Catalog for ApiClient {
    #[instrument(skip(self), fields(product_id = %id))]
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        if let Some(product) = self.inner.products.get(&id).await {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let product: Product = self.get_json(&format!("products/{id}")).await?;
        self.inner.products.insert(id, product.clone()).await;
        Ok(product)
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn stock(&self, id: ProductId) -> Result<StockRecord, CatalogError> {
        let body: StockBody = self.get_json(&format!("stock/{id}")).await?;
        debug!(amount = body.amount, "Fetched stock");
        Ok(StockRecord {
            id,
            amount: body.amount,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    #[test]
    fn test_new_client_keeps_base_url() {
        let config = ApiConfig::new("http://localhost:3333/api").unwrap();
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:3333/api/");
    }

    #[test]
    fn test_new_client_rejects_unprintable_token() {
        let mut config = ApiConfig::new("http://localhost:3333").unwrap();
        config.token = Some(SecretString::from("line\nbreak"));
        let err = ApiClient::new(&config).err().unwrap();
        assert!(matches!(err, CatalogError::InvalidToken(_)));
        assert!(!err.to_string().contains("line"));
    }

    #[test]
    fn test_stock_body_ignores_extra_fields() {
        let body: StockBody = serde_json::from_str(r#"{"id": 4, "amount": 2}"#).unwrap();
        assert_eq!(body.amount, 2);
    }

    #[tokio::test]
    async fn test_unreachable_api_is_http_error() {
        // Port 9 (discard) on localhost is not expected to be serving HTTP
        let mut config = ApiConfig::new("http://127.0.0.1:9").unwrap();
        config.timeout = std::time::Duration::from_secs(2);
        let client = ApiClient::new(&config).unwrap();

        let err = client.stock(ProductId::new(1)).await.unwrap_err();
        assert!(matches!(err, CatalogError::Http(_)));
    }
}
