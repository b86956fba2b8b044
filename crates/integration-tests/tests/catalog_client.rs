//! Integration tests for the catalog API client.
//!
//! These tests run the HTTP client against the in-process mock backend.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use rocketshoes_core::{Price, ProductId};
use rocketshoes_integration_tests::MockBackend;
use rocketshoes_storefront::{ApiClient, ApiConfig, Catalog, CatalogError};

// =============================================================================
// Product Lookups
// =============================================================================

#[tokio::test]
async fn test_fetch_product() {
    let backend = MockBackend::start().await;
    let client = ApiClient::new(&backend.api_config()).expect("client builds");

    let product = client
        .product(ProductId::new(1))
        .await
        .expect("product exists");

    assert_eq!(product.id, ProductId::new(1));
    assert_eq!(product.title, "Tênis de Caminhada Leve Confortável");
    assert_eq!(product.price, Price::from_cents(17990));
    assert!(product.image.ends_with("tenis1.jpg"));
}

#[tokio::test]
async fn test_fetch_unknown_product_is_not_found() {
    let backend = MockBackend::start().await;
    let client = ApiClient::new(&backend.api_config()).expect("client builds");

    let err = client.product(ProductId::new(404)).await.unwrap_err();

    assert!(matches!(err, CatalogError::NotFound(ref path) if path == "products/404"));
}

#[tokio::test]
async fn test_product_details_are_cached() {
    let backend = MockBackend::start().await;
    let client = ApiClient::new(&backend.api_config()).expect("client builds");

    let first = client.product(ProductId::new(2)).await.expect("exists");
    backend.set_title(2, "Renamed");
    let second = client.product(ProductId::new(2)).await.expect("exists");

    assert_eq!(first, second);
    assert_eq!(backend.product_requests(), 1);

    client.invalidate_products();
    let third = client.product(ProductId::new(2)).await.expect("exists");
    assert_eq!(third.title, "Renamed");
    assert_eq!(backend.product_requests(), 2);
}

#[tokio::test]
async fn test_product_cache_expires() {
    let backend = MockBackend::start().await;
    let mut config = backend.api_config();
    config.product_cache_ttl = Duration::from_millis(50);
    let client = ApiClient::new(&config).expect("client builds");

    client.product(ProductId::new(3)).await.expect("exists");
    tokio::time::sleep(Duration::from_millis(150)).await;
    client.product(ProductId::new(3)).await.expect("exists");

    assert_eq!(backend.product_requests(), 2);
}

// =============================================================================
// Stock Lookups
// =============================================================================

#[tokio::test]
async fn test_fetch_stock() {
    let backend = MockBackend::start().await;
    let client = ApiClient::new(&backend.api_config()).expect("client builds");

    let stock = client.stock(ProductId::new(6)).await.expect("stock exists");

    assert_eq!(stock.id, ProductId::new(6));
    assert_eq!(stock.amount, 10);
}

#[tokio::test]
async fn test_stock_is_never_cached() {
    let backend = MockBackend::start().await;
    let client = ApiClient::new(&backend.api_config()).expect("client builds");

    assert_eq!(client.stock(ProductId::new(1)).await.expect("ok").amount, 3);
    backend.set_stock(1, 0);
    assert_eq!(client.stock(ProductId::new(1)).await.expect("ok").amount, 0);
    assert_eq!(backend.stock_requests(), 2);
}

#[tokio::test]
async fn test_fetch_unknown_stock_is_not_found() {
    let backend = MockBackend::start().await;
    let client = ApiClient::new(&backend.api_config()).expect("client builds");

    let err = client.stock(ProductId::new(77)).await.unwrap_err();

    assert!(err.is_not_found());
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_server_error_is_api_error() {
    let backend = MockBackend::start().await;
    backend.set_failing(true);
    let client = ApiClient::new(&backend.api_config()).expect("client builds");

    let err = client.stock(ProductId::new(1)).await.unwrap_err();

    match err {
        CatalogError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "backend exploded");
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_path_prefix_is_respected() {
    let backend = MockBackend::start().await;
    let config = ApiConfig::new(&format!("{}/v2", backend.base_url())).expect("valid URL");
    let client = ApiClient::new(&config).expect("client builds");

    // The mock only serves unprefixed routes
    let err = client.stock(ProductId::new(1)).await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(backend.stock_requests(), 0);
}
