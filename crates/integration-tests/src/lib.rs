//! Integration tests for RocketShoes.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! No external services are needed: [`MockBackend`] serves the catalog API
//! (`products/{id}`, `stock/{id}`) from an in-process `axum` server on an
//! ephemeral port, and file storage goes to a `tempfile` directory.
//!
//! # Test Categories
//!
//! - `catalog_client` - HTTP client against the mock API
//! - `cart_store` - Full cart flows over HTTP and file storage

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use rocketshoes_storefront::ApiConfig;
use serde_json::{Value, json};
use tokio::task::JoinHandle;

/// Seed catalog: `(id, title, price, stock)`.
pub const SEED_PRODUCTS: &[(i32, &str, f64, u32)] = &[
    (1, "Tênis de Caminhada Leve Confortável", 179.9, 3),
    (2, "Tênis VR Caminhada Confortável Detalhes Couro Masculino", 139.9, 5),
    (3, "Tênis Adidas Duramo Lite 2.0", 219.9, 2),
    (4, "Tênis VR Caminhada Confortável Detalhes Couro Masculino", 139.9, 1),
    (5, "Tênis VR Caminhada Confortável Detalhes Couro Masculino", 139.9, 5),
    (6, "Tênis Adidas Duramo Lite 2.0", 219.9, 10),
];

#[derive(Default)]
struct BackendState {
    products: RwLock<HashMap<i32, Value>>,
    stock: RwLock<HashMap<i32, u32>>,
    product_requests: AtomicUsize,
    stock_requests: AtomicUsize,
    failing: AtomicBool,
}

/// In-process catalog API.
///
/// The server task is aborted when the backend is dropped.
pub struct MockBackend {
    addr: SocketAddr,
    state: Arc<BackendState>,
    server: JoinHandle<()>,
}

impl MockBackend {
    /// Start a backend serving [`SEED_PRODUCTS`].
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start() -> Self {
        let state = Arc::new(BackendState::default());
        {
            let mut products = state.products.write().unwrap_or_else(PoisonError::into_inner);
            let mut stock = state.stock.write().unwrap_or_else(PoisonError::into_inner);
            for &(id, title, price, amount) in SEED_PRODUCTS {
                products.insert(
                    id,
                    json!({
                        "id": id,
                        "title": title,
                        "price": price,
                        "image": format!("https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/modulo-redux/tenis{id}.jpg"),
                    }),
                );
                stock.insert(id, amount);
            }
        }

        let app = Router::new()
            .route("/products/{id}", get(get_product))
            .route("/stock/{id}", get(get_stock))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Mock backend has no address");

        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            server,
        }
    }

    /// Base URL of the API.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Client configuration pointing at this backend.
    ///
    /// # Panics
    ///
    /// Panics if the base URL is rejected, which would be a bug.
    #[must_use]
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(&self.base_url()).expect("Mock backend URL is valid")
    }

    /// Change the stock of a product.
    pub fn set_stock(&self, id: i32, amount: u32) {
        self.state
            .stock
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, amount);
    }

    /// Rename a product, to observe caching.
    pub fn set_title(&self, id: i32, title: &str) {
        if let Some(product) = self
            .state
            .products
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&id)
        {
            product["title"] = json!(title);
        }
    }

    /// Make every request answer 500 (or stop doing so).
    pub fn set_failing(&self, failing: bool) {
        self.state.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of `products/{id}` requests served.
    #[must_use]
    pub fn product_requests(&self) -> usize {
        self.state.product_requests.load(Ordering::SeqCst)
    }

    /// Number of `stock/{id}` requests served.
    #[must_use]
    pub fn stock_requests(&self) -> usize {
        self.state.stock_requests.load(Ordering::SeqCst)
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn failure() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "backend exploded").into_response()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({}))).into_response()
}

async fn get_product(State(state): State<Arc<BackendState>>, Path(id): Path<i32>) -> Response {
    state.product_requests.fetch_add(1, Ordering::SeqCst);
    if state.failing.load(Ordering::SeqCst) {
        return failure();
    }
    let product = state
        .products
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
        .cloned();
    product.map_or_else(not_found, |product| Json(product).into_response())
}

async fn get_stock(State(state): State<Arc<BackendState>>, Path(id): Path<i32>) -> Response {
    state.stock_requests.fetch_add(1, Ordering::SeqCst);
    if state.failing.load(Ordering::SeqCst) {
        return failure();
    }
    let amount = state
        .stock
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
        .copied();
    amount.map_or_else(not_found, |amount| {
        Json(json!({ "id": id, "amount": amount })).into_response()
    })
}
