//! Cart commands.
//!
//! Each invocation builds a fresh [`CartStore`] from configuration, so the
//! cart survives between runs only through the storage file.
//!
//! # Environment Variables
//!
//! - `ROCKETSHOES_API_URL` - Catalog API base URL
//! - `ROCKETSHOES_STORAGE_PATH` - Cart storage file

use rocketshoes_core::{Cart, ProductId};
use rocketshoes_storefront::{
    ApiClient, CartConfig, CartError, CartStore, CatalogError, FileStorage, TracingNotifier,
    UpdateProductAmount,
};
use tracing::info;

/// Cart store wired for the command line.
pub type CliStore = CartStore<ApiClient, FileStorage, TracingNotifier>;

/// Build the store and restore the saved cart.
///
/// # Errors
///
/// Returns an error if the catalog API client cannot be built.
pub fn open(config: &CartConfig) -> Result<CliStore, CatalogError> {
    let catalog = ApiClient::new(&config.api)?;
    let storage = FileStorage::new(&config.storage_path);
    info!(path = %storage.path().display(), "Using cart storage");
    Ok(CartStore::load(catalog, storage, TracingNotifier))
}

/// Print the cart.
pub fn show(store: &CliStore) {
    log_cart(store.cart());
}

/// Add one unit of a product and print the cart.
///
/// # Errors
///
/// Returns the `CartError` the store reported.
pub async fn add(store: &mut CliStore, product_id: ProductId) -> Result<(), CartError> {
    store.add_product(product_id).await?;
    log_cart(store.cart());
    Ok(())
}

/// Remove a product and print the cart.
///
/// # Errors
///
/// Returns the `CartError` the store reported.
pub fn remove(store: &mut CliStore, product_id: ProductId) -> Result<(), CartError> {
    store.remove_product(product_id)?;
    log_cart(store.cart());
    Ok(())
}

/// Set a product's amount and print the cart.
///
/// # Errors
///
/// Returns the `CartError` the store reported.
pub async fn update(
    store: &mut CliStore,
    product_id: ProductId,
    amount: i64,
) -> Result<(), CartError> {
    store
        .update_product_amount(UpdateProductAmount { product_id, amount })
        .await?;
    log_cart(store.cart());
    Ok(())
}

fn log_cart(cart: &Cart) {
    if cart.is_empty() {
        info!("Cart is empty");
        return;
    }

    info!("Cart");
    info!("====");
    for line in cart_lines(cart) {
        info!("{line}");
    }
    info!(
        "{} item(s), subtotal {}",
        cart.item_count(),
        cart.subtotal()
    );
}

/// One display line per item: `#id  title  amount x price = total`.
fn cart_lines(cart: &Cart) -> Vec<String> {
    cart.iter()
        .map(|item| {
            format!(
                "#{:<4} {}  {} x {} = {}",
                item.id().as_i32(),
                item.product.title,
                item.amount,
                item.product.price,
                item.line_total()
            )
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rocketshoes_core::{Price, Product};

    use super::*;

    #[test]
    fn test_cart_lines() {
        let mut cart = Cart::new();
        cart.push(Product::new(
            ProductId::new(2),
            "Tênis VR Caminhada",
            Price::from_cents(13990),
            "https://example.com/2.jpg",
        ))
        .unwrap();
        cart.set_amount(ProductId::new(2), 2).unwrap();

        assert_eq!(
            cart_lines(&cart),
            vec!["#2    Tênis VR Caminhada  2 x $139.90 = $279.80".to_string()]
        );
    }

    #[test]
    fn test_open_with_valid_config() {
        let dir = tempfile::tempdir().unwrap();
        let storage_path = dir.path().join("storage.json");
        let config = CartConfig {
            api: rocketshoes_storefront::ApiConfig::new("http://localhost:3333").unwrap(),
            storage_path: storage_path.clone(),
            sentry_dsn: None,
        };
        let store = open(&config).unwrap();
        assert_eq!(store.catalog().base_url().as_str(), "http://localhost:3333/");
        assert_eq!(store.storage().path(), storage_path);
        assert!(store.cart().is_empty());
    }
}
