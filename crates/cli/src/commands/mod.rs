//! Command implementations.
//!
//! Every command runs against a [`Widget`]: the cart widget over the
//! file-backed store, drawing on a headless page. Output is written to the
//! caller's writer so commands can be tested without a terminal.

pub mod cart;
pub mod render;
pub mod watch;

use banda_core::{PriceError, SkuError};
use banda_storefront::{
    CartError, CartStore, CartWidget, ConfigError, FileStorage, HeadlessPage, WidgetConfig,
};
use thiserror::Error;

pub use render::RenderTarget;

/// The widget as the CLI hosts it.
pub type Widget = CartWidget<FileStorage, HeadlessPage>;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A cart operation failed.
    #[error("{0}")]
    Cart(#[from] CartError),

    /// The SKU argument is unusable.
    #[error("Invalid SKU: {0}")]
    InvalidSku(#[from] SkuError),

    /// The price argument is unusable.
    #[error("Invalid price: {0}")]
    InvalidPrice(#[from] PriceError),

    /// The SKU is not in the cart.
    #[error("Not in cart: {0}")]
    NotInCart(String),

    /// Writing output failed.
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

/// Open the configured store and render the initial page.
///
/// # Errors
///
/// Returns `CliError::Cart` if the initial render fails.
pub fn open_widget(config: &WidgetConfig) -> Result<Widget, CliError> {
    let storage = FileStorage::new(&config.storage_path).with_quota(config.storage_quota_bytes);
    tracing::debug!(
        path = %config.storage_path.display(),
        key = %config.cart_key,
        "Opening cart store"
    );
    let store = CartStore::new(storage, config.cart_key.as_str());
    let mut widget = CartWidget::new(store, HeadlessPage::full());
    widget.mount()?;
    Ok(widget)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::PathBuf;

    use banda_storefront::WidgetConfig;

    /// Config pointing at a fresh store file under the system temp dir.
    pub fn temp_config() -> WidgetConfig {
        let path: PathBuf = std::env::temp_dir()
            .join(format!("bcart-test-{}", uuid::Uuid::new_v4()))
            .join("local_storage.json");
        WidgetConfig {
            storage_path: path,
            ..WidgetConfig::default()
        }
    }

    /// Output written so far, as UTF-8.
    pub fn output(buf: &[u8]) -> String {
        String::from_utf8_lossy(buf).into_owned()
    }
}
