//! Unified error handling with Sentry integration.
//!
//! Provides the `CartError` type returned by cart mutations and renders. The
//! widget reports failures through [`CartError::report`], which logs, captures
//! to Sentry, and hands the page a message safe to show a shopper.

use thiserror::Error;

use crate::storage::StorageError;

/// Shown when a cart change could not be saved.
const SAVE_FAILED_MESSAGE: &str = "Не удалось сохранить корзину";

/// Shown for every other failure.
const GENERIC_FAILURE_MESSAGE: &str = "Что-то пошло не так, попробуйте ещё раз";

/// Widget-level error type.
#[derive(Debug, Error)]
pub enum CartError {
    /// The key-value store rejected or failed an operation.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The cart record could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A fragment template failed to render.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),

    /// Product data on the page is unusable.
    #[error("Invalid product: {0}")]
    InvalidProduct(String),
}

impl CartError {
    /// Message for the page notice. Internal details are never exposed.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::Storage(_) | Self::Serialization(_) => SAVE_FAILED_MESSAGE,
            Self::Render(_) | Self::InvalidProduct(_) => GENERIC_FAILURE_MESSAGE,
        }
    }

    /// Log the error and capture it to Sentry.
    ///
    /// Sentry capture is a no-op when no client has been initialized.
    pub fn report(&self) {
        let event_id = sentry::capture_error(self);
        tracing::warn!(
            error = %self,
            sentry_event_id = %event_id,
            "Cart operation failed"
        );
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of cart
/// actions leading up to an error.
pub fn add_breadcrumb(message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some("cart".to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_display() {
        let err = CartError::InvalidProduct("missing data-sku".to_string());
        assert_eq!(err.to_string(), "Invalid product: missing data-sku");

        let err = CartError::Storage(StorageError::QuotaExceeded {
            needed: 20,
            quota: 10,
        });
        assert_eq!(
            err.to_string(),
            "Storage error: storage quota exceeded: 20 bytes needed, 10 allowed"
        );
    }

    #[test]
    fn test_user_messages_hide_details() {
        let err = CartError::Storage(StorageError::Unavailable("lock poisoned".to_string()));
        assert_eq!(err.user_message(), SAVE_FAILED_MESSAGE);
        assert!(!err.user_message().contains("lock"));

        let err = CartError::InvalidProduct("x".to_string());
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn test_report_without_sentry_client() {
        // Must not panic when Sentry was never initialized.
        CartError::InvalidProduct("x".to_string()).report();
        add_breadcrumb("Viewed cart", Some(&[("sku", "tshirt")]));
    }
}
