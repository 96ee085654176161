//! Catalog data shapes: products and cart lines.
//!
//! Amounts are integer cents to keep totals exact.

use super::ModelValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ProductId = Uuid;

static SLUG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid slug regex"));

/// A handmade item offered in the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub image_url: Option<String>,
    /// URL segment used by the article page.
    pub slug: String,
}

impl Product {
    /// Creates a product with a generated id and empty description.
    pub fn new(name: impl Into<String>, slug: impl Into<String>, price_cents: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            price_cents,
            image_url: None,
            slug: slug.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.name.trim().is_empty() {
            return Err(ModelValidationError::EmptyProductName);
        }
        if !SLUG_PATTERN.is_match(&self.slug) {
            return Err(ModelValidationError::InvalidSlug(self.slug.clone()));
        }
        if self.price_cents < 0 {
            return Err(ModelValidationError::NegativePrice(self.price_cents));
        }
        Ok(())
    }
}

/// One line of a shopping cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    pub fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.quantity == 0 {
            return Err(ModelValidationError::ZeroQuantity);
        }
        self.product.validate()
    }

    pub fn line_total_cents(&self) -> Result<i64, ModelValidationError> {
        self.product
            .price_cents
            .checked_mul(i64::from(self.quantity))
            .ok_or(ModelValidationError::AmountOverflow)
    }
}

/// Sums validated line totals.
///
/// # Errors
/// - The first invalid line's validation error.
/// - `AmountOverflow` when the total does not fit in `i64` cents.
pub fn cart_subtotal_cents(items: &[CartItem]) -> Result<i64, ModelValidationError> {
    items.iter().try_fold(0_i64, |total, item| {
        item.validate()?;
        total
            .checked_add(item.line_total_cents()?)
            .ok_or(ModelValidationError::AmountOverflow)
    })
}
