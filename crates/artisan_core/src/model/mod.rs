//! Domain model for the shop core.
//!
//! # Responsibility
//! - Define the client record resolved from an authenticated user.
//! - Define catalog data shapes (products, cart lines) shared with callers.
//!
//! # Invariants
//! - Model constructors never touch storage.
//! - `validate()` is the single gate for write-side invariants.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod catalog;
pub mod client;
pub mod user;

/// Validation failures raised by model `validate()` methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// A `UserId` link was set but is falsy (`0` or empty text).
    BlankUserLink,
    /// Attribute map uses a key owned by the client record itself.
    ReservedAttribute(String),
    EmptyProductName,
    InvalidSlug(String),
    NegativePrice(i64),
    ZeroQuantity,
    /// Line or subtotal arithmetic exceeded `i64` cents.
    AmountOverflow,
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankUserLink => write!(f, "client user link must not be blank"),
            Self::ReservedAttribute(key) => {
                write!(f, "attribute key `{key}` is reserved by the client record")
            }
            Self::EmptyProductName => write!(f, "product name must not be empty"),
            Self::InvalidSlug(slug) => write!(f, "invalid product slug `{slug}`"),
            Self::NegativePrice(cents) => write!(f, "product price must be >= 0, got {cents}"),
            Self::ZeroQuantity => write!(f, "cart item quantity must be at least 1"),
            Self::AmountOverflow => write!(f, "cart amount overflows i64 cents"),
        }
    }
}

impl Error for ModelValidationError {}
