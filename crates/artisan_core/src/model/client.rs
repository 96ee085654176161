//! Client domain record.
//!
//! # Responsibility
//! - Represent a shop partner/customer linked to at most one user.
//! - Expose the record as a flat field mapping for upstream handlers.
//!
//! # Invariants
//! - `attributes` never shadows `id` or `users_permissions_user`.
//! - A set user link is always a present `UserId`.

use super::user::UserId;
use super::ModelValidationError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Storage-assigned client identifier.
pub type ClientId = i64;

/// Field names owned by the record itself rather than `attributes`.
pub const RESERVED_FIELDS: &[&str] = &["id", "users_permissions_user", "created_at"];

/// Persisted client record.
///
/// Serializes as one flat object: `{"id": .., "users_permissions_user": .., ..attributes}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    /// Link to the owning user account; `None` for unlinked clients.
    pub users_permissions_user: Option<UserId>,
    /// Opaque business fields (company name, address, ...).
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Client {
    /// Returns the record as a plain field-name to value mapping.
    pub fn field_map(&self) -> Map<String, Value> {
        let mut fields = self.attributes.clone();
        fields.insert("id".to_string(), Value::from(self.id));
        let user = match &self.users_permissions_user {
            Some(UserId::Int(value)) => Value::from(*value),
            Some(UserId::Text(value)) => Value::from(value.as_str()),
            None => Value::Null,
        };
        fields.insert("users_permissions_user".to_string(), user);
        fields
    }

    /// Reads one attribute by name.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }
}

/// Write model for creating a client (the reseller sign-up path).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewClient {
    pub users_permissions_user: Option<UserId>,
    pub attributes: Map<String, Value>,
}

impl NewClient {
    pub fn for_user(user: impl Into<UserId>) -> Self {
        Self {
            users_permissions_user: Some(user.into()),
            attributes: Map::new(),
        }
    }

    /// Adds one attribute, builder style.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if let Some(user) = &self.users_permissions_user {
            if !user.is_present() {
                return Err(ModelValidationError::BlankUserLink);
            }
        }
        if let Some(key) = RESERVED_FIELDS
            .iter()
            .find(|key| self.attributes.contains_key(**key))
        {
            return Err(ModelValidationError::ReservedAttribute((*key).to_string()));
        }
        Ok(())
    }
}
