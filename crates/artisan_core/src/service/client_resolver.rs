//! Client resolution use-case.
//!
//! # Responsibility
//! - Map an authenticated user to the client record linked to it.
//!
//! # Invariants
//! - Missing or falsy user ids never reach the store.
//! - At most one store call per lookup; nothing is cached or written.
//! - Store errors are returned unchanged, never turned into "no client".

use crate::model::client::Client;
use crate::model::user::UserId;
use crate::repo::client_repo::{ClientStore, RepoResult};
use log::debug;

/// Resolves users to their client records through an injected store.
pub struct ClientResolver<S: ClientStore> {
    store: S,
}

impl<S: ClientStore> ClientResolver<S> {
    /// Creates a resolver using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the client linked to `user_id`.
    ///
    /// # Contract
    /// - `None`, `Int(0)` and empty text return `Ok(None)` without a lookup.
    /// - An unlinked user returns `Ok(None)`.
    /// - When several clients are linked, the store's first match is returned.
    ///
    /// # Errors
    /// Propagates the store's `RepoError` as-is.
    pub fn get_client_from_user(&self, user_id: Option<&UserId>) -> RepoResult<Option<Client>> {
        let Some(user_id) = user_id.filter(|id| id.is_present()) else {
            debug!("event=client_resolve module=service status=skipped reason=missing_user_id");
            return Ok(None);
        };

        match self.store.find_one_by_user(user_id) {
            Ok(Some(client)) => {
                debug!(
                    "event=client_resolve module=service status=found user_id={user_id} client_id={}",
                    client.id
                );
                Ok(Some(client))
            }
            Ok(None) => {
                debug!("event=client_resolve module=service status=not_found user_id={user_id}");
                Ok(None)
            }
            Err(err) => {
                debug!(
                    "event=client_resolve module=service status=error user_id={user_id} error={err}"
                );
                Err(err)
            }
        }
    }
}
