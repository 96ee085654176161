//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the narrow storage capability the resolver depends on.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes run `validate()` before persistence.
//! - Read paths reject invalid persisted state instead of masking it.

pub mod client_repo;
