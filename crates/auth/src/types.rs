//! Auth read-model types
//!
//! A lightweight view of the user row owned by the accounts domain,
//! carrying only what session authentication and handlers need.

use converse_common::ObjectId;

/// Lightweight identity for authenticated users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthIdentity {
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub is_verified: bool,
}
