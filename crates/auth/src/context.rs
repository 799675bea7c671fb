//! Authorization context for authenticated users

use converse_common::ObjectId;

use crate::types::AuthIdentity;

/// Represents an authenticated user context
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: AuthIdentity,
}

impl AuthContext {
    pub fn new(user: AuthIdentity) -> Self {
        Self { user }
    }

    pub fn user_id(&self) -> ObjectId {
        self.user.id
    }

    pub fn is_verified(&self) -> bool {
        self.user.is_verified
    }

    /// Check whether the user owns a resource
    pub fn owns(&self, owner_id: ObjectId) -> bool {
        self.user.id == owner_id
    }
}
