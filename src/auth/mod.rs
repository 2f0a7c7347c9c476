use std::collections::HashMap;

use serde_json::Value;

use crate::error::RpcError;

/// Well-known context slot holding the authenticated user's id
pub const CTX_USER_ID: &str = "user_id";

/// Request-scoped values attached by the host to each inbound call.
///
/// Handlers never look values up by name; the only read path is
/// [`CallContext::identity`].
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    values: HashMap<String, Value>,
}

impl CallContext {
    /// Context for a call without any end-user identity
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for a call made by an authenticated end user
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self::new().with_value(CTX_USER_ID, Value::String(user_id.into()))
    }

    /// Attach an arbitrary host value (used when bridging host contexts)
    pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Resolve who is calling. Anything other than a non-empty string in the
    /// user slot is treated as a server-to-server call.
    pub fn identity(&self) -> Identity {
        match self.values.get(CTX_USER_ID) {
            Some(Value::String(id)) if !id.is_empty() => Identity::Authenticated(id.clone()),
            _ => Identity::ServerToServer,
        }
    }

    pub fn user_id(&self) -> Option<String> {
        self.identity().user_id().map(str::to_string)
    }
}

/// Caller class derived from a [`CallContext`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Authenticated(String),
    ServerToServer,
}

impl Identity {
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Identity::Authenticated(id) => Some(id),
            Identity::ServerToServer => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::Authenticated(_))
    }

    /// Gate for user-only operations
    pub fn require_user(self) -> Result<String, RpcError> {
        match self {
            Identity::Authenticated(id) => Ok(id),
            Identity::ServerToServer => Err(RpcError::UserNotFound),
        }
    }
}
