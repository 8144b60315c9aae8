//! The `AutomationLookup` trait: the contract for resolving automation references.

use async_trait::async_trait;

use crate::{Automation, LookupError};

/// Read-only access to the automation records a node may reference.
#[async_trait]
pub trait AutomationLookup: Send + Sync {
    /// Every automation the backend knows about, in catalog order.
    async fn list(&self) -> Result<Vec<Automation>, LookupError>;

    /// Resolve a single automation by id. Unknown ids yield `Ok(None)`.
    async fn get(&self, id: &str) -> Result<Option<Automation>, LookupError>;
}
