//! Automation records as served by the lookup capability.

use serde::{Deserialize, Serialize};

/// An external automation that a `Process` node may reference.
///
/// Opaque to the simulator: only `name` ever ends up on a node (as
/// `automationName`), next to the `id` it was resolved from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Automation {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
}

impl Automation {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            category: category.into(),
        }
    }
}
