//! `automations` crate: the automation lookup capability and the built-in catalog.
//!
//! The editing surface resolves an `automationId` to a display name through
//! [`AutomationLookup`] and stores the result on the node. The simulation core
//! only ever reads that already-resolved name; it never calls into this crate.

pub mod error;
pub mod models;
pub mod traits;
pub mod mock;

pub use error::LookupError;
pub use models::Automation;
pub use traits::AutomationLookup;
pub use mock::MockCatalog;
