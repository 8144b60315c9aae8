//! `MockCatalog`: an in-memory [`AutomationLookup`] backed by a fixed list.
//!
//! Ships the eight HR automations the editor offers out of the box. Tests can
//! make it fail or slow it down, and inspect every call it received.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::{Automation, AutomationLookup, LookupError};

/// Behaviour injected into `MockCatalog` at construction time.
pub enum MockBehaviour {
    /// Serve the catalog entries.
    Serve,
    /// Fail every call with [`LookupError::Unavailable`].
    FailUnavailable(String),
}

/// A catalog that records every call it receives.
pub struct MockCatalog {
    /// Entries served by `list` / `get`, in order.
    pub entries: Vec<Automation>,
    /// What the catalog does when called.
    pub behaviour: MockBehaviour,
    /// Artificial delay before each response.
    pub latency: Duration,
    /// Calls seen so far (`"list"` or `"get:<id>"`), in call order.
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl MockCatalog {
    /// Catalog serving the given entries with no latency.
    pub fn with_entries(entries: Vec<Automation>) -> Self {
        Self {
            entries,
            behaviour: MockBehaviour::Serve,
            latency: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Catalog serving [`builtin_automations`].
    pub fn builtin() -> Self {
        Self::with_entries(builtin_automations())
    }

    /// Catalog that fails every call.
    pub fn failing(msg: impl Into<String>) -> Self {
        Self {
            behaviour: MockBehaviour::FailUnavailable(msg.into()),
            ..Self::with_entries(Vec::new())
        }
    }

    /// Delay every response by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    async fn respond(&self, call: String) -> Result<(), LookupError> {
        debug!(call = %call, "automation lookup");
        self.calls.lock().unwrap().push(call);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        match &self.behaviour {
            MockBehaviour::Serve => Ok(()),
            MockBehaviour::FailUnavailable(msg) => Err(LookupError::Unavailable(msg.clone())),
        }
    }
}

#[async_trait]
impl AutomationLookup for MockCatalog {
    async fn list(&self) -> Result<Vec<Automation>, LookupError> {
        self.respond("list".to_owned()).await?;
        Ok(self.entries.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<Automation>, LookupError> {
        self.respond(format!("get:{id}")).await?;
        Ok(self.entries.iter().find(|a| a.id == id).cloned())
    }
}

/// The automations offered by the editor's process-node form.
pub fn builtin_automations() -> Vec<Automation> {
    vec![
        Automation::new("auto_1", "Send Welcome Email", "Automatically send welcome email to new hires", "Onboarding"),
        Automation::new("auto_2", "Create IT Ticket", "Create IT ticket for equipment setup", "IT"),
        Automation::new("auto_3", "Schedule Training", "Schedule onboarding training sessions", "Training"),
        Automation::new("auto_4", "Notify Manager", "Send notification to manager about new hire", "Communication"),
        Automation::new("auto_5", "Add to Payroll", "Automatically add employee to payroll system", "HR"),
        Automation::new("auto_6", "Provision Access", "Grant access to company systems and tools", "IT"),
        Automation::new("auto_7", "Exit Checklist", "Create exit checklist for offboarding", "Offboarding"),
        Automation::new("auto_8", "Collect Feedback", "Send survey to collect employee feedback", "Survey"),
    ]
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builtin_catalog_lists_all_entries_in_order() {
        let catalog = MockCatalog::builtin();
        let all = catalog.list().await.expect("list should succeed");

        assert_eq!(all.len(), 8);
        assert_eq!(all[0].name, "Send Welcome Email");
        assert_eq!(all[7].id, "auto_8");
        assert_eq!(catalog.call_count(), 1);
    }

    #[tokio::test]
    async fn get_resolves_known_id_and_misses_unknown() {
        let catalog = MockCatalog::builtin();

        let found = catalog.get("auto_4").await.unwrap();
        assert_eq!(found.map(|a| a.name), Some("Notify Manager".to_string()));

        let missing = catalog.get("auto_99").await.unwrap();
        assert!(missing.is_none());

        assert_eq!(*catalog.calls.lock().unwrap(), vec!["get:auto_4", "get:auto_99"]);
    }

    #[tokio::test]
    async fn failing_catalog_reports_unavailable() {
        let catalog = MockCatalog::failing("connection refused");
        let result = catalog.list().await;
        assert_eq!(
            result,
            Err(LookupError::Unavailable("connection refused".into()))
        );
        assert_eq!(catalog.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn latency_delays_the_response() {
        let catalog = MockCatalog::builtin().with_latency(Duration::from_millis(500));
        let started = tokio::time::Instant::now();

        catalog.list().await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(500));
    }
}
