//! Registry of rate providers with a single active selection.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{info, warn};

use crate::provider::RateProvider;

#[derive(Default)]
struct RegistryState {
    providers: HashMap<String, Arc<dyn RateProvider>>,
    active_id: Option<String>,
}

/// Provider summary for selection views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderDescriptor {
    pub id: String,
    pub display_name: String,
    pub active: bool,
}

/// Holds the registered providers and the active provider id.
///
/// Every operation runs inside one critical section. The lock is never held
/// across an `.await`: callers get an `Arc` to the provider and query it
/// after the lock is released.
#[derive(Default)]
pub struct ProviderRegistry {
    state: Mutex<RegistryState>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider, replacing any provider with the same id.
    ///
    /// The first registered provider becomes active.
    pub fn register(&self, provider: Arc<dyn RateProvider>) {
        let id = provider.id().to_string();
        let mut state = self.state.lock();

        let replaced = state.providers.insert(id.clone(), provider).is_some();
        let activated = state.active_id.is_none();
        if activated {
            state.active_id = Some(id.clone());
        }

        info!(provider = %id, replaced, activated, "Registered rate provider");
    }

    /// Snapshot of all registered providers, in no particular order.
    pub fn list_all(&self) -> Vec<Arc<dyn RateProvider>> {
        self.state.lock().providers.values().cloned().collect()
    }

    /// The active provider, if any provider is registered.
    pub fn get_active(&self) -> Option<Arc<dyn RateProvider>> {
        let state = self.state.lock();
        let active = state
            .active_id
            .as_ref()
            .and_then(|id| state.providers.get(id))
            .cloned();
        active
    }

    /// Select the active provider. Unknown ids are ignored.
    pub fn set_active(&self, id: &str) {
        let mut state = self.state.lock();
        if state.providers.contains_key(id) {
            state.active_id = Some(id.to_string());
            info!(provider = %id, "Active rate provider changed");
        } else {
            warn!(provider = %id, "Ignoring selection of unknown rate provider");
        }
    }

    /// Id of the active provider.
    pub fn active_id(&self) -> Option<String> {
        self.state.lock().active_id.clone()
    }

    /// Check if a provider id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.state.lock().providers.contains_key(id)
    }

    /// Provider summaries sorted by id.
    pub fn descriptors(&self) -> Vec<ProviderDescriptor> {
        let state = self.state.lock();
        let mut descriptors: Vec<ProviderDescriptor> = state
            .providers
            .values()
            .map(|p| ProviderDescriptor {
                id: p.id().to_string(),
                display_name: p.display_name().to_string(),
                active: state.active_id.as_deref() == Some(p.id()),
            })
            .collect();
        descriptors.sort_by(|a, b| a.id.cmp(&b.id));
        descriptors
    }

    pub fn len(&self) -> usize {
        self.state.lock().providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockRateProvider;

    fn mock(id: &str) -> Arc<dyn RateProvider> {
        Arc::new(
            MockRateProvider::new()
                .with_identity(id, format!("Provider {id}"))
                .without_latency(),
        )
    }

    #[test]
    fn test_empty_registry() {
        let registry = ProviderRegistry::new();

        assert!(registry.get_active().is_none());
        assert!(registry.active_id().is_none());
        assert!(registry.is_empty());
        assert!(registry.list_all().is_empty());
    }

    #[test]
    fn test_first_registration_activates() {
        let registry = ProviderRegistry::new();
        registry.register(mock("first"));
        registry.register(mock("second"));

        assert_eq!(registry.get_active().unwrap().id(), "first");
        assert_eq!(registry.active_id().as_deref(), Some("first"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_set_active_known_and_unknown() {
        let registry = ProviderRegistry::new();
        registry.register(mock("a"));
        registry.register(mock("b"));

        registry.set_active("b");
        assert_eq!(registry.active_id().as_deref(), Some("b"));

        registry.set_active("does-not-exist");
        assert_eq!(registry.active_id().as_deref(), Some("b"));
        assert_eq!(registry.get_active().unwrap().id(), "b");
    }

    #[test]
    fn test_set_active_on_empty_registry_is_ignored() {
        let registry = ProviderRegistry::new();
        registry.set_active("mock");

        assert!(registry.active_id().is_none());
    }

    #[test]
    fn test_reregistration_replaces_without_changing_active() {
        let registry = ProviderRegistry::new();
        registry.register(mock("a"));
        registry.register(mock("b"));

        let replacement: Arc<dyn RateProvider> = Arc::new(
            MockRateProvider::new()
                .with_identity("b", "Replacement")
                .without_latency(),
        );
        registry.register(replacement);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.active_id().as_deref(), Some("a"));

        let names: Vec<String> = registry
            .descriptors()
            .into_iter()
            .map(|d| d.display_name)
            .collect();
        assert_eq!(names, vec!["Provider a".to_string(), "Replacement".to_string()]);
    }

    #[test]
    fn test_descriptors_mark_active() {
        let registry = ProviderRegistry::new();
        registry.register(mock("zeta"));
        registry.register(mock("alpha"));

        let descriptors = registry.descriptors();
        assert_eq!(descriptors[0].id, "alpha");
        assert!(!descriptors[0].active);
        assert_eq!(descriptors[1].id, "zeta");
        assert!(descriptors[1].active);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_registration_keeps_invariants() {
        let registry = Arc::new(ProviderRegistry::new());

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let registry = registry.clone();
                tokio::spawn(async move {
                    registry.register(mock(&format!("p{i}")));
                    // A reader racing the registrations sees either nothing or a
                    // registered provider.
                    if let Some(id) = registry.active_id() {
                        assert!(registry.contains(&id));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(registry.len(), 32);
        let active = registry.active_id().unwrap();
        assert!(registry.contains(&active));
        assert_eq!(registry.descriptors().iter().filter(|d| d.active).count(), 1);
    }
}
