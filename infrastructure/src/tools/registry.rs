//! Tool Registry
//!
//! The [`ToolRegistry`] maps tool names to handlers, indexes them by
//! category and keeps two error ledgers (rejected registrations and failed
//! discovery units). It implements [`ToolRegistryPort`].
//!
//! # Usage
//!
//! ```ignore
//! use relay_infrastructure::tools::{BuiltinToolProvider, ToolRegistry};
//!
//! let registry = Arc::new(ToolRegistry::new());
//! registry.discover(&[Arc::new(BuiltinToolProvider::new())]).await;
//!
//! assert!(registry.lookup("get_current_datetime").is_some());
//! println!("{:?}", registry.status());
//! ```
//!
//! # Priority-Based Discovery
//!
//! Providers are visited from highest to lowest priority. The first
//! registration of a name wins; later ones are recorded as collisions, so a
//! high-priority provider can shadow a built-in tool.
//!
//! # Concurrency
//!
//! Readers clone an `Arc` of the current snapshot under a short read lock
//! and never see a half-applied registration. Writers copy the snapshot
//! only when a reader still holds it.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use parking_lot::RwLock;
use relay_application::ports::tool_registry::{RegistryError, RegistryStatus, ToolRegistryPort};
use relay_domain::{ToolDescriptor, ToolHandler, ToolProvider};
use tracing::{debug, info, warn};

#[derive(Clone, Default)]
struct Snapshot {
    tools: BTreeMap<String, Arc<dyn ToolHandler>>,
    categories: BTreeMap<String, BTreeSet<String>>,
    registration_errors: BTreeMap<String, String>,
    discovery_errors: BTreeMap<String, String>,
}

/// Process-wide tool registry, shared by `Arc`.
#[derive(Default)]
pub struct ToolRegistry {
    inner: RwLock<Arc<Snapshot>>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(&self) -> Arc<Snapshot> {
        self.inner.read().clone()
    }

    /// Register a handler under its descriptor name.
    ///
    /// A second registration of the same name is rejected and recorded; the
    /// first one stays in place.
    pub fn register(&self, handler: Arc<dyn ToolHandler>) -> Result<(), RegistryError> {
        let name = handler.name().to_string();
        let mut guard = self.inner.write();
        let snapshot = Arc::make_mut(&mut guard);

        let rejected = if !is_valid_tool_name(&name) {
            Some(RegistryError::InvalidName(name.clone()))
        } else if snapshot.tools.contains_key(&name) {
            Some(RegistryError::Duplicate(name.clone()))
        } else {
            None
        };

        if let Some(err) = rejected {
            warn!(tool = %name, error = %err, "Tool registration rejected");
            snapshot.registration_errors.insert(name, err.to_string());
            return Err(err);
        }

        for category in handler.descriptor().categories() {
            snapshot
                .categories
                .entry(category.clone())
                .or_default()
                .insert(name.clone());
        }
        snapshot.tools.insert(name.clone(), handler);
        debug!(tool = %name, "Registered tool");
        Ok(())
    }

    /// Record a discovery unit that failed to load.
    pub fn record_discovery_error(&self, source: &str, message: &str) {
        warn!(source = %source, error = %message, "Tool discovery failed");
        let mut guard = self.inner.write();
        Arc::make_mut(&mut guard)
            .discovery_errors
            .insert(source.to_string(), message.to_string());
    }

    /// Discover tools from all providers, highest priority first.
    ///
    /// Never fails: unavailable providers are skipped, failing ones are
    /// recorded in the discovery ledger.
    pub async fn discover(&self, providers: &[Arc<dyn ToolProvider>]) {
        let mut providers: Vec<_> = providers.to_vec();
        providers.sort_by_key(|p| std::cmp::Reverse(p.priority()));

        for provider in &providers {
            if !provider.is_available().await {
                debug!(provider = provider.id(), "Provider not available, skipping");
                continue;
            }

            match provider.discover().await {
                Ok(tools) => {
                    let count = tools.len();
                    for tool in tools {
                        // Rejections are already recorded in the ledger
                        let _ = self.register(tool);
                    }
                    info!(
                        provider = provider.id(),
                        tools = count,
                        "Discovered tools"
                    );
                }
                Err(e) => self.record_discovery_error(provider.id(), &e.to_string()),
            }
        }
    }

    pub fn descriptor(&self, name: &str) -> Option<ToolDescriptor> {
        self.snapshot()
            .tools
            .get(name)
            .map(|h| h.descriptor().clone())
    }

    pub fn categories(&self) -> Vec<String> {
        self.snapshot().categories.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.snapshot().tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ToolRegistryPort for ToolRegistry {
    fn lookup(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        self.snapshot().tools.get(name).cloned()
    }

    fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.snapshot()
            .tools
            .values()
            .map(|h| h.descriptor().clone())
            .collect()
    }

    fn by_category(&self, category: &str) -> BTreeSet<String> {
        self.snapshot()
            .categories
            .get(category)
            .cloned()
            .unwrap_or_default()
    }

    fn status(&self) -> RegistryStatus {
        let snapshot = self.snapshot();
        RegistryStatus {
            total_tools: snapshot.tools.len(),
            total_categories: snapshot.categories.len(),
            tools_by_category: snapshot
                .categories
                .iter()
                .map(|(c, names)| (c.clone(), names.len()))
                .collect(),
            registration_errors: snapshot.registration_errors.clone(),
            discovery_errors: snapshot.discovery_errors.clone(),
        }
    }
}

/// Function names accepted by chat-completion APIs.
fn is_valid_tool_name(name: &str) -> bool {
    (1..=64).contains(&name.len())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use relay_domain::{FnTool, ProviderError, ToolCapabilities};
    use serde_json::json;

    fn tool(name: &str, result: &str, categories: &[&str]) -> Arc<dyn ToolHandler> {
        let result = result.to_string();
        FnTool::new(
            ToolDescriptor::new(name, "test tool").with_capabilities(
                ToolCapabilities::default().with_categories(categories.iter().copied()),
            ),
            move |_ctx| {
                let result = result.clone();
                async move { Ok(json!(result)) }
            },
        )
        .into_handler()
    }

    struct StaticProvider {
        id: &'static str,
        priority: i32,
        tools: Vec<Arc<dyn ToolHandler>>,
    }

    #[async_trait]
    impl ToolProvider for StaticProvider {
        fn id(&self) -> &str {
            self.id
        }

        fn display_name(&self) -> &str {
            self.id
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        async fn discover(&self) -> Result<Vec<Arc<dyn ToolHandler>>, ProviderError> {
            Ok(self.tools.clone())
        }
    }

    struct BrokenProvider;

    #[async_trait]
    impl ToolProvider for BrokenProvider {
        fn id(&self) -> &str {
            "broken"
        }

        fn display_name(&self) -> &str {
            "Broken"
        }

        async fn discover(&self) -> Result<Vec<Arc<dyn ToolHandler>>, ProviderError> {
            Err(ProviderError::DiscoveryFailed("module failed to import".into()))
        }
    }

    #[test]
    fn test_duplicate_registration_keeps_first() {
        let registry = ToolRegistry::new();
        registry.register(tool("lookup", "first", &[])).unwrap();

        let err = registry.register(tool("lookup", "second", &[])).unwrap_err();

        assert_eq!(err, RegistryError::Duplicate("lookup".into()));
        assert_eq!(registry.len(), 1);
        let status = registry.status();
        assert_eq!(
            status.registration_errors,
            BTreeMap::from([(
                "lookup".to_string(),
                "Tool lookup is already registered".to_string()
            )])
        );
    }

    #[tokio::test]
    async fn test_lookup_returns_first_registration() {
        let registry = ToolRegistry::new();
        registry.register(tool("lookup", "first", &[])).unwrap();
        let _ = registry.register(tool("lookup", "second", &[]));

        let handler = registry.lookup("lookup").unwrap();
        let ctx = relay_domain::ExecutionContext::new("lookup", "c1", Default::default());
        assert_eq!(handler.invoke(&ctx).await.unwrap(), json!("first"));
    }

    #[test]
    fn test_invalid_name_rejected() {
        let registry = ToolRegistry::new();
        let err = registry.register(tool("has space", "x", &[])).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidName(_)));
        assert!(registry.is_empty());
        assert!(registry.status().registration_errors.contains_key("has space"));
    }

    #[test]
    fn test_category_index() {
        let registry = ToolRegistry::new();
        registry.register(tool("weather", "", &["web", "info"])).unwrap();
        registry.register(tool("clock", "", &[])).unwrap();

        assert_eq!(
            registry.by_category("web"),
            BTreeSet::from(["weather".to_string()])
        );
        assert!(registry.by_category("general").contains("clock"));
        assert!(registry.by_category("missing").is_empty());
        assert_eq!(registry.categories(), vec!["general", "info", "web"]);

        let status = registry.status();
        assert_eq!(status.total_tools, 2);
        assert_eq!(status.total_categories, 3);
        assert_eq!(status.tools_by_category["web"], 1);
    }

    #[test]
    fn test_descriptors_sorted_by_name() {
        let registry = ToolRegistry::new();
        registry.register(tool("zeta", "", &[])).unwrap();
        registry.register(tool("alpha", "", &[])).unwrap();

        let names: Vec<_> = registry.descriptors().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[tokio::test]
    async fn test_discover_by_priority_and_records_failures() {
        let registry = ToolRegistry::new();
        let providers: Vec<Arc<dyn ToolProvider>> = vec![
            Arc::new(StaticProvider {
                id: "builtin",
                priority: -100,
                tools: vec![tool("search", "builtin", &[]), tool("clock", "", &[])],
            }),
            Arc::new(BrokenProvider),
            Arc::new(StaticProvider {
                id: "custom",
                priority: 50,
                tools: vec![tool("search", "custom", &[])],
            }),
        ];

        registry.discover(&providers).await;

        let ctx = relay_domain::ExecutionContext::new("search", "c1", Default::default());
        let search = registry.lookup("search").unwrap();
        assert_eq!(search.invoke(&ctx).await.unwrap(), json!("custom"));
        assert!(registry.lookup("clock").is_some());

        let status = registry.status();
        assert_eq!(status.total_tools, 2);
        assert_eq!(status.registration_errors.len(), 1);
        assert!(status.registration_errors.contains_key("search"));
        assert_eq!(status.discovery_errors.len(), 1);
        assert!(status.discovery_errors.contains_key("broken"));
        assert!(status.has_errors());
    }

    #[test]
    fn test_snapshot_is_point_in_time() {
        let registry = ToolRegistry::new();
        registry.register(tool("a", "", &[])).unwrap();
        let before = registry.snapshot();

        registry.register(tool("b", "", &[])).unwrap();

        assert_eq!(before.tools.len(), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_concurrent_lookups_during_registration() {
        let registry = Arc::new(ToolRegistry::new());
        registry.register(tool("base", "", &[])).unwrap();

        std::thread::scope(|s| {
            for i in 0..4 {
                let registry = registry.clone();
                s.spawn(move || {
                    for j in 0..25 {
                        let _ = registry.register(tool(&format!("t{}_{}", i, j), "", &[]));
                        assert!(registry.lookup("base").is_some());
                    }
                });
            }
        });

        assert_eq!(registry.len(), 101);
    }
}
