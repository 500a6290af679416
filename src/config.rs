//! Backend configuration for the log store.

/// Storage backend selection.
///
/// The store is a capability, not a specific product; additional backends
/// plug in here without touching the query engine or handlers.
#[derive(Debug, Clone, Default)]
pub enum StoreConfig {
    /// In-process storage. The default, and the backend used by tests.
    #[default]
    InMemory,
}
