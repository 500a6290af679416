//! Prometheus metrics for the logs API server.

use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::registry::Registry;

/// Container for all Prometheus metrics.
pub struct Metrics {
    registry: Registry,

    /// Counter of log records created.
    pub logs_created_total: Counter,

    /// Counter of log records updated.
    pub logs_updated_total: Counter,

    /// Counter of log records deleted.
    pub logs_deleted_total: Counter,

    /// Counter of paginated list queries served.
    pub list_queries_total: Counter,

    /// Counter of grouped-aggregation queries served.
    pub aggregation_queries_total: Counter,

    /// Counter of CSV exports served.
    pub csv_exports_total: Counter,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let logs_created_total = Counter::default();
        registry.register(
            "logdash_logs_created",
            "Total log records created",
            logs_created_total.clone(),
        );

        let logs_updated_total = Counter::default();
        registry.register(
            "logdash_logs_updated",
            "Total log records updated",
            logs_updated_total.clone(),
        );

        let logs_deleted_total = Counter::default();
        registry.register(
            "logdash_logs_deleted",
            "Total log records deleted",
            logs_deleted_total.clone(),
        );

        let list_queries_total = Counter::default();
        registry.register(
            "logdash_list_queries",
            "Total paginated list queries served",
            list_queries_total.clone(),
        );

        let aggregation_queries_total = Counter::default();
        registry.register(
            "logdash_aggregation_queries",
            "Total grouped aggregation queries served",
            aggregation_queries_total.clone(),
        );

        let csv_exports_total = Counter::default();
        registry.register(
            "logdash_csv_exports",
            "Total CSV exports served",
            csv_exports_total.clone(),
        );

        Self {
            registry,
            logs_created_total,
            logs_updated_total,
            logs_deleted_total,
            list_queries_total,
            aggregation_queries_total,
            csv_exports_total,
        }
    }

    /// Encodes the registry in Prometheus text exposition format.
    pub fn encode(&self) -> String {
        let mut buffer = String::new();
        encode(&mut buffer, &self.registry).expect("metrics encoding failed");
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_encode_registered_counters() {
        let metrics = Metrics::new();
        metrics.logs_created_total.inc();
        metrics.csv_exports_total.inc();

        let text = metrics.encode();

        assert!(text.contains("logdash_logs_created_total 1"));
        assert!(text.contains("logdash_csv_exports_total 1"));
        assert!(text.contains("logdash_logs_deleted_total 0"));
    }
}
