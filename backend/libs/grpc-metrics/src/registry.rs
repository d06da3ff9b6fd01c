//! Process-owned Prometheus registry
//!
//! Wraps a dedicated `prometheus::Registry` rather than the global default so
//! that every series a service exposes is created explicitly during startup
//! and handed to whoever needs it.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use prometheus::core::Collector;
use prometheus::proto::MetricFamily;
use prometheus::{Encoder, Registry, TextEncoder};

use crate::counter::CounterStore;
use crate::error::{MetricsError, Result};

/// Registry of all metric series exposed by one process
///
/// Cloning is cheap; clones share the same underlying registry.
#[derive(Clone, Default)]
pub struct MetricsRegistry {
    inner: Registry,
    names: Arc<Mutex<BTreeSet<String>>>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collector
    ///
    /// Fails with [`MetricsError::Duplicate`] if any series name exported by
    /// the collector is already registered, regardless of its labels or help
    /// text.
    pub fn register(&self, collector: Box<dyn Collector>) -> Result<()> {
        let fq_names: Vec<String> = collector
            .desc()
            .iter()
            .map(|desc| desc.fq_name.clone())
            .collect();

        let mut names = self
            .names
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(existing) = fq_names.iter().find(|name| names.contains(*name)) {
            return Err(MetricsError::Duplicate(existing.clone()));
        }

        self.inner.register(collector).map_err(|err| match err {
            prometheus::Error::AlreadyReg => MetricsError::Duplicate(fq_names.join(", ")),
            other => MetricsError::Prometheus(other),
        })?;

        names.extend(fq_names);
        Ok(())
    }

    /// Create and register a counter series keyed by a single label
    pub fn register_counter(&self, name: &str, help: &str, label: &str) -> Result<CounterStore> {
        let store = CounterStore::new(name, help, label)?;
        self.register(Box::new(store.collector()))?;
        Ok(store)
    }

    /// Names of every registered series, sorted
    pub fn series_names(&self) -> Vec<String> {
        self.names
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .cloned()
            .collect()
    }

    pub fn gather(&self) -> Vec<MetricFamily> {
        self.inner.gather()
    }

    /// Encode the current state of the registry in the Prometheus text format
    pub fn encode_text(&self) -> Result<Vec<u8>> {
        let encoder = TextEncoder::new();
        let metric_families = self.gather();

        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|err| MetricsError::Encode(err.to_string()))?;

        Ok(buffer)
    }
}
