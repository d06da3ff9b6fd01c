//! Per-label call counters
//!
//! Backed by a prometheus `IntCounterVec`: each label value owns an atomic
//! cell, and new label values are inserted under a short write lock. An
//! increment is a single atomic add, and a snapshot only ever reads whole
//! cells, so concurrent readers observe either the old or the new value.

use std::collections::btree_map;
use std::collections::BTreeMap;

use prometheus::core::Collector;
use prometheus::{IntCounterVec, Opts};

use crate::error::Result;

/// Monotonic counters keyed by one label
///
/// Cloning is cheap; clones share the same counters.
#[derive(Clone)]
pub struct CounterStore {
    name: String,
    label: String,
    counters: IntCounterVec,
}

impl CounterStore {
    pub(crate) fn new(name: &str, help: &str, label: &str) -> Result<Self> {
        let counters = IntCounterVec::new(Opts::new(name, help), &[label])?;

        Ok(Self {
            name: name.to_string(),
            label: label.to_string(),
            counters,
        })
    }

    /// Series name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add one to the counter for `value`, creating it at 1 if absent
    pub fn increment(&self, value: &str) {
        self.counters.with_label_values(&[value]).inc();
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> CounterSnapshot {
        let families = self.counters.collect();

        let entries = families
            .iter()
            .flat_map(|family| family.get_metric())
            .filter_map(|metric| {
                let pair = metric
                    .get_label()
                    .iter()
                    .find(|pair| pair.get_name() == self.label)?;
                Some((
                    pair.get_value().to_string(),
                    metric.get_counter().get_value() as u64,
                ))
            })
            .collect();

        CounterSnapshot { entries }
    }

    pub(crate) fn collector(&self) -> IntCounterVec {
        self.counters.clone()
    }
}

/// Immutable copy of a [`CounterStore`] taken at one point in time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    entries: BTreeMap<String, u64>,
}

impl CounterSnapshot {
    pub fn get(&self, label: &str) -> Option<u64> {
        self.entries.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, u64> {
        self.entries.iter()
    }
}

impl IntoIterator for CounterSnapshot {
    type Item = (String, u64);
    type IntoIter = btree_map::IntoIter<String, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
