use std::sync::Arc;

use anyhow::Result;

use ventureflow_core::store::{keys, KvStore};

/// Durable accessor for the persisted blocked flag.
#[derive(Debug, Clone)]
pub struct GateState {
    store: Arc<KvStore>,
}

impl GateState {
    pub fn new(store: Arc<KvStore>) -> Self {
        Self { store }
    }

    /// Flag from the previous launch; absent means fail-safe native UI.
    pub fn load_blocked(&self) -> bool {
        self.store.get(keys::GATE_BLOCKED).unwrap_or(true)
    }

    pub fn save_blocked(&self, blocked: bool) -> Result<()> {
        self.store.set(keys::GATE_BLOCKED, &blocked)
    }
}
