//! In-process store used by tests and when no database is configured.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{InvestmentStore, StoreError};
use crate::types::investment::Investment;

#[derive(Default)]
struct Tables {
    records: HashMap<Uuid, Investment>,
    by_owner: HashMap<Uuid, HashSet<Uuid>>,
}

/// Records keyed by id plus an owner -> ids index, kept consistent under one lock.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.tables.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl InvestmentStore for MemoryStore {
    async fn get(&self, id: Uuid) -> Result<Option<Investment>, StoreError> {
        Ok(self.tables.read().await.records.get(&id).cloned())
    }

    async fn insert(&self, investment: &Investment) -> Result<(), StoreError> {
        let mut guard = self.tables.write().await;
        guard
            .by_owner
            .entry(investment.owner_id)
            .or_default()
            .insert(investment.id);
        guard.records.insert(investment.id, investment.clone());
        Ok(())
    }

    async fn update(&self, investment: &Investment) -> Result<Option<Investment>, StoreError> {
        let mut guard = self.tables.write().await;
        let Some(stored) = guard.records.get_mut(&investment.id) else {
            return Ok(None);
        };
        stored.symbol = investment.symbol.clone();
        stored.quantity = investment.quantity;
        stored.purchase_price = investment.purchase_price;
        stored.purchase_date = investment.purchase_date;
        stored.notes = investment.notes.clone();
        stored.updated_at = investment.updated_at;
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut guard = self.tables.write().await;
        let Some(removed) = guard.records.remove(&id) else {
            return Ok(false);
        };
        if let Some(ids) = guard.by_owner.get_mut(&removed.owner_id) {
            ids.remove(&id);
            if ids.is_empty() {
                guard.by_owner.remove(&removed.owner_id);
            }
        }
        Ok(true)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Investment>, StoreError> {
        let guard = self.tables.read().await;
        let Some(ids) = guard.by_owner.get(&owner_id) else {
            return Ok(Vec::new());
        };
        Ok(ids
            .iter()
            .filter_map(|id| guard.records.get(id).cloned())
            .collect())
    }
}
