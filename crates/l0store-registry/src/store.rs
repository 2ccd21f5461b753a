//! Record storage.
//!
//! [`ApiIdStore`] is the seam between the registry service and wherever the
//! records live. [`InMemoryApiIdStore`] keeps them in a [`DashMap`] keyed by
//! API identifier.

use std::fmt::Debug;

use dashmap::DashMap;
use uuid::Uuid;

use crate::error::RegistryResult;
use crate::model::ApiIdRecord;
use crate::page::PageRequest;

/// Persistence for API identifier records.
pub trait ApiIdStore: Debug + Send + Sync {
    /// Insert or replace a record.
    fn save(&self, record: ApiIdRecord) -> RegistryResult<ApiIdRecord>;

    /// Look up a record by identifier.
    fn find_by_id(&self, api_id: &Uuid) -> RegistryResult<Option<ApiIdRecord>>;

    /// One page of a customer's records, ordered by creation time, plus the
    /// customer's total record count.
    fn find_by_customer(
        &self,
        customer_id: &str,
        request: PageRequest,
    ) -> RegistryResult<(Vec<ApiIdRecord>, usize)>;
}

/// Concurrent in-memory record store.
#[derive(Debug, Default)]
pub struct InMemoryApiIdStore {
    records: DashMap<Uuid, ApiIdRecord>,
}

impl InMemoryApiIdStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ApiIdStore for InMemoryApiIdStore {
    fn save(&self, record: ApiIdRecord) -> RegistryResult<ApiIdRecord> {
        self.records.insert(record.api_id, record.clone());
        Ok(record)
    }

    fn find_by_id(&self, api_id: &Uuid) -> RegistryResult<Option<ApiIdRecord>> {
        Ok(self.records.get(api_id).map(|entry| entry.value().clone()))
    }

    fn find_by_customer(
        &self,
        customer_id: &str,
        request: PageRequest,
    ) -> RegistryResult<(Vec<ApiIdRecord>, usize)> {
        let mut matching: Vec<ApiIdRecord> = self
            .records
            .iter()
            .filter(|entry| entry.customer_id == customer_id)
            .map(|entry| entry.value().clone())
            .collect();
        matching.sort_by(|a, b| a.created.cmp(&b.created).then(a.api_id.cmp(&b.api_id)));

        let total = matching.len();
        let page = matching
            .into_iter()
            .skip(request.offset())
            .take(request.size())
            .collect();
        Ok((page, total))
    }
}
