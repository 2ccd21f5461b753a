//! The API identifier registry service.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::error::{RegistryError, RegistryResult};
use crate::model::{ApiIdRecord, ApiIdResponse, parse_api_id};
use crate::page::{Page, PageRequest};
use crate::store::ApiIdStore;

/// Issues, revokes and looks up API identifiers.
#[derive(Debug, Clone)]
pub struct ApiIdService {
    store: Arc<dyn ApiIdStore>,
    max_page_size: usize,
}

impl ApiIdService {
    /// Create a service over `store`, capping page sizes at `max_page_size`.
    #[must_use]
    pub fn new(store: Arc<dyn ApiIdStore>, max_page_size: usize) -> Self {
        Self {
            store,
            max_page_size,
        }
    }

    /// Issue a new identifier for `customer_id`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidArgument`] if `customer_id` is blank.
    pub fn register(&self, customer_id: &str) -> RegistryResult<ApiIdResponse> {
        let customer_id = customer_id.trim();
        if customer_id.is_empty() {
            return Err(RegistryError::InvalidArgument(
                "customerId must not be empty".to_owned(),
            ));
        }

        let record = self
            .store
            .save(ApiIdRecord::issue(customer_id, Utc::now()))?;
        info!(api_id = %record.api_id, "registered api id");
        Ok(ApiIdResponse::from(&record))
    }

    /// Revoke `api_id`. Revoking twice is allowed.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidApiId`] for a malformed identifier and
    /// [`RegistryError::NotFound`] for an unknown one.
    pub fn revoke(&self, api_id: &str) -> RegistryResult<ApiIdResponse> {
        let mut record = self.find_record(api_id)?;
        record.revoke(Utc::now());
        let record = self.store.save(record)?;
        info!(api_id = %record.api_id, "revoked api id");
        Ok(ApiIdResponse::from(&record))
    }

    /// Look up `api_id`.
    ///
    /// # Errors
    ///
    /// Same as [`ApiIdService::revoke`].
    pub fn find(&self, api_id: &str) -> RegistryResult<ApiIdResponse> {
        self.find_record(api_id).map(|record| ApiIdResponse::from(&record))
    }

    /// Look up the full record for `api_id`, including its owner.
    ///
    /// # Errors
    ///
    /// Same as [`ApiIdService::revoke`].
    pub fn find_record(&self, api_id: &str) -> RegistryResult<ApiIdRecord> {
        let id = parse_api_id(api_id)?;
        self.store
            .find_by_id(&id)?
            .ok_or_else(|| RegistryError::NotFound(api_id.to_owned()))
    }

    /// One page of `customer_id`'s identifiers, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidArgument`] if `size` is zero.
    pub fn all(
        &self,
        customer_id: &str,
        page: usize,
        size: usize,
    ) -> RegistryResult<Page<ApiIdResponse>> {
        let request = PageRequest::new(page, size, self.max_page_size)?;
        let (records, total) = self.store.find_by_customer(customer_id, request)?;
        debug!(
            page = request.page(),
            size = request.size(),
            total,
            "listed api ids"
        );
        Ok(Page::new(request, records, total).map(|record| ApiIdResponse::from(&record)))
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::store::InMemoryApiIdStore;

    fn service() -> ApiIdService {
        ApiIdService::new(Arc::new(InMemoryApiIdStore::new()), 100)
    }

    #[test]
    fn test_should_register_valid_id() {
        let service = service();
        let registered = service.register("test").unwrap();

        let record = service.find_record(&registered.api_id).unwrap();
        assert_eq!(record.api_id.to_string(), registered.api_id);
        assert_eq!(record.customer_id, "test");
        assert!(registered.valid);
        assert_eq!(registered.created, registered.modified);
    }

    #[test]
    fn test_should_reject_blank_customer() {
        assert!(matches!(
            service().register("  "),
            Err(RegistryError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_should_revoke_id() {
        let service = service();
        let registered = service.register("test").unwrap();
        let revoked = service.revoke(&registered.api_id).unwrap();

        assert!(!revoked.valid);
        assert!(revoked.modified >= registered.modified);
        assert!(!service.find(&registered.api_id).unwrap().valid);
    }

    #[test]
    fn test_should_fail_revoke_for_unknown_id() {
        assert!(matches!(
            service().revoke(&Uuid::new_v4().to_string()),
            Err(RegistryError::NotFound(_))
        ));
    }

    #[test]
    fn test_should_find_registered_id() {
        let service = service();
        let registered = service.register("test").unwrap();
        let found = service.find(&registered.api_id).unwrap();
        assert_eq!(found, registered);
    }

    #[test]
    fn test_should_fail_find_for_unknown_or_malformed_id() {
        let service = service();
        assert!(matches!(
            service.find(&Uuid::new_v4().to_string()),
            Err(RegistryError::NotFound(_))
        ));
        assert!(matches!(
            service.find("nope"),
            Err(RegistryError::InvalidApiId(_))
        ));
    }

    #[test]
    fn test_should_list_single_id() {
        let service = service();
        let customer = Uuid::new_v4().to_string();
        service.register(&customer).unwrap();

        let all = service.all(&customer, 0, 100).unwrap();
        assert_eq!(all.data.len(), 1);
        assert_eq!(all.page.page, 0);
        assert_eq!(all.page.total_pages, 1);
        assert_eq!(all.page.size, 1);
        assert_eq!(all.page.total_elements, 1);
    }

    #[test]
    fn test_should_list_second_page() {
        let service = service();
        let customer = Uuid::new_v4().to_string();
        for _ in 0..3 {
            service.register(&customer).unwrap();
        }

        let all = service.all(&customer, 1, 2).unwrap();
        assert_eq!(all.data.len(), 1);
        assert_eq!(all.page.page, 1);
        assert_eq!(all.page.total_pages, 2);
        assert_eq!(all.page.size, 1);
        assert_eq!(all.page.total_elements, 3);
    }

    #[test]
    fn test_should_list_nothing_for_unknown_customer() {
        let all = service().all(&Uuid::new_v4().to_string(), 0, 100).unwrap();
        assert!(all.data.is_empty());
        assert_eq!(all.page.page, 0);
        assert_eq!(all.page.total_pages, 0);
        assert_eq!(all.page.size, 0);
        assert_eq!(all.page.total_elements, 0);
    }

    #[test]
    fn test_should_reject_zero_size() {
        assert!(matches!(
            service().all("customer", 0, 0),
            Err(RegistryError::InvalidArgument(_))
        ));
    }
}
