use async_trait::async_trait;
use crate::{
    error::BackendError,
    filter::RuleFilter,
    rule::CasbinRule,
};
use std::sync::Arc;

/// Storage for casbin rule records.
///
/// Every method is a single awaited round-trip to the underlying store;
/// implementations do not retry and do not cache.
#[async_trait]
pub trait RuleBackend: Send + Sync {
    /// Return every rule matching any of the filters, or every stored
    /// rule if `filters` is empty.  The first undecodable record aborts
    /// the whole read.
    async fn find_rules(
        &self,
        filters: &[RuleFilter],
    ) -> Result<Vec<CasbinRule>, BackendError>;
    /// Remove every stored rule.
    async fn clear_rules(&self) -> Result<(), BackendError>;
    async fn insert_rules(
        &self,
        rules: Vec<CasbinRule>,
    ) -> Result<(), BackendError>;
    async fn insert_rule(
        &self,
        rule: CasbinRule,
    ) -> Result<(), BackendError>;
    /// Delete at most one rule matching the filter, returning the number
    /// deleted.
    async fn delete_rule(
        &self,
        filter: &RuleFilter,
    ) -> Result<u64, BackendError>;
    /// Delete every rule matching the filter, returning the number
    /// deleted.
    async fn delete_rules(
        &self,
        filter: &RuleFilter,
    ) -> Result<u64, BackendError>;
}

#[async_trait]
impl<T: RuleBackend + ?Sized> RuleBackend for Arc<T> {
    async fn find_rules(
        &self,
        filters: &[RuleFilter],
    ) -> Result<Vec<CasbinRule>, BackendError> {
        (**self).find_rules(filters).await
    }

    async fn clear_rules(&self) -> Result<(), BackendError> {
        (**self).clear_rules().await
    }

    async fn insert_rules(
        &self,
        rules: Vec<CasbinRule>,
    ) -> Result<(), BackendError> {
        (**self).insert_rules(rules).await
    }

    async fn insert_rule(
        &self,
        rule: CasbinRule,
    ) -> Result<(), BackendError> {
        (**self).insert_rule(rule).await
    }

    async fn delete_rule(
        &self,
        filter: &RuleFilter,
    ) -> Result<u64, BackendError> {
        (**self).delete_rule(filter).await
    }

    async fn delete_rules(
        &self,
        filter: &RuleFilter,
    ) -> Result<u64, BackendError> {
        (**self).delete_rules(filter).await
    }
}
