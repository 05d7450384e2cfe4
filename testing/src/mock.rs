use async_trait::async_trait;
use mockall::mock;
use rulecore::{
    error::BackendError,
    filter::RuleFilter,
    rule::CasbinRule,
    traits::RuleBackend,
};

mock! {
    pub Backend {}

    #[async_trait]
    impl RuleBackend for Backend {
        async fn find_rules(
            &self,
            filters: &[RuleFilter],
        ) -> Result<Vec<CasbinRule>, BackendError>;
        async fn clear_rules(&self) -> Result<(), BackendError>;
        async fn insert_rules(
            &self,
            rules: Vec<CasbinRule>,
        ) -> Result<(), BackendError>;
        async fn insert_rule(
            &self,
            rule: CasbinRule,
        ) -> Result<(), BackendError>;
        async fn delete_rule(
            &self,
            filter: &RuleFilter,
        ) -> Result<u64, BackendError>;
        async fn delete_rules(
            &self,
            filter: &RuleFilter,
        ) -> Result<u64, BackendError>;
    }
}
