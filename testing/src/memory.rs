use async_trait::async_trait;
use parking_lot::Mutex;
use rulecore::{
    error::BackendError,
    filter::RuleFilter,
    rule::CasbinRule,
    traits::RuleBackend,
};

/// A backend keeping rules in insertion order in memory, evaluating
/// filters the same way a database would evaluate the translated query.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    rules: Mutex<Vec<CasbinRule>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: impl IntoIterator<Item = CasbinRule>) -> Self {
        Self {
            rules: Mutex::new(rules.into_iter().collect()),
        }
    }

    /// A snapshot of the stored rules.
    pub fn rules(&self) -> Vec<CasbinRule> {
        self.rules.lock().clone()
    }
}

#[async_trait]
impl RuleBackend for MemoryBackend {
    async fn find_rules(
        &self,
        filters: &[RuleFilter],
    ) -> Result<Vec<CasbinRule>, BackendError> {
        Ok(self.rules
            .lock()
            .iter()
            .filter(|rule| filters.is_empty() || filters.iter().any(|f| f.matches(rule)))
            .cloned()
            .collect())
    }

    async fn clear_rules(&self) -> Result<(), BackendError> {
        self.rules.lock().clear();
        Ok(())
    }

    async fn insert_rules(
        &self,
        rules: Vec<CasbinRule>,
    ) -> Result<(), BackendError> {
        self.rules.lock().extend(rules);
        Ok(())
    }

    async fn insert_rule(
        &self,
        rule: CasbinRule,
    ) -> Result<(), BackendError> {
        self.rules.lock().push(rule);
        Ok(())
    }

    async fn delete_rule(
        &self,
        filter: &RuleFilter,
    ) -> Result<u64, BackendError> {
        let mut rules = self.rules.lock();
        Ok(match rules.iter().position(|rule| filter.matches(rule)) {
            Some(idx) => {
                rules.remove(idx);
                1
            }
            None => 0,
        })
    }

    async fn delete_rules(
        &self,
        filter: &RuleFilter,
    ) -> Result<u64, BackendError> {
        let mut rules = self.rules.lock();
        let before = rules.len();
        rules.retain(|rule| !filter.matches(rule));
        Ok((before - rules.len()) as u64)
    }
}
