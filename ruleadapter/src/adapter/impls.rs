use async_trait::async_trait;
use casbin::{
    Adapter,
    Filter,
    Model,
    Result,
};
use rulecore::{
    error::{
        BackendError,
        RuleError,
    },
    filter::RuleFilter,
    rule::CasbinRule,
    traits::RuleBackend,
};

use crate::error::into_casbin;
use super::RuleAdapter;

/// Add the decoded rule to the model under its section and ptype.
///
/// The model is left unchanged if it does not declare the ptype; the
/// returned value is whatever the model reports for the addition.
pub(crate) fn load_policy_line(
    rule: &CasbinRule,
    m: &mut dyn Model,
) -> std::result::Result<bool, RuleError> {
    let sec = rule.section()?;
    let added = m.add_policy(sec, &rule.ptype, rule.tokens());
    if !added {
        log::trace!("model did not accept rule {rule}");
    }
    Ok(added)
}

pub(crate) fn save_policy_line(ptype: &str, rule: &[String]) -> CasbinRule {
    CasbinRule::new(ptype, rule)
}

impl<B: RuleBackend> RuleAdapter<B> {
    async fn load_rules(
        &mut self,
        m: &mut dyn Model,
        filters: &[RuleFilter],
    ) -> Result<usize> {
        let rules = self.backend
            .find_rules(filters)
            .await
            .map_err(into_casbin)?;
        for rule in rules.iter() {
            load_policy_line(rule, m)
                .map_err(BackendError::from)
                .map_err(into_casbin)?;
        }
        Ok(rules.len())
    }
}

#[async_trait]
impl<B: RuleBackend> Adapter for RuleAdapter<B> {
    async fn load_policy(&mut self, m: &mut dyn Model) -> Result<()> {
        let n = self.load_rules(m, &[]).await?;
        self.is_filtered = false;
        log::debug!("loaded {n} rules");
        Ok(())
    }

    async fn load_filtered_policy<'a>(
        &mut self,
        m: &mut dyn Model,
        f: Filter<'a>,
    ) -> Result<()> {
        let filters = [
            RuleFilter::section_values("p", &f.p),
            RuleFilter::section_values("g", &f.g),
        ];
        let n = self.load_rules(m, &filters).await?;
        self.is_filtered = true;
        log::debug!("loaded {n} rules through filter");
        Ok(())
    }

    async fn save_policy(&mut self, m: &mut dyn Model) -> Result<()> {
        self.backend
            .clear_rules()
            .await
            .map_err(into_casbin)?;
        let rules = ["p", "g"].into_iter()
            .filter_map(|sec| m.get_model().get(sec))
            .flat_map(|ast_map| ast_map.iter())
            .flat_map(|(ptype, ast)| ast.get_policy()
                .iter()
                .map(move |rule| save_policy_line(ptype, rule))
            )
            .collect::<Vec<_>>();
        let n = rules.len();
        // the store stays empty should this insert fail.
        self.backend
            .insert_rules(rules)
            .await
            .map_err(into_casbin)?;
        log::debug!("saved {n} rules");
        Ok(())
    }

    async fn clear_policy(&mut self) -> Result<()> {
        self.backend
            .clear_rules()
            .await
            .map_err(into_casbin)
    }

    fn is_filtered(&self) -> bool {
        self.is_filtered
    }

    async fn add_policy(
        &mut self,
        _sec: &str,
        ptype: &str,
        rule: Vec<String>,
    ) -> Result<bool> {
        self.backend
            .insert_rule(save_policy_line(ptype, &rule))
            .await
            .map_err(into_casbin)?;
        Ok(true)
    }

    async fn add_policies(
        &mut self,
        _sec: &str,
        ptype: &str,
        rules: Vec<Vec<String>>,
    ) -> Result<bool> {
        let rules = rules.iter()
            .map(|rule| save_policy_line(ptype, rule))
            .collect::<Vec<_>>();
        self.backend
            .insert_rules(rules)
            .await
            .map_err(into_casbin)?;
        Ok(true)
    }

    async fn remove_policy(
        &mut self,
        _sec: &str,
        ptype: &str,
        rule: Vec<String>,
    ) -> Result<bool> {
        let filter = RuleFilter::exact(&save_policy_line(ptype, &rule));
        Ok(self.backend
            .delete_rule(&filter)
            .await
            .map_err(into_casbin)? > 0)
    }

    async fn remove_policies(
        &mut self,
        _sec: &str,
        ptype: &str,
        rules: Vec<Vec<String>>,
    ) -> Result<bool> {
        let mut all_removed = true;
        for rule in rules.iter() {
            let filter = RuleFilter::exact(&save_policy_line(ptype, rule));
            all_removed &= self.backend
                .delete_rule(&filter)
                .await
                .map_err(into_casbin)? > 0;
        }
        Ok(all_removed)
    }

    async fn remove_filtered_policy(
        &mut self,
        _sec: &str,
        ptype: &str,
        field_index: usize,
        field_values: Vec<String>,
    ) -> Result<bool> {
        let filter = RuleFilter::field_window(ptype, field_index, &field_values);
        let n = self.backend
            .delete_rules(&filter)
            .await
            .map_err(into_casbin)?;
        log::trace!("removed {n} rules of ptype {ptype:?} from index {field_index}");
        Ok(n > 0)
    }
}

#[cfg(test)]
mod test {
    use test_rule::fixture::{
        rbac_model,
        sorted_policy,
    };
    use super::*;

    #[tokio::test]
    async fn load_line() -> anyhow::Result<()> {
        let mut model = rbac_model().await?;
        let rule = CasbinRule::new("g2", &["cathy", "data2_admin"]);
        assert!(load_policy_line(&rule, &mut model)?);
        assert_eq!(
            sorted_policy(&model, "g", "g2"),
            vec![vec!["cathy".to_string(), "data2_admin".to_string()]],
        );
        Ok(())
    }

    #[tokio::test]
    async fn load_line_gap() -> anyhow::Result<()> {
        let mut model = rbac_model().await?;
        let rule = CasbinRule {
            ptype: "p".into(),
            v1: "x".into(),
            .. Default::default()
        };
        load_policy_line(&rule, &mut model)?;
        assert_eq!(model.get_policy("p", "p"), vec![Vec::<String>::new()]);
        Ok(())
    }

    #[tokio::test]
    async fn load_line_undeclared() -> anyhow::Result<()> {
        let mut model = rbac_model().await?;
        // the model declares no g3
        let rule = CasbinRule::new("g3", &["alice", "bob"]);
        assert!(!load_policy_line(&rule, &mut model)?);
        assert!(model.get_policy("g", "g3").is_empty());
        let rule = CasbinRule::new("", &["alice"]);
        assert_eq!(load_policy_line(&rule, &mut model), Err(RuleError::EmptyPtype));
        Ok(())
    }

    #[test]
    fn save_line() {
        let rule = vec!["alice".to_string(), "data1".to_string(), "read".to_string()];
        let record = save_policy_line("p", &rule);
        assert_eq!(record.v0, "alice");
        assert_eq!(record.v2, "read");
        assert_eq!(record.v3, "");
        assert_eq!(record.tokens(), rule);
    }
}
