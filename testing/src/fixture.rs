use casbin::{
    DefaultModel,
    Model,
};
use rulecore::rule::{
    CasbinRule,
    parse_policy_line,
    section_of,
};

/// A role-based model with a second grouping type, so that loading and
/// saving touch more than one rule type per section.
pub const RBAC_MODEL: &str = "\
[request_definition]
r = sub, obj, act

[policy_definition]
p = sub, obj, act

[role_definition]
g = _, _
g2 = _, _

[policy_effect]
e = some(where (p.eft == allow))

[matchers]
m = (g(r.sub, p.sub) || g2(r.sub, p.sub)) && r.obj == p.obj && r.act == p.act
";

pub const RBAC_POLICY: &str = "\
p, alice, data1, read
p, bob, data2, write
p, data2_admin, data2, read
p, data2_admin, data2, write

# alice administers data2
g, alice, data2_admin
g2, cathy, data2_admin
";

pub async fn rbac_model() -> anyhow::Result<DefaultModel> {
    Ok(DefaultModel::from_str(RBAC_MODEL).await?)
}

/// The model with the sample policy already added to it.
pub async fn rbac_model_with_policy() -> anyhow::Result<DefaultModel> {
    let mut model = rbac_model().await?;
    for (ptype, rule) in RBAC_POLICY.lines().filter_map(parse_policy_line) {
        model.add_policy(section_of(&ptype)?, &ptype, rule);
    }
    Ok(model)
}

/// The sample policy as stored records, in file order.
pub fn rbac_rules() -> Vec<CasbinRule> {
    RBAC_POLICY.lines()
        .filter_map(parse_policy_line)
        .map(|(ptype, rule)| CasbinRule::new(ptype, &rule))
        .collect()
}

/// Sorted string form of the policy of a given type, for comparisons
/// that should not depend on enumeration order.
pub fn sorted_policy(model: &dyn Model, sec: &str, ptype: &str) -> Vec<Vec<String>> {
    let mut result = model.get_policy(sec, ptype);
    result.sort();
    result
}
