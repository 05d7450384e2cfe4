use crate::rule::{
    CasbinRule,
    MAX_VALUES,
};
use super::{
    Constraint,
    RuleFilter,
};

impl Constraint {
    pub fn matches(&self, rule: &CasbinRule) -> bool {
        match self {
            Self::Ptype(ptype) => rule.ptype == *ptype,
            Self::Section(section) => rule.ptype.starts_with(section.as_str()),
            Self::Value(index, value) => rule.value(*index) == Some(value.as_str()),
        }
    }
}

impl RuleFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ptype(mut self, ptype: impl Into<String>) -> Self {
        self.constraints.push(Constraint::Ptype(ptype.into()));
        self
    }

    pub fn section(mut self, section: impl Into<String>) -> Self {
        self.constraints.push(Constraint::Section(section.into()));
        self
    }

    /// Constrain the value at `index`; indexes past the last slot are
    /// ignored as no stored rule could carry them.
    pub fn value(mut self, index: usize, value: impl Into<String>) -> Self {
        if index < MAX_VALUES {
            self.constraints.push(Constraint::Value(index, value.into()));
        } else {
            log::trace!("ignoring constraint on nonexistent value slot {index}");
        }
        self
    }

    /// A filter that only matches a rule equal to `rule` on every field,
    /// including the empty trailing values.
    pub fn exact(rule: &CasbinRule) -> Self {
        rule.values()
            .into_iter()
            .enumerate()
            .fold(Self::new().ptype(rule.ptype.as_str()), |filter, (index, value)| {
                filter.value(index, value)
            })
    }

    /// A filter on `ptype` where the contiguous run of `field_values`
    /// constrains the value slots beginning at `field_index`.
    ///
    /// For example, a `field_index` of 1 with two values constrains `v1`
    /// and `v2` while leaving the remaining slots unconstrained.  No
    /// values at all matches every rule of the `ptype`.
    pub fn field_window(
        ptype: impl Into<String>,
        field_index: usize,
        field_values: &[impl AsRef<str>],
    ) -> Self {
        let end = field_index.saturating_add(field_values.len());
        (0..MAX_VALUES)
            .filter(|k| field_index <= *k && *k < end)
            .fold(Self::new().ptype(ptype), |filter, k| {
                filter.value(k, field_values[k - field_index].as_ref())
            })
    }

    /// A filter on every rule of `section` whose leading values match
    /// `field_values` positionally, with empty values acting as
    /// wildcards.
    pub fn section_values(
        section: impl Into<String>,
        field_values: &[impl AsRef<str>],
    ) -> Self {
        field_values.iter()
            .map(|value| value.as_ref())
            .enumerate()
            .filter(|(_, value)| !value.is_empty())
            .fold(Self::new().section(section), |filter, (index, value)| {
                filter.value(index, value)
            })
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn matches(&self, rule: &CasbinRule) -> bool {
        self.constraints
            .iter()
            .all(|constraint| constraint.matches(rule))
    }
}
