/// A single condition a stored rule must satisfy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Constraint {
    /// The ptype must be exactly this value.
    Ptype(String),
    /// The ptype must begin with this section key.
    Section(String),
    /// The positional value at the slot must be exactly this value.
    Value(usize, String),
}

/// A conjunction of constraints over stored rules.
///
/// Backends either evaluate this directly through [`RuleFilter::matches`]
/// or translate the constraints into a native query.  An empty filter
/// matches every rule.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleFilter {
    pub(crate) constraints: Vec<Constraint>,
}

mod impls;
