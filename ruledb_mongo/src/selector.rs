use mongodb::bson::{
    doc,
    Bson,
    Document,
};
use rulecore::{
    filter::{
        Constraint,
        RuleFilter,
    },
    rule::VALUE_NAMES,
};
use std::collections::HashSet;

fn condition(constraint: &Constraint) -> (&'static str, Bson) {
    match constraint {
        Constraint::Ptype(ptype) => ("ptype", ptype.as_str().into()),
        Constraint::Section(section) => (
            "ptype",
            doc! { "$regex": format!("^{}", regex::escape(section)) }.into(),
        ),
        Constraint::Value(index, value) => (VALUE_NAMES[*index], value.as_str().into()),
    }
}

/// Translate a filter into a selector document.
///
/// Constraints on distinct fields produce a flat document; should any
/// field be constrained twice the conditions are joined under `$and` so
/// neither is lost.
pub fn selector(filter: &RuleFilter) -> Document {
    let conditions = filter.constraints()
        .iter()
        .map(condition)
        .collect::<Vec<_>>();
    let mut seen = HashSet::new();
    if conditions.iter().all(|(key, _)| seen.insert(*key)) {
        conditions.into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect()
    } else {
        let clauses = conditions.into_iter()
            .map(|(key, value)| {
                let mut clause = Document::new();
                clause.insert(key, value);
                clause
            })
            .collect::<Vec<_>>();
        doc! { "$and": clauses }
    }
}

/// Translate a set of filters into a selector matching any of them.  No
/// filters at all selects everything.
pub fn union(filters: &[RuleFilter]) -> Document {
    match filters {
        [] => Document::new(),
        [filter] => selector(filter),
        filters => {
            let clauses = filters.iter()
                .map(selector)
                .collect::<Vec<_>>();
            doc! { "$or": clauses }
        }
    }
}
