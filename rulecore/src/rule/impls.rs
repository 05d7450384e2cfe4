use crate::error::RuleError;
use super::{
    CasbinRule,
    MAX_VALUES,
};

impl CasbinRule {
    /// Encode a rule of the given type.
    ///
    /// Values are copied positionally into `v0` through `v5`; anything
    /// past the sixth value is silently dropped.
    pub fn new(ptype: impl Into<String>, rule: &[impl AsRef<str>]) -> Self {
        let mut result = Self {
            ptype: ptype.into(),
            .. Default::default()
        };
        for (slot, value) in result.values_mut()
            .into_iter()
            .zip(rule.iter())
        {
            *slot = value.as_ref().to_string();
        }
        if rule.len() > MAX_VALUES {
            log::trace!(
                "rule for ptype {:?} truncated from {} to {MAX_VALUES} values",
                result.ptype,
                rule.len(),
            );
        }
        result
    }

    pub fn values(&self) -> [&str; MAX_VALUES] {
        [
            &self.v0,
            &self.v1,
            &self.v2,
            &self.v3,
            &self.v4,
            &self.v5,
        ]
    }

    fn values_mut(&mut self) -> [&mut String; MAX_VALUES] {
        [
            &mut self.v0,
            &mut self.v1,
            &mut self.v2,
            &mut self.v3,
            &mut self.v4,
            &mut self.v5,
        ]
    }

    /// The value stored at positional slot `index`, if the slot exists.
    pub fn value(&self, index: usize) -> Option<&str> {
        self.values().get(index).copied()
    }

    /// The section this rule belongs to, which is the first character
    /// of its ptype (e.g. `"p"` for `"p"`, `"g"` for `"g2"`).
    pub fn section(&self) -> Result<&str, RuleError> {
        section_of(&self.ptype)
    }

    /// Decode the values back into the token sequence of a policy.
    ///
    /// Scanning stops at the first empty value, so a value following an
    /// empty one is never returned even if it is set.
    pub fn tokens(&self) -> Vec<String> {
        self.values()
            .into_iter()
            .take_while(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// The section key of a ptype, being its first character.
pub fn section_of(ptype: &str) -> Result<&str, RuleError> {
    ptype.chars()
        .next()
        .map(|c| &ptype[..c.len_utf8()])
        .ok_or(RuleError::EmptyPtype)
}

/// Parse a single line of the text policy format, i.e. `p, alice, data1,
/// read`.  Comments start with `#`; blank or comment-only lines, as well
/// as lines without a ptype, produce `None`.
pub fn parse_policy_line(line: &str) -> Option<(String, Vec<String>)> {
    let line = line
        .split('#')
        .next()
        .unwrap_or_default()
        .trim();
    if line.is_empty() {
        return None;
    }
    let mut tokens = line.split(',').map(str::trim);
    let ptype = tokens.next()
        .filter(|ptype| !ptype.is_empty())?
        .to_string();
    let values = tokens
        .map(str::to_string)
        .collect::<Vec<_>>();
    Some((ptype, values))
}
