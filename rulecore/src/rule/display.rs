use std::fmt::{
    Display,
    Formatter,
    Result,
};
use super::CasbinRule;

impl Display for CasbinRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(&self.ptype)?;
        for token in self.tokens() {
            write!(f, ", {token}")?;
        }
        Ok(())
    }
}
