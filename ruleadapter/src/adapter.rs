use rulecore::traits::RuleBackend;

/// The casbin storage adapter, persisting policy through a
/// [`RuleBackend`].
///
/// No policy state is kept between calls; the backend is the sole
/// store.  The only state held is whether the most recent load was a
/// filtered one, as reported to casbin through `is_filtered`.
pub struct RuleAdapter<B> {
    pub(crate) backend: B,
    pub(crate) is_filtered: bool,
}

impl<B: RuleBackend> RuleAdapter<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            is_filtered: false,
        }
    }

    pub fn into_inner(self) -> B {
        self.backend
    }
}

mod impls;
#[cfg(feature = "mongodb")]
mod mongo;
#[cfg(feature = "mongodb")]
pub use mongo::MongoAdapter;
