use mongodb::{
    Client,
    Collection,
};
use rulecore::rule::CasbinRule;
use std::time::Duration;

/// Whether the backend is responsible for the client it talks through.
pub enum Connection {
    /// The backend connected by itself and must shut the client down.
    Owned(Client),
    /// The database handle was provided by the caller, who keeps
    /// ownership of the underlying client.
    Borrowed,
}

pub struct MongoBackend {
    pub(crate) collection: Collection<CasbinRule>,
    pub(crate) connection: Connection,
    pub(crate) load_timeout: Duration,
    pub(crate) op_timeout: Option<Duration>,
}

mod error;
mod impls;
pub mod selector;
