use mongodb::Database;
use rulecore::{
    error::BackendError,
    platform::ConnectorOption,
};
use ruledb_mongo::MongoBackend;

use super::RuleAdapter;

pub type MongoAdapter = RuleAdapter<MongoBackend>;

impl RuleAdapter<MongoBackend> {
    /// Connect to MongoDB and prepare the rule collection.
    ///
    /// Accepts either a bare connection URL or a full
    /// [`ConnectorOption`].
    pub async fn connect(
        opts: impl Into<ConnectorOption>,
    ) -> Result<Self, BackendError> {
        Ok(Self::new(MongoBackend::connect(opts.into()).await?))
    }

    /// Use a database handle that remains owned by the caller, with the
    /// default collection name and timeouts.
    pub async fn with_database(database: Database) -> Result<Self, BackendError> {
        Self::with_database_options(database, ConnectorOption::default()).await
    }

    pub async fn with_database_options(
        database: Database,
        opts: ConnectorOption,
    ) -> Result<Self, BackendError> {
        Ok(Self::new(MongoBackend::with_database(database, opts).await?))
    }

    /// Release the connection if the adapter established it.
    pub async fn close(self) {
        self.into_inner().close().await
    }
}
