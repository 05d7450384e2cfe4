use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{
        doc,
        Document,
    },
    options::{
        ClientOptions,
        ReadPreference,
        SelectionCriteria,
    },
    Client,
    Database,
    IndexModel,
};
use rulecore::{
    error::BackendError,
    filter::RuleFilter,
    platform::{
        ConnectorOption,
        DEFAULT_NAME,
    },
    rule::{
        CasbinRule,
        FIELD_NAMES,
    },
    traits::RuleBackend,
};
use std::{
    future::{
        Future,
        IntoFuture,
    },
    time::Duration,
};

use crate::{
    error::{
        is_index_conflict,
        is_namespace_not_found,
        read_error,
        server_code,
    },
    selector,
    Connection,
    MongoBackend,
};

async fn bounded<T>(
    what: &'static str,
    duration: Duration,
    fut: impl Future<Output = T>,
) -> Result<T, BackendError> {
    tokio::time::timeout(duration, fut)
        .await
        .map_err(|_| BackendError::Timeout(what, duration))
}

impl MongoBackend {
    /// Connect to the database at `opts.url`, verify the connection with
    /// a ping against the primary, then set up the rule collection.
    ///
    /// The resulting backend owns the client, which is released through
    /// [`MongoBackend::close`].
    pub async fn connect(opts: ConnectorOption) -> Result<Self, BackendError> {
        let timeout = opts.connect_timeout;
        let mut client_options = bounded(
            "connect",
            timeout,
            ClientOptions::parse(opts.url.as_str()).into_future(),
        ).await?
            .map_err(BackendError::connection)?;
        client_options.connect_timeout = Some(timeout);
        client_options.server_selection_timeout = Some(timeout);
        let name = opts.database.clone()
            .or_else(|| client_options.default_database.clone())
            .unwrap_or_else(|| DEFAULT_NAME.to_string());
        let client = Client::with_options(client_options)
            .map_err(BackendError::connection)?;

        bounded(
            "ping",
            timeout,
            client.database("admin")
                .run_command(doc! { "ping": 1 })
                .selection_criteria(SelectionCriteria::ReadPreference(ReadPreference::Primary))
                .into_future(),
        ).await?
            .map_err(BackendError::connection)?;
        log::debug!("connected to {}; using database {name:?}", opts.url);

        let database = client.database(&name);
        match Self::init(database, Connection::Owned(client.clone()), opts).await {
            Ok(backend) => Ok(backend),
            Err(e) => {
                log::debug!("shutting down client after failed setup");
                client.shutdown().await;
                Err(e)
            }
        }
    }

    /// Set up the rule collection on a database handle owned by the
    /// caller; the handle is never closed by the backend.
    pub async fn with_database(
        database: Database,
        opts: ConnectorOption,
    ) -> Result<Self, BackendError> {
        Self::init(database, Connection::Borrowed, opts).await
    }

    async fn init(
        database: Database,
        connection: Connection,
        opts: ConnectorOption,
    ) -> Result<Self, BackendError> {
        if opts.collection.is_empty() {
            return Err(BackendError::AppInvariantViolation(
                "collection name must not be empty".to_string()
            ));
        }
        let collection = database.collection::<CasbinRule>(&opts.collection);
        let backend = Self {
            collection,
            connection,
            load_timeout: opts.load_timeout,
            op_timeout: opts.op_timeout,
        };
        backend.ensure_indexes().await
            .map_err(BackendError::connection)?;
        log::trace!(
            "collection {}.{} ready",
            database.name(),
            backend.collection.name(),
        );
        Ok(backend)
    }

    pub fn owns_connection(&self) -> bool {
        matches!(self.connection, Connection::Owned(_))
    }

    /// Release the client if this backend created it.  A borrowed
    /// database handle is left untouched.
    pub async fn close(self) {
        let Self { collection, connection, .. } = self;
        drop(collection);
        match connection {
            Connection::Owned(client) => {
                log::debug!("shutting down owned client");
                client.shutdown().await;
            }
            Connection::Borrowed => {
                log::trace!("leaving borrowed database handle open");
            }
        }
    }

    /// Request a single field ascending index for every stored field.
    /// An index that already exists under a conflicting specification is
    /// accepted as is.  No build option is given as servers from 4.2 on
    /// ignore the background flag.
    async fn ensure_indexes(&self) -> Result<(), mongodb::error::Error> {
        let models = FIELD_NAMES.iter()
            .map(|field| {
                let mut keys = Document::new();
                keys.insert(*field, 1i32);
                IndexModel::builder()
                    .keys(keys)
                    .build()
            })
            .collect::<Vec<_>>();
        match self.collection.create_indexes(models).await {
            Ok(_) => Ok(()),
            Err(e) if is_index_conflict(server_code(&e)) => {
                log::warn!("conflicting index specification ignored: {e}");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn op<F>(
        &self,
        what: &'static str,
        fut: F,
    ) -> Result<F::Output, BackendError>
    where
        F: IntoFuture,
    {
        match self.op_timeout {
            Some(duration) => bounded(what, duration, fut.into_future()).await,
            None => Ok(fut.await),
        }
    }
}

#[async_trait]
impl RuleBackend for MongoBackend {
    async fn find_rules(
        &self,
        filters: &[RuleFilter],
    ) -> Result<Vec<CasbinRule>, BackendError> {
        let mut cursor = self.op("find", self.collection.find(selector::union(filters)))
            .await?
            .map_err(BackendError::query)?;
        // the cursor is released when dropped, which happens on every
        // return path out of this function.
        bounded("load", self.load_timeout, async move {
            let mut result = Vec::new();
            while let Some(rule) = cursor.try_next().await.map_err(read_error)? {
                result.push(rule);
            }
            Ok::<_, BackendError>(result)
        }).await?
    }

    async fn clear_rules(&self) -> Result<(), BackendError> {
        match self.op("drop", self.collection.drop()).await? {
            Ok(()) => (),
            Err(e) if is_namespace_not_found(&e) => {
                log::debug!("collection {} did not exist", self.collection.name());
            }
            Err(e) => return Err(BackendError::query(e)),
        }
        // dropping the collection also dropped its indexes
        self.op("create_indexes", self.ensure_indexes()).await?
            .map_err(BackendError::query)
    }

    async fn insert_rules(
        &self,
        rules: Vec<CasbinRule>,
    ) -> Result<(), BackendError> {
        if rules.is_empty() {
            log::trace!("no rules to insert");
            return Ok(());
        }
        let n = rules.len();
        self.op("insert_many", self.collection.insert_many(rules)).await?
            .map_err(BackendError::query)?;
        log::debug!("inserted {n} rules");
        Ok(())
    }

    async fn insert_rule(
        &self,
        rule: CasbinRule,
    ) -> Result<(), BackendError> {
        self.op("insert_one", self.collection.insert_one(rule)).await?
            .map_err(BackendError::query)?;
        Ok(())
    }

    async fn delete_rule(
        &self,
        filter: &RuleFilter,
    ) -> Result<u64, BackendError> {
        Ok(self.op("delete_one", self.collection.delete_one(selector::selector(filter)))
            .await?
            .map_err(BackendError::query)?
            .deleted_count)
    }

    async fn delete_rules(
        &self,
        filter: &RuleFilter,
    ) -> Result<u64, BackendError> {
        Ok(self.op("delete_many", self.collection.delete_many(selector::selector(filter)))
            .await?
            .map_err(BackendError::query)?
            .deleted_count)
    }
}
