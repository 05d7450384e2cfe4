use std::time::Duration;

/// The default name for both the database (when the connection string
/// names none) and the collection holding the rules.
pub const DEFAULT_NAME: &str = "casbin_rule";

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(8);
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct ConnectorOption {
    pub url: String,
    pub database: Option<String>,
    pub collection: String,
    pub connect_timeout: Duration,
    pub load_timeout: Duration,
    /// Bound for every other operation; unbounded when `None`.
    pub op_timeout: Option<Duration>,
}

impl Default for ConnectorOption {
    fn default() -> Self {
        Self {
            url: String::new(),
            database: None,
            collection: DEFAULT_NAME.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            load_timeout: DEFAULT_LOAD_TIMEOUT,
            op_timeout: None,
        }
    }
}

impl ConnectorOption {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(mut self, url: String) -> Self {
        self.url = url;
        self
    }

    /// Use this database rather than the one named by the connection
    /// string.
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout = timeout;
        self
    }

    pub fn op_timeout(mut self, timeout: Duration) -> Self {
        self.op_timeout = Some(timeout);
        self
    }
}

impl<T> From<T> for ConnectorOption
where
    T: ToString
{
    fn from(v: T) -> Self {
        Self::new().url(v.to_string())
    }
}
