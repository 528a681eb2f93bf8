use std::time::Duration;

/// Which [`crate::DocumentStore`] implementation to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

/// When the MongoDB connection is established.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectMode {
    /// On the first request that needs the store.
    Lazy,
    /// During startup.
    Eager,
}

/// Document-store configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Connection string. `None` leaves the store unavailable.
    pub uri: Option<String>,
    pub database: String,
    pub connect: ConnectMode,
    /// How long the driver waits for a reachable server before failing.
    pub server_selection_timeout: Duration,
}

impl StoreConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default          |
    /// |----------------------|------------------|
    /// | `STORE_BACKEND`      | `mongo`          |
    /// | `MONGODB_URI`        | unset            |
    /// | `DB_NAME`            | `fullstack-task` |
    /// | `STORE_CONNECT`      | `lazy`           |
    /// | `STORE_TIMEOUT_SECS` | `5`              |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Panics on unparseable values so misconfiguration fails at startup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let backend = match lookup("STORE_BACKEND").as_deref() {
            None | Some("mongo") => StoreBackend::Mongo,
            Some("memory") => StoreBackend::Memory,
            Some(other) => panic!("STORE_BACKEND must be 'mongo' or 'memory', got '{other}'"),
        };

        let uri = lookup("MONGODB_URI").filter(|s| !s.trim().is_empty());

        let database = lookup("DB_NAME").unwrap_or_else(|| "fullstack-task".into());

        let connect = match lookup("STORE_CONNECT").as_deref() {
            None | Some("lazy") => ConnectMode::Lazy,
            Some("eager") => ConnectMode::Eager,
            Some(other) => panic!("STORE_CONNECT must be 'lazy' or 'eager', got '{other}'"),
        };

        let timeout_secs: u64 = lookup("STORE_TIMEOUT_SECS")
            .unwrap_or_else(|| "5".into())
            .parse()
            .expect("STORE_TIMEOUT_SECS must be a valid u64");

        Self {
            backend,
            uri,
            database,
            connect,
            server_selection_timeout: Duration::from_secs(timeout_secs),
        }
    }
}
