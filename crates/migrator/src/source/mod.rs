//! The source half of the migrator: a pooled SQL Server connection plus
//! catalog introspection and row streaming. Grounded on
//! `DatabaseExtractor` from the `bitalizer` migrator (the one file in the
//! retrieval pack that actually speaks this dialect), generalized from a
//! single unpooled connection into a `bb8` pool sized per §4.8.

pub mod introspect;
pub mod row;

use bb8_tiberius::ConnectionManager;
use tiberius::{AuthMethod, EncryptionLevel};

use crate::config::Config;
use crate::error::SourceConnectError;

pub type SourceConnection = bb8::PooledConnection<'static, ConnectionManager>;

/// A pooled connection to one source database. One instance is opened per
/// source database processed by the [`crate::runner`].
#[derive(Clone)]
pub struct SourcePool {
    pool: bb8::Pool<ConnectionManager>,
}

impl SourcePool {
    /// Connects to `database` on the source host, capping the pool at
    /// `config.max_workers + 10` connections for both the open and the
    /// idle pool per §4.8/§5 (`max_size` and `min_idle` set to the same
    /// value, so the pool neither exceeds the cap nor lets its idle
    /// connections drain below it). Transport encryption is disabled.
    ///
    /// §5's 60-second base timeout is honored as the pool's acquire
    /// timeout below; the migrator relies on the table copier's retry
    /// loop rather than per-row cancellation for resilience. §6 also
    /// calls for a 30-second TCP keepalive on the source connection
    /// string — this is a *separate* requirement from the acquire
    /// timeout above and is **not implemented**: neither `tiberius::Config`
    /// nor `bb8_tiberius::ConnectionManager` expose a socket-level
    /// keepalive knob (both manage the TCP stream internally), and
    /// setting one would mean replacing `ConnectionManager` with a
    /// hand-rolled `bb8::ManageConnection` impl that opens the socket
    /// itself. Recorded as a known, deliberate gap rather than silently
    /// folded into the acquire timeout; see DESIGN.md.
    pub async fn connect(config: &Config, database: &str) -> Result<Self, SourceConnectError> {
        let mut tiberius_config = tiberius::Config::new();
        tiberius_config.host(config.source_host.as_deref().unwrap_or_default());
        tiberius_config.port(config.source_port);
        tiberius_config.database(database);
        tiberius_config.encryption(EncryptionLevel::NotSupported);
        tiberius_config.authentication(AuthMethod::sql_server(
            config.source_user.as_deref().unwrap_or_default(),
            config.source_password.as_deref().unwrap_or_default(),
        ));
        tiberius_config.trust_cert();

        let pool_cap = (config.max_workers + 10) as u32;
        let manager = ConnectionManager::new(tiberius_config);
        let pool = bb8::Pool::builder()
            .max_size(pool_cap)
            .min_idle(Some(pool_cap))
            .connection_timeout(std::time::Duration::from_secs(60))
            .build(manager)
            .await
            .map_err(SourceConnectError::Pool)?;

        Ok(SourcePool { pool })
    }

    pub async fn get(&self) -> Result<SourceConnection, SourceConnectError> {
        self.pool.get_owned().await.map_err(SourceConnectError::Acquire)
    }
}
