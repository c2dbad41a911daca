//! Connection configuration and pool setup.

use anyhow::Context;
use async_trait::async_trait;
use sqlgate_core::config::UpstreamConfig;
use std::ops::{Deref, DerefMut};
use std::time::Duration;
use tiberius::{Client, Config};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

/// A connected SQL Server client.
pub type MssqlClient = Client<Compat<TcpStream>>;

/// Pool of SQL Server clients.
pub type MssqlPool = bb8::Pool<ConnectionManager>;

/// Session options left on a connection that later statements would inherit.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    plan_mode: bool,
}

impl SessionState {
    /// Set before `SHOWPLAN_ALL ON` is sent.
    pub fn enter_plan_mode(&mut self) {
        self.plan_mode = true;
    }

    /// Cleared only once `SHOWPLAN_ALL OFF` has completed.
    pub fn leave_plan_mode(&mut self) {
        self.plan_mode = false;
    }

    /// A dirty connection must not be handed out again.
    pub fn is_dirty(&self) -> bool {
        self.plan_mode
    }
}

/// Pooled client plus the session state it carries between checkouts.
pub struct MssqlConnection {
    client: MssqlClient,
    pub session: SessionState,
}

impl MssqlConnection {
    fn new(client: MssqlClient) -> Self {
        Self {
            client,
            session: SessionState::default(),
        }
    }
}

impl Deref for MssqlConnection {
    type Target = MssqlClient;

    fn deref(&self) -> &MssqlClient {
        &self.client
    }
}

impl DerefMut for MssqlConnection {
    fn deref_mut(&mut self) -> &mut MssqlClient {
        &mut self.client
    }
}

/// bb8 manager opening tiberius clients over TCP.
#[derive(Debug, Clone)]
pub struct ConnectionManager {
    config: Config,
}

impl ConnectionManager {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Parse an ADO.NET connection string.
    pub fn from_ado_string(connection_string: &str) -> Result<Self, tiberius::error::Error> {
        Ok(Self::new(Config::from_ado_string(connection_string)?))
    }
}

#[async_trait]
impl bb8::ManageConnection for ConnectionManager {
    type Connection = MssqlConnection;
    type Error = tiberius::error::Error;

    async fn connect(&self) -> Result<Self::Connection, Self::Error> {
        let tcp = TcpStream::connect(self.config.get_addr()).await?;
        tcp.set_nodelay(true)?;
        let client = Client::connect(self.config.clone(), tcp.compat_write()).await?;
        Ok(MssqlConnection::new(client))
    }

    async fn is_valid(&self, conn: &mut Self::Connection) -> Result<(), Self::Error> {
        conn.simple_query("SELECT 1").await?.into_row().await?;
        Ok(())
    }

    // A checkout dropped mid-SHOWPLAN comes back still in plan mode, where
    // `SELECT 1` passes but nothing executes.
    fn has_broken(&self, conn: &mut Self::Connection) -> bool {
        conn.session.is_dirty()
    }
}

/// Build the pool from upstream settings and check that one connection opens.
pub async fn build_pool(upstream: &UpstreamConfig) -> anyhow::Result<MssqlPool> {
    let manager = ConnectionManager::from_ado_string(&upstream.connection_string())
        .context("Invalid SQL Server connection string")?;
    let settings = upstream.pool_config();

    let pool = bb8::Pool::builder()
        .max_size(settings.max_connections)
        .connection_timeout(Duration::from_secs(settings.connection_timeout_seconds))
        .build(manager)
        .await
        .context("Failed to create SQL Server connection pool")?;

    pool.get()
        .await
        .context("Failed to connect to SQL Server")?;

    tracing::info!(
        max_connections = settings.max_connections,
        "SQL Server connection pool ready"
    );
    Ok(pool)
}
