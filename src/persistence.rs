pub mod db_comment_driven_ports;
pub mod db_manager_driven_ports;
pub mod db_todo_driven_ports;
pub mod db_user_driven_ports;

use crate::external_connections;
use crate::external_connections::ConnectionHandle;
use anyhow::Context;
use reqwest_middleware::ClientBuilder;
use reqwest_tracing::TracingMiddleware;
use sqlx::pool::PoolConnection;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Acquire, PgConnection, PgPool, Postgres, Transaction};

/// Owns the database pool and the outbound HTTP client. Cheap to clone, so each request
/// handler takes its own copy.
#[derive(Clone)]
pub struct ExternalConnectivity {
    db: PgPool,
    http_client: reqwest_middleware::ClientWithMiddleware,
}

impl ExternalConnectivity {
    /// Accepts the database pool and builds the traced HTTP client used for outbound calls
    /// such as the weather API
    pub fn new(db: PgPool) -> Result<Self, anyhow::Error> {
        let base_client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .context("building the outbound HTTP client")?;
        let http_client = ClientBuilder::new(base_client)
            .with(TracingMiddleware::default())
            .build();

        Ok(ExternalConnectivity { db, http_client })
    }
}

/// Opens the PostgreSQL pool and brings the schema up to date
pub async fn connect_sqlx(db_url: &str, max_connections: u32) -> Result<PgPool, anyhow::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(db_url)
        .await
        .context("connecting to the database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("running database migrations")?;

    Ok(pool)
}

/// A pooled connection checked out for one driven port call
pub struct PooledConnection(PoolConnection<Postgres>);

impl ConnectionHandle for PooledConnection {
    fn borrow_connection(&mut self) -> &mut PgConnection {
        &mut self.0
    }
}

impl external_connections::ExternalConnectivity for ExternalConnectivity {
    type DbHandle<'cxn_borrow>
        = PooledConnection
    where
        Self: 'cxn_borrow;

    async fn database_cxn(&mut self) -> Result<PooledConnection, anyhow::Error> {
        let connection = self
            .db
            .acquire()
            .await
            .context("checking a connection out of the pool")?;

        Ok(PooledConnection(connection))
    }

    fn http_client(&self) -> &reqwest_middleware::ClientWithMiddleware {
        &self.http_client
    }
}

impl external_connections::Transactable for ExternalConnectivity {
    type Handle = TransactionalConnectivity;

    async fn start_transaction(&self) -> Result<TransactionalConnectivity, anyhow::Error> {
        let txn = self
            .db
            .begin()
            .await
            .context("beginning a database transaction")?;

        Ok(TransactionalConnectivity {
            txn,
            http_client: self.http_client.clone(),
        })
    }
}

/// Connectivity whose every database call runs inside one open transaction. Dropping it
/// without committing rolls the work back.
pub struct TransactionalConnectivity {
    txn: Transaction<'static, Postgres>,
    http_client: reqwest_middleware::ClientWithMiddleware,
}

/// The transaction's connection, lent out for one driven port call
pub struct TransactionConnection<'tx>(&'tx mut PgConnection);

impl ConnectionHandle for TransactionConnection<'_> {
    fn borrow_connection(&mut self) -> &mut PgConnection {
        &mut *self.0
    }
}

impl external_connections::ExternalConnectivity for TransactionalConnectivity {
    type DbHandle<'tx_borrow>
        = TransactionConnection<'tx_borrow>
    where
        Self: 'tx_borrow;

    async fn database_cxn(&mut self) -> Result<TransactionConnection<'_>, anyhow::Error> {
        let connection = self
            .txn
            .acquire()
            .await
            .context("borrowing the transaction's connection")?;

        Ok(TransactionConnection(connection))
    }

    fn http_client(&self) -> &reqwest_middleware::ClientWithMiddleware {
        &self.http_client
    }
}

impl external_connections::TransactionHandle for TransactionalConnectivity {
    async fn commit(self) -> Result<(), anyhow::Error> {
        self.txn
            .commit()
            .await
            .context("committing the database transaction")
    }
}

/// Row shape for `SELECT count(*) AS count` queries
#[derive(sqlx::FromRow)]
struct Count {
    count: i64,
}

/// Row shape for `RETURNING id` inserts
#[derive(sqlx::FromRow)]
struct NewId {
    id: i64,
}
