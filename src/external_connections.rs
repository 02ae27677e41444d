use sqlx::PgConnection;

/// A borrowed database connection, either straight from the pool or from inside a transaction
pub trait ConnectionHandle {
    fn borrow_connection(&mut self) -> &mut PgConnection;
}

/// Gives driven adapters access to the external systems they talk to (the database and
/// outbound HTTP) without the domain knowing which concrete clients are in use
pub trait ExternalConnectivity {
    type DbHandle<'cxn_borrow>: ConnectionHandle
    where
        Self: 'cxn_borrow;

    async fn database_cxn(&mut self) -> Result<Self::DbHandle<'_>, anyhow::Error>;

    fn http_client(&self) -> &reqwest_middleware::ClientWithMiddleware;
}

/// Connectivity which can open a database transaction. Everything done through the returned
/// handle is discarded unless [TransactionHandle::commit] is called.
pub trait Transactable {
    type Handle: ExternalConnectivity + TransactionHandle;

    async fn start_transaction(&self) -> Result<Self::Handle, anyhow::Error>;
}

pub trait TransactionHandle {
    async fn commit(self) -> Result<(), anyhow::Error>;
}
