use futures::future::BoxFuture;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::errors::domain::DomainError;

/// Execute a function within a database transaction.
///
/// Begins a transaction, runs the closure, commits on `Ok` and rolls back
/// on `Err` (best effort; the original error is preserved). The closure
/// returns a boxed future so it can borrow the transaction for the whole
/// call: `with_txn(conn, |txn| Box::pin(async move { ... }))`.
pub async fn with_txn<R, F>(conn: &DatabaseConnection, f: F) -> Result<R, DomainError>
where
    F: for<'a> FnOnce(&'a DatabaseTransaction) -> BoxFuture<'a, Result<R, DomainError>>,
{
    let txn = conn.begin().await.map_err(DomainError::from)?;
    let out = f(&txn).await;

    match out {
        Ok(val) => {
            txn.commit().await.map_err(DomainError::from)?;
            Ok(val)
        }
        Err(err) => {
            let _ = txn.rollback().await;
            Err(err)
        }
    }
}
