//! Transaction helper behavior: the closure borrows the live transaction,
//! commits on success, rolls back on failure.

mod support;

use backend::db::txn::with_txn;
use backend::errors::DomainError;
use backend::repos::players;

use crate::support::test_db;

#[tokio::test]
async fn commits_work_done_through_the_transaction() -> Result<(), DomainError> {
    let conn = test_db().await?;

    let created = with_txn(&conn, |txn| {
        Box::pin(async move {
            players::find_or_create_many(txn, &["Zezima".to_string()]).await
        })
    })
    .await?;
    assert_eq!(created.len(), 1);

    let found = players::find_by_username(&conn, "zezima").await?;
    assert!(found.is_some(), "insert should survive the commit");
    Ok(())
}

#[tokio::test]
async fn rolls_back_when_the_closure_fails() -> Result<(), DomainError> {
    let conn = test_db().await?;

    let result: Result<(), DomainError> = with_txn(&conn, |txn| {
        Box::pin(async move {
            players::find_or_create_many(txn, &["Doomed".to_string()]).await?;
            Err(DomainError::validation("forced failure"))
        })
    })
    .await;
    assert!(result.is_err());

    let found = players::find_by_username(&conn, "doomed").await?;
    assert!(found.is_none(), "insert should be rolled back");
    Ok(())
}
