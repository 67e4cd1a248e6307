use std::any::Any;
use std::sync::Arc;

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::{Connection, SqliteConnection};
use tokio::sync::{mpsc, oneshot};

use super::DbPool;
use crate::errors::{DatabaseError, Error, Result};

// A write job borrows the actor's connection for the duration of one
// database transaction. Return values are type-erased through `Any` so a
// single channel can carry jobs of different result types.
type Job = Box<dyn FnOnce(&mut SqliteConnection) -> Result<Box<dyn Any + Send + 'static>> + Send + 'static>;

/// Handle for submitting write jobs to the single-writer actor.
///
/// Every job runs inside one `BEGIN IMMEDIATE` transaction: either all of its
/// writes commit, or none do. Because one actor owns the write connection,
/// jobs are serialized and two operations can never interleave their
/// read-modify-write cycles on the same rows.
#[derive(Clone)]
pub struct WriteHandle {
    #[allow(clippy::type_complexity)]
    tx: mpsc::Sender<(Job, oneshot::Sender<Result<Box<dyn Any + Send + 'static>>>)>,
}

impl WriteHandle {
    /// Executes `job` on the writer's dedicated connection, inside a single
    /// immediate transaction, and returns its result.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |c| job(c).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                ret_tx,
            ))
            .await
            .map_err(|_| {
                Error::Database(crate::errors::DatabaseError::TransactionFailed(
                    "writer actor is no longer running".to_string(),
                ))
            })?;

        let boxed = ret_rx.await.map_err(|_| {
            Error::Database(crate::errors::DatabaseError::TransactionFailed(
                "writer actor dropped the reply channel".to_string(),
            ))
        })??;

        boxed.downcast::<T>().map(|v| *v).map_err(|_| {
            Error::Database(crate::errors::DatabaseError::TransactionFailed(
                "writer actor returned an unexpected result type".to_string(),
            ))
        })
    }
}

/// Spawns the background task that owns one pooled connection and processes
/// write jobs serially, each wrapped in an immediate transaction.
pub fn spawn_writer(pool: Arc<DbPool>) -> Result<WriteHandle> {
    let (tx, mut rx) =
        mpsc::channel::<(Job, oneshot::Sender<Result<Box<dyn Any + Send + 'static>>>)>(1024);

    let mut conn = pool.get()?;

    tokio::spawn(async move {
        while let Some((job, reply_tx)) = rx.recv().await {
            let result = conn
                .immediate_transaction::<_, Error, _>(|c| job(c))
                .map_err(surface_lock_contention);

            // The requester may have gone away; nothing to do then.
            let _ = reply_tx.send(result);
        }
    });

    Ok(WriteHandle { tx })
}

/// A busy database means a writer outside this process holds the lock, so
/// report it as contention rather than a generic query failure.
fn surface_lock_contention(err: Error) -> Error {
    match err {
        Error::Database(DatabaseError::QueryFailed(DieselError::DatabaseError(kind, info)))
            if matches!(kind, DatabaseErrorKind::SerializationFailure)
                || info.message().contains("database is locked") =>
        {
            Error::Database(DatabaseError::ConcurrentModification(
                info.message().to_string(),
            ))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_database_becomes_concurrent_modification() {
        let err = Error::Database(DatabaseError::QueryFailed(DieselError::DatabaseError(
            DatabaseErrorKind::Unknown,
            Box::new("database is locked".to_string()),
        )));
        assert!(matches!(
            surface_lock_contention(err),
            Error::Database(DatabaseError::ConcurrentModification(_))
        ));
    }

    #[test]
    fn other_failures_pass_through_unchanged() {
        let err = Error::Database(DatabaseError::QueryFailed(DieselError::NotFound));
        assert!(matches!(
            surface_lock_contention(err),
            Error::Database(DatabaseError::QueryFailed(DieselError::NotFound))
        ));
    }
}
