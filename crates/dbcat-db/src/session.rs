//! Ambient sessions.
//!
//! Every catalog operation runs on the connection of the innermost
//! [`Catalog::managed_session`] scope of the current task. A session holds one
//! open transaction for its whole life: [`Catalog::commit_scope`] (or
//! [`Session::commit`]) makes the work so far durable and starts a fresh
//! transaction; whatever is still uncommitted when the outermost scope exits
//! is rolled back.
//!
//! A failed statement (constraint violation, lost connection) aborts the
//! session: the pending transaction is rolled back on the spot and every later
//! operation fails with [`CatalogError::SessionAborted`] until the caller runs
//! [`Session::rollback`] or the outermost scope exits.
//!
//! The ambient session lives in a tokio task-local. Tasks spawned from inside a
//! scope do not inherit it and must open their own.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use libsql::params::IntoParams;

use crate::Catalog;
use crate::error::CatalogError;

tokio::task_local! {
    static AMBIENT: Session;
}

/// Handle to the ambient session of a catalog.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    catalog_id: u64,
    conn: libsql::Connection,
    depth: AtomicUsize,
    aborted: AtomicBool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("catalog_id", &self.inner.catalog_id)
            .field("depth", &self.depth())
            .field("aborted", &self.is_aborted())
            .finish_non_exhaustive()
    }
}

impl Session {
    async fn begin(catalog_id: u64, conn: libsql::Connection) -> Result<Self, CatalogError> {
        conn.execute("BEGIN", ()).await?;
        Ok(Self {
            inner: Arc::new(SessionInner {
                catalog_id,
                conn,
                depth: AtomicUsize::new(1),
                aborted: AtomicBool::new(false),
            }),
        })
    }

    /// Connection bound to this session.
    #[must_use]
    pub fn conn(&self) -> &libsql::Connection {
        &self.inner.conn
    }

    /// Number of `managed_session` scopes currently sharing this session.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.inner.depth.load(Ordering::SeqCst)
    }

    /// Whether a store failure has aborted the unit of work.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.inner.aborted.load(Ordering::SeqCst)
    }

    /// Run a statement on the session connection. A failure aborts the
    /// session.
    pub(crate) async fn execute(
        &self,
        sql: &str,
        params: impl IntoParams,
    ) -> Result<u64, libsql::Error> {
        let result = self.inner.conn.execute(sql, params).await;
        if let Err(ref e) = result {
            self.abort(e).await;
        }
        result
    }

    /// Run a query on the session connection. A failure aborts the session.
    pub(crate) async fn query(
        &self,
        sql: &str,
        params: impl IntoParams,
    ) -> Result<libsql::Rows, libsql::Error> {
        let result = self.inner.conn.query(sql, params).await;
        if let Err(ref e) = result {
            self.abort(e).await;
        }
        result
    }

    /// Commit the open transaction and start a new one.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::SessionAborted` if an earlier failure aborted
    /// the session, or `CatalogError::Store` if the commit fails, which
    /// aborts it.
    pub async fn commit(&self) -> Result<(), CatalogError> {
        if self.is_aborted() {
            return Err(CatalogError::SessionAborted);
        }
        self.execute("COMMIT", ()).await?;
        self.execute("BEGIN", ()).await?;
        tracing::debug!(depth = self.depth(), "session committed");
        Ok(())
    }

    /// Discard the pending work and start a fresh unit of work.
    ///
    /// This is also how an aborted session is made usable again.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Store` if the store rejects the rollback or the
    /// new transaction.
    pub async fn rollback(&self) -> Result<(), CatalogError> {
        // An aborted session has already rolled back.
        if !self.is_aborted() {
            self.inner.conn.execute("ROLLBACK", ()).await?;
        }
        self.inner.conn.execute("BEGIN", ()).await?;
        self.inner.aborted.store(false, Ordering::SeqCst);
        tracing::debug!(depth = self.depth(), "session rolled back");
        Ok(())
    }

    async fn abort(&self, cause: &libsql::Error) {
        if self.inner.aborted.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::warn!(error = %cause, "store failure aborted the session");
        if let Err(e) = self.inner.conn.execute("ROLLBACK", ()).await {
            tracing::warn!(error = %e, "rollback after store failure failed");
        }
    }

    async fn close(&self) -> Result<(), CatalogError> {
        if self.is_aborted() {
            return Ok(());
        }
        self.inner.conn.execute("ROLLBACK", ()).await?;
        Ok(())
    }

    fn enter(&self) -> DepthGuard<'_> {
        self.inner.depth.fetch_add(1, Ordering::SeqCst);
        DepthGuard(self)
    }
}

struct DepthGuard<'a>(&'a Session);

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.inner.depth.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Catalog {
    fn ambient(&self) -> Option<Session> {
        AMBIENT
            .try_with(|session| {
                (session.inner.catalog_id == self.id).then(|| session.clone())
            })
            .ok()
            .flatten()
    }

    /// The ambient session, if the current task runs inside a scope of this
    /// catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NoActiveSession` outside any scope, or when the
    /// ambient session belongs to a different catalog, and
    /// `CatalogError::SessionAborted` once a store failure aborted it.
    pub fn session(&self) -> Result<Session, CatalogError> {
        let session = self.ambient().ok_or(CatalogError::NoActiveSession)?;
        if session.is_aborted() {
            return Err(CatalogError::SessionAborted);
        }
        Ok(session)
    }

    #[must_use]
    pub fn in_session(&self) -> bool {
        self.ambient().is_some()
    }

    /// Run `f` with an ambient session.
    ///
    /// Reuses the active session of this catalog when there is one. Otherwise
    /// opens a connection, begins a transaction, runs `f`, and rolls back
    /// whatever was not committed, whether `f` succeeded or not.
    ///
    /// # Errors
    ///
    /// Returns the error of `f`, or `CatalogError::Store` if the session could
    /// not be opened.
    pub async fn managed_session<F, Fut, T>(&self, f: F) -> Result<T, CatalogError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, CatalogError>>,
    {
        if let Some(session) = self.ambient() {
            let _guard = session.enter();
            tracing::trace!(depth = session.depth(), "joining ambient session");
            return f().await;
        }

        let conn = self.connect().await?;
        let session = Session::begin(self.id, conn).await?;
        tracing::debug!(catalog = self.id, "session opened");

        let result = AMBIENT.scope(session.clone(), async move { f().await }).await;

        match session.close().await {
            Ok(()) => tracing::debug!(catalog = self.id, ok = result.is_ok(), "session closed"),
            Err(e) => tracing::warn!(error = %e, "rollback at session close failed"),
        }
        result
    }

    /// Run `f` inside the ambient session and commit if it succeeds.
    ///
    /// On error nothing is committed; the work stays pending until the
    /// outermost scope rolls it back.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NoActiveSession` outside a scope, the error of
    /// `f`, or the commit failure.
    pub async fn commit_scope<F, Fut, T>(&self, f: F) -> Result<T, CatalogError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, CatalogError>>,
    {
        let session = self.session()?;
        let value = f().await?;
        session.commit().await?;
        Ok(value)
    }
}
