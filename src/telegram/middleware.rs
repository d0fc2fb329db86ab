//! Per-event middleware chain.
//!
//! Two stages wrap every business handler, composed once at route
//! registration time by [`compose`]:
//!
//! 1. [`ErrorIsolation`] (outermost): contains any failure so the dispatch
//!    loop keeps running, including failures during connection acquisition.
//! 2. [`ScopedConnection`]: leases one pooled connection for the duration
//!    of the event and hands it to the endpoint.
//!
//! The lease is owned by the endpoint future, so it returns to the pool
//! whenever that future ends, on success and on failure alike. The stage
//! order is fixed by `compose`; a route never sees a partially wrapped chain.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::core::error::HandlerResult;
use crate::storage::db::{DbConnection, DbPool};
use crate::telegram::event::Event;
use crate::telegram::notifications::notify_admins_handler_error;
use crate::telegram::Bot;

/// A business endpoint: consumes the event together with its leased
/// connection. The connection must not outlive the invocation.
pub type Endpoint =
    Arc<dyn Fn(Bot, Event, DbConnection) -> Pin<Box<dyn Future<Output = HandlerResult> + Send>> + Send + Sync>;

/// A fully composed per-route chain. Never surfaces an error to the
/// dispatcher.
pub type EventHandler = Arc<dyn Fn(Bot, Event) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Wraps an async function into an [`Endpoint`].
pub fn endpoint<F, Fut>(f: F) -> Endpoint
where
    F: Fn(Bot, Event, DbConnection) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    Arc::new(move |bot, event, conn| Box::pin(f(bot, event, conn)))
}

/// Leases one pooled connection per inbound event.
pub struct ScopedConnection {
    pool: Arc<DbPool>,
}

impl ScopedConnection {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Acquires a connection and invokes the next stage with it.
    ///
    /// The lease moves into the endpoint future and is dropped (returned to
    /// the pool) on every exit path, including an endpoint error. A failed
    /// acquisition propagates upward without a lease ever being taken, so
    /// pool state stays intact.
    pub async fn invoke(&self, bot: Bot, event: Event, next: &Endpoint) -> HandlerResult {
        let conn = self.pool.get()?;
        (**next)(bot, event, conn).await
    }
}

/// Contains per-event failures so the dispatch loop keeps running.
pub struct ErrorIsolation {
    admin_ids: Vec<i64>,
}

impl ErrorIsolation {
    pub fn new(admin_ids: Vec<i64>) -> Self {
        Self { admin_ids }
    }

    /// Invokes the inner stage and swallows any failure.
    ///
    /// On failure: logs origin, failure kind and message, then attempts a
    /// best-effort notification to the origin (and to the configured
    /// administrators). A failing notification is logged at warn and never
    /// re-raised, so it cannot mask the original error's log entry.
    pub async fn invoke<F>(&self, bot: &Bot, event: &Event, next: F)
    where
        F: Future<Output = HandlerResult>,
    {
        let err = match next.await {
            Ok(()) => return,
            Err(err) => err,
        };

        log::error!("Failed to handle {}: [{}] {}", event.describe(), err.kind(), err);

        if let Err(notify_err) = event.notify_failure(bot).await {
            log::warn!(
                "Failed to notify origin of {} about the error: {}",
                event.describe(),
                notify_err
            );
        }

        if !self.admin_ids.is_empty() {
            notify_admins_handler_error(bot, &self.admin_ids, event, &err).await;
        }
    }
}

/// Composes the full chain for one route: error isolation wrapped around
/// connection scoping wrapped around the business endpoint.
///
/// Isolation stays outermost so an acquisition failure is contained together
/// with handler failures, after the inner stage has already returned its
/// lease.
pub fn compose(pool: Arc<DbPool>, admin_ids: Vec<i64>, endpoint: Endpoint) -> EventHandler {
    let scoped = Arc::new(ScopedConnection::new(pool));
    let isolation = Arc::new(ErrorIsolation::new(admin_ids));

    Arc::new(move |bot: Bot, event: Event| {
        let scoped = Arc::clone(&scoped);
        let isolation = Arc::clone(&isolation);
        let endpoint = Arc::clone(&endpoint);

        Box::pin(async move {
            let inner = scoped.invoke(bot.clone(), event.clone(), &endpoint);
            isolation.invoke(&bot, &event, inner).await;
        })
    })
}
