//! # Process-wide session cache
//!
//! The [`SessionCache`] holds the client's read-only copy of the backend session. It
//! follows a single-writer / multi-reader discipline:
//!
//! - Only [`AuthClient`](crate::AuthClient) writes, through the crate-private
//!   [`store`](SessionCache::store), [`clear`](SessionCache::clear) and
//!   [`invalidate`](SessionCache::invalidate).
//! - Any number of [`SessionObserver`]s read. They are backed by a
//!   [`tokio::sync::watch`] channel and are woken only when the cached value actually
//!   changes, so a sign-in moves every observer from absent to present exactly once.
//!
//! ## Freshness
//!
//! The cache starts uninitialised. A value is fresh for `max_age` after it was stored;
//! a stored session whose `expires_at` has passed is never handed out and makes the
//! cache stale immediately. Revalidation is serialised through
//! [`refresh_lock`](SessionCache::refresh_lock) so concurrent readers share one request.
//!
//! ## Generations
//!
//! Every fetch records the [`generation`](SessionCache::generation) it started under.
//! [`clear`](SessionCache::clear) and [`invalidate`](SessionCache::invalidate) start a
//! new generation, and [`store`](SessionCache::store) drops answers from an older one. A
//! check that was already in flight when the user signed in or out can therefore never
//! overwrite the newer state.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tokio::sync::{watch, MutexGuard};

use crate::models::Session;

/// Returned by [`SessionObserver::changed`] once the owning client is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("session cache was dropped")]
pub struct SessionClosed;

#[derive(Debug, Default)]
struct Validity {
    fetched_at: Option<DateTime<Utc>>,
    generation: u64,
}

pub(crate) struct SessionCache {
    tx: watch::Sender<Option<Session>>,
    validity: Mutex<Validity>,
    max_age: Duration,
    refresh: tokio::sync::Mutex<()>,
}

impl SessionCache {
    pub fn new(max_age: Duration) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            tx,
            validity: Mutex::new(Validity::default()),
            max_age,
            refresh: tokio::sync::Mutex::new(()),
        }
    }

    /// Cached session, if present and not yet expired.
    pub fn current(&self) -> Option<Session> {
        live(self.tx.borrow().as_ref())
    }

    fn validity(&self) -> std::sync::MutexGuard<'_, Validity> {
        self.validity.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn generation(&self) -> u64 {
        self.validity().generation
    }

    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        let Some(fetched_at) = self.validity().fetched_at else {
            return false;
        };
        if now - fetched_at >= self.max_age {
            return false;
        }
        !matches!(self.tx.borrow().as_ref(), Some(s) if s.is_expired_at(now))
    }

    /// Store an answer fetched under `generation`. Returns whether observers were
    /// notified; an answer from a superseded generation is dropped.
    pub fn store(&self, generation: u64, session: Option<Session>) -> bool {
        let mut validity = self.validity();
        if validity.generation != generation {
            return false;
        }
        self.replace(&mut validity, session)
    }

    /// Forget the session, e.g. after sign-out. Fetches already in flight are dropped.
    pub fn clear(&self) -> bool {
        let mut validity = self.validity();
        validity.generation += 1;
        self.replace(&mut validity, None)
    }

    /// Force the next read to revalidate without touching the cached value. Fetches
    /// already in flight are dropped.
    pub fn invalidate(&self) {
        let mut validity = self.validity();
        validity.generation += 1;
        validity.fetched_at = None;
    }

    fn replace(&self, validity: &mut Validity, session: Option<Session>) -> bool {
        let now = Utc::now();
        let session = session.filter(|s| !s.is_expired_at(now));
        validity.fetched_at = Some(now);
        self.tx.send_if_modified(|current| {
            if *current == session {
                false
            } else {
                *current = session;
                true
            }
        })
    }

    pub async fn refresh_lock(&self) -> MutexGuard<'_, ()> {
        self.refresh.lock().await
    }

    pub fn subscribe(&self) -> SessionObserver {
        SessionObserver {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read-only view of the cached session that can wait for changes.
#[derive(Debug, Clone)]
pub struct SessionObserver {
    rx: watch::Receiver<Option<Session>>,
}

impl SessionObserver {
    /// Current session without marking it as seen.
    pub fn current(&self) -> Option<Session> {
        live(self.rx.borrow().as_ref())
    }

    /// Whether a change happened since the last [`changed`](Self::changed).
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Wait for the next change and return the new session state.
    pub async fn changed(&mut self) -> Result<Option<Session>, SessionClosed> {
        self.rx.changed().await.map_err(|_| SessionClosed)?;
        Ok(live(self.rx.borrow_and_update().as_ref()))
    }
}

fn live(session: Option<&Session>) -> Option<Session> {
    session.filter(|s| !s.is_expired()).cloned()
}
