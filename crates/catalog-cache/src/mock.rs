//! Scripted in-memory transport for tests.
//!
//! [`MockTransport`] connects instantly unless told to fail, keeps its links
//! healthy until [`MockTransport::fail_link`] is called and closes them
//! according to a [`QuitBehavior`]. An optional [`Journal`] records the quit so
//! tests can assert ordering against other events.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::{CacheLink, CacheTransport, Error, Result};

/// Shared, ordered record of test events.
pub type Journal = Arc<Mutex<Vec<String>>>;

/// Appends an entry to a journal.
pub fn record(journal: &Journal, entry: impl Into<String>) {
    journal
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(entry.into());
}

/// Journal entry written when a mock link receives a quit request.
pub const QUIT_ENTRY: &str = "cache.quit";

/// How a mock link responds to [`CacheLink::quit`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuitBehavior {
    /// Acknowledge immediately
    #[default]
    Immediate,
    /// Acknowledge after the given delay
    Delay(Duration),
    /// Never acknowledge
    Never,
}

/// Scripted transport shared between the driver and the test body.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    inner: Arc<MockInner>,
}

#[derive(Debug, Default)]
struct MockInner {
    failures_left: AtomicU32,
    connect_attempts: AtomicU32,
    quit_requests: AtomicU32,
    quit: Mutex<QuitBehavior>,
    link_failure: Notify,
    journal: Mutex<Option<Journal>>,
}

impl MockTransport {
    /// Creates a transport whose connects succeed and whose quits are immediate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how links answer quit requests.
    #[must_use]
    pub fn with_quit(self, quit: QuitBehavior) -> Self {
        *self.inner.quit.lock().unwrap_or_else(PoisonError::into_inner) = quit;
        self
    }

    /// Records quits into `journal`.
    #[must_use]
    pub fn with_journal(self, journal: Journal) -> Self {
        *self.inner.journal.lock().unwrap_or_else(PoisonError::into_inner) = Some(journal);
        self
    }

    /// Makes the next `count` connection attempts fail.
    pub fn fail_next_connects(&self, count: u32) {
        self.inner.failures_left.store(count, Ordering::SeqCst);
    }

    /// Drops the current link, or the next one if none is established yet.
    pub fn fail_link(&self) {
        self.inner.link_failure.notify_one();
    }

    /// Returns the number of connection attempts so far.
    pub fn connect_attempts(&self) -> u32 {
        self.inner.connect_attempts.load(Ordering::SeqCst)
    }

    /// Returns the number of quit requests so far.
    pub fn quit_requests(&self) -> u32 {
        self.inner.quit_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheTransport for MockTransport {
    type Link = MockLink;

    async fn connect(&self) -> Result<MockLink> {
        self.inner.connect_attempts.fetch_add(1, Ordering::SeqCst);

        let failed = self
            .inner
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();

        if failed {
            return Err(Error::link_closed("connection refused"));
        }

        Ok(MockLink {
            inner: Arc::clone(&self.inner),
        })
    }
}

/// Link produced by [`MockTransport`].
#[derive(Debug)]
pub struct MockLink {
    inner: Arc<MockInner>,
}

#[async_trait]
impl CacheLink for MockLink {
    async fn failed(&mut self) -> Error {
        self.inner.link_failure.notified().await;
        Error::link_closed("connection reset")
    }

    async fn quit(&mut self) -> Result<()> {
        self.inner.quit_requests.fetch_add(1, Ordering::SeqCst);
        let journal = self
            .inner
            .journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(journal) = journal {
            record(&journal, QUIT_ENTRY);
        }

        let quit = *self.inner.quit.lock().unwrap_or_else(PoisonError::into_inner);
        match quit {
            QuitBehavior::Immediate => {}
            QuitBehavior::Delay(delay) => tokio::time::sleep(delay).await,
            QuitBehavior::Never => std::future::pending::<()>().await,
        }

        Ok(())
    }
}
