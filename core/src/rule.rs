//! Start/stop an embedded server around a test.
//!
//! # Design
//! `ServerRule` owns its server exclusively; nothing else can start or stop
//! it. Both transitions are idempotent: the rule asks the server whether it is
//! running before delegating, so `start` on a started server and `stop` on a
//! stopped one do nothing.
//!
//! `run` is the scoped form: it starts the server, runs the test body, and
//! stops the server on every exit path, including a panicking assertion. The
//! panic is resumed after the server is down. Dropping a rule whose server is
//! still running stops it as well.
//!
//! Errors from the server are returned as-is.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::server::EmbeddedServer;

/// Lifecycle controller for one [`EmbeddedServer`].
#[derive(Debug)]
pub struct ServerRule<S: EmbeddedServer> {
    server: S,
}

impl<S: EmbeddedServer> ServerRule<S> {
    pub fn new(server: S) -> Self {
        Self { server }
    }

    /// Start the server unless it is already running.
    pub fn start(&mut self) -> Result<(), S::Error> {
        if self.server.is_started() {
            return Ok(());
        }
        self.server.start()?;
        debug!(port = ?self.server.port(), "embedded server started");
        Ok(())
    }

    /// Stop the server unless it is already stopped.
    pub fn stop(&mut self) -> Result<(), S::Error> {
        if !self.server.is_started() {
            return Ok(());
        }
        self.server.stop()?;
        debug!("embedded server stopped");
        Ok(())
    }

    /// Stop then start. Safe in either state; the port may change.
    pub fn restart(&mut self) -> Result<(), S::Error> {
        self.stop()?;
        self.start()
    }

    pub fn is_started(&self) -> bool {
        self.server.is_started()
    }

    pub fn port(&self) -> Option<u16> {
        self.server.port()
    }

    pub fn url(&self) -> Option<String> {
        self.server.url()
    }

    pub fn server(&self) -> &S {
        &self.server
    }

    /// Hook run before a test unit.
    pub fn before(&mut self) -> Result<(), S::Error> {
        self.start()
    }

    /// Hook run after a test unit, whatever its outcome.
    pub fn after(&mut self) -> Result<(), S::Error> {
        self.stop()
    }

    /// Run `test` between [`before`](Self::before) and [`after`](Self::after).
    ///
    /// `after` runs exactly once whether `test` returns or panics. A panic is
    /// resumed once the server is stopped; a stop failure during that unwind
    /// is logged instead of returned.
    pub fn run<F, R>(&mut self, test: F) -> Result<R, S::Error>
    where
        F: FnOnce(&mut Self) -> R,
    {
        self.before()?;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| test(&mut *self)));
        let stopped = self.after();

        match outcome {
            Ok(value) => stopped.map(|()| value),
            Err(payload) => {
                if let Err(err) = stopped {
                    warn!(error = %err, "failed to stop embedded server after test panic");
                }
                panic::resume_unwind(payload)
            }
        }
    }
}

impl<S: EmbeddedServer> Drop for ServerRule<S> {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            warn!(error = %err, "failed to stop embedded server on drop");
        }
    }
}
