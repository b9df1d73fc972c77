//! [`EmbeddedServer`] implementation that runs the app on its own thread.
//!
//! # Design
//! The listener is bound synchronously in `start`, so the port is known and
//! connections queue in the backlog before the first test request goes out.
//! The app then runs on a current-thread tokio runtime owned by a dedicated
//! thread, which lets blocking tests drive it. `stop` fires a oneshot that
//! drives axum's graceful shutdown and joins the thread.

use std::io;
use std::net::{Ipv4Addr, TcpListener};
use std::thread::{self, JoinHandle};

use harness_core::{EmbeddedConfiguration, EmbeddedServer};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::router;

#[derive(Debug, Default)]
pub struct MockServer {
    configuration: EmbeddedConfiguration,
    running: Option<Running>,
}

#[derive(Debug)]
struct Running {
    port: u16,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<io::Result<()>>,
}

impl MockServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_configuration(configuration: EmbeddedConfiguration) -> Self {
        Self {
            configuration,
            running: None,
        }
    }

    pub fn configuration(&self) -> &EmbeddedConfiguration {
        &self.configuration
    }
}

impl EmbeddedServer for MockServer {
    type Error = io::Error;

    fn start(&mut self) -> io::Result<()> {
        if self.running.is_some() {
            return Ok(());
        }

        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, self.configuration.port()))?;
        listener.set_nonblocking(true)?;
        let port = listener.local_addr()?.port();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let (shutdown, signal) = oneshot::channel::<()>();
        let app = router(self.configuration.path());

        let handle = thread::Builder::new()
            .name(format!("mock-server-{port}"))
            .spawn(move || {
                runtime.block_on(async move {
                    let listener = tokio::net::TcpListener::from_std(listener)?;
                    axum::serve(listener, app)
                        .with_graceful_shutdown(async {
                            let _ = signal.await;
                        })
                        .await
                })
            })?;

        info!(port, path = self.configuration.path(), "mock server listening");
        self.running = Some(Running {
            port,
            shutdown,
            handle,
        });
        Ok(())
    }

    fn stop(&mut self) -> io::Result<()> {
        let Some(running) = self.running.take() else {
            return Ok(());
        };

        // The receiver is gone only if the serve loop already exited.
        let _ = running.shutdown.send(());
        running
            .handle
            .join()
            .map_err(|_| io::Error::other("mock server thread panicked"))??;

        debug!(port = running.port, "mock server stopped");
        Ok(())
    }

    fn is_started(&self) -> bool {
        self.running.is_some()
    }

    fn port(&self) -> Option<u16> {
        self.running.as_ref().map(|running| running.port)
    }

    fn path(&self) -> &str {
        self.configuration.path()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            warn!(error = %err, "failed to stop mock server on drop");
        }
    }
}
