//! Contract for servers that can be started and stopped inside a test.

/// An embeddable network server.
///
/// Implementations only need a clean single start and a clean single stop;
/// [`ServerRule`](crate::ServerRule) checks `is_started` before delegating,
/// which makes repeated calls harmless.
pub trait EmbeddedServer {
    /// Error raised by the server's own start/stop logic.
    type Error: std::error::Error;

    fn start(&mut self) -> Result<(), Self::Error>;

    fn stop(&mut self) -> Result<(), Self::Error>;

    fn is_started(&self) -> bool;

    /// Bound port while started, `None` otherwise.
    fn port(&self) -> Option<u16>;

    /// Path the application is mounted under, always starting with `/`.
    fn path(&self) -> &str {
        "/"
    }

    /// Base URL of the running server, e.g. `http://127.0.0.1:41234/`.
    fn url(&self) -> Option<String> {
        self.port()
            .map(|port| format!("http://127.0.0.1:{port}{}", self.path()))
    }
}
