#![allow(dead_code)]

use harness_core::{HttpClient, ServerRule, UreqTransport};
use mock_server::MockServer;
use tracing_subscriber::EnvFilter;

/// Route `tracing` output through the test harness. `RUST_LOG=debug` shows
/// lifecycle transitions and every executed request.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Run `test` against a freshly started mock server on a random port.
pub fn with_client<R>(test: impl FnOnce(&HttpClient<UreqTransport>) -> R) -> R {
    init_tracing();
    let mut rule = ServerRule::new(MockServer::new());
    rule.run(|rule| {
        let client = HttpClient::for_server(rule.server(), UreqTransport::new()).unwrap();
        test(&client)
    })
    .unwrap()
}
