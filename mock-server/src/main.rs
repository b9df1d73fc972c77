use harness_core::EmbeddedConfiguration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let configuration = EmbeddedConfiguration::from_env()?;
    let listener = TcpListener::bind(("127.0.0.1", configuration.port())).await?;
    info!(
        addr = %listener.local_addr()?,
        path = configuration.path(),
        "listening"
    );
    mock_server::run(listener, configuration.path()).await?;
    Ok(())
}
