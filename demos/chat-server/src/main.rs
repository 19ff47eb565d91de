use parley::prelude::*;
use tracing_subscriber::EnvFilter;

const DEFAULT_ADDR: &str = "0.0.0.0:50051";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let addr = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_ADDR.to_string());

    let server = ParleyServerBuilder::new().bind(&addr).build().await?;
    tracing::info!(%addr, "chat server starting");

    server.run().await?;
    Ok(())
}
