use anyhow::Result;
use clubgate::Application;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting clubgate application");

    let app = Application::new()?;
    app.run().await?;

    Ok(())
}
